//! Full pipeline scenarios: extraction, planning, and rendering run
//! with the inference service unavailable, so every stage takes its
//! deterministic fallback.

use chrono::NaiveDate;
use proposal_core::{
    ContentPlanner, FactExtractor, NullClient, OutputFormat, PropertyFacts, NO_INFORMATION,
};
use proposal_pptx::PptxRenderer;
use std::io::{Cursor, Read};

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn slide_count(bytes: &[u8]) -> usize {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    (0..archive.len())
        .filter(|&i| {
            let name = archive.by_index(i).unwrap().name().to_string();
            name.starts_with("ppt/slides/slide") && !name.contains("_rels")
        })
        .count()
}

#[test]
fn empty_text_with_no_inference_backend() {
    let facts = FactExtractor::new(&NullClient).extract("");

    // Everything placeholder except the generated default title.
    assert_eq!(facts.title, "Property listing");
    assert_eq!(facts.location, NO_INFORMATION);
    assert_eq!(facts.price, NO_INFORMATION);
    assert_eq!(facts.land_area, NO_INFORMATION);

    let plan = ContentPlanner::new(&NullClient)
        .with_date(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap())
        .plan(&facts, "individual investor");

    assert_eq!(plan.len(), 5);
    assert!(plan.slides[0]
        .bullets
        .iter()
        .any(|b| b.contains("individual investor")));
    assert!(plan.slides[1]
        .bullets
        .iter()
        .any(|b| b.contains(NO_INFORMATION)));

    let doc = PptxRenderer::new()
        .render(&plan, &facts.title, "individual investor", OutputFormat::Pptx)
        .unwrap();

    assert_eq!(slide_count(&doc.bytes), 5);
    // Cover (page 1) shows no number; the last content slide is page 5.
    let cover = read_part(&doc.bytes, "ppt/slides/slide1.xml");
    assert!(!cover.contains("<a:t>1</a:t>"));
    let last = read_part(&doc.bytes, "ppt/slides/slide5.xml");
    assert!(last.contains("<a:t>5</a:t>"));
}

#[test]
fn populated_lists_flow_into_fallback_slides() {
    let facts: PropertyFacts = serde_json::from_str(
        r#"{
            "title": "Makiminato 440-tsubo lot",
            "location": "Urasoe City",
            "keyFeatures": ["Main road frontage", "Flat terrain", "Corner lot"],
            "nearbyFacilities": ["Makiminato Station", "Port of Naha"]
        }"#,
    )
    .unwrap();

    let plan = ContentPlanner::new(&NullClient)
        .with_date(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap())
        .plan(&facts, "developer");

    // Real data wins over the generic placeholders.
    assert_eq!(plan.slides[2].bullets.len(), 3);
    assert_eq!(plan.slides[3].bullets.len(), 2);

    let doc = PptxRenderer::new()
        .render(&plan, &facts.title, "developer", OutputFormat::Pptx)
        .unwrap();

    let features = read_part(&doc.bytes, "ppt/slides/slide3.xml");
    assert!(features.contains("Main road frontage"));
    assert!(features.contains("Corner lot"));
    let location = read_part(&doc.bytes, "ppt/slides/slide4.xml");
    assert!(location.contains("Makiminato Station"));
    assert!(location.contains("Port of Naha"));
}

#[test]
fn both_formats_render_from_one_plan() {
    let facts = FactExtractor::new(&NullClient).extract("Price: 1,200,000 yen");
    let plan = ContentPlanner::new(&NullClient)
        .with_date(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap())
        .plan(&facts, "corporate tenant");

    let renderer = PptxRenderer::new();
    let pptx = renderer
        .render(&plan, &facts.title, "corporate tenant", OutputFormat::Pptx)
        .unwrap();
    let odp = renderer
        .render(&plan, &facts.title, "corporate tenant", OutputFormat::Odp)
        .unwrap();

    assert!(!pptx.degraded);
    assert!(odp.degraded);
    assert!(pptx.filename.ends_with(".pptx"));
    assert!(odp.filename.ends_with(".odp"));
    assert_eq!(slide_count(&pptx.bytes), 5);
    assert_eq!(slide_count(&odp.bytes), 5);
}
