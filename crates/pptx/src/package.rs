//! OOXML package assembly.
//!
//! A .pptx is a ZIP archive with a fixed part layout: content types,
//! package relationships, the presentation part, one part per slide (plus
//! relationship files), a slide master/layout/theme trio, notes parts for
//! slides that carry speaker notes, document properties, and embedded
//! media. Everything here is deterministic given the slide parts and
//! metadata, except the docProps timestamps.

use crate::xmlwriter::SlidePart;
use chrono::Utc;
use proposal_core::{Error, Result};
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>";

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_EXTENDED_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_NOTES_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";
const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const REL_NOTES_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

/// Canvas size in EMU: 10 x 7.5 inches.
const SLIDE_CX: i64 = 9_144_000;
const SLIDE_CY: i64 = 6_858_000;

/// The empty group-shape header every shape tree starts with.
const EMPTY_TREE: &str = "<p:spTree>\
    <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
    <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>\
    <a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\
    </p:spTree>";

const CLR_MAP: &str = "bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" \
    accent1=\"accent1\" accent2=\"accent2\" accent3=\"accent3\" accent4=\"accent4\" \
    accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"";

/// Document-property metadata stamped into docProps parts.
#[derive(Debug, Clone)]
pub struct DocMeta {
    pub title: String,
    pub subject: String,
    pub author: String,
    pub company: String,
}

/// Assemble the full presentation package from encoded slide parts.
pub fn build_package(slides: &[SlidePart], meta: &DocMeta) -> Result<Vec<u8>> {
    let mut zw = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut add = |zw: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, content: &[u8]| -> Result<()> {
        zw.start_file(name, options)
            .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
        zw.write_all(content)
            .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", name, e)))?;
        Ok(())
    };

    // Which notes-slide number each slide maps to, if any.
    let notes_numbers = assign_notes_numbers(slides);
    // Which global media number each slide's first image starts at.
    let media_starts = assign_media_starts(slides);

    add(&mut zw, "[Content_Types].xml", content_types_xml(slides, &notes_numbers).as_bytes())?;
    add(&mut zw, "_rels/.rels", package_rels_xml().as_bytes())?;
    add(&mut zw, "docProps/core.xml", core_props_xml(meta).as_bytes())?;
    add(&mut zw, "docProps/app.xml", app_props_xml(meta, slides.len()).as_bytes())?;

    add(&mut zw, "ppt/presentation.xml", presentation_xml(slides.len()).as_bytes())?;
    add(&mut zw, "ppt/_rels/presentation.xml.rels", presentation_rels_xml(slides.len()).as_bytes())?;

    add(&mut zw, "ppt/slideMasters/slideMaster1.xml", slide_master_xml().as_bytes())?;
    add(&mut zw, "ppt/slideMasters/_rels/slideMaster1.xml.rels", slide_master_rels_xml().as_bytes())?;
    add(&mut zw, "ppt/slideLayouts/slideLayout1.xml", slide_layout_xml().as_bytes())?;
    add(&mut zw, "ppt/slideLayouts/_rels/slideLayout1.xml.rels", slide_layout_rels_xml().as_bytes())?;
    add(&mut zw, "ppt/theme/theme1.xml", theme_xml().as_bytes())?;
    add(&mut zw, "ppt/theme/theme2.xml", theme_xml().as_bytes())?;
    add(&mut zw, "ppt/notesMasters/notesMaster1.xml", notes_master_xml().as_bytes())?;
    add(&mut zw, "ppt/notesMasters/_rels/notesMaster1.xml.rels", notes_master_rels_xml().as_bytes())?;

    for (i, part) in slides.iter().enumerate() {
        let n = i + 1;
        add(&mut zw, &format!("ppt/slides/slide{}.xml", n), part.xml.as_bytes())?;
        add(
            &mut zw,
            &format!("ppt/slides/_rels/slide{}.xml.rels", n),
            slide_rels_xml(part, media_starts[i], notes_numbers[i]).as_bytes(),
        )?;

        for (j, image) in part.images.iter().enumerate() {
            add(&mut zw, &format!("ppt/media/image{}.png", media_starts[i] + j), image)?;
        }

        if let (Some(k), Some(notes)) = (notes_numbers[i], part.notes.as_deref()) {
            add(&mut zw, &format!("ppt/notesSlides/notesSlide{}.xml", k), notes_slide_xml(notes).as_bytes())?;
            add(
                &mut zw,
                &format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", k),
                notes_slide_rels_xml(n).as_bytes(),
            )?;
        }
    }

    let cursor = zw
        .finish()
        .map_err(|e| Error::ZipError(format!("Failed to finalize archive: {}", e)))?;
    Ok(cursor.into_inner())
}

fn assign_notes_numbers(slides: &[SlidePart]) -> Vec<Option<usize>> {
    let mut next = 1;
    slides
        .iter()
        .map(|part| {
            part.notes.as_ref().map(|_| {
                let k = next;
                next += 1;
                k
            })
        })
        .collect()
}

fn assign_media_starts(slides: &[SlidePart]) -> Vec<usize> {
    let mut next = 1;
    slides
        .iter()
        .map(|part| {
            let start = next;
            next += part.images.len();
            start
        })
        .collect()
}

fn content_types_xml(slides: &[SlidePart], notes_numbers: &[Option<usize>]) -> String {
    let mut overrides = String::new();
    for i in 1..=slides.len() {
        overrides.push_str(&format!(
            "<Override PartName=\"/ppt/slides/slide{}.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>",
            i
        ));
    }
    for k in notes_numbers.iter().flatten() {
        overrides.push_str(&format!(
            "<Override PartName=\"/ppt/notesSlides/notesSlide{}.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml\"/>",
            k
        ));
    }

    format!(
        "{XML_DECL}\
         <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Default Extension=\"png\" ContentType=\"image/png\"/>\
         <Override PartName=\"/ppt/presentation.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/>\
         <Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/>\
         <Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>\
         <Override PartName=\"/ppt/notesMasters/notesMaster1.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml\"/>\
         <Override PartName=\"/ppt/theme/theme1.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>\
         <Override PartName=\"/ppt/theme/theme2.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>\
         {overrides}\
         <Override PartName=\"/docProps/core.xml\" \
         ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>\
         <Override PartName=\"/docProps/app.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.extended-properties+xml\"/>\
         </Types>"
    )
}

fn package_rels_xml() -> String {
    format!(
        "{XML_DECL}\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_OFFICE_DOCUMENT}\" Target=\"ppt/presentation.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"{REL_CORE_PROPS}\" Target=\"docProps/core.xml\"/>\
         <Relationship Id=\"rId3\" Type=\"{REL_EXTENDED_PROPS}\" Target=\"docProps/app.xml\"/>\
         </Relationships>"
    )
}

fn core_props_xml(meta: &DocMeta) -> String {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        "{XML_DECL}\
         <cp:coreProperties \
         xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
         xmlns:dcterms=\"http://purl.org/dc/terms/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
         <dc:title>{title}</dc:title>\
         <dc:subject>{subject}</dc:subject>\
         <dc:creator>{author}</dc:creator>\
         <cp:lastModifiedBy>{author}</cp:lastModifiedBy>\
         <dcterms:created xsi:type=\"dcterms:W3CDTF\">{now}</dcterms:created>\
         <dcterms:modified xsi:type=\"dcterms:W3CDTF\">{now}</dcterms:modified>\
         </cp:coreProperties>",
        title = escape(&meta.title),
        subject = escape(&meta.subject),
        author = escape(&meta.author),
    )
}

fn app_props_xml(meta: &DocMeta, slide_count: usize) -> String {
    format!(
        "{XML_DECL}\
         <Properties \
         xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\" \
         xmlns:vt=\"http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes\">\
         <Application>proposal-gen</Application>\
         <Slides>{slide_count}</Slides>\
         <Company>{company}</Company>\
         </Properties>",
        company = escape(&meta.company),
    )
}

fn presentation_xml(slide_count: usize) -> String {
    let mut slide_ids = String::new();
    for i in 0..slide_count {
        slide_ids.push_str(&format!(
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            256 + i,
            3 + i
        ));
    }

    format!(
        "{XML_DECL}\
         <p:presentation xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         <p:notesMasterIdLst><p:notesMasterId r:id=\"rId2\"/></p:notesMasterIdLst>\
         <p:sldIdLst>{slide_ids}</p:sldIdLst>\
         <p:sldSz cx=\"{SLIDE_CX}\" cy=\"{SLIDE_CY}\"/>\
         <p:notesSz cx=\"{SLIDE_CY}\" cy=\"{SLIDE_CX}\"/>\
         </p:presentation>"
    )
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = format!(
        "<Relationship Id=\"rId1\" Type=\"{REL_SLIDE_MASTER}\" Target=\"slideMasters/slideMaster1.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"{REL_NOTES_MASTER}\" Target=\"notesMasters/notesMaster1.xml\"/>"
    );
    for i in 0..slide_count {
        rels.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{REL_SLIDE}\" Target=\"slides/slide{}.xml\"/>",
            3 + i,
            i + 1
        ));
    }

    format!(
        "{XML_DECL}\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         {rels}</Relationships>"
    )
}

fn slide_master_xml() -> String {
    format!(
        "{XML_DECL}\
         <p:sldMaster xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
         <p:cSld>{EMPTY_TREE}</p:cSld>\
         <p:clrMap {CLR_MAP}/>\
         <p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst>\
         </p:sldMaster>"
    )
}

fn slide_master_rels_xml() -> String {
    format!(
        "{XML_DECL}\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_SLIDE_LAYOUT}\" Target=\"../slideLayouts/slideLayout1.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"{REL_THEME}\" Target=\"../theme/theme1.xml\"/>\
         </Relationships>"
    )
}

fn slide_layout_xml() -> String {
    format!(
        "{XML_DECL}\
         <p:sldLayout xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\" type=\"blank\">\
         <p:cSld>{EMPTY_TREE}</p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
         </p:sldLayout>"
    )
}

fn slide_layout_rels_xml() -> String {
    format!(
        "{XML_DECL}\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_SLIDE_MASTER}\" Target=\"../slideMasters/slideMaster1.xml\"/>\
         </Relationships>"
    )
}

fn notes_master_xml() -> String {
    format!(
        "{XML_DECL}\
         <p:notesMaster xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
         <p:cSld>{EMPTY_TREE}</p:cSld>\
         <p:clrMap {CLR_MAP}/>\
         </p:notesMaster>"
    )
}

fn notes_master_rels_xml() -> String {
    format!(
        "{XML_DECL}\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_THEME}\" Target=\"../theme/theme2.xml\"/>\
         </Relationships>"
    )
}

/// Relationships for one slide: its layout, its embedded images (rId2
/// onward, matching the canvas's r:embed ids), and its notes slide.
fn slide_rels_xml(part: &SlidePart, media_start: usize, notes_number: Option<usize>) -> String {
    let mut rels = format!(
        "<Relationship Id=\"rId1\" Type=\"{REL_SLIDE_LAYOUT}\" Target=\"../slideLayouts/slideLayout1.xml\"/>"
    );
    for j in 0..part.images.len() {
        rels.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{REL_IMAGE}\" Target=\"../media/image{}.png\"/>",
            2 + j,
            media_start + j
        ));
    }
    if let Some(k) = notes_number {
        rels.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{REL_NOTES_SLIDE}\" Target=\"../notesSlides/notesSlide{}.xml\"/>",
            2 + part.images.len(),
            k
        ));
    }

    format!(
        "{XML_DECL}\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         {rels}</Relationships>"
    )
}

/// A notes part: the verbatim notes text in the body placeholder, one
/// paragraph per line.
fn notes_slide_xml(notes: &str) -> String {
    let mut paragraphs = String::new();
    for line in notes.lines() {
        paragraphs.push_str(&format!(
            "<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>",
            escape(line)
        ));
    }
    if paragraphs.is_empty() {
        paragraphs.push_str("<a:p/>");
    }

    format!(
        "{XML_DECL}\
         <p:notes xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
         <p:cSld><p:spTree>\
         <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>\
         <a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\
         <p:sp>\
         <p:nvSpPr><p:cNvPr id=\"2\" name=\"Notes Placeholder 1\"/>\
         <p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr>\
         <p:nvPr><p:ph type=\"body\" idx=\"1\"/></p:nvPr></p:nvSpPr>\
         <p:spPr/>\
         <p:txBody><a:bodyPr/>{paragraphs}</p:txBody>\
         </p:sp>\
         </p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
         </p:notes>"
    )
}

fn notes_slide_rels_xml(slide_number: usize) -> String {
    format!(
        "{XML_DECL}\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_NOTES_MASTER}\" Target=\"../notesMasters/notesMaster1.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"{REL_SLIDE}\" Target=\"../slides/slide{slide_number}.xml\"/>\
         </Relationships>"
    )
}

/// A minimal complete Office theme. Both masters reference a copy of it.
fn theme_xml() -> String {
    format!(
        "{XML_DECL}\
         <a:theme xmlns:a=\"{NS_A}\" name=\"Proposal Theme\">\
         <a:themeElements>\
         <a:clrScheme name=\"Proposal\">\
         <a:dk1><a:sysClr val=\"windowText\" lastClr=\"000000\"/></a:dk1>\
         <a:lt1><a:sysClr val=\"window\" lastClr=\"FFFFFF\"/></a:lt1>\
         <a:dk2><a:srgbClr val=\"1F4788\"/></a:dk2>\
         <a:lt2><a:srgbClr val=\"EEECE1\"/></a:lt2>\
         <a:accent1><a:srgbClr val=\"1F4788\"/></a:accent1>\
         <a:accent2><a:srgbClr val=\"C0504D\"/></a:accent2>\
         <a:accent3><a:srgbClr val=\"9BBB59\"/></a:accent3>\
         <a:accent4><a:srgbClr val=\"8064A2\"/></a:accent4>\
         <a:accent5><a:srgbClr val=\"4BACC6\"/></a:accent5>\
         <a:accent6><a:srgbClr val=\"F79646\"/></a:accent6>\
         <a:hlink><a:srgbClr val=\"0000FF\"/></a:hlink>\
         <a:folHlink><a:srgbClr val=\"800080\"/></a:folHlink>\
         </a:clrScheme>\
         <a:fontScheme name=\"Proposal\">\
         <a:majorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>\
         <a:minorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont>\
         </a:fontScheme>\
         <a:fmtScheme name=\"Proposal\">\
         <a:fillStyleLst>\
         <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
         <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
         <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
         </a:fillStyleLst>\
         <a:lnStyleLst>\
         <a:ln w=\"9525\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
         <a:ln w=\"25400\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
         <a:ln w=\"38100\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
         </a:lnStyleLst>\
         <a:effectStyleLst>\
         <a:effectStyle><a:effectLst/></a:effectStyle>\
         <a:effectStyle><a:effectLst/></a:effectStyle>\
         <a:effectStyle><a:effectLst/></a:effectStyle>\
         </a:effectStyleLst>\
         <a:bgFillStyleLst>\
         <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
         <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
         <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
         </a:bgFillStyleLst>\
         </a:fmtScheme>\
         </a:themeElements>\
         </a:theme>"
    )
}
