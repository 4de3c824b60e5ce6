//! Audience-tailored slide planning.
//!
//! The primary path prompts the inference service for 3-5 slides biased by
//! the audience profile's emphasis guidance. Any inference failure or
//! invalid reply degrades to a fixed five-slide archetype built straight
//! from the facts, which is deterministic for a fixed date.

use crate::audience::AudienceProfile;
use crate::inference::InferenceClient;
use crate::json::extract_json_object;
use crate::types::{PropertyFacts, Slide, SlidePlan};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

const PLAN_MAX_TOKENS: u32 = 3072;

/// Slide counts the primary path accepts.
const MIN_SLIDES: usize = 3;
const MAX_SLIDES: usize = 5;

/// Bullets per slide are capped; overlong replies are truncated.
const MAX_BULLETS: usize = 6;

/// Wire shape of the inference reply.
#[derive(Deserialize)]
struct PlanWire {
    slides: Vec<SlideWire>,
}

#[derive(Deserialize)]
struct SlideWire {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: Vec<String>,
    #[serde(default)]
    notes: Option<String>,
}

/// Turns property facts plus an audience description into a [`SlidePlan`].
pub struct ContentPlanner<'a> {
    client: &'a dyn InferenceClient,
    date_override: Option<NaiveDate>,
}

impl<'a> ContentPlanner<'a> {
    pub fn new(client: &'a dyn InferenceClient) -> Self {
        Self {
            client,
            date_override: None,
        }
    }

    /// Pin the proposal date instead of reading the local clock. The
    /// fallback plan embeds the date on its cover, so a fixed date makes it
    /// byte-for-byte reproducible.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date_override = Some(date);
        self
    }

    /// Plan a deck. Never errors: inference problems and invalid replies
    /// degrade to the fixed five-slide archetype.
    pub fn plan(&self, facts: &PropertyFacts, audience: &str) -> SlidePlan {
        let profile = AudienceProfile::classify(audience);
        let prompt = build_prompt(facts, audience, profile);

        match self.client.infer(&prompt, PLAN_MAX_TOKENS) {
            Ok(reply) => match parse_reply(&reply) {
                Some(plan) => plan,
                None => {
                    log::warn!("inference reply was not a usable slide plan, using fallback plan");
                    fallback_plan(facts, audience, self.today())
                }
            },
            Err(e) => {
                log::warn!("inference failed ({}), using fallback plan", e);
                fallback_plan(facts, audience, self.today())
            }
        }
    }

    fn today(&self) -> NaiveDate {
        self.date_override
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

fn build_prompt(facts: &PropertyFacts, audience: &str, profile: AudienceProfile) -> String {
    format!(
        r#"You are a professional who prepares real-estate proposal documents.

Using the property information below, create a proposal deck (3-5 slides) tailored to "{audience}".

[Property information]
- Title: {title}
- Location: {location}
- Price: {price}
- Land area: {land_area}
- Building area: {building_area}
- Zoning: {purpose}
- Summary: {summary}
- Key features: {features}
- Nearby facilities: {facilities}
- Current status: {status}

[Audience characteristics]
{emphasis}

Return 3-5 slides as a JSON object of exactly this shape:
{{
  "slides": [
    {{
      "title": "slide title",
      "content": ["point 1", "point 2", "point 3"],
      "notes": "optional speaker notes"
    }}
  ]
}}

Important:
- Slide 1 is the cover (deck title, property name, audience, date)
- Middle slides address the audience's interests
- The final slide is a summary with next steps
- Each slide's content is 3-5 bullet points
- Put the audience's concerns first"#,
        audience = audience,
        title = facts.title,
        location = facts.location,
        price = facts.price,
        land_area = facts.land_area,
        building_area = facts.building_area,
        purpose = facts.purpose,
        summary = facts.summary,
        features = facts.key_features.join(", "),
        facilities = facts.nearby_facilities.join(", "),
        status = facts.current_status,
        emphasis = profile.emphasis(),
    )
}

/// Parse and validate an inference reply into a plan. `None` means the
/// reply is unusable and the caller should fall back.
fn parse_reply(reply: &str) -> Option<SlidePlan> {
    let json = extract_json_object(reply)?;
    let wire: PlanWire = match serde_json::from_str(json) {
        Ok(wire) => wire,
        Err(e) => {
            log::debug!("plan JSON did not deserialize: {}", e);
            return None;
        }
    };

    if wire.slides.len() < MIN_SLIDES || wire.slides.len() > MAX_SLIDES {
        log::debug!("plan had {} slides, outside [{MIN_SLIDES},{MAX_SLIDES}]", wire.slides.len());
        return None;
    }

    let mut slides = Vec::with_capacity(wire.slides.len());
    for s in wire.slides {
        let mut bullets: Vec<String> = s
            .content
            .into_iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect();
        bullets.truncate(MAX_BULLETS);

        if bullets.is_empty() {
            log::debug!("slide '{}' had no usable bullets", s.title);
            return None;
        }

        slides.push(Slide {
            title: s.title,
            bullets,
            notes: s.notes.filter(|n| !n.trim().is_empty()),
        });
    }

    Some(SlidePlan::new(slides))
}

/// Extracted fact lists feed the fallback slides directly, so they get the
/// same cleanup as inference replies: empty entries dropped, at most
/// [`MAX_BULLETS`] kept.
fn capped_bullets(list: &[String]) -> Vec<String> {
    let mut bullets: Vec<String> = list
        .iter()
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .collect();
    bullets.truncate(MAX_BULLETS);
    bullets
}

/// The fixed five-slide archetype: cover, overview, features, location,
/// next steps. No inference call; deterministic for a fixed date.
fn fallback_plan(facts: &PropertyFacts, audience: &str, date: NaiveDate) -> SlidePlan {
    let cover = Slide::new(
        "Real Estate Investment Proposal",
        vec![
            format!("Property: {}", facts.title),
            format!("Location: {}", facts.location),
            format!("Prepared for: {}", audience),
            format!("Proposal date: {}", date.format("%Y-%m-%d")),
        ],
    );

    let mut overview = Slide::new(
        "Property Overview",
        vec![
            format!("Price: {}", facts.price),
            format!("Land area: {}", facts.land_area),
            format!("Zoning: {}", facts.purpose),
            format!("Current status: {}", facts.current_status),
        ],
    );
    if !facts.summary.is_empty() {
        overview.notes = Some(facts.summary.clone());
    }

    let key_features = capped_bullets(&facts.key_features);
    let features = Slide::new(
        "Key Features",
        if key_features.is_empty() {
            vec!["Please refer to the brochure for details".to_string()]
        } else {
            key_features
        },
    );

    let nearby = capped_bullets(&facts.nearby_facilities);
    let location = Slide::new(
        "Location & Surroundings",
        if nearby.is_empty() {
            vec![
                "Well-connected location".to_string(),
                "Full range of nearby amenities".to_string(),
            ]
        } else {
            nearby
        },
    );

    let next_steps = Slide::new(
        "Summary & Next Steps",
        vec![
            "Schedule an on-site viewing".to_string(),
            "Receive the full property materials".to_string(),
            "Discuss a financing plan".to_string(),
            "Contact us with any questions".to_string(),
        ],
    );

    SlidePlan::new(vec![cover, overview, features, location, next_steps])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{InferenceError, NullClient};

    struct FixedClient(String);

    impl InferenceClient for FixedClient {
        fn infer(&self, _prompt: &str, _max_tokens: u32) -> Result<String, InferenceError> {
            Ok(self.0.clone())
        }
    }

    fn sample_facts() -> PropertyFacts {
        serde_json::from_str(
            r#"{
                "title": "Makiminato 440-tsubo lot",
                "location": "Urasoe City",
                "price": "1,200万円",
                "landArea": "440 tsubo",
                "purpose": "Commercial",
                "summary": "A large roadside lot.",
                "keyFeatures": ["Main road frontage", "Flat terrain", "Corner lot"],
                "nearbyFacilities": ["Makiminato Station", "Port of Naha"],
                "currentStatus": "Vacant"
            }"#,
        )
        .unwrap()
    }

    fn fixed_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    #[test]
    fn test_primary_path_accepts_valid_reply() {
        let reply = r#"Here is your deck:
{"slides": [
  {"title": "Cover", "content": ["Makiminato 440-tsubo lot", "For investors"]},
  {"title": "Returns", "content": ["High yield", "Stable cash flow"], "notes": "Emphasize yield."},
  {"title": "Next steps", "content": ["Visit the site"]}
]}"#;
        let client = FixedClient(reply.to_string());
        let plan = ContentPlanner::new(&client).plan(&sample_facts(), "individual investor");
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.slides[1].notes.as_deref(), Some("Emphasize yield."));
    }

    #[test]
    fn test_primary_path_caps_bullets() {
        let reply = r#"{"slides": [
  {"title": "A", "content": ["1", "2", "3", "4", "5", "6", "7", "8"]},
  {"title": "B", "content": ["1"]},
  {"title": "C", "content": ["1"]}
]}"#;
        let client = FixedClient(reply.to_string());
        let plan = ContentPlanner::new(&client).plan(&sample_facts(), "investor");
        assert_eq!(plan.slides[0].bullets.len(), 6);
    }

    #[test]
    fn test_too_few_slides_falls_back() {
        let reply = r#"{"slides": [{"title": "Only one", "content": ["x"]}]}"#;
        let client = FixedClient(reply.to_string());
        let plan = ContentPlanner::new(&client)
            .with_date(fixed_date())
            .plan(&sample_facts(), "investor");
        assert_eq!(plan.len(), 5);
        assert_eq!(plan.slides[0].title, "Real Estate Investment Proposal");
    }

    #[test]
    fn test_empty_bullets_fall_back() {
        let reply = r#"{"slides": [
  {"title": "A", "content": ["ok"]},
  {"title": "B", "content": ["  ", ""]},
  {"title": "C", "content": ["ok"]}
]}"#;
        let client = FixedClient(reply.to_string());
        let plan = ContentPlanner::new(&client)
            .with_date(fixed_date())
            .plan(&sample_facts(), "investor");
        assert_eq!(plan.len(), 5);
    }

    #[test]
    fn test_fallback_archetype_order() {
        let plan = ContentPlanner::new(&NullClient)
            .with_date(fixed_date())
            .plan(&sample_facts(), "individual investor");

        assert_eq!(plan.len(), 5);
        assert_eq!(plan.slides[0].title, "Real Estate Investment Proposal");
        assert_eq!(plan.slides[1].title, "Property Overview");
        assert_eq!(plan.slides[2].title, "Key Features");
        assert_eq!(plan.slides[3].title, "Location & Surroundings");
        assert_eq!(plan.slides[4].title, "Summary & Next Steps");

        // Cover mentions the audience and the pinned date.
        assert!(plan.slides[0]
            .bullets
            .iter()
            .any(|b| b.contains("individual investor")));
        assert!(plan.slides[0]
            .bullets
            .iter()
            .any(|b| b.contains("2026-08-01")));

        // Summary rides along as overview notes.
        assert_eq!(plan.slides[1].notes.as_deref(), Some("A large roadside lot."));
    }

    #[test]
    fn test_fallback_uses_real_lists_when_present() {
        let plan = ContentPlanner::new(&NullClient)
            .with_date(fixed_date())
            .plan(&sample_facts(), "investor");

        assert_eq!(plan.slides[2].bullets.len(), 3);
        assert_eq!(plan.slides[3].bullets.len(), 2);
        assert_eq!(plan.slides[3].bullets[0], "Makiminato Station");
    }

    #[test]
    fn test_fallback_placeholders_for_empty_lists() {
        let facts: PropertyFacts = serde_json::from_str("{}").unwrap();
        let plan = ContentPlanner::new(&NullClient)
            .with_date(fixed_date())
            .plan(&facts, "anyone");

        assert_eq!(plan.slides[2].bullets.len(), 1);
        assert_eq!(plan.slides[3].bullets.len(), 2);
        // Empty summary means no overview notes.
        assert!(plan.slides[1].notes.is_none());
    }

    #[test]
    fn test_fallback_caps_long_fact_lists() {
        // A successful extraction can carry more features than a slide may
        // hold; the fallback slides apply the same cap as parsed replies.
        let mut facts = sample_facts();
        facts.key_features = (1..=9).map(|i| format!("Feature {}", i)).collect();
        facts.nearby_facilities = vec![
            "Station".to_string(),
            "   ".to_string(),
            "Port".to_string(),
        ];

        let plan = ContentPlanner::new(&NullClient)
            .with_date(fixed_date())
            .plan(&facts, "investor");

        assert_eq!(plan.slides[2].bullets.len(), MAX_BULLETS);
        assert_eq!(plan.slides[2].bullets[0], "Feature 1");
        // Blank entries are dropped, not rendered as empty bullets.
        assert_eq!(plan.slides[3].bullets, vec!["Station", "Port"]);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let facts = sample_facts();
        let a = ContentPlanner::new(&NullClient)
            .with_date(fixed_date())
            .plan(&facts, "investor");
        let b = ContentPlanner::new(&NullClient)
            .with_date(fixed_date())
            .plan(&facts, "investor");
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_plan_length_bounds() {
        // Six slides is out of contract and must fall back to five.
        let reply = r#"{"slides": [
  {"title": "1", "content": ["x"]}, {"title": "2", "content": ["x"]},
  {"title": "3", "content": ["x"]}, {"title": "4", "content": ["x"]},
  {"title": "5", "content": ["x"]}, {"title": "6", "content": ["x"]}
]}"#;
        let client = FixedClient(reply.to_string());
        let plan = ContentPlanner::new(&client)
            .with_date(fixed_date())
            .plan(&sample_facts(), "investor");
        assert_eq!(plan.len(), 5);
        assert_eq!(plan.slides[0].title, "Real Estate Investment Proposal");
    }
}
