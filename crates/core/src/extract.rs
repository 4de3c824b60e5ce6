//! Fact extraction from raw brochure text.
//!
//! The primary path asks the inference service for a JSON object with the
//! exact [`PropertyFacts`] field set. Unavailability, timeouts, and
//! unparsable replies all route to a deterministic pattern-matching
//! fallback; extraction never fails.

use crate::inference::InferenceClient;
use crate::json::extract_json_object;
use crate::types::{PropertyFacts, DEFAULT_TITLE, NO_INFORMATION};
use regex::Regex;
use std::sync::LazyLock;

/// Inference services cap their input; only this many leading characters of
/// the brochure are submitted.
const PROMPT_TEXT_LIMIT: usize = 3000;

/// Bound on the fallback summary prefix.
const SUMMARY_LIMIT: usize = 200;

const EXTRACT_MAX_TOKENS: u32 = 2048;

/// Labeled price, for example "価格：1,200万円" or "Price: 1,200,000 yen".
static PRICE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:価格|price)\s*[：:]\s*([0-9][0-9,.]*\s*(?:億円|万円|円|yen|jpy|usd|million(?:\s+(?:yen|dollars?|usd))?|dollars?))")
        .unwrap()
});

/// Labeled location line.
static LOCATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^.*?(?:所在地|location|address)\s*[：:]\s*(.+)$").unwrap()
});

/// Labeled land area, for example "土地：440坪" or "Land area: 1,455 m2".
static LAND_AREA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:土地面積|土地|land\s*area|land)\s*[：:]\s*([0-9][0-9,.]*\s*(?:坪|㎡|m²|m2|tsubo|sq\.?\s*(?:m|ft)|acres?))")
        .unwrap()
});

/// Turns raw brochure text into fully populated [`PropertyFacts`].
pub struct FactExtractor<'a> {
    client: &'a dyn InferenceClient,
}

impl<'a> FactExtractor<'a> {
    pub fn new(client: &'a dyn InferenceClient) -> Self {
        Self { client }
    }

    /// Extract property facts. Never errors: inference problems and
    /// malformed replies degrade to [`fallback_facts`].
    pub fn extract(&self, text: &str) -> PropertyFacts {
        let prompt = build_prompt(text);

        match self.client.infer(&prompt, EXTRACT_MAX_TOKENS) {
            Ok(reply) => match parse_reply(&reply) {
                Some(facts) => facts,
                None => {
                    log::warn!("inference reply carried no parsable JSON object, using fallback analysis");
                    fallback_facts(text)
                }
            },
            Err(e) => {
                log::warn!("inference failed ({}), using fallback analysis", e);
                fallback_facts(text)
            }
        }
    }
}

fn build_prompt(text: &str) -> String {
    let prefix: String = text.chars().take(PROMPT_TEXT_LIMIT).collect();

    format!(
        r#"The following is the text of a real-estate brochure. Extract the key information and return it as JSON.

Brochure text:
{prefix}

Return a JSON object with exactly this shape:
{{
  "title": "short property title (e.g. Makiminato 440-tsubo lot)",
  "location": "location at the municipality level",
  "price": "asking price",
  "landArea": "land area",
  "buildingArea": "building area, if any",
  "purpose": "zoning / permitted use",
  "summary": "2-3 sentence summary of the property",
  "keyFeatures": ["feature 1", "feature 2", "feature 3"],
  "nearbyFacilities": ["nearby facility 1", "nearby facility 2"],
  "currentStatus": "occupancy status (vacant, tenanted, ...)"
}}"#
    )
}

fn parse_reply(reply: &str) -> Option<PropertyFacts> {
    let json = extract_json_object(reply)?;
    match serde_json::from_str(json) {
        Ok(facts) => Some(facts),
        Err(e) => {
            log::debug!("facts JSON did not deserialize: {}", e);
            None
        }
    }
}

/// Deterministic pattern-matching analysis used when inference is
/// unavailable or unparsable. Every field is populated; unmatched fields
/// carry the fixed placeholder.
fn fallback_facts(text: &str) -> PropertyFacts {
    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    };

    PropertyFacts {
        title: DEFAULT_TITLE.to_string(),
        location: capture(&LOCATION_REGEX).unwrap_or_else(|| NO_INFORMATION.to_string()),
        price: capture(&PRICE_REGEX).unwrap_or_else(|| NO_INFORMATION.to_string()),
        land_area: capture(&LAND_AREA_REGEX).unwrap_or_else(|| NO_INFORMATION.to_string()),
        building_area: NO_INFORMATION.to_string(),
        purpose: NO_INFORMATION.to_string(),
        summary: summary_prefix(text),
        key_features: vec!["See the brochure for details".to_string()],
        nearby_facilities: Vec::new(),
        current_status: NO_INFORMATION.to_string(),
    }
}

/// Bounded prefix of the input, with an ellipsis when truncated.
fn summary_prefix(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= SUMMARY_LIMIT {
        trimmed.to_string()
    } else {
        let prefix: String = trimmed.chars().take(SUMMARY_LIMIT).collect();
        format!("{}...", prefix)
    }
}
