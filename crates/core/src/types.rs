//! Domain types for the extraction → planning → rendering pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder carried by facts that could not be recovered from the text.
pub const NO_INFORMATION: &str = "No information";

/// Default title when the brochure text yields none.
pub const DEFAULT_TITLE: &str = "Property listing";

/// Structured facts extracted from a property brochure.
///
/// Every field is always populated: unrecoverable fields carry
/// [`NO_INFORMATION`] rather than being absent. Wire names match the JSON
/// shape requested from the inference service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyFacts {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "no_information")]
    pub location: String,

    #[serde(default = "no_information")]
    pub price: String,

    #[serde(rename = "landArea", default = "no_information")]
    pub land_area: String,

    #[serde(rename = "buildingArea", default = "no_information")]
    pub building_area: String,

    /// Zoning / permitted use.
    #[serde(default = "no_information")]
    pub purpose: String,

    #[serde(default)]
    pub summary: String,

    #[serde(rename = "keyFeatures", default)]
    pub key_features: Vec<String>,

    #[serde(rename = "nearbyFacilities", default)]
    pub nearby_facilities: Vec<String>,

    /// Occupancy status (vacant, tenanted, and so on).
    #[serde(rename = "currentStatus", default = "no_information")]
    pub current_status: String,
}

fn no_information() -> String {
    NO_INFORMATION.to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

/// A single planned slide: title, 1-6 bullets, optional speaker notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub bullets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Slide {
    /// Create a slide without notes.
    pub fn new(title: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            title: title.into(),
            bullets,
            notes: None,
        }
    }

    /// Create a slide with speaker notes.
    pub fn with_notes(title: impl Into<String>, bullets: Vec<String>, notes: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            bullets,
            notes: Some(notes.into()),
        }
    }
}

/// Ordered slide content for one deck, independent of any binary format.
///
/// The first slide is always the cover; all others are content slides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlidePlan {
    pub slides: Vec<Slide>,
}

impl SlidePlan {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// The output encoding a render request may specify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// OOXML presentation (.pptx) - the primary, faithfully encoded format.
    Pptx,
    /// OpenDocument presentation (.odp) - secondary, best effort.
    Odp,
}

impl OutputFormat {
    /// Parse a caller-supplied format name.
    ///
    /// This is the one hard-error boundary of the pipeline: every other
    /// failure mode degrades, an unrecognized format is rejected.
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "pptx" => Ok(Self::Pptx),
            "odp" => Ok(Self::Odp),
            other => Err(crate::Error::UnsupportedFormat(other.to_string())),
        }
    }

    /// Detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::parse(ext).ok()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pptx => "pptx",
            Self::Odp => "odp",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            Self::Odp => "application/vnd.oasis.opendocument.presentation",
        }
    }
}

/// A rendered presentation: opaque bytes plus delivery metadata.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    /// Suggested download filename, including extension.
    pub filename: String,
    /// True when the requested format was satisfied by reusing the primary
    /// encoder's bytes instead of a dedicated encoder.
    pub degraded: bool,
}

/// The stable shape handed to the downstream persistence collaborator for
/// each generated deck. The core only produces this record; storing and
/// retrieving it is external.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub id: String,
    pub source_filename: String,
    pub audience: String,
    pub property_title: String,
    pub property_location: String,
    pub property_price: String,
    pub property_summary: String,
    /// The slide plan serialized as JSON text.
    pub plan_json: String,
    pub format: OutputFormat,
    pub created_at: DateTime<Utc>,
}

impl ProposalRecord {
    /// Assemble a record from the pipeline's outputs.
    pub fn new(
        source_filename: impl Into<String>,
        audience: impl Into<String>,
        facts: &PropertyFacts,
        plan: &SlidePlan,
        format: OutputFormat,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_filename: source_filename.into(),
            audience: audience.into(),
            property_title: facts.title.clone(),
            property_location: facts.location.clone(),
            property_price: facts.price.clone(),
            property_summary: facts.summary.clone(),
            plan_json: serde_json::to_string(plan).unwrap_or_default(),
            format,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_formats() {
        assert_eq!(OutputFormat::parse("pptx").unwrap(), OutputFormat::Pptx);
        assert_eq!(OutputFormat::parse("PPTX").unwrap(), OutputFormat::Pptx);
        assert_eq!(OutputFormat::parse("odp").unwrap(), OutputFormat::Odp);
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        let err = OutputFormat::parse("docx").unwrap_err();
        assert!(matches!(err, crate::Error::UnsupportedFormat(_)));
        assert!(OutputFormat::parse("").is_err());
    }

    #[test]
    fn test_facts_deserialize_with_missing_fields() {
        let facts: PropertyFacts = serde_json::from_str("{}").unwrap();
        assert_eq!(facts.title, DEFAULT_TITLE);
        assert_eq!(facts.location, NO_INFORMATION);
        assert_eq!(facts.price, NO_INFORMATION);
        assert_eq!(facts.land_area, NO_INFORMATION);
        assert!(facts.key_features.is_empty());
        assert!(facts.nearby_facilities.is_empty());
        assert_eq!(facts.summary, "");
    }

    #[test]
    fn test_facts_wire_names() {
        let json = r#"{
            "title": "Makiminato 440-tsubo lot",
            "landArea": "440 tsubo",
            "keyFeatures": ["Corner lot"],
            "currentStatus": "Vacant"
        }"#;
        let facts: PropertyFacts = serde_json::from_str(json).unwrap();
        assert_eq!(facts.land_area, "440 tsubo");
        assert_eq!(facts.key_features, vec!["Corner lot"]);
        assert_eq!(facts.current_status, "Vacant");
    }

    #[test]
    fn test_record_carries_plan_json() {
        let facts: PropertyFacts = serde_json::from_str("{}").unwrap();
        let plan = SlidePlan::new(vec![Slide::new("Cover", vec!["a".into()])]);
        let record = ProposalRecord::new("brochure.txt", "investor", &facts, &plan, OutputFormat::Pptx);
        assert!(record.plan_json.contains("Cover"));
        assert_eq!(record.format, OutputFormat::Pptx);
        assert!(!record.id.is_empty());
    }
}
