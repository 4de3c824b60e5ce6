//! Core domain types, fact extraction, and slide planning for
//! audience-tailored real-estate proposal decks.

pub mod audience;
pub mod error;
pub mod extract;
pub mod inference;
pub mod json;
pub mod plan;
pub mod types;

pub use audience::AudienceProfile;
pub use error::{Error, Result};
pub use extract::FactExtractor;
pub use inference::{InferenceClient, InferenceError, NullClient};
pub use plan::ContentPlanner;
pub use types::{
    OutputFormat, PropertyFacts, ProposalRecord, RenderedDocument, Slide, SlidePlan,
    DEFAULT_TITLE, NO_INFORMATION,
};
