//! Natural-language understanding
//!
//! Raw recognition results come from an [`IntentRecognizer`]; [`normalize`]
//! turns them into the typed [`Entity`] list the query builder consumes.

pub mod entity;
pub mod luis;
pub mod recognizer;

pub use entity::{Entity, EntityKind};
pub use luis::{
    normalize, NluResult, RawEntity, Resolution, ScoredIntent, FIND_GENE_INTENT, NONE_INTENT,
};
pub use recognizer::{DisabledRecognizer, IntentRecognizer, LuisRecognizer};
