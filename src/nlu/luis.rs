//! NLU service response model and entity normalization
//!
//! The recognizer answers in the LUIS v2 shape. Every field is optional on the
//! wire; this module is the only place that sees the raw shape. Everything
//! downstream works on [`Entity`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::entity::{Entity, EntityKind};

/// Intent name the orchestrator answers with a knowledge-base search
pub const FIND_GENE_INTENT: &str = "findGene";

/// Intent name the service uses when nothing matched
pub const NONE_INTENT: &str = "None";

/// Raw recognition result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NluResult {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub top_scoring_intent: Option<ScoredIntent>,
    #[serde(default)]
    pub intents: Vec<ScoredIntent>,
    #[serde(default)]
    pub entities: Vec<RawEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredIntent {
    pub intent: String,
    #[serde(default)]
    pub score: f64,
}

/// Entity as reported by the NLU service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntity {
    /// Matched text
    #[serde(default)]
    pub entity: String,
    /// Declared type name
    #[serde(rename = "type", default)]
    pub entity_type: String,
    #[serde(default)]
    pub start_index: usize,
    #[serde(default)]
    pub end_index: usize,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub resolution: Option<Resolution>,
}

/// Canonical values the service resolved the match to
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resolution {
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl Resolution {
    /// First non-blank resolved string value
    pub fn resolved_value(&self) -> Option<&str> {
        self.values
            .iter()
            .chain(self.value.iter())
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .find(|v| !v.is_empty())
    }
}

impl RawEntity {
    pub fn resolved_value(&self) -> Option<&str> {
        self.resolution.as_ref().and_then(Resolution::resolved_value)
    }
}

impl NluResult {
    /// Name of the best intent, unless it is the "None" intent
    pub fn top_intent(&self) -> Option<&ScoredIntent> {
        self.top_scoring_intent
            .as_ref()
            .or_else(|| {
                self.intents
                    .iter()
                    .max_by(|a, b| a.score.total_cmp(&b.score))
            })
            .filter(|i| !i.intent.is_empty() && i.intent != NONE_INTENT)
    }

    /// Checks whether the utterance asks for a gene lookup
    pub fn is_find_gene(&self) -> bool {
        self.top_intent()
            .map(|i| i.intent.eq_ignore_ascii_case(FIND_GENE_INTENT))
            .unwrap_or(false)
    }
}

/// Normalizes the raw recognition result into typed entities.
///
/// Entities without a resolved value and entities of unknown type are dropped.
/// Order of the service's entity list is preserved. Entity text is the matched
/// surface text.
pub fn normalize(result: &NluResult) -> Vec<Entity> {
    result
        .entities
        .iter()
        .filter_map(|raw| {
            let Some(value) = raw.resolved_value() else {
                debug!(entity = %raw.entity, "dropping unresolved entity");
                return None;
            };
            let Some(kind) = EntityKind::from_type_name(&raw.entity_type) else {
                debug!(entity_type = %raw.entity_type, "dropping entity of unknown type");
                return None;
            };
            // surface text as typed; the resolved value only stands in when it is blank
            let text = match raw.entity.trim() {
                "" => value,
                surface => surface,
            };
            Some(Entity::new(kind, text).with_span(raw.start_index, raw.end_index))
        })
        .collect()
}
