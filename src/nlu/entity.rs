//! Typed entities recognized in a chat utterance

use serde::{Deserialize, Serialize};

/// Entity kind classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Gene symbol (e.g. EGFR)
    Gene,
    /// Variant name (e.g. V600E)
    Variant,
    /// Tumor type (e.g. Adenocarcinoma)
    TumorType,
    /// Tissue or primary site (e.g. Lung)
    TissueType,
}

impl EntityKind {
    /// Resolves the type string declared by the NLU service.
    ///
    /// Unknown names yield `None`.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let name = name.trim();
        [
            EntityKind::Gene,
            EntityKind::Variant,
            EntityKind::TumorType,
            EntityKind::TissueType,
        ]
        .into_iter()
        .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }

    /// Type string as declared in the NLU model
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Gene => "Gene",
            EntityKind::Variant => "Variant",
            EntityKind::TumorType => "TumorType",
            EntityKind::TissueType => "TissueType",
        }
    }
}

/// Represents a recognized entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    /// Entity kind
    pub kind: EntityKind,
    /// Entity text used for searching
    pub text: String,
    /// Start position in the utterance
    pub start_index: usize,
    /// End position in the utterance (inclusive)
    pub end_index: usize,
}

impl Entity {
    /// Creates a new entity without position information
    pub fn new(kind: EntityKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            start_index: 0,
            end_index: 0,
        }
    }

    /// Sets the span of the entity in the utterance
    pub fn with_span(mut self, start_index: usize, end_index: usize) -> Self {
        self.start_index = start_index;
        self.end_index = end_index;
        self
    }

    pub fn gene(text: impl Into<String>) -> Self {
        Self::new(EntityKind::Gene, text)
    }

    pub fn variant(text: impl Into<String>) -> Self {
        Self::new(EntityKind::Variant, text)
    }

    pub fn tumor_type(text: impl Into<String>) -> Self {
        Self::new(EntityKind::TumorType, text)
    }

    pub fn tissue_type(text: impl Into<String>) -> Self {
        Self::new(EntityKind::TissueType, text)
    }

    /// Checks if this is a gene entity
    pub fn is_gene(&self) -> bool {
        self.kind == EntityKind::Gene
    }

    /// Checks if the text carries nothing searchable
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
