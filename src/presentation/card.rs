use serde::{Deserialize, Serialize};

/// What a card was rendered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Interpretation,
    Overflow,
    Genes,
    Disclaimer,
    GettingStarted,
}

/// Channel-independent rich card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationCard {
    pub kind: CardKind,
    pub title: String,
    pub subtitle: String,
    pub body_text: String,
    /// Absolute image URL, empty when the card has no image
    pub image_ref: String,
    /// Label of the card button
    pub action_title: String,
    /// Target of both the button and a tap on the card
    pub action_url: String,
}

impl PresentationCard {
    pub fn new(kind: CardKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            subtitle: String::new(),
            body_text: String::new(),
            image_ref: String::new(),
            action_title: String::new(),
            action_url: String::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_body(mut self, body_text: impl Into<String>) -> Self {
        self.body_text = body_text.into();
        self
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = image_ref.into();
        self
    }

    pub fn with_action(mut self, title: impl Into<String>, url: impl Into<String>) -> Self {
        self.action_title = title.into();
        self.action_url = url.into();
        self
    }

    pub fn is_overflow(&self) -> bool {
        self.kind == CardKind::Overflow
    }
}

/// Cards answering one search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationResult {
    pub cards: Vec<PresentationCard>,
    /// Number of interpretations before capping
    pub total: usize,
}

impl PresentationResult {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.cards.last().map(PresentationCard::is_overflow).unwrap_or(false)
    }
}
