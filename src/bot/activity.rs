//! Chat activity and reply shapes exchanged over the webhook

use serde::{Deserialize, Serialize};

use crate::presentation::PresentationCard;

pub const MESSAGE: &str = "message";
pub const CONVERSATION_UPDATE: &str = "conversationUpdate";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Incoming chat event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type", default)]
    pub activity_type: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub members_added: Vec<ChannelAccount>,
    #[serde(default)]
    pub recipient: Option<ChannelAccount>,
}

impl Activity {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            activity_type: MESSAGE.to_string(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn members_joined(members: Vec<ChannelAccount>, bot: ChannelAccount) -> Self {
        Self {
            activity_type: CONVERSATION_UPDATE.to_string(),
            members_added: members,
            recipient: Some(bot),
            ..Self::default()
        }
    }

    pub fn is_message(&self) -> bool {
        self.activity_type.eq_ignore_ascii_case(MESSAGE)
    }

    pub fn is_conversation_update(&self) -> bool {
        self.activity_type.eq_ignore_ascii_case(CONVERSATION_UPDATE)
    }

    /// Members added by this update, the bot itself excluded
    pub fn new_members(&self) -> impl Iterator<Item = &ChannelAccount> {
        let bot_id = self.recipient.as_ref().map(|r| r.id.as_str());
        self.members_added
            .iter()
            .filter(move |m| Some(m.id.as_str()) != bot_id)
    }
}

/// How a client lays out several cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentLayout {
    #[default]
    List,
    Carousel,
}

/// One reply sent back to the chat client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub cards: Vec<PresentationCard>,
    #[serde(default)]
    pub attachment_layout: AttachmentLayout,
    /// Quick replies offered as buttons
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn card(card: PresentationCard) -> Self {
        Self {
            cards: vec![card],
            ..Self::default()
        }
    }

    pub fn carousel(text: impl Into<String>, cards: Vec<PresentationCard>) -> Self {
        Self {
            text: text.into(),
            cards,
            attachment_layout: AttachmentLayout::Carousel,
            suggested_actions: Vec::new(),
        }
    }

    pub fn with_suggested_actions(mut self, actions: Vec<String>) -> Self {
        self.suggested_actions = actions;
        self
    }
}
