//! Chat-facing glue: activity shapes and the turn orchestrator

pub mod activity;
pub mod orchestrator;

pub use activity::{Activity, AttachmentLayout, ChannelAccount, OutgoingMessage};
pub use orchestrator::{Orchestrator, SearchOutcome};
