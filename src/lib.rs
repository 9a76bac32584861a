//! # pmkb-bot
//!
//! Chat bot answering free-text questions with interpretations from the
//! Precision Medicine Knowledge Base.
//!
//! A message is turned into typed entities by an external NLU service, the
//! entities into a search query, and the knowledge-base results are ranked by
//! relevance and rendered as a bounded list of cards.

pub mod bot;
pub mod config;
pub mod error;
pub mod logging;
pub mod nlu;
pub mod pmkb;
pub mod presentation;
pub mod query;
pub mod ranking;
pub mod server;

pub use bot::{Activity, Orchestrator, OutgoingMessage};
pub use config::BotConfig;
pub use error::{Error, Result};
pub use query::{Query, QueryBuilder, QueryPolicy};
pub use ranking::{RankedInterpretation, RankingWeights, RelevanceRanker};
