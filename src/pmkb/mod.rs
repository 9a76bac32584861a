//! Precision Medicine Knowledge Base access
//!
//! [`KnowledgeBaseGateway`] is the seam between conversation handling and the
//! network. [`PmkbClient`] implements it over the PMKB REST API.

pub mod client;
pub mod models;

use async_trait::async_trait;

use crate::error::Result;

pub use client::PmkbClient;
pub use models::{
    Gene, GenesResponse, Interpretation, PrimarySite, SearchResponse, SearchResults, TumorType,
    Variant,
};

#[async_trait]
pub trait KnowledgeBaseGateway: Send + Sync {
    /// Searches interpretations matching a free-text query
    async fn search_interpretations(&self, query: &str) -> Result<Vec<Interpretation>>;

    /// Lists every gene known to the knowledge base
    async fn get_genes(&self) -> Result<Vec<Gene>>;

    /// Checks whether the knowledge base answers its health check
    async fn is_alive(&self) -> bool;
}
