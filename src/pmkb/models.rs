//! Knowledge-base API payloads
//!
//! Optional and missing fields default at deserialization so that ranking and
//! rendering never see a partial record.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gene: Option<Gene>,
    #[serde(default)]
    pub partner_gene: Option<Gene>,
    #[serde(default)]
    pub variant_type: Option<String>,
    #[serde(default)]
    pub description_type: Option<String>,
    #[serde(default)]
    pub cnv_type: Option<String>,
    #[serde(default)]
    pub chromosome_based_cnv: bool,
    #[serde(default)]
    pub germline: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TumorType {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// Tissue an interpretation applies to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimarySite {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub gene: Option<Gene>,
    #[serde(rename = "interpretation", default)]
    pub text: String,
    #[serde(default)]
    pub tier: Option<i64>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(rename = "tumors", default)]
    pub tumor_types: Vec<TumorType>,
    #[serde(rename = "tissues", default)]
    pub primary_sites: Vec<PrimarySite>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Interpretation {
    /// Gene name, empty when the record has none
    pub fn gene_name(&self) -> &str {
        self.gene.as_ref().map(|g| g.name.as_str()).unwrap_or("")
    }

    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.name.as_str())
    }

    pub fn tumor_type_names(&self) -> impl Iterator<Item = &str> {
        self.tumor_types.iter().map(|t| t.name.as_str())
    }

    pub fn primary_site_names(&self) -> impl Iterator<Item = &str> {
        self.primary_sites.iter().map(|s| s.name.as_str())
    }
}

/// Paging metadata; passed through untouched
pub type Meta = serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub interpretations: Vec<Interpretation>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub results: SearchResults,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenesResponse {
    #[serde(default)]
    pub genes: Vec<Gene>,
    #[serde(default)]
    pub meta: Option<Meta>,
}
