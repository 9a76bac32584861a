//! Search query construction from recognized entities

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::nlu::Entity;

/// What to do when the utterance carries no gene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryPolicy {
    /// Fail with [`Error::MissingGene`]
    #[default]
    Strict,
    /// Search with whatever entities exist; an empty query means "unknown entity"
    Lenient,
}

/// Knowledge-base search query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub value: String,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder {
    policy: QueryPolicy,
}

impl QueryBuilder {
    pub fn new(policy: QueryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> QueryPolicy {
        self.policy
    }

    /// Joins entity texts with single spaces, gene texts first.
    ///
    /// Non-gene texts keep their relative order. Blank texts are skipped.
    pub fn build_query(&self, entities: &[Entity]) -> Result<Query> {
        let usable = || entities.iter().filter(|e| !e.is_blank());

        let has_gene = usable().any(Entity::is_gene);
        if !has_gene && self.policy == QueryPolicy::Strict {
            return Err(Error::MissingGene);
        }

        let value = usable()
            .filter(|e| e.is_gene())
            .chain(usable().filter(|e| !e.is_gene()))
            .map(|e| e.text.trim())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(Query { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_placed_first() {
        let builder = QueryBuilder::default();
        let entities = vec![
            Entity::tumor_type("Adenocarcinoma"),
            Entity::variant("L858R"),
            Entity::gene("EGFR"),
            Entity::tissue_type("Lung"),
        ];
        let query = builder.build_query(&entities).unwrap();
        assert_eq!(query.value, "EGFR Adenocarcinoma L858R Lung");
        assert!(query.value.starts_with("EGFR"));
    }

    #[test]
    fn test_multiple_genes_keep_order() {
        let builder = QueryBuilder::default();
        let entities = vec![
            Entity::variant("fusion"),
            Entity::gene("EML4"),
            Entity::gene("ALK"),
        ];
        let query = builder.build_query(&entities).unwrap();
        assert_eq!(query.value, "EML4 ALK fusion");
    }

    #[test]
    fn test_strict_rejects_empty() {
        let builder = QueryBuilder::new(QueryPolicy::Strict);
        assert!(matches!(builder.build_query(&[]), Err(Error::MissingGene)));
    }

    #[test]
    fn test_strict_rejects_without_gene() {
        let builder = QueryBuilder::new(QueryPolicy::Strict);
        let entities = vec![Entity::variant("V600E"), Entity::gene("   ")];
        assert!(matches!(
            builder.build_query(&entities),
            Err(Error::MissingGene)
        ));
    }

    #[test]
    fn test_lenient_empty_signals_unknown() {
        let builder = QueryBuilder::new(QueryPolicy::Lenient);
        let query = builder.build_query(&[]).unwrap();
        assert!(query.is_empty());
    }

    #[test]
    fn test_lenient_without_gene() {
        let builder = QueryBuilder::new(QueryPolicy::Lenient);
        let entities = vec![Entity::tumor_type("Melanoma"), Entity::variant("V600E")];
        let query = builder.build_query(&entities).unwrap();
        assert_eq!(query.value, "Melanoma V600E");
    }

    #[test]
    fn test_texts_are_trimmed() {
        let builder = QueryBuilder::default();
        let entities = vec![Entity::gene(" BRAF "), Entity::variant("V600E ")];
        assert_eq!(builder.build_query(&entities).unwrap().value, "BRAF V600E");
    }
}
