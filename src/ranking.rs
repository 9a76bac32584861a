//! Relevance ranking of knowledge-base interpretations
//!
//! Each interpretation is scored by case-insensitive containment of its gene,
//! variant, tumor-type and primary-site names in the query, minus a per-tier
//! penalty. Ordering is by descending score and stable for ties.

use serde::{Deserialize, Serialize};

use crate::pmkb::Interpretation;

/// Weights of the linear relevance score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingWeights {
    pub gene: i64,
    pub variant: i64,
    pub tumor_type: i64,
    pub primary_site: i64,
    /// Applied per tier level; negative so that higher tiers rank lower
    pub tier: i64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            gene: 100,
            variant: 50,
            tumor_type: 10,
            primary_site: 10,
            tier: -5,
        }
    }
}

/// Interpretation annotated with its relevance score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedInterpretation<'a> {
    pub interpretation: &'a Interpretation,
    pub relevance_score: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceRanker {
    weights: RankingWeights,
}

impl RelevanceRanker {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    /// Scores one interpretation against the query
    pub fn score(&self, interpretation: &Interpretation, query: &str) -> i64 {
        let query = query.to_lowercase();
        self.score_lowercased(interpretation, &query)
    }

    fn score_lowercased(&self, interpretation: &Interpretation, query: &str) -> i64 {
        let w = &self.weights;
        let gene = if contains_name(query, interpretation.gene_name()) {
            w.gene
        } else {
            0
        };

        // tier comes straight from the gateway and may be any i64
        [
            w.variant
                .saturating_mul(count_matches(interpretation.variant_names(), query)),
            w.tumor_type
                .saturating_mul(count_matches(interpretation.tumor_type_names(), query)),
            w.primary_site
                .saturating_mul(count_matches(interpretation.primary_site_names(), query)),
            w.tier.saturating_mul(interpretation.tier.unwrap_or(0)),
        ]
        .into_iter()
        .fold(gene, i64::saturating_add)
    }

    /// Orders interpretations by descending relevance to the query.
    ///
    /// Equal scores keep their input order.
    pub fn rank<'a>(
        &self,
        interpretations: &'a [Interpretation],
        query: &str,
    ) -> Vec<RankedInterpretation<'a>> {
        let query = query.to_lowercase();
        let mut ranked: Vec<RankedInterpretation<'a>> = interpretations
            .iter()
            .map(|interpretation| RankedInterpretation {
                interpretation,
                relevance_score: self.score_lowercased(interpretation, &query),
            })
            .collect();

        // sort_by is stable
        ranked.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
        ranked
    }
}

/// `query` must already be lowercased. Blank names never match.
fn contains_name(query: &str, name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && query.contains(&name.to_lowercase())
}

fn count_matches<'a>(names: impl Iterator<Item = &'a str>, query: &str) -> i64 {
    names.filter(|name| contains_name(query, name)).count() as i64
}
