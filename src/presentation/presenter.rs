use std::sync::Arc;

use super::card::{CardKind, PresentationCard, PresentationResult};
use super::images::{asset_url, ImageSelector, RandomImagePool};
use super::prompts::PromptCatalog;
use crate::config::BotConfig;
use crate::pmkb::{Gene, Interpretation};
use crate::ranking::RankedInterpretation;

/// Maps ranked interpretations to a capped list of cards
#[derive(Clone)]
pub struct ResultPresenter {
    max_cards: usize,
    list_limit: usize,
    site_url: String,
    asset_host: String,
    disclaimer_image: String,
    getting_started_image: String,
    prompts: Arc<PromptCatalog>,
    images: Arc<dyn ImageSelector>,
}

impl std::fmt::Debug for ResultPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultPresenter")
            .field("max_cards", &self.max_cards)
            .field("list_limit", &self.list_limit)
            .field("site_url", &self.site_url)
            .finish_non_exhaustive()
    }
}

impl ResultPresenter {
    /// Builds a presenter with the random illustration pool from the config
    pub fn from_config(config: &BotConfig, prompts: Arc<PromptCatalog>) -> Self {
        let presentation = &config.presentation;
        let images = RandomImagePool::new(&presentation.asset_host, &presentation.card_images);

        let mut site_url = config.pmkb.site_url.trim().to_string();
        if !site_url.ends_with('/') {
            site_url.push('/');
        }

        Self {
            max_cards: presentation.max_cards,
            list_limit: presentation.list_limit.max(1),
            site_url,
            asset_host: presentation.asset_host.clone(),
            disclaimer_image: presentation.disclaimer_image.clone(),
            getting_started_image: presentation.getting_started_image.clone(),
            prompts,
            images: Arc::new(images),
        }
    }

    /// Replaces the illustration strategy
    pub fn with_images(mut self, images: Arc<dyn ImageSelector>) -> Self {
        self.images = images;
        self
    }

    pub fn with_max_cards(mut self, max_cards: usize) -> Self {
        self.max_cards = max_cards;
        self
    }

    pub fn max_cards(&self) -> usize {
        self.max_cards
    }

    /// Renders ranked results, replacing the last slot with an overflow card
    /// when there are more results than `max_cards`.
    pub fn present(&self, ranked: &[RankedInterpretation<'_>], query: &str) -> PresentationResult {
        let total = ranked.len();

        let cards = if total <= self.max_cards {
            ranked
                .iter()
                .map(|r| self.interpretation_card(r.interpretation))
                .collect()
        } else if self.max_cards == 0 {
            Vec::new()
        } else {
            ranked
                .iter()
                .take(self.max_cards - 1)
                .map(|r| self.interpretation_card(r.interpretation))
                .chain(std::iter::once(self.overflow_card(query, total)))
                .collect()
        };

        PresentationResult { cards, total }
    }

    pub fn interpretation_card(&self, interpretation: &Interpretation) -> PresentationCard {
        let p = &self.prompts;
        let title = match interpretation.tier {
            Some(tier) => format!("Tier {} {}", tier, p.interpretation),
            None => p.interpretation.clone(),
        };

        let subtitle = [
            format!("{}: {}", p.gene, interpretation.gene_name()),
            format!(
                "{}: {}",
                p.variants,
                self.summarize(interpretation.variant_names())
            ),
            format!(
                "{}: {}",
                p.tumor_types,
                self.summarize(interpretation.tumor_type_names())
            ),
            format!(
                "{}: {}",
                p.primary_sites,
                self.summarize(interpretation.primary_site_names())
            ),
        ]
        .join("\n");

        PresentationCard::new(CardKind::Interpretation, title)
            .with_subtitle(subtitle)
            .with_body(interpretation.text.clone())
            .with_image(self.images.select())
            .with_action(
                p.read_more.clone(),
                format!("{}therapies/{}", self.site_url, interpretation.id),
            )
    }

    pub fn overflow_card(&self, query: &str, total: usize) -> PresentationCard {
        let p = &self.prompts;
        PresentationCard::new(
            CardKind::Overflow,
            format!("{} {}", p.interpretations_for, query),
        )
        .with_body(format!(
            "{} {} {}",
            p.there_are, total, p.interpretations_in_total
        ))
        .with_image(self.images.select())
        .with_action(p.read_more.clone(), self.search_url(query))
    }

    /// Deep link to the knowledge-base search page for `query`
    pub fn search_url(&self, query: &str) -> String {
        let terms = query
            .split_whitespace()
            .map(|term| urlencoding::encode(term).into_owned())
            .collect::<Vec<_>>()
            .join("+");
        format!("{}search?utf8=%E2%9C%93&search={}", self.site_url, terms)
    }

    /// Alphabetical list of every gene, with the count as subtitle
    pub fn genes_card(&self, genes: &[Gene]) -> PresentationCard {
        let mut names: Vec<&str> = genes.iter().map(|g| g.name.as_str()).collect();
        names.sort_unstable();

        PresentationCard::new(CardKind::Genes, self.prompts.genes_title.clone())
            .with_subtitle(genes.len().to_string())
            .with_body(names.join(", "))
    }

    pub fn disclaimer_card(&self) -> PresentationCard {
        let p = &self.prompts;
        PresentationCard::new(CardKind::Disclaimer, p.disclaimer_title.clone())
            .with_subtitle(p.bot_name.clone())
            .with_body(p.disclaimer_text.clone())
            .with_image(asset_url(&self.asset_host, &self.disclaimer_image))
            .with_action(p.visit_website.clone(), self.site_url.clone())
    }

    pub fn getting_started_card(&self) -> PresentationCard {
        let p = &self.prompts;
        PresentationCard::new(CardKind::GettingStarted, p.getting_started_title.clone())
            .with_subtitle(p.bot_name.clone())
            .with_body(p.examples_text())
            .with_image(asset_url(&self.asset_host, &self.getting_started_image))
    }

    /// Comma-separated names capped at `list_limit`, with an "and N others" tail
    fn summarize<'a>(&self, names: impl Iterator<Item = &'a str>) -> String {
        let names: Vec<&str> = names.filter(|n| !n.trim().is_empty()).collect();
        let shown = names
            .iter()
            .take(self.list_limit)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");

        match names.len().saturating_sub(self.list_limit) {
            0 => shown,
            hidden => format!("{} and {} {}", shown, hidden, self.prompts.others),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pmkb::{TumorType, Variant};
    use crate::presentation::FixedImage;
    use crate::ranking::RelevanceRanker;

    fn presenter() -> ResultPresenter {
        let mut config = BotConfig::default();
        config.pmkb.site_url = "https://pmkb.example.org".to_string();
        ResultPresenter::from_config(&config, Arc::new(PromptCatalog::default()))
            .with_images(Arc::new(FixedImage("http://img/x.jpg".to_string())))
    }

    fn egfr(id: i64) -> Interpretation {
        Interpretation {
            id,
            gene: Some(Gene {
                id: 1,
                name: "EGFR".to_string(),
            }),
            text: format!("interpretation {}", id),
            tier: Some(1),
            ..Interpretation::default()
        }
    }

    #[test]
    fn test_interpretation_card_fields() {
        let mut interpretation = egfr(42);
        interpretation.variants = vec![Variant {
            name: "L858R".to_string(),
            ..Variant::default()
        }];
        let card = presenter().interpretation_card(&interpretation);

        assert_eq!(card.kind, CardKind::Interpretation);
        assert_eq!(card.title, "Tier 1 Interpretation");
        assert_eq!(
            card.subtitle,
            "Gene: EGFR\nVariants: L858R\nTumor Types: \nPrimary Sites: "
        );
        assert_eq!(card.body_text, "interpretation 42");
        assert_eq!(card.image_ref, "http://img/x.jpg");
        assert_eq!(card.action_title, "Read more");
        assert_eq!(card.action_url, "https://pmkb.example.org/therapies/42");
    }

    #[test]
    fn test_long_lists_are_capped() {
        let mut interpretation = egfr(1);
        interpretation.tumor_types = (0..13)
            .map(|n| TumorType {
                id: n,
                name: format!("T{}", n),
            })
            .collect();
        let card = presenter().interpretation_card(&interpretation);
        assert!(card
            .subtitle
            .contains("Tumor Types: T0, T1, T2, T3, T4, T5, T6, T7, T8, T9 and 3 others"));
    }

    #[test]
    fn test_untiered_card_title() {
        let mut interpretation = egfr(1);
        interpretation.tier = None;
        interpretation.gene = None;
        let card = presenter().interpretation_card(&interpretation);
        assert_eq!(card.title, "Interpretation");
        assert!(card.subtitle.starts_with("Gene: \n"));
    }

    #[test]
    fn test_present_without_overflow() {
        let items: Vec<Interpretation> = (1..=3).map(egfr).collect();
        let ranked = RelevanceRanker::default().rank(&items, "EGFR");
        let result = presenter().present(&ranked, "EGFR");
        assert_eq!(result.len(), 3);
        assert_eq!(result.total, 3);
        assert!(!result.is_truncated());
    }

    #[test]
    fn test_present_exactly_max_cards() {
        let items: Vec<Interpretation> = (1..=10).map(egfr).collect();
        let ranked = RelevanceRanker::default().rank(&items, "EGFR");
        let result = presenter().present(&ranked, "EGFR");
        assert_eq!(result.len(), 10);
        assert!(result.cards.iter().all(|c| !c.is_overflow()));
    }

    #[test]
    fn test_present_with_overflow() {
        let items: Vec<Interpretation> = (1..=11).map(egfr).collect();
        let ranked = RelevanceRanker::default().rank(&items, "EGFR");
        let result = presenter().present(&ranked, "EGFR");
        assert_eq!(result.len(), 10);
        assert!(result.is_truncated());
        let overflow = result.cards.last().unwrap();
        assert_eq!(overflow.title, "Interpretations for EGFR");
        assert_eq!(overflow.body_text, "There are 11 interpretations in total, read more");
    }

    #[test]
    fn test_present_small_caps() {
        let items: Vec<Interpretation> = (1..=3).map(egfr).collect();
        let ranked = RelevanceRanker::default().rank(&items, "EGFR");

        let single = presenter().with_max_cards(1).present(&ranked, "EGFR");
        assert_eq!(single.len(), 1);
        assert!(single.cards[0].is_overflow());

        let none = presenter().with_max_cards(0).present(&ranked, "EGFR");
        assert!(none.is_empty());
        assert_eq!(none.total, 3);
    }

    #[test]
    fn test_search_url_encoding() {
        let p = presenter();
        assert_eq!(
            p.search_url("EGFR lung  cancer"),
            "https://pmkb.example.org/search?utf8=%E2%9C%93&search=EGFR+lung+cancer"
        );
        assert!(p.search_url("BCR/ABL1").ends_with("search=BCR%2FABL1"));
    }

    #[test]
    fn test_genes_card_sorted() {
        let genes = vec![
            Gene {
                id: 2,
                name: "KRAS".to_string(),
            },
            Gene {
                id: 1,
                name: "ALK".to_string(),
            },
        ];
        let card = presenter().genes_card(&genes);
        assert_eq!(card.subtitle, "2");
        assert_eq!(card.body_text, "ALK, KRAS");
    }

    #[test]
    fn test_disclaimer_card_links_site() {
        let card = presenter().disclaimer_card();
        assert_eq!(card.kind, CardKind::Disclaimer);
        assert_eq!(card.action_url, "https://pmkb.example.org/");
        assert_eq!(card.image_ref, "http://localhost:3978/assets/eipm.png");
    }
}
