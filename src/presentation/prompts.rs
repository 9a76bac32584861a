//! User-facing text
//!
//! Every string the bot says lives here so that deployments can reword it from
//! the `[prompts]` table of the config file.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptCatalog {
    pub bot_name: String,
    pub greeting: String,
    pub who_am_i_reply: String,
    /// Phrases contained in a "who are you" question
    pub who_am_i_phrases: Vec<String>,
    /// Whole-message greetings
    pub hello_phrases: Vec<String>,
    pub genes_keyword: String,
    pub genes_title: String,
    pub examples_keyword: String,
    pub example_prompts: Vec<String>,
    pub getting_started_title: String,
    pub getting_started_text: String,
    pub disclaimer_title: String,
    pub disclaimer_text: String,
    pub visit_website: String,
    /// Reply when no gene could be recognized
    pub error_message: String,
    /// Reply when the knowledge base or the recognizer failed
    pub apology: String,
    pub found: String,
    pub interpretations_associated_with: String,
    pub interpretation: String,
    pub gene: String,
    pub variants: String,
    pub tumor_types: String,
    pub primary_sites: String,
    pub others: String,
    pub read_more: String,
    pub interpretations_for: String,
    pub there_are: String,
    pub interpretations_in_total: String,
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self {
            bot_name: "PMKB Bot".to_string(),
            greeting: "Hi there.".to_string(),
            who_am_i_reply: "I am the PMKB Bot. I can help you find data from the Precision Medicine Knowledge Base.".to_string(),
            who_am_i_phrases: vec![
                "who are you".to_string(),
                "what are you".to_string(),
                "what can you do".to_string(),
            ],
            hello_phrases: vec![
                "hi".to_string(),
                "hello".to_string(),
                "hey".to_string(),
                "hi there".to_string(),
            ],
            genes_keyword: "genes".to_string(),
            genes_title: "Genes in PMKB".to_string(),
            examples_keyword: "examples".to_string(),
            example_prompts: vec![
                "EGFR".to_string(),
                "BRAF V600E".to_string(),
                "KRAS in lung adenocarcinoma".to_string(),
                "IDH1 R132H glioma".to_string(),
            ],
            getting_started_title: "Getting started".to_string(),
            getting_started_text: "Ask me about a gene, optionally with a variant, a tumor type or a tissue. Try one of these:".to_string(),
            disclaimer_title: "Disclaimer".to_string(),
            disclaimer_text: "You assume full responsibility for all risks associated with using this PMKB Bot. The Englander Institute for Precision Medicine makes no guarantee of the comprehensiveness, reliability or accuracy of the information on this website and the IPM assumes no responsibility for errors in the information associated with this web site. Healthcare providers and patients must integrate all clinical and laboratory findings as well as information from a variety of sources before deciding on appropriate clinical care options.".to_string(),
            visit_website: "Visit PMKB".to_string(),
            error_message: "Sorry, I did not understand that. Please include a gene name, for example \"EGFR\".".to_string(),
            apology: "Sorry, I could not reach the knowledge base right now. Please try again later.".to_string(),
            found: "Found".to_string(),
            interpretations_associated_with: "interpretations associated with".to_string(),
            interpretation: "Interpretation".to_string(),
            gene: "Gene".to_string(),
            variants: "Variants".to_string(),
            tumor_types: "Tumor Types".to_string(),
            primary_sites: "Primary Sites".to_string(),
            others: "others".to_string(),
            read_more: "Read more".to_string(),
            interpretations_for: "Interpretations for".to_string(),
            there_are: "There are".to_string(),
            interpretations_in_total: "interpretations in total, read more".to_string(),
        }
    }
}

impl PromptCatalog {
    /// `text` contains one of the who-am-I phrases
    pub fn is_who_am_i(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.who_am_i_phrases
            .iter()
            .any(|phrase| text.contains(&phrase.to_lowercase()))
    }

    /// `text` is exactly one of the greetings
    pub fn is_hello(&self, text: &str) -> bool {
        let text = text.trim();
        self.hello_phrases
            .iter()
            .any(|phrase| phrase.eq_ignore_ascii_case(text))
    }

    pub fn mentions(&self, text: &str, keyword: &str) -> bool {
        !keyword.is_empty() && text.to_lowercase().contains(&keyword.to_lowercase())
    }

    /// Getting-started text followed by one example per line
    pub fn examples_text(&self) -> String {
        std::iter::once(self.getting_started_text.as_str())
            .chain(self.example_prompts.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// "Found 3 interpretations associated with "EGFR""
    pub fn found_reply(&self, count: usize, utterance: &str) -> String {
        format!(
            "{} {} {} \"{}\"",
            self.found, count, self.interpretations_associated_with, utterance
        )
    }
}
