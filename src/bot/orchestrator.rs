//! Conversation turn handling
//!
//! Routes an incoming [`Activity`] to the static replies or to the
//! query → search → rank → present pipeline, and maps every failure to a reply.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::activity::{Activity, OutgoingMessage};
use crate::config::BotConfig;
use crate::error::{Error, Result};
use crate::nlu::{normalize, Entity, IntentRecognizer};
use crate::pmkb::{Gene, KnowledgeBaseGateway};
use crate::presentation::{PresentationResult, PromptCatalog, ResultPresenter};
use crate::query::{Query, QueryBuilder};
use crate::ranking::RelevanceRanker;

/// Result of one knowledge-base search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub query: Query,
    pub presentation: PresentationResult,
}

pub struct Orchestrator {
    gateway: Arc<dyn KnowledgeBaseGateway>,
    recognizer: Arc<dyn IntentRecognizer>,
    query_builder: QueryBuilder,
    ranker: RelevanceRanker,
    presenter: ResultPresenter,
    prompts: Arc<PromptCatalog>,
    turn_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        config: &BotConfig,
        gateway: Arc<dyn KnowledgeBaseGateway>,
        recognizer: Arc<dyn IntentRecognizer>,
    ) -> Self {
        let prompts = Arc::new(config.prompts.clone());
        Self {
            gateway,
            recognizer,
            query_builder: QueryBuilder::new(config.presentation.query_policy),
            ranker: RelevanceRanker::default(),
            presenter: ResultPresenter::from_config(config, Arc::clone(&prompts)),
            prompts,
            turn_timeout: config.conversation.turn_timeout(),
        }
    }

    pub fn with_presenter(mut self, presenter: ResultPresenter) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn with_ranker(mut self, ranker: RelevanceRanker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn with_turn_timeout(mut self, turn_timeout: Duration) -> Self {
        self.turn_timeout = turn_timeout;
        self
    }

    pub fn gateway(&self) -> &Arc<dyn KnowledgeBaseGateway> {
        &self.gateway
    }

    pub fn prompts(&self) -> &PromptCatalog {
        &self.prompts
    }

    /// Handles one chat activity and returns the replies in sending order.
    ///
    /// Pipeline failures become replies; only a message without text is an error.
    pub async fn handle_activity(&self, activity: &Activity) -> Result<Vec<OutgoingMessage>> {
        let span = info_span!(
            "turn",
            turn_id = %Uuid::new_v4(),
            activity_type = %activity.activity_type
        );

        async {
            if activity.is_message() {
                let text = activity.text.trim();
                if text.is_empty() {
                    return Err(Error::InvalidInput("message has no text".to_string()));
                }
                Ok(self.route_message(text).await)
            } else if activity.is_conversation_update() {
                let replies: Vec<OutgoingMessage> = activity
                    .new_members()
                    .flat_map(|member| {
                        debug!(member = %member.id, "Welcoming new member");
                        self.welcome_messages()
                    })
                    .collect();
                Ok(replies)
            } else {
                Ok(vec![OutgoingMessage::text(format!(
                    "{} event detected",
                    activity.activity_type
                ))])
            }
        }
        .instrument(span)
        .await
    }

    async fn route_message(&self, text: &str) -> Vec<OutgoingMessage> {
        let p = &self.prompts;

        if p.mentions(text, &p.genes_keyword) {
            vec![self.genes_reply().await]
        } else if p.is_who_am_i(text) {
            vec![OutgoingMessage::text(p.who_am_i_reply.clone())]
        } else if p.mentions(text, &p.examples_keyword) {
            vec![self.examples_message()]
        } else if text.eq_ignore_ascii_case(p.disclaimer_title.trim()) {
            vec![OutgoingMessage::card(self.presenter.disclaimer_card())]
        } else if p.is_hello(text) {
            self.welcome_messages()
        } else {
            self.recognize_and_answer(text).await
        }
    }

    async fn recognize_and_answer(&self, text: &str) -> Vec<OutgoingMessage> {
        let result = match self.recognizer.recognize(text).await {
            Ok(result) => result,
            Err(e) => return vec![self.error_reply(&e)],
        };

        if result.is_find_gene() {
            let entities = normalize(&result);
            return vec![self.on_find_gene_intent(&entities, text).await];
        }

        match result.top_intent() {
            Some(intent) => {
                info!(intent = %intent.intent, score = intent.score, "Unhandled intent");
                vec![OutgoingMessage::text(format!(
                    "Top scoring intent: {}, score: {}",
                    intent.intent, intent.score
                ))]
            }
            None => vec![
                OutgoingMessage::text(self.prompts.error_message.clone()),
                self.examples_message(),
            ],
        }
    }

    /// Answers a gene lookup; failures become the error prompt or the apology
    pub async fn on_find_gene_intent(&self, entities: &[Entity], utterance: &str) -> OutgoingMessage {
        match self.search(entities).await {
            Ok(outcome) => {
                let text = self
                    .prompts
                    .found_reply(outcome.presentation.total, utterance);
                OutgoingMessage::carousel(text, outcome.presentation.cards)
            }
            Err(e) => self.error_reply(&e),
        }
    }

    /// Builds the query, searches under the turn deadline, then ranks and presents
    pub async fn search(&self, entities: &[Entity]) -> Result<SearchOutcome> {
        let query = self.query_builder.build_query(entities)?;
        if query.is_empty() {
            return Err(Error::InvalidInput("no usable entity".to_string()));
        }

        let interpretations =
            match tokio::time::timeout(self.turn_timeout, self.gateway.search_interpretations(query.as_str()))
                .await
            {
                Ok(result) => result?,
                Err(_) => return Err(Error::Timeout(self.turn_timeout.as_millis() as u64)),
            };

        let ranked = self.ranker.rank(&interpretations, query.as_str());
        let presentation = self.presenter.present(&ranked, query.as_str());
        info!(
            query = %query,
            total = presentation.total,
            cards = presentation.len(),
            "Search answered"
        );

        Ok(SearchOutcome {
            query,
            presentation,
        })
    }

    /// Every gene known to the knowledge base, alphabetically
    pub async fn genes(&self) -> Result<Vec<Gene>> {
        let mut genes =
            match tokio::time::timeout(self.turn_timeout, self.gateway.get_genes()).await {
                Ok(result) => result?,
                Err(_) => return Err(Error::Timeout(self.turn_timeout.as_millis() as u64)),
            };
        genes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genes)
    }

    async fn genes_reply(&self) -> OutgoingMessage {
        match self.genes().await {
            Ok(genes) => OutgoingMessage::card(self.presenter.genes_card(&genes)),
            Err(e) => self.error_reply(&e),
        }
    }

    /// Greeting, disclaimer and getting-started card
    pub fn welcome_messages(&self) -> Vec<OutgoingMessage> {
        vec![
            OutgoingMessage::text(self.prompts.greeting.clone()),
            OutgoingMessage::card(self.presenter.disclaimer_card()),
            OutgoingMessage::card(self.presenter.getting_started_card()),
        ]
    }

    fn examples_message(&self) -> OutgoingMessage {
        OutgoingMessage::text(self.prompts.examples_text())
            .with_suggested_actions(self.prompts.example_prompts.clone())
    }

    fn error_reply(&self, err: &Error) -> OutgoingMessage {
        if err.is_user_facing() {
            warn!(error = %err, "Could not build a search from the message");
            OutgoingMessage::text(self.prompts.error_message.clone())
        } else {
            if err.is_gateway_failure() {
                error!(error = %err, status = ?err.status(), "Knowledge base call failed");
            } else {
                error!(error = %err, "Turn failed");
            }
            OutgoingMessage::text(self.prompts.apology.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlu::{DisabledRecognizer, NluResult};
    use crate::pmkb::Interpretation;
    use async_trait::async_trait;

    struct StaticGateway(Vec<Interpretation>);

    #[async_trait]
    impl KnowledgeBaseGateway for StaticGateway {
        async fn search_interpretations(&self, _query: &str) -> Result<Vec<Interpretation>> {
            Ok(self.0.clone())
        }

        async fn get_genes(&self) -> Result<Vec<Gene>> {
            Ok(vec![
                Gene {
                    id: 2,
                    name: "KRAS".to_string(),
                },
                Gene {
                    id: 1,
                    name: "BRAF".to_string(),
                },
            ])
        }

        async fn is_alive(&self) -> bool {
            true
        }
    }

    struct SlowGateway;

    #[async_trait]
    impl KnowledgeBaseGateway for SlowGateway {
        async fn search_interpretations(&self, _query: &str) -> Result<Vec<Interpretation>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Vec::new())
        }

        async fn get_genes(&self) -> Result<Vec<Gene>> {
            Ok(Vec::new())
        }

        async fn is_alive(&self) -> bool {
            false
        }
    }

    struct FixedRecognizer(NluResult);

    #[async_trait]
    impl IntentRecognizer for FixedRecognizer {
        async fn recognize(&self, _utterance: &str) -> Result<NluResult> {
            Ok(self.0.clone())
        }
    }

    fn orchestrator(gateway: Arc<dyn KnowledgeBaseGateway>) -> Orchestrator {
        Orchestrator::new(&BotConfig::default(), gateway, Arc::new(DisabledRecognizer))
    }

    #[tokio::test]
    async fn test_missing_gene_replies_with_error_prompt() {
        let bot = orchestrator(Arc::new(StaticGateway(Vec::new())));
        let reply = bot.on_find_gene_intent(&[], "hello there").await;
        assert_eq!(reply.text, bot.prompts().error_message);
        assert!(reply.cards.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_replies_with_apology() {
        let bot = orchestrator(Arc::new(SlowGateway)).with_turn_timeout(Duration::from_millis(20));
        let err = bot.search(&[Entity::gene("EGFR")]).await.unwrap_err();
        assert!(matches!(err, Error::Timeout(20)));

        let reply = bot.on_find_gene_intent(&[Entity::gene("EGFR")], "EGFR").await;
        assert_eq!(reply.text, bot.prompts().apology);
    }

    #[tokio::test]
    async fn test_genes_keyword_returns_sorted_card() {
        let bot = orchestrator(Arc::new(StaticGateway(Vec::new())));
        let replies = bot
            .handle_activity(&Activity::message("show me all Genes"))
            .await
            .unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].cards[0].body_text, "BRAF, KRAS");
    }

    #[tokio::test]
    async fn test_recognizer_failure_replies_with_apology() {
        let bot = orchestrator(Arc::new(StaticGateway(Vec::new())));
        let replies = bot.handle_activity(&Activity::message("EGFR")).await.unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].text, bot.prompts().apology);
    }

    #[tokio::test]
    async fn test_none_intent_replies_with_examples() {
        let bot = Orchestrator::new(
            &BotConfig::default(),
            Arc::new(StaticGateway(Vec::new())),
            Arc::new(FixedRecognizer(NluResult::default())),
        );
        let replies = bot.handle_activity(&Activity::message("blah")).await.unwrap();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].text, bot.prompts().error_message);
        assert_eq!(replies[1].suggested_actions, bot.prompts().example_prompts);
    }

    #[tokio::test]
    async fn test_other_activity_types_are_acknowledged() {
        let bot = orchestrator(Arc::new(StaticGateway(Vec::new())));
        let activity = Activity {
            activity_type: "typing".to_string(),
            ..Activity::default()
        };
        let replies = bot.handle_activity(&activity).await.unwrap();
        assert_eq!(replies[0].text, "typing event detected");
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let bot = orchestrator(Arc::new(StaticGateway(Vec::new())));
        let result = bot.handle_activity(&Activity::message("   ")).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[derive(Default)]
    struct RecordingGateway {
        queries: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl KnowledgeBaseGateway for RecordingGateway {
        async fn search_interpretations(&self, query: &str) -> Result<Vec<Interpretation>> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(Vec::new())
        }

        async fn get_genes(&self) -> Result<Vec<Gene>> {
            Ok(Vec::new())
        }

        async fn is_alive(&self) -> bool {
            true
        }
    }

    fn lenient(gateway: Arc<RecordingGateway>) -> Orchestrator {
        let mut config = BotConfig::default();
        config.presentation.query_policy = crate::query::QueryPolicy::Lenient;
        Orchestrator::new(&config, gateway, Arc::new(DisabledRecognizer))
    }

    #[tokio::test]
    async fn test_lenient_empty_query_is_unknown_entity() {
        let gateway = Arc::new(RecordingGateway::default());
        let bot = lenient(Arc::clone(&gateway));

        let reply = bot.on_find_gene_intent(&[], "something vague").await;
        assert_eq!(reply.text, bot.prompts().error_message);
        assert!(reply.cards.is_empty());
        assert!(gateway.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lenient_searches_without_gene() {
        let gateway = Arc::new(RecordingGateway::default());
        let bot = lenient(Arc::clone(&gateway));

        let reply = bot
            .on_find_gene_intent(&[Entity::tumor_type("Melanoma")], "melanoma")
            .await;
        assert_eq!(reply.text, "Found 0 interpretations associated with \"melanoma\"");
        assert_eq!(*gateway.queries.lock().unwrap(), vec!["Melanoma".to_string()]);
    }
}
