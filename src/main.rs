use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use pmkb_bot::bot::Orchestrator;
use pmkb_bot::config::BotConfig;
use pmkb_bot::logging::init_logging;
use pmkb_bot::nlu::{DisabledRecognizer, Entity, IntentRecognizer, LuisRecognizer};
use pmkb_bot::pmkb::{KnowledgeBaseGateway, PmkbClient};
use pmkb_bot::server::BotServer;

#[derive(Parser, Debug)]
#[command(name = "pmkb-bot", version, about = "Chat bot for the Precision Medicine Knowledge Base")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "PMKB_BOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, overrides the configured level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the webhook server
    Serve,
    /// Search interpretations from the command line
    Search {
        #[arg(long)]
        gene: Option<String>,
        #[arg(long)]
        variant: Vec<String>,
        #[arg(long)]
        tumor: Vec<String>,
        #[arg(long)]
        tissue: Vec<String>,
        /// Print the cards as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every gene in the knowledge base
    Genes,
    /// Check that the knowledge base answers
    Health,
    /// Write a sample configuration file
    InitConfig {
        #[arg(default_value = "pmkb-bot.toml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::InitConfig { path } = &cli.command {
        if path.exists() {
            bail!("{} already exists", path.display());
        }
        std::fs::write(path, BotConfig::sample_toml()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote sample configuration to {}", path.display());
        return Ok(());
    }

    let config = BotConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    let log_config = match &cli.log_level {
        Some(level) => config.logging.clone().with_level(level.as_str()),
        None => config.logging.clone(),
    };
    // ファイル出力のフラッシュのため、ガードは main の終了まで保持する
    let _guard = init_logging(&log_config)?;

    let gateway: Arc<dyn KnowledgeBaseGateway> = Arc::new(PmkbClient::new(&config.pmkb)?);
    let recognizer: Arc<dyn IntentRecognizer> = if config.nlu.is_enabled() {
        Arc::new(LuisRecognizer::new(&config.nlu)?)
    } else {
        warn!("NLU endpoint not configured; free-text searches will be answered with an apology");
        Arc::new(DisabledRecognizer)
    };
    let orchestrator = Orchestrator::new(&config, gateway, recognizer);

    match cli.command {
        Command::Serve => {
            info!("Starting PMKB bot v{}", env!("CARGO_PKG_VERSION"));
            BotServer::new(orchestrator)
                .serve(&config.server.bind_addr)
                .await?;
        }
        Command::Search {
            gene,
            variant,
            tumor,
            tissue,
            json,
        } => {
            let entities: Vec<Entity> = gene
                .into_iter()
                .map(Entity::gene)
                .chain(variant.into_iter().map(Entity::variant))
                .chain(tumor.into_iter().map(Entity::tumor_type))
                .chain(tissue.into_iter().map(Entity::tissue_type))
                .collect();

            let outcome = orchestrator.search(&entities).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.presentation)?);
            } else {
                println!(
                    "{}",
                    orchestrator
                        .prompts()
                        .found_reply(outcome.presentation.total, outcome.query.as_str())
                );
                for card in &outcome.presentation.cards {
                    println!("\n{}\n{}\n{}", card.title, card.subtitle, card.action_url);
                }
            }
        }
        Command::Genes => {
            for gene in orchestrator.genes().await? {
                println!("{}", gene.name);
            }
        }
        Command::Health => {
            if orchestrator.gateway().is_alive().await {
                println!("PMKB is reachable");
            } else {
                bail!("PMKB health check failed");
            }
        }
        Command::InitConfig { .. } => {}
    }

    Ok(())
}
