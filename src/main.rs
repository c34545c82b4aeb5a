use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use secrecy::SecretString;

use zonewise_core::provider::{CompletionOptions, LlmProvider};
use zonewise_core::turns::{Conversation, ConversationTurn};
use zonewise_core::zoning::ZoningRecord;
use zonewise_engine::{AssistantConfig, SqliteSink, TurnRequest, ZoningAssistant};
use zonewise_llm::{AnthropicProvider, MockProvider, MockResponse, ReliableConfig, ReliableProvider};
use zonewise_settings::{LlmSettings, Settings};
use zonewise_store::{Database, MessageRepo, ZoningRepo};
use zonewise_telemetry::TelemetryConfig;

const OFFLINE_REPLY: &str =
    "The assistant is running offline. Configure an Anthropic provider to get zoning answers.";

#[derive(Debug, Parser)]
#[command(name = "zonewise", version, about = "Zoning question assistant for Brevard County")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve {
        /// Overrides `server.port`.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Answer a single question and print the reply with its artifacts.
    Ask { question: String },
    /// Bulk-load zoning districts from a JSON array of records.
    Seed { file: PathBuf },
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("zonewise error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().context("failed to load settings")?;

    zonewise_telemetry::init_telemetry(&TelemetryConfig::from_level_name(
        log_level(&cli.command, &settings),
        settings.logging.json,
    ));

    let db = Database::open(&settings.store.database_path).with_context(|| {
        format!(
            "failed to open database at {}",
            settings.store.database_path.display()
        )
    })?;
    tracing::info!(path = %db.path().display(), "database opened");

    match cli.command {
        Commands::Serve { port } => serve(&settings, db, port).await,
        Commands::Ask { question } => ask(&settings, db, question).await,
        Commands::Seed { file } => seed(db, &file),
    }
}

/// One-shot commands only log warnings unless RUST_LOG says otherwise.
fn log_level<'a>(command: &Commands, settings: &'a Settings) -> &'a str {
    match command {
        Commands::Ask { .. } => "warn",
        Commands::Serve { .. } | Commands::Seed { .. } => &settings.logging.level,
    }
}

async fn serve(settings: &Settings, db: Database, port: Option<u16>) -> anyhow::Result<()> {
    let assistant = Arc::new(build_assistant(settings, db.clone())?);
    let config = zonewise_server::ServerConfig {
        host: settings.server.host.clone(),
        port: port.unwrap_or(settings.server.port),
    };
    let handle = zonewise_server::start(config, zonewise_server::AppState::new(assistant, db))
        .await
        .context("failed to start server")?;

    tracing::info!(port = handle.port, "zonewise ready");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl+c")?;

    tracing::info!("shutting down");
    handle.shutdown();
    Ok(())
}

async fn ask(settings: &Settings, db: Database, question: String) -> anyhow::Result<()> {
    let assistant = build_assistant(settings, db)?;
    let request = TurnRequest {
        messages: Conversation::new(vec![ConversationTurn::user(question)]),
        session_id: None,
    };
    let reply = assistant.respond(request).await?;

    println!("{}", reply.response);
    if !reply.artifacts.is_empty() {
        println!("{}", serde_json::to_string_pretty(&reply.artifacts)?);
    }
    Ok(())
}

fn seed(db: Database, file: &std::path::Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let records: Vec<ZoningRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of zoning records", file.display()))?;

    let repo = ZoningRepo::new(db);
    let inserted = repo.insert_many(&records)?;
    let total = repo.count()?;

    tracing::info!(inserted, total, "zoning districts seeded");
    println!("inserted {inserted} zoning districts ({total} total)");
    Ok(())
}

fn build_assistant(settings: &Settings, db: Database) -> anyhow::Result<ZoningAssistant> {
    let provider = build_provider(&settings.llm)?;
    tracing::info!(provider = provider.name(), model = provider.model(), "provider ready");

    let config = AssistantConfig {
        completion: CompletionOptions {
            max_tokens: settings.llm.max_tokens,
            ..CompletionOptions::default()
        },
        ..AssistantConfig::default()
    };

    Ok(ZoningAssistant::new(
        Arc::new(ZoningRepo::new(db.clone())),
        provider,
        Arc::new(SqliteSink::new(MessageRepo::new(db))),
        config,
    ))
}

fn build_provider(llm: &LlmSettings) -> anyhow::Result<Arc<dyn LlmProvider>> {
    match llm.provider.as_str() {
        "mock" => Ok(Arc::new(MockProvider::repeating(MockResponse::text(OFFLINE_REPLY)))),
        "anthropic" => {
            let key = std::env::var(&llm.api_key_env)
                .with_context(|| format!("{} is not set", llm.api_key_env))?;
            let provider = AnthropicProvider::new(SecretString::from(key), Some(&llm.model))?;
            if llm.retry {
                Ok(Arc::new(ReliableProvider::new(provider, ReliableConfig::default())))
            } else {
                Ok(Arc::new(provider))
            }
        }
        other => bail!("unsupported provider '{other}'"),
    }
}
