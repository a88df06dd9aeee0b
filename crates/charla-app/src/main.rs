//! Charla skill server binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Build the OpenAI completion backend and turn orchestrator
//! 3. Register the skill handlers
//! 4. Serve the skill endpoint until Ctrl-C

mod cli;

use std::sync::Arc;

use clap::Parser;

use charla_api::{routes, AppState};
use charla_chat::{CompletionClient, OpenAiBackend, OpenAiConfig, TurnOrchestrator};
use charla_core::config::CharlaConfig;
use charla_skill::SkillDispatcher;

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let mut config = CharlaConfig::load_or_default(&config_file);

    config.general.host = args.resolve_host(&config.general.host);
    config.general.port = args.resolve_port(config.general.port);
    config.general.log_level = args.resolve_log_level(&config.general.log_level);
    config.completion.api_key = cli::resolve_api_key(config.completion.api_key.take());

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Charla v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    config.validate()?;

    if config.completion.api_key.is_none() {
        tracing::warn!("No completion API key configured; set OPENAI_API_KEY or completion.api_key");
    }

    let backend = OpenAiBackend::new(OpenAiConfig::from(&config.completion));
    let client = CompletionClient::new(backend, config.completion.clone());
    let orchestrator = Arc::new(TurnOrchestrator::new(client));
    let dispatcher = SkillDispatcher::chat(orchestrator);

    tracing::info!(
        answer_model = %config.completion.answer_model,
        suggestion_model = %config.completion.suggestion_model,
        "Completion client ready"
    );

    let state = AppState::new(dispatcher).with_application_id(config.skill.application_id.clone());

    routes::start_server(&config, state).await?;

    Ok(())
}
