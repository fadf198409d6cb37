//! insight-server entry point
//!
//! - `insight-server` / `insight-server serve` - run the SSE server
//! - `insight-server ask <QUERY>` - answer one question in the terminal
//! - `insight-server config` - print or validate the configuration

use insight::{
    AppState, InsightConfig, LLMClientFactory, Result,
    api::routes::create_app,
    cli::{Cli, Commands, output::Output},
    research::WebSearch,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let config = InsightConfig::load(&cli.config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            init_tracing(&config, cli.verbose);
            serve(config).await
        }
        Commands::Ask { query } => {
            if cli.verbose {
                init_tracing(&config, true);
            }
            ask(config, &query, output).await
        }
        Commands::Config { validate } => {
            if validate {
                output.success(&format!("{} is valid", cli.config.display()));
                return Ok(());
            }
            print_config(&config, output);
            Ok(())
        }
    }
}

fn init_tracing(config: &InsightConfig, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("insight={default_level},tower_http={default_level}")));

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_state(config: InsightConfig) -> Result<AppState> {
    let factory = LLMClientFactory::new(config.llm.to_provider()?);
    let llm = factory.create_default().await?;
    info!(
        provider = factory.default_provider().name(),
        model = llm.model_name(),
        "LLM client ready"
    );

    Ok(AppState::new(config, llm, Arc::new(WebSearch::new())))
}

async fn serve(config: InsightConfig) -> Result<()> {
    let address = config.bind_address();
    let state = build_state(config).await?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| insight::AppError::Internal(format!("Failed to bind {}: {}", address, e)))?;
    info!(address = %address, "Insight server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| insight::AppError::Internal(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

async fn ask(config: InsightConfig, query: &str, output: &Output) -> Result<()> {
    let state = build_state(config).await?;
    output.banner();

    let mut events = state.orchestrator.spawn(query);
    while let Some(event) = events.recv().await {
        output.event(&event);
        if event.is_terminal() {
            break;
        }
    }
    Ok(())
}

fn print_config(config: &InsightConfig, output: &Output) {
    output.header("Server");
    output.kv("address", &config.bind_address());
    output.kv("log level", &config.server.log_level);
    output.kv("log format", &config.server.log_format);
    output.kv("cors origins", &config.server.cors_origins.join(", "));

    output.header("LLM");
    let provider = match &config.llm {
        insight::utils::config::LlmConfig::Ollama { .. } => "ollama",
        insight::utils::config::LlmConfig::OpenAI { .. } => "openai",
    };
    output.kv("provider", provider);
    output.kv("model", config.llm.model());

    output.header("Workflow");
    output.kv("max queries", &config.workflow.max_queries.to_string());
    output.kv("results per query", &config.search.max_results.to_string());
    output.kv("event buffer", &config.workflow.event_buffer.to_string());
}
