mod cli;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod query;
mod results;
mod routes;
mod state;

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::query::executor::SqliteExecutor;
use crate::query::pipeline::QueryPipeline;
use crate::query::GenerationSettings;
use crate::results::ResultStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Load configuration first (fails on a missing GROQ_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting sqlrag v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite
    let db = create_pool(&config.database_url).await?;
    let executor = Arc::new(SqliteExecutor::new(db));

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(
        config.groq_api_key.clone(),
        config.llm_base_url.clone(),
    )?);
    info!("LLM client initialized (model: {})", config.llm_model);

    let pipeline = QueryPipeline::new(
        llm,
        executor,
        GenerationSettings::from_config(&config),
        config.pipeline_timeout,
    );
    info!(
        "Query pipeline ready (timeout: {}s)",
        config.pipeline_timeout.as_secs()
    );

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, pipeline).await,
        Command::Ask { query } => {
            println!("{}", cli::answer(&pipeline, &query).await);
            Ok(())
        }
        Command::Session => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let answered = cli::run_session(&pipeline, stdin, tokio::io::stdout()).await?;
            info!("Session ended after {answered} questions");
            Ok(())
        }
    }
}

async fn serve(config: &Config, pipeline: QueryPipeline) -> Result<()> {
    // Build app state
    let state = AppState {
        pipeline: Arc::new(pipeline),
        results: ResultStore::new(config.result_store_capacity),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the frontend origin once it has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
