//! # seolens CLI Application
//!
//! This module implements the command-line interface for the seolens
//! service, providing access to its analysis and retrieval capabilities
//! through a set of subcommands.
//!
//! ## Key Components
//!
//! - CLI argument parsing with clap
//! - Subcommands:
//!   - `serve`: run the HTTP analysis service
//!   - `index`: rebuild the retrieval index from the configured sources
//!   - `ask`: answer a question against a previously built index
//!
//! Configuration comes from the environment and is validated once at
//! startup; a missing credential aborts before any request is accepted.

use std::sync::Arc;

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use seolens::config::AppConfig;
use seolens::model::{Client, OpenAiCompletionModel, OpenAiEmbeddingModel};
use seolens::rag::RagSystem;
use seolens::rag::store::VectorStore;
use seolens::server::{AppState, router};

type ServiceState = AppState<OpenAiCompletionModel, OpenAiEmbeddingModel>;

#[derive(Parser)]
#[command(author, version, about = "LLM-assisted SEO analysis service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP analysis service
    Serve(ServeArgs),

    /// Rebuild the retrieval index from the configured source files
    Index,

    /// Answer a question against the indexed documents
    Ask(AskArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Override the configured bind address
    #[arg(short, long)]
    addr: Option<std::net::SocketAddr>,
}

#[derive(Args, Debug)]
struct AskArgs {
    /// The question to answer
    #[arg(required = true)]
    question: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Some(Commands::Serve(args)) => serve_command(config, args).await?,
        None => serve_command(config, ServeArgs { addr: None }).await?,
        Some(Commands::Index) => index_command(config).await?,
        Some(Commands::Ask(args)) => ask_command(config, args).await?,
    }

    Ok(())
}

async fn build_state(config: AppConfig) -> anyhow::Result<ServiceState> {
    let client = Client::new_openai(&config);
    let store = VectorStore::open(&config.database_path, config.embedding_dimensions).await?;
    let rag = Arc::new(RagSystem::new(client.clone(), store));

    Ok(AppState::new(config, client, rag))
}

async fn serve_command(config: AppConfig, args: ServeArgs) -> anyhow::Result<()> {
    let addr = args.addr.unwrap_or(config.bind_addr);
    let state = build_state(config).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn index_command(config: AppConfig) -> anyhow::Result<()> {
    let sources = config.source_files.clone();
    let state = build_state(config).await?;

    println!("Indexing {} source file(s)...", sources.len());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .expect("spinner template must parse"),
    );
    spinner.set_message("Chunking, embedding, and storing...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));

    let summary = state.rag.rebuild(&sources).await?;

    spinner.finish_with_message("Indexing complete");
    println!(
        "Indexed {} chunks from {} document(s) at {}",
        summary.chunks,
        summary.documents,
        summary.completed_at.format("%Y-%m-%d %H:%M:%S")
    );

    Ok(())
}

async fn ask_command(config: AppConfig, args: AskArgs) -> anyhow::Result<()> {
    let state = build_state(config).await?;

    // Only an index that already holds chunks may be queried.
    if !state.rag.restore().await? {
        return Err(anyhow!(
            "the index is empty; run `seolens index` before asking questions"
        ));
    }

    let answer = state.rag.answer(&args.question).await?;
    println!("{}", answer);

    Ok(())
}
