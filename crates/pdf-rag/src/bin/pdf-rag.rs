//! `pdf-rag` command line
//!
//! ```bash
//! pdf-rag index                      # (re)build the index from documents/
//! pdf-rag ask "What is the capital of Italy?"
//! pdf-rag status
//! pdf-rag serve                      # HTTP API on 127.0.0.1:8080
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_rag::{
    generation::format_sources,
    server::RagServer,
    RagConfig, RagSession,
};

/// Ask questions about your PDF files and get answers with page citations.
#[derive(Parser)]
#[command(name = "pdf-rag", version, about)]
struct Cli {
    /// Path to a TOML configuration file; built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the index from every PDF in the documents directory.
    Index,

    /// Answer a question from the indexed documents.
    Ask {
        /// The question; several words are joined with spaces.
        #[arg(required = true)]
        question: Vec<String>,
    },

    /// Show documents, index state and model server availability.
    Status,

    /// List PDF files in the documents directory.
    Documents,

    /// Start the HTTP API.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_rag=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = RagConfig::load(cli.config.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Documents: {}", config.paths.documents_dir.display());
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - LLM model: {}", config.llm.model);

    match cli.command {
        Commands::Documents => {
            let session = RagSession::from_config(config).await?;
            let documents = session.documents();
            if documents.is_empty() {
                println!(
                    "No PDF files in {}",
                    session.config().paths.documents_dir.display()
                );
            }
            for name in documents {
                println!("{}", name);
            }
        }

        Commands::Index => {
            let session = RagSession::from_config(config).await?;
            let summary = session.reindex().await?;

            println!(
                "Indexed {} documents ({} pages, {} chunks) in {} ms",
                summary.documents, summary.pages, summary.chunks, summary.processing_time_ms
            );
            for failed in &summary.failed {
                println!("  skipped {}: {}", failed.filename, failed.message);
            }
        }

        Commands::Ask { question } => {
            let session = RagSession::from_config(config).await?;
            if !session.llm_available().await {
                tracing::warn!(
                    "Ollama not reachable at {}; start it with `ollama serve`",
                    session.config().llm.base_url
                );
            }

            let record = session.ask(&question.join(" ")).await?;

            println!("\n{}\n", record.answer_text);
            if !record.citations.is_empty() {
                println!("Sources:\n{}", format_sources(&record.citations));
            }
        }

        Commands::Status => {
            let session = RagSession::from_config(config).await?;
            let status = session.status().await;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }

        Commands::Serve => {
            let server = RagServer::new(config).await?;

            println!("\nServer starting...");
            println!("  API: http://{}", server.address());
            println!("  Health: http://{}/health", server.address());
            println!("  API Info: http://{}/api/info", server.address());
            println!("\nPress Ctrl+C to stop\n");

            server.start().await?;
        }
    }

    Ok(())
}
