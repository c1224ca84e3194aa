use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

// Import from our modular crates
use askdoc_core::{EmbeddingProvider, GenerationProvider, RagConfig, VectorIndex};
use askdoc_openai::OpenAiClient;
use askdoc_rag::{HashEmbedder, LocalIndex, QdrantIndex, RagService};
use askdoc_server::{HttpServer, ServerConfig};

#[derive(Parser)]
#[command(name = "askdoc")]
#[command(about = "Ask questions about your PDF documents", long_about = None)]
struct Cli {
    #[command(flatten)]
    pipeline: PipelineArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct PipelineArgs {
    /// Target chunk size in characters.
    #[arg(long, env = "ASKDOC_CHUNK_SIZE", default_value_t = 512)]
    chunk_size: usize,

    /// Characters of overlap between consecutive chunks.
    #[arg(long, env = "ASKDOC_CHUNK_OVERLAP", default_value_t = 64)]
    chunk_overlap: usize,

    /// Number of chunks retrieved per question.
    #[arg(long, env = "ASKDOC_TOP_K", default_value_t = 3)]
    top_k: usize,

    /// What re-ingesting a file does: 'append' or 'replace-source'.
    #[arg(long, env = "ASKDOC_INGEST_POLICY", default_value = "append")]
    ingest_policy: String,

    /// Embedding backend: 'openai' or 'hash' (offline, low quality).
    #[arg(long, env = "ASKDOC_EMBEDDER", default_value = "openai")]
    embedder: String,

    /// Index backend: 'local' or 'qdrant'.
    #[arg(long, env = "ASKDOC_INDEX", default_value = "local")]
    index: String,

    /// Directory holding the local index.
    #[arg(long, env = "ASKDOC_INDEX_DIR", default_value = "index")]
    index_dir: PathBuf,

    /// Qdrant endpoint, used when --index qdrant.
    #[arg(long, env = "QDRANT_URL", default_value = "http://localhost:6334")]
    qdrant_url: String,

    /// Qdrant collection name.
    #[arg(long, env = "ASKDOC_COLLECTION", default_value = "askdoc")]
    collection: String,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Address to bind the HTTP server to (host:port).
        #[arg(long, env = "ASKDOC_BIND", default_value = "127.0.0.1:8080")]
        bind: String,

        /// Directory where uploaded files are stored.
        #[arg(long, env = "ASKDOC_UPLOAD_DIR", default_value = "uploads")]
        upload_dir: PathBuf,

        /// Directory with the frontend build, served on non-API routes.
        #[arg(long, env = "ASKDOC_STATIC_DIR")]
        static_dir: Option<PathBuf>,
    },
    /// Ingest a PDF document into the index
    Ingest {
        /// Path to the PDF file
        file: PathBuf,
    },
    /// Ask a question about the indexed documents
    Ask {
        /// The question, as free words
        question: Vec<String>,
    },
    /// Show index statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            bind,
            upload_dir,
            static_dir,
        } => {
            init_tracing();
            let service = build_service(&cli.pipeline).await?;
            let config = ServerConfig {
                bind,
                upload_dir,
                static_dir,
                ..Default::default()
            };

            let server = HttpServer::new(config, service)?;
            println!("{} askdoc server starting", "🚀".green());
            println!("  POST /api/upload - upload a PDF");
            println!("  POST /api/query  - ask a question");
            println!("  GET  /api/stats  - index statistics");
            server.start().await?;
        }
        Command::Ingest { file } => {
            let service = build_service(&cli.pipeline).await?;
            println!("{} Ingesting {}...", "📄".blue(), file.display());

            let report = service.ingest_file(&file).await?;
            println!(
                "{} Indexed {} chunks from {} pages of {} (md5 {})",
                "✅".green(),
                report.chunks_indexed,
                report.pages,
                report.source_file,
                report.checksum
            );
        }
        Command::Ask { question } => {
            let question = question.join(" ");
            let service = build_service(&cli.pipeline).await?;
            println!("{} Thinking...", "🤖".blue());

            match service.answer(&question).await {
                Ok(answer) => println!("{} {}", "→".green(), answer.bold()),
                Err(e) => println!("{} {}", "❌".red(), e),
            }
        }
        Command::Stats => {
            let service = build_service(&cli.pipeline).await?;
            let stats = service.stats().await?;
            println!("{} {} entries in the index", "📊".cyan(), stats.entries);
        }
    }

    Ok(())
}

/// Wire the configured backends into a service instance
async fn build_service(args: &PipelineArgs) -> Result<Arc<RagService>> {
    let config = RagConfig {
        chunk_size: args.chunk_size,
        chunk_overlap: args.chunk_overlap,
        top_k: args.top_k,
        ingest_policy: args.ingest_policy.parse()?,
    };

    // one client serves as both generation and (optionally) embedding backend
    let openai = Arc::new(OpenAiClient::from_env()?);

    let embedder: Arc<dyn EmbeddingProvider> = match args.embedder.as_str() {
        "openai" => openai.clone(),
        "hash" => Arc::new(HashEmbedder::default()),
        other => anyhow::bail!("unknown embedder '{}' (expected 'openai' or 'hash')", other),
    };

    let index: Arc<dyn VectorIndex> = match args.index.as_str() {
        "local" => Arc::new(LocalIndex::open(&args.index_dir)?),
        "qdrant" => Arc::new(
            QdrantIndex::connect(&args.qdrant_url, &args.collection, embedder.dimension()).await?,
        ),
        other => anyhow::bail!("unknown index '{}' (expected 'local' or 'qdrant')", other),
    };

    let generator: Arc<dyn GenerationProvider> = openai;

    Ok(Arc::new(RagService::new(config, embedder, index, generator)?))
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askdoc=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
