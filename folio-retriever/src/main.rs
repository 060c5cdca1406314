use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_embed::{DEFAULT_BASE_URL, DEFAULT_EMBEDDING_MODEL, EmbedConfig, OpenAiEmbeddingProvider};
use folio_retriever::retrieval::corpus::DEFAULT_CORPUS_DIR;
use folio_retriever::retrieval::index::{SimilarityIndex, VectorIndex};
use folio_retriever::retrieval::indexer::{CorpusIndexer, IndexAction};
use folio_retriever::storage::qdrant_store::{DEFAULT_QDRANT_URL, QdrantStore};
use folio_retriever::storage::{ScoredChunk, VectorStore};
use folio_retriever::DEFAULT_COLLECTION_NAME;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// A CLI tool to build and query the play collection in Qdrant.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Qdrant HTTP address
    #[arg(long, env = "QDRANT_URL", default_value = DEFAULT_QDRANT_URL)]
    qdrant_url: String,

    /// Qdrant collection holding the corpus
    #[arg(long, env = "QDRANT_COLLECTION_NAME", default_value = DEFAULT_COLLECTION_NAME)]
    collection: String,

    /// Qdrant API key (Qdrant Cloud only)
    #[arg(long, env = "QDRANT_API_KEY", hide_env_values = true)]
    qdrant_api_key: Option<String>,

    /// Directory with the plain-text plays
    #[arg(long, env = "FOLIO_CORPUS_DIR", default_value = DEFAULT_CORPUS_DIR)]
    corpus_dir: PathBuf,

    /// API key for the embedding endpoint
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENROUTER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Embedding model name
    #[arg(long, env = "EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    embedding_model: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the collection from the corpus unless it already exists
    Index {
        /// Drop and rebuild an existing collection
        #[arg(long)]
        force: bool,
    },
    /// Search the collection for passages similar to a query
    Search {
        /// Query text
        #[arg(short, long)]
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
        /// Output format
        #[arg(short, long, default_value = "summary")]
        format: OutputFormat,
    },
    /// Show collection status
    Status {
        /// Output format
        #[arg(short, long, default_value = "summary")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum OutputFormat {
    Summary,
    Full,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "full" => Ok(OutputFormat::Full),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format: {s}")),
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let store = Arc::new(
        QdrantStore::new(
            &args.qdrant_url,
            &args.collection,
            args.qdrant_api_key.as_deref(),
            Duration::from_secs(30),
        )
        .context("failed to configure Qdrant client")?,
    );

    match &args.command {
        Commands::Index { force } => {
            let embedder = Arc::new(build_embedder(&args)?);
            let indexer = CorpusIndexer::new(store, embedder, &args.corpus_dir);
            match indexer.ensure_collection(*force).await? {
                IndexAction::Connected => {
                    println!(
                        "Collection '{}' already exists; use --force to rebuild it",
                        args.collection
                    );
                }
                IndexAction::Ingested { documents, chunks } => {
                    println!(
                        "Indexed {documents} documents into {chunks} chunks in '{}'",
                        args.collection
                    );
                }
                IndexAction::Rebuilt { documents, chunks } => {
                    println!(
                        "Rebuilt '{}' from {documents} documents ({chunks} chunks)",
                        args.collection
                    );
                }
            }
            Ok(())
        }
        Commands::Search {
            query,
            limit,
            format,
        } => {
            let embedder = Arc::new(build_embedder(&args)?);
            let index = VectorIndex::new(embedder, store);
            let hits = index.similarity_search(query, *limit).await?;
            print_hits(&hits, format)
        }
        Commands::Status { format } => {
            let info = store.collection_info().await?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                }
                OutputFormat::Summary | OutputFormat::Full => match info {
                    Some(info) => {
                        println!("Collection: {}", info.name);
                        println!("Status: {}", info.status);
                        println!(
                            "Points: {}",
                            info.points_count
                                .map(|n| n.to_string())
                                .unwrap_or_else(|| "unknown".to_string())
                        );
                        if let Some(dimension) = info.dimension {
                            println!("Vector dimension: {dimension}");
                        }
                        if *format == OutputFormat::Full {
                            println!("Qdrant: {}", args.qdrant_url);
                            println!("Corpus: {}", args.corpus_dir.display());
                        }
                    }
                    None => {
                        println!(
                            "Collection '{}' does not exist at {}",
                            args.collection, args.qdrant_url
                        );
                    }
                },
            }
            Ok(())
        }
    }
}

fn build_embedder(args: &Args) -> anyhow::Result<OpenAiEmbeddingProvider> {
    let api_key = args
        .api_key
        .clone()
        .context("OPENROUTER_API_KEY (or --api-key) is required for embedding")?;
    let config = EmbedConfig::builder()
        .api_key(api_key)
        .base_url(args.base_url.clone())
        .model_name(args.embedding_model.clone())
        .build()?;
    Ok(OpenAiEmbeddingProvider::new(config)?)
}

fn print_hits(hits: &[ScoredChunk], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(hits)?);
        }
        OutputFormat::Summary => {
            println!("Found {} passages:", hits.len());
            for hit in hits {
                let preview: String = hit.chunk.content.chars().take(80).collect();
                println!(
                    "  {:.4} | {} #{} | {}",
                    hit.score,
                    hit.chunk.source_label,
                    hit.chunk.sequence_index,
                    preview.replace('\n', " ")
                );
            }
        }
        OutputFormat::Full => {
            for hit in hits {
                println!("Score: {:.4}", hit.score);
                println!("Source: {}", hit.chunk.source_label);
                println!("Chunk: {}", hit.chunk.sequence_index);
                if let Some(path) = &hit.chunk.file_path {
                    println!("File: {path}");
                }
                println!("{}", hit.chunk.content);
                println!("---");
            }
        }
    }
    Ok(())
}
