use anyhow::Context;
use clap::Parser;
use folio_embed::{EmbedConfig, OpenAiEmbeddingProvider};
use folio_rag::config::{self, RagConfig};
use folio_rag::llm::openai::{ChatConfig, OpenAiChatClient};
use folio_rag::pipeline::Orchestrator;
use folio_rag::repl::run_repl;
use folio_retriever::retrieval::index::VectorIndex;
use folio_retriever::retrieval::indexer::{CorpusIndexer, IndexAction};
use folio_retriever::storage::qdrant_store::QdrantStore;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

/// Ask questions about Shakespeare's plays, answered from the indexed texts.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Answer a single question and exit instead of starting the prompt loop
    #[arg(short, long)]
    query: Option<String>,

    /// Connect to the collection without checking that it exists
    #[arg(long)]
    skip_index_check: bool,

    /// OpenRouter API key
    #[arg(long, env = config::OPENROUTER_API_KEY, hide_env_values = true)]
    api_key: Option<String>,

    /// Chat model name [default: deepseek/deepseek-chat]
    #[arg(long, env = config::MODEL_NAME)]
    model: Option<String>,

    /// Embedding model name [default: openai/text-embedding-3-small]
    #[arg(long, env = config::EMBEDDING_MODEL)]
    embedding_model: Option<String>,

    /// OpenAI-compatible API base URL [default: https://openrouter.ai/api/v1]
    #[arg(long, env = config::OPENROUTER_BASE_URL)]
    base_url: Option<String>,

    /// Qdrant HTTP address [default: http://localhost:6333]
    #[arg(long, env = config::QDRANT_URL)]
    qdrant_url: Option<String>,

    /// Qdrant collection [default: shakespeare_collection]
    #[arg(long, env = config::QDRANT_COLLECTION_NAME)]
    collection: Option<String>,

    /// Qdrant API key (Qdrant Cloud only)
    #[arg(long, env = config::QDRANT_API_KEY, hide_env_values = true)]
    qdrant_api_key: Option<String>,

    /// Directory with the plain-text plays [default: data/folger-shakespeares]
    #[arg(long, env = config::FOLIO_CORPUS_DIR)]
    corpus_dir: Option<PathBuf>,
}

impl Args {
    /// Flag or environment value for a configuration variable.
    fn value_for(&self, name: &str) -> Option<String> {
        match name {
            config::OPENROUTER_API_KEY => self.api_key.clone(),
            config::MODEL_NAME => self.model.clone(),
            config::EMBEDDING_MODEL => self.embedding_model.clone(),
            config::OPENROUTER_BASE_URL => self.base_url.clone(),
            config::QDRANT_URL => self.qdrant_url.clone(),
            config::QDRANT_COLLECTION_NAME => self.collection.clone(),
            config::QDRANT_API_KEY => self.qdrant_api_key.clone(),
            config::FOLIO_CORPUS_DIR => self
                .corpus_dir
                .as_ref()
                .map(|dir| dir.to_string_lossy().into_owned()),
            _ => None,
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
    let config = RagConfig::from_lookup(|name| args.value_for(name))?;
    tracing::debug!("Configuration: {:?}", config);

    let interactive = args.query.is_none();
    if interactive {
        print_banner();
    }

    let orchestrator = initialize(&config, args.skip_index_check)
        .await
        .context("initialization failed")?;

    match &args.query {
        Some(query) => {
            println!("{}", orchestrator.answer(query.as_str()).await);
        }
        None => {
            println!("{}", "=".repeat(60));
            println!("System ready! Ask questions about Shakespeare's works.");
            println!("Type 'quit' or 'exit' to stop.");
            println!("{}", "=".repeat(60));

            let stdin = BufReader::new(tokio::io::stdin());
            let answered = run_repl(&orchestrator, stdin, tokio::io::stdout()).await?;
            tracing::info!("Session ended after {} questions", answered);
        }
    }
    Ok(())
}

fn print_banner() {
    println!("{}", "=".repeat(60));
    println!("Shakespeare RAG - Qdrant + OpenRouter");
    println!("{}", "=".repeat(60));
}

/// Builds the clients and makes sure the collection exists. Any error here is fatal.
async fn initialize(config: &RagConfig, skip_index_check: bool) -> anyhow::Result<Orchestrator> {
    let embed_config = EmbedConfig::builder()
        .api_key(config.openrouter_api_key.clone())
        .base_url(config.openrouter_base_url.clone())
        .model_name(config.embedding_model.clone())
        .build()?;
    let embedder = Arc::new(OpenAiEmbeddingProvider::new(embed_config)?);

    let store = Arc::new(QdrantStore::new(
        &config.qdrant_url,
        &config.qdrant_collection_name,
        config.qdrant_api_key.as_deref(),
        Duration::from_secs(30),
    )?);

    if skip_index_check {
        tracing::warn!(
            "Skipping the existence check for collection '{}'",
            config.qdrant_collection_name
        );
    } else {
        let indexer = CorpusIndexer::new(store.clone(), embedder.clone(), &config.corpus_dir);
        match indexer.ensure_collection(false).await? {
            IndexAction::Connected => {
                tracing::info!("Connected to collection '{}'", config.qdrant_collection_name);
            }
            IndexAction::Ingested { documents, chunks } | IndexAction::Rebuilt { documents, chunks } => {
                tracing::info!(
                    "Indexed {} documents ({} chunks) into '{}'",
                    documents,
                    chunks,
                    config.qdrant_collection_name
                );
            }
        }
    }

    let chat = OpenAiChatClient::new(
        ChatConfig::new(config.openrouter_api_key.clone(), config.model_name.clone())
            .with_base_url(config.openrouter_base_url.clone()),
    )?;
    tracing::info!("Language model ready: {}", config.model_name);

    Ok(Orchestrator::new(
        Arc::new(VectorIndex::new(embedder, store)),
        Arc::new(chat),
    ))
}
