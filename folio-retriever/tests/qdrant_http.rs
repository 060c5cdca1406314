//! The Qdrant backend against a loopback HTTP server
//!
//! These tests verify that:
//! - transient Qdrant failures are retried twice
//! - client errors fail after one attempt with the response body
//! - a Qdrant that never answers times out
//! - startup refuses to run when Qdrant keeps failing

mod common;

use common::{Reply, StubServer};
use folio_embed::{EmbedConfig, EmbeddingProvider, OpenAiEmbeddingProvider, RetryPolicy};
use folio_retriever::IndexError;
use folio_retriever::retrieval::indexer::CorpusIndexer;
use folio_retriever::storage::VectorStore;
use folio_retriever::storage::qdrant_store::QdrantStore;
use std::sync::Arc;
use std::time::Duration;

fn store(server: &StubServer, timeout: Duration) -> QdrantStore {
    QdrantStore::new(server.base_url.as_str(), "shakespeare_collection", None, timeout)
        .unwrap()
        .with_retry_policy(RetryPolicy::new(2).with_base_delay(Duration::from_millis(10)))
}

#[tokio::test]
async fn test_listing_is_retried_on_server_error() {
    let server = StubServer::start(Reply::always(503, "overloaded")).await;

    let err = store(&server, Duration::from_secs(5))
        .collection_exists()
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("503"), "{err:#}");
    assert!(format!("{err:#}").contains("overloaded"));
    assert_eq!(server.requests(), 3);
}

#[tokio::test]
async fn test_listing_succeeds_after_one_failure() {
    let server = StubServer::start(Reply::Statuses(vec![
        (500, "oops"),
        (
            200,
            r#"{"result": {"collections": [{"name": "shakespeare_collection"}]}, "status": "ok"}"#,
        ),
    ]))
    .await;

    assert!(store(&server, Duration::from_secs(5)).collection_exists().await.unwrap());
    assert_eq!(server.requests(), 2);
}

#[tokio::test]
async fn test_bad_request_is_not_retried() {
    let server =
        StubServer::start(Reply::always(400, r#"{"status": {"error": "bad vector size"}}"#)).await;

    let err = store(&server, Duration::from_secs(5))
        .create_collection(0)
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("bad vector size"));
    assert_eq!(server.requests(), 1);
}

#[tokio::test]
async fn test_stalled_qdrant_times_out() {
    let server = StubServer::start(Reply::Stall).await;

    let err = store(&server, Duration::from_millis(200))
        .collection_exists()
        .await
        .unwrap_err();

    let source = err
        .downcast_ref::<reqwest::Error>()
        .expect("transport error in chain");
    assert!(source.is_timeout(), "{err:#}");
    assert_eq!(server.requests(), 3);
}

#[tokio::test]
async fn test_failing_qdrant_stops_startup() {
    let server = StubServer::start(Reply::always(503, "overloaded")).await;
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(
        OpenAiEmbeddingProvider::new(EmbedConfig::openrouter("sk-or-test", "m")).unwrap(),
    );
    let indexer = CorpusIndexer::new(
        Arc::new(store(&server, Duration::from_secs(5))),
        embedder,
        "/no/such/corpus",
    );

    let err = indexer.ensure_collection(false).await.unwrap_err();

    match err {
        IndexError::Unreachable { url, message } => {
            assert_eq!(url, server.base_url);
            assert!(message.contains("503"), "{message}");
        }
        other => panic!("expected Unreachable, got {other:?}"),
    }
}
