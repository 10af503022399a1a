//! Tests for the remote index sink.

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn sink_for(server: &MockServer) -> IndexSink {
    IndexSink::new(&IndexSinkConfig {
        hosts: server.uri(),
        index: "products-copy".to_string(),
    })
    .unwrap()
}

fn doc(id: Option<&str>) -> Document {
    Document {
        id: id.map(String::from),
        source: serde_json::json!({ "title": "T", "price": 9.5 }),
    }
}

#[test]
fn test_task_label() {
    let sink = IndexSink::new(&IndexSinkConfig {
        hosts: "http://localhost:9201".to_string(),
        index: "products-copy".to_string(),
    })
    .unwrap();
    assert_eq!(
        sink.task_label("products"),
        "Migrating: products to: products-copy"
    );
}

#[tokio::test]
async fn test_write_with_id_replaces_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/products-copy/_doc/doc-1"))
        .and(body_json(serde_json::json!({ "title": "T", "price": 9.5 })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut sink = sink_for(&server);
    sink.write(&doc(Some("doc-1"))).await.unwrap();
}

#[tokio::test]
async fn test_write_without_id_posts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products-copy/_doc"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut sink = sink_for(&server);
    sink.write(&doc(None)).await.unwrap();
}

#[tokio::test]
async fn test_write_rejected_is_write_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/products-copy/_doc/doc-1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("node down"))
        .mount(&server)
        .await;

    let mut sink = sink_for(&server);
    let err = sink.write(&doc(Some("doc-1"))).await.unwrap_err();
    assert!(matches!(err, Error::Write(_)));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_flush_is_noop() {
    let server = MockServer::start().await;
    let mut sink = sink_for(&server);
    sink.flush().await.unwrap();
    assert!(server.received_requests().await.unwrap().is_empty());
}
