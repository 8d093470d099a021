use std::collections::HashMap;
use std::net::SocketAddr;

use fakeserver::logger::Logger;
use fakeserver::{Document, FakeServer, ObjectStore, ServerOptions};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, StatusCode};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::{json, Value};

type HttpClient = Client<HttpConnector, Full<Bytes>>;

struct Harness {
    server: FakeServer,
    addr: SocketAddr,
    client: HttpClient,
}

impl Harness {
    async fn start(objects: ObjectStore) -> Self {
        let server = FakeServer::new(ServerOptions {
            port: 0,
            objects,
            start: true,
            logger: Logger::capture(false).0,
            ..ServerOptions::default()
        })
        .await
        .unwrap();
        let addr = server.local_addr().unwrap();
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self {
            server,
            addr,
            client,
        }
    }

    async fn send(&self, method: Method, path: &str, body: &str) -> (StatusCode, Bytes) {
        send(&self.client, self.addr, method, path, body).await
    }

    async fn send_json(&self, method: Method, path: &str, body: &str) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, path, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

async fn send(
    client: &HttpClient,
    addr: SocketAddr,
    method: Method,
    path: &str,
    body: &str,
) -> (StatusCode, Bytes) {
    let req = Request::builder()
        .method(method)
        .uri(format!("http://{addr}{path}"))
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap();
    let response = client.request(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes)
}

fn document(value: Value) -> Document {
    value.as_object().unwrap().clone()
}

#[tokio::test]
async fn put_then_get_returns_document_unchanged() {
    let mut h = Harness::start(ObjectStore::new()).await;
    let doc = r#"{"id":"k","n":1.5,"list":[true,null,"s"],"inner":{"deep":{}}}"#;

    let (status, echoed) = h.send_json(Method::PUT, "/api/objects/k", doc).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(echoed, serde_json::from_str::<Value>(doc).unwrap());

    let (status, fetched) = h.send_json(Method::GET, "/api/objects/k", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, serde_json::from_str::<Value>(doc).unwrap());

    h.server.shutdown().await;
}

#[tokio::test]
async fn post_then_get_returns_same_fields() {
    let mut h = Harness::start(ObjectStore::new()).await;

    let (status, _) = h
        .send(
            Method::POST,
            "/api/objects",
            r#"{"id":"1234","first":"Foo","last":"Bar"}"#,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, fetched) = h.send_json(Method::GET, "/api/objects/1234", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, json!({"id":"1234","first":"Foo","last":"Bar"}));

    h.server.shutdown().await;
}

#[tokio::test]
async fn post_without_identifier_is_rejected() {
    let mut h = Harness::start(ObjectStore::new()).await;

    let (status, _) = h
        .send(Method::POST, "/api/objects", r#"{"first":"Foo"}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, listed) = h.send_json(Method::GET, "/api/objects", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));

    h.server.shutdown().await;
}

#[tokio::test]
async fn delete_missing_is_ok_and_repeatable() {
    let mut h = Harness::start(ObjectStore::new()).await;

    for _ in 0..3 {
        let (status, body) = h.send(Method::DELETE, "/api/objects/missing-id", "").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    let (status, _) = h.send(Method::GET, "/api/objects/missing-id", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    h.server.shutdown().await;
}

#[tokio::test]
async fn list_returns_every_created_object() {
    let mut h = Harness::start(ObjectStore::new()).await;
    let count = 12;

    for i in 0..count {
        let body = json!({"id": format!("obj-{i}"), "index": i}).to_string();
        let (status, _) = h.send(Method::POST, "/api/objects", &body).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, listed) = h.send_json(Method::GET, "/api/objects", "").await;
    let items = listed.as_array().unwrap();
    assert_eq!(items.len(), count);
    for i in 0..count {
        assert!(items.contains(&json!({"id": format!("obj-{i}"), "index": i})));
    }

    h.server.shutdown().await;
}

#[tokio::test]
async fn malformed_update_leaves_prior_state() {
    let mut h = Harness::start(ObjectStore::new()).await;
    h.send(Method::PUT, "/api/objects/1", r#"{"id":"1","v":"before"}"#)
        .await;

    let (status, _) = h.send(Method::PUT, "/api/objects/1", "{").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, fetched) = h.send_json(Method::GET, "/api/objects/1", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, json!({"id":"1","v":"before"}));

    h.server.shutdown().await;
}

#[tokio::test]
async fn malformed_create_stores_nothing() {
    let mut h = Harness::start(ObjectStore::new()).await;

    let (status, _) = h.send(Method::POST, "/api/objects", "{").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, listed) = h.send_json(Method::GET, "/api/objects", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
    assert!(h.server.objects().is_empty().await);

    h.server.shutdown().await;
}

#[tokio::test]
async fn encoded_identifier_round_trip() {
    let mut h = Harness::start(ObjectStore::new()).await;

    let (status, _) = h
        .send(Method::POST, "/api/objects", r#"{"id":"a b","v":1}"#)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, fetched) = h.send_json(Method::GET, "/api/objects/a%20b", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, json!({"id":"a b","v":1}));

    h.server.shutdown().await;
}

#[tokio::test]
async fn bad_paths_and_methods() {
    let mut h = Harness::start(ObjectStore::new()).await;

    let (status, body) = h.send(Method::GET, "/wrong/objects", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8_lossy(&body).contains("wrong"));

    let (status, body) = h.send(Method::GET, "/api/objects/1/2", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8_lossy(&body).contains("/2"));

    let (status, _) = h.send(Method::DELETE, "/api/objects", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = h.send(Method::PATCH, "/api/objects/1", "{}").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    h.server.shutdown().await;
}

#[tokio::test]
async fn store_is_shared_with_the_caller() {
    let mut seed = HashMap::new();
    seed.insert("seeded".to_string(), document(json!({"id": "seeded", "v": 1})));
    let objects = ObjectStore::with_objects(seed);
    let mut h = Harness::start(objects.clone()).await;

    let (status, fetched) = h.send_json(Method::GET, "/api/objects/seeded", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, json!({"id": "seeded", "v": 1}));

    h.send(Method::POST, "/api/objects", r#"{"ID":"fresh"}"#).await;
    assert_eq!(objects.get("fresh").await, Some(document(json!({"ID": "fresh"}))));

    h.server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_never_interleave() {
    let mut h = Harness::start(ObjectStore::new()).await;
    let writers = 8_i64;
    let rounds = 21;

    let mut tasks = Vec::new();
    for writer in 0..writers {
        let client = h.client.clone();
        let addr = h.addr;
        tasks.push(tokio::spawn(async move {
            let doc = json!({"id": "shared", "writer": writer, "payload": vec![writer; 64]});
            for round in 0..rounds {
                let (method, path) = match round % 3 {
                    0 => (Method::PUT, "/api/objects/shared"),
                    1 => (Method::POST, "/api/objects"),
                    _ => (Method::DELETE, "/api/objects/shared"),
                };
                let body = if method == Method::DELETE {
                    String::new()
                } else {
                    doc.to_string()
                };
                let (status, _) = send(&client, addr, method, path, &body).await;
                assert_eq!(status, StatusCode::OK);

                let (status, bytes) =
                    send(&client, addr, Method::GET, "/api/objects/shared", "").await;
                match status {
                    StatusCode::OK => {
                        let seen: Value = serde_json::from_slice(&bytes).unwrap();
                        let owner = seen["writer"].as_i64().unwrap();
                        assert_eq!(seen["payload"], json!(vec![owner; 64]));
                    }
                    other => assert_eq!(other, StatusCode::NOT_FOUND),
                }
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    if let Some(last) = h.server.objects().get("shared").await {
        let owner = last["writer"].as_i64().unwrap();
        assert!((0..writers).contains(&owner));
        assert_eq!(last["payload"], json!(vec![owner; 64]));
    }

    h.server.shutdown().await;
}

#[tokio::test]
async fn shutdown_stops_accepting() {
    let mut h = Harness::start(ObjectStore::new()).await;
    let (status, _) = h.send(Method::GET, "/api/objects", "").await;
    assert_eq!(status, StatusCode::OK);

    h.server.shutdown().await;
    assert!(!h.server.running());

    // A fresh client so no pooled connection is reused
    let client: HttpClient = Client::builder(TokioExecutor::new()).build_http();
    let req = Request::builder()
        .uri(format!("http://{}/api/objects", h.addr))
        .body(Full::new(Bytes::new()))
        .unwrap();
    assert!(client.request(req).await.is_err());
}

#[tokio::test]
async fn dropping_server_stops_accepting() {
    let h = Harness::start(ObjectStore::new()).await;
    let (status, _) = h.send(Method::GET, "/api/objects", "").await;
    assert_eq!(status, StatusCode::OK);

    let addr = h.addr;
    drop(h);

    // The accept loop notices the closed channel on its next poll
    let mut refused = false;
    for _ in 0..100 {
        if tokio::net::TcpStream::connect(addr).await.is_err() {
            refused = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert!(refused, "listener still accepting after drop");
}
