use std::net::SocketAddr;
use std::sync::Arc;

use alphadex_core::NameStore;
use alphadex_server::serve;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

async fn spawn_server(store: NameStore) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        serve(listener, Arc::new(store), std::future::pending())
            .await
            .expect("serve app")
    });
    addr
}

async fn send_raw(addr: SocketAddr, path: &str) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let req = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, head.to_string(), body.to_string())
}

fn json_strings(body: &str) -> Vec<String> {
    let value: Value = serde_json::from_str(body).expect("json body");
    value
        .as_array()
        .expect("json array")
        .iter()
        .map(|v| v.as_str().expect("string element").to_string())
        .collect()
}

#[tokio::test]
async fn basic_filter_preserves_store_order() {
    let addr = spawn_server(NameStore::from_lines(["alice", "bob", "alan", "zane"])).await;
    let (status, head, body) = send_raw(addr, "/users?startChar=A").await;
    assert_eq!(status, 200);
    assert!(head.to_ascii_lowercase().contains("application/json"));
    assert_eq!(json_strings(&body), vec!["ALICE", "ALAN"]);
}

#[tokio::test]
async fn lowercase_parameter_is_normalized() {
    let addr = spawn_server(NameStore::from_lines(["alice", "bob", "alan"])).await;
    let (status, _, body) = send_raw(addr, "/users?startChar=al").await;
    assert_eq!(status, 200);
    assert_eq!(json_strings(&body), vec!["ALICE", "ALAN"]);
}

#[tokio::test]
async fn result_is_capped_at_one_hundred() {
    let names: Vec<String> = (0..150).map(|i| format!("a{i:03}")).collect();
    let addr = spawn_server(NameStore::from_lines(&names)).await;
    let (status, _, body) = send_raw(addr, "/users?startChar=A").await;
    assert_eq!(status, 200);
    let page = json_strings(&body);
    assert_eq!(page.len(), 100);
    assert_eq!(page.first().map(String::as_str), Some("A000"));
    assert_eq!(page.last().map(String::as_str), Some("A099"));
}

#[tokio::test]
async fn missing_parameter_is_bad_request() {
    let addr = spawn_server(NameStore::from_lines(["alice"])).await;
    let (status, head, body) = send_raw(addr, "/users").await;
    assert_eq!(status, 400);
    assert!(head.to_ascii_lowercase().contains("text/plain"));
    assert_eq!(body, "Missing startChar parameter");

    let (status, _, _) = send_raw(addr, "/users?startChar=").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn unreadable_store_serves_empty_array() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = NameStore::load(dir.path().join("absent.txt"));
    let addr = spawn_server(store).await;
    let (status, _, body) = send_raw(addr, "/users?startChar=A").await;
    assert_eq!(status, 200);
    assert!(json_strings(&body).is_empty());
}

#[tokio::test]
async fn healthz_answers_ok() {
    let addr = spawn_server(NameStore::from_lines(Vec::<String>::new())).await;
    let (status, _, body) = send_raw(addr, "/healthz").await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");
}
