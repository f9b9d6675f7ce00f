// Shared primitives for one-time server bootstrapping across integration tests.
#![allow(dead_code)]

use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

use arena_server::domain::Tuning;
use arena_server::use_cases::ServerSettings;
use futures::StreamExt;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Global base URL used by all tests after the server publishes its bound address.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Faster ticks keep the tests short. Test clients read lazily, so the stalled-client
// limit is raised to keep them from being disconnected mid-test.
fn test_settings() -> ServerSettings {
    ServerSettings {
        tuning: Tuning::default(),
        tick_interval: Duration::from_millis(50),
        diagnostic_interval: Duration::from_secs(60),
        event_queue_capacity: 1024,
        connection_queue_capacity: 32,
        max_dropped_snapshots: 10_000,
    }
}

// Ensure the test server is running and return the shared base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));
                arena_server::run_with_settings(listener, test_settings())
                    .await
                    .expect("server failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

// Wait for URL publication and then wait for the server socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}

pub async fn connect() -> Client {
    let base_url = ensure_server();
    let ws_url = format!("ws://{}/ws", base_url.trim_start_matches("http://"));
    let (client, _response) = tokio_tungstenite::connect_async(ws_url)
        .await
        .expect("websocket upgrade should succeed");
    client
}

// Next snapshot from the server, skipping control frames.
pub async fn next_snapshot(client: &mut Client) -> Value {
    let read = async {
        loop {
            let msg = client
                .next()
                .await
                .expect("stream should stay open")
                .expect("frame should be readable");
            if let Message::Text(_) = msg {
                let text = msg.to_text().expect("utf-8 text");
                return serde_json::from_str::<Value>(text).expect("snapshot should be json");
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), read)
        .await
        .expect("snapshot should arrive in time")
}

pub async fn fetch_stats() -> Value {
    let base_url = ensure_server();
    reqwest::get(format!("{base_url}/stats"))
        .await
        .expect("stats request should succeed")
        .json::<Value>()
        .await
        .expect("stats should be json")
}

// Wire ids in a snapshot's entity list.
pub fn ids(snapshot: &Value) -> Vec<i64> {
    snapshot["players"]
        .as_array()
        .expect("players array")
        .iter()
        .filter_map(|p| p["id"].as_i64())
        .collect()
}
