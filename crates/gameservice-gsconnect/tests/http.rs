//! End-to-end tests of `gsinit.php` over a real socket.

use std::time::Duration;

use gameservice_gsconnect::{DiscoveryConfig, GsConnectServer};
use gameservice_lobby::GameCatalog;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

async fn start() -> std::net::SocketAddr {
    let config = DiscoveryConfig {
        external_host: "198.51.100.20".into(),
        ..Default::default()
    };
    let games = GameCatalog::new(["HEROES_5", "SPLINTERCELL3PC"]);
    let server = GsConnectServer::bind("127.0.0.1:0", &config, games)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

/// Sends one `GET` and returns the raw response text.
async fn get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("response within timeout")
        .unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn test_supported_product_gets_servers_block() {
    let addr = start().await;
    let response = get(addr, "/gsinit.php?user=alice&dp=HEROES_5").await;

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.to_ascii_lowercase().contains("content-type: text/plain"));
    assert!(response.contains("[Servers]\nRouterIP0=198.51.100.20\nRouterPort0=40000"));
    assert!(response.ends_with("ProxyPort0=4040"));
}

#[tokio::test]
async fn test_missing_product_is_bad_request() {
    let addr = start().await;
    assert!(get(addr, "/gsinit.php?user=alice").await.starts_with("HTTP/1.1 400"));
    assert!(get(addr, "/gsinit.php?dp=").await.starts_with("HTTP/1.1 400"));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let addr = start().await;
    let response = get(addr, "/gsinit.php?user=alice&dp=PONG").await;
    assert!(response.starts_with("HTTP/1.1 404"), "{response}");
}
