//! In-process image host for tests

use axum::{Router, http::StatusCode, http::header, response::IntoResponse, routing::get};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Fake JPEG payload served at `/images/cat.jpg`
pub const CAT_JPEG: &[u8] = b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00\x01\x01\x00\x00\x01\x00\x01\x00\x00fake-cat\xFF\xD9";

/// How long `/images/slow.jpg` waits before answering
pub const SLOW_DELAY: Duration = Duration::from_secs(3);

/// Bytes actually sent by the truncated host, out of `TRUNCATED_DECLARED`
pub const TRUNCATED_SENT: usize = 100;
pub const TRUNCATED_DECLARED: usize = 1000;

/// Size of the body served at `/images/large.bin`
pub const LARGE_LEN: usize = 256 * 1024;

pub fn large_body() -> Vec<u8> {
    (0..LARGE_LEN).map(|i| (i % 251) as u8).collect()
}

async fn cat() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/jpeg")], CAT_JPEG)
}

async fn large() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/octet-stream")], large_body())
}

async fn slow() -> impl IntoResponse {
    tokio::time::sleep(SLOW_DELAY).await;
    ([(header::CONTENT_TYPE, "image/jpeg")], CAT_JPEG)
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

/// Serve the fixture routes on an ephemeral port and return the base URL
pub async fn spawn_image_host() -> String {
    let app = Router::new()
        .route("/images/cat.jpg", get(cat))
        .route("/images/large.bin", get(large))
        .route("/images/slow.jpg", get(slow))
        .route("/broken.jpg", get(broken));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// An address nothing is listening on
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Serve one response that declares more body than it sends, then hang up
///
/// Returns the base URL.
pub async fn spawn_truncating_host() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: {TRUNCATED_DECLARED}\r\n\r\n"
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&[0xAB; TRUNCATED_SENT]).await.unwrap();
        socket.flush().await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}")
}
