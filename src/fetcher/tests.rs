//! Fetcher tests against a local image host

use super::{FetchRequest, FetchStatus, Fetcher};
use crate::config::HttpConfig;
use crate::error::Error;
use crate::test_support::{
    CAT_JPEG, LARGE_LEN, TRUNCATED_DECLARED, TRUNCATED_SENT, large_body, spawn_image_host,
    spawn_truncating_host, unreachable_addr,
};

fn fetcher() -> Fetcher {
    Fetcher::new(&HttpConfig {
        timeout_secs: 5,
        connect_timeout_secs: 2,
        ..HttpConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_success_returns_full_body() {
    let base = spawn_image_host().await;
    let url = format!("{base}/images/cat.jpg");
    let fetcher = fetcher();

    let result = fetcher.fetch(&FetchRequest::new(&url)).await;

    assert_eq!(result.status, FetchStatus::Success);
    assert_eq!(result.http_status, Some(200));
    assert_eq!(result.bytes.as_deref(), Some(CAT_JPEG));

    let header_len = fetcher
        .inner()
        .get(&url)
        .send()
        .await
        .unwrap()
        .content_length();
    assert_eq!(header_len, result.content_length().map(|n| n as u64));
}

#[tokio::test]
async fn test_fetch_not_found_preserves_status() {
    let base = spawn_image_host().await;

    let result = fetcher()
        .fetch(&FetchRequest::new(format!("{base}/nonexistent.jpg")))
        .await;

    assert!(!result.is_success());
    assert_eq!(result.http_status, Some(404));
    assert!(result.bytes.is_none());
    assert!(result.reason().unwrap().contains("404"));
    assert!(matches!(result.into_result(), Err(Error::HttpStatus(404))));
}

#[tokio::test]
async fn test_fetch_server_error_is_failure() {
    let base = spawn_image_host().await;

    let result = fetcher()
        .fetch(&FetchRequest::new(format!("{base}/broken.jpg")))
        .await;

    assert_eq!(
        result.status,
        FetchStatus::Failure("unexpected status 500".to_string())
    );
    assert_eq!(result.http_status, Some(500));
}

#[tokio::test]
async fn test_fetch_unreachable_host_is_network_error() {
    let addr = unreachable_addr().await;

    let result = fetcher()
        .fetch(&FetchRequest::new(format!("http://{addr}/cat.jpg")))
        .await;

    assert!(!result.is_success());
    assert!(result.http_status.is_none());
    assert!(result.bytes.is_none());
    assert!(result.reason().unwrap().starts_with("network error: "));
    assert!(matches!(result.into_result(), Err(Error::Network(_))));
}

#[tokio::test]
async fn test_fetch_empty_url_is_failure() {
    let result = fetcher().fetch(&FetchRequest::new("")).await;

    assert_eq!(result.reason(), Some("network error: empty URL"));
}

#[tokio::test]
async fn test_fetch_then_persist_round_trip() {
    let base = spawn_image_host().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large.bin");

    let bytes = fetcher()
        .fetch(&FetchRequest::new(format!("{base}/images/large.bin")))
        .await
        .into_result()
        .unwrap();
    crate::storage::persist(&bytes, &path).await.unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), large_body());
}

#[tokio::test]
async fn test_download_to_streams_body() {
    let base = spawn_image_host().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large.bin");

    let written = fetcher()
        .download_to(&format!("{base}/images/large.bin"), &path)
        .await
        .unwrap();

    assert_eq!(written, LARGE_LEN as u64);
    assert_eq!(std::fs::read(&path).unwrap(), large_body());
}

#[tokio::test]
async fn test_download_to_leaves_no_file_on_bad_status() {
    let base = spawn_image_host().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.jpg");

    let err = fetcher()
        .download_to(&format!("{base}/missing.jpg"), &path)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("404"));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_download_to_unwritable_path_is_write_error() {
    let base = spawn_image_host().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("cat.jpg");

    let err = fetcher()
        .download_to(&format!("{base}/images/cat.jpg"), &path)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Write(_)));
}

#[tokio::test]
async fn test_fetch_past_timeout_is_network_error() {
    let base = spawn_image_host().await;
    let fetcher = Fetcher::new(&HttpConfig {
        timeout_secs: 1,
        connect_timeout_secs: 1,
        ..HttpConfig::default()
    })
    .unwrap();

    let result = fetcher
        .fetch(&FetchRequest::new(format!("{base}/images/slow.jpg")))
        .await;

    assert!(!result.is_success());
    assert!(result.reason().unwrap().starts_with("network error: "));
    assert!(result.http_status.is_none());
    assert!(result.bytes.is_none());
}

#[tokio::test]
async fn test_download_to_truncated_body_keeps_partial_file() {
    let base = spawn_truncating_host().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.jpg");

    let err = fetcher()
        .download_to(&format!("{base}/images/partial.jpg"), &path)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Network(_)), "got {err:?}");
    assert!(path.exists());
    let len = std::fs::metadata(&path).unwrap().len() as usize;
    assert!(len <= TRUNCATED_SENT);
    assert!(len < TRUNCATED_DECLARED);
}
