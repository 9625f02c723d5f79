//! Stream resolver tests
//!
//! Redirect following, HEAD fallback and error handling against a mock
//! stream server.

use mockito::Server;
use std::time::Duration;
use zaptv::api::{ResolveError, StreamResolver};

fn resolver() -> StreamResolver {
    StreamResolver::with_timeout("zaptv-test", Duration::from_secs(5)).unwrap()
}

// =============================================================================
// Redirects
// =============================================================================

#[tokio::test]
async fn test_resolve_follows_redirect() {
    let mut server = Server::new_async().await;
    let target = format!("{}/cdn/1", server.url());

    let redirect = server
        .mock("HEAD", "/live/1")
        .with_status(302)
        .with_header("location", &target)
        .create_async()
        .await;
    let _edge_head = server.mock("HEAD", "/cdn/1").with_status(200).create_async().await;
    let _edge_get = server.mock("GET", "/cdn/1").with_status(200).create_async().await;

    let resolved = resolver()
        .resolve(&format!("{}/live/1", server.url()))
        .await
        .unwrap();

    assert_eq!(resolved, target);
    redirect.assert_async().await;
}

#[tokio::test]
async fn test_resolve_without_redirect_returns_same_url() {
    let mut server = Server::new_async().await;
    let _mock = server.mock("HEAD", "/live/2").with_status(200).create_async().await;
    let url = format!("{}/live/2", server.url());

    assert_eq!(resolver().resolve(&url).await.unwrap(), url);
}

#[tokio::test]
async fn test_resolve_falls_back_to_get_when_head_refused() {
    let mut server = Server::new_async().await;
    let head = server
        .mock("HEAD", "/live/3")
        .with_status(405)
        .expect(1)
        .create_async()
        .await;
    let get = server
        .mock("GET", "/live/3")
        .with_status(200)
        .with_body("stream bytes")
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/live/3", server.url());
    assert_eq!(resolver().resolve(&url).await.unwrap(), url);

    head.assert_async().await;
    get.assert_async().await;
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_resolve_server_error() {
    let mut server = Server::new_async().await;
    let _mock = server.mock("HEAD", "/live/4").with_status(503).create_async().await;

    let err = resolver()
        .resolve(&format!("{}/live/4", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::ServerError(503)));
    assert!(err.is_network());
}

#[tokio::test]
async fn test_resolve_or_original_on_failure() {
    let mut server = Server::new_async().await;
    let _mock = server.mock("HEAD", "/live/5").with_status(404).create_async().await;
    let url = format!("{}/live/5", server.url());

    assert_eq!(resolver().resolve_or_original(&url).await, url);
}

#[tokio::test]
async fn test_resolve_or_original_unreachable_host() {
    // Nothing listens on port 9 locally
    let url = "http://127.0.0.1:9/live/6";
    assert_eq!(resolver().resolve_or_original(url).await, url);
}

// =============================================================================
// Passthrough
// =============================================================================

#[tokio::test]
async fn test_segmented_urls_are_not_requested() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("HEAD", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    for path in ["/live/7.m3u8", "/live/7.ts", "/live/7.mpd"] {
        let url = format!("{}{}", server.url(), path);
        assert_eq!(resolver().resolve(&url).await.unwrap(), url);
    }

    mock.assert_async().await;
}
