use mockito::{Matcher, Server};
use serde_json::json;

use remote_config_core::{
    ConfigError, ConfigurationMetadata, ConfigurationSnapshot, RemoteSource, SyncMetadata,
    SyncOutcome,
};
use remote_config_infrastructure::{HttpRemoteConfig, HttpRemoteSource};

fn source_for(server: &Server, api_key: Option<&str>) -> HttpRemoteSource {
    HttpRemoteSource::new(HttpRemoteConfig {
        base_url: server.url(),
        timeout_secs: 5,
        api_key: api_key.map(str::to_string),
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_parses_snapshot() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/environments/prod/config")
        .match_header("authorization", "Bearer secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "configs": {"test": "remote_value", "limit": 5},
                "metadata": {"sync_identifier": "sync-456"}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let source = source_for(&server, Some("secret"));
    let snapshot = source.fetch("prod", None).await.unwrap().unwrap();

    let configs = snapshot.configs().unwrap();
    assert_eq!(configs["test"], json!("remote_value"));
    assert_eq!(configs["limit"], json!(5));
    assert_eq!(
        snapshot.metadata().unwrap().unwrap().sync_identifier(),
        "sync-456"
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_sends_version_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/environments/staging/config")
        .match_query(Matcher::UrlEncoded("version".into(), "2.1.0".into()))
        .with_status(200)
        .with_body(json!({"configs": {"a": true}}).to_string())
        .create_async()
        .await;

    let source = source_for(&server, None);
    let snapshot = source.fetch("staging", Some("2.1.0")).await.unwrap().unwrap();

    assert!(snapshot.metadata().unwrap().is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_not_found_is_absent() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/environments/prod/config")
        .with_status(404)
        .create_async()
        .await;

    let source = source_for(&server, None);
    assert!(source.fetch("prod", None).await.unwrap().is_none());
}

#[tokio::test]
async fn test_fetch_server_error_is_network_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/environments/prod/config")
        .with_status(503)
        .create_async()
        .await;

    let source = source_for(&server, None);
    let result = source.fetch("prod", None).await;
    assert!(matches!(result, Err(ConfigError::Network(_))));
}

#[tokio::test]
async fn test_fetch_malformed_body_is_serialization_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/environments/prod/config")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let source = source_for(&server, None);
    let result = source.fetch("prod", None).await;
    assert!(matches!(result, Err(ConfigError::Serialization(_))));
}

#[tokio::test]
async fn test_check_not_modified_is_up_to_date() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/environments/prod/sync")
        .match_header("if-none-match", "\"sync-123\"")
        .with_status(304)
        .create_async()
        .await;

    let source = source_for(&server, None);
    let outcome = source
        .check_for_updates(&SyncMetadata::new("sync-123"), "prod", None)
        .await
        .unwrap();

    assert_eq!(outcome, SyncOutcome::UpToDate);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_check_compares_returned_identifier() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/environments/prod/sync")
        .with_status(200)
        .with_body(json!({"sync_identifier": "sync-456"}).to_string())
        .create_async()
        .await;

    let source = source_for(&server, None);
    let stale = source
        .check_for_updates(&SyncMetadata::new("sync-123"), "prod", None)
        .await
        .unwrap();
    let current = source
        .check_for_updates(&SyncMetadata::new("sync-456"), "prod", None)
        .await
        .unwrap();

    assert_eq!(stale, SyncOutcome::NeedsUpdate);
    assert_eq!(current, SyncOutcome::UpToDate);
}

#[tokio::test]
async fn test_check_maps_failures_to_outcomes() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/environments/gone/sync")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/environments/broken/sync")
        .with_status(500)
        .create_async()
        .await;

    let source = source_for(&server, None);
    let local = SyncMetadata::new("sync-123");

    assert_eq!(
        source.check_for_updates(&local, "gone", None).await.unwrap(),
        SyncOutcome::NotFound
    );
    assert_eq!(
        source.check_for_updates(&local, "broken", None).await.unwrap(),
        SyncOutcome::Error
    );
}

#[tokio::test]
async fn test_check_unreachable_server_is_error_outcome() {
    let source = HttpRemoteSource::new(HttpRemoteConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 1,
        api_key: None,
    })
    .unwrap();

    let outcome = source
        .check_for_updates(&SyncMetadata::new("sync-123"), "prod", None)
        .await
        .unwrap();
    assert_eq!(outcome, SyncOutcome::Error);
}

#[test]
fn test_invalid_base_url_rejected() {
    let result = HttpRemoteSource::new(HttpRemoteConfig {
        base_url: "not a url".to_string(),
        ..HttpRemoteConfig::default()
    });
    assert!(matches!(result, Err(ConfigError::InvalidArgument(_))));
}
