mod common;

use std::sync::Arc;

use common::{capture_logs, provider_options};
use pickify_notify::messaging::provider::{FixedPermissionHost, MockTokenProvider};
use pickify_notify::messaging::{ForegroundListener, MessagingClient};
use pickify_notify::{
    MessagePayload, PermissionState, RegistrarApp, RegistrarConfig, RegistrationOutcome,
};
use serde_json::json;

#[tokio::test]
async fn test_foreground_payload_logged_unchanged() {
    let (logs, _guard) = capture_logs();

    let provider = Arc::new(MockTokenProvider::empty());
    let client = MessagingClient::initialize(provider_options(), "BVapid", provider.clone()).unwrap();
    let listener = ForegroundListener::new(client.on_message().unwrap());

    provider
        .push_message(MessagePayload::new(json!({"notification": {"title": "x"}})))
        .await
        .unwrap();

    // 关闭通道，让监听器处理完后退出
    drop(client);
    drop(provider);

    assert_eq!(listener.run().await, 1);
    assert!(logs
        .contents()
        .contains(r#"Message received. {"notification":{"title":"x"}}"#));
}

#[tokio::test]
async fn test_foreground_payload_keeps_key_order() {
    let (logs, _guard) = capture_logs();
    let raw = r#"{"notification":{"title":"x","body":"y"},"data":{"z":1}}"#;

    let provider = Arc::new(MockTokenProvider::empty());
    let client = MessagingClient::initialize(provider_options(), "BVapid", provider.clone()).unwrap();
    let listener = ForegroundListener::new(client.on_message().unwrap());

    let payload: MessagePayload = serde_json::from_str(raw).unwrap();
    provider.push_message(payload).await.unwrap();
    drop(client);
    drop(provider);

    assert_eq!(listener.run().await, 1);
    // 键不按字母重排
    assert!(logs.contents().contains(&format!("Message received. {}", raw)));
}

#[tokio::test]
async fn test_message_channel_registered_once() {
    let provider = Arc::new(MockTokenProvider::empty());
    let client = MessagingClient::initialize(provider_options(), "BVapid", provider).unwrap();

    assert!(client.on_message().is_some());
    assert!(client.on_message().is_none());
}

#[tokio::test]
async fn test_app_registers_listener_at_startup() {
    let config = RegistrarConfig::for_development();
    let provider = Arc::new(MockTokenProvider::empty());
    let app = RegistrarApp::with_parts(
        &config,
        Arc::new(FixedPermissionHost::new(PermissionState::Denied)),
        provider.clone(),
    )
    .unwrap();

    // 启动时已经取走了消息通道和发送端
    assert!(app.registrar().messaging().on_message().is_none());
    assert!(provider
        .push_message(MessagePayload::new(json!({"n": 1})))
        .await
        .is_err());

    let outcome = app.register().await;
    assert!(!outcome.is_registered());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_listen_reads_messages_file_until_end() {
    let (logs, _guard) = capture_logs();
    let dir = tempfile::tempdir().unwrap();
    let inbox = dir.path().join("inbox.jsonl");
    std::fs::write(
        &inbox,
        "{\"notification\":{\"title\":\"first\"}}\n\n{\"data\":{\"b\":2,\"a\":1}}\n",
    )
    .unwrap();

    let config = RegistrarConfig::for_development();
    let app = RegistrarApp::with_parts(
        &config,
        Arc::new(FixedPermissionHost::new(PermissionState::Denied)),
        Arc::new(MockTokenProvider::empty()),
    )
    .unwrap();

    let report = app.listen(Some(inbox.to_str().unwrap())).await.unwrap();

    assert_eq!(
        report.outcome,
        RegistrationOutcome::PermissionNotGranted(PermissionState::Denied)
    );
    assert_eq!(report.handled, Some(2));
    let logs = logs.contents();
    let first = logs
        .find(r#"Message received. {"notification":{"title":"first"}}"#)
        .unwrap();
    let second = logs.find(r#"Message received. {"data":{"b":2,"a":1}}"#).unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn test_listen_with_missing_messages_file_fails() {
    let config = RegistrarConfig::for_development();
    let app = RegistrarApp::with_parts(
        &config,
        Arc::new(FixedPermissionHost::new(PermissionState::Denied)),
        Arc::new(MockTokenProvider::empty()),
    )
    .unwrap();

    assert!(app.listen(Some("/nonexistent/pickify/inbox.jsonl")).await.is_err());
}
