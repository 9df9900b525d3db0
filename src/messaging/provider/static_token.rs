use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::{RegistrarError, Result};
use crate::messaging::provider::provider_trait::{GetTokenOptions, TokenProvider};
use crate::messaging::types::{DeviceToken, MessagePayload};

/// 静态令牌 Provider
///
/// 令牌由外部（配置文件、`PICKIFY_DEVICE_TOKEN`、`--token`）提前签发好，
/// 这里只负责交给注册器。前台消息由宿主取走发送端后注入
/// （`listen --messages`）。
pub struct StaticTokenProvider {
    token: Option<String>,
    sender: Mutex<Option<mpsc::Sender<MessagePayload>>>,
    receiver: Mutex<Option<mpsc::Receiver<MessagePayload>>>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        let (sender, receiver) = mpsc::channel(256);
        Self {
            token,
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(Some(receiver)),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self, options: &GetTokenOptions) -> Result<Option<DeviceToken>> {
        if options.vapid_key.trim().is_empty() {
            return Err(RegistrarError::TokenFetch("VAPID key must not be empty".to_string()));
        }

        match self.token.as_deref().and_then(DeviceToken::new) {
            Some(token) => {
                info!("[STATIC PROVIDER] Using pre-issued device token");
                Ok(Some(token))
            }
            None => {
                warn!("[STATIC PROVIDER] No pre-issued device token configured");
                Ok(None)
            }
        }
    }

    fn subscribe_messages(&self) -> Option<mpsc::Receiver<MessagePayload>> {
        self.receiver.lock().ok().and_then(|mut r| r.take())
    }

    fn take_message_sender(&self) -> Option<mpsc::Sender<MessagePayload>> {
        self.sender.lock().ok().and_then(|mut s| s.take())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> GetTokenOptions {
        GetTokenOptions {
            vapid_key: "BKey".to_string(),
        }
    }

    #[tokio::test]
    async fn test_returns_configured_token() {
        let provider = StaticTokenProvider::new(Some("tok-1".to_string()));
        let token = provider.get_token(&options()).await.unwrap();
        assert_eq!(token.unwrap().as_str(), "tok-1");
    }

    #[tokio::test]
    async fn test_blank_token_is_absent() {
        let provider = StaticTokenProvider::new(Some("  ".to_string()));
        assert!(provider.get_token(&options()).await.unwrap().is_none());

        let provider = StaticTokenProvider::new(None);
        assert!(provider.get_token(&options()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_vapid_key_fails() {
        let provider = StaticTokenProvider::new(Some("tok-1".to_string()));
        let err = provider
            .get_token(&GetTokenOptions { vapid_key: String::new() })
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::TokenFetch(_)));
    }

    #[tokio::test]
    async fn test_message_channel_taken_once() {
        let provider = StaticTokenProvider::new(None);
        let mut rx = provider.subscribe_messages().unwrap();
        assert!(provider.subscribe_messages().is_none());

        let tx = provider.take_message_sender().unwrap();
        assert!(provider.take_message_sender().is_none());

        tx.send(MessagePayload::new(serde_json::json!({"data": 1})))
            .await
            .unwrap();
        let got = rx.recv().await.unwrap();
        assert_eq!(got.as_value()["data"], 1);

        // 提供方不再持有发送端，宿主丢掉后通道关闭
        drop(tx);
        assert!(rx.recv().await.is_none());
    }
}
