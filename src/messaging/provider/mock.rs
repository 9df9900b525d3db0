use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::info;

use crate::error::{RegistrarError, Result};
use crate::messaging::provider::provider_trait::{GetTokenOptions, TokenProvider};
use crate::messaging::types::{DeviceToken, MessagePayload};

/// 预设的取令牌结果
#[derive(Debug, Clone)]
pub enum MockTokenReply {
    Token(String),
    Empty,
    Fail(String),
}

/// Mock Provider（用于测试和 `--dev` 运行）
///
/// 不调用真实 SDK，只打印日志并记录调用次数
pub struct MockTokenProvider {
    reply: MockTokenReply,
    calls: AtomicUsize,
    last_vapid_key: Mutex<Option<String>>,
    sender: Mutex<Option<mpsc::Sender<MessagePayload>>>,
    receiver: Mutex<Option<mpsc::Receiver<MessagePayload>>>,
}

impl MockTokenProvider {
    pub fn new(reply: MockTokenReply) -> Self {
        let (sender, receiver) = mpsc::channel(64);
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_vapid_key: Mutex::new(None),
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(Some(receiver)),
        }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(MockTokenReply::Token(token.into()))
    }

    pub fn empty() -> Self {
        Self::new(MockTokenReply::Empty)
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self::new(MockTokenReply::Fail(reason.into()))
    }

    /// `get_token` 被调用的次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_vapid_key(&self) -> Option<String> {
        self.last_vapid_key.lock().ok().and_then(|k| k.clone())
    }

    /// 模拟一条前台消息
    ///
    /// 发送端已被宿主取走时返回错误。
    pub async fn push_message(&self, payload: MessagePayload) -> Result<()> {
        let sender = self
            .sender
            .lock()
            .ok()
            .and_then(|s| s.clone())
            .ok_or_else(|| RegistrarError::TokenFetch("message sender taken".to_string()))?;
        sender
            .send(payload)
            .await
            .map_err(|e| RegistrarError::TokenFetch(format!("message channel closed: {}", e)))
    }
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn get_token(&self, options: &GetTokenOptions) -> Result<Option<DeviceToken>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut key) = self.last_vapid_key.lock() {
            *key = Some(options.vapid_key.clone());
        }
        info!("[MOCK PROVIDER] get_token: reply={:?}", self.reply);

        match &self.reply {
            MockTokenReply::Token(token) => Ok(DeviceToken::new(token.clone())),
            MockTokenReply::Empty => Ok(None),
            MockTokenReply::Fail(reason) => Err(RegistrarError::TokenFetch(reason.clone())),
        }
    }

    fn subscribe_messages(&self) -> Option<mpsc::Receiver<MessagePayload>> {
        self.receiver.lock().ok().and_then(|mut r| r.take())
    }

    fn take_message_sender(&self) -> Option<mpsc::Sender<MessagePayload>> {
        self.sender.lock().ok().and_then(|mut s| s.take())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
