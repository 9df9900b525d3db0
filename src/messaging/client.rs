use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use crate::error::{RegistrarError, Result};
use crate::messaging::provider::{GetTokenOptions, TokenProvider};
use crate::messaging::types::{DeviceToken, MessagePayload};

/// 推送提供方的静态配置（对应 Firebase Web 配置对象）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderOptions {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
}

/// 占位值前缀，说明配置还没有从外部填入
const PLACEHOLDER_PREFIX: &str = "YOUR_";

fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.starts_with(PLACEHOLDER_PREFIX)
}

impl ProviderOptions {
    /// 源码里的占位配置，必须由配置文件 / 环境变量覆盖
    pub fn placeholder() -> Self {
        Self {
            api_key: "YOUR_API_KEY".to_string(),
            auth_domain: "YOUR_AUTH_DOMAIN".to_string(),
            project_id: "YOUR_PROJECT_ID".to_string(),
            storage_bucket: "YOUR_STORAGE_BUCKET".to_string(),
            messaging_sender_id: "YOUR_SENDER_ID".to_string(),
            app_id: "YOUR_APP_ID".to_string(),
        }
    }

    /// 检查必填项（api_key / project_id / messaging_sender_id / app_id）
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("api_key", &self.api_key),
            ("project_id", &self.project_id),
            ("messaging_sender_id", &self.messaging_sender_id),
            ("app_id", &self.app_id),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| is_unset(value))
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RegistrarError::Configuration(format!(
                "provider options not set: {}",
                missing.join(", ")
            )))
        }
    }
}

/// 推送提供方客户端
///
/// 显式构造后注入注册器，不依赖加载时初始化的全局 SDK 实例。
#[derive(Clone)]
pub struct MessagingClient {
    options: ProviderOptions,
    vapid_key: String,
    provider: Arc<dyn TokenProvider>,
}

impl MessagingClient {
    pub fn initialize(
        options: ProviderOptions,
        vapid_key: impl Into<String>,
        provider: Arc<dyn TokenProvider>,
    ) -> Result<Self> {
        options.validate()?;
        let vapid_key = vapid_key.into();
        if is_unset(&vapid_key) {
            return Err(RegistrarError::Configuration(
                "VAPID key not set".to_string(),
            ));
        }

        info!(
            "📨 Messaging client initialized: provider={}, project_id={}",
            provider.name(),
            options.project_id
        );

        Ok(Self {
            options,
            vapid_key,
            provider,
        })
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// 向提供方请求设备令牌
    pub async fn get_token(&self) -> Result<Option<DeviceToken>> {
        let options = GetTokenOptions {
            vapid_key: self.vapid_key.clone(),
        };
        self.provider.get_token(&options).await
    }

    /// 取走前台消息通道
    pub fn on_message(&self) -> Option<mpsc::Receiver<MessagePayload>> {
        self.provider.subscribe_messages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::provider::MockTokenProvider;

    fn options() -> ProviderOptions {
        ProviderOptions {
            api_key: "AIzaTest".to_string(),
            auth_domain: "pickify.firebaseapp.com".to_string(),
            project_id: "pickify".to_string(),
            storage_bucket: String::new(),
            messaging_sender_id: "1234".to_string(),
            app_id: "1:1234:web:abcd".to_string(),
        }
    }

    #[test]
    fn test_placeholder_options_rejected() {
        let err = ProviderOptions::placeholder().validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("api_key"));
        assert!(msg.contains("app_id"));
    }

    #[test]
    fn test_optional_fields_may_be_empty() {
        assert!(options().validate().is_ok());
    }

    #[test]
    fn test_initialize_requires_vapid_key() {
        let provider = Arc::new(MockTokenProvider::empty());
        let result = MessagingClient::initialize(options(), "YOUR_VAPID_KEY", provider);
        assert!(matches!(result, Err(RegistrarError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_get_token_forwards_vapid_key() {
        let provider = Arc::new(MockTokenProvider::with_token("tok"));
        let client = MessagingClient::initialize(options(), "BVapid", provider.clone()).unwrap();

        let token = client.get_token().await.unwrap();
        assert_eq!(token.unwrap().as_str(), "tok");
        assert_eq!(provider.last_vapid_key().as_deref(), Some("BVapid"));
    }
}
