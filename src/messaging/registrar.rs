use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::messaging::client::MessagingClient;
use crate::messaging::provider::PermissionHost;
use crate::messaging::types::{DeviceToken, RegistrationOutcome};
use crate::messaging::uploader::TokenUploader;

/// 通知注册器
///
/// 单向流程：请求权限 → 获取设备令牌 → 上报令牌。
/// 每一步只在上一步成功时继续；任何失败只记录日志，流程就此停止，
/// 不重试、不向调用方传播错误。停在哪一步通过 [`RegistrationOutcome`] 返回。
///
/// 没有并发去重：同时调用多次会各自跑一遍完整流程。
pub struct NotificationRegistrar {
    permission_host: Arc<dyn PermissionHost>,
    messaging: MessagingClient,
    uploader: TokenUploader,
}

impl NotificationRegistrar {
    pub fn new(
        permission_host: Arc<dyn PermissionHost>,
        messaging: MessagingClient,
        uploader: TokenUploader,
    ) -> Self {
        Self {
            permission_host,
            messaging,
            uploader,
        }
    }

    pub fn messaging(&self) -> &MessagingClient {
        &self.messaging
    }

    /// 请求通知权限，授权后继续获取令牌
    pub async fn request_permission(&self) -> RegistrationOutcome {
        self.permission_step()
            .instrument(registration_span())
            .await
    }

    /// 获取设备令牌，拿到后继续上报
    pub async fn fetch_device_token(&self) -> RegistrationOutcome {
        self.token_step().instrument(registration_span()).await
    }

    /// 上报设备令牌到服务端
    pub async fn upload_token(&self, token: DeviceToken) -> RegistrationOutcome {
        self.upload_step(token)
            .instrument(registration_span())
            .await
    }

    async fn permission_step(&self) -> RegistrationOutcome {
        match self.permission_host.request_permission().await {
            Ok(state) if state.is_granted() => {
                info!("Notification permission granted.");
                self.token_step().await
            }
            Ok(state) => {
                info!("Notification permission not granted: {}", state);
                RegistrationOutcome::PermissionNotGranted(state)
            }
            Err(e) => {
                error!("Error requesting notification permission: {}", e);
                RegistrationOutcome::PermissionRequestFailed
            }
        }
    }

    async fn token_step(&self) -> RegistrationOutcome {
        match self.messaging.get_token().await {
            Ok(Some(token)) => {
                info!("Device token: {}", token);
                self.upload_step(token).await
            }
            Ok(None) => {
                info!("No registration token available. Request permission to generate one.");
                RegistrationOutcome::NoToken
            }
            Err(e) => {
                error!("Error retrieving token: {}", e);
                RegistrationOutcome::TokenFetchFailed
            }
        }
    }

    async fn upload_step(&self, token: DeviceToken) -> RegistrationOutcome {
        match self.uploader.upload(&token).await {
            Ok(result) if result.is_success() => {
                info!("Token saved successfully. status={}", result.status);
                RegistrationOutcome::Uploaded(result)
            }
            Ok(result) => {
                error!(
                    "Error saving token: {} (status={})",
                    result.status_text, result.status
                );
                RegistrationOutcome::UploadRejected(result)
            }
            Err(e) => {
                error!("Error sending token to server: {}", e);
                RegistrationOutcome::UploadFailed
            }
        }
    }
}

fn registration_span() -> tracing::Span {
    info_span!("registration", registration_id = %Uuid::new_v4())
}
