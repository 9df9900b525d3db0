use crate::error::Result;
use crate::messaging::types::{DeviceToken, MessagePayload, PermissionState};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// 宿主权限接口（浏览器 Notification API 的对应物）
#[async_trait]
pub trait PermissionHost: Send + Sync {
    /// 请求通知权限，可能会向用户弹出提示
    async fn request_permission(&self) -> Result<PermissionState>;
}

/// `get_token` 的参数
#[derive(Debug, Clone)]
pub struct GetTokenOptions {
    pub vapid_key: String,
}

/// 推送提供方接口
///
/// 令牌签发、推送通道都由提供方负责，这里只定义边界。
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// 获取当前设备令牌，提供方没有令牌时返回 `None`
    async fn get_token(&self, options: &GetTokenOptions) -> Result<Option<DeviceToken>>;

    /// 前台消息通道，只能取走一次
    fn subscribe_messages(&self) -> Option<mpsc::Receiver<MessagePayload>>;

    /// 前台消息的发送端，交给宿主的消息来源，只能取走一次
    ///
    /// 提供方自己不再持有发送端，来源结束后通道随之关闭。
    fn take_message_sender(&self) -> Option<mpsc::Sender<MessagePayload>> {
        None
    }

    /// 提供方名称（用于日志）
    fn name(&self) -> &'static str;
}
