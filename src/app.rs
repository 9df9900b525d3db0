use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::config::{PermissionMode, RegistrarConfig};
use crate::messaging::inbox;
use crate::messaging::provider::{
    FixedPermissionHost, MockTokenProvider, PermissionHost, PromptPermissionHost,
    StaticTokenProvider, TokenProvider,
};
use crate::messaging::{
    ForegroundListener, MessagePayload, MessagingClient, NotificationRegistrar,
    RegistrationOutcome, TokenUploader,
};

/// 组装好的注册客户端
///
/// 所有依赖都在这里显式构造：权限宿主、推送提供方客户端、上报器，
/// 前台消息监听器在启动时注册一次。
pub struct RegistrarApp {
    registrar: NotificationRegistrar,
    listener: Option<ForegroundListener>,
    message_sender: Option<mpsc::Sender<MessagePayload>>,
}

/// `listen` 的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ListenReport {
    pub outcome: RegistrationOutcome,
    /// 通道关闭时处理的消息数；被 Ctrl-C 打断时为 `None`
    pub handled: Option<usize>,
}

impl RegistrarApp {
    /// 按配置构造；`dev` 时使用 mock 提供方
    pub fn from_config(config: &RegistrarConfig, dev: bool) -> Result<Self> {
        let provider: Arc<dyn TokenProvider> = if dev {
            let token = config.device_token.clone().unwrap_or_default();
            Arc::new(MockTokenProvider::with_token(token))
        } else {
            Arc::new(StaticTokenProvider::new(config.device_token.clone()))
        };

        let permission_host: Arc<dyn PermissionHost> = match config.permission_mode()? {
            PermissionMode::Prompt => Arc::new(PromptPermissionHost::new()),
            PermissionMode::Fixed(state) => Arc::new(FixedPermissionHost::new(state)),
        };

        Self::with_parts(config, permission_host, provider)
    }

    pub fn with_parts(
        config: &RegistrarConfig,
        permission_host: Arc<dyn PermissionHost>,
        provider: Arc<dyn TokenProvider>,
    ) -> Result<Self> {
        let message_sender = provider.take_message_sender();
        let messaging =
            MessagingClient::initialize(config.provider.clone(), config.vapid_key.clone(), provider)
                .context("推送提供方初始化失败")?;
        let uploader = TokenUploader::new(&config.server_url)
            .with_context(|| format!("服务端地址无效: {}", config.server_url))?;

        let listener = messaging.on_message().map(ForegroundListener::new);
        let registrar = NotificationRegistrar::new(permission_host, messaging, uploader);

        Ok(Self {
            registrar,
            listener,
            message_sender,
        })
    }

    pub fn registrar(&self) -> &NotificationRegistrar {
        &self.registrar
    }

    /// 执行一次注册流程
    pub async fn register(&self) -> RegistrationOutcome {
        let outcome = self.registrar.request_permission().await;
        info!("注册流程结束: {:?}", outcome);
        outcome
    }

    /// 注册后持续记录前台消息
    ///
    /// 给了 `messages` 时从该来源读取消息，来源读完后通道关闭、监听结束；
    /// 没给时一直等到 Ctrl-C。来源在注册完成后才打开，不会和权限提示抢标准输入。
    pub async fn listen(mut self, messages: Option<&str>) -> Result<ListenReport> {
        let handle = self.listener.take().map(ForegroundListener::spawn);

        let outcome = self.register().await;

        let Some(handle) = handle else {
            info!("推送提供方没有前台消息通道");
            return Ok(ListenReport {
                outcome,
                handled: None,
            });
        };

        // 没有消息来源时发送端留在这里，通道保持打开
        let _idle_sender = match (messages, self.message_sender.take()) {
            (Some(source), Some(sender)) => {
                let reader = inbox::open_message_source(source)
                    .await
                    .with_context(|| format!("无法打开前台消息来源: {}", source))?;
                info!("📥 从 {} 读取前台消息", source);
                tokio::spawn(async move {
                    if let Err(e) = inbox::feed_json_lines(reader, sender).await {
                        error!("读取前台消息失败: {}", e);
                    }
                });
                None
            }
            (Some(source), None) => {
                info!("推送提供方不接受外部消息，忽略来源: {}", source);
                None
            }
            (None, sender) => sender,
        };

        let handled = tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res.context("无法监听 Ctrl-C")?;
                info!("🛑 收到 Ctrl-C，停止监听");
                None
            }
            res = handle => {
                let handled = res.context("前台消息监听任务异常退出")?;
                info!("前台消息通道已关闭，共处理 {} 条", handled);
                Some(handled)
            }
        };

        Ok(ListenReport { outcome, handled })
    }
}
