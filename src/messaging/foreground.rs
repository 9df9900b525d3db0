use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::messaging::types::MessagePayload;

/// 前台消息处理器：只记录日志，不做任何转换、去重或确认
#[derive(Debug, Default, Clone, Copy)]
pub struct ForegroundMessageHandler;

impl ForegroundMessageHandler {
    /// 记录消息并原样返回
    pub fn handle(&self, payload: MessagePayload) -> MessagePayload {
        info!("Message received. {}", payload);
        payload
    }
}

/// 前台消息监听器
///
/// 启动时在提供方的消息通道上注册一次，通道关闭时退出。
pub struct ForegroundListener {
    receiver: mpsc::Receiver<MessagePayload>,
    handler: ForegroundMessageHandler,
}

impl ForegroundListener {
    pub fn new(receiver: mpsc::Receiver<MessagePayload>) -> Self {
        Self {
            receiver,
            handler: ForegroundMessageHandler,
        }
    }

    /// 处理消息直到通道关闭，返回处理的消息数
    pub async fn run(mut self) -> usize {
        info!("[FOREGROUND] Listening for foreground messages");

        let mut handled = 0;
        while let Some(payload) = self.receiver.recv().await {
            self.handler.handle(payload);
            handled += 1;
        }

        info!("[FOREGROUND] Message channel closed, handled={}", handled);
        handled
    }

    pub fn spawn(self) -> JoinHandle<usize> {
        tokio::spawn(self.run())
    }
}
