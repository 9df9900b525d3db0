use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::messaging::types::MessagePayload;

/// 标准输入的来源名
pub const STDIN_SOURCE: &str = "-";

/// 打开前台消息来源：文件路径，或 `-` 表示标准输入
pub async fn open_message_source(source: &str) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    if source == STDIN_SOURCE {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }
    let file = tokio::fs::File::open(source).await?;
    Ok(Box::new(BufReader::new(file)))
}

/// 按行读取 JSON 消息并送进前台消息通道
///
/// 空行跳过；解析失败的行记一条警告后跳过。
/// 读到末尾或通道关闭时返回，返回已送出的消息数。
/// `sender` 在返回时被丢弃，监听器随之退出。
pub async fn feed_json_lines<R>(reader: R, sender: mpsc::Sender<MessagePayload>) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    let mut delivered = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("[INBOX] Skipping line {}: invalid JSON: {}", line_no, e);
                continue;
            }
        };

        if sender.send(MessagePayload::new(value)).await.is_err() {
            debug!("[INBOX] Message channel closed, stop reading");
            break;
        }
        delivered += 1;
    }

    info!("[INBOX] Message source ended, delivered={}", delivered);
    Ok(delivered)
}
