use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::error::{RegistrarError, Result};
use crate::messaging::provider::provider_trait::PermissionHost;
use crate::messaging::types::PermissionState;

/// 终端交互式权限提示（浏览器权限弹窗的终端版本）
///
/// - `y` / `yes` → granted
/// - `n` / `no` → denied
/// - 直接回车 → default（用户未做决定）
pub struct PromptPermissionHost {
    prompt: String,
}

impl PromptPermissionHost {
    pub fn new() -> Self {
        Self {
            prompt: "Allow notifications from Pickify? [y/N] ".to_string(),
        }
    }

    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into() }
    }
}

impl Default for PromptPermissionHost {
    fn default() -> Self {
        Self::new()
    }
}

/// 解析用户输入
pub fn parse_prompt_answer(answer: &str) -> PermissionState {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => PermissionState::Granted,
        "n" | "no" => PermissionState::Denied,
        _ => PermissionState::Default,
    }
}

#[async_trait]
impl PermissionHost for PromptPermissionHost {
    async fn request_permission(&self) -> Result<PermissionState> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(self.prompt.as_bytes()).await?;
        stderr.flush().await?;

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        if read == 0 {
            return Err(RegistrarError::PermissionRequest(
                "stdin closed, no interactive terminal to ask".to_string(),
            ));
        }

        let state = parse_prompt_answer(&line);
        debug!("权限提示回答: {:?} -> {}", line.trim(), state);
        Ok(state)
    }
}

/// 固定回答的权限宿主
///
/// 用于非交互运行（`--permission granted`）以及测试；
/// `unsupported` 模拟不支持通知的宿主环境。
pub struct FixedPermissionHost {
    answer: std::result::Result<PermissionState, String>,
}

impl FixedPermissionHost {
    pub fn new(state: PermissionState) -> Self {
        Self { answer: Ok(state) }
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self {
            answer: Err(reason.into()),
        }
    }
}

#[async_trait]
impl PermissionHost for FixedPermissionHost {
    async fn request_permission(&self) -> Result<PermissionState> {
        self.answer
            .clone()
            .map_err(RegistrarError::PermissionRequest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt_answer() {
        assert_eq!(parse_prompt_answer("y\n"), PermissionState::Granted);
        assert_eq!(parse_prompt_answer(" YES "), PermissionState::Granted);
        assert_eq!(parse_prompt_answer("n"), PermissionState::Denied);
        assert_eq!(parse_prompt_answer("No\r\n"), PermissionState::Denied);
        assert_eq!(parse_prompt_answer("\n"), PermissionState::Default);
        assert_eq!(parse_prompt_answer("maybe"), PermissionState::Default);
    }

    #[tokio::test]
    async fn test_fixed_host_answers() {
        let host = FixedPermissionHost::new(PermissionState::Denied);
        assert_eq!(host.request_permission().await.unwrap(), PermissionState::Denied);

        let host = FixedPermissionHost::unsupported("no Notification API");
        let err = host.request_permission().await.unwrap_err();
        assert!(matches!(err, RegistrarError::PermissionRequest(_)));
    }
}
