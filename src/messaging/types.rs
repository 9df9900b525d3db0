use serde::{Deserialize, Serialize};
use std::fmt;

/// 通知权限状态（由宿主环境给出，不持久化）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    Default,
}

impl PermissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Default => "default",
        }
    }

    /// 解析宿主返回的权限字符串，未知值按 `default` 处理
    pub fn from_host_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "granted" => PermissionState::Granted,
            "denied" => PermissionState::Denied,
            _ => PermissionState::Default,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 设备令牌（推送提供方签发的不透明字符串）
///
/// 只能通过 [`DeviceToken::new`] 构造，空串不会产生令牌。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DeviceToken(String);

impl DeviceToken {
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 令牌上报请求体：`{"token": "<token>"}`
#[derive(Debug, Serialize)]
pub struct SaveTokenRequest<'a> {
    pub token: &'a DeviceToken,
}

/// 令牌上报结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub status: u16,
    pub status_text: String,
}

impl UploadResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 前台消息（结构由推送提供方定义，原样保留）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessagePayload(pub serde_json::Value);

impl MessagePayload {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl fmt::Display for MessagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 一次注册流程停下来的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// 用户未授予权限（denied / default）
    PermissionNotGranted(PermissionState),
    /// 权限请求本身失败
    PermissionRequestFailed,
    /// 提供方没有返回令牌
    NoToken,
    /// 获取令牌失败
    TokenFetchFailed,
    /// 令牌已保存
    Uploaded(UploadResult),
    /// 服务端返回非 2xx
    UploadRejected(UploadResult),
    /// 上报请求在网络层失败
    UploadFailed,
}

impl RegistrationOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, RegistrationOutcome::Uploaded(_))
    }
}
