use thiserror::Error;

/// 注册流程错误类型
///
/// 注册器内部只记录这些错误，不向上传播；
/// 它们主要用于 provider / uploader 与注册器之间的边界。
#[derive(Debug, Error)]
pub enum RegistrarError {
    /// 通知权限请求失败（宿主环境不支持等）
    #[error("Permission request failed: {0}")]
    PermissionRequest(String),
    /// 从推送提供方获取令牌失败
    #[error("Token fetch failed: {0}")]
    TokenFetch(String),
    /// 网络错误
    #[error("Network error: {0}")]
    Network(String),
    /// 配置错误
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for RegistrarError {
    fn from(err: serde_json::Error) -> Self {
        RegistrarError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for RegistrarError {
    fn from(err: reqwest::Error) -> Self {
        RegistrarError::Network(err.to_string())
    }
}

impl From<url::ParseError> for RegistrarError {
    fn from(err: url::ParseError) -> Self {
        RegistrarError::Configuration(format!("invalid url: {}", err))
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, RegistrarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let err = RegistrarError::PermissionRequest("unsupported".to_string());
        assert_eq!(err.to_string(), "Permission request failed: unsupported");
    }

    #[test]
    fn test_url_error_maps_to_configuration() {
        let err: RegistrarError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, RegistrarError::Configuration(_)));
    }
}
