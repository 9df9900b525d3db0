use reqwest::Client;
use tracing::info;
use url::Url;

use crate::error::Result;
use crate::messaging::types::{DeviceToken, SaveTokenRequest, UploadResult};

/// 服务端保存设备令牌的固定路径
pub const SAVE_DEVICE_TOKEN_PATH: &str = "/save-device-token";

/// 令牌上报器
///
/// 把设备令牌 POST 到 `<base_url>/save-device-token`，
/// 任意 HTTP 响应都以 [`UploadResult`] 返回，只有网络层失败才返回错误。
#[derive(Clone)]
pub struct TokenUploader {
    client: Client,
    endpoint: Url,
}

impl TokenUploader {
    /// 创建新的上报器
    ///
    /// # 参数
    /// - base_url: 服务端地址，例如 `http://localhost:8000`
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let endpoint = Url::parse(base_url)?.join(SAVE_DEVICE_TOKEN_PATH)?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn upload(&self, token: &DeviceToken) -> Result<UploadResult> {
        info!("[UPLOAD] POST {}", self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .json(&SaveTokenRequest { token })
            .send()
            .await?;

        let status = response.status();
        Ok(UploadResult {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        })
    }
}
