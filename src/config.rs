use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::messaging::client::ProviderOptions;
use crate::messaging::types::PermissionState;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// 注册客户端配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrarConfig {
    /// 推送提供方配置
    pub provider: ProviderOptions,
    /// VAPID 公钥
    pub vapid_key: String,
    /// 服务端地址（令牌上报到 `<server_url>/save-device-token`）
    pub server_url: String,
    /// 预先签发的设备令牌
    pub device_token: Option<String>,
    /// 权限应答方式：prompt / granted / denied / default
    pub permission: String,
    /// 日志级别
    pub log_level: String,
    /// 日志格式
    pub log_format: Option<String>,
    /// 日志文件路径
    pub log_file: Option<String>,
    /// 实际读取的配置文件
    #[serde(skip)]
    pub loaded_from: Option<String>,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            provider: ProviderOptions::placeholder(),
            vapid_key: "YOUR_VAPID_KEY".to_string(),
            server_url: "http://localhost:8000".to_string(),
            device_token: None,
            permission: "prompt".to_string(),
            log_level: "info".to_string(),
            log_format: None,
            log_file: None,
            loaded_from: None,
        }
    }
}

/// 权限应答方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionMode {
    /// 在终端询问用户
    Prompt,
    /// 固定回答
    Fixed(PermissionState),
}

impl PermissionMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "prompt" | "ask" => Some(PermissionMode::Prompt),
            "granted" => Some(PermissionMode::Fixed(PermissionState::Granted)),
            "denied" => Some(PermissionMode::Fixed(PermissionState::Denied)),
            "default" => Some(PermissionMode::Fixed(PermissionState::Default)),
            _ => None,
        }
    }
}

impl RegistrarConfig {
    /// 创建新的配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 开发模式配置：mock 提供方可直接跑通整条流程
    pub fn for_development() -> Self {
        Self {
            provider: ProviderOptions {
                api_key: "dev-api-key".to_string(),
                auth_domain: "localhost".to_string(),
                project_id: "pickify-dev".to_string(),
                storage_bucket: String::new(),
                messaging_sender_id: "0".to_string(),
                app_id: "1:0:web:dev".to_string(),
            },
            vapid_key: "dev-vapid-key".to_string(),
            device_token: Some("dev-device-token".to_string()),
            permission: "granted".to_string(),
            log_level: "debug".to_string(),
            ..Self::default()
        }
    }

    /// 解析权限应答方式
    pub fn permission_mode(&self) -> Result<PermissionMode> {
        match PermissionMode::parse(&self.permission) {
            Some(mode) => Ok(mode),
            None => bail!(
                "未知的权限应答方式: {}（可选 prompt, granted, denied, default）",
                self.permission
            ),
        }
    }

    /// 检查配置是否可用于注册
    pub fn validate(&self) -> Result<()> {
        self.provider
            .validate()
            .context("推送提供方配置无效")?;
        if self.vapid_key.trim().is_empty() || self.vapid_key.starts_with("YOUR_") {
            bail!("VAPID key 未配置");
        }
        url::Url::parse(&self.server_url)
            .with_context(|| format!("服务端地址无效: {}", self.server_url))?;
        self.permission_mode()?;
        Ok(())
    }

    /// 从 TOML 文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("无法读取配置文件: {:?}", path.as_ref()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config = Self::default();
        config.merge_from_toml_str(content)?;
        Ok(config)
    }

    /// 把 TOML 文件合并到当前配置上，文件里没写的字段保持不变
    pub fn merge_from_toml_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("无法读取配置文件: {:?}", path.as_ref()))?;
        self.merge_from_toml_str(&content)
    }

    pub fn merge_from_toml_str(&mut self, content: &str) -> Result<()> {
        let toml_config: TomlConfig = toml::from_str(content).context("配置文件格式错误")?;
        self.apply_toml(toml_config);
        Ok(())
    }

    /// 从环境变量合并配置（PICKIFY_ 前缀），变量由 `lookup` 查找
    pub fn merge_from_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PICKIFY_API_KEY") {
            self.provider.api_key = v;
        }
        if let Some(v) = lookup("PICKIFY_AUTH_DOMAIN") {
            self.provider.auth_domain = v;
        }
        if let Some(v) = lookup("PICKIFY_PROJECT_ID") {
            self.provider.project_id = v;
        }
        if let Some(v) = lookup("PICKIFY_STORAGE_BUCKET") {
            self.provider.storage_bucket = v;
        }
        if let Some(v) = lookup("PICKIFY_SENDER_ID") {
            self.provider.messaging_sender_id = v;
        }
        if let Some(v) = lookup("PICKIFY_APP_ID") {
            self.provider.app_id = v;
        }
        if let Some(v) = lookup("PICKIFY_VAPID_KEY") {
            self.vapid_key = v;
        }
        if let Some(v) = lookup("PICKIFY_SERVER_URL") {
            self.server_url = v;
        }
        if let Some(v) = lookup("PICKIFY_DEVICE_TOKEN") {
            self.device_token = Some(v);
        }
        if let Some(v) = lookup("PICKIFY_LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = lookup("PICKIFY_LOG_FORMAT") {
            self.log_format = Some(v);
        }
        if let Some(v) = lookup("PICKIFY_LOG_FILE") {
            self.log_file = Some(v);
        }
    }

    /// 从命令行参数合并配置
    pub fn merge_from_cli(&mut self, cli: &crate::cli::Cli) {
        if let Some(url) = &cli.server_url {
            self.server_url = url.clone();
        }
        if let Some(key) = &cli.vapid_key {
            self.vapid_key = key.clone();
        }
        if let Some(token) = &cli.token {
            self.device_token = Some(token.clone());
        }
        if let Some(permission) = &cli.permission {
            self.permission = permission.clone();
        }
        if let Some(log_level) = cli.get_log_level() {
            self.log_level = log_level;
        }
        if let Some(log_format) = cli.get_log_format() {
            self.log_format = Some(log_format);
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = Some(log_file.clone());
        }
    }

    /// 加载配置（按优先级：命令行 > 环境变量 > 配置文件 > 默认值）
    ///
    /// 日志系统在此之后才按合并结果初始化，所以这里不打日志；
    /// 实际读取的文件记录在 `loaded_from`。
    pub fn load(cli: &crate::cli::Cli) -> Result<Self> {
        Self::load_with_vars(cli, |key| env::var(key).ok())
    }

    /// 同 [`RegistrarConfig::load`]，环境变量由 `lookup` 提供
    pub fn load_with_vars<F>(cli: &crate::cli::Cli, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 1. 从默认配置开始（开发模式以开发配置为底）
        let mut config = if cli.dev {
            Self::for_development()
        } else {
            Self::new()
        };

        // 2. 配置文件覆盖在底配置之上
        let path = cli.config_file.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);
        if Path::new(path).exists() {
            config.merge_from_toml_file(path)?;
            config.loaded_from = Some(path.to_string());
        }

        // 3. 从环境变量合并
        config.merge_from_vars(lookup);

        // 4. 从命令行参数合并（最高优先级）
        config.merge_from_cli(cli);

        Ok(config)
    }
}

/// TOML 配置文件结构（用于反序列化）
#[derive(Debug, Deserialize)]
struct TomlConfig {
    provider: Option<TomlProviderConfig>,
    server: Option<TomlServerConfig>,
    permission: Option<String>,
    logging: Option<TomlLoggingConfig>,
}

#[derive(Debug, Deserialize)]
struct TomlProviderConfig {
    api_key: Option<String>,
    auth_domain: Option<String>,
    project_id: Option<String>,
    storage_bucket: Option<String>,
    messaging_sender_id: Option<String>,
    app_id: Option<String>,
    vapid_key: Option<String>,
    device_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlServerConfig {
    base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlLoggingConfig {
    level: Option<String>,
    format: Option<String>,
    file: Option<String>,
}

impl RegistrarConfig {
    /// 只覆盖文件中出现的字段
    fn apply_toml(&mut self, toml: TomlConfig) {
        let config = self;

        if let Some(provider) = toml.provider {
            if let Some(v) = provider.api_key {
                config.provider.api_key = v;
            }
            if let Some(v) = provider.auth_domain {
                config.provider.auth_domain = v;
            }
            if let Some(v) = provider.project_id {
                config.provider.project_id = v;
            }
            if let Some(v) = provider.storage_bucket {
                config.provider.storage_bucket = v;
            }
            if let Some(v) = provider.messaging_sender_id {
                config.provider.messaging_sender_id = v;
            }
            if let Some(v) = provider.app_id {
                config.provider.app_id = v;
            }
            if let Some(v) = provider.vapid_key {
                config.vapid_key = v;
            }
            if let Some(v) = provider.device_token {
                config.device_token = Some(v);
            }
        }

        if let Some(server) = toml.server {
            if let Some(base_url) = server.base_url {
                config.server_url = base_url;
            }
        }

        if let Some(permission) = toml.permission {
            config.permission = permission;
        }

        if let Some(logging) = toml.logging {
            if let Some(level) = logging.level {
                config.log_level = level;
            }
            if let Some(format) = logging.format {
                config.log_format = Some(format);
            }
            if let Some(file) = logging.file {
                config.log_file = Some(file);
            }
        }
    }
}

/// `generate-config` 写出的默认配置
pub const DEFAULT_CONFIG_TOML: &str = r#"# Pickify Notify 配置文件
# 此文件由 pickify-notify generate-config 生成

# 权限应答: prompt, granted, denied, default
permission = "prompt"

[provider]
api_key = "YOUR_API_KEY"
auth_domain = "YOUR_AUTH_DOMAIN"
project_id = "YOUR_PROJECT_ID"
storage_bucket = "YOUR_STORAGE_BUCKET"
messaging_sender_id = "YOUR_SENDER_ID"
app_id = "YOUR_APP_ID"
vapid_key = "YOUR_VAPID_KEY"
# device_token = ""

[server]
base_url = "http://localhost:8000"

[logging]
level = "info"
format = "compact"
# file = "./logs/notify.log"
"#;
