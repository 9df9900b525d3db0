use clap::{Parser, Subcommand};

// 确保 Parser trait 被使用
impl Cli {
    /// 解析命令行参数
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

/// Pickify Notify - 推送通知注册客户端
#[derive(Parser, Debug)]
#[command(name = "pickify-notify")]
#[command(version)]
#[command(about = "请求通知权限、获取设备令牌并上报到服务端", long_about = None)]
pub struct Cli {
    /// 配置文件路径
    #[arg(long, value_name = "FILE", help = "指定配置文件路径")]
    pub config_file: Option<String>,

    /// 服务端地址
    #[arg(long, value_name = "URL", help = "保存设备令牌的服务端地址")]
    pub server_url: Option<String>,

    /// VAPID 公钥
    #[arg(long, value_name = "KEY", help = "推送提供方 VAPID 公钥")]
    pub vapid_key: Option<String>,

    /// 预先签发的设备令牌
    #[arg(long, value_name = "TOKEN", help = "由推送提供方预先签发的设备令牌")]
    pub token: Option<String>,

    /// 权限应答方式
    #[arg(
        long,
        value_name = "MODE",
        help = "权限应答: prompt, granted, denied, default"
    )]
    pub permission: Option<String>,

    /// 日志级别
    #[arg(
        long,
        value_name = "LEVEL",
        help = "日志级别: trace, debug, info, warn, error"
    )]
    pub log_level: Option<String>,

    /// 日志格式
    #[arg(long, value_name = "FORMAT", help = "日志格式: pretty, json, compact")]
    pub log_format: Option<String>,

    /// 日志文件路径
    #[arg(long, value_name = "PATH", help = "日志输出文件路径")]
    pub log_file: Option<String>,

    /// 详细输出（可重复使用：-v, -vv, -vvv）
    #[arg(short, action = clap::ArgAction::Count, help = "详细输出级别")]
    pub verbose: u8,

    /// 静默模式
    #[arg(long, short = 'q', help = "静默模式（只输出错误）")]
    pub quiet: bool,

    /// 开发模式（mock 提供方 + debug 日志 + pretty 格式）
    #[arg(long, help = "启用开发模式")]
    pub dev: bool,

    /// 子命令
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// 执行一次注册流程（默认）
    Register,
    /// 注册后持续记录前台消息，直到 Ctrl-C 或消息来源结束
    Listen {
        /// 前台消息来源：每行一条 JSON 的文件，`-` 表示标准输入
        #[arg(long, value_name = "FILE")]
        messages: Option<String>,
    },
    /// 生成默认配置文件
    GenerateConfig {
        /// 输出文件路径
        #[arg(value_name = "PATH", default_value = "config.toml")]
        path: String,
    },
    /// 验证配置文件
    ValidateConfig {
        /// 配置文件路径
        #[arg(value_name = "PATH", default_value = "config.toml")]
        path: String,
    },
    /// 显示最终配置（合并后的配置）
    ShowConfig,
}

impl Cli {
    /// 获取日志级别（考虑 verbose 和 quiet）
    pub fn get_log_level(&self) -> Option<String> {
        if self.quiet {
            return Some("error".to_string());
        }

        if self.dev {
            return Some("debug".to_string());
        }

        if let Some(level) = &self.log_level {
            return Some(level.clone());
        }

        match self.verbose {
            0 => None, // 使用默认或配置文件
            1 => Some("info".to_string()),
            2 => Some("debug".to_string()),
            _ => Some("trace".to_string()),
        }
    }

    /// 获取日志格式
    pub fn get_log_format(&self) -> Option<String> {
        if self.dev {
            return Some("pretty".to_string());
        }
        self.log_format.clone()
    }

    /// 未指定子命令时执行注册
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Register)
    }
}
