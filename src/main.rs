use anyhow::{Context, Result};
use pickify_notify::{
    cli::{Cli, Commands},
    config::{self, RegistrarConfig},
    logging, RegistrarApp,
};
use std::fs;
use std::process;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件（如果存在）
    let _ = dotenvy::dotenv();

    // 解析命令行参数
    let cli = Cli::parse();

    // 处理配置类子命令
    match &cli.command {
        Some(Commands::GenerateConfig { path }) => return generate_config(path),
        Some(Commands::ValidateConfig { path }) => return validate_config(path),
        Some(Commands::ShowConfig) => return show_config(&cli),
        _ => {}
    }

    // 加载配置（按优先级：命令行 > 环境变量 > 配置文件 > 默认值）
    let config = RegistrarConfig::load(&cli).context("加载配置失败")?;

    // 日志按合并后的配置初始化
    let _log_guard = logging::init_logging(
        &config.log_level,
        config.log_format.as_deref(),
        config.log_file.as_deref(),
        cli.quiet,
    )?;

    tracing::info!("🚀 Pickify Notify starting...");
    match &config.loaded_from {
        Some(path) => tracing::info!("📄 已加载配置文件: {}", path),
        None => tracing::info!("📄 未找到配置文件，使用默认配置"),
    }

    tracing::info!("📊 Registrar Configuration:");
    tracing::info!("  - Project: {}", config.provider.project_id);
    tracing::info!("  - Server: {}", config.server_url);
    tracing::info!("  - Permission: {}", config.permission);
    tracing::info!("  - Pre-issued token: {}", config.device_token.is_some());
    if let Some(file) = &config.log_file {
        tracing::info!("  - Log file: {}", file);
    }

    let app = match RegistrarApp::from_config(&config, cli.dev) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("❌ 初始化失败: {:#}", e);
            tracing::error!("💡 请检查 [provider] 配置、VAPID key 和服务端地址");
            process::exit(1);
        }
    };

    // 注册失败只记录日志，进程正常退出
    match cli.command_or_default() {
        Commands::Listen { messages } => {
            app.listen(messages.as_deref()).await?;
        }
        _ => {
            app.register().await;
        }
    }

    Ok(())
}

/// 生成默认配置文件
fn generate_config(path: &str) -> Result<()> {
    fs::write(path, config::DEFAULT_CONFIG_TOML)
        .with_context(|| format!("无法写入配置文件: {}", path))?;

    println!("✅ 配置文件已生成: {}", path);
    Ok(())
}

/// 验证配置文件
fn validate_config(path: &str) -> Result<()> {
    let config = RegistrarConfig::from_toml_file(path)
        .with_context(|| format!("配置文件验证失败: {}", path))?;
    config
        .validate()
        .with_context(|| format!("配置文件验证失败: {}", path))?;

    println!("✅ 配置文件有效: {}", path);
    println!("📊 配置摘要:");
    println!("  - Project: {}", config.provider.project_id);
    println!("  - Server: {}", config.server_url);
    println!("  - Permission: {}", config.permission);

    Ok(())
}

/// 显示最终配置（合并后的配置）
fn show_config(cli: &Cli) -> Result<()> {
    let config = RegistrarConfig::load(cli).context("加载配置失败")?;

    if let Some(path) = &config.loaded_from {
        println!("📄 配置文件: {}", path);
    }
    println!("📊 最终配置（合并后的配置）:");
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}
