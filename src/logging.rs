use anyhow::{Context, Result};
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::Layered;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// 控制台层挂在过滤器之上
type FilteredRegistry = Layered<EnvFilter, Registry>;

/// 初始化日志系统
///
/// 指定 `log_file` 时日志同时写到控制台和文件；
/// 返回的 guard 必须持有到进程退出，否则文件里的尾部日志会丢失。
pub fn init_logging(
    log_level: &str,
    log_format: Option<&str>,
    log_file: Option<&str>,
    quiet: bool,
) -> Result<Option<WorkerGuard>> {
    // 如果静默模式，只输出错误
    let level = if quiet { "error" } else { log_level };

    let (file_sink, guard) = match log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    build_subscriber(level, log_format, std::io::stdout, file_sink)
        .try_init()
        .context("日志系统已初始化")?;

    Ok(guard)
}

/// 组装订阅器：控制台层 + 可选的文件层
pub fn build_subscriber<W>(
    level: &str,
    log_format: Option<&str>,
    console: W,
    file_sink: Option<NonBlocking>,
) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    // 解析日志级别
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // 根据格式选择不同的输出方式
    let console_layer: Box<dyn Layer<FilteredRegistry> + Send + Sync> = match log_format {
        // JSON 格式（适合收集）
        Some("json") => fmt::layer().json().with_writer(console).boxed(),
        // Pretty 格式（适合开发环境）
        Some("pretty") | Some("dev") => fmt::layer().pretty().with_writer(console).boxed(),
        // Compact 格式（默认）
        _ => fmt::layer().compact().with_writer(console).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer(file_sink))
}

/// 文件输出层，不带 ANSI 颜色
fn file_layer<S>(
    writer: Option<NonBlocking>,
) -> Option<fmt::Layer<S, DefaultFields, Format, NonBlocking>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    writer.map(|w| fmt::layer().with_ansi(false).with_writer(w))
}

/// 打开日志文件（目录不存在时创建），返回非阻塞写入端
pub fn file_writer(path: &str) -> Result<(NonBlocking, WorkerGuard)> {
    let path = Path::new(path);
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("日志文件路径无效: {:?}", path))?;

    std::fs::create_dir_all(dir).with_context(|| format!("无法创建日志目录: {:?}", dir))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}
