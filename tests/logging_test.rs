mod common;

use common::LogBuffer;
use pickify_notify::logging::{build_subscriber, file_writer};

#[test]
fn test_logs_go_to_console_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("notify.log");

    let console = LogBuffer::default();
    let (file_sink, file_guard) = file_writer(path.to_str().unwrap()).unwrap();
    let subscriber = build_subscriber("info", Some("compact"), console.clone(), Some(file_sink));

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("Token saved successfully. status=200");
        tracing::debug!("below the level");
    });
    // 刷出非阻塞写入端
    drop(file_guard);

    let console = console.contents();
    let file = std::fs::read_to_string(&path).unwrap();
    for output in [&console, &file] {
        assert!(output.contains("Token saved successfully. status=200"));
        assert!(!output.contains("below the level"));
    }
    // 文件里没有颜色控制符
    assert!(!file.contains('\u{1b}'));
}

#[test]
fn test_json_format_without_file() {
    let console = LogBuffer::default();
    let subscriber = build_subscriber("info", Some("json"), console.clone(), None);

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("Message received.");
    });

    let line = console.contents();
    let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(value["fields"]["message"], "Message received.");
}
