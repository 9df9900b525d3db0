#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use pickify_notify::messaging::ProviderOptions;
use tracing_subscriber::fmt::MakeWriter;

/// 收集日志输出，用于断言
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

pub struct LogWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter(self.0.clone())
    }
}

/// 在当前线程安装日志收集器
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

pub fn provider_options() -> ProviderOptions {
    ProviderOptions {
        api_key: "AIzaTest".to_string(),
        auth_domain: "pickify.firebaseapp.com".to_string(),
        project_id: "pickify".to_string(),
        storage_bucket: "pickify.appspot.com".to_string(),
        messaging_sender_id: "42".to_string(),
        app_id: "1:42:web:abc".to_string(),
    }
}
