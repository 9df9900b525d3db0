pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod messaging; // 通知权限 / 设备令牌 / 上报

pub use app::{ListenReport, RegistrarApp};
pub use config::RegistrarConfig;
pub use error::{RegistrarError, Result};
pub use messaging::{
    DeviceToken, MessagePayload, NotificationRegistrar, PermissionState, RegistrationOutcome,
    UploadResult,
};
