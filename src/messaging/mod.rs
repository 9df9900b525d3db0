pub mod client;
pub mod foreground;
pub mod inbox;
pub mod provider;
pub mod registrar;
pub mod types;
pub mod uploader;

pub use client::{MessagingClient, ProviderOptions};
pub use foreground::{ForegroundListener, ForegroundMessageHandler};
pub use registrar::NotificationRegistrar;
pub use types::{DeviceToken, MessagePayload, PermissionState, RegistrationOutcome, UploadResult};
pub use uploader::{TokenUploader, SAVE_DEVICE_TOKEN_PATH};
