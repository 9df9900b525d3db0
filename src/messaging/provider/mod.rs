pub mod mock;
pub mod permission;
pub mod provider_trait;
pub mod static_token;

pub use mock::{MockTokenProvider, MockTokenReply};
pub use permission::{FixedPermissionHost, PromptPermissionHost};
pub use provider_trait::{GetTokenOptions, PermissionHost, TokenProvider};
pub use static_token::StaticTokenProvider;
