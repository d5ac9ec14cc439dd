//! Convenience re-exports for common use.

pub use crate::client::{HttpSessionClient, SessionClient};
pub use crate::config::LoginConfig;
pub use crate::controller::LoginController;
pub use crate::error::{LoginError, Result};
pub use crate::machine::{
    Advisory, LoginEvent, LoginEventPayload, LoginEvents, LoginOutcome, LoginState,
};
pub use crate::types::{CodeImage, IssuedParams, LoginResult, PollOutcome, TargetApp, TokenGrant};
