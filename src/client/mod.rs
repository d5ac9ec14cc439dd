//! Remote session client: token issuance, code image, status polling and
//! credential exchange.

pub mod http;
mod wire;

pub use http::HttpSessionClient;

use async_trait::async_trait;

use crate::error::LoginError;
use crate::types::{IssuedParams, LoginResult, PollOutcome, TargetApp, TokenGrant};

/// The three remote login operations plus the code image download.
///
/// Implementations issue exactly one request per call and never retry
/// internally; retry policy belongs to the login state machine.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Request a fresh login token. Any transport failure is `Connectivity`.
    async fn request_token(&self) -> Result<TokenGrant, LoginError>;

    /// Download the scannable code image for a session.
    async fn fetch_code_image(&self, uid: &str) -> Result<Vec<u8>, LoginError>;

    /// Query session status once. Never fails: a call timeout is reported as
    /// [`PollOutcome::Waiting`], any other failure as
    /// [`PollOutcome::TransientError`].
    async fn poll_status(&self, params: &IssuedParams) -> PollOutcome;

    /// Exchange a confirmed session for credentials bound to `target`.
    async fn exchange_result(&self, uid: &str, target: TargetApp) -> Result<LoginResult, LoginError>;
}
