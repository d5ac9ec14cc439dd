use serde::{Deserialize, Serialize};

use super::TargetApp;

/// Parameters the token response issues for every status poll.
///
/// Sent back verbatim as the `uid`, `time` and `sign` query fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedParams {
    pub uid: String,
    pub time: i64,
    pub sign: String,
}

/// Session fragment returned by a successful token request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub params: IssuedParams,
    /// Text the scannable code encodes.
    pub code_payload: String,
}

/// One login attempt, from token issuance to a terminal outcome.
///
/// Never reused: a new attempt always requests a fresh token.
#[derive(Debug, Clone)]
pub struct LoginSession {
    params: IssuedParams,
    target: TargetApp,
}

impl LoginSession {
    pub fn new(params: IssuedParams, target: TargetApp) -> Self {
        Self { params, target }
    }

    pub fn uid(&self) -> &str {
        &self.params.uid
    }

    pub fn params(&self) -> &IssuedParams {
        &self.params
    }

    pub fn target(&self) -> TargetApp {
        self.target
    }
}
