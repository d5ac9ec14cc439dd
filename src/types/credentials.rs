use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TargetApp;

/// Session credentials produced by a confirmed login.
///
/// Not persisted by this crate; the caller owns it once emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    pub credentials: BTreeMap<String, String>,
    pub target: TargetApp,
    pub obtained_at: DateTime<Utc>,
}

impl LoginResult {
    pub fn new(credentials: BTreeMap<String, String>, target: TargetApp) -> Self {
        Self {
            credentials,
            target,
            obtained_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.credentials.get(name).map(String::as_str)
    }

    /// Render as a `Cookie` header value: `k=v; k=v`.
    pub fn cookie_header(&self) -> String {
        self.credentials
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
