//! Status poll outcomes.

use serde_json::Value;

/// Result of a single status poll.
///
/// The remote status vocabulary is open-ended, so unrecognized codes land in
/// [`PollOutcome::UnknownStatus`] instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Waiting,
    Scanned,
    Confirmed,
    /// The code expired; carries the remote explanation when one was sent.
    Expired(Option<String>),
    /// The login was rejected on the paired device.
    Cancelled(Option<String>),
    TransientError(String),
    UnknownStatus(String),
}

impl PollOutcome {
    /// Map a raw `data.status` value from the status endpoint.
    pub fn from_status(raw: &Value) -> Self {
        match status_code(raw) {
            Some(0) => Self::Waiting,
            Some(1) => Self::Scanned,
            Some(2) => Self::Confirmed,
            Some(-1) => Self::Expired(None),
            Some(-2) => Self::Cancelled(None),
            _ => Self::UnknownStatus(raw.to_string()),
        }
    }

    /// Attach the remote `data.msg` to a rejection; other outcomes ignore it.
    pub fn with_detail(self, detail: Option<String>) -> Self {
        match self {
            Self::Expired(_) => Self::Expired(detail),
            Self::Cancelled(_) => Self::Cancelled(detail),
            other => other,
        }
    }
}

fn status_code(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
