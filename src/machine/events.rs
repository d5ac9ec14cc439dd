//! Progress events streamed to the presentation side.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use super::LoginState;
use crate::error::LoginError;
use crate::types::{CodeImage, LoginResult};

/// Non-fatal notice; never changes state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// A status poll failed; the loop retries after a backoff.
    TransientError(String),
    /// The remote reported a status code this client does not recognize.
    UnknownStatus(String),
    /// The code image could not be fetched; the session is still valid.
    ImageUnavailable(String),
}

impl Advisory {
    pub fn text(&self) -> String {
        match self {
            Self::TransientError(detail) => format!("Network error, retrying... ({detail})"),
            Self::UnknownStatus(raw) => format!("Unknown status: {raw}"),
            Self::ImageUnavailable(detail) => format!("Unable to display QR code: {detail}"),
        }
    }
}

/// Terminal result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Succeeded(LoginResult),
    /// Remote explanation, when the service sent one.
    Expired(Option<String>),
    /// `None` for a local stop; remote rejections may carry a reason.
    Cancelled(Option<String>),
    Failed(LoginError),
}

impl LoginOutcome {
    pub fn state(&self) -> LoginState {
        match self {
            Self::Succeeded(_) => LoginState::Succeeded,
            Self::Expired(_) => LoginState::Expired,
            Self::Cancelled(_) => LoginState::Cancelled,
            Self::Failed(_) => LoginState::Failed,
        }
    }

    /// The single human-readable explanation for this outcome.
    pub fn message(&self) -> String {
        match self {
            Self::Succeeded(result) => format!(
                "Login succeeded ({} app, {} credential fields)",
                result.target,
                result.credentials.len()
            ),
            Self::Expired(None) => {
                "The QR code expired before it was confirmed; request a new one.".to_string()
            }
            Self::Expired(Some(detail)) => {
                format!("The QR code expired before it was confirmed ({detail}); request a new one.")
            }
            Self::Cancelled(None) => "The login was cancelled.".to_string(),
            Self::Cancelled(Some(detail)) => format!("The login was cancelled ({detail})."),
            Self::Failed(LoginError::Timeout(ms)) => format!(
                "No confirmation within {} seconds; request a new QR code.",
                ms / 1000
            ),
            Self::Failed(error) => format!("Login failed: {error}"),
        }
    }

    pub fn into_result(self) -> Result<LoginResult, LoginError> {
        match self {
            Self::Succeeded(result) => Ok(result),
            Self::Expired(detail) => Err(LoginError::Expired(
                detail.unwrap_or_else(|| "QR code expired".to_string()),
            )),
            Self::Cancelled(_) => Err(LoginError::Cancelled),
            Self::Failed(error) => Err(error),
        }
    }
}

/// Concrete event payloads emitted by the login machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginEventPayload {
    Status { state: LoginState, text: String },
    CodeImage(CodeImage),
    Advisory(Advisory),
    Finished(LoginOutcome),
}

/// Envelope for streamed login events.
#[derive(Debug, Clone)]
pub struct LoginEvent {
    pub attempt_id: Uuid,
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub payload: LoginEventPayload,
}

/// Create a connected emitter/receiver pair for one attempt.
pub fn channel(attempt_id: Uuid) -> (EventEmitter, LoginEvents) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        EventEmitter {
            attempt_id,
            seq: AtomicU64::new(1),
            tx,
        },
        LoginEvents { rx },
    )
}

/// Producer half; a dropped receiver only silences events.
#[derive(Debug)]
pub struct EventEmitter {
    attempt_id: Uuid,
    seq: AtomicU64,
    tx: mpsc::UnboundedSender<LoginEvent>,
}

impl EventEmitter {
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn emit(&self, payload: LoginEventPayload) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let _ = self.tx.send(LoginEvent {
            attempt_id: self.attempt_id,
            seq,
            timestamp: Utc::now(),
            payload,
        });
    }

    pub fn status(&self, state: LoginState) {
        self.emit(LoginEventPayload::Status {
            state,
            text: state.status_text().to_string(),
        });
    }

    pub fn advisory(&self, advisory: Advisory) {
        self.emit(LoginEventPayload::Advisory(advisory));
    }
}

/// Consumer half handed to the presentation side.
#[derive(Debug)]
pub struct LoginEvents {
    rx: mpsc::UnboundedReceiver<LoginEvent>,
}

impl LoginEvents {
    pub async fn recv(&mut self) -> Option<LoginEvent> {
        self.rx.recv().await
    }

    /// Drain events until the terminal one.
    ///
    /// `None` if the worker went away without finishing.
    pub async fn outcome(mut self) -> Option<LoginOutcome> {
        while let Some(event) = self.rx.recv().await {
            if let LoginEventPayload::Finished(outcome) = event.payload {
                return Some(outcome);
            }
        }
        None
    }

    pub fn into_stream(self) -> UnboundedReceiverStream<LoginEvent> {
        UnboundedReceiverStream::new(self.rx)
    }
}
