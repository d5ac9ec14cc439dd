use serde::{Deserialize, Serialize};
use strum::Display;

/// Lifecycle of one login attempt.
///
/// Non-terminal states only ever move forward; the last four are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoginState {
    Idle,
    TokenPending,
    AwaitingScan,
    AwaitingConfirmation,
    ExchangingResult,
    Succeeded,
    Expired,
    Cancelled,
    Failed,
}

impl LoginState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Expired | Self::Cancelled | Self::Failed
        )
    }

    fn rank(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::TokenPending => 1,
            Self::AwaitingScan => 2,
            Self::AwaitingConfirmation => 3,
            Self::ExchangingResult => 4,
            Self::Succeeded | Self::Expired | Self::Cancelled | Self::Failed => 5,
        }
    }

    /// Whether moving from `self` to `next` is a forward transition.
    pub fn can_advance_to(self, next: LoginState) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }

    /// Status line shown while in this state.
    pub fn status_text(self) -> &'static str {
        match self {
            Self::Idle => "Not started",
            Self::TokenPending => "Requesting login token...",
            Self::AwaitingScan => "Waiting for the QR code to be scanned...",
            Self::AwaitingConfirmation => "Scanned; confirm the login on your device...",
            Self::ExchangingResult => "Login confirmed; fetching credentials...",
            Self::Succeeded => "Login succeeded",
            Self::Expired => "QR code expired",
            Self::Cancelled => "Login cancelled",
            Self::Failed => "Login failed",
        }
    }
}
