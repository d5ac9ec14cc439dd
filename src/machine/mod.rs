//! Login state machine: token, code image, status polling, exchange.

pub mod events;
mod state;

pub use events::{Advisory, EventEmitter, LoginEvent, LoginEventPayload, LoginEvents, LoginOutcome};
pub use state::LoginState;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::client::SessionClient;
use crate::config::LoginConfig;
use crate::error::LoginError;
use crate::types::{CodeImage, LoginSession, PollOutcome, TargetApp};

/// Clears the shared "session active" flag when dropped.
#[derive(Debug)]
pub(crate) struct SessionGuard(Arc<AtomicBool>);

impl SessionGuard {
    pub(crate) fn new(flag: Arc<AtomicBool>) -> Self {
        Self(flag)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives one login attempt to exactly one terminal outcome.
///
/// Remote calls are strictly sequential. Cancellation is cooperative: it is
/// observed before each delay, during delays, and before each poll, but an
/// in-flight call is always allowed to complete.
pub struct LoginMachine {
    client: Arc<dyn SessionClient>,
    config: LoginConfig,
    target: TargetApp,
    cancel: CancellationToken,
    emitter: EventEmitter,
    state: LoginState,
    guard: Option<SessionGuard>,
}

impl LoginMachine {
    pub fn new(
        client: Arc<dyn SessionClient>,
        config: LoginConfig,
        target: TargetApp,
        cancel: CancellationToken,
        emitter: EventEmitter,
    ) -> Self {
        Self {
            client,
            config,
            target,
            cancel,
            emitter,
            state: LoginState::Idle,
            guard: None,
        }
    }

    pub(crate) fn with_guard(mut self, guard: SessionGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Run the attempt; emits a `Finished` event carrying the same outcome.
    pub async fn run(mut self) -> LoginOutcome {
        tracing::info!(
            attempt_id = %self.emitter.attempt_id(),
            target = %self.target,
            "login attempt start"
        );
        let outcome = self.drive().await;
        self.finish(outcome)
    }

    async fn drive(&mut self) -> LoginOutcome {
        let started = Instant::now();
        self.advance(LoginState::TokenPending);

        let grant = match self.client.request_token().await {
            Ok(grant) => grant,
            Err(e) => return LoginOutcome::Failed(e),
        };
        let session = LoginSession::new(grant.params, self.target);
        self.advance(LoginState::AwaitingScan);

        if self.cancel.is_cancelled() {
            return LoginOutcome::Cancelled(None);
        }
        self.present_code(&session, grant.code_payload).await;

        self.poll_until_terminal(&session, started).await
    }

    async fn present_code(&self, session: &LoginSession, payload: String) {
        match self.client.fetch_code_image(session.uid()).await {
            Ok(bytes) => self.emitter.emit(LoginEventPayload::CodeImage(CodeImage {
                uid: session.uid().to_string(),
                payload,
                bytes,
            })),
            Err(e) => {
                tracing::warn!(uid = %session.uid(), error = %e, "code image unavailable");
                self.emitter
                    .advisory(Advisory::ImageUnavailable(e.to_string()));
            }
        }
    }

    async fn poll_until_terminal(&mut self, session: &LoginSession, started: Instant) -> LoginOutcome {
        let ceiling = self.config.session_timeout();
        let remaining = || ceiling.saturating_sub(started.elapsed());
        let mut attempt: u32 = 0;

        loop {
            if !self.pause(self.config.poll_interval().min(remaining())).await {
                return LoginOutcome::Cancelled(None);
            }
            if remaining().is_zero() {
                return timed_out(ceiling);
            }

            attempt += 1;
            let outcome = self.client.poll_status(session.params()).await;
            if self.cancel.is_cancelled() {
                return LoginOutcome::Cancelled(None);
            }
            tracing::debug!(
                uid = %session.uid(),
                attempt,
                state = %self.state,
                outcome = ?outcome,
                "status poll"
            );

            match outcome {
                PollOutcome::Waiting => {}
                PollOutcome::Scanned => {
                    self.advance(LoginState::AwaitingConfirmation);
                }
                PollOutcome::Confirmed => return self.exchange(session).await,
                PollOutcome::Expired(detail) => return LoginOutcome::Expired(detail),
                PollOutcome::Cancelled(detail) => return LoginOutcome::Cancelled(detail),
                PollOutcome::TransientError(detail) => {
                    tracing::warn!(uid = %session.uid(), attempt, error = %detail, "status poll failed; retrying");
                    self.emitter.advisory(Advisory::TransientError(detail));
                    if !self.pause(self.config.transient_backoff().min(remaining())).await {
                        return LoginOutcome::Cancelled(None);
                    }
                }
                PollOutcome::UnknownStatus(raw) => {
                    tracing::warn!(uid = %session.uid(), status = %raw, "unrecognized login status");
                    self.emitter.advisory(Advisory::UnknownStatus(raw));
                }
            }

            // A slow poll may have used up the budget.
            if remaining().is_zero() {
                return timed_out(ceiling);
            }
        }
    }

    async fn exchange(&mut self, session: &LoginSession) -> LoginOutcome {
        self.advance(LoginState::ExchangingResult);
        match self
            .client
            .exchange_result(session.uid(), session.target())
            .await
        {
            Ok(result) if result.is_empty() => LoginOutcome::Failed(LoginError::Exchange(
                "login confirmed but no credentials were returned".to_string(),
            )),
            Ok(result) => LoginOutcome::Succeeded(result),
            Err(e) => LoginOutcome::Failed(e),
        }
    }

    /// Sleep unless cancelled; `false` means cancellation was observed.
    async fn pause(&self, delay: Duration) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    fn advance(&mut self, next: LoginState) {
        if !self.state.can_advance_to(next) {
            return;
        }
        self.state = next;
        self.emitter.status(next);
    }

    fn finish(mut self, outcome: LoginOutcome) -> LoginOutcome {
        match &outcome {
            LoginOutcome::Failed(e) => tracing::warn!(
                attempt_id = %self.emitter.attempt_id(),
                error = %e,
                "login attempt failed"
            ),
            other => tracing::info!(
                attempt_id = %self.emitter.attempt_id(),
                state = %other.state(),
                "login attempt finished"
            ),
        }
        // Guard goes before the terminal event is sent.
        drop(self.guard.take());
        self.emitter
            .emit(LoginEventPayload::Finished(outcome.clone()));
        outcome
    }
}

fn timed_out(ceiling: Duration) -> LoginOutcome {
    LoginOutcome::Failed(LoginError::Timeout(ceiling.as_millis() as u64))
}
