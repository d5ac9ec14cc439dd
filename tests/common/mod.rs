//! Shared test helpers and a scripted session client.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use scanlogin::client::SessionClient;
use scanlogin::config::LoginConfig;
use scanlogin::error::LoginError;
use scanlogin::machine::{LoginEvent, LoginEventPayload, LoginEvents, LoginState};
use scanlogin::types::{IssuedParams, LoginResult, PollOutcome, TargetApp, TokenGrant};

/// Which remote operation a recorded call was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Token,
    Image,
    Poll,
    Exchange,
}

/// A session client that replays canned responses and records every call.
pub struct ScriptedClient {
    token: Mutex<Option<Result<TokenGrant, LoginError>>>,
    image: Mutex<Result<Vec<u8>, LoginError>>,
    polls: Mutex<VecDeque<PollOutcome>>,
    fallback_poll: Mutex<PollOutcome>,
    exchange: Mutex<Option<Result<LoginResult, LoginError>>>,
    poll_delay: Mutex<Option<Duration>>,
    cancel_after_token: Mutex<Option<CancellationToken>>,
    cancel_during_poll: Mutex<Option<(usize, CancellationToken)>>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completed_polls: AtomicUsize,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            token: Mutex::new(Some(Ok(grant("U1")))),
            image: Mutex::new(Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())),
            polls: Mutex::new(VecDeque::new()),
            fallback_poll: Mutex::new(PollOutcome::Waiting),
            exchange: Mutex::new(Some(Ok(credentials(&[("session", "abc")])))),
            poll_delay: Mutex::new(None),
            cancel_after_token: Mutex::new(None),
            cancel_during_poll: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            completed_polls: AtomicUsize::new(0),
        }
    }

    pub fn with_token(self, token: Result<TokenGrant, LoginError>) -> Self {
        *self.token.lock().unwrap() = Some(token);
        self
    }

    pub fn with_image(self, image: Result<Vec<u8>, LoginError>) -> Self {
        *self.image.lock().unwrap() = image;
        self
    }

    /// Queue poll outcomes, replayed in order.
    pub fn with_polls(self, polls: impl IntoIterator<Item = PollOutcome>) -> Self {
        self.polls.lock().unwrap().extend(polls);
        self
    }

    /// Outcome returned once the queue is exhausted.
    pub fn with_fallback_poll(self, outcome: PollOutcome) -> Self {
        *self.fallback_poll.lock().unwrap() = outcome;
        self
    }

    pub fn with_exchange(self, exchange: Result<LoginResult, LoginError>) -> Self {
        *self.exchange.lock().unwrap() = Some(exchange);
        self
    }

    /// Make every poll take `delay` of (virtual) time.
    pub fn with_poll_delay(self, delay: Duration) -> Self {
        *self.poll_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn cancel_after_token(self, cancel: CancellationToken) -> Self {
        *self.cancel_after_token.lock().unwrap() = Some(cancel);
        self
    }

    /// Trigger `cancel` while the `nth` poll (1-based) is in flight.
    pub fn cancel_during_poll(self, nth: usize, cancel: CancellationToken) -> Self {
        *self.cancel_during_poll.lock().unwrap() = Some((nth, cancel));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls().into_iter().filter(|c| *c == call).count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn completed_polls(&self) -> usize {
        self.completed_polls.load(Ordering::SeqCst)
    }

    fn enter(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionClient for ScriptedClient {
    async fn request_token(&self) -> Result<TokenGrant, LoginError> {
        self.enter(Call::Token);
        let result = self
            .token
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(LoginError::Connectivity("token already issued".into())));
        if let Some(cancel) = self.cancel_after_token.lock().unwrap().as_ref() {
            cancel.cancel();
        }
        self.leave();
        result
    }

    async fn fetch_code_image(&self, _uid: &str) -> Result<Vec<u8>, LoginError> {
        self.enter(Call::Image);
        let result = self.image.lock().unwrap().clone();
        self.leave();
        result
    }

    async fn poll_status(&self, _params: &IssuedParams) -> PollOutcome {
        self.enter(Call::Poll);
        let nth = self.count(Call::Poll);
        let cancel = self
            .cancel_during_poll
            .lock()
            .unwrap()
            .as_ref()
            .filter(|(at, _)| *at == nth)
            .map(|(_, cancel)| cancel.clone());
        if let Some(cancel) = cancel {
            cancel.cancel();
        }
        let delay = *self.poll_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let outcome = self
            .polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback_poll.lock().unwrap().clone());
        self.completed_polls.fetch_add(1, Ordering::SeqCst);
        self.leave();
        outcome
    }

    async fn exchange_result(&self, _uid: &str, target: TargetApp) -> Result<LoginResult, LoginError> {
        self.enter(Call::Exchange);
        let result = self
            .exchange
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(LoginError::Exchange("exchange already used".into())))
            .map(|mut r| {
                r.target = target;
                r
            });
        self.leave();
        result
    }
}

pub fn grant(uid: &str) -> TokenGrant {
    TokenGrant {
        params: IssuedParams {
            uid: uid.to_string(),
            time: 1_700_000_000,
            sign: "sig".to_string(),
        },
        code_payload: format!("https://qr.example/{uid}"),
    }
}

pub fn credentials(pairs: &[(&str, &str)]) -> LoginResult {
    let map: BTreeMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    LoginResult::new(map, TargetApp::Windows)
}

/// Default cadence (2 s poll, 3 s backoff, 180 s ceiling).
pub fn config() -> LoginConfig {
    LoginConfig::default()
}

/// Drain every event until the channel closes.
pub async fn collect(mut events: LoginEvents) -> Vec<LoginEvent> {
    let mut out = Vec::new();
    while let Some(event) = events.recv().await {
        out.push(event);
    }
    out
}

pub fn states(events: &[LoginEvent]) -> Vec<LoginState> {
    events
        .iter()
        .filter_map(|e| match &e.payload {
            LoginEventPayload::Status { state, .. } => Some(*state),
            _ => None,
        })
        .collect()
}

pub fn advisories(events: &[LoginEvent]) -> Vec<scanlogin::machine::Advisory> {
    events
        .iter()
        .filter_map(|e| match &e.payload {
            LoginEventPayload::Advisory(a) => Some(a.clone()),
            _ => None,
        })
        .collect()
}

pub fn finished_count(events: &[LoginEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e.payload, LoginEventPayload::Finished(_)))
        .count()
}
