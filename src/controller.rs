//! Owner-facing login controller: start, stop, and the one-worker guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::client::{HttpSessionClient, SessionClient};
use crate::config::LoginConfig;
use crate::error::{LoginError, Result};
use crate::machine::events;
use crate::machine::{LoginEvents, LoginMachine, LoginOutcome, SessionGuard};
use crate::types::{LoginResult, TargetApp};

struct Worker {
    attempt_id: Uuid,
    cancel: CancellationToken,
    join: JoinHandle<LoginOutcome>,
}

/// Starts and stops login attempts; at most one runs at a time.
///
/// Each attempt runs on its own tokio task so network waits never block the
/// caller. The active flag and the cancellation token are the only state
/// shared with that task.
///
/// # Example
/// ```no_run
/// use scanlogin::config::LoginConfig;
/// use scanlogin::controller::LoginController;
///
/// # async fn example() -> scanlogin::error::Result<()> {
/// let controller = LoginController::http(LoginConfig::load_default()?);
/// let mut events = controller.start("windows")?;
/// while let Some(event) = events.recv().await {
///     println!("{:?}", event.payload);
/// }
/// # Ok(())
/// # }
/// ```
pub struct LoginController {
    client: Arc<dyn SessionClient>,
    config: LoginConfig,
    active: Arc<AtomicBool>,
    worker: Mutex<Option<Worker>>,
}

impl LoginController {
    pub fn new(client: Arc<dyn SessionClient>, config: LoginConfig) -> Self {
        Self {
            client,
            config,
            active: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    /// Controller backed by [`HttpSessionClient`].
    pub fn http(config: LoginConfig) -> Self {
        let client = HttpSessionClient::new(config.clone());
        Self::new(Arc::new(client), config)
    }

    pub fn config(&self) -> &LoginConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Start a login bound to the named target identity.
    ///
    /// An unrecognized identity is rejected before any remote call.
    pub fn start(&self, target: &str) -> Result<LoginEvents> {
        let target = TargetApp::parse(target)?;
        self.start_with(target)
    }

    /// Start a login; rejected with [`LoginError::AlreadyActive`] while
    /// another attempt is still running.
    pub fn start_with(&self, target: TargetApp) -> Result<LoginEvents> {
        self.config.validate()?;
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(LoginError::AlreadyActive);
        }
        let guard = SessionGuard::new(self.active.clone());

        let attempt_id = Uuid::new_v4();
        let (emitter, events) = events::channel(attempt_id);
        let cancel = CancellationToken::new();
        let machine = LoginMachine::new(
            self.client.clone(),
            self.config.clone(),
            target,
            cancel.clone(),
            emitter,
        )
        .with_guard(guard);

        let join = tokio::spawn(machine.run());
        tracing::debug!(%attempt_id, %target, "login worker spawned");
        *self.lock_worker() = Some(Worker {
            attempt_id,
            cancel,
            join,
        });
        Ok(events)
    }

    /// Cancel the running attempt and wait for its worker to wind down.
    ///
    /// Any in-flight remote call completes (or times out) first. Returns the
    /// worker's outcome, or `None` when nothing was started.
    pub async fn stop(&self) -> Option<LoginOutcome> {
        let worker = self.lock_worker().take()?;
        worker.cancel.cancel();
        match worker.join.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!(attempt_id = %worker.attempt_id, error = %e, "login worker aborted");
                None
            }
        }
    }

    /// Run one attempt to completion and return its credentials.
    pub async fn login(&self, target: TargetApp) -> Result<LoginResult> {
        let events = self.start_with(target)?;
        match events.outcome().await {
            Some(outcome) => outcome.into_result(),
            None => Err(LoginError::Cancelled),
        }
    }

    fn lock_worker(&self) -> MutexGuard<'_, Option<Worker>> {
        self.worker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for LoginController {
    fn drop(&mut self) {
        if let Some(worker) = self.lock_worker().as_ref() {
            worker.cancel.cancel();
        }
    }
}
