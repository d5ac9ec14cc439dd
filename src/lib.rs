//! scanlogin: QR-code login handshake client.
//!
//! Requests a short-lived login token, hands the scannable code to a
//! presentation sink, polls the remote service until the login is approved
//! or rejected on a paired device, and exchanges the approved session for
//! credentials bound to a target device identity.
//!
//! # Quick Start
//!
//! ```no_run
//! use scanlogin::config::LoginConfig;
//! use scanlogin::controller::LoginController;
//! use scanlogin::types::TargetApp;
//!
//! # async fn example() -> scanlogin::error::Result<()> {
//! let controller = LoginController::http(LoginConfig::load_default()?);
//! let result = controller.login(TargetApp::Windows).await?;
//! println!("{}", result.cookie_header());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod machine;
pub mod prelude;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
