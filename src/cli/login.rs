//! CLI handlers: a terminal presentation sink for the login machine.

use std::path::Path;

use futures::StreamExt;

use crate::config::LoginConfig;
use crate::controller::LoginController;
use crate::machine::LoginEventPayload;
use crate::types::{CodeImage, TargetApp};

use super::LoginArgs;

/// Resolve config: explicit file, else the default layered lookup.
pub fn load_config(path: Option<&Path>) -> crate::error::Result<LoginConfig> {
    match path {
        Some(path) => LoginConfig::from_toml_file(path)?.with_env_overrides(),
        None => LoginConfig::load_default(),
    }
}

/// Handle `scanlogin login`.
pub async fn handle_login(
    config: LoginConfig,
    args: LoginArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = match args.app.as_deref() {
        Some(name) => TargetApp::parse(name)?,
        None => config.default_target,
    };
    let controller = LoginController::http(config);
    let mut events = controller.start_with(target)?.into_stream();

    let mut outcome = None;
    loop {
        tokio::select! {
            event = events.next() => {
                let Some(event) = event else { break };
                match event.payload {
                    LoginEventPayload::Status { text, .. } => eprintln!("⏳ {text}"),
                    LoginEventPayload::CodeImage(image) => show_code(&image, &args.qr_out),
                    LoginEventPayload::Advisory(advisory) => eprintln!("⚠️  {}", advisory.text()),
                    LoginEventPayload::Finished(done) => {
                        outcome = Some(done);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                eprintln!("⏹  Stopping...");
                outcome = controller.stop().await;
                break;
            }
        }
    }

    let Some(outcome) = outcome else {
        return Err("login worker ended without a result".into());
    };
    let message = outcome.message();
    match outcome.into_result() {
        Ok(result) => {
            eprintln!("✅ {message}");
            println!("{}", result.cookie_header());
            Ok(())
        }
        Err(_) => {
            eprintln!("❌ {message}");
            std::process::exit(1);
        }
    }
}

fn show_code(image: &CodeImage, out: &Path) {
    match std::fs::write(out, &image.bytes) {
        Ok(()) => eprintln!("📷 QR code written to {} ({})", out.display(), image.mime_type()),
        Err(e) => eprintln!("⚠️  Unable to write QR code to {}: {e}", out.display()),
    }
    eprintln!("🔗 QR payload: {}", image.payload);
}

/// Handle `scanlogin apps`.
pub fn handle_apps() {
    for app in TargetApp::all() {
        let marker = if app == TargetApp::default() { " (default)" } else { "" };
        println!("{app}{marker}");
    }
}
