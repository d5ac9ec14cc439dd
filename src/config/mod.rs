//! Configuration system (layered: defaults > config file > env).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LoginError, Result};
use crate::types::TargetApp;

const DEFAULT_TOKEN_URL: &str = "https://qrcodeapi.115.com/api/1.0/web/1.0/token/";
const DEFAULT_STATUS_URL: &str = "https://qrcodeapi.115.com/get/status/";
const DEFAULT_IMAGE_URL: &str = "https://qrcodeapi.115.com/api/1.0/mac/1.0/qrcode";
const DEFAULT_RESULT_URL_TEMPLATE: &str =
    "https://passportapi.115.com/app/1.0/{app}/1.0/login/qrcode/";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Endpoints, per-call timeouts and polling cadence for a login attempt.
///
/// Resolution order:
/// 1. Built-in defaults
/// 2. `config.toml` in the user config dir (or an explicit path)
/// 3. `SCANLOGIN_*` environment variables (a `.env` file is honored)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    pub token_url: String,
    pub status_url: String,
    pub image_url: String,
    /// Exchange endpoint; `{app}` is replaced by the target identity.
    pub result_url_template: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub status_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub transient_backoff_secs: u64,
    pub session_timeout_secs: u64,
    pub default_target: TargetApp,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            status_url: DEFAULT_STATUS_URL.to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            result_url_template: DEFAULT_RESULT_URL_TEMPLATE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 10,
            status_timeout_secs: 5,
            poll_interval_secs: 2,
            transient_backoff_secs: 3,
            session_timeout_secs: 180,
            default_target: TargetApp::Windows,
        }
    }
}

impl LoginConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Defaults, overlaid by the user config file (if present) and env.
    pub fn load_default() -> Result<Self> {
        let base = match default_config_path() {
            Some(path) if path.exists() => Self::from_toml_file(&path)?,
            _ => Self::default(),
        };
        base.with_env_overrides()
    }

    /// Apply `SCANLOGIN_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let url_mappings: [(&str, &mut String); 5] = [
            ("SCANLOGIN_TOKEN_URL", &mut self.token_url),
            ("SCANLOGIN_STATUS_URL", &mut self.status_url),
            ("SCANLOGIN_IMAGE_URL", &mut self.image_url),
            ("SCANLOGIN_RESULT_URL_TEMPLATE", &mut self.result_url_template),
            ("SCANLOGIN_USER_AGENT", &mut self.user_agent),
        ];
        for (env_var, slot) in url_mappings {
            if let Ok(value) = std::env::var(env_var) {
                *slot = value;
            }
        }

        let secs_mappings: [(&str, &mut u64); 5] = [
            ("SCANLOGIN_REQUEST_TIMEOUT_SECS", &mut self.request_timeout_secs),
            ("SCANLOGIN_STATUS_TIMEOUT_SECS", &mut self.status_timeout_secs),
            ("SCANLOGIN_POLL_INTERVAL_SECS", &mut self.poll_interval_secs),
            ("SCANLOGIN_TRANSIENT_BACKOFF_SECS", &mut self.transient_backoff_secs),
            ("SCANLOGIN_SESSION_TIMEOUT_SECS", &mut self.session_timeout_secs),
        ];
        for (env_var, slot) in secs_mappings {
            if let Ok(value) = std::env::var(env_var) {
                *slot = value.trim().parse().map_err(|_| {
                    LoginError::Configuration(format!("{env_var} must be whole seconds, got {value:?}"))
                })?;
            }
        }

        if let Ok(value) = std::env::var("SCANLOGIN_TARGET") {
            self.default_target = TargetApp::parse(&value)?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.result_url_template.contains("{app}") {
            return Err(LoginError::Configuration(
                "result_url_template must contain {app}".to_string(),
            ));
        }
        for (name, value) in [
            ("request_timeout_secs", self.request_timeout_secs),
            ("status_timeout_secs", self.status_timeout_secs),
            ("poll_interval_secs", self.poll_interval_secs),
            ("session_timeout_secs", self.session_timeout_secs),
        ] {
            if value == 0 {
                return Err(LoginError::Configuration(format!("{name} must be > 0")));
            }
        }
        Ok(())
    }

    /// Point every endpoint at one base URL, keeping the default paths.
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.token_url = format!("{base}/api/1.0/web/1.0/token/");
        self.status_url = format!("{base}/get/status/");
        self.image_url = format!("{base}/api/1.0/mac/1.0/qrcode");
        self.result_url_template = format!("{base}/app/1.0/{{app}}/1.0/login/qrcode/");
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_secs = interval.as_secs();
        self
    }

    pub fn with_transient_backoff(mut self, backoff: Duration) -> Self {
        self.transient_backoff_secs = backoff.as_secs();
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn transient_backoff(&self) -> Duration {
        Duration::from_secs(self.transient_backoff_secs)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    pub fn result_url(&self, target: TargetApp) -> String {
        self.result_url_template.replace("{app}", &target.to_string())
    }
}

/// `<user config dir>/scanlogin/config.toml`, when a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "scanlogin")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
