//! reqwest-backed [`SessionClient`].

use async_trait::async_trait;
use reqwest::header::USER_AGENT;

use super::wire::{as_i64, stringify, text, Envelope, ResultData, StatusData, TokenData};
use super::SessionClient;
use crate::config::LoginConfig;
use crate::error::LoginError;
use crate::types::{IssuedParams, LoginResult, PollOutcome, TargetApp, TokenGrant};

/// HTTP client for the remote login service.
///
/// # Example
/// ```no_run
/// use scanlogin::client::{HttpSessionClient, SessionClient};
/// use scanlogin::config::LoginConfig;
///
/// # async fn example() -> scanlogin::error::Result<()> {
/// let client = HttpSessionClient::new(LoginConfig::default());
/// let grant = client.request_token().await?;
/// println!("scan: {}", grant.code_payload);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpSessionClient {
    client: reqwest::Client,
    config: LoginConfig,
}

impl HttpSessionClient {
    pub fn new(config: LoginConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl SessionClient for HttpSessionClient {
    async fn request_token(&self) -> Result<TokenGrant, LoginError> {
        let resp = self
            .client
            .get(&self.config.token_url)
            .header(USER_AGENT, &self.config.user_agent)
            .timeout(self.config.request_timeout())
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(LoginError::Connectivity(format!(
                "Token request failed with status {}",
                resp.status()
            )));
        }
        let envelope: Envelope = resp.json().await?;
        if !envelope.ok() {
            return Err(LoginError::Connectivity(format!(
                "Token request rejected: {}",
                envelope.reason("unknown error")
            )));
        }
        let data: TokenData = serde_json::from_value(envelope.data)
            .map_err(|e| LoginError::Connectivity(format!("Malformed token response: {e}")))?;
        let time = as_i64(&data.time).ok_or_else(|| {
            LoginError::Connectivity(format!("Malformed token response: time {}", data.time))
        })?;
        tracing::debug!(uid = %data.uid, "login token issued");
        Ok(TokenGrant {
            params: IssuedParams {
                uid: data.uid,
                time,
                sign: data.sign,
            },
            code_payload: data.qrcode,
        })
    }

    async fn fetch_code_image(&self, uid: &str) -> Result<Vec<u8>, LoginError> {
        let resp = self
            .client
            .get(&self.config.image_url)
            .query(&[("uid", uid)])
            .header(USER_AGENT, &self.config.user_agent)
            .timeout(self.config.request_timeout())
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(LoginError::Connectivity(format!(
                "Code image download failed with status {}",
                resp.status()
            )));
        }
        Ok(resp.bytes().await?.to_vec())
    }

    async fn poll_status(&self, params: &IssuedParams) -> PollOutcome {
        let result = async {
            let resp = self
                .client
                .get(&self.config.status_url)
                .query(params)
                .header(USER_AGENT, &self.config.user_agent)
                .timeout(self.config.status_timeout())
                .send()
                .await?
                .error_for_status()?;
            Ok::<_, reqwest::Error>(resp.json::<Envelope>().await?)
        }
        .await;

        let envelope = match result {
            Ok(envelope) => envelope,
            Err(e) if e.is_timeout() => {
                tracing::debug!(uid = %params.uid, "status poll timed out; treating as waiting");
                return PollOutcome::Waiting;
            }
            Err(e) => return PollOutcome::TransientError(e.to_string()),
        };
        if !envelope.ok() {
            return PollOutcome::TransientError(envelope.reason("status query failed"));
        }
        // Missing `data` or an empty PHP array: no usable status.
        if !envelope.data.is_object() {
            return PollOutcome::from_status(&envelope.data);
        }
        match serde_json::from_value::<StatusData>(envelope.data) {
            Ok(data) => {
                let detail = text(&data.msg);
                if let Some(msg) = detail.as_deref() {
                    tracing::trace!(uid = %params.uid, msg, "status message");
                }
                PollOutcome::from_status(&data.status).with_detail(detail)
            }
            Err(e) => PollOutcome::TransientError(format!("Malformed status response: {e}")),
        }
    }

    async fn exchange_result(&self, uid: &str, target: TargetApp) -> Result<LoginResult, LoginError> {
        let app = target.to_string();
        let resp = self
            .client
            .post(self.config.result_url(target))
            .header(USER_AGENT, &self.config.user_agent)
            .form(&[("app", app.as_str()), ("account", uid)])
            .timeout(self.config.request_timeout())
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(LoginError::Connectivity(format!(
                "Result exchange for {app} failed with status {}",
                resp.status()
            )));
        }
        let envelope: Envelope = resp.json().await?;
        if !envelope.ok() {
            return Err(LoginError::Exchange(format!(
                "{app}: {}",
                envelope.reason("unknown error")
            )));
        }
        let data = if envelope.data.is_null() {
            ResultData::default()
        } else {
            serde_json::from_value::<ResultData>(envelope.data)
                .map_err(|e| LoginError::Exchange(format!("Malformed result response: {e}")))?
        };
        let credentials = data
            .cookie
            .into_iter()
            .map(|(k, v)| (k, stringify(v)))
            .collect();
        Ok(LoginResult::new(credentials, target))
    }
}
