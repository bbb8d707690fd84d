use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use super::{FabricClient, FetchResponse};
use crate::error::MonitorError;
use crate::services::base_url;

const SESSION_COOKIE: &str = "APIC-cookie";

#[derive(Deserialize)]
struct LoginResponse {
    imdata: Vec<LoginEntry>,
}

#[derive(Deserialize)]
struct LoginEntry {
    #[serde(rename = "aaaLogin")]
    aaa_login: Option<LoginAttributes>,
}

#[derive(Deserialize)]
struct LoginAttributes {
    attributes: LoginToken,
}

#[derive(Deserialize)]
struct LoginToken {
    token: String,
}

/// REST client for an APIC controller. The session token from `aaaLogin` is replayed as a
/// cookie on every later call until `logout`.
pub struct ApicClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    token: Option<String>,
}

impl ApicClient {
    pub fn new(
        host: &str,
        username: &str,
        password: &str,
        timeout: Duration,
        verify_tls: bool,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!verify_tls)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url(host),
            username: username.to_string(),
            password: password.to_string(),
            token: None,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.token.is_some()
    }

    fn auth_failure(&self, reason: impl ToString) -> MonitorError {
        MonitorError::Authentication {
            host: self.base_url.clone(),
            reason: reason.to_string(),
        }
    }

    fn session_cookie(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("{SESSION_COOKIE}={token}"))
    }
}

#[async_trait]
impl FabricClient for ApicClient {
    fn controller_name(&self) -> &str {
        &self.base_url
    }

    async fn login(&mut self) -> Result<(), MonitorError> {
        self.token = None;
        let body = json!({
            "aaaUser": { "attributes": { "name": self.username, "pwd": self.password } }
        });

        let response = self
            .client
            .post(format!("{}/api/aaaLogin.json", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.auth_failure(e))?;

        if !response.status().is_success() {
            return Err(self.auth_failure(format!("status {}", response.status())));
        }

        let login: LoginResponse = response.json().await.map_err(|e| self.auth_failure(e))?;
        let token = login
            .imdata
            .into_iter()
            .find_map(|entry| entry.aaa_login)
            .map(|login| login.attributes.token)
            .ok_or_else(|| self.auth_failure("no session token in aaaLogin response"))?;

        debug!(controller = %self.base_url, "session established");
        self.token = Some(token);
        Ok(())
    }

    async fn logout(&mut self) {
        let Some(cookie) = self.session_cookie() else {
            return;
        };
        self.token = None;

        let body = json!({ "aaaUser": { "attributes": { "name": self.username } } });
        let result = self
            .client
            .post(format!("{}/api/aaaLogout.json", self.base_url))
            .header(COOKIE, cookie)
            .json(&body)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => debug!(controller = %self.base_url, "logged out"),
            Ok(resp) => warn!(controller = %self.base_url, status = %resp.status(), "logout rejected"),
            Err(e) => warn!(controller = %self.base_url, "logout failed: {e}"),
        }
    }

    async fn fetch_class(&self, class: &str) -> Result<FetchResponse, MonitorError> {
        let mut request = self
            .client
            .get(format!("{}/api/node/class/{class}.json", self.base_url));
        if let Some(cookie) = self.session_cookie() {
            request = request.header(COOKIE, cookie);
        }

        let fetch_failure = |e: reqwest::Error| MonitorError::Fetch {
            class: class.to_string(),
            status: e.status().map(|s| s.as_u16()),
            reason: e.to_string(),
        };

        let response = request.send().await.map_err(fetch_failure)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(fetch_failure)?;
        Ok(FetchResponse { status, body })
    }
}
