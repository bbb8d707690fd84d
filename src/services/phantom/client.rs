use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::CaseClient;
use crate::error::MonitorError;
use crate::kernel::artifact::{Artifact, ArtifactId, CefFields};
use crate::kernel::managed_object::Attributes;
use crate::services::base_url;

const AUTH_HEADER: &str = "ph-auth-token";
const ARTIFACT_LABEL: &str = "event";

#[derive(Serialize)]
struct ArtifactRequest<'a> {
    container_id: u64,
    cef: &'a CefFields,
    data: &'a Attributes,
    name: &'a str,
    label: &'a str,
    source_data_identifier: &'a str,
}

#[derive(Deserialize)]
struct ArtifactResponse {
    id: Option<ArtifactId>,
    existing_artifact_id: Option<ArtifactId>,
    message: Option<String>,
}

/// REST client for the Phantom ingestion API.
#[derive(Clone)]
pub struct PhantomClient {
    client: Client,
    base_url: String,
    token: String,
}

impl PhantomClient {
    pub fn new(host: &str, token: &str, timeout: Duration, verify_tls: bool) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .danger_accept_invalid_certs(!verify_tls)
                .build()?,
            base_url: base_url(host),
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl CaseClient for PhantomClient {
    async fn add_artifact(&self, container_id: u64, artifact: &Artifact) -> Result<ArtifactId, MonitorError> {
        let request = ArtifactRequest {
            container_id,
            cef: &artifact.cef,
            data: &artifact.data,
            name: &artifact.name,
            label: ARTIFACT_LABEL,
            source_data_identifier: &artifact.source_data_identifier,
        };

        let response = self
            .client
            .post(format!("{}/rest/artifact", self.base_url))
            .header(AUTH_HEADER, &self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| MonitorError::Submission(format!("{} did not respond: {e}", self.base_url)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MonitorError::Submission(format!("status {status}: {body}")));
        }

        let parsed: ArtifactResponse = response
            .json()
            .await
            .map_err(|e| MonitorError::Submission(format!("unreadable response: {e}")))?;

        match (parsed.id, parsed.existing_artifact_id) {
            (Some(id), _) => Ok(id),
            (None, Some(existing)) => {
                debug!(
                    existing,
                    source_data_identifier = %artifact.source_data_identifier,
                    "artifact already exists"
                );
                Ok(existing)
            }
            (None, None) => Err(MonitorError::Submission(
                parsed
                    .message
                    .unwrap_or_else(|| "response carried no artifact id".to_string()),
            )),
        }
    }
}
