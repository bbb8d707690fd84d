use serde::Serialize;
use tracing::info;

use crate::error::MonitorError;
use crate::kernel::managed_object::{attribute_text, Attributes};
use crate::kernel::threshold::{RX_PACKETS, TX_PACKETS};
use crate::services::phantom::CaseClient;

pub type ArtifactId = u64;

/// Common event fields the case-management side indexes on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CefFields {
    #[serde(rename = "sourceAddress")]
    pub source_address: String,
    #[serde(rename = "destinationAddress")]
    pub destination_address: String,
    #[serde(rename = "transportProtocol")]
    pub transport_protocol: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    pub message: String,
    pub out: String,
    #[serde(rename = "in")]
    pub inbound: String,
}

/// Outbound incident evidence. Built per qualifying event, never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub name: String,
    pub cef: CefFields,
    pub data: Attributes,
    /// The object's `ts`; the receiving side drops artifacts it has already seen.
    pub source_data_identifier: String,
}

impl Artifact {
    pub fn from_attributes(object_class: &str, attributes: &Attributes) -> Result<Self, MonitorError> {
        let cef = CefFields {
            source_address: attribute_text(attributes, "src")?,
            destination_address: attribute_text(attributes, "dst")?,
            transport_protocol: attribute_text(attributes, "filtEnt")?,
            end_time: attribute_text(attributes, "ts")?,
            message: attribute_text(attributes, "dn")?,
            out: attribute_text(attributes, TX_PACKETS)?,
            inbound: attribute_text(attributes, RX_PACKETS)?,
        };

        Ok(Self {
            name: object_class.to_string(),
            source_data_identifier: cef.end_time.clone(),
            cef,
            data: attributes.clone(),
        })
    }
}

pub struct ArtifactEmitter<C> {
    client: C,
}

impl<C: CaseClient> ArtifactEmitter<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Normalizes the object and submits it. The event is dropped on failure; callers log.
    pub async fn emit(
        &self,
        container_id: u64,
        object_class: &str,
        attributes: &Attributes,
    ) -> Result<ArtifactId, MonitorError> {
        let artifact = Artifact::from_attributes(object_class, attributes)?;
        let artifact_id = self.client.add_artifact(container_id, &artifact).await?;
        info!(
            artifact_id,
            container_id,
            source_data_identifier = %artifact.source_data_identifier,
            "added artifact"
        );
        Ok(artifact_id)
    }
}
