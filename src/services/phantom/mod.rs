use async_trait::async_trait;

use crate::error::MonitorError;
use crate::kernel::artifact::{Artifact, ArtifactId};

pub mod client;

pub use client::PhantomClient;

#[async_trait]
pub trait CaseClient {
    /// Fails with `MonitorError::Submission` on a non-success status or connection error.
    async fn add_artifact(&self, container_id: u64, artifact: &Artifact) -> Result<ArtifactId, MonitorError>;
}
