use async_trait::async_trait;

use crate::error::MonitorError;

pub mod client;

pub use client::ApicClient;

/// Raw result of a class query. Status interpretation belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Session-oriented access to a fabric controller.
#[async_trait]
pub trait FabricClient {
    fn controller_name(&self) -> &str;

    async fn login(&mut self) -> Result<(), MonitorError>;

    /// Best effort; failures are logged by the implementation.
    async fn logout(&mut self);

    /// Transport failures are errors; any HTTP status is returned as-is.
    async fn fetch_class(&self, class: &str) -> Result<FetchResponse, MonitorError>;
}
