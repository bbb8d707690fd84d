use serde::{Deserialize, Serialize};

/// What to poll each cycle. `counter` and `threshold` describe the target in logs; the
/// reporting decision itself is the fixed policy in `ThresholdEvaluator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchTarget {
    pub class: String,
    pub counter: String,
    #[serde(default)]
    pub threshold: Option<u64>,
}

impl WatchTarget {
    pub fn new(class: &str, counter: &str) -> Self {
        Self {
            class: class.to_string(),
            counter: counter.to_string(),
            threshold: None,
        }
    }
}

pub trait WatchListProvider {
    /// Targets in sweep order. Must return the same sequence on every call.
    fn list(&self) -> &[WatchTarget];
}

/// Watch list fixed at construction, usually from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticWatchList {
    targets: Vec<WatchTarget>,
}

impl StaticWatchList {
    pub fn new(targets: Vec<WatchTarget>) -> Self {
        Self { targets }
    }
}

impl Default for StaticWatchList {
    /// Endpoint-group to IP and IP to endpoint-group atomic counter results.
    fn default() -> Self {
        Self::new(vec![
            WatchTarget::new("dbgEpgToIpRslt", "totTxP"),
            WatchTarget::new("dbgIpToEpgRslt", "totTxP"),
        ])
    }
}

impl WatchListProvider for StaticWatchList {
    fn list(&self) -> &[WatchTarget] {
        &self.targets
    }
}
