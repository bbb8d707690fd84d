pub mod config;
pub mod error;
pub mod kernel;
pub mod services;

pub use error::{ConfigError, FailureKind, MonitorError};
pub use kernel::cycle::{PollConfig, PollCycle, PollState};
