pub mod artifact;
pub mod cycle;
pub mod managed_object;
pub mod registry;
pub mod telemetry;
pub mod threshold;
pub mod time;
pub mod watch;
