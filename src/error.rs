use std::fmt;

/// Failure classes of a poll cycle. Only `Authentication` is retried (by the outer loop);
/// everything else is contained at object or target granularity and logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Authentication,
    Fetch,
    Parse,
    MissingField,
    Submission,
    Registry,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Authentication => "AuthenticationFailure",
            FailureKind::Fetch => "FetchFailure",
            FailureKind::Parse => "ParseFailure",
            FailureKind::MissingField => "MissingFieldFailure",
            FailureKind::Submission => "SubmissionFailure",
            FailureKind::Registry => "RegistryFailure",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("authentication with {host} failed: {reason}")]
    Authentication { host: String, reason: String },

    #[error("query for class {class} failed (status {status:?}): {reason}")]
    Fetch {
        class: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("malformed response for class {class}: {reason}")]
    Parse { class: String, reason: String },

    #[error("object is missing attribute `{field}`")]
    MissingField { field: String },

    #[error("attribute `{field}` is not numeric: {value}")]
    NonNumeric { field: String, value: String },

    #[error("artifact submission failed: {0}")]
    Submission(String),

    #[error("identity {0} is already registered")]
    DuplicateIdentity(String),
}

impl MonitorError {
    pub fn missing(field: &str) -> Self {
        MonitorError::MissingField {
            field: field.to_string(),
        }
    }

    pub fn category(&self) -> FailureKind {
        match self {
            MonitorError::Authentication { .. } => FailureKind::Authentication,
            MonitorError::Fetch { .. } => FailureKind::Fetch,
            MonitorError::Parse { .. } => FailureKind::Parse,
            MonitorError::MissingField { .. } | MonitorError::NonNumeric { .. } => {
                FailureKind::MissingField
            }
            MonitorError::Submission(_) => FailureKind::Submission,
            MonitorError::DuplicateIdentity(_) => FailureKind::Registry,
        }
    }
}

/// Startup configuration problems. These are the only fatal errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required setting {0} is not set")]
    Missing(&'static str),

    #[error("setting {key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("cannot read watch list {path}: {reason}")]
    WatchList { path: String, reason: String },

    #[error("retry interval ({retry}s) must be shorter than the poll interval ({poll}s)")]
    RetryNotShorter { retry: u64, poll: u64 },
}
