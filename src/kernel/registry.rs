use std::collections::HashMap;

use crate::error::MonitorError;
use crate::kernel::managed_object::Attributes;

/// Outcome of looking up a freshly fetched identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    New,
    Known,
}

/// One fabric object being tracked, keyed by its distinguished name.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterRecord {
    identity: String,
    pub attributes: Attributes,
    /// Epoch seconds of the first sighting.
    pub observed_at: u64,
}

impl CounterRecord {
    pub fn new(identity: impl Into<String>, attributes: Attributes, observed_at: u64) -> Self {
        Self {
            identity: identity.into(),
            attributes,
            observed_at,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
}

/// In-memory set of previously observed counter objects.
///
/// Records are never updated in place and never removed, so memory grows with the
/// fabric inventory for the lifetime of the process. Owned by the poll cycle controller;
/// a concurrent poller would need to hold a lock across `classify` + `register`.
#[derive(Debug, Default)]
pub struct CounterRegistry {
    records: HashMap<String, CounterRecord>,
}

impl CounterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&self, identity: &str) -> Classification {
        if self.records.contains_key(identity) {
            Classification::Known
        } else {
            Classification::New
        }
    }

    /// Adds a record. Callers classify first; a collision is a caller bug.
    pub fn register(&mut self, record: CounterRecord) -> Result<(), MonitorError> {
        if self.records.contains_key(record.identity()) {
            return Err(MonitorError::DuplicateIdentity(record.identity));
        }
        self.records.insert(record.identity.clone(), record);
        Ok(())
    }

    pub fn get(&self, identity: &str) -> Option<&CounterRecord> {
        self.records.get(identity)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
