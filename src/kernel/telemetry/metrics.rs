use super::event::SweepEvent;
use crate::error::FailureKind;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub sweeps: u64,
    pub targets_swept: u64,
    pub objects_registered: u64,
    pub objects_known: u64,
    pub artifacts_emitted: u64,
    pub failures: FailureStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureStats {
    pub authentication: u64,
    pub fetch: u64,
    pub parse: u64,
    pub missing_field: u64,
    pub submission: u64,
    pub registry: u64,
}

impl FailureStats {
    fn bump(&mut self, kind: FailureKind) {
        match kind {
            FailureKind::Authentication => self.authentication += 1,
            FailureKind::Fetch => self.fetch += 1,
            FailureKind::Parse => self.parse += 1,
            FailureKind::MissingField => self.missing_field += 1,
            FailureKind::Submission => self.submission += 1,
            FailureKind::Registry => self.registry += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.authentication + self.fetch + self.parse + self.missing_field + self.submission + self.registry
    }
}

impl TelemetrySnapshot {
    pub fn apply(&mut self, event: &SweepEvent) {
        match event {
            SweepEvent::ObjectRegistered => self.objects_registered += 1,
            SweepEvent::ObjectKnown => self.objects_known += 1,
            SweepEvent::ArtifactEmitted => self.artifacts_emitted += 1,
            SweepEvent::ObjectSkipped { kind } | SweepEvent::TargetFailed { kind } => {
                self.failures.bump(*kind)
            }
            SweepEvent::SubmissionFailed => self.failures.bump(FailureKind::Submission),
            SweepEvent::AuthenticationFailed => self.failures.bump(FailureKind::Authentication),
            SweepEvent::SweepCompleted { targets } => {
                self.sweeps += 1;
                self.targets_swept += *targets as u64;
            }
        }
    }
}

pub fn compute_snapshot<'a>(events: impl IntoIterator<Item = &'a SweepEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    for event in events {
        snap.apply(event);
    }
    snap
}
