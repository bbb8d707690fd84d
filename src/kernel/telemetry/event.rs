use crate::error::FailureKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepEvent {
    /// First sighting of an identity; baseline only.
    ObjectRegistered,
    ObjectKnown,
    ArtifactEmitted,
    ObjectSkipped { kind: FailureKind },
    TargetFailed { kind: FailureKind },
    SubmissionFailed,
    AuthenticationFailed,
    SweepCompleted { targets: usize },
}
