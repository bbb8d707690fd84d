use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::artifact::ArtifactEmitter;
use super::managed_object::{parse_class_response, ManagedObject};
use super::registry::{Classification, CounterRecord, CounterRegistry};
use super::telemetry::event::SweepEvent;
use super::telemetry::metrics::{compute_snapshot, TelemetrySnapshot};
use super::telemetry::recorder::TelemetryRecorder;
use super::threshold::ThresholdEvaluator;
use super::time::epoch_seconds;
use super::watch::{WatchListProvider, WatchTarget};
use crate::error::{FailureKind, MonitorError};
use crate::services::apic::FabricClient;
use crate::services::phantom::CaseClient;

pub const SLEEP_NORMAL: Duration = Duration::from_secs(60);
pub const SLEEP_RETRY: Duration = Duration::from_secs(10);
pub const DEFAULT_CONTAINER_ID: u64 = 28;

const LOG_DN_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub poll_interval: Duration,
    /// Delay after a failed login. Shorter than `poll_interval`.
    pub retry_interval: Duration,
    /// Every artifact lands in this one container.
    pub container_id: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval: SLEEP_NORMAL,
            retry_interval: SLEEP_RETRY,
            container_id: DEFAULT_CONTAINER_ID,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Disconnected,
    Authenticating,
    Sweeping,
    Idling(Duration),
}

/// Drives authenticate -> sweep -> logout -> idle forever. Owns the registry; nothing else
/// mutates it.
pub struct PollCycle<F, C, W> {
    fabric: F,
    emitter: ArtifactEmitter<C>,
    watch_list: W,
    evaluator: ThresholdEvaluator,
    registry: CounterRegistry,
    pub telemetry: TelemetryRecorder,
    config: PollConfig,
    state: PollState,
}

impl<F, C, W> PollCycle<F, C, W>
where
    F: FabricClient,
    C: CaseClient,
    W: WatchListProvider,
{
    pub fn new(fabric: F, case_client: C, watch_list: W, config: PollConfig) -> Self {
        Self {
            fabric,
            emitter: ArtifactEmitter::new(case_client),
            watch_list,
            evaluator: ThresholdEvaluator::new(),
            registry: CounterRegistry::new(),
            telemetry: TelemetryRecorder::new(),
            config,
            state: PollState::Disconnected,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn registry(&self) -> &CounterRegistry {
        &self.registry
    }

    pub fn fabric(&self) -> &F {
        &self.fabric
    }

    pub fn case_client(&self) -> &C {
        self.emitter.client()
    }

    /// Runs until `shutdown` fires. In-flight requests are abandoned on cancellation.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!(controller = %self.fabric.controller_name(), "poll loop started");
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("poll loop stopped");
                    return;
                }
                _ = self.step() => {}
            }
        }
    }

    /// Performs exactly one state transition and returns the new state.
    pub async fn step(&mut self) -> PollState {
        self.state = match self.state {
            PollState::Disconnected => PollState::Authenticating,
            PollState::Authenticating => match self.fabric.login().await {
                Ok(()) => PollState::Sweeping,
                Err(e) => {
                    warn!("{e} ... retrying");
                    self.telemetry.record(SweepEvent::AuthenticationFailed);
                    PollState::Idling(self.config.retry_interval)
                }
            },
            PollState::Sweeping => {
                self.sweep().await;
                self.fabric.logout().await;
                PollState::Idling(self.config.poll_interval)
            }
            PollState::Idling(delay) => {
                let totals = self.telemetry.snapshot();
                info!(
                    tracked = self.registry.len(),
                    sweeps = totals.sweeps,
                    artifacts = totals.artifacts_emitted,
                    failures = totals.failures.total(),
                    "idle for {}s",
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                PollState::Disconnected
            }
        };
        self.state
    }

    /// One pass over the watch list, in order. Returns the counts for this pass only.
    pub async fn sweep(&mut self) -> TelemetrySnapshot {
        let span = info_span!("sweep", id = %Uuid::new_v4());
        self.sweep_targets().instrument(span).await
    }

    async fn sweep_targets(&mut self) -> TelemetrySnapshot {
        let targets: Vec<WatchTarget> = self.watch_list.list().to_vec();
        let mut events = Vec::new();

        for target in &targets {
            if let Err(e) = self.sweep_target(target, &mut events).await {
                warn!(class = %target.class, kind = %e.category(), "{e}");
                events.push(SweepEvent::TargetFailed { kind: e.category() });
            }
        }
        events.push(SweepEvent::SweepCompleted {
            targets: targets.len(),
        });

        for event in &events {
            self.telemetry.record(*event);
        }
        compute_snapshot(&events)
    }

    async fn sweep_target(
        &mut self,
        target: &WatchTarget,
        events: &mut Vec<SweepEvent>,
    ) -> Result<(), MonitorError> {
        info!(
            controller = %self.fabric.controller_name(),
            class = %target.class,
            counter = %target.counter,
            threshold = ?target.threshold,
            "searching"
        );

        let response = self.fabric.fetch_class(&target.class).await?;
        if !response.is_success() {
            return Err(MonitorError::Fetch {
                class: target.class.clone(),
                status: Some(response.status),
                reason: "failure to communicate".to_string(),
            });
        }

        for object in parse_class_response(&target.class, &response.body)? {
            match object {
                Ok(object) => self.process_object(&target.class, object, events).await,
                Err(e) => {
                    warn!(class = %target.class, kind = %e.category(), "skipping object: {e}");
                    events.push(SweepEvent::ObjectSkipped { kind: e.category() });
                }
            }
        }
        Ok(())
    }

    async fn process_object(&mut self, class: &str, object: ManagedObject, events: &mut Vec<SweepEvent>) {
        let dn = short_dn(&object.dn).to_string();

        match self.registry.classify(&object.dn) {
            // First sighting is the baseline, never itself an incident.
            Classification::New => {
                let record = CounterRecord::new(object.dn, object.attributes, epoch_seconds());
                match self.registry.register(record) {
                    Ok(()) => {
                        info!(dn = %dn, "added object");
                        events.push(SweepEvent::ObjectRegistered);
                    }
                    Err(e) => {
                        error!(dn = %dn, "{e}");
                        events.push(SweepEvent::ObjectSkipped { kind: e.category() });
                    }
                }
            }
            // The stored copy is not refreshed; the decision uses the fresh attributes.
            Classification::Known => {
                debug!(dn = %dn, "located object");
                events.push(SweepEvent::ObjectKnown);

                match self.evaluator.exceeds(class, &object.attributes) {
                    Ok(false) => {}
                    Ok(true) => {
                        let result = self
                            .emitter
                            .emit(self.config.container_id, class, &object.attributes)
                            .await;
                        match result {
                            Ok(_) => events.push(SweepEvent::ArtifactEmitted),
                            Err(e) if e.category() == FailureKind::Submission => {
                                error!(dn = %dn, "event dropped: {e}");
                                events.push(SweepEvent::SubmissionFailed);
                            }
                            Err(e) => {
                                warn!(dn = %dn, kind = %e.category(), "cannot build artifact: {e}");
                                events.push(SweepEvent::ObjectSkipped { kind: e.category() });
                            }
                        }
                    }
                    Err(e) => {
                        warn!(dn = %dn, kind = %e.category(), "skipping object: {e}");
                        events.push(SweepEvent::ObjectSkipped { kind: e.category() });
                    }
                }
            }
        }
    }
}

fn short_dn(dn: &str) -> &str {
    match dn.char_indices().nth(LOG_DN_CHARS) {
        Some((idx, _)) => &dn[..idx],
        None => dn,
    }
}
