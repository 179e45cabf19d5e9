//! Install job tracking.
//!
//! A [`JobPoller`] follows one backend job from the moment the install call
//! hands out its id until the job reaches a terminal state, the poll is
//! cancelled, or a status fetch fails. [`JobTracker`] keeps the cancellation
//! handles of every poller that is still running, keyed by job id.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info, warn};
use phpv_backend::{BackendError, JobStatus, JobStatusReport, VersionService};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

const PROGRESS_TAG: &str = "[PROGRESS] | ";
const PROGRESS_SEPARATOR: &str = " | ";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Strips a leading `[PROGRESS] | <number> | ` tag from a job message.
/// Messages without the full tag pass through unchanged.
#[must_use]
pub fn sanitize_message(message: &str) -> &str {
    let Some(rest) = message.strip_prefix(PROGRESS_TAG) else {
        return message;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return message;
    }
    rest[digits..]
        .strip_prefix(PROGRESS_SEPARATOR)
        .unwrap_or(message)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
    /// A status fetch failed; the job is no longer tracked.
    Abandoned,
}

impl JobPhase {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Abandoned)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub job_id: String,
    pub percent: u8,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed { message: String },
    Failed { message: String },
    Lost { error: BackendError },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickResult {
    Progress(JobProgress),
    Finished(JobOutcome),
    /// The poller was already finished or cancelled; nothing was fetched.
    Stopped,
}

/// Cancels a poller. Cancelling more than once is harmless.
#[derive(Debug, Clone)]
pub struct PollHandle {
    job_id: String,
    token: CancellationToken,
}

impl PollHandle {
    #[must_use]
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            debug!("Cancelling poll for job {}", self.job_id);
        }
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

pub struct JobPoller {
    service: Box<dyn VersionService>,
    job_id: String,
    interval: Duration,
    phase: JobPhase,
    token: CancellationToken,
}

impl std::fmt::Debug for JobPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobPoller")
            .field("service", &self.service.name())
            .field("job_id", &self.job_id)
            .field("interval", &self.interval)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl JobPoller {
    #[must_use]
    pub fn new(service: Box<dyn VersionService>, job_id: impl Into<String>, interval: Duration) -> Self {
        Self {
            service,
            job_id: job_id.into(),
            interval,
            phase: JobPhase::Idle,
            token: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn handle(&self) -> PollHandle {
        PollHandle {
            job_id: self.job_id.clone(),
            token: self.token.clone(),
        }
    }

    #[must_use]
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    #[must_use]
    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    /// What the user sees before the first status arrives.
    #[must_use]
    pub fn initial_progress(&self) -> JobProgress {
        JobProgress {
            job_id: self.job_id.clone(),
            percent: 0,
            message: "Starting...".to_string(),
        }
    }

    /// Fetches the job status once and advances the state machine.
    ///
    /// Does nothing once the poller is finished or cancelled. A response that
    /// arrives after cancellation is discarded.
    pub async fn tick(&mut self) -> TickResult {
        if self.phase.is_finished() || self.token.is_cancelled() {
            return TickResult::Stopped;
        }

        let fetched = tokio::select! {
            biased;
            () = self.token.cancelled() => return TickResult::Stopped,
            result = self.service.job_status(&self.job_id) => result,
        };

        if self.token.is_cancelled() {
            return TickResult::Stopped;
        }

        match fetched {
            Ok(report) => self.apply(report),
            Err(error) => {
                warn!("Status fetch for job {} failed, dropping it: {error}", self.job_id);
                self.finish(JobPhase::Abandoned);
                TickResult::Finished(JobOutcome::Lost { error })
            }
        }
    }

    fn apply(&mut self, report: JobStatusReport) -> TickResult {
        let message = sanitize_message(&report.message).to_string();

        match report.status {
            JobStatus::Completed => {
                info!("Job {} completed", self.job_id);
                self.finish(JobPhase::Completed);
                TickResult::Finished(JobOutcome::Completed { message })
            }
            JobStatus::Failed => {
                info!("Job {} failed: {message}", self.job_id);
                self.finish(JobPhase::Failed);
                TickResult::Finished(JobOutcome::Failed { message })
            }
            JobStatus::Running => {
                self.phase = JobPhase::Running;
                debug!("Job {} at {}%: {message}", self.job_id, report.progress);
                TickResult::Progress(JobProgress {
                    job_id: self.job_id.clone(),
                    percent: report.progress,
                    message,
                })
            }
        }
    }

    fn finish(&mut self, phase: JobPhase) {
        self.phase = phase;
        self.token.cancel();
    }

    /// Polls at the configured interval until the job finishes or the poll is
    /// cancelled, reporting every running tick to `on_progress`.
    ///
    /// The first fetch happens one interval after the call.
    pub async fn run<F>(&mut self, mut on_progress: F) -> JobOutcome
    where
        F: FnMut(&JobProgress),
    {
        if self.phase.is_finished() || self.token.is_cancelled() {
            return JobOutcome::Cancelled;
        }

        self.phase = JobPhase::Running;
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = self.token.cancelled() => return JobOutcome::Cancelled,
                _ = ticker.tick() => {}
            }

            match self.tick().await {
                TickResult::Progress(progress) => on_progress(&progress),
                TickResult::Finished(outcome) => return outcome,
                TickResult::Stopped => return JobOutcome::Cancelled,
            }
        }
    }
}

/// Handles of the pollers that are still running, keyed by job id.
#[derive(Debug, Default)]
pub struct JobTracker {
    active: HashMap<String, PollHandle>,
}

impl JobTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a poller. An older poller for the same job id is cancelled.
    pub fn track(&mut self, handle: PollHandle) {
        if let Some(previous) = self.active.insert(handle.job_id.clone(), handle) {
            previous.cancel();
        }
    }

    /// Removes the handle for `job_id` once its poller has stopped. A live
    /// handle, from a newer poller that took over the id, stays tracked.
    pub fn release_finished(&mut self, job_id: &str) -> Option<PollHandle> {
        if self.active.get(job_id).is_some_and(PollHandle::is_cancelled) {
            self.active.remove(job_id)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_tracking(&self, job_id: &str) -> bool {
        self.active.contains_key(job_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn job_ids(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(String::as_str)
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.active.drain() {
            handle.cancel();
        }
    }
}
