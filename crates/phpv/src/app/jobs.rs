//! Background polling of install jobs.
//!
//! Every job gets its own task and its own notification slot keyed by the job
//! id. The slot shows "Starting..." until the first status arrives, follows the
//! job's progress, and is dismissed a short while after the job ends.

use std::time::Duration;

use log::{debug, info, warn};
use phpv_core::{JobOutcome, JobPoller, JobProgress, PollHandle};

use crate::notify::NoticeLevel;

use super::App;

impl App {
    /// Starts polling `job_id` on a background task and returns the handle
    /// that cancels it. Must be called from within a tokio runtime.
    pub fn start_polling(&self, job_id: String) -> PollHandle {
        let mut poller = JobPoller::new(
            self.inner.service.clone(),
            job_id.clone(),
            self.inner.job_settings.poll_interval,
        );
        let handle = poller.handle();
        self.jobs().track(handle.clone());
        self.inner
            .notifier
            .job_progress(&poller.initial_progress(), NoticeLevel::Info);

        let app = self.clone();
        tokio::spawn(async move {
            let notifier = app.inner.notifier.clone();
            let outcome = poller
                .run(|progress| notifier.job_progress(progress, NoticeLevel::Info))
                .await;
            app.finish_job(job_id, outcome).await;
        });

        handle
    }

    async fn finish_job(&self, job_id: String, outcome: JobOutcome) {
        let settings = self.inner.job_settings;
        let notifier = &self.inner.notifier;
        let owned = self.release_job(&job_id);

        let hold = match outcome {
            JobOutcome::Completed { .. } => {
                notifier.job_progress(
                    &finished(&job_id, "Installation finished".to_string()),
                    NoticeLevel::Success,
                );
                let _ = self.refresh_and_refilter().await;
                settings.success_hold
            }
            JobOutcome::Failed { message } => {
                notifier.job_progress(
                    &finished(&job_id, format!("Error: {message}")),
                    NoticeLevel::Error,
                );
                if settings.refresh_on_failure {
                    let _ = self.refresh_and_refilter().await;
                }
                settings.failure_hold
            }
            JobOutcome::Lost { error } => {
                warn!("Lost track of job {job_id}: {error}");
                Duration::ZERO
            }
            JobOutcome::Cancelled => {
                debug!("Polling of job {job_id} cancelled");
                Duration::ZERO
            }
        };

        if !owned {
            debug!("Job {job_id} was taken over by a newer poller");
            return;
        }
        if !hold.is_zero() {
            tokio::time::sleep(hold).await;
        }
        notifier.job_dismissed(job_id);
    }

    /// Stops tracking a finished job. Returns `false` when a newer poller has
    /// taken over the id, in which case its notification slot is not ours.
    fn release_job(&self, job_id: &str) -> bool {
        let mut jobs = self.jobs();
        if jobs.release_finished(job_id).is_some() {
            info!("Stopped tracking job {job_id}");
            return true;
        }
        !jobs.is_tracking(job_id)
    }
}

fn finished(job_id: &str, message: String) -> JobProgress {
    JobProgress {
        job_id: job_id.to_string(),
        percent: 100,
        message,
    }
}
