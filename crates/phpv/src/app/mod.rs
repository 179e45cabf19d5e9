mod config;
mod jobs;
mod operations;
mod versions;


use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use phpv_backend::VersionService;
use phpv_core::JobTracker;
use phpv_http::HttpVersionService;
use phpv_platform::AppPaths;

pub use operations::{InstallOutcome, UninstallOutcome};

use crate::confirm::Confirm;
use crate::error::AppError;
use crate::notify::Notifier;
use crate::logging;
use crate::settings::{AppSettings, SettingsError};
use crate::state::VersionState;

/// Timing and behavior knobs the orchestrator reads from [`AppSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSettings {
    pub poll_interval: Duration,
    pub success_hold: Duration,
    pub failure_hold: Duration,
    pub refresh_on_failure: bool,
}

impl From<&AppSettings> for JobSettings {
    fn from(settings: &AppSettings) -> Self {
        Self {
            poll_interval: settings.poll_interval(),
            success_hold: settings.success_hold(),
            failure_hold: settings.failure_hold(),
            refresh_on_failure: settings.refresh_on_job_failure,
        }
    }
}

impl Default for JobSettings {
    fn default() -> Self {
        Self::from(&AppSettings::default())
    }
}

struct Inner {
    service: Box<dyn VersionService>,
    confirm: Box<dyn Confirm>,
    notifier: Notifier,
    job_settings: JobSettings,
    state: Mutex<VersionState>,
    jobs: Mutex<JobTracker>,
}

/// The action orchestrator.
///
/// Cheap to clone; every clone drives the same state. Operations report to the
/// user through the [`Notifier`] and also return their result so callers can
/// chain on it or ignore it.
#[derive(Clone)]
pub struct App {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("service", &self.inner.service.name())
            .field("job_settings", &self.inner.job_settings)
            .finish_non_exhaustive()
    }
}

impl App {
    #[must_use]
    pub fn new(
        service: Box<dyn VersionService>,
        confirm: Box<dyn Confirm>,
        notifier: Notifier,
        settings: &AppSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                service,
                confirm,
                notifier,
                job_settings: JobSettings::from(settings),
                state: Mutex::new(VersionState::new(settings.default_filter)),
                jobs: Mutex::new(JobTracker::new()),
            }),
        }
    }

    /// Builds an orchestrator talking HTTP to `settings.api_base_url`.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn connect(
        settings: &AppSettings,
        confirm: Box<dyn Confirm>,
        notifier: Notifier,
    ) -> Result<Self, AppError> {
        let service = HttpVersionService::new(&settings.api_base_url, settings.http_timeout())
            .map_err(|error| AppError::operation_failed("connect", error))?;
        Ok(Self::new(Box::new(service), confirm, notifier, settings))
    }

    /// Loads the saved settings from the platform directories, installs the
    /// logger they describe, and connects to the backend.
    ///
    /// # Errors
    /// Returns an error if the platform directories cannot be determined or
    /// the backend client cannot be built.
    pub fn launch(confirm: Box<dyn Confirm>, notifier: Notifier) -> Result<Self, AppError> {
        let paths = AppPaths::new()
            .map_err(|error| AppError::config_failed("locate", SettingsError::from(error)))?;
        Self::launch_in(&paths, confirm, notifier)
    }

    /// [`App::launch`] with explicit settings and log locations.
    ///
    /// # Errors
    /// Returns an error if the backend client cannot be built.
    pub fn launch_in(
        paths: &AppPaths,
        confirm: Box<dyn Confirm>,
        notifier: Notifier,
    ) -> Result<Self, AppError> {
        let settings = AppSettings::load_from(&paths.settings_file());
        if let Err(error) = paths.ensure_dirs() {
            log::warn!("Could not create app directories: {error}");
        }
        logging::init_logging_at(
            &paths.log_file(),
            settings.debug_logging,
            settings.max_log_size_bytes,
        );
        Self::connect(&settings, confirm, notifier)
    }

    #[must_use]
    pub fn job_settings(&self) -> JobSettings {
        self.inner.job_settings
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Ids of install jobs that are still being polled.
    #[must_use]
    pub fn tracked_jobs(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.jobs().job_ids().map(str::to_string).collect();
        ids.sort();
        ids
    }

    /// Stops every running poller. Their notification slots are dismissed.
    pub fn cancel_jobs(&self) {
        self.jobs().cancel_all();
    }

    fn service(&self) -> &dyn VersionService {
        self.inner.service.as_ref()
    }

    fn state(&self) -> MutexGuard<'_, VersionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn jobs(&self) -> MutexGuard<'_, JobTracker> {
        self.inner
            .jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
