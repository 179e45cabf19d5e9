//! Activate, install, and uninstall.
//!
//! Each operation stands alone: a failure is reported and returned, and
//! never affects other operations or running install jobs.

use log::{info, warn};
use phpv_backend::{InstallRequest, InstallResponse, VersionTarget};
use phpv_core::PollHandle;

use crate::error::{AppError, AppErrorDetail};

use super::App;

#[derive(Debug, Clone)]
pub enum InstallOutcome {
    /// The user did not confirm; nothing was sent.
    Declined,
    /// The backend installed synchronously and the installed list was
    /// refreshed.
    Installed,
    /// The backend started a job that is now polled in the background.
    Tracking(PollHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    Declined,
    Removed,
}

impl App {
    /// Makes the build at `path` the active one.
    ///
    /// # Errors
    /// Returns an error when the backend refuses or cannot be reached. Local
    /// state is left untouched in that case.
    pub async fn activate(&self, version_string: &str, path: &str) -> Result<(), AppError> {
        let notifier = &self.inner.notifier;
        notifier.info(format!("Activating PHP {version_string}..."));

        let target = VersionTarget::new(version_string, path);
        match self.service().activate(&target).await {
            Ok(()) => {
                info!("Activated PHP {version_string}");
                notifier.success("Version activated");
                self.refresh_installed().await
            }
            Err(error) => {
                warn!("Activating {version_string} failed: {error}");
                notifier.error(
                    error
                        .backend_message()
                        .map_or_else(|| "Failed to activate version".to_string(), str::to_string),
                );
                Err(AppError::from_backend("activate", error))
            }
        }
    }

    /// Asks for confirmation, then requests the install.
    ///
    /// When the backend answers with a job id the job is handed to a poller
    /// and this returns immediately; progress arrives as notifications.
    ///
    /// # Errors
    /// Returns an error when the backend rejects the request (including the
    /// duplicate-version case) or cannot be reached.
    pub async fn install(&self, request: InstallRequest) -> Result<InstallOutcome, AppError> {
        let name = request.display_name().to_string();
        if !self
            .inner
            .confirm
            .confirm(&format!("Download and install PHP {name}?"))
            .await
        {
            return Ok(InstallOutcome::Declined);
        }

        let notifier = &self.inner.notifier;
        notifier.info(format!("Starting download of PHP {name}..."));

        match self.service().install(&request).await {
            Ok(InstallResponse {
                job_id: Some(job_id),
            }) => {
                info!("Install of {name} runs as job {job_id}");
                notifier.info("Downloading in the background...");
                Ok(InstallOutcome::Tracking(self.start_polling(job_id)))
            }
            Ok(InstallResponse { job_id: None }) => {
                info!("Installed {name}");
                notifier.success("Installation complete");
                self.refresh_and_refilter().await?;
                Ok(InstallOutcome::Installed)
            }
            Err(error) if error.is_duplicate_version() => {
                let error = AppError::duplicate_version(name);
                warn!("{error}");
                notifier.warning(error.user_message());
                Err(error)
            }
            Err(error) => {
                warn!("Install of {name} failed: {error}");
                let error = AppError::from_backend("install", error);
                notifier.error(install_failure_text(&error));
                Err(error)
            }
        }
    }

    /// Asks for confirmation, then removes the build at `path`.
    ///
    /// On success the installed list is refreshed and, when an available list
    /// is loaded, the current bucket is re-applied to it without re-fetching.
    ///
    /// # Errors
    /// Returns an error when the backend refuses or cannot be reached.
    pub async fn uninstall(
        &self,
        version_string: &str,
        path: &str,
    ) -> Result<UninstallOutcome, AppError> {
        if !self
            .inner
            .confirm
            .confirm(&format!("Remove PHP {version_string}?"))
            .await
        {
            return Ok(UninstallOutcome::Declined);
        }

        let notifier = &self.inner.notifier;
        notifier.info(format!("Removing PHP {version_string}..."));

        let target = VersionTarget::new(version_string, path);
        match self.service().uninstall(&target).await {
            Ok(()) => {
                info!("Removed PHP {version_string}");
                notifier.success("Version removed");
                self.refresh_and_refilter().await?;
                Ok(UninstallOutcome::Removed)
            }
            Err(error) => {
                warn!("Removing {version_string} failed: {error}");
                let error = AppError::from_backend("uninstall", error);
                notifier.error(uninstall_failure_text(&error));
                Err(error)
            }
        }
    }
}

fn backend_text(error: &AppError) -> Option<&str> {
    match error {
        AppError::OperationFailed {
            details: AppErrorDetail::Backend(error),
            ..
        } => error.backend_message(),
        _ => None,
    }
}

fn install_failure_text(error: &AppError) -> String {
    match error {
        AppError::ConnectionFailed { .. } => error.user_message(),
        _ => format!("Error: {}", backend_text(error).unwrap_or("Unknown")),
    }
}

fn uninstall_failure_text(error: &AppError) -> String {
    match error {
        AppError::ConnectionFailed { .. } => error.user_message(),
        _ => format!(
            "Error: {}",
            backend_text(error).unwrap_or("Could not remove the version")
        ),
    }
}
