//! Installed/available snapshots and the views derived from them.

use log::{debug, warn};
use phpv_backend::VersionRecord;
use phpv_core::FilterBucket;

use crate::error::AppError;
use crate::state::{AvailableRow, InstalledRow};

use super::App;

impl App {
    /// Re-fetches the installed list and replaces the snapshot.
    ///
    /// Only the most recently started refresh may write the snapshot; an
    /// answer that arrives after a newer request was issued is dropped.
    ///
    /// # Errors
    /// Returns an error when the list cannot be fetched; the previous
    /// snapshot is kept and an error notice is sent.
    pub async fn refresh_installed(&self) -> Result<(), AppError> {
        let request_seq = self.state().begin_installed_request();
        match self.service().list_installed().await {
            Ok(records) => {
                let count = records.len();
                let active_count = {
                    let mut state = self.state();
                    if !state.accept_installed(request_seq, records) {
                        debug!("Ignoring stale installed versions response: request_seq={request_seq}");
                        return Ok(());
                    }
                    state.active_count()
                };
                debug!("Installed snapshot now holds {count} versions");
                if active_count > 1 {
                    warn!("{active_count} installed versions are flagged active");
                }
                Ok(())
            }
            Err(error) => {
                let error = AppError::version_fetch_failed("installed versions", error);
                warn!("{error}");
                if self.state().is_current_installed_request(request_seq) {
                    self.inner.notifier.error(error.user_message());
                } else {
                    debug!("Suppressing notice for stale installed versions request {request_seq}");
                }
                Err(error)
            }
        }
    }

    /// Fetches the available list and renders it with the current bucket.
    ///
    /// A response superseded by a later call is dropped and the current rows
    /// are returned instead.
    ///
    /// # Errors
    /// Returns an error when the list cannot be fetched; the previous
    /// snapshot is kept and an error notice is sent.
    pub async fn load_available(&self) -> Result<Vec<AvailableRow>, AppError> {
        let request_seq = self.state().begin_available_request();
        match self.service().list_available().await {
            Ok(records) => {
                debug!("Backend offers {} versions", records.len());
                let mut state = self.state();
                if !state.accept_available(request_seq, records) {
                    debug!("Ignoring stale available versions response: request_seq={request_seq}");
                }
                Ok(state.available_rows().to_vec())
            }
            Err(error) => {
                let error = AppError::version_fetch_failed("available versions", error);
                warn!("{error}");
                if self.state().is_current_available_request(request_seq) {
                    self.inner.notifier.error(error.user_message());
                }
                Err(error)
            }
        }
    }

    /// Switches the bucket and re-renders from the cached available list.
    /// Nothing is fetched.
    pub fn set_filter(&self, bucket: FilterBucket) -> Vec<AvailableRow> {
        let mut state = self.state();
        state.set_filter(bucket);
        state.available_rows().to_vec()
    }

    #[must_use]
    pub fn filter_bucket(&self) -> FilterBucket {
        self.state().filter()
    }

    #[must_use]
    pub fn installed_view(&self) -> Vec<InstalledRow> {
        self.state().installed_rows()
    }

    #[must_use]
    pub fn available_view(&self) -> Vec<AvailableRow> {
        self.state().available_rows().to_vec()
    }

    #[must_use]
    pub fn installed(&self) -> Vec<VersionRecord> {
        self.state().installed().to_vec()
    }

    #[must_use]
    pub fn active_version(&self) -> Option<VersionRecord> {
        self.state().active().cloned()
    }

    /// Header text for the active version: its version string or `None`.
    #[must_use]
    pub fn active_label(&self) -> String {
        self.state().active_label().to_string()
    }

    /// Installed refresh followed by a re-render of the available rows, so
    /// their Installed/Available status follows the new installed list.
    pub(super) async fn refresh_and_refilter(&self) -> Result<(), AppError> {
        let refreshed = self.refresh_installed().await;
        let refiltered = self.state().apply_filter();
        if refiltered {
            debug!("Re-applied available filter after refresh");
        }
        refreshed
    }
}
