//! Client orchestration for the phpv version manager.
//!
//! [`App`] drives the backend: it activates, installs and removes builds,
//! follows install jobs in the background, and keeps the installed and
//! available snapshots that the views are rendered from. Everything the user
//! should see is sent as a [`Notification`].

mod app;
pub mod confirm;
pub mod error;
pub mod logging;
pub mod notify;
pub mod settings;
pub mod state;

pub use app::{App, InstallOutcome, JobSettings, UninstallOutcome};
pub use confirm::{AutoConfirm, AutoDecline, Confirm};
pub use error::{AppError, AppErrorDetail};
pub use notify::{NoticeLevel, Notification, Notifier};
pub use settings::{AppSettings, SettingsError};
pub use state::{AvailableRow, InstalledRow, RowAction, VersionState};

pub use phpv_backend::{
    BackendError, InstallRequest, PathDebugInfo, ServerConfig, VersionRecord, VersionService,
    VersionTarget,
};
pub use phpv_core::{FilterBucket, PollHandle};
