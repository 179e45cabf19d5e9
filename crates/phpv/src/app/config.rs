//! The backend's own settings document and its PATH diagnostics.

use log::{debug, warn};
use phpv_backend::{PathDebugInfo, ServerConfig};

use crate::error::AppError;

use super::App;

impl App {
    /// Fetches the backend settings document and keeps it for the next save.
    ///
    /// Failure is only logged: saving later falls back to the defaults.
    pub async fn load_config(&self) -> Option<ServerConfig> {
        match self.service().get_config().await {
            Ok(config) => {
                debug!("Loaded backend config (port {})", config.server.port);
                self.state().replace_config(config.clone());
                Some(config)
            }
            Err(error) => {
                warn!("Loading backend config failed: {error}");
                None
            }
        }
    }

    #[must_use]
    pub fn config(&self) -> Option<ServerConfig> {
        self.state().config().cloned()
    }

    /// Sets both debug flags on the loaded document (or the defaults when
    /// none was loaded) and saves the whole document.
    ///
    /// # Errors
    /// Returns an error when the backend refuses or cannot be reached.
    pub async fn save_config(
        &self,
        launcher_debug: bool,
        server_debug: bool,
    ) -> Result<ServerConfig, AppError> {
        let mut config = self.config().unwrap_or_default();
        config.debug.launcher_debug_enabled = launcher_debug;
        config.debug.server_debug_enabled = server_debug;

        match self.service().save_config(&config).await {
            Ok(()) => {
                self.state().replace_config(config.clone());
                self.inner.notifier.success("Settings saved");
                Ok(config)
            }
            Err(error) => {
                let error = AppError::config_failed("save", error);
                warn!("{error}");
                self.inner.notifier.error(error.user_message());
                Err(error)
            }
        }
    }

    /// # Errors
    /// Returns an error when the diagnostics cannot be fetched.
    pub async fn path_debug(&self) -> Result<PathDebugInfo, AppError> {
        match self.service().path_debug().await {
            Ok(info) => Ok(info),
            Err(error) => {
                let error = AppError::operation_failed("path debug", error);
                warn!("{error}");
                self.inner.notifier.error("Failed to load PATH diagnostics");
                Err(error)
            }
        }
    }
}
