use phpv_backend::BackendError;

use crate::settings::SettingsError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorDetail {
    Message(String),
    Backend(BackendError),
}

impl std::fmt::Display for AppErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(message) => write!(f, "{message}"),
            Self::Backend(error) => write!(f, "{error}"),
        }
    }
}

impl From<String> for AppErrorDetail {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for AppErrorDetail {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

impl From<BackendError> for AppErrorDetail {
    fn from(value: BackendError) -> Self {
        Self::Backend(value)
    }
}

impl From<SettingsError> for AppErrorDetail {
    fn from(value: SettingsError) -> Self {
        Self::Message(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The backend could not be reached or answered with something unreadable.
    ConnectionFailed {
        operation: &'static str,
        details: AppErrorDetail,
    },
    OperationFailed {
        operation: &'static str,
        details: AppErrorDetail,
    },
    DuplicateVersion {
        version: String,
    },
    VersionFetchFailed {
        resource: &'static str,
        details: AppErrorDetail,
    },
    ConfigFailed {
        action: &'static str,
        details: AppErrorDetail,
    },
}

impl AppError {
    pub fn connection_failed(operation: &'static str, details: impl Into<AppErrorDetail>) -> Self {
        Self::ConnectionFailed {
            operation,
            details: details.into(),
        }
    }

    pub fn operation_failed(operation: &'static str, details: impl Into<AppErrorDetail>) -> Self {
        Self::OperationFailed {
            operation,
            details: details.into(),
        }
    }

    pub fn duplicate_version(version: impl Into<String>) -> Self {
        Self::DuplicateVersion {
            version: version.into(),
        }
    }

    pub fn version_fetch_failed(
        resource: &'static str,
        details: impl Into<AppErrorDetail>,
    ) -> Self {
        Self::VersionFetchFailed {
            resource,
            details: details.into(),
        }
    }

    pub fn config_failed(action: &'static str, details: impl Into<AppErrorDetail>) -> Self {
        Self::ConfigFailed {
            action,
            details: details.into(),
        }
    }

    /// Classifies a failed backend call for `operation`: transport problems
    /// become [`AppError::ConnectionFailed`], everything else
    /// [`AppError::OperationFailed`].
    #[must_use]
    pub fn from_backend(operation: &'static str, error: BackendError) -> Self {
        if error.is_transport() {
            Self::connection_failed(operation, error)
        } else {
            Self::operation_failed(operation, error)
        }
    }

    /// Short text suitable for a notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ConnectionFailed { .. } => "Connection error".to_string(),
            Self::OperationFailed { details, .. } => match details {
                AppErrorDetail::Backend(error) => match error.backend_message() {
                    Some(text) => format!("Error: {text}"),
                    None => format!("Error: {error}"),
                },
                AppErrorDetail::Message(message) => format!("Error: {message}"),
            },
            Self::DuplicateVersion { version } => format!(
                "PHP {version} is already installed. Remove the existing folder before installing it again."
            ),
            Self::VersionFetchFailed { resource, .. } => format!("Failed to load {resource}"),
            Self::ConfigFailed { action, .. } => format!("Failed to {action} config"),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed { operation, details } => {
                write!(f, "Could not reach the backend for {operation}: {details}")
            }
            Self::OperationFailed { operation, details } => {
                write!(f, "{operation} failed: {details}")
            }
            Self::DuplicateVersion { version } => {
                write!(f, "PHP {version} is already installed")
            }
            Self::VersionFetchFailed { resource, details } => {
                write!(f, "{resource} fetch failed: {details}")
            }
            Self::ConfigFailed { action, details } => write!(f, "Config {action} failed: {details}"),
        }
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use phpv_backend::BackendError;
    use phpv_platform::AppPathsError;

    use super::{AppError, AppErrorDetail};
    use crate::settings::SettingsError;

    #[test]
    fn transport_errors_become_connection_failures() {
        let error = AppError::from_backend(
            "install",
            BackendError::network_request("install", "connection refused"),
        );

        assert!(matches!(
            error,
            AppError::ConnectionFailed {
                operation: "install",
                ..
            }
        ));
        assert_eq!(error.user_message(), "Connection error");

        let timeout = AppError::from_backend("activate", BackendError::Timeout { operation: "activate" });
        assert_eq!(timeout.user_message(), "Connection error");
    }

    #[test]
    fn rejected_calls_surface_backend_text() {
        let error = AppError::from_backend(
            "uninstall",
            BackendError::rejected("uninstall", 500, Some("Folder is locked".to_string())),
        );

        assert_eq!(
            error,
            AppError::OperationFailed {
                operation: "uninstall",
                details: AppErrorDetail::Backend(BackendError::rejected(
                    "uninstall",
                    500,
                    Some("Folder is locked".to_string())
                )),
            }
        );
        assert_eq!(error.user_message(), "Error: Folder is locked");
        assert_eq!(
            error.to_string(),
            "uninstall failed: uninstall rejected with HTTP 500: Folder is locked"
        );
    }

    #[test]
    fn duplicate_version_message_tells_user_to_remove_folder() {
        let error = AppError::duplicate_version("8.4.16");

        assert_eq!(error.to_string(), "PHP 8.4.16 is already installed");
        assert!(error.user_message().contains("Remove the existing folder"));
    }

    #[test]
    fn fetch_and_config_errors_include_context() {
        let fetch = AppError::version_fetch_failed("available versions", "timeout");
        let config = AppError::config_failed("save", "HTTP 500");

        assert_eq!(
            fetch.to_string(),
            "available versions fetch failed: timeout"
        );
        assert_eq!(fetch.user_message(), "Failed to load available versions");
        assert_eq!(config.to_string(), "Config save failed: HTTP 500");
        assert_eq!(config.user_message(), "Failed to save config");
    }

    #[test]
    fn settings_errors_become_config_failures() {
        let error = AppError::config_failed(
            "locate",
            SettingsError::from(AppPathsError::ConfigDirUnavailable),
        );

        assert_eq!(error.user_message(), "Failed to locate config");
        assert_eq!(
            error.to_string(),
            "Config locate failed: Could not determine config directory"
        );
    }
}
