use thiserror::Error;

/// Error text the backend returns when the target install folder exists.
pub const DUPLICATE_VERSION_ERROR: &str = "Version already exists";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Network error during {operation} ({stage}): {details}")]
    NetworkError {
        operation: &'static str,
        stage: NetworkStage,
        details: String,
    },

    #[error(
        "{operation} rejected with HTTP {status}: {}",
        .message.as_deref().unwrap_or("no details")
    )]
    Rejected {
        operation: &'static str,
        status: u16,
        message: Option<String>,
    },

    #[error("Operation not supported by this backend: {operation}")]
    Unsupported { operation: &'static str },

    #[error("Timeout waiting for {operation}")]
    Timeout { operation: &'static str },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStage {
    #[error("request")]
    Request,
    #[error("response parse")]
    ResponseParse,
}

impl BackendError {
    pub fn network_request(operation: &'static str, details: impl Into<String>) -> Self {
        Self::NetworkError {
            operation,
            stage: NetworkStage::Request,
            details: details.into(),
        }
    }

    pub fn network_request_from<E>(operation: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::network_request(operation, error.to_string())
    }

    pub fn network_parse(operation: &'static str, details: impl Into<String>) -> Self {
        Self::NetworkError {
            operation,
            stage: NetworkStage::ResponseParse,
            details: details.into(),
        }
    }

    pub fn network_parse_from<E>(operation: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::network_parse(operation, error.to_string())
    }

    pub fn rejected(operation: &'static str, status: u16, message: Option<String>) -> Self {
        Self::Rejected {
            operation,
            status,
            message,
        }
    }

    /// The error text the backend put in its `{error}` body, if any.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP 400 carrying exactly the duplicate-version error text.
    #[must_use]
    pub fn is_duplicate_version(&self) -> bool {
        matches!(
            self,
            Self::Rejected { status: 400, message: Some(message), .. }
                if message == DUPLICATE_VERSION_ERROR
        )
    }

    /// Whether the request never produced a usable answer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendError, NetworkStage};

    #[test]
    fn network_helpers_set_expected_stage() {
        let request = BackendError::network_request("list versions", "connection refused");
        assert!(matches!(
            request,
            BackendError::NetworkError {
                operation: "list versions",
                stage: NetworkStage::Request,
                ..
            }
        ));

        let parse = BackendError::network_parse("job status", "invalid json");
        assert!(matches!(
            parse,
            BackendError::NetworkError {
                operation: "job status",
                stage: NetworkStage::ResponseParse,
                ..
            }
        ));
        assert!(parse.is_transport());
    }

    #[test]
    fn duplicate_version_requires_400_and_exact_text() {
        let duplicate =
            BackendError::rejected("install", 400, Some("Version already exists".to_string()));
        assert!(duplicate.is_duplicate_version());

        let other_text = BackendError::rejected("install", 400, Some("Bad URL".to_string()));
        assert!(!other_text.is_duplicate_version());

        let other_status =
            BackendError::rejected("install", 409, Some("Version already exists".to_string()));
        assert!(!other_status.is_duplicate_version());
    }

    #[test]
    fn rejected_display_uses_backend_message() {
        let error = BackendError::rejected("uninstall", 500, Some("Folder in use".to_string()));
        assert_eq!(
            error.to_string(),
            "uninstall rejected with HTTP 500: Folder in use"
        );
        assert_eq!(error.backend_message(), Some("Folder in use"));

        let bare = BackendError::rejected("activate", 503, None);
        assert_eq!(bare.to_string(), "activate rejected with HTTP 503: no details");
        assert!(!bare.is_transport());
    }
}
