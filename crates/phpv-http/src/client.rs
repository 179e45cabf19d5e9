use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use phpv_backend::{
    BackendError, InstallRequest, InstallResponse, InstalledListing, JobStatusReport,
    PathDebugInfo, ServerConfig, VersionRecord, VersionService, VersionTarget,
};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8085/api";

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "Error")]
    error: Option<String>,
}

/// Talks to the version manager's REST API.
#[derive(Debug, Clone)]
pub struct HttpVersionService {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpVersionService {
    /// Build a service for `base_url` with a per-request timeout.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::network_request_from("client setup", e))?;
        Self::with_client(client, base_url)
    }

    /// Build a service that reuses an existing HTTP client.
    ///
    /// # Errors
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| BackendError::network_request("client setup", format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::network_request(
                "client setup",
                format!("{base_url} cannot be used as an API base"),
            ));
        }
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        segments: &[&str],
    ) -> Result<T, BackendError> {
        let url = self.endpoint(segments);
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(operation, &e))?;
        let response = ensure_success(operation, response).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::network_parse_from(operation, e))
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        segments: &[&str],
        body: &B,
    ) -> Result<Response, BackendError> {
        let url = self.endpoint(segments);
        debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(operation, &e))?;
        ensure_success(operation, response).await
    }
}

fn transport_error(operation: &'static str, error: &reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Timeout { operation }
    } else {
        BackendError::network_request_from(operation, error)
    }
}

async fn ensure_success(operation: &'static str, response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(rejection(operation, status, &body))
}

/// Maps a non-2xx answer to [`BackendError::Rejected`], keeping the backend's
/// `{error}` text when the body carries one.
pub(crate) fn rejection(operation: &'static str, status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .filter(|text| !text.trim().is_empty());
    BackendError::rejected(operation, status.as_u16(), message)
}

pub(crate) fn parse_install_response(body: &str) -> Result<InstallResponse, BackendError> {
    if body.trim().is_empty() {
        return Ok(InstallResponse::default());
    }
    serde_json::from_str(body).map_err(|e| BackendError::network_parse_from("install", e))
}

#[async_trait]
impl VersionService for HttpVersionService {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn list_installed(&self) -> Result<Vec<VersionRecord>, BackendError> {
        let listing: InstalledListing = self.get_json("list versions", &["versions"]).await?;
        debug!("Backend reported {} installed versions", listing.installed.len());
        Ok(listing.installed)
    }

    async fn list_available(&self) -> Result<Vec<VersionRecord>, BackendError> {
        let available: Option<Vec<VersionRecord>> =
            self.get_json("list available", &["available"]).await?;
        Ok(available.unwrap_or_default())
    }

    async fn activate(&self, target: &VersionTarget) -> Result<(), BackendError> {
        info!("Activating {} at {}", target.version_string, target.path);
        self.post_json("activate", &["activate"], target).await?;
        Ok(())
    }

    async fn install(&self, request: &InstallRequest) -> Result<InstallResponse, BackendError> {
        info!("Requesting install of {}", request.display_name());
        let response = self.post_json("install", &["install"], request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::network_parse_from("install", e))?;
        parse_install_response(&body)
    }

    async fn uninstall(&self, target: &VersionTarget) -> Result<(), BackendError> {
        info!("Uninstalling {} at {}", target.version_string, target.path);
        self.post_json("uninstall", &["uninstall"], target).await?;
        Ok(())
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, BackendError> {
        self.get_json("job status", &["jobs", job_id]).await
    }

    async fn get_config(&self) -> Result<ServerConfig, BackendError> {
        self.get_json("load config", &["config"]).await
    }

    async fn save_config(&self, config: &ServerConfig) -> Result<(), BackendError> {
        self.post_json("save config", &["config"], config).await?;
        Ok(())
    }

    async fn path_debug(&self) -> Result<PathDebugInfo, BackendError> {
        self.get_json("path debug", &["debug", "path"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base: &str) -> HttpVersionService {
        HttpVersionService::new(base, Duration::from_secs(5)).expect("base URL should be valid")
    }

    #[test]
    fn endpoint_appends_segments_to_api_prefix() {
        let api = service("http://127.0.0.1:8085/api");

        assert_eq!(
            api.endpoint(&["versions"]).as_str(),
            "http://127.0.0.1:8085/api/versions"
        );
        assert_eq!(
            api.endpoint(&["debug", "path"]).as_str(),
            "http://127.0.0.1:8085/api/debug/path"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let api = service("http://localhost:9000/api/");

        assert_eq!(
            api.endpoint(&["available"]).as_str(),
            "http://localhost:9000/api/available"
        );
    }

    #[test]
    fn job_ids_are_escaped_as_a_single_segment() {
        let api = service(DEFAULT_API_BASE);

        assert_eq!(
            api.endpoint(&["jobs", "a/b c"]).as_str(),
            "http://127.0.0.1:8085/api/jobs/a%2Fb%20c"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(HttpVersionService::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpVersionService::new("mailto:dev@example.test", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn rejection_keeps_backend_error_text() {
        let error = rejection(
            "install",
            StatusCode::BAD_REQUEST,
            r#"{"error":"Version already exists"}"#,
        );

        assert!(error.is_duplicate_version());
        assert_eq!(error.backend_message(), Some("Version already exists"));
    }

    #[test]
    fn rejection_without_json_body_has_no_message() {
        let error = rejection("uninstall", StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");

        assert_eq!(
            error,
            BackendError::rejected("uninstall", 500, None)
        );
    }

    #[test]
    fn install_response_may_be_empty() {
        assert_eq!(
            parse_install_response("  ").expect("empty body is a synchronous install"),
            InstallResponse::default()
        );
        assert_eq!(
            parse_install_response(r#"{"jobId":"j1"}"#)
                .expect("job body should parse")
                .job_id
                .as_deref(),
            Some("j1")
        );
        assert!(parse_install_response("{oops").is_err());
    }
}
