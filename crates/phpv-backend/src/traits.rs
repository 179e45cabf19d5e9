use async_trait::async_trait;

use crate::config::{PathDebugInfo, ServerConfig};
use crate::error::BackendError;
use crate::job::JobStatusReport;
use crate::types::{InstallRequest, InstallResponse, VersionRecord, VersionTarget};

/// The version manager service the client reconciles against.
#[async_trait]
pub trait VersionService: Send + Sync + VersionServiceClone {
    fn name(&self) -> &'static str;

    async fn list_installed(&self) -> Result<Vec<VersionRecord>, BackendError>;

    async fn list_available(&self) -> Result<Vec<VersionRecord>, BackendError>;

    async fn activate(&self, target: &VersionTarget) -> Result<(), BackendError>;

    async fn install(&self, request: &InstallRequest) -> Result<InstallResponse, BackendError>;

    async fn uninstall(&self, target: &VersionTarget) -> Result<(), BackendError>;

    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, BackendError>;

    async fn get_config(&self) -> Result<ServerConfig, BackendError>;

    async fn save_config(&self, config: &ServerConfig) -> Result<(), BackendError>;

    async fn path_debug(&self) -> Result<PathDebugInfo, BackendError> {
        Err(BackendError::Unsupported {
            operation: "path debug",
        })
    }
}

pub trait VersionServiceClone: Send + Sync {
    fn clone_box(&self) -> Box<dyn VersionService>;
}

impl<T> VersionServiceClone for T
where
    T: 'static + VersionService + Clone,
{
    fn clone_box(&self) -> Box<dyn VersionService> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn VersionService> {
    fn clone(&self) -> Box<dyn VersionService> {
        self.clone_box()
    }
}

impl<T: VersionService + Clone + 'static> From<T> for Box<dyn VersionService> {
    fn from(service: T) -> Self {
        Box::new(service)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    #[derive(Clone, Default)]
    struct MockService {
        installed: Vec<VersionRecord>,
        list_calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl VersionService for MockService {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn list_installed(&self) -> Result<Vec<VersionRecord>, BackendError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.installed.clone())
        }

        async fn list_available(&self) -> Result<Vec<VersionRecord>, BackendError> {
            Ok(Vec::new())
        }

        async fn activate(&self, _target: &VersionTarget) -> Result<(), BackendError> {
            Ok(())
        }

        async fn install(
            &self,
            _request: &InstallRequest,
        ) -> Result<InstallResponse, BackendError> {
            Ok(InstallResponse::default())
        }

        async fn uninstall(&self, _target: &VersionTarget) -> Result<(), BackendError> {
            Ok(())
        }

        async fn job_status(&self, _job_id: &str) -> Result<JobStatusReport, BackendError> {
            Ok(JobStatusReport::completed("Done"))
        }

        async fn get_config(&self) -> Result<ServerConfig, BackendError> {
            Ok(ServerConfig::default())
        }

        async fn save_config(&self, _config: &ServerConfig) -> Result<(), BackendError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn path_debug_default_returns_unsupported() {
        let service = MockService::default();

        let result = service.path_debug().await;

        assert!(
            matches!(
                result,
                Err(BackendError::Unsupported {
                    operation: "path debug"
                })
            ),
            "expected Unsupported, got {result:?}"
        );
    }

    #[tokio::test]
    async fn boxed_clone_shares_behavior() {
        let calls = Arc::new(AtomicUsize::new(0));
        let boxed: Box<dyn VersionService> = MockService {
            installed: vec![VersionRecord {
                version_string: Some("8.4.16".to_string()),
                ..VersionRecord::default()
            }],
            list_calls: Arc::clone(&calls),
        }
        .into();
        let cloned = boxed.clone();

        assert_eq!(cloned.name(), "mock");
        let installed = cloned
            .list_installed()
            .await
            .expect("list_installed should work on cloned service");
        assert_eq!(installed.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
