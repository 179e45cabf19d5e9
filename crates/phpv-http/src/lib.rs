mod client;

pub use client::{DEFAULT_API_BASE, HttpVersionService};

pub use phpv_backend::{
    BackendError, InstallRequest, InstallResponse, JobStatusReport, ServerConfig, VersionRecord,
    VersionService, VersionTarget,
};
