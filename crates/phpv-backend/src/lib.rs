mod config;
mod error;
mod job;
mod traits;
mod types;
mod wire;

pub use config::{BrowserSection, DebugSection, PathDebugInfo, PathScope, ServerConfig, ServerSection};
pub use error::{BackendError, DUPLICATE_VERSION_ERROR, NetworkStage};
pub use job::{JobStatus, JobStatusReport};
pub use traits::{VersionService, VersionServiceClone};
pub use types::{
    Architecture, IdentityKey, InstallRequest, InstallResponse, InstallStatus, InstalledListing,
    ThreadSafety, VersionRecord, VersionTarget,
};
pub use wire::WireEnum;
