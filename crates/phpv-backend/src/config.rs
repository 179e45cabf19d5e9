use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::wire;

const DEFAULT_SERVER_PORT: u16 = 8085;

/// The backend's own settings document.
///
/// Only the fields this client edits are typed; everything else is carried
/// through `extra` untouched so saving never drops settings written by a
/// newer backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub debug: DebugSection,

    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub server: ServerSection,

    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub browser: BrowserSection,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugSection {
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub launcher_debug_enabled: bool,

    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub server_debug_enabled: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVER_PORT,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserSection {
    #[serde(default = "default_true")]
    pub use_app_mode: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for BrowserSection {
    fn default() -> Self {
        Self {
            use_app_mode: true,
            extra: Map::new(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_SERVER_PORT
}

fn default_true() -> bool {
    true
}

/// Answer from `GET /debug/path`: the user `PATH` entries now and the
/// entries recorded before the manager last edited them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PathDebugInfo {
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub current: PathScope,

    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub history: PathScope,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PathScope {
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub user: Vec<String>,
}
