use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::wire::{self, WireEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    X86,
    X64,
}

impl Architecture {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::X86 => 0,
            Self::X64 => 1,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
        }
    }
}

impl WireEnum for Architecture {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::X86),
            1 => Some(Self::X64),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "x86" | "win32" | "i386" => Some(Self::X86),
            "x64" | "x86_64" | "amd64" => Some(Self::X64),
            _ => None,
        }
    }
}

impl Serialize for Architecture {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadSafety {
    Nts,
    ThreadSafe,
}

impl ThreadSafety {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Nts => 0,
            Self::ThreadSafe => 1,
        }
    }

    /// Short label used in installed cards.
    #[must_use]
    pub fn short_label(self) -> &'static str {
        match self {
            Self::Nts => "NTS",
            Self::ThreadSafe => "ZTS",
        }
    }

    /// Long label used in the available versions table.
    #[must_use]
    pub fn long_label(self) -> &'static str {
        match self {
            Self::Nts => "NTS",
            Self::ThreadSafe => "Thread Safe",
        }
    }
}

impl WireEnum for ThreadSafety {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Nts),
            1 => Some(Self::ThreadSafe),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "nts" | "nonthreadsafe" | "non-thread-safe" => Some(Self::Nts),
            "ts" | "zts" | "threadsafe" | "thread-safe" | "thread safe" => Some(Self::ThreadSafe),
            _ => None,
        }
    }
}

impl Serialize for ThreadSafety {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl fmt::Display for ThreadSafety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_label())
    }
}

/// Activation status of an installed build.
///
/// The backend reports `2` (or `"Active"`) for the selected build. Every
/// other value means the build is installed but not selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallStatus {
    Inactive,
    Active,
}

impl InstallStatus {
    const ACTIVE_CODE: i64 = 2;
}

impl WireEnum for InstallStatus {
    fn from_code(code: i64) -> Option<Self> {
        Some(if code == Self::ACTIVE_CODE {
            Self::Active
        } else {
            Self::Inactive
        })
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(if name.eq_ignore_ascii_case("active") {
            Self::Active
        } else {
            Self::Inactive
        })
    }
}

impl Serialize for InstallStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Active => serializer.serialize_str("Active"),
            Self::Inactive => serializer.serialize_str("Inactive"),
        }
    }
}

/// One interpreter build, either installed locally or offered for download.
///
/// Every field is optional: the backend is allowed to send partially
/// populated records, and consumers must handle each absence explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionRecord {
    #[serde(
        default,
        deserialize_with = "wire::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version_string: Option<String>,

    #[serde(
        default,
        deserialize_with = "wire::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_label: Option<String>,

    #[serde(
        default,
        deserialize_with = "wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub architecture: Option<Architecture>,

    #[serde(
        default,
        deserialize_with = "wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub thread_safety: Option<ThreadSafety>,

    #[serde(
        default,
        deserialize_with = "wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<InstallStatus>,

    #[serde(
        default,
        deserialize_with = "wire::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<String>,

    #[serde(
        default,
        deserialize_with = "wire::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub download_url: Option<String>,
}

/// The `(version, architecture, thread safety)` triple that decides whether
/// two records describe the same build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub version: String,
    pub architecture: Architecture,
    pub thread_safety: ThreadSafety,
}

impl VersionRecord {
    /// The version string, falling back to the version embedded in the
    /// distribution label (`php-8.4.16-Win32-vs17-x64` yields `8.4.16`).
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version_string
            .as_deref()
            .filter(|version| !version.is_empty())
            .or_else(|| {
                self.full_label
                    .as_deref()
                    .and_then(|label| label.split('-').nth(1))
                    .filter(|version| !version.is_empty())
            })
    }

    /// Returns `None` when any identity component is missing; such records
    /// never match anything.
    #[must_use]
    pub fn identity_key(&self) -> Option<IdentityKey> {
        Some(IdentityKey {
            version: self.version()?.to_string(),
            architecture: self.architecture?,
            thread_safety: self.thread_safety?,
        })
    }

    #[must_use]
    pub fn same_build(&self, other: &VersionRecord) -> bool {
        match (self.identity_key(), other.identity_key()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Some(InstallStatus::Active)
    }

    /// The version string, or the full label when the backend did not send
    /// one. `None` when the record carries neither.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.version_string
            .as_deref()
            .filter(|version| !version.is_empty())
            .or_else(|| self.full_label.as_deref().filter(|label| !label.is_empty()))
    }

    /// [`VersionRecord::name`] for display, `"unknown"` when there is none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or("unknown")
    }
}

/// Payload for `/activate` and `/uninstall`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionTarget {
    pub version_string: String,
    pub path: String,
}

impl VersionTarget {
    #[must_use]
    pub fn new(version_string: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            version_string: version_string.into(),
            path: path.into(),
        }
    }

    /// Builds the target for an installed record. `None` when the record has
    /// no path or no name, because the backend cannot locate the build
    /// without both.
    #[must_use]
    pub fn for_installed(record: &VersionRecord) -> Option<Self> {
        Some(Self::new(record.name()?, record.path.clone()?))
    }
}

/// Payload for `/install`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_string: Option<String>,
}

impl InstallRequest {
    #[must_use]
    pub fn for_available(record: &VersionRecord) -> Self {
        Self {
            download_url: record.download_url.clone(),
            full_label: record.full_label.clone(),
            version_string: record.version_string.clone(),
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.version_string
            .as_deref()
            .or(self.full_label.as_deref())
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InstallResponse {
    #[serde(
        default,
        rename = "jobId",
        alias = "JobId",
        alias = "job_id",
        deserialize_with = "wire::lenient_string"
    )]
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstalledListing {
    #[serde(default, alias = "Installed", deserialize_with = "wire::null_as_default")]
    pub installed: Vec<VersionRecord>,
}
