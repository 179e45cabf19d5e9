use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use phpv_backend::{Architecture, ThreadSafety, VersionRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named selections over the available versions list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterBucket {
    #[default]
    All,
    X64,
    X86,
    /// x64 thread-safe builds, one per version string.
    Recommended,
}

impl FilterBucket {
    pub const ALL: [FilterBucket; 4] = [Self::All, Self::X64, Self::X86, Self::Recommended];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::X64 => "x64",
            Self::X86 => "x86",
            Self::Recommended => "recommended",
        }
    }
}

impl fmt::Display for FilterBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown filter bucket: {0}")]
pub struct UnknownBucket(pub String);

impl FromStr for FilterBucket {
    type Err = UnknownBucket;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownBucket(s.to_string()))
    }
}

/// Selects the records of `bucket`, preserving input order.
#[must_use]
pub fn filter(bucket: FilterBucket, available: &[VersionRecord]) -> Vec<&VersionRecord> {
    match bucket {
        FilterBucket::All => available.iter().collect(),
        FilterBucket::X64 => by_architecture(available, Architecture::X64),
        FilterBucket::X86 => by_architecture(available, Architecture::X86),
        FilterBucket::Recommended => recommended(available),
    }
}

fn by_architecture(available: &[VersionRecord], architecture: Architecture) -> Vec<&VersionRecord> {
    available
        .iter()
        .filter(|record| record.architecture == Some(architecture))
        .collect()
}

// Keeps the first candidate per version string; later ones are dropped even
// when their label differs.
fn recommended(available: &[VersionRecord]) -> Vec<&VersionRecord> {
    let mut seen: HashSet<Option<&str>> = HashSet::new();
    let mut picked = Vec::new();

    for record in available {
        let candidate = record.architecture == Some(Architecture::X64)
            && record.thread_safety == Some(ThreadSafety::ThreadSafe);
        if candidate && seen.insert(record.version_string.as_deref()) {
            picked.push(record);
        }
    }

    picked
}
