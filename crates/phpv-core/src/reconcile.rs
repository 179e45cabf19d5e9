use log::warn;
use phpv_backend::VersionRecord;

/// Outcome of matching one candidate against the installed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation<'a> {
    pub is_installed: bool,
    /// The installed record to hand to an uninstall action.
    pub matched: Option<&'a VersionRecord>,
}

/// Finds the installed record for `candidate`. The first identity match wins;
/// the backend keeps identities unique within the installed set.
#[must_use]
pub fn reconcile<'a>(installed: &'a [VersionRecord], candidate: &VersionRecord) -> Reconciliation<'a> {
    let matched = candidate.identity_key().and_then(|key| {
        installed
            .iter()
            .find(|record| record.identity_key().as_ref() == Some(&key))
    });

    Reconciliation {
        is_installed: matched.is_some(),
        matched,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveVersion<'a> {
    #[default]
    None,
    Active(&'a VersionRecord),
}

impl<'a> ActiveVersion<'a> {
    #[must_use]
    pub fn record(self) -> Option<&'a VersionRecord> {
        match self {
            Self::None => None,
            Self::Active(record) => Some(record),
        }
    }

    /// Header text: the active version string, or `None`.
    #[must_use]
    pub fn label(self) -> &'a str {
        match self {
            Self::None => "None",
            Self::Active(record) => record.display_name(),
        }
    }
}

#[must_use]
pub fn count_active(installed: &[VersionRecord]) -> usize {
    installed.iter().filter(|record| record.is_active()).count()
}

/// Derives the active build from the installed set.
///
/// More than one active record is a backend inconsistency: it is logged and
/// the first one in input order is used.
#[must_use]
pub fn active_version(installed: &[VersionRecord]) -> ActiveVersion<'_> {
    let mut active = installed.iter().filter(|record| record.is_active());
    let Some(first) = active.next() else {
        return ActiveVersion::None;
    };

    let extra = active.count();
    if extra > 0 {
        warn!(
            "Backend reported {} active versions, using {}",
            extra + 1,
            first.display_name()
        );
    }

    ActiveVersion::Active(first)
}
