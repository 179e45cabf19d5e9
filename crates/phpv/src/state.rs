use phpv_backend::{
    Architecture, InstallRequest, ServerConfig, ThreadSafety, VersionRecord, VersionTarget,
};
use phpv_core::{FilterBucket, active_version, count_active, filter, reconcile};

fn architecture_label(architecture: Option<Architecture>) -> &'static str {
    architecture.map_or("unknown", Architecture::label)
}

fn thread_safety_label(thread_safety: Option<ThreadSafety>) -> &'static str {
    thread_safety.map_or("unknown", ThreadSafety::long_label)
}

/// One line of the installed versions table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledRow {
    pub record: VersionRecord,
    pub is_active: bool,
    /// Activate/uninstall target; `None` when the backend sent no path.
    pub target: Option<VersionTarget>,
}

impl InstalledRow {
    #[must_use]
    pub fn version_label(&self) -> &str {
        self.record.display_name()
    }

    #[must_use]
    pub fn architecture_label(&self) -> &'static str {
        architecture_label(self.record.architecture)
    }

    #[must_use]
    pub fn thread_safety_label(&self) -> &'static str {
        self.record
            .thread_safety
            .map_or("unknown", ThreadSafety::short_label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Install(InstallRequest),
    Uninstall(VersionTarget),
}

/// One line of the available versions table for the current bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableRow {
    pub record: VersionRecord,
    pub installed: bool,
    /// `None` for an installed match without a path or name: it cannot be
    /// removed from here and must not be installed twice.
    pub action: Option<RowAction>,
}

impl AvailableRow {
    #[must_use]
    pub fn new(candidate: &VersionRecord, installed: &[VersionRecord]) -> Self {
        let reconciliation = reconcile(installed, candidate);
        let action = match reconciliation.matched {
            Some(matched) => {
                let name = candidate.name().or_else(|| matched.name());
                name.zip(matched.path.clone())
                    .map(|(name, path)| RowAction::Uninstall(VersionTarget::new(name, path)))
            }
            None => Some(RowAction::Install(InstallRequest::for_available(candidate))),
        };

        Self {
            record: candidate.clone(),
            installed: reconciliation.is_installed,
            action,
        }
    }

    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.installed { "Installed" } else { "Available" }
    }

    #[must_use]
    pub fn architecture_label(&self) -> &'static str {
        architecture_label(self.record.architecture)
    }

    #[must_use]
    pub fn thread_safety_label(&self) -> &'static str {
        thread_safety_label(self.record.thread_safety)
    }
}

/// Client copy of the backend's version lists.
///
/// Snapshots are replaced wholesale; the available rows are re-derived from
/// them whenever the filter is (re)applied.
#[derive(Debug, Clone, Default)]
pub struct VersionState {
    installed: Vec<VersionRecord>,
    available: Option<Vec<VersionRecord>>,
    filter: FilterBucket,
    available_rows: Vec<AvailableRow>,
    config: Option<ServerConfig>,
    installed_request_seq: u64,
    available_request_seq: u64,
}

impl VersionState {
    #[must_use]
    pub fn new(filter: FilterBucket) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn replace_installed(&mut self, installed: Vec<VersionRecord>) {
        self.installed = installed;
    }

    /// Starts an installed-list fetch and returns its ticket. Any ticket
    /// handed out earlier stops being current.
    pub fn begin_installed_request(&mut self) -> u64 {
        self.installed_request_seq = self.installed_request_seq.wrapping_add(1);
        self.installed_request_seq
    }

    /// Replaces the installed snapshot if `request_seq` is still the latest
    /// ticket. Returns `false` and leaves the snapshot alone otherwise.
    pub fn accept_installed(&mut self, request_seq: u64, installed: Vec<VersionRecord>) -> bool {
        if request_seq != self.installed_request_seq {
            return false;
        }
        self.replace_installed(installed);
        true
    }

    #[must_use]
    pub fn is_current_installed_request(&self, request_seq: u64) -> bool {
        request_seq == self.installed_request_seq
    }

    pub fn begin_available_request(&mut self) -> u64 {
        self.available_request_seq = self.available_request_seq.wrapping_add(1);
        self.available_request_seq
    }

    pub fn accept_available(&mut self, request_seq: u64, available: Vec<VersionRecord>) -> bool {
        if request_seq != self.available_request_seq {
            return false;
        }
        self.replace_available(available);
        true
    }

    #[must_use]
    pub fn is_current_available_request(&self, request_seq: u64) -> bool {
        request_seq == self.available_request_seq
    }

    pub fn replace_available(&mut self, available: Vec<VersionRecord>) {
        self.available = Some(available);
        self.apply_filter();
    }

    pub fn set_filter(&mut self, bucket: FilterBucket) {
        self.filter = bucket;
        self.apply_filter();
    }

    /// Rebuilds the available rows for the current bucket from the cached
    /// snapshots. Returns `false` when no available list has been loaded.
    pub fn apply_filter(&mut self) -> bool {
        let Some(available) = &self.available else {
            return false;
        };
        self.available_rows = filter(self.filter, available)
            .into_iter()
            .map(|candidate| AvailableRow::new(candidate, &self.installed))
            .collect();
        true
    }

    #[must_use]
    pub fn installed(&self) -> &[VersionRecord] {
        &self.installed
    }

    #[must_use]
    pub fn available(&self) -> Option<&[VersionRecord]> {
        self.available.as_deref()
    }

    #[must_use]
    pub fn filter(&self) -> FilterBucket {
        self.filter
    }

    #[must_use]
    pub fn available_rows(&self) -> &[AvailableRow] {
        &self.available_rows
    }

    #[must_use]
    pub fn installed_rows(&self) -> Vec<InstalledRow> {
        let active = active_version(&self.installed).record();
        self.installed
            .iter()
            .map(|record| InstalledRow {
                record: record.clone(),
                is_active: active.is_some_and(|active| std::ptr::eq(active, record)),
                target: VersionTarget::for_installed(record),
            })
            .collect()
    }

    #[must_use]
    pub fn active(&self) -> Option<&VersionRecord> {
        active_version(&self.installed).record()
    }

    #[must_use]
    pub fn active_label(&self) -> &str {
        active_version(&self.installed).label()
    }

    /// Number of installed records flagged active; more than one means the
    /// backend is inconsistent.
    #[must_use]
    pub fn active_count(&self) -> usize {
        count_active(&self.installed)
    }

    #[must_use]
    pub fn config(&self) -> Option<&ServerConfig> {
        self.config.as_ref()
    }

    pub fn replace_config(&mut self, config: ServerConfig) {
        self.config = Some(config);
    }
}
