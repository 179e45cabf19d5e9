use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::wire::{self, WireEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JobStatus {
    #[default]
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl WireEnum for JobStatus {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Running),
            1 => Some(Self::Completed),
            2 => Some(Self::Failed),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("completed") {
            Some(Self::Completed)
        } else if name.eq_ignore_ascii_case("failed") {
            Some(Self::Failed)
        } else if name.eq_ignore_ascii_case("running") {
            Some(Self::Running)
        } else {
            None
        }
    }
}

/// One answer from `GET /jobs/{id}`.
///
/// Unknown statuses are read as `Running` so an unexpected value keeps the
/// job polling instead of ending it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobStatusReport {
    #[serde(default, deserialize_with = "status_or_running")]
    pub status: JobStatus,

    #[serde(default, deserialize_with = "clamped_percent")]
    pub progress: u8,

    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub message: String,
}

impl JobStatusReport {
    #[must_use]
    pub fn running(progress: u8, message: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Running,
            progress: progress.min(100),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn completed(message: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Completed,
            progress: 100,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            progress: 100,
            message: message.into(),
        }
    }
}

fn status_or_running<'de, D>(deserializer: D) -> Result<JobStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(wire::lenient(deserializer)?.unwrap_or_default())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamped_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let percent = match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    };
    Ok(percent.clamp(0, 100) as u8)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_string_status() {
        let report: JobStatusReport = serde_json::from_value(json!({
            "Status": "Running",
            "Progress": 30,
            "Message": "[PROGRESS] | 30 | Downloading"
        }))
        .expect("report should deserialize");

        assert_eq!(report.status, JobStatus::Running);
        assert_eq!(report.progress, 30);
        assert_eq!(report.message, "[PROGRESS] | 30 | Downloading");
    }

    #[test]
    fn parses_numeric_status() {
        let completed: JobStatusReport =
            serde_json::from_value(json!({ "Status": 1, "Progress": 100, "Message": "Done" }))
                .expect("report should deserialize");
        assert_eq!(completed.status, JobStatus::Completed);

        let failed: JobStatusReport =
            serde_json::from_value(json!({ "Status": 2, "Message": "boom" }))
                .expect("report should deserialize");
        assert_eq!(failed.status, JobStatus::Failed);
        assert_eq!(failed.progress, 0);
    }

    #[test]
    fn unknown_status_keeps_running() {
        let report: JobStatusReport =
            serde_json::from_value(json!({ "Status": "Queued", "Progress": null }))
                .expect("report should deserialize");

        assert_eq!(report.status, JobStatus::Running);
        assert!(!report.status.is_terminal());
        assert_eq!(report.progress, 0);
        assert!(report.message.is_empty());
    }

    #[test]
    fn progress_is_clamped() {
        let over: JobStatusReport = serde_json::from_value(json!({ "Progress": 250 }))
            .expect("report should deserialize");
        assert_eq!(over.progress, 100);

        let under: JobStatusReport = serde_json::from_value(json!({ "Progress": -4 }))
            .expect("report should deserialize");
        assert_eq!(under.progress, 0);
    }

    #[test]
    fn terminal_states() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }
}
