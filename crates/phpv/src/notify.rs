use log::debug;
use phpv_core::JobProgress;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Something the presentation layer should show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Toast {
        level: NoticeLevel,
        text: String,
    },
    /// Creates or updates the slot for `job_id`.
    JobProgress {
        job_id: String,
        text: String,
        percent: u8,
        level: NoticeLevel,
    },
    /// The slot for `job_id` should disappear.
    JobDismissed {
        job_id: String,
    },
}

/// Sending half of the notification channel.
///
/// Sends never fail: once the receiver is gone notices are dropped.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, notification: Notification) {
        if let Err(mpsc::error::SendError(dropped)) = self.tx.send(notification) {
            debug!("No notification receiver, dropping {dropped:?}");
        }
    }

    pub fn toast(&self, level: NoticeLevel, text: impl Into<String>) {
        self.send(Notification::Toast {
            level,
            text: text.into(),
        });
    }

    pub fn info(&self, text: impl Into<String>) {
        self.toast(NoticeLevel::Info, text);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.toast(NoticeLevel::Success, text);
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.toast(NoticeLevel::Warning, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.toast(NoticeLevel::Error, text);
    }

    pub fn job_progress(&self, progress: &JobProgress, level: NoticeLevel) {
        self.send(Notification::JobProgress {
            job_id: progress.job_id.clone(),
            text: progress.message.clone(),
            percent: progress.percent,
            level,
        });
    }

    pub fn job_dismissed(&self, job_id: impl Into<String>) {
        self.send(Notification::JobDismissed {
            job_id: job_id.into(),
        });
    }
}
