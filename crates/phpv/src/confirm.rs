use async_trait::async_trait;

/// Asks the user to approve a destructive or long-running action.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Approves every prompt. For scripted and headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

#[async_trait]
impl Confirm for AutoConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Rejects every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDecline;

#[async_trait]
impl Confirm for AutoDecline {
    async fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
