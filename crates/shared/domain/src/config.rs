use serde::Deserialize;
use std::time::Duration;

const DEFAULT_EMAIL_DEBOUNCE_MS: u64 = 1000;

/// Tunables of the form controller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Quiescence window for the email-message recomputation: the message
    /// is refreshed only after the email field has been stable this long.
    pub email_debounce_ms: u64,
}

impl FormConfig {
    #[must_use]
    pub const fn email_debounce(&self) -> Duration {
        Duration::from_millis(self.email_debounce_ms)
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self { email_debounce_ms: DEFAULT_EMAIL_DEBOUNCE_MS }
    }
}
