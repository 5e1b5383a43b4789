//! Notification sinks.

use std::time::Duration;

use thiserror::Error;

/// Errors from report delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notification rejected with HTTP {status}")]
    Rejected { status: u16 },
}

/// Sink accepting a rendered report.
pub trait Notifier {
    fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Discord-compatible webhook sink.
///
/// POSTs `{"content": text}`. Any non-success status is an error: delivery
/// failures must be visible to the scheduler, not swallowed.
pub struct DiscordWebhook {
    client: reqwest::blocking::Client,
    url: String,
}

impl DiscordWebhook {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            url: url.into(),
        }
    }
}

impl Notifier for DiscordWebhook {
    fn send(&self, text: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "content": text }))
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Prints the payload instead of delivering it. Used by `--dry-run` and
/// when no webhook is configured.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn send(&self, text: &str) -> Result<(), NotifyError> {
        println!("{text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdout_notifier_always_succeeds() {
        assert!(StdoutNotifier.send("report body").is_ok());
    }

    #[test]
    fn rejected_error_carries_status() {
        let err = NotifyError::Rejected { status: 404 };
        assert_eq!(err.to_string(), "notification rejected with HTTP 404");
    }
}
