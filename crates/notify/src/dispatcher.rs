//! Routes a problem set to the channel named by a [`Destination`].
//!
//! One destination per call: no fan-out, no retries. Errors from the
//! chosen channel propagate unchanged.

use serde::{Deserialize, Serialize};

use crate::notifier::Notifier;
use crate::traits::{CapturedOutput, Mailer, NotifyError};

/// Where a problem set should go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum Destination {
    Email {
        recipients: Vec<String>,
    },
    Command {
        /// Program followed by its arguments, passed through unchanged.
        argv: Vec<String>,
        /// Feed the rendered problem set on stdin.
        #[serde(default)]
        stdin: bool,
    },
}

impl Destination {
    /// Human-readable channel name (`"email"` or `"command"`).
    pub fn channel_name(&self) -> &'static str {
        match self {
            Destination::Email { .. } => "email",
            Destination::Command { .. } => "command",
        }
    }
}

/// What a successful dispatch did.
#[derive(Debug)]
pub enum DispatchOutcome {
    Emailed { recipients: usize },
    Executed(CapturedOutput),
}

impl<M: Mailer> Notifier<M> {
    /// Deliver `problems` to `destination`.
    pub async fn dispatch<T: Serialize + ?Sized>(
        &self,
        destination: &Destination,
        problems: &T,
    ) -> Result<DispatchOutcome, NotifyError> {
        let start = std::time::Instant::now();

        let result = match destination {
            Destination::Email { recipients } => self
                .send_emails(recipients, problems)
                .await
                .map(|()| DispatchOutcome::Emailed {
                    recipients: recipients.len(),
                }),
            Destination::Command { argv, stdin } => self
                .invoke_command(argv, problems, *stdin)
                .await
                .map(DispatchOutcome::Executed),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::info!(
                channel = destination.channel_name(),
                duration_ms,
                "Notification delivered"
            ),
            Err(e) => tracing::warn!(
                channel = destination.channel_name(),
                error = %e,
                duration_ms,
                "dispatch failed"
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_from_json() {
        let email: Destination = serde_json::from_str(
            r#"{"channel": "email", "recipients": ["ops@example.com"]}"#,
        )
        .unwrap();
        assert_eq!(
            email,
            Destination::Email {
                recipients: vec!["ops@example.com".to_string()]
            }
        );
        assert_eq!(email.channel_name(), "email");
    }

    #[test]
    fn command_stdin_defaults_to_false() {
        let command: Destination =
            serde_json::from_str(r#"{"channel": "command", "argv": ["logger", "-t", "alerts"]}"#)
                .unwrap();
        match command {
            Destination::Command { argv, stdin } => {
                assert_eq!(argv, vec!["logger", "-t", "alerts"]);
                assert!(!stdin);
            }
            other => panic!("unexpected destination: {other:?}"),
        }
    }

    #[test]
    fn unknown_channel_rejected() {
        let result: Result<Destination, _> =
            serde_json::from_str(r#"{"channel": "pager", "number": "555"}"#);
        assert!(result.is_err());
    }
}
