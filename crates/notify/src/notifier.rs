//! The two delivery operations.

use alertpipe_core::EmailConfig;
use serde::Serialize;

use crate::command::run_command;
use crate::email::{build_message, SmtpMailer};
use crate::render::render_problems;
use crate::traits::{CapturedOutput, Mailer, NotifyError, SmtpSettings};

/// Delivers problem sets by email or through an external command.
///
/// Holds no state between calls besides the email configuration it was
/// built with; every call opens and releases its own connection or child.
pub struct Notifier<M = SmtpMailer> {
    config: EmailConfig,
    mailer: M,
}

impl Notifier<SmtpMailer> {
    pub fn new(config: EmailConfig) -> Self {
        Self::with_mailer(config, SmtpMailer)
    }
}

impl<M: Mailer> Notifier<M> {
    /// Build a notifier over a custom [`Mailer`].
    pub fn with_mailer(config: EmailConfig, mailer: M) -> Self {
        Self { config, mailer }
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Email the rendered problem set to every recipient in one message.
    ///
    /// An empty recipient list is rejected before any connection is made.
    /// SMTP failures surface as [`NotifyError::Delivery`] and are not retried.
    pub async fn send_emails<T: Serialize + ?Sized>(
        &self,
        recipients: &[String],
        problems: &T,
    ) -> Result<(), NotifyError> {
        tracing::info!(recipients = %recipients.join(", "), "notifying by email");

        let body = render_problems(problems)?;
        let message = build_message(&self.config, recipients, body)?;
        let settings = SmtpSettings::from_config(&self.config);

        self.mailer.send(&settings, message).await
    }

    /// Run `argv`, optionally feeding the rendered problem set on stdin,
    /// and return the merged stdout/stderr once the child exits.
    ///
    /// A nonzero exit status is reported in the result, not as an error.
    pub async fn invoke_command<T: Serialize + ?Sized>(
        &self,
        argv: &[String],
        problems: &T,
        stdin: bool,
    ) -> Result<CapturedOutput, NotifyError> {
        tracing::info!(command = %argv.join(" "), stdin, "invoking command");

        let payload = if stdin {
            Some(render_problems(problems)?)
        } else {
            None
        };

        let output = run_command(argv, payload.as_deref().map(str::as_bytes)).await?;

        tracing::info!(
            command = %argv.join(" "),
            exit_code = ?output.exit_code(),
            output = %output.text,
            "command finished"
        );

        Ok(output)
    }
}
