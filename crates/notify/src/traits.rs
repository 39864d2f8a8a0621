//! Mailer trait definition and shared error types.

use std::process::ExitStatus;

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Problem set could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("SMTP delivery failed: {0}")]
    Delivery(String),

    #[error("Command could not be launched: {0}")]
    Launch(std::io::Error),

    #[error("Command pipe failed: {0}")]
    Pipe(std::io::Error),

    #[error("Command output is not valid UTF-8: {0}")]
    Decoding(#[from] std::string::FromUtf8Error),

    #[error("Invalid email address: {0}")]
    Address(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// TLS from the first byte (SMTPS, usually port 465).
    ImplicitTls,
    /// Plaintext connection, upgraded with STARTTLS when the server offers it.
    Plain,
}

/// Username/password pair for SMTP AUTH.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpAuth {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything a [`Mailer`] needs to open and authenticate one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub mode: TransportMode,
    /// `None` skips AUTH entirely.
    pub auth: Option<SmtpAuth>,
}

/// One SMTP transaction: connect, optionally authenticate, send, close.
///
/// The connection must be closed before `send` returns, whether the
/// transaction succeeded or not.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        settings: &SmtpSettings,
        message: lettre::Message,
    ) -> Result<(), NotifyError>;
}

/// Merged stdout/stderr of a finished command.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub text: String,
    /// Reported for the caller's information; never treated as failure.
    pub status: ExitStatus,
}

impl CapturedOutput {
    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }
}
