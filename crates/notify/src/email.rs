//! SMTP email delivery via `lettre`.
//!
//! Translates [`EmailConfig`] into connection settings, builds the
//! plain-text alert message, and runs one SMTP transaction per call.
//!
//! The `ssl` flag selects implicit TLS when true and a plaintext connection
//! with opportunistic STARTTLS when false.

use alertpipe_core::EmailConfig;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::traits::{Mailer, NotifyError, SmtpAuth, SmtpSettings, TransportMode};

impl TransportMode {
    /// Map the configured `ssl` flag to a connection class.
    pub fn from_ssl_flag(ssl: bool) -> Self {
        if ssl {
            TransportMode::ImplicitTls
        } else {
            TransportMode::Plain
        }
    }
}

impl SmtpSettings {
    /// Derive connection settings. AUTH is requested only when a non-empty
    /// username is configured; a missing password is sent as empty.
    pub fn from_config(config: &EmailConfig) -> Self {
        let auth = config
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(|username| SmtpAuth {
                username: username.to_string(),
                password: config.password.clone().unwrap_or_default(),
            });

        Self {
            host: config.smtp_hostname.clone(),
            port: config.smtp_port,
            mode: TransportMode::from_ssl_flag(config.ssl),
            auth,
        }
    }
}

fn parse_mailbox(addr: &str) -> Result<Mailbox, NotifyError> {
    addr.parse()
        .map_err(|e: lettre::address::AddressError| NotifyError::Address(format!("{addr}: {e}")))
}

/// Build the single-part plain-text alert message.
///
/// Subject and From come from configuration; every recipient lands in one
/// comma-separated `To` header and in the envelope.
pub fn build_message(
    config: &EmailConfig,
    recipients: &[String],
    body: String,
) -> Result<Message, NotifyError> {
    if recipients.is_empty() {
        return Err(NotifyError::Config(
            "at least one recipient is required".to_string(),
        ));
    }

    let mut builder = Message::builder()
        .from(parse_mailbox(&config.from_email)?)
        .subject(config.subject.as_str())
        .header(ContentType::TEXT_PLAIN);

    for recipient in recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    builder
        .body(body)
        .map_err(|e| NotifyError::Config(e.to_string()))
}

/// [`Mailer`] backed by a non-pooled `lettre` transport: each send opens its
/// own connection, sends QUIT on success and drops the socket on failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpMailer;

impl SmtpMailer {
    fn transport(
        settings: &SmtpSettings,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let tls_parameters = TlsParameters::new(settings.host.clone())
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let tls = match settings.mode {
            TransportMode::ImplicitTls => Tls::Wrapper(tls_parameters),
            TransportMode::Plain => Tls::Opportunistic(tls_parameters),
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            .port(settings.port)
            .tls(tls);

        if let Some(auth) = &settings.auth {
            builder = builder.credentials(Credentials::new(
                auth.username.clone(),
                auth.password.clone(),
            ));
        }

        Ok(builder.build())
    }
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, settings: &SmtpSettings, message: Message) -> Result<(), NotifyError> {
        let transport = Self::transport(settings)?;

        transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        tracing::info!(
            channel = "email",
            host = %settings.host,
            port = settings.port,
            "notification delivered"
        );

        Ok(())
    }
}
