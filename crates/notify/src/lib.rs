//! Alert delivery for detected problems.
//!
//! This crate provides:
//! - `render_problems`, the pretty JSON text shared by every channel
//! - `Notifier::send_emails`, SMTP delivery via `lettre`
//! - `Notifier::invoke_command`, external commands with merged output capture
//! - `Notifier::dispatch`, routing to a `Destination`

pub mod command;
pub mod dispatcher;
pub mod email;
pub mod notifier;
pub mod render;
pub mod traits;

pub use dispatcher::{Destination, DispatchOutcome};
pub use email::SmtpMailer;
pub use notifier::Notifier;
pub use render::render_problems;
pub use traits::{CapturedOutput, Mailer, NotifyError, SmtpAuth, SmtpSettings, TransportMode};
