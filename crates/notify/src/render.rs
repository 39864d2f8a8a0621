//! Shared text rendering of problem sets.
//!
//! Both channels use [`render_problems`], so the email body and the bytes a
//! command reads on stdin are the same text for the same problems.

use serde::Serialize;

use crate::traits::NotifyError;

/// Pretty-print a problem set as JSON.
///
/// Map keys keep their insertion order. Values JSON cannot represent
/// (for example maps keyed by non-strings) fail with [`NotifyError::Encoding`].
pub fn render_problems<T: Serialize + ?Sized>(problems: &T) -> Result<String, NotifyError> {
    Ok(serde_json::to_string_pretty(problems)?)
}
