use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Key lookup used by the profiled readers; `env_opt` in production.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Read a profiled key: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt(lookup: Lookup<'_>, profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = lookup(&prefixed).filter(|s| !s.is_empty()) {
            return Some(v);
        }
    }
    lookup(key).filter(|s| !s.is_empty())
}

fn profiled_or(lookup: Lookup<'_>, profile: &str, key: &str, default: &str) -> String {
    profiled_opt(lookup, profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_u16(lookup: Lookup<'_>, profile: &str, key: &str, default: u16) -> u16 {
    profiled_opt(lookup, profile, key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn profiled_bool(lookup: Lookup<'_>, profile: &str, key: &str, default: bool) -> bool {
    match profiled_opt(lookup, profile, key) {
        Some(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub email: EmailConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `ALERTPIPE_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_opt("ALERTPIPE_PROFILE").unwrap_or_default();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        Self::from_lookup(profile, &env_opt)
    }

    /// Build config from an arbitrary key source instead of the process environment.
    pub fn from_lookup(profile: &str, lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let p = profile.to_uppercase();
        Self {
            email: EmailConfig::from_lookup(&p, lookup),
            profile: p,
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  smtp:   host={}, port={}, ssl={}, auth={}",
            self.email.smtp_hostname,
            self.email.smtp_port,
            self.email.ssl,
            self.email.has_credentials()
        );
        tracing::info!(
            "  email:  from={}, subject={:?}",
            self.email.from_email,
            self.email.subject
        );
    }
}

// ── Email ─────────────────────────────────────────────────────

/// SMTP parameters for the email channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailConfig {
    pub subject: String,
    pub from_email: String,
    /// Implicit TLS when true, plaintext with opportunistic STARTTLS when false.
    pub ssl: bool,
    pub smtp_hostname: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self::from_lookup("", &|_| None)
    }
}

impl EmailConfig {
    fn from_lookup(p: &str, lookup: Lookup<'_>) -> Self {
        Self {
            subject: profiled_or(lookup, p, "ALERT_SUBJECT", "Monitoring alert"),
            from_email: profiled_or(lookup, p, "ALERT_FROM_EMAIL", "alerts@localhost"),
            ssl: profiled_bool(lookup, p, "SMTP_SSL", false),
            smtp_hostname: profiled_or(lookup, p, "SMTP_HOSTNAME", "localhost"),
            smtp_port: profiled_u16(lookup, p, "SMTP_PORT", 25),
            username: profiled_opt(lookup, p, "SMTP_USERNAME"),
            password: profiled_opt(lookup, p, "SMTP_PASSWORD"),
        }
    }

    /// True when a non-empty username is configured.
    pub fn has_credentials(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup("", &|_| None);
        assert_eq!(config.profile_label(), "default");
        assert_eq!(config.email.smtp_hostname, "localhost");
        assert_eq!(config.email.smtp_port, 25);
        assert!(!config.email.ssl);
        assert!(config.email.username.is_none());
        assert!(!config.email.has_credentials());
        assert_eq!(config.email, EmailConfig::default());
    }

    #[test]
    fn reads_all_email_keys() {
        let lookup = lookup_from(&[
            ("ALERT_SUBJECT", "Disk alarm"),
            ("ALERT_FROM_EMAIL", "monitor@example.com"),
            ("SMTP_SSL", "true"),
            ("SMTP_HOSTNAME", "smtp.example.com"),
            ("SMTP_PORT", "465"),
            ("SMTP_USERNAME", "monitor"),
            ("SMTP_PASSWORD", "hunter2"),
        ]);
        let email = Config::from_lookup("", &lookup).email;
        assert_eq!(email.subject, "Disk alarm");
        assert_eq!(email.from_email, "monitor@example.com");
        assert!(email.ssl);
        assert_eq!(email.smtp_hostname, "smtp.example.com");
        assert_eq!(email.smtp_port, 465);
        assert_eq!(email.username.as_deref(), Some("monitor"));
        assert_eq!(email.password.as_deref(), Some("hunter2"));
        assert!(email.has_credentials());
    }

    #[test]
    fn profile_prefix_wins_over_plain_key() {
        let lookup = lookup_from(&[
            ("SMTP_HOSTNAME", "smtp.dev.local"),
            ("PROD_SMTP_HOSTNAME", "smtp.prod.example.com"),
            ("SMTP_PORT", "2525"),
        ]);
        let config = Config::from_lookup("prod", &lookup);
        assert_eq!(config.profile_label(), "PROD");
        assert_eq!(config.email.smtp_hostname, "smtp.prod.example.com");
        // Falls back to the unprefixed key.
        assert_eq!(config.email.smtp_port, 2525);
    }

    #[test]
    fn empty_username_means_no_credentials() {
        let lookup = lookup_from(&[("SMTP_USERNAME", ""), ("SMTP_PASSWORD", "x")]);
        let email = Config::from_lookup("", &lookup).email;
        assert!(email.username.is_none());
        assert!(!email.has_credentials());
    }

    #[test]
    fn unparseable_port_and_flag_fall_back() {
        let lookup = lookup_from(&[("SMTP_PORT", "not-a-port"), ("SMTP_SSL", "maybe")]);
        let email = Config::from_lookup("", &lookup).email;
        assert_eq!(email.smtp_port, 25);
        assert!(!email.ssl);
    }
}
