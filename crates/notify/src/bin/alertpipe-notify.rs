//! alertpipe-notify — delivers a problem set by email or external command.
//!
//! Reads a JSON array of problem records from a file (or stdin), loads SMTP
//! settings from the environment, and hands the problems to the chosen
//! channel:
//!
//! ```text
//! alertpipe-notify --problems problems.json email --to ops@example.com
//! alertpipe-notify command --stdin -- /usr/local/bin/page-oncall --team db
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use alertpipe_core::config::{load_dotenv, Config};
use alertpipe_core::ProblemSet;
use alertpipe_notify::{Destination, DispatchOutcome, Notifier};

// ── CLI ─────────────────────────────────────────────────────────────

/// Deliver detected problems to operators by email or external command.
#[derive(Parser, Debug)]
#[command(name = "alertpipe-notify", version, about)]
struct Cli {
    /// JSON array of problem records; `-` reads standard input.
    #[arg(long, short = 'p', env = "ALERTPIPE_PROBLEMS", default_value = "-")]
    problems: String,

    #[command(subcommand)]
    channel: Channel,
}

#[derive(Subcommand, Debug)]
enum Channel {
    /// Email the problems to one or more recipients.
    Email {
        /// Recipient address (repeatable).
        #[arg(long = "to", required = true)]
        to: Vec<String>,
    },
    /// Run a command, optionally feeding the problems on its stdin.
    Command {
        /// Write the rendered problems to the command's standard input.
        #[arg(long)]
        stdin: bool,

        /// Program and arguments, passed through unchanged.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        argv: Vec<String>,
    },
}

impl From<Channel> for Destination {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Email { to } => Destination::Email { recipients: to },
            Channel::Command { stdin, argv } => Destination::Command { argv, stdin },
        }
    }
}

fn read_problems(source: &str) -> Result<ProblemSet> {
    let problems = if source == "-" {
        ProblemSet::from_reader(std::io::stdin().lock())
            .context("failed to read problems from stdin")?
    } else {
        ProblemSet::from_file(Path::new(source))
            .with_context(|| format!("failed to read problems from {source}"))?
    };
    Ok(problems)
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let problems = read_problems(&cli.problems)?;
    info!(count = problems.len(), "loaded problems");

    let destination = Destination::from(cli.channel);
    let notifier = Notifier::new(config.email);

    match notifier
        .dispatch(&destination, &problems)
        .await
        .with_context(|| format!("{} delivery failed", destination.channel_name()))?
    {
        DispatchOutcome::Emailed { recipients } => {
            info!(recipients, "email sent");
        }
        DispatchOutcome::Executed(output) => {
            print!("{}", output.text);
        }
    }

    Ok(())
}
