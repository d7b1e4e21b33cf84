//! `mailsend` - send one email through an SMTP submission server.
//!
//! Prompts for the credentials and the message, then runs a single
//! implicit-TLS session and prints every server reply.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod compose;
mod login;

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use mailsend_smtp::config::{DEFAULT_CLIENT_NAME, DEFAULT_HOST, DEFAULT_PORT};
use mailsend_smtp::{SessionConfig, SessionReport, send_mail};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use compose::{DEFAULT_DOMAINS, MailboxPolicy, compose};

#[derive(Parser, Debug)]
#[command(name = "mailsend")]
#[command(about = "Send one email over SMTP with implicit TLS")]
struct Args {
    /// Submission server hostname
    #[arg(long, env = "MAILSEND_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Submission server port (implicit TLS)
    #[arg(long, env = "MAILSEND_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Name announced with HELO
    #[arg(long, env = "MAILSEND_NAME", default_value = DEFAULT_CLIENT_NAME)]
    name: String,

    /// Login username (prompted if missing)
    #[arg(long, env = "MAILSEND_USERNAME")]
    username: Option<String>,

    /// Login password (prompted if missing)
    #[arg(long, env = "MAILSEND_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Skip AUTH LOGIN entirely
    #[arg(long)]
    no_auth: bool,

    /// Domain accepted for sender and recipient (repeatable)
    #[arg(long = "allow-domain", value_name = "DOMAIN")]
    allow_domains: Vec<String>,

    /// Log the SMTP conversation
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "mailsend=debug,mailsend_smtp=debug"
    } else {
        "mailsend=info,mailsend_smtp=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(args: Args) -> Result<()> {
    let stdin = io::stdin();
    let hide_password = stdin.is_terminal();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let policy = if args.allow_domains.is_empty() {
        MailboxPolicy::new(DEFAULT_DOMAINS)
    } else {
        MailboxPolicy::new(&args.allow_domains)
    };

    let mut builder = SessionConfig::builder(args.host)
        .port(args.port)
        .client_name(args.name);

    if args.no_auth {
        info!("Authentication disabled");
    } else {
        let credentials = login::login(
            &mut input,
            &mut output,
            args.username,
            args.password,
            hide_password,
        )?;
        builder = builder.credentials(credentials);
    }
    let config = builder.build();

    let envelope = compose(&mut input, &mut output, &policy)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    info!("Sending to {} via {}", envelope.recipient(), config.address());
    let with_auth = config.credentials.is_some();

    let outcome = runtime.block_on(send_mail(config, &envelope));
    finish(&mut output, outcome, with_auth)
}

/// Prints what the server said and decides whether the run failed.
///
/// A session that fails after the body was accepted still delivered the
/// message, so only the unclean close is reported.
fn finish<W: Write>(
    output: &mut W,
    outcome: mailsend_smtp::Result<SessionReport>,
    with_auth: bool,
) -> Result<()> {
    let err = match outcome {
        Ok(report) => {
            print_report(output, &report)?;
            if with_auth && !report.authenticated {
                warn!("Message was submitted without authentication");
            }
            return Ok(());
        }
        Err(err) => err,
    };

    match err.report() {
        Some(report) => {
            print_report(output, report)?;
            if report.delivered() {
                warn!("Session did not close cleanly: {err}");
                writeln!(
                    output,
                    "\nMessage was delivered, but the session did not close cleanly: {err}"
                )?;
                return Ok(());
            }
        }
        None => {
            if let Some(status) = err.status() {
                writeln!(output, "\n{status}")?;
            }
        }
    }
    Err(err).context("email was not sent")
}

fn print_report<W: Write>(output: &mut W, report: &SessionReport) -> io::Result<()> {
    for exchange in &report.exchanges {
        writeln!(output, "\n[{}] {}", exchange.step, exchange.status)?;
    }
    output.flush()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mailsend_smtp::parser::parse;
    use mailsend_smtp::{Error, Exchange, Step};

    fn exchanges(replies: &[&str]) -> Vec<Exchange> {
        Step::ALL
            .iter()
            .zip(replies)
            .map(|(step, line)| Exchange {
                step: *step,
                status: parse(line, step.expected()),
            })
            .collect()
    }

    fn aborted(replies: &[&str]) -> mailsend_smtp::Result<SessionReport> {
        let exchanges = exchanges(replies);
        let last = exchanges.last().unwrap();
        let cause = Error::ProtocolViolation {
            step: last.step,
            status: last.status.clone(),
        };
        Err(Error::Aborted {
            report: Box::new(SessionReport {
                exchanges,
                authenticated: true,
            }),
            cause: Box::new(cause),
        })
    }

    const DELIVERED: [&str; 9] = [
        "220 ready",
        "250 hello",
        "334 VXNlcm5hbWU6",
        "334 UGFzc3dvcmQ6",
        "235 Accepted",
        "250 OK",
        "250 OK",
        "354 Go ahead",
        "250 OK queued",
    ];

    #[test]
    fn test_quit_failure_after_delivery_is_not_an_error() {
        let mut replies = DELIVERED.to_vec();
        replies.push("421 closing");
        let mut output = Vec::new();

        finish(&mut output, aborted(&replies), true).unwrap();

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("\n[").count(), 10);
        assert!(printed.contains("[message body] Request was Successful"));
        assert!(printed.contains("Message was delivered, but the session did not close cleanly"));
        assert!(!printed.contains("not sent"));
    }

    #[test]
    fn test_rejected_recipient_prints_transcript() {
        let mut replies = DELIVERED[..6].to_vec();
        replies.push("550 No such user");
        let mut output = Vec::new();

        let err = finish(&mut output, aborted(&replies), true).unwrap_err();

        assert_eq!(err.to_string(), "email was not sent");
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("[greeting] Request was Successful"));
        assert!(printed.contains("[HELO] Request was Successful"));
        assert!(printed.contains("[MAIL FROM] Request was Successful"));
        assert!(printed.contains("[RCPT TO] Request was Unsuccessful. Code: 550."));
        assert!(!printed.contains("delivered"));
    }

    #[test]
    fn test_connection_error_prints_nothing() {
        let refused = Error::Connection {
            addr: "smtp.gmail.com:465".to_string(),
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        };
        let mut output = Vec::new();

        let err = finish(&mut output, Err(refused), false).unwrap_err();

        assert!(format!("{err:#}").starts_with("email was not sent: Connection to smtp.gmail.com:465"));
        assert!(output.is_empty());
    }
}
