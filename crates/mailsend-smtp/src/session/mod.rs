//! The submission state machine.
//!
//! A [`Session`] walks one connection through
//! `greeting → HELO → AUTH LOGIN → MAIL/RCPT/DATA → QUIT`, validating every
//! reply against the code its [`Step`] expects. Each exchange is one line
//! out, one line back; nothing is pipelined.
//!
//! Only the AUTH LOGIN handshake is allowed to fail softly: a rejected
//! credential is logged and the session carries on unauthenticated. Every
//! other rejection ends the session with [`Error::ProtocolViolation`].
//!
//! [`Session::run`] and [`send_mail`] close the socket exactly once on every
//! exit path. A session that stops early is returned as [`Error::Aborted`],
//! which still carries the replies received up to the failure.

mod step;

pub use step::{Phase, Step};

use crate::command::Command;
use crate::config::SessionConfig;
use crate::connection::{TlsTransport, Transport};
use crate::error::{Error, Result};
use crate::parser::parse;
use crate::types::{Address, Credentials, Envelope, Status};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, warn};

/// One validated exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Step the reply answered.
    pub step: Step,
    /// Parsed reply.
    pub status: Status,
}

/// What a session did, up to where it stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Every reply received, in order.
    pub exchanges: Vec<Exchange>,
    /// Whether AUTH LOGIN succeeded.
    pub authenticated: bool,
}

impl SessionReport {
    /// Returns true if the server accepted the message body, even if the
    /// session failed afterwards.
    #[must_use]
    pub fn delivered(&self) -> bool {
        self.exchanges
            .iter()
            .any(|e| e.step == Step::Body && e.status.is_success())
    }
}

/// Sends one message: connects to the configured host, runs the whole
/// exchange, and releases the socket.
///
/// # Errors
///
/// Returns [`Error::Connection`] if the server cannot be reached, or
/// [`Error::Aborted`] wrapping the first failure once the socket has been
/// closed.
pub async fn send_mail(config: SessionConfig, envelope: &Envelope) -> Result<SessionReport> {
    let transport = TlsTransport::connect(&config.host, config.port).await?;
    Session::new(transport, config).run(envelope).await
}

/// SMTP submission session over an owned transport.
#[derive(Debug)]
pub struct Session<S> {
    transport: Transport<S>,
    config: SessionConfig,
    phase: Phase,
    authenticated: bool,
    auth_attempted: bool,
    last_step: Option<Step>,
    exchanges: Vec<Exchange>,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a session on a freshly opened transport.
    ///
    /// No data is exchanged until [`read_greeting`](Self::read_greeting).
    pub const fn new(transport: Transport<S>, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            phase: Phase::Connecting,
            authenticated: false,
            auth_attempted: false,
            last_step: None,
            exchanges: Vec::new(),
        }
    }

    /// Returns the current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns true once AUTH LOGIN has succeeded.
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Returns the exchanges so far.
    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Runs the full sequence for `envelope`, then closes the transport
    /// whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Aborted`] with the exchanges so far and the first
    /// failing step's error, once teardown has run.
    pub async fn run(mut self, envelope: &Envelope) -> Result<SessionReport> {
        let outcome = self.drive(envelope).await;

        if let Err(err) = &outcome {
            if err.is_protocol_violation() {
                error!("Session aborted: {err}");
            } else {
                error!(phase = ?self.phase, "Session failed: {err:?}");
            }
        }

        let report = self.close().await;
        match outcome {
            Ok(()) => Ok(report),
            Err(err) => Err(Error::Aborted {
                report: Box::new(report),
                cause: Box::new(err),
            }),
        }
    }

    async fn drive(&mut self, envelope: &Envelope) -> Result<()> {
        self.read_greeting().await?;
        self.helo().await?;
        self.authenticate().await?;
        self.send_envelope(envelope).await?;
        self.quit().await?;
        Ok(())
    }

    /// Reads and validates the server greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the greeting is not 220.
    pub async fn read_greeting(&mut self) -> Result<Status> {
        self.require(
            self.phase == Phase::Connecting && self.last_step.is_none(),
            Step::Greeting,
        )?;
        self.expect(Step::Greeting).await
    }

    /// Sends `HELO` with the configured client name.
    ///
    /// # Errors
    ///
    /// Returns an error if the server does not reply 250.
    pub async fn helo(&mut self) -> Result<Status> {
        self.require(self.last_step == Some(Step::Greeting), Step::Helo)?;
        let cmd = Command::Helo {
            name: self.config.client_name.clone(),
        };
        let status = self.exchange(&cmd, Step::Helo).await?;
        self.phase = Phase::Greeted;
        Ok(status)
    }

    /// Runs the AUTH LOGIN handshake if credentials are configured.
    ///
    /// Returns `Ok(true)` if the server accepted the credentials. Without
    /// credentials nothing is sent and the session moves straight on to
    /// the envelope. A rejected handshake is logged and returns
    /// `Ok(false)`, leaving the session unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns I/O errors; rejections by the server are not errors here.
    pub async fn authenticate(&mut self) -> Result<bool> {
        self.require(
            self.phase == Phase::Greeted && !self.auth_attempted,
            Step::AuthLogin,
        )?;
        self.auth_attempted = true;

        let Some(credentials) = self.config.credentials.clone() else {
            info!("Authentication was not configured");
            self.phase = Phase::Authenticated;
            return Ok(false);
        };

        match self.login(&credentials).await {
            Ok(_) => {
                info!("Authenticated");
                self.authenticated = true;
                self.phase = Phase::Authenticated;
                Ok(true)
            }
            Err(err @ Error::ProtocolViolation { .. }) => {
                warn!("Authentication aborted, continuing unauthenticated: {err}");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    async fn login(&mut self, credentials: &Credentials) -> Result<Status> {
        self.exchange(&Command::AuthLogin, Step::AuthLogin).await?;
        let username = Command::AuthResponse(credentials.username().to_string());
        self.exchange(&username, Step::AuthUsername).await?;
        let password = Command::AuthResponse(credentials.password().to_string());
        self.exchange(&password, Step::AuthPassword).await
    }

    /// Sends the complete mail transaction for `envelope`.
    ///
    /// # Errors
    ///
    /// Returns an error at the first step the server rejects.
    pub async fn send_envelope(&mut self, envelope: &Envelope) -> Result<()> {
        self.mail_from(envelope.sender()).await?;
        self.rcpt_to(envelope.recipient()).await?;
        self.data().await?;
        self.send_body(&envelope.wire_payload()).await?;
        Ok(())
    }

    /// Sends `MAIL From:<sender>`.
    ///
    /// [`authenticate`](Self::authenticate) must have run first, whether or
    /// not it succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the server does not reply 250.
    pub async fn mail_from(&mut self, sender: &Address) -> Result<Status> {
        self.require(
            self.auth_attempted
                && matches!(self.phase, Phase::Greeted | Phase::Authenticated),
            Step::MailFrom,
        )?;
        let cmd = Command::MailFrom {
            from: sender.clone(),
        };
        let status = self.exchange(&cmd, Step::MailFrom).await?;
        self.phase = Phase::Sending;
        Ok(status)
    }

    /// Sends `RCPT To:<recipient>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server does not reply 250.
    pub async fn rcpt_to(&mut self, recipient: &Address) -> Result<Status> {
        self.require(self.last_step == Some(Step::MailFrom), Step::RcptTo)?;
        let cmd = Command::RcptTo {
            to: recipient.clone(),
        };
        self.exchange(&cmd, Step::RcptTo).await
    }

    /// Sends `DATA`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server does not reply 354.
    pub async fn data(&mut self) -> Result<Status> {
        self.require(self.last_step == Some(Step::RcptTo), Step::Data)?;
        self.exchange(&Command::Data, Step::Data).await
    }

    /// Sends the message payload as-is.
    ///
    /// `payload` must already be CRLF-framed and end with the `.` line,
    /// as produced by [`Envelope::wire_payload`].
    ///
    /// # Errors
    ///
    /// Returns an error if the server does not reply 250.
    pub async fn send_body(&mut self, payload: &str) -> Result<Status> {
        self.require(self.last_step == Some(Step::Data), Step::Body)?;
        debug!(bytes = payload.len(), ">> <message body>");
        self.transport.send_line(payload).await?;
        self.expect(Step::Body).await
    }

    /// Sends `QUIT`. The session is closed afterwards even if the server
    /// answers with something other than 221.
    ///
    /// # Errors
    ///
    /// Returns an error if the server does not reply 221.
    pub async fn quit(&mut self) -> Result<Status> {
        self.require(self.phase != Phase::Closed, Step::Quit)?;
        self.phase = Phase::Closed;
        self.exchange(&Command::Quit, Step::Quit).await
    }

    /// Shuts down and releases the socket.
    ///
    /// A failed shutdown is logged; the socket is released regardless.
    pub async fn close(self) -> SessionReport {
        if let Err(err) = self.transport.close().await {
            warn!("Socket shutdown failed: {err}");
        }
        debug!("Connection closed");

        SessionReport {
            exchanges: self.exchanges,
            authenticated: self.authenticated,
        }
    }

    fn require(&self, allowed: bool, step: Step) -> Result<()> {
        if allowed {
            Ok(())
        } else {
            Err(Error::InvalidState(format!(
                "{step} not allowed in phase {:?}",
                self.phase
            )))
        }
    }

    async fn exchange(&mut self, cmd: &Command, step: Step) -> Result<Status> {
        debug!(">> {cmd:?}");
        self.transport.send_line(&cmd.to_line()).await?;
        self.expect(step).await
    }

    async fn expect(&mut self, step: Step) -> Result<Status> {
        let line = self.transport.recv_line().await?;
        debug!("<< {line}");

        let status = parse(&line, step.expected());
        info!(
            %step,
            code = status.numeric_code(),
            success = status.is_success(),
            "{}",
            status.message().trim()
        );
        self.exchanges.push(Exchange {
            step,
            status: status.clone(),
        });

        if status.is_success() {
            self.last_step = Some(step);
            Ok(status)
        } else {
            Err(Error::ProtocolViolation { step, status })
        }
    }
}
