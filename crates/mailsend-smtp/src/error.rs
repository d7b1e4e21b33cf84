//! Error types for SMTP operations.

use std::io;

use crate::session::{SessionReport, Step};
use crate::types::Status;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// TCP connect or TLS handshake failed; the session never started.
    #[error("Connection to {addr} failed: {source}")]
    Connection {
        /// `host:port` that was dialled.
        addr: String,
        /// Underlying socket or handshake error.
        #[source]
        source: io::Error,
    },

    /// Host cannot be used as a TLS server name.
    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),

    /// Server replied with a code other than the one the step expects.
    #[error(
        "{step} expected {expected}, server replied {code}:{message}",
        expected = .step.expected(),
        code = .status.numeric_code(),
        message = .status.message()
    )]
    ProtocolViolation {
        /// Exchange that failed.
        step: Step,
        /// Status parsed from the reply.
        status: Status,
    },

    /// I/O error during the session.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Invalid state for operation.
    #[error("Invalid state for operation: {0}")]
    InvalidState(String),

    /// Session stopped early; the socket has been closed.
    #[error("{cause}")]
    Aborted {
        /// Exchanges completed before the failure, including the failing one.
        report: Box<SessionReport>,
        /// Error that stopped the session.
        cause: Box<Error>,
    },
}

impl Error {
    /// Returns the error that stopped an aborted session, or `self`.
    #[must_use]
    pub fn cause(&self) -> &Self {
        match self {
            Self::Aborted { cause, .. } => cause.cause(),
            other => other,
        }
    }

    /// Returns the exchanges of an aborted session.
    #[must_use]
    pub fn report(&self) -> Option<&SessionReport> {
        match self {
            Self::Aborted { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Returns the step the server rejected, if any.
    #[must_use]
    pub fn step(&self) -> Option<Step> {
        match self.cause() {
            Self::ProtocolViolation { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Returns the failing status if this is a protocol violation.
    #[must_use]
    pub fn status(&self) -> Option<&Status> {
        match self.cause() {
            Self::ProtocolViolation { status, .. } => Some(status),
            _ => None,
        }
    }

    /// Returns true if the server rejected a step.
    #[must_use]
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self.cause(), Self::ProtocolViolation { .. })
    }

    /// Returns true if this is a permanent rejection (5xx).
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.status()
            .and_then(Status::code)
            .is_some_and(|code| code.is_permanent())
    }

    /// Returns true if this is a transient rejection (4xx).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.status()
            .and_then(Status::code)
            .is_some_and(|code| code.is_transient())
    }
}
