//! SMTP command builder.

use crate::types::Address;

/// SMTP command sent during a submission session.
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    /// HELO - Simple greeting
    Helo {
        /// Name announced to the server
        name: String,
    },
    /// AUTH LOGIN - Begin the LOGIN handshake
    AuthLogin,
    /// Base64 answer to an AUTH LOGIN challenge
    AuthResponse(String),
    /// MAIL From - Start mail transaction
    MailFrom {
        /// Sender address
        from: Address,
    },
    /// RCPT To - Add the recipient
    RcptTo {
        /// Recipient address
        to: Address,
    },
    /// DATA - Begin message data
    Data,
    /// QUIT - Close connection
    Quit,
}

impl Command {
    /// Renders the command line, without the line terminator.
    #[must_use]
    pub fn to_line(&self) -> String {
        match self {
            Self::Helo { name } => format!("HELO {name}"),
            Self::AuthLogin => "AUTH LOGIN".to_string(),
            Self::AuthResponse(value) => value.clone(),
            Self::MailFrom { from } => format!("MAIL From:<{from}>"),
            Self::RcptTo { to } => format!("RCPT To:<{to}>"),
            Self::Data => "DATA".to_string(),
            Self::Quit => "QUIT".to_string(),
        }
    }

    /// Returns true if the line carries credential material.
    #[must_use]
    pub const fn is_sensitive(&self) -> bool {
        matches!(self, Self::AuthResponse(_))
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_sensitive() {
            f.write_str("AuthResponse(<redacted>)")
        } else {
            f.write_str(&self.to_line())
        }
    }
}
