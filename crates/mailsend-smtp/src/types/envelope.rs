//! Outgoing message envelope.

use super::Address;
use std::fmt::Write;

/// One outgoing message: sender, recipient, subject and plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    sender: Address,
    recipient: Address,
    subject: String,
    body: String,
}

impl Envelope {
    /// Creates a new envelope.
    #[must_use]
    pub fn new(
        sender: Address,
        recipient: Address,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            recipient,
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Returns the sender address.
    #[must_use]
    pub const fn sender(&self) -> &Address {
        &self.sender
    }

    /// Returns the recipient address.
    #[must_use]
    pub const fn recipient(&self) -> &Address {
        &self.recipient
    }

    /// Returns the subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the message body as supplied.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Builds the DATA payload: `From`/`To`/`Subject` headers, a blank
    /// line, the body, and the terminating `.` line, all CRLF-framed.
    ///
    /// Body lines starting with `.` are dot-stuffed so that only the
    /// final line ends the message.
    #[must_use]
    pub fn wire_payload(&self) -> String {
        let mut payload = String::new();

        // Header values must stay on one line
        let subject = self.subject.replace(['\r', '\n'], " ");

        let _ = write!(payload, "From: {}\r\n", self.sender);
        let _ = write!(payload, "To: {}\r\n", self.recipient);
        let _ = write!(payload, "Subject: {subject}\r\n");
        payload.push_str("\r\n");

        for line in self.body.lines() {
            if line.starts_with('.') {
                payload.push('.');
            }
            payload.push_str(line);
            payload.push_str("\r\n");
        }

        payload.push_str(".\r\n");
        payload
    }
}
