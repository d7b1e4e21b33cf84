//! Session phases and the exchanges that move between them.

use crate::types::ReplyCode;
use std::fmt;

/// Protocol phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Socket open, greeting pending or read.
    Connecting,
    /// `HELO` accepted.
    Greeted,
    /// Authenticated, or authentication not configured.
    Authenticated,
    /// Mail transaction in progress.
    Sending,
    /// `QUIT` exchanged or socket released.
    Closed,
}

/// One exchange of the submission sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Server greeting read right after connecting.
    Greeting,
    /// `HELO <name>`.
    Helo,
    /// `AUTH LOGIN`.
    AuthLogin,
    /// Base64 username.
    AuthUsername,
    /// Base64 password.
    AuthPassword,
    /// `MAIL From:<sender>`.
    MailFrom,
    /// `RCPT To:<recipient>`.
    RcptTo,
    /// `DATA`.
    Data,
    /// Message payload ending in the `.` line.
    Body,
    /// `QUIT`.
    Quit,
}

impl Step {
    /// All steps in wire order.
    pub const ALL: [Self; 10] = [
        Self::Greeting,
        Self::Helo,
        Self::AuthLogin,
        Self::AuthUsername,
        Self::AuthPassword,
        Self::MailFrom,
        Self::RcptTo,
        Self::Data,
        Self::Body,
        Self::Quit,
    ];

    /// Reply code that counts as success for this step.
    #[must_use]
    pub const fn expected(self) -> ReplyCode {
        match self {
            Self::Greeting => ReplyCode::SERVICE_READY,
            Self::Helo | Self::MailFrom | Self::RcptTo | Self::Body => ReplyCode::OK,
            Self::AuthLogin | Self::AuthUsername => ReplyCode::AUTH_CONTINUE,
            Self::AuthPassword => ReplyCode::AUTH_SUCCEEDED,
            Self::Data => ReplyCode::START_DATA,
            Self::Quit => ReplyCode::CLOSING,
        }
    }

    /// Returns true for the steps of the AUTH LOGIN handshake.
    #[must_use]
    pub const fn is_auth(self) -> bool {
        matches!(self, Self::AuthLogin | Self::AuthUsername | Self::AuthPassword)
    }

    /// Short name used in logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Helo => "HELO",
            Self::AuthLogin => "AUTH LOGIN",
            Self::AuthUsername => "AUTH username",
            Self::AuthPassword => "AUTH password",
            Self::MailFrom => "MAIL FROM",
            Self::RcptTo => "RCPT TO",
            Self::Data => "DATA",
            Self::Body => "message body",
            Self::Quit => "QUIT",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_codes_follow_wire_order() {
        let codes: Vec<u16> = Step::ALL.iter().map(|s| s.expected().as_u16()).collect();
        assert_eq!(codes, [220, 250, 334, 334, 235, 250, 250, 354, 250, 221]);
    }

    #[test]
    fn test_auth_steps() {
        let auth: Vec<Step> = Step::ALL.into_iter().filter(|s| s.is_auth()).collect();
        assert_eq!(auth, [Step::AuthLogin, Step::AuthUsername, Step::AuthPassword]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Step::RcptTo.to_string(), "RCPT TO");
        assert_eq!(Step::Body.to_string(), "message body");
    }
}
