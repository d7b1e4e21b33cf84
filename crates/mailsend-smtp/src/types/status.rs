//! SMTP reply status types.

use std::fmt;

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// Creates a new reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true if this is a success code (2xx).
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is an intermediate reply (3xx).
    #[must_use]
    pub const fn is_intermediate(self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Returns true if this is a transient error (4xx).
    #[must_use]
    pub const fn is_transient(self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Returns true if this is a permanent error (5xx).
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        self.0 >= 500 && self.0 < 600
    }
}

impl fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Codes used by the submission session
impl ReplyCode {
    /// 220 Service ready
    pub const SERVICE_READY: Self = Self(220);
    /// 221 Service closing transmission channel
    pub const CLOSING: Self = Self(221);
    /// 235 Authentication succeeded
    pub const AUTH_SUCCEEDED: Self = Self(235);
    /// 250 Requested mail action okay, completed
    pub const OK: Self = Self(250);
    /// 334 Continue with authentication
    pub const AUTH_CONTINUE: Self = Self(334);
    /// 354 Start mail input
    pub const START_DATA: Self = Self(354);
    /// 535 Authentication credentials invalid
    pub const AUTH_FAILED: Self = Self(535);
    /// 550 Mailbox unavailable (not found, access denied)
    pub const MAILBOX_UNAVAILABLE: Self = Self(550);
}

/// Outcome of one exchange: the reply code, the text after it, and whether
/// the code matched what the exchange expected.
///
/// A reply whose first three characters are not digits has no code
/// (`code == None`) and is never successful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: Option<ReplyCode>,
    message: String,
    success: bool,
}

impl Status {
    /// Numeric value shown for a reply without a valid code.
    pub const INVALID_CODE: i32 = -1;

    /// Builds a status, deriving `success` from the expected code.
    #[must_use]
    pub fn new(code: Option<ReplyCode>, message: impl Into<String>, expected: ReplyCode) -> Self {
        Self {
            code,
            message: message.into(),
            success: code == Some(expected),
        }
    }

    /// Returns the reply code, or `None` if the reply was malformed.
    #[must_use]
    pub const fn code(&self) -> Option<ReplyCode> {
        self.code
    }

    /// Returns the reply code as an integer, `-1` for malformed replies.
    #[must_use]
    pub fn numeric_code(&self) -> i32 {
        self.code
            .map_or(Self::INVALID_CODE, |code| i32::from(code.as_u16()))
    }

    /// Returns the reply text following the code, verbatim.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if the reply carried the expected code.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Returns true if the reply had no parseable code.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        self.code.is_none()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.success {
            "Successful"
        } else {
            "Unsuccessful"
        };
        write!(
            f,
            "Request was {outcome}. Code: {}.\nReturned with message:\n{}",
            self.numeric_code(),
            self.message
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod reply_code_tests {
        use super::*;

        #[test]
        fn classes() {
            assert!(ReplyCode::OK.is_success());
            assert!(ReplyCode::CLOSING.is_success());
            assert!(ReplyCode::AUTH_CONTINUE.is_intermediate());
            assert!(ReplyCode::START_DATA.is_intermediate());
            assert!(ReplyCode::new(421).is_transient());
            assert!(ReplyCode::MAILBOX_UNAVAILABLE.is_permanent());
            assert!(ReplyCode::AUTH_FAILED.is_permanent());
        }

        #[test]
        fn display() {
            assert_eq!(ReplyCode::OK.to_string(), "250");
            assert_eq!(ReplyCode::AUTH_SUCCEEDED.to_string(), "235");
        }
    }

    mod status_tests {
        use super::*;

        #[test]
        fn success_when_code_matches() {
            let status = Status::new(Some(ReplyCode::OK), " OK", ReplyCode::OK);
            assert!(status.is_success());
            assert!(!status.is_malformed());
            assert_eq!(status.numeric_code(), 250);
        }

        #[test]
        fn failure_when_code_differs() {
            let status = Status::new(Some(ReplyCode::MAILBOX_UNAVAILABLE), " no", ReplyCode::OK);
            assert!(!status.is_success());
            assert_eq!(status.code(), Some(ReplyCode::MAILBOX_UNAVAILABLE));
        }

        #[test]
        fn malformed_never_succeeds() {
            let status = Status::new(None, "", ReplyCode::OK);
            assert!(!status.is_success());
            assert!(status.is_malformed());
            assert_eq!(status.numeric_code(), Status::INVALID_CODE);
        }

        #[test]
        fn display_reports_outcome() {
            let status = Status::new(Some(ReplyCode::CLOSING), " bye", ReplyCode::CLOSING);
            assert_eq!(
                status.to_string(),
                "Request was Successful. Code: 221.\nReturned with message:\n bye"
            );

            let status = Status::new(None, "", ReplyCode::OK);
            assert!(status.to_string().starts_with("Request was Unsuccessful. Code: -1."));
        }
    }
}
