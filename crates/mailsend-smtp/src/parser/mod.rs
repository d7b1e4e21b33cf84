//! SMTP response parser.
//!
//! Parsing never fails: a line that does not start with a 3-digit code
//! produces a [`Status`] without a code, which then fails validation like
//! any other unexpected reply.

use crate::types::{ReplyCode, Status};

/// Parses one reply line against the code the exchange expects.
///
/// The message is everything after the first three characters, verbatim.
#[must_use]
pub fn parse(line: &str, expected: ReplyCode) -> Status {
    match split_code(line) {
        Some((code, message)) => Status::new(Some(code), message, expected),
        None => Status::new(None, "", expected),
    }
}

/// Splits a line into its leading reply code and the rest.
fn split_code(line: &str) -> Option<(ReplyCode, &str)> {
    let digits = line.get(..3)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let code = digits.parse::<u16>().ok()?;
    Some((ReplyCode::new(code), &line[3..]))
}
