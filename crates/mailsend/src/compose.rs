//! Interactive message composition.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use mailsend_smtp::{Address, Envelope};

/// Domains accepted when no `--allow-domain` is given.
pub const DEFAULT_DOMAINS: [&str; 2] = ["gmail.com", "googlemail.com"];

/// Which mailboxes the prompts accept.
#[derive(Debug, Clone)]
pub struct MailboxPolicy {
    domains: Vec<String>,
}

impl MailboxPolicy {
    /// Creates a policy for the given domains, compared case-insensitively.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Checks an address against the policy.
    ///
    /// The local part is letters and digits with at most one run of
    /// `.`, `'` or `-` between them, and at least two characters long.
    pub fn accepts(&self, address: &str) -> bool {
        let address = address.to_ascii_lowercase();

        let Some((local, domain)) = address.split_once('@') else {
            return false;
        };

        self.domains.iter().any(|d| d == domain) && is_valid_local_part(local)
    }
}

impl Default for MailboxPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAINS)
    }
}

fn is_valid_local_part(local: &str) -> bool {
    let is_word = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    let is_punct = |c: char| matches!(c, '.' | '\'' | '-');

    let (Some(first), Some(last)) = (local.chars().next(), local.chars().last()) else {
        return false;
    };
    if local.len() < 2 || !is_word(first) || !is_word(last) {
        return false;
    }
    if !local.chars().all(|c| is_word(c) || is_punct(c)) {
        return false;
    }

    // Punctuation may only appear as one contiguous run
    let runs = local
        .as_bytes()
        .windows(2)
        .filter(|w| !is_punct(char::from(w[0])) && is_punct(char::from(w[1])))
        .count();
    runs <= 1
}

/// Prompts for every part of a message and builds the envelope.
///
/// The body is read line by line until a line holding only `.`.
///
/// # Errors
///
/// Returns an error if the input ends early or cannot be read.
pub fn compose<R, W>(input: &mut R, output: &mut W, policy: &MailboxPolicy) -> Result<Envelope>
where
    R: BufRead,
    W: Write,
{
    let sender = prompt_address(input, output, policy, "Enter Sender Email: ")?;
    let recipient = prompt_address(input, output, policy, "Enter Recipient Email: ")?;
    let subject = prompt(input, output, "Enter Subject: ")?;

    writeln!(output, "Enter Content (write . on a line by itself to end):")?;
    output.flush()?;

    let mut body = Vec::new();
    loop {
        let line = read_line(input)?.context("input ended before the closing '.' line")?;
        if line == "." {
            break;
        }
        body.push(line);
    }

    Ok(Envelope::new(sender, recipient, subject, body.join("\n")))
}

/// Asks until the answer satisfies the mailbox policy.
fn prompt_address<R, W>(
    input: &mut R,
    output: &mut W,
    policy: &MailboxPolicy,
    question: &str,
) -> Result<Address>
where
    R: BufRead,
    W: Write,
{
    loop {
        let answer = prompt(input, output, question)?;
        if policy.accepts(&answer) {
            return Ok(Address::new(answer)?);
        }
        tracing::debug!("Rejected address {answer:?}");
    }
}

/// Writes `question` and returns the next line of input.
pub fn prompt<R, W>(input: &mut R, output: &mut W, question: &str) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{question}")?;
    output.flush()?;
    match read_line(input)? {
        Some(line) => Ok(line),
        None => bail!("input ended while waiting for: {}", question.trim_end()),
    }
}

/// Reads one line without its terminator, `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_policy_accepts_gmail() {
        let policy = MailboxPolicy::default();
        assert!(policy.accepts("john.doe@gmail.com"));
        assert!(policy.accepts("o'neil@googlemail.com"));
        assert!(policy.accepts("ab@gmail.com"));
        assert!(policy.accepts("John.Doe@GMail.com"));
        assert!(policy.accepts("a..-b@gmail.com"));
    }

    #[test]
    fn test_policy_rejects() {
        let policy = MailboxPolicy::default();
        assert!(!policy.accepts("a@gmail.com"));
        assert!(!policy.accepts(".ab@gmail.com"));
        assert!(!policy.accepts("ab.@gmail.com"));
        assert!(!policy.accepts("a.b.c@gmail.com"));
        assert!(!policy.accepts("a_b@gmail.com"));
        assert!(!policy.accepts("user@example.com"));
        assert!(!policy.accepts("user@gmail.com.evil"));
        assert!(!policy.accepts("usergmail.com"));
        assert!(!policy.accepts("us@er@gmail.com"));
        assert!(!policy.accepts(""));
    }

    #[test]
    fn test_policy_custom_domains() {
        let policy = MailboxPolicy::new(["Example.ORG"]);
        assert!(policy.accepts("ops@example.org"));
        assert!(!policy.accepts("ops@gmail.com"));
    }

    #[test]
    fn test_compose_reprompts_invalid_addresses() {
        let mut input = Cursor::new(
            "nobody\nalice@gmail.com\nbob@example.com\nbob@gmail.com\nHi\nline one\n.hidden\n.\n",
        );
        let mut output = Vec::new();

        let envelope = compose(&mut input, &mut output, &MailboxPolicy::default()).unwrap();

        assert_eq!(envelope.sender().as_str(), "alice@gmail.com");
        assert_eq!(envelope.recipient().as_str(), "bob@gmail.com");
        assert_eq!(envelope.subject(), "Hi");
        assert_eq!(envelope.body(), "line one\n.hidden");

        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown.matches("Enter Sender Email: ").count(), 2);
        assert_eq!(shown.matches("Enter Recipient Email: ").count(), 2);
    }

    #[test]
    fn test_compose_handles_crlf_input() {
        let mut input = Cursor::new("alice@gmail.com\r\nbob@gmail.com\r\nS\r\nbody\r\n.\r\n");
        let envelope = compose(&mut input, &mut Vec::new(), &MailboxPolicy::default()).unwrap();
        assert_eq!(envelope.body(), "body");
    }

    #[test]
    fn test_compose_requires_terminator() {
        let mut input = Cursor::new("alice@gmail.com\nbob@gmail.com\nS\nbody\n");
        let err = compose(&mut input, &mut Vec::new(), &MailboxPolicy::default()).unwrap_err();
        assert!(err.to_string().contains("closing '.' line"));
    }

    #[test]
    fn test_prompt_eof() {
        let mut input = Cursor::new("");
        assert!(prompt(&mut input, &mut Vec::new(), "Enter Subject: ").is_err());
    }
}
