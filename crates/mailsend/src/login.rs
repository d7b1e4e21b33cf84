//! Credential entry.

use std::io::{BufRead, Write};

use anyhow::Result;
use mailsend_smtp::Credentials;

use crate::compose::prompt;

const PASSWORD_PROMPT: &str = "Enter Password: ";

/// Builds credentials, prompting for whichever part was not supplied.
///
/// With `hide_password` set the password is read from the terminal without
/// echo; otherwise it is read from `input` like any other answer.
///
/// # Errors
///
/// Returns an error if input ends before both values are known.
pub fn login<R, W>(
    input: &mut R,
    output: &mut W,
    username: Option<String>,
    password: Option<String>,
    hide_password: bool,
) -> Result<Credentials>
where
    R: BufRead,
    W: Write,
{
    let username = match username {
        Some(username) => username,
        None => prompt(input, output, "Enter Email: ")?,
    };
    let password = match password {
        Some(password) => password,
        None if hide_password => {
            output.flush()?;
            rpassword::prompt_password(PASSWORD_PROMPT)?
        }
        None => prompt(input, output, PASSWORD_PROMPT)?,
    };
    Ok(Credentials::new(username, password))
}
