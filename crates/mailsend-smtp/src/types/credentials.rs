//! AUTH LOGIN credentials.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// Username and password, each held in the base64 form that the
/// AUTH LOGIN exchange puts on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Encodes a plain username and password.
    #[must_use]
    pub fn new(username: impl AsRef<[u8]>, password: impl AsRef<[u8]>) -> Self {
        Self {
            username: STANDARD.encode(username),
            password: STANDARD.encode(password),
        }
    }

    /// Returns the base64-encoded username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the base64-encoded password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
