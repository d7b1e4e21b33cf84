//! Session configuration.

use crate::types::Credentials;

/// Default submission host.
pub const DEFAULT_HOST: &str = "smtp.gmail.com";

/// Default implicit-TLS submission port.
pub const DEFAULT_PORT: u16 = 465;

/// Default name announced in `HELO`.
pub const DEFAULT_CLIENT_NAME: &str = "localhost";

/// Everything a session needs before it opens the socket.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Server hostname, also used as the TLS server name.
    pub host: String,
    /// Server port (implicit TLS).
    pub port: u16,
    /// Name sent with `HELO`.
    pub client_name: String,
    /// Credentials for AUTH LOGIN; `None` skips authentication.
    pub credentials: Option<Credentials>,
}

impl SessionConfig {
    /// Creates an unauthenticated configuration for `host` on port 465.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            credentials: None,
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> SessionConfigBuilder {
        SessionConfigBuilder::new(host)
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

/// Builder for [`SessionConfig`].
#[derive(Debug, Clone)]
pub struct SessionConfigBuilder {
    host: String,
    port: Option<u16>,
    client_name: Option<String>,
    credentials: Option<Credentials>,
}

impl SessionConfigBuilder {
    /// Creates a new builder with the given hostname.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            client_name: None,
            credentials: None,
        }
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the name announced in `HELO`.
    #[must_use]
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    /// Sets the AUTH LOGIN credentials.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> SessionConfig {
        SessionConfig {
            host: self.host,
            port: self.port.unwrap_or(DEFAULT_PORT),
            client_name: self
                .client_name
                .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string()),
            credentials: self.credentials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.host, "smtp.gmail.com");
        assert_eq!(config.port, 465);
        assert_eq!(config.client_name, "localhost");
        assert!(config.credentials.is_none());
        assert_eq!(config.address(), "smtp.gmail.com:465");
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::builder("mail.example.com")
            .port(2465)
            .client_name("ori")
            .credentials(Credentials::new("user", "pass"))
            .build();
        assert_eq!(config.address(), "mail.example.com:2465");
        assert_eq!(config.client_name, "ori");
        assert!(config.credentials.is_some());
    }
}
