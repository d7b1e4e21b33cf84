//! Line-based transport over the TLS socket.

use crate::error::{Error, Result};
use rustls::pki_types::ServerName;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::{
    TlsConnector,
    rustls::{ClientConfig, RootCertStore},
};
use tracing::debug;

/// Size of the single read performed by [`Transport::recv_line`].
const RECV_SIZE: usize = 8192;

/// Transport over an implicit-TLS TCP connection.
pub type TlsTransport = Transport<TlsStream<TcpStream>>;

/// Owns the session socket and exposes line-based send/receive.
#[derive(Debug)]
pub struct Transport<S> {
    stream: S,
}

impl TlsTransport {
    /// Opens a TCP connection and completes the TLS handshake on it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the socket cannot be opened or the
    /// handshake fails.
    ///
    /// Returns [`Error::InvalidHostname`] if `host` is not a valid TLS
    /// server name. This is a configuration mistake rather than a network
    /// failure, so it is reported separately and no socket is opened.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|_| Error::InvalidHostname(host.to_string()))?;

        debug!("Connecting to {addr}");
        let tcp_stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| Error::Connection {
                addr: addr.clone(),
                source,
            })?;

        let connector = create_tls_connector();
        let tls_stream = connector
            .connect(server_name, tcp_stream)
            .await
            .map_err(|source| Error::Connection {
                addr: addr.clone(),
                source,
            })?;

        debug!("TLS established with {addr}");
        Ok(Self::new(tls_stream))
    }
}

impl<S> Transport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an already-established stream.
    pub const fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Writes one line, adding CRLF unless `text` already ends in `\n`.
    ///
    /// Returns only once every byte has been written and flushed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn send_line(&mut self, text: &str) -> Result<()> {
        let mut data = Vec::with_capacity(text.len() + 2);
        data.extend_from_slice(text.as_bytes());
        if !text.ends_with('\n') {
            data.extend_from_slice(b"\r\n");
        }
        self.stream.write_all(&data).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Reads one response line with a single read of up to 8192 bytes
    /// and strips the trailing line terminator.
    ///
    /// The read is assumed to hold exactly one complete reply: nothing is
    /// buffered across calls, so a reply split over two reads is seen as
    /// two lines. End of stream yields an empty line.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn recv_line(&mut self) -> Result<String> {
        let mut buf = vec![0u8; RECV_SIZE];
        let read = self.stream.read(&mut buf).await?;
        let text = String::from_utf8_lossy(&buf[..read]);
        Ok(text.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Shuts the connection down and releases the socket.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown fails; the socket is released
    /// either way.
    pub async fn close(mut self) -> Result<()> {
        let result = self.stream.shutdown().await;
        drop(self.stream);
        result?;
        Ok(())
    }
}

/// Creates a TLS connector with the webpki root certificates.
fn create_tls_connector() -> TlsConnector {
    let root_store = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
}
