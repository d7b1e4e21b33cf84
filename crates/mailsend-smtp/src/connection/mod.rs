//! Connection management for the submission socket.

mod transport;

pub use transport::{TlsTransport, Transport};
