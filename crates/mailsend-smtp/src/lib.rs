//! # mailsend-smtp
//!
//! A small SMTP submission client: one implicit-TLS connection, one
//! message, then `QUIT`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailsend_smtp::{Address, Credentials, Envelope, SessionConfig, send_mail};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> mailsend_smtp::Result<()> {
//!     let config = SessionConfig::builder("smtp.gmail.com")
//!         .port(465)
//!         .client_name("laptop")
//!         .credentials(Credentials::new("me@gmail.com", "app-password"))
//!         .build();
//!
//!     let envelope = Envelope::new(
//!         Address::new("me@gmail.com")?,
//!         Address::new("you@gmail.com")?,
//!         "Hello",
//!         "Hi there!",
//!     );
//!
//!     let report = send_mail(config, &envelope).await?;
//!     for exchange in &report.exchanges {
//!         println!("{}: {}", exchange.step, exchange.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Session Phases
//!
//! ```text
//! Connecting ── HELO ──→ Greeted ── AUTH LOGIN ──→ Authenticated
//!                           │                            │
//!                           └──── (no credentials) ──────┤
//!                                                        ▼
//!                        Closed ←── QUIT ── Sending (MAIL/RCPT/DATA/body)
//! ```
//!
//! ## Modules
//!
//! - [`command`]: SMTP command lines
//! - [`config`]: Session configuration
//! - [`connection`]: TLS transport
//! - [`parser`]: Response parser
//! - [`session`]: Submission state machine
//! - [`types`]: Addresses, credentials, envelopes, reply status

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod config;
pub mod connection;
mod error;
pub mod parser;
pub mod session;
pub mod types;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use connection::{TlsTransport, Transport};
pub use error::{Error, Result};
pub use session::{Exchange, Phase, Session, SessionReport, Step, send_mail};
pub use types::{Address, Credentials, Envelope, ReplyCode, Status};
