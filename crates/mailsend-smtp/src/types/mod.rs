//! Core SMTP types.

mod address;
mod credentials;
mod envelope;
mod status;

pub use address::Address;
pub use credentials::Credentials;
pub use envelope::Envelope;
pub use status::{ReplyCode, Status};
