//! Base types and error handling.
//!
//! - [`NetError`]: every failure the crate reports
//! - [`IoResultExt`]: attaches host or domain context to `io::Error`s

pub(crate) mod blocking;
pub mod context;
pub mod neterror;

pub use context::IoResultExt;
pub use neterror::NetError;
