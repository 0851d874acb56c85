//! DNS Resolution Module
//!
//! Provides the resolution strategies the dialers are built on:
//! - System resolver (getaddrinfo via tokio's blocking pool)
//! - A hickory-dns resolver pinned to one explicit DNS server
//! - A single A-record query over UDP, used by [`resolve`]
//!
//! # Architecture
//!
//! The `Resolve` trait is the core abstraction that allows the system and
//! custom-server resolvers to be used interchangeably by
//! [`crate::socket::Dialer`]. The plain query path backs [`resolve`] and the
//! single-domain dialer, where the raw answer list matters.
//!
//! # Example
//!
//! ```rust,ignore
//! use simplenet::dns::{Name, Resolve, ServerResolver};
//!
//! let resolver = ServerResolver::new("1.1.1.1:53");
//! let addrs = resolver.resolve(Name::new("example.com")).await?;
//! for addr in addrs {
//!     println!("Resolved: {}", addr);
//! }
//! ```

use std::time::Duration;

mod gai;
mod hickory;
mod lookup;
mod query;
mod resolve;
mod server;

pub use gai::GaiResolver;
pub use hickory::ServerResolver;
pub use lookup::resolve;
pub(crate) use lookup::lookup;
pub use resolve::{parse_ip_literal, Addrs, Name, Resolve, Resolving};
pub use server::DNS_PORT;

/// Timeout applied to every lookup and query.
pub const DNS_TIMEOUT: Duration = Duration::from_secs(5);
