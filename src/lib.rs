//! # simplenet
//!
//! Buffered HTTP requests with pluggable DNS resolution.
//!
//! `simplenet` is a thin layer over `hyper`: every request gets a fresh
//! connection, the whole response body is read into memory before the call
//! returns, and host names can be resolved by the operating system, by one
//! explicit DNS server, or pinned to a single domain.
//!
//! ## Features
//!
//! - **Buffered responses**: [`BufferedResponse`] owns its body; nothing to
//!   close, `bytes()` can be read any number of times
//! - **Custom DNS**: [`resolve`] queries a given server directly, and clients
//!   can route all resolution through it
//! - **Single-domain dialing**: [`Client::with_dns`] sends every connection to
//!   one domain on port 80
//! - **Blocking API**: no runtime needed on the caller's side
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use simplenet::Client;
//!
//! let addrs = simplenet::resolve("1.1.1.1:53", "example.com")?;
//! println!("example.com -> {addrs:?}");
//!
//! let client = Client::new();
//! let resp = client.post_form("http://example.com/login", [("user", "me")])?;
//! println!("{}: {}", resp.status(), resp.text()?);
//! # Ok::<(), simplenet::NetError>(())
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error type and `io::Error` context helpers
//! - [`dns`] - System, custom-server and single-query resolution
//! - [`socket`] - Dialers and connection setup
//! - [`http`] - Transport, request bodies and buffered responses
//! - [`config`] - Transport configuration and the process-wide default
//!
//! The blocking entry points build their own runtime; calling them from
//! inside an async runtime panics.

pub mod base;
pub mod client;
pub mod config;
pub mod dns;
pub mod http;
pub mod socket;

pub use base::neterror::NetError;
pub use client::{execute, get, head, post, post_form, Client, ClientBuilder, DEFAULT_TIMEOUT};
pub use config::{set_custom_dns, DnsMode, TransportConfig};
pub use dns::resolve;
pub use crate::http::{BufferedResponse, RequestBody};
pub use socket::{AddressSelector, DialerConfig, FirstAddress};
