//! Socket and connection management.
//!
//! - [`dialer`]: resolve then connect, in system, custom-server or
//!   single-domain mode
//! - [`select`]: which resolved address a single-domain dial uses
//! - [`connectjob`]: dial -> optional TLS for one request target
//! - [`client`]: the connected socket handed to the HTTP layer

pub mod client;
pub mod connectjob;
pub mod dialer;
pub mod select;

pub use client::SocketType;
pub use connectjob::{ConnectJob, Target};
pub use dialer::{
    Dial, Dialer, DialerConfig, Dialing, DomainDialer, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_KEEP_ALIVE, DOMAIN_DIAL_PORT,
};
pub use select::{AddressSelector, FirstAddress};
