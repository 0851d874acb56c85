//! Address selection policies.
//!
//! When a resolution yields several addresses, a selector decides which one
//! a single-target dial connects to. Only [`FirstAddress`] ships; other
//! policies (round-robin, happy eyeballs) plug in through the same trait
//! without touching the resolvers.

use std::fmt;
use std::net::IpAddr;

/// Picks the address to connect to out of a resolved list.
pub trait AddressSelector: Send + Sync + fmt::Debug {
    /// Returns `None` when `addrs` offers nothing usable.
    fn select(&self, addrs: &[IpAddr]) -> Option<IpAddr>;
}

/// Always selects the first address, in the order the resolver returned.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstAddress;

impl AddressSelector for FirstAddress {
    fn select(&self, addrs: &[IpAddr]) -> Option<IpAddr> {
        addrs.first().copied()
    }
}
