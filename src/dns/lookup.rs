//! The public resolution entry point.

use super::{
    parse_ip_literal, query::query_a, server::server_addr, GaiResolver, Name, Resolve, DNS_TIMEOUT,
};
use crate::base::blocking::block_on;
use crate::base::neterror::NetError;
use std::net::IpAddr;
use std::time::Duration;

/// Resolves `target` to a list of IP addresses.
///
/// - A `target` that is already an IP literal is returned as the only
///   element, without any query, whatever `server` is.
/// - An empty `server` delegates to the system resolver with a 5 second
///   timeout.
/// - Otherwise one A-record query is sent to `server` (`host:port`, or a bare
///   IP meaning port 53) and the answers are returned in server order. An
///   empty answer is an empty list, not an error.
///
/// No retries are made and no fallback resolver is consulted.
///
/// # Example
///
/// ```rust,no_run
/// let addrs = simplenet::resolve("1.1.1.1:53", "example.com")?;
/// for addr in &addrs {
///     println!("{addr}");
/// }
/// # Ok::<(), simplenet::NetError>(())
/// ```
pub fn resolve(server: &str, target: &str) -> Result<Vec<IpAddr>, NetError> {
    block_on(lookup(server, target))
}

/// Async form of [`resolve`], run on whatever runtime the caller provides.
pub(crate) async fn lookup(server: &str, target: &str) -> Result<Vec<IpAddr>, NetError> {
    lookup_within(server, target, DNS_TIMEOUT).await
}

/// Like [`lookup`], with `timeout` bounding the custom-server path end to
/// end: resolving a `host:port` server address and the query itself share
/// the one deadline.
async fn lookup_within(
    server: &str,
    target: &str,
    timeout: Duration,
) -> Result<Vec<IpAddr>, NetError> {
    if let Some(ip) = parse_ip_literal(target) {
        tracing::debug!(domain = %target, "target is an IP literal, skipping DNS");
        return Ok(vec![ip]);
    }

    if server.is_empty() {
        let addrs = GaiResolver::new().resolve(Name::new(target)).await?;
        return Ok(addrs.map(|addr| addr.ip()).collect());
    }

    let query = async {
        let addr = server_addr(server).await?;
        query_a(addr, target).await
    };
    let answers = tokio::time::timeout(timeout, query).await.map_err(|_| {
        tracing::debug!(domain = %target, server = %server, "DNS lookup timed out");
        NetError::DnsTimedOut
    })??;
    Ok(answers.into_iter().map(IpAddr::V4).collect())
}
