//! DNS server address parsing.

use crate::base::neterror::NetError;
use std::net::{IpAddr, SocketAddr};

/// Port used when a DNS server is given as a bare IP address.
pub const DNS_PORT: u16 = 53;

/// Turns a DNS server address into a socket address.
///
/// Accepts `ip:port`, `[v6]:port`, a bare IP (port 53) or `host:port`. A
/// hostname is looked up through the system resolver and its first address
/// is used.
pub(crate) async fn server_addr(server: &str) -> Result<SocketAddr, NetError> {
    if let Some(addr) = parse_server_literal(server) {
        return Ok(addr);
    }

    let (host, port) = server
        .rsplit_once(':')
        .ok_or_else(|| NetError::InvalidDnsServer(server.to_string()))?;
    if host.is_empty() || port.parse::<u16>().is_err() {
        return Err(NetError::InvalidDnsServer(server.to_string()));
    }

    tokio::net::lookup_host(server)
        .await
        .map_err(|_| NetError::InvalidDnsServer(server.to_string()))?
        .next()
        .ok_or_else(|| NetError::InvalidDnsServer(server.to_string()))
}

fn parse_server_literal(server: &str) -> Option<SocketAddr> {
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Some(addr);
    }
    super::parse_ip_literal(server).map(|ip: IpAddr| SocketAddr::new(ip, DNS_PORT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[tokio::test]
    async fn test_server_addr_with_port() {
        let addr = server_addr("127.0.0.1:5353").await.unwrap();
        assert_eq!(addr, SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5353));
    }

    #[tokio::test]
    async fn test_server_addr_bare_ip_uses_port_53() {
        let addr = server_addr("8.8.8.8").await.unwrap();
        assert_eq!(addr.port(), DNS_PORT);

        let addr = server_addr("[::1]").await.unwrap();
        assert_eq!(addr, SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), 53));
    }

    #[tokio::test]
    async fn test_server_addr_hostname() {
        let addr = server_addr("localhost:5300").await.unwrap();
        assert_eq!(addr.port(), 5300);
        assert!(addr.ip().is_loopback());
    }

    #[tokio::test]
    async fn test_server_addr_invalid() {
        for bad in ["", "not a server", "dns.example", "127.0.0.1:99999", ":53"] {
            let err = server_addr(bad).await.unwrap_err();
            assert!(matches!(err, NetError::InvalidDnsServer(_)), "{bad}: {err:?}");
        }
    }
}
