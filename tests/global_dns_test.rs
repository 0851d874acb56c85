//! Process-wide default transport.
//!
//! Everything lives in one test: the default is global to the test binary and
//! tests in a binary run concurrently.

mod support;

use simplenet::{set_custom_dns, Client, NetError};
use std::net::Ipv4Addr;
use support::{DnsReply, DnsServer, HttpServer, Reply};

#[test]
fn test_set_custom_dns_affects_new_default_clients() {
    let dns = DnsServer::start(DnsReply::Answer(vec![Ipv4Addr::LOCALHOST]));
    let server = HttpServer::start(|_| Reply::ok("via mesh"));
    let url = format!("http://only-in-mock.mesh:{}/", server.port());

    let before = Client::new();

    set_custom_dns(&dns.addr_str());
    let during = Client::new();
    let resp = during.get(&url).unwrap();
    assert_eq!(resp.text().unwrap(), "via mesh");
    assert!(dns.a_queries() >= 1);

    // A client built before the switch keeps the system resolver.
    let queries = dns.a_queries();
    let err = before.get(&url).unwrap_err();
    assert!(err.is_dns() || err.is_timeout(), "got {err:?}");
    assert_eq!(dns.a_queries(), queries);

    // The generic client used when none is passed is not affected either.
    assert!(simplenet::get(None, &url).is_err());

    // Last writer wins; empty restores the system resolver.
    let other = DnsServer::start(DnsReply::Empty);
    set_custom_dns(&other.addr_str());
    match Client::new().get(&url) {
        Err(NetError::NoAddressesResolved { domain }) => assert_eq!(domain, "only-in-mock.mesh"),
        other => panic!("Expected NoAddressesResolved, got {other:?}"),
    }

    set_custom_dns("");
    let queries = dns.a_queries();
    assert!(Client::new().get(&url).is_err());
    assert_eq!(dns.a_queries(), queries);

    // Clients built while the mock was the default still use it.
    assert_eq!(during.get(&url).unwrap().text().unwrap(), "via mesh");
}
