//! Single A-record query over UDP.
//!
//! Message encoding and decoding is handled by `hickory-proto`; this module
//! owns the exchange itself: one query, one datagram back, no retries and no
//! fallback to TCP.

use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{Name, RData, RecordType};
use hickory_proto::serialize::binary::{BinDecodable, BinEncodable};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;

/// Largest datagram accepted from the server.
const MAX_RESPONSE_SIZE: usize = 4096;

/// Builds the A-record query message for `domain`.
pub(crate) fn build_query(domain: &str, id: u16) -> Result<Message, NetError> {
    let fqdn = if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    };
    let name = Name::from_ascii(&fqdn).map_err(|e| NetError::DnsProtocol(e.to_string()))?;

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(name, RecordType::A));
    Ok(message)
}

/// Pulls the addresses of every A record out of `response`, in answer order.
///
/// The response code is not an error: whatever answers came back are
/// returned, so `NXDOMAIN` or `SERVFAIL` with no records is an empty list.
pub(crate) fn extract_a_records(
    domain: &str,
    query_id: u16,
    response: &Message,
) -> Result<Vec<Ipv4Addr>, NetError> {
    if response.id() != query_id {
        return Err(NetError::DnsProtocol(format!(
            "response id {} does not match query id {}",
            response.id(),
            query_id
        )));
    }
    if response.message_type() != MessageType::Response {
        return Err(NetError::DnsProtocol("reply is not a response".into()));
    }

    let code = response.response_code();
    if code != ResponseCode::NoError {
        tracing::debug!(domain = %domain, code = %code, "DNS server answered with an error code");
    }

    if response.truncated() {
        tracing::warn!(domain = %domain, "DNS response truncated, using partial answer");
    }

    Ok(response
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            Some(RData::A(a)) => Some(a.0),
            _ => None,
        })
        .collect())
}

/// Sends an A query for `domain` to `server` and returns the answers.
///
/// Waits for the reply indefinitely; callers put the deadline around it.
pub(crate) async fn query_a(server: SocketAddr, domain: &str) -> Result<Vec<Ipv4Addr>, NetError> {
    let id: u16 = rand::random();
    let query = build_query(domain, id)?;
    let packet = query
        .to_bytes()
        .map_err(|e| NetError::DnsProtocol(e.to_string()))?;

    let server_label = server.to_string();
    let bind: SocketAddr = if server.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
    };

    let socket = UdpSocket::bind(bind).await.dns_server_context(&server_label)?;
    socket.connect(server).await.dns_server_context(&server_label)?;

    tracing::debug!(domain = %domain, server = %server, id, "sending DNS A query");
    socket.send(&packet).await.dns_server_context(&server_label)?;

    let mut buf = vec![0u8; MAX_RESPONSE_SIZE];
    let n = socket.recv(&mut buf).await.dns_server_context(&server_label)?;

    let response =
        Message::from_bytes(&buf[..n]).map_err(|e| NetError::DnsProtocol(e.to_string()))?;
    let addrs = extract_a_records(domain, id, &response)?;

    tracing::debug!(domain = %domain, server = %server, count = addrs.len(), "DNS A query answered");
    Ok(addrs)
}
