//! In-process mock servers for the integration tests.
//!
//! Both servers run on plain `std::net` threads so they work alongside the
//! blocking client API without a runtime of their own.

#![allow(dead_code)]

use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, CNAME};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use hickory_proto::serialize::binary::{BinDecodable, BinEncodable};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream, UdpSocket};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

// === DNS ===

/// How the mock DNS server answers A queries. Other query types always get
/// an empty NOERROR answer.
#[derive(Clone, Debug)]
pub enum DnsReply {
    /// A records in this order.
    Answer(Vec<Ipv4Addr>),
    /// A CNAME to `target.` followed by A records for it.
    CnameThen(String, Vec<Ipv4Addr>),
    /// NOERROR with no answers.
    Empty,
    /// The given response code with no answers.
    Code(ResponseCode),
    /// Never answer.
    Silent,
}

pub struct DnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    reply: Arc<Mutex<DnsReply>>,
    stop: Arc<AtomicBool>,
}

impl DnsServer {
    pub fn start(reply: DnsReply) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_millis(50)))
            .unwrap();
        let addr = socket.local_addr().unwrap();

        let queries = Arc::new(AtomicUsize::new(0));
        let reply = Arc::new(Mutex::new(reply));
        let stop = Arc::new(AtomicBool::new(false));

        let (q, r, s) = (queries.clone(), reply.clone(), stop.clone());
        thread::spawn(move || {
            let mut buf = [0u8; 4096];
            while !s.load(Ordering::SeqCst) {
                let Ok((n, peer)) = socket.recv_from(&mut buf) else {
                    continue;
                };
                let Ok(query) = Message::from_bytes(&buf[..n]) else {
                    continue;
                };
                let is_a = query
                    .queries()
                    .first()
                    .is_some_and(|q| q.query_type() == RecordType::A);
                if is_a {
                    q.fetch_add(1, Ordering::SeqCst);
                }

                let reply = r.lock().unwrap().clone();
                if let Some(response) = answer(&query, is_a, &reply) {
                    let _ = socket.send_to(&response.to_bytes().unwrap(), peer);
                }
            }
        });

        Self {
            addr,
            queries,
            reply,
            stop,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Server address as `host:port`.
    pub fn addr_str(&self) -> String {
        self.addr.to_string()
    }

    /// Number of A queries received so far.
    pub fn a_queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn set_reply(&self, reply: DnsReply) {
        *self.reply.lock().unwrap() = reply;
    }
}

impl Drop for DnsServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

fn answer(query: &Message, is_a: bool, reply: &DnsReply) -> Option<Message> {
    let mut response = Message::new();
    response
        .set_id(query.id())
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(query.recursion_desired())
        .set_recursion_available(true)
        .set_response_code(ResponseCode::NoError);
    for q in query.queries() {
        response.add_query(q.clone());
    }
    let name = query.queries().first()?.name().clone();

    if !is_a {
        return Some(response);
    }

    match reply {
        DnsReply::Answer(ips) => {
            for ip in ips {
                response.add_answer(Record::from_rdata(name.clone(), 60, RData::A(A(*ip))));
            }
        }
        DnsReply::CnameThen(target, ips) => {
            let target = Name::from_ascii(format!("{target}.")).unwrap();
            response.add_answer(Record::from_rdata(
                name,
                60,
                RData::CNAME(CNAME(target.clone())),
            ));
            for ip in ips {
                response.add_answer(Record::from_rdata(target.clone(), 60, RData::A(A(*ip))));
            }
        }
        DnsReply::Empty => {}
        DnsReply::Code(code) => {
            response.set_response_code(*code);
        }
        DnsReply::Silent => return None,
    }
    Some(response)
}

// === HTTP ===

/// One request as the mock HTTP server saw it.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What the mock HTTP server sends back.
#[derive(Clone, Debug)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// `Content-Length` to announce; defaults to the body length. Announcing
    /// more than is sent simulates a connection dropped mid-body.
    pub declared_len: Option<usize>,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
            declared_len: None,
            delay: None,
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn declared_len(mut self, len: usize) -> Self {
        self.declared_len = Some(len);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

type Handler = Arc<dyn Fn(&RecordedRequest) -> Reply + Send + Sync>;

pub struct HttpServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    stop: Arc<AtomicBool>,
}

impl HttpServer {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Reply + Send + Sync + 'static,
    {
        Self::bind("127.0.0.1:0", handler)
    }

    pub fn bind<F>(addr: &str, handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Reply + Send + Sync + 'static,
    {
        Self::try_bind(addr, handler).unwrap()
    }

    /// Like [`HttpServer::bind`], but `None` when the address is taken or
    /// needs privileges the test process lacks.
    pub fn try_bind<F>(addr: &str, handler: F) -> Option<Self>
    where
        F: Fn(&RecordedRequest) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind(addr).ok()?;
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));
        let handler: Handler = Arc::new(handler);

        let (reqs, s) = (requests.clone(), stop.clone());
        thread::spawn(move || {
            for conn in listener.incoming() {
                if s.load(Ordering::SeqCst) {
                    break;
                }
                let Ok(conn) = conn else { continue };
                let (handler, reqs) = (handler.clone(), reqs.clone());
                thread::spawn(move || serve(conn, &*handler, &reqs));
            }
        });

        Some(Self {
            addr,
            requests,
            stop,
        })
    }

    /// An echo server: replies with the request body and reports the method
    /// and content type in `x-method` / `x-content-type`.
    pub fn echo() -> Self {
        Self::start(|req| {
            let mut reply = Reply::ok(req.body.clone()).header("x-method", &req.method);
            if let Some(ct) = req.header("content-type") {
                reply = reply.header("x-content-type", ct);
            }
            reply
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for HttpServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        // Wake the accept loop so it sees the flag.
        let _ = TcpStream::connect(self.addr);
    }
}

fn serve(conn: TcpStream, handler: &dyn Fn(&RecordedRequest) -> Reply, log: &Mutex<Vec<RecordedRequest>>) {
    let Ok(mut writer) = conn.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(conn);

    let mut line = String::new();
    if reader.read_line(&mut line).unwrap_or(0) == 0 {
        return;
    }
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            return;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let len = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; len];
    if reader.read_exact(&mut body).is_err() {
        return;
    }

    let request = RecordedRequest {
        method,
        target,
        headers,
        body,
    };
    let reply = handler(&request);
    log.lock().unwrap().push(request);

    if let Some(delay) = reply.delay {
        thread::sleep(delay);
    }

    let mut head = format!("HTTP/1.1 {} MOCK\r\n", reply.status);
    for (k, v) in &reply.headers {
        head.push_str(&format!("{k}: {v}\r\n"));
    }
    let declared = reply.declared_len.unwrap_or(reply.body.len());
    head.push_str(&format!("Content-Length: {declared}\r\nConnection: close\r\n\r\n"));

    let _ = writer.write_all(head.as_bytes());
    let _ = writer.write_all(&reply.body);
    let _ = writer.flush();
    let _ = writer.shutdown(std::net::Shutdown::Both);
}
