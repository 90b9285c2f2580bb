//! Minimal HTTP/1.1 server standing in for a Salesforce instance in integration tests.
//!
//! Answers every request with one canned status and body, and records each
//! request line and its headers so tests can inspect what was sent.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// e.g. `GET /soap/wsdl.jsp?type=* HTTP/1.1`
    pub request_line: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    body: Vec<u8>,
}

pub struct WsdlServer {
    /// e.g. "http://127.0.0.1:12345"
    pub base_url: String,
    canned: Arc<Mutex<Canned>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl WsdlServer {
    /// Change what subsequent requests receive.
    pub fn respond_with(&self, status: u16, body: impl Into<Vec<u8>>) {
        *self.canned.lock().unwrap() = Canned {
            status,
            body: body.into(),
        };
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(status: u16, body: impl Into<Vec<u8>>) -> WsdlServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let canned = Arc::new(Mutex::new(Canned {
        status,
        body: body.into(),
    }));
    let requests = Arc::new(Mutex::new(Vec::new()));
    {
        let canned = Arc::clone(&canned);
        let requests = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let canned = canned.lock().unwrap().clone();
                let requests = Arc::clone(&requests);
                thread::spawn(move || handle(stream, &canned, &requests));
            }
        });
    }
    WsdlServer {
        base_url: format!("http://127.0.0.1:{}", port),
        canned,
        requests,
    }
}

/// A base URL nothing listens on (bound once, then released).
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, canned: &Canned, requests: &Mutex<Vec<RecordedRequest>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    let head = String::from_utf8_lossy(&data).into_owned();
    requests.lock().unwrap().push(parse_request(&head));

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/xml;charset=UTF-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        canned.status,
        reason(canned.status),
        canned.body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&canned.body);
}

fn parse_request(head: &str) -> RecordedRequest {
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or("").to_string();
    let headers = lines
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    RecordedRequest {
        request_line,
        headers,
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
