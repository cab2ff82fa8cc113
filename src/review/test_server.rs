//! Minimal one-shot HTTP server for provider tests.
//!
//! Accepts a single connection on a random local port, records the raw
//! request, and answers with a canned status line and JSON body.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// A running one-shot server.
pub struct TestServer {
    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub url: String,
    request: mpsc::Receiver<String>,
}

impl TestServer {
    /// The raw request text received by the server.
    pub fn request(&self) -> String {
        self.request
            .recv_timeout(Duration::from_secs(5))
            .expect("server did not receive a request")
    }
}

/// Starts a server that replies once with `status` (e.g. `"200 OK"`) and `body`.
pub fn serve_once(status: &str, body: &str) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read local address");
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let request = read_request(&mut stream);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
            let _ = tx.send(request);
        }
    });

    TestServer {
        url: format!("http://{addr}"),
        request: rx,
    }
}

/// Reads headers and a `Content-Length` body from `stream`.
fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}
