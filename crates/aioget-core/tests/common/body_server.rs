//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves the same static body for every GET path, optionally without a
//! Content-Length (body terminated by closing the connection) or with an
//! error status.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct BodyServerOptions {
    /// If false, omit Content-Length and close the connection after the body.
    pub send_length: bool,
    /// Status line sent for every request, e.g. "200 OK" or "404 Not Found".
    pub status: &'static str,
    /// Body is written in pieces of this size with a short pause in between.
    pub piece_size: usize,
}

impl Default for BodyServerOptions {
    fn default() -> Self {
        Self {
            send_length: true,
            status: "200 OK",
            piece_size: 2500,
        }
    }
}

/// Starts a server in a background thread serving `body`. Returns the base URL
/// (e.g. "http://127.0.0.1:12345/"). The server runs until the process exits.
pub fn start(body: Vec<u8>) -> String {
    start_with_options(body, BodyServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: BodyServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            thread::spawn(move || handle(stream, &body, opts));
        }
    });
    format!("http://127.0.0.1:{}/", port)
}

/// A URL on a port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/gone.bin", port)
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: BodyServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let method = std::str::from_utf8(&buf[..n])
        .ok()
        .and_then(|r| r.split_whitespace().next())
        .unwrap_or("");
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }

    let is_success = opts.status.starts_with('2');
    let payload: &[u8] = if is_success { body } else { b"error" };
    let length_header = if opts.send_length {
        format!("Content-Length: {}\r\n", payload.len())
    } else {
        String::new()
    };
    let head = format!(
        "HTTP/1.1 {}\r\n{}Connection: close\r\n\r\n",
        opts.status, length_header
    );
    if stream.write_all(head.as_bytes()).is_err() {
        return;
    }
    for piece in payload.chunks(opts.piece_size.max(1)) {
        if stream.write_all(piece).is_err() {
            return;
        }
        let _ = stream.flush();
        thread::sleep(Duration::from_millis(2));
    }
}
