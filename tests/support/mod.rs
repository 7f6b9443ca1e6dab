//! Canned HTTP/1.1 server for transport tests.
//!
//! Serves fixed routes over raw TCP so the client under test talks to a
//! real socket without external network access.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Bytes of the first (and only) chunk the `/drip` route delivers before
/// stalling.
pub const DRIP_CHUNK: usize = 16 * 1024;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// The `/image` route body: a PNG signature padded to 1 KiB.
pub fn png_body() -> Vec<u8> {
    let mut body = PNG_MAGIC.to_vec();
    body.resize(1024, 0);
    body
}

/// Start the server on an ephemeral local port.
pub async fn spawn() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(handle(stream));
        }
    });
    addr
}

struct Received {
    method: String,
    target: String,
    head: String,
    body: Vec<u8>,
}

async fn handle(mut stream: TcpStream) {
    // Keep-alive: serve requests until the peer hangs up.
    while let Some(request) = read_request(&mut stream).await {
        respond(&mut stream, &request).await;
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<Received> {
    let mut buf = Vec::new();
    let head_end = loop {
        let mut chunk = [0u8; 1024];
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut request_line = head.lines().next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let content_length = header_value(&head, "content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        let mut chunk = [0u8; 1024];
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);

    Some(Received {
        method,
        target,
        head,
        body,
    })
}

fn header_value(head: &str, name: &str) -> Option<String> {
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim().to_string())
    })
}

async fn respond(stream: &mut TcpStream, request: &Received) {
    let path = request.target.split('?').next().unwrap_or("");
    match path {
        "/get" => write_response(stream, 200, "application/json", br#"{"ok":true}"#).await,
        "/whoami" => {
            let body = format!("{} {}", request.method, request.target);
            write_response(stream, 200, "text/plain", body.as_bytes()).await;
        }
        "/echo" => {
            let content_type = header_value(&request.head, "content-type")
                .unwrap_or_else(|| "application/octet-stream".to_string());
            write_response(stream, 200, &content_type, &request.body).await;
        }
        "/status/404" => write_response(stream, 404, "text/plain", b"not found").await,
        "/basic-auth" => match header_value(&request.head, "authorization").as_deref() {
            Some("Basic dXNlcjpwYXNzd29yZA==") => {
                write_response(stream, 200, "application/json", br#"{"authenticated":true}"#).await;
            }
            _ => write_response(stream, 401, "text/plain", b"unauthorized").await,
        },
        "/image" => {
            let body = png_body();
            write_response(stream, 200, "image/png", &body).await;
        }
        "/slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            write_response(stream, 200, "text/plain", b"late").await;
        }
        "/drip" => {
            // Promise more than is delivered, then stall: exercises
            // cancellation and timeout mid-body.
            let head = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/octet-stream\r\ncontent-length: {}\r\n\r\n",
                4 * DRIP_CHUNK
            );
            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(&vec![0x61u8; DRIP_CHUNK]).await;
            let _ = stream.flush().await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        _ => write_response(stream, 404, "text/plain", b"no route").await,
    }
}

async fn write_response(stream: &mut TcpStream, status: u16, content_type: &str, body: &[u8]) {
    let reason = match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        _ => "",
    };
    let head = format!(
        "HTTP/1.1 {status} {reason}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(body).await;
    let _ = stream.flush().await;
}

/// In-memory download destination.
#[derive(Debug, Default)]
pub struct VecSink(pub Vec<u8>);

impl AsyncWrite for VecSink {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        self.get_mut().0.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Destination that rejects every write.
#[derive(Debug, Default)]
pub struct FailingSink;

impl AsyncWrite for FailingSink {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        Poll::Ready(Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "sink rejected write",
        )))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
