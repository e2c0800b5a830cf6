//! Minimal JSON-RPC-over-HTTP server for adapter tests.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// `Ok(result)` or `Err(error object)`.
pub type Reply = Result<Value, Value>;

/// Serve `handler` on an ephemeral port; returns the endpoint URL.
pub async fn spawn<F>(handler: F) -> String
where
    F: Fn(&str, &Value) -> Reply + Send + Sync + 'static,
{
    spawn_delayed(Duration::ZERO, handler).await
}

/// Like [`spawn`], but every reply is held back for `delay`.
pub async fn spawn_delayed<F>(delay: Duration, handler: F) -> String
where
    F: Fn(&str, &Value) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let handler = Arc::clone(&handler);
            tokio::spawn(serve(stream, handler, delay));
        }
    });

    format!("http://{}", addr)
}

/// Error object with `code`.
pub fn rpc_error(code: i64, message: &str) -> Value {
    json!({"code": code, "message": message})
}

async fn serve<F>(mut stream: TcpStream, handler: Arc<F>, delay: Duration)
where
    F: Fn(&str, &Value) -> Reply + Send + Sync + 'static,
{
    let mut buf = Vec::new();
    loop {
        let Some(body) = read_request(&mut stream, &mut buf).await else {
            return;
        };
        let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        let method = request["method"].as_str().unwrap_or_default().to_string();
        let params = request["params"].clone();

        let mut response = json!({"jsonrpc": "2.0", "id": request["id"].clone()});
        match (*handler)(&method, &params) {
            Ok(result) => response["result"] = result,
            Err(error) => response["error"] = error,
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let body = response.to_string();
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            body.len()
        );
        if stream.write_all(head.as_bytes()).await.is_err()
            || stream.write_all(body.as_bytes()).await.is_err()
        {
            return;
        }
    }
}

/// Read one request body; `None` on EOF.
async fn read_request(stream: &mut TcpStream, buf: &mut Vec<u8>) -> Option<Vec<u8>> {
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        if let Some(pos) = find(buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let length = headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = buf[header_end..header_end + length].to_vec();
    buf.drain(..header_end + length);
    Some(body)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
