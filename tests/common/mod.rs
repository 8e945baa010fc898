//! Shared utilities for integration testing: scripted JSON-RPC nodes.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use alloy::primitives::{hex, keccak256};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Start a mock JSON-RPC node on an OS-assigned port.
///
/// The handler maps (method, params) to a result value; returning
/// `None` produces a method-not-found error response. Each connection
/// serves one request and closes, so nothing depends on pooling.
pub async fn start_mock_node<F, Fut>(handler: F) -> SocketAddr
where
    F: Fn(String, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<Value>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let _ = serve_one(socket, handler).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

pub fn rpc_url(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

/// Hex-quantity JSON value, the form Ethereum nodes answer with.
pub fn hex_u128(value: u128) -> Value {
    json!(format!("{:#x}", value))
}

/// Transaction hash a node would compute for a raw submission.
#[allow(dead_code)]
pub fn raw_tx_hash(params: &Value) -> Value {
    let raw = params[0].as_str().unwrap_or_default();
    let bytes = hex::decode(raw.trim_start_matches("0x")).unwrap_or_default();
    json!(format!("{:#x}", keccak256(&bytes)))
}

/// Minimal legacy receipt for the hash in `params[0]`.
#[allow(dead_code)]
pub fn receipt_for(params: &Value, success: bool) -> Value {
    json!({
        "transactionHash": params[0],
        "transactionIndex": "0x0",
        "blockHash": format!("0x{}", "11".repeat(32)),
        "blockNumber": "0x1",
        "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        "to": "0x1111111111111111111111111111111111111111",
        "contractAddress": null,
        "gasUsed": "0x5208",
        "cumulativeGasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "status": if success { "0x1" } else { "0x0" },
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "type": "0x0"
    })
}

async fn serve_one<F, Fut>(mut socket: TcpStream, handler: Arc<F>) -> std::io::Result<()>
where
    F: Fn(String, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<Value>> + Send + 'static,
{
    let body = read_request_body(&mut socket).await?;
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = request["params"].clone();

    let response = match handler(method.clone(), params).await {
        Some(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
        None => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32601, "message": format!("method {} not found", method)}
        }),
    };
    let payload = response.to_string();

    let response_str = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        payload.len(),
        payload
    );
    socket.write_all(response_str.as_bytes()).await?;
    socket.shutdown().await
}

async fn read_request_body(socket: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut tmp).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&tmp[..n]);
    };

    let content_length = String::from_utf8_lossy(&buf[..header_end])
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut tmp).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&tmp[..n]);
    }

    Ok(buf[header_end..(header_end + content_length).min(buf.len())].to_vec())
}
