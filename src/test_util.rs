use std::sync::Once;

use reqwest::StatusCode;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::mpsc::{unbounded_channel, UnboundedReceiver},
};

static INIT: Once = Once::new();

pub(crate) fn setup() {
    INIT.call_once(|| {
        simple_logger::init_with_level(log::Level::Debug).unwrap();

        // 只有访问真实服务的测试需要 .env
        let _ = dotenvy::dotenv();
    });
}

/// 本地服务收到的请求
#[derive(Debug, Clone)]
pub(crate) struct ReceivedRequest {
    /// 例如 `POST /api/v3/write_lp?db=sensors HTTP/1.1`
    pub request_line: String,

    /// 头名字都是小写的
    pub headers: Vec<(String, String)>,

    pub body: Vec<u8>,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// 固定的响应：请求路径（不含查询参数）、状态码、响应内容
pub(crate) type StubRoute = (&'static str, u16, &'static str);

/// 在本地随机端口上启动一个 HTTP 服务，按请求路径返回固定的响应，没有匹配的路径返回 404。
///
/// 返回服务地址和收到的请求
pub(crate) async fn serve_stub(routes: Vec<StubRoute>) -> (String, UnboundedReceiver<ReceivedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let Ok(req) = read_request(&mut stream).await else {
                continue;
            };

            let path = req.request_line.split(' ').nth(1).unwrap_or_default().split('?').next().unwrap_or_default().to_string();
            let (status, body) = routes.iter().find(|(p, _, _)| *p == path).map(|(_, s, b)| (*s, *b)).unwrap_or((404, ""));

            let _ = tx.send(req);

            let reason = StatusCode::from_u16(status).ok().and_then(|s| s.canonical_reason()).unwrap_or("Unknown");
            let resp = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );

            let _ = stream.write_all(resp.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (format!("http://{}", addr), rx)
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<ReceivedRequest> {
    let mut buf = vec![];
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);

    Ok(ReceivedRequest { request_line, headers, body })
}
