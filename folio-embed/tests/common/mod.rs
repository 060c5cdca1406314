//! Loopback HTTP/1.1 server with canned answers

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub enum Reply {
    /// Answers request `n` with entry `n`, repeating the last entry after that.
    Statuses(Vec<(u16, &'static str)>),
    /// Reads the request and never answers.
    Stall,
}

impl Reply {
    pub fn always(status: u16, body: &'static str) -> Self {
        Reply::Statuses(vec![(status, body)])
    }
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<AtomicUsize>,
}

impl StubServer {
    pub async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(AtomicUsize::new(0));
        let reply = Arc::new(reply);

        let counter = requests.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(answer(socket, reply.clone(), counter.clone()));
            }
        });

        Self { base_url, requests }
    }

    /// Complete requests received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

async fn answer(mut socket: TcpStream, reply: Arc<Reply>, requests: Arc<AtomicUsize>) {
    if read_request(&mut socket).await.is_err() {
        return;
    }
    let n = requests.fetch_add(1, Ordering::SeqCst);

    match reply.as_ref() {
        Reply::Statuses(answers) => {
            let (status, body) = answers[n.min(answers.len() - 1)];
            let response = format!(
                "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
        Reply::Stall => tokio::time::sleep(Duration::from_secs(60)).await,
    }
}

/// Reads one request: the head up to the blank line, then `content-length` bytes.
async fn read_request(socket: &mut TcpStream) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= head_end + 4 + body_len {
            return Ok(());
        }
    }
}
