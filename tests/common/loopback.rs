//! Minimal HTTP/1.1 listener on 127.0.0.1 that plays CyREST for the real client.
//!
//! Each connection carries one request and is closed after the reply.
//! Requests are recorded in arrival order; unmatched routes answer 404.

use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use cytoscape_mcp::config::CytoscapeConfig;
use cytoscape_mcp::cyrest::CyRestClient;

/// One request as it reached the listener.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Percent-encoded path, without the query.
    pub path: String,
    pub query: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }

    /// `METHOD /path` for compact assertions.
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: &'static str,
    path: &'static str,
    status: u16,
    body: String,
}

pub struct Loopback {
    port: u16,
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Loopback {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let routes: Arc<Mutex<Vec<Route>>> = Arc::default();
        let requests: Arc<Mutex<Vec<Recorded>>> = Arc::default();

        let (accept_routes, accept_requests) = (routes.clone(), requests.clone());
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = accept_routes.clone();
                let requests = accept_requests.clone();
                tokio::spawn(async move {
                    let _ = serve_one(stream, routes, requests).await;
                });
            }
        });

        Self {
            port,
            routes,
            requests,
        }
    }

    /// Answer `method path` with `status` and `body`.
    pub fn route(&self, method: &'static str, path: &'static str, status: u16, body: impl Into<String>) -> &Self {
        self.routes.lock().unwrap().push(Route {
            method,
            path,
            status,
            body: body.into(),
        });
        self
    }

    pub fn client(&self) -> CyRestClient {
        let config = CytoscapeConfig {
            cytoscape_host: "127.0.0.1".into(),
            cytoscape_port: self.port,
            request_timeout_secs: 5,
            ..CytoscapeConfig::default()
        };
        CyRestClient::new(&config).unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.requests().iter().map(Recorded::line).collect()
    }
}

async fn serve_one(
    stream: TcpStream,
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).await?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await?;

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (target.clone(), None),
    };
    let route = routes
        .lock()
        .unwrap()
        .iter()
        .find(|r| r.method == method && r.path == path)
        .cloned();
    requests.lock().unwrap().push(Recorded {
        method,
        path,
        query,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let (status, reply) = match route {
        Some(route) => (route.status, route.body),
        None => (
            404,
            r#"{"data":{},"errors":[{"status":404,"message":"no such resource"}]}"#.to_string(),
        ),
    };
    let response = format!(
        "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reply.len(),
        reply
    );
    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
