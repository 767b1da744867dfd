//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use fib_fanout::config::AppConfig;
use fib_fanout::observability::trace::BaggageSpanProcessor;
use fib_fanout::observability::{Telemetry, Tracing};
use fib_fanout::HttpServer;
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A running service plus the spans it has finished.
#[allow(dead_code)]
pub struct TestService {
    pub addr: SocketAddr,
    pub exporter: InMemorySpanExporter,
    pub provider: SdkTracerProvider,
}

#[allow(dead_code)]
impl TestService {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

/// Start the service on an ephemeral loopback port whose children call itself.
#[allow(dead_code)]
pub async fn start_service() -> TestService {
    start_service_with_children(None).await
}

/// Start the service, sending child calls to `children` instead of itself when given.
pub async fn start_service_with_children(children: Option<SocketAddr>) -> TestService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = AppConfig::default();
    config.listener.bind_address = addr.to_string();
    config.fanout.self_url = format!("http://{}", children.unwrap_or(addr));
    config.observability.metrics_enabled = false;
    config.exporters.stdout = false;

    let exporter = InMemorySpanExporter::default();
    let provider = SdkTracerProvider::builder()
        .with_span_processor(BaggageSpanProcessor)
        .with_simple_exporter(exporter.clone())
        .build();
    let telemetry = Telemetry::new(Tracing::from_provider(provider.clone()), &config.service);

    let server = HttpServer::new(config, telemetry).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    TestService { addr, exporter, provider }
}

/// Plain client that never goes through an environment proxy.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// One request observed by a mock backend.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub index: Option<i64>,
    pub headers: Vec<(String, String)>,
}

#[allow(dead_code)]
impl SeenRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Start a mock `/fib` backend on an ephemeral port.
///
/// `f` maps the requested index to a 200 body; `None` drops the connection
/// without answering, which the caller sees as a network error.
#[allow(dead_code)]
pub async fn start_indexed_backend<F>(f: F) -> (SocketAddr, Arc<Mutex<Vec<SeenRequest>>>)
where
    F: Fn(i64) -> Option<String> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let log = seen.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        log.lock().unwrap().push(request.clone());

                        let body = request.index.and_then(|i| (*f)(i));
                        let Some(body) = body else {
                            // Hang up without a response.
                            return;
                        };
                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, seen)
}

#[allow(dead_code)]
async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<SeenRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let text = String::from_utf8_lossy(&buf);
    let mut lines = text.split("\r\n");
    let target = lines.next()?.split(' ').nth(1)?.to_string();
    let index = target
        .split_once('?')
        .and_then(|(_, q)| q.split('&').find_map(|kv| kv.strip_prefix("i=")))
        .and_then(|v| v.parse().ok());
    let headers = lines
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    Some(SeenRequest { index, headers })
}
