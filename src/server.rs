//! HTTP surface for the dashboard
//!
//! Simple HTTP/1.1 handling on tokio: read the request head, route on
//! method and path, answer with JSON and close. View computations run on the
//! blocking pool so other connections keep being served while fact files stream.

use crate::config::{AppConfig, DataCatalog};
use crate::dimensions::DimensionCache;
use crate::engine::{FactSources, JoinPipeline};
use crate::error::Result;
use crate::schema::FactKind;
use crate::views::{run_view_json, ViewKind};
use serde_json::json;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

const MAX_REQUEST_HEAD: usize = 8 * 1024;
const ROOT_MESSAGE: &str = "✅ Weather sales backend is running!";

/// Everything a request needs: configuration plus the read-only dimension cache.
pub struct AppState {
    config: AppConfig,
    catalog: DataCatalog,
    cache: DimensionCache,
}

impl AppState {
    pub fn new(config: AppConfig, cache: DimensionCache) -> Self {
        Self {
            catalog: config.catalog(),
            config,
            cache,
        }
    }

    /// Load every dimension table from the configured data directory.
    pub fn load(config: AppConfig) -> Result<Self> {
        let catalog = config.catalog();
        let cache = DimensionCache::load(|kind| catalog.dimension_source(kind))?;
        Ok(Self::new(config, cache))
    }

    pub fn cache(&self) -> &DimensionCache {
        &self.cache
    }

    /// Compute one view against the fact files as they are on disk now.
    pub fn run_view(&self, kind: ViewKind) -> Result<serde_json::Value> {
        let weather = self.catalog.fact_source(FactKind::Weather);
        let sales = self.catalog.fact_source(FactKind::Sales);
        let pipeline = JoinPipeline::new(
            &self.cache,
            FactSources {
                weather: &weather,
                sales: &sales,
            },
            &self.config.filter_country,
        );
        run_view_json(kind, &pipeline)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.to_string(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: String::new(),
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, &json!({ "error": message }))
    }

    pub fn body_json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }

    pub fn to_http(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: {}\r\n\
             Access-Control-Allow-Origin: *\r\n\
             Access-Control-Allow-Methods: GET, POST, PUT, DELETE, OPTIONS\r\n\
             Access-Control-Allow-Headers: Content-Type, Authorization\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n\
             {}",
            self.status,
            status_text(self.status),
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Method and normalized path of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub path: String,
}

/// Parse the first request line; the query string and trailing slashes are dropped.
pub fn parse_request_line(request: &str) -> Option<RequestLine> {
    let first = request.lines().next()?;
    let mut parts = first.split_whitespace();
    let method = parts.next()?.to_uppercase();
    let target = parts.next()?;

    let path = target.split('?').next().unwrap_or("");
    let path = path.trim_end_matches('/');
    let path = if path.is_empty() { "/" } else { path };

    Some(RequestLine {
        method,
        path: path.to_string(),
    })
}

pub async fn handle_request(state: Arc<AppState>, request: &str) -> HttpResponse {
    let line = match parse_request_line(request) {
        Some(line) => line,
        None => return HttpResponse::error(400, "Bad Request"),
    };
    debug!("Request: {} {}", line.method, line.path);

    if line.method == "OPTIONS" {
        return HttpResponse::empty(204);
    }

    let view = ViewKind::from_route(&line.path);
    let known = view.is_some() || matches!(line.path.as_str(), "/" | "/health" | "/favicon.ico");
    if !known {
        return HttpResponse::error(404, &format!("Route not found: {}", line.path));
    }
    if line.method != "GET" {
        return HttpResponse::error(405, &format!("Method {} not allowed", line.method));
    }

    match (line.path.as_str(), view) {
        ("/health", _) => HttpResponse::json(200, &json!({ "status": "healthy" })),
        ("/", _) => HttpResponse::text(200, ROOT_MESSAGE),
        ("/favicon.ico", _) => HttpResponse::empty(204),
        (_, Some(kind)) => serve_view(state, kind).await,
        (path, None) => HttpResponse::error(404, &format!("Route not found: {}", path)),
    }
}

async fn serve_view(state: Arc<AppState>, kind: ViewKind) -> HttpResponse {
    let outcome = tokio::task::spawn_blocking(move || state.run_view(kind)).await;
    match outcome {
        Ok(Ok(rows)) => HttpResponse::json(200, &rows),
        Ok(Err(e)) => {
            error!("Error in {}: {}", kind, e);
            HttpResponse::error(500, &kind.failure_message())
        }
        Err(e) => {
            error!("Error in {}: view task failed: {}", kind, e);
            HttpResponse::error(500, &kind.failure_message())
        }
    }
}

/// Read the request head (up to the blank line), answer it, close.
pub async fn handle_connection(mut stream: TcpStream, state: Arc<AppState>) {
    let mut buffer = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                buffer.extend_from_slice(&chunk[..n]);
                if buffer.windows(4).any(|w| w == b"\r\n\r\n") || buffer.len() >= MAX_REQUEST_HEAD {
                    break;
                }
            }
            Err(e) => {
                warn!("Failed to read from stream: {}", e);
                return;
            }
        }
    }
    if buffer.is_empty() {
        return;
    }

    let request = String::from_utf8_lossy(&buffer);
    let response = handle_request(state, &request).await;

    if let Err(e) = stream.write_all(response.to_http().as_bytes()).await {
        warn!("Failed to write response: {}", e);
    }
    let _ = stream.shutdown().await;
}

/// Accept connections until the listener fails.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    info!("🚀 Server running on http://{}", listener.local_addr()?);
    loop {
        let (stream, addr) = listener.accept().await?;
        debug!("New connection from: {}", addr);
        tokio::spawn(handle_connection(stream, Arc::clone(&state)));
    }
}
