//! CSV conversion HTTP service.
//!
//! One endpoint: `POST /api/convert` takes a CSV document as the request body
//! and returns a JSON validation-and-aggregation summary. `GET /health`
//! answers `ok` for liveness probes.

pub mod records;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::{TokioIo, TokioTimer};
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Routes one request. Generic over the body type so tests can drive it
/// directly with an in-memory body.
pub async fn handle<B>(req: Request<B>) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match (&method, path.as_str()) {
        (&Method::POST, "/api/convert") => convert_response(req).await,
        (_, "/api/convert") => text_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"),
        (&Method::GET, "/health") => text_response(StatusCode::OK, "ok"),
        _ => text_response(StatusCode::NOT_FOUND, "Not Found"),
    };

    Ok(response)
}

/// Reads the body, converts it, and renders the JSON report.
async fn convert_response<B>(req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    // Filename travels in a header since the body is the raw CSV
    let filename = req
        .headers()
        .get("x-filename")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("upload.csv")
        .to_string();

    let bytes = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("Failed to read request body: {}", e);
            return text_response(StatusCode::BAD_REQUEST, "Failed to read request body");
        }
    };

    let csv_text = match std::str::from_utf8(&bytes) {
        Ok(text) => text,
        Err(_) => {
            warn!("Rejected non-UTF-8 upload: {}", filename);
            return text_response(
                StatusCode::BAD_REQUEST,
                "File encoding error: body must be UTF-8",
            );
        }
    };

    let report = records::convert(&filename, csv_text);

    match serde_json::to_vec(&report) {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(body)))
            .unwrap(),
        Err(e) => {
            error!("Failed to serialize report: {}", e);
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// Binds the address and serves connections until the process is stopped.
pub async fn serve(bind: &str) -> Result<()> {
    let addr: SocketAddr =
        bind.parse().with_context(|| format!("Invalid bind address: {}", bind))?;

    let listener =
        TcpListener::bind(addr).await.with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    loop {
        let (tcp, peer) = listener.accept().await.context("Failed to accept connection")?;
        let io = TokioIo::new(tcp);

        tokio::task::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, service_fn(handle))
                .await
            {
                warn!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }
}
