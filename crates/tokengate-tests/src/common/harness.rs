// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! - [`TestServer`] drives the router in-process with `tower::ServiceExt`.
//! - [`LiveServer`] binds a real listener on loopback and speaks HTTP/1.1
//!   over a plain TCP stream.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::Router;
use tokengate_api::{ApiResult, ApiServer, InMemoryAuditSink, ManualClock};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceExt;

// =============================================================================
// TestResponse
// =============================================================================

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body as text.
    pub body: String,
}

// =============================================================================
// TestServer
// =============================================================================

/// In-process server under test.
pub struct TestServer {
    router: Router,
    server: ApiServer,
    clock: Arc<ManualClock>,
    audit: InMemoryAuditSink,
}

impl TestServer {
    /// Wraps a built server.
    pub fn new(server: ApiServer, clock: Arc<ManualClock>, audit: InMemoryAuditSink) -> Self {
        Self {
            router: server.router(),
            server,
            clock,
            audit,
        }
    }

    /// The server under test.
    pub fn server(&self) -> &ApiServer {
        &self.server
    }

    /// The clock driving token issuance and verification.
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Audit records captured so far.
    pub fn audit(&self) -> &InMemoryAuditSink {
        &self.audit
    }

    /// Sends a GET with an optional `Authorization` value.
    pub async fn get(&self, path: &str, authorization: Option<&str>) -> TestResponse {
        self.send(Method::GET, path, authorization).await
    }

    /// Sends a request with an optional `Authorization` value.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        authorization: Option<&str>,
    ) -> TestResponse {
        let value = authorization.map(|v| HeaderValue::from_str(v).expect("valid header value"));
        self.send_header(method, path, value).await
    }

    /// Sends a request with an arbitrary `Authorization` header value.
    pub async fn send_header(
        &self,
        method: Method,
        path: &str,
        authorization: Option<HeaderValue>,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        let request = request.body(Body::empty()).expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should buffer");

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).expect("utf-8 body"),
        }
    }

    /// Fetches a token from an issuance endpoint.
    pub async fn fetch_token(&self, path: &str) -> String {
        let response = self.get(path, None).await;
        assert_eq!(response.status, StatusCode::OK, "issuance failed: {path}");
        response.body
    }
}

// =============================================================================
// LiveServer
// =============================================================================

/// A server bound to an ephemeral loopback port.
pub struct LiveServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<ApiResult<()>>,
}

impl LiveServer {
    /// Binds `127.0.0.1:0` and serves until [`LiveServer::shutdown`].
    pub async fn start(server: ApiServer) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");

        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(server.serve(listener, async move {
            let _ = rx.await;
        }));

        Self {
            addr,
            shutdown: Some(tx),
            task,
        }
    }

    /// Bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Sends one request over a fresh connection.
    pub async fn request(&self, method: &str, path: &str, authorization: Option<&str>) -> TestResponse {
        let mut stream = TcpStream::connect(self.addr).await.expect("connect");

        let mut raw = format!("{method} {path} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n", self.addr);
        if let Some(value) = authorization {
            raw.push_str(&format!("Authorization: {value}\r\n"));
        }
        raw.push_str("\r\n");
        stream.write_all(raw.as_bytes()).await.expect("write request");

        let mut buf = Vec::new();
        tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut buf))
            .await
            .expect("response within timeout")
            .expect("read response");

        parse_response(&String::from_utf8(buf).expect("utf-8 response"))
    }

    /// Signals graceful shutdown and waits for the server task.
    pub async fn shutdown(mut self) -> ApiResult<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), &mut self.task)
            .await
            .expect("server should stop")
            .expect("server task should not panic")
    }
}

/// Parses a `Connection: close` HTTP/1.1 response.
fn parse_response(raw: &str) -> TestResponse {
    let (head, body) = raw.split_once("\r\n\r\n").unwrap_or((raw, ""));
    let mut lines = head.split("\r\n");

    let status_line = lines.next().expect("status line");
    let code: u16 = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|c| c.parse().ok())
        .expect("status code");

    let mut headers = HeaderMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.append(
                header::HeaderName::from_bytes(name.trim().as_bytes()).expect("header name"),
                HeaderValue::from_str(value.trim()).expect("header value"),
            );
        }
    }

    let body = if headers
        .get(header::TRANSFER_ENCODING)
        .is_some_and(|v| v == "chunked")
    {
        decode_chunked(body)
    } else {
        body.to_string()
    };

    TestResponse {
        status: StatusCode::from_u16(code).expect("valid status"),
        headers,
        body,
    }
}

fn decode_chunked(mut body: &str) -> String {
    let mut out = String::new();
    while let Some((size, rest)) = body.split_once("\r\n") {
        let size = usize::from_str_radix(size.trim(), 16).unwrap_or(0);
        if size == 0 {
            break;
        }
        out.push_str(&rest[..size]);
        body = rest[size..].trim_start_matches("\r\n");
    }
    out
}
