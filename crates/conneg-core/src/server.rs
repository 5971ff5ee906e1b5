//! Native HTTP server implementation
//!
//! Serves an [`InMemoryHost`] over HTTP/1.1 using hyper with:
//! - One tokio task per connection
//! - SO_REUSEADDR / TCP_NODELAY listener tuning
//! - Shutdown on an arbitrary future, then connection draining

use crate::{Error, InMemoryHost, Method, Request, Response, Result, StatusCode};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub hostname: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            hostname: "127.0.0.1".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Socket address for `hostname:port`
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.hostname, self.port)
            .parse()
            .map_err(|e| Error::InvalidAddress(format!("{}:{}: {}", self.hostname, self.port, e)))
    }
}

/// Create a TCP socket with optimizations
pub fn create_optimized_socket(addr: &SocketAddr) -> std::io::Result<Socket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // SO_REUSEADDR - allow binding to address in TIME_WAIT
    socket.set_reuse_address(true)?;

    // TCP_NODELAY - disable Nagle's algorithm for lower latency
    socket.set_nodelay(true)?;

    socket.bind(&(*addr).into())?;
    socket.listen(1024)?;

    Ok(socket)
}

/// Bind a tokio listener for `config` (must run inside a tokio runtime)
pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    let addr = config.addr()?;
    let socket = create_optimized_socket(&addr)?;
    socket.set_nonblocking(true)?;
    let listener = TcpListener::from_std(socket.into())?;
    debug!(addr = %addr, "listener bound");
    Ok(listener)
}

/// Convert a hyper request to our Request type, collecting the body
pub async fn from_hyper_request<B>(req: hyper::Request<B>) -> Result<Request>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let (parts, body) = req.into_parts();
    let method: Method = parts.method.as_str().parse()?;

    let mut request = Request::new(method, parts.uri.path());
    request.query = parts.uri.query().map(|s| s.to_string());

    for (name, value) in &parts.headers {
        if let Ok(v) = value.to_str() {
            request.headers.push((name.to_string(), v.to_string()));
        }
    }

    request.body = body
        .collect()
        .await
        .map_err(|e| Error::Hyper(e.to_string()))?
        .to_bytes();

    Ok(request)
}

/// Convert our Response to hyper Response
pub fn to_hyper_response(res: Response) -> Result<hyper::Response<Full<Bytes>>> {
    let mut builder = hyper::Response::builder().status(res.status.as_u16());

    for (name, value) in &res.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Full::new(res.body))
        .map_err(|e| Error::Hyper(e.to_string()))
}

/// Tracks active connections for graceful shutdown
#[derive(Debug, Default)]
pub struct ConnectionTracker {
    active: AtomicU64,
    shutting_down: AtomicBool,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment(&self) {
        self.active.fetch_add(1, Ordering::SeqCst);
    }

    #[inline]
    pub fn decrement(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    pub fn start_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// Count a connection until the returned guard is dropped
    pub fn track(self: &Arc<Self>) -> ConnectionGuard {
        self.increment();
        ConnectionGuard {
            tracker: self.clone(),
        }
    }
}

/// Guard that releases a tracked connection on drop
pub struct ConnectionGuard {
    tracker: Arc<ConnectionTracker>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.tracker.decrement();
    }
}

/// Network front for an [`InMemoryHost`]
pub struct Server {
    host: Arc<InMemoryHost>,
    tracker: Arc<ConnectionTracker>,
}

impl Server {
    pub fn new(host: InMemoryHost) -> Self {
        Self {
            host: Arc::new(host),
            tracker: Arc::new(ConnectionTracker::new()),
        }
    }

    pub fn connections(&self) -> &ConnectionTracker {
        &self.tracker
    }

    /// Accept connections until `shutdown` resolves
    ///
    /// Connections already accepted keep running in their own tasks; use
    /// [`Server::drain`] to wait for them.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(addr = ?listener.local_addr().ok(), "serving");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    self.tracker.start_shutdown();
                    info!(active = self.tracker.count(), "shutdown requested");
                    return Ok(());
                }
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!(error = %e, "accept failed");
                            continue;
                        }
                    };

                    let host = self.host.clone();
                    let guard = self.tracker.track();

                    tokio::spawn(async move {
                        let _guard = guard;
                        let io = TokioIo::new(stream);
                        let service = service_fn(move |req| handle(host.clone(), req));

                        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                            debug!(peer = %peer, error = %e, "connection error");
                        }
                    });
                }
            }
        }
    }

    /// Wait for active connections to finish; false if `timeout` elapsed first
    pub async fn drain(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        while self.tracker.count() > 0 {
            if start.elapsed() >= timeout {
                warn!(active = self.tracker.count(), "drain timed out");
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        true
    }
}

async fn handle(
    host: Arc<InMemoryHost>,
    req: hyper::Request<Incoming>,
) -> std::result::Result<hyper::Response<Full<Bytes>>, Infallible> {
    let response = match from_hyper_request(req).await {
        Ok(request) => host.process_request(request),
        Err(e) => {
            warn!(error = %e, "rejecting request");
            Response::new(StatusCode::BAD_REQUEST)
        }
    };

    Ok(to_hyper_response(response).unwrap_or_else(|e| {
        error!(error = %e, "unrepresentable response");
        let mut fallback = hyper::Response::new(Full::new(Bytes::new()));
        *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    }))
}
