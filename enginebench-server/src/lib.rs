use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use rand::Rng;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub mod config;
use config::{BODY_FILL, DEFAULT_BODY_SIZE};

/// Stub engine configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: SocketAddr,
    /// Bytes in every response body.
    pub body_size: usize,
    /// Fixed latency added to every response.
    pub delay: Duration,
    /// Upper bound of a uniformly random latency added on top of `delay`.
    pub jitter: Duration,
    /// Grow the body by one byte per request served, so no two responses match in length.
    pub unstable_length: bool,
}

impl ServerConfig {
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            body_size: DEFAULT_BODY_SIZE,
            delay: Duration::ZERO,
            jitter: Duration::ZERO,
            unstable_length: false,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Requests answered so far.
    pub served: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config: Arc::new(config), served: Arc::new(AtomicU64::new(0)) }
    }

    /// Latency for the next response: `delay` plus up to `jitter`.
    fn latency(&self) -> Duration {
        let jitter_ms = self.config.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.config.delay;
        }
        let extra = rand::thread_rng().gen_range(0..=jitter_ms);
        self.config.delay + Duration::from_millis(extra)
    }
}

/// A stand-in engine that answers every GET with a fixed-size body.
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Get the server's configured address
    pub fn address(&self) -> SocketAddr {
        self.config.address
    }

    /// Create the application router with the given state
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(handle_page))
            .route("/*path", get(handle_page))
            .with_state(state)
    }

    /// Run the server, signalling `ready_tx` with the bound address once accepting connections
    pub async fn run(self, ready_tx: tokio::sync::oneshot::Sender<SocketAddr>) -> Result<(), Box<dyn std::error::Error>> {
        let app = Self::create_router(AppState::new(self.config.clone()));
        let listener = tokio::net::TcpListener::bind(self.config.address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, body_size = self.config.body_size, "stub engine listening");
        ready_tx.send(local_addr).ok();
        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Handler for every GET path: waits out the configured latency, then returns the body.
pub async fn handle_page(State(state): State<AppState>) -> Response {
    let latency = state.latency();
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }

    let served = state.served.fetch_add(1, Ordering::SeqCst);
    let mut len = state.config.body_size;
    if state.config.unstable_length {
        len += served as usize;
    }

    (StatusCode::OK, vec![BODY_FILL; len]).into_response()
}
