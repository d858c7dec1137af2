use async_trait::async_trait;
use enginebench_common::{BenchError, Result};
use std::sync::RwLock;
use std::time::Duration;

pub mod timer;
pub use timer::{timer_for, MonotonicTimer, Stopwatch, Timer, WallClockTimer};

/// Connections kept per host before the first capacity reservation.
pub const DEFAULT_POOL_CAPACITY: usize = 1;

/// Issues GET requests on behalf of the scheduler.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` and return the response body.
    ///
    /// Any status code counts as a response; only failures to obtain a body are errors.
    async fn get(&self, url: &str) -> Result<Vec<u8>>;

    /// Make room for at least `connections` concurrent requests per host.
    fn reserve_capacity(&self, _connections: usize) -> Result<()> {
        Ok(())
    }
}

/// Fetch `url`, giving up after `limit` when one is set.
///
/// Expiry surfaces as [`BenchError::Timeout`]; the request future is dropped.
pub async fn fetch(transport: &dyn Transport, url: &str, limit: Option<Duration>) -> Result<Vec<u8>> {
    let Some(limit) = limit else {
        return transport.get(url).await;
    };
    tokio::time::timeout(limit, transport.get(url))
        .await
        .unwrap_or_else(|_| Err(BenchError::Timeout(limit.as_millis() as u64)))
}

struct Pool {
    capacity: usize,
    client: reqwest::Client,
}

/// reqwest-backed transport whose keep-alive pool grows with the concurrency level.
///
/// An undersized pool closes connections between requests, so every run would pay
/// connection setup on top of the latency being measured.
pub struct HttpTransport {
    pool: RwLock<Pool>,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_capacity(DEFAULT_POOL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let client = build_client(capacity)?;
        Ok(Self { pool: RwLock::new(Pool { capacity, client }) })
    }

    pub fn capacity(&self) -> usize {
        self.pool.read().unwrap_or_else(|e| e.into_inner()).capacity
    }

    fn client(&self) -> reqwest::Client {
        self.pool.read().unwrap_or_else(|e| e.into_inner()).client.clone()
    }
}

fn build_client(capacity: usize) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(capacity)
        .build()
        .map_err(|e| BenchError::Configuration(format!("cannot build connection pool of {capacity}: {e}")))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| BenchError::Network(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BenchError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    fn reserve_capacity(&self, connections: usize) -> Result<()> {
        let mut pool = self.pool.write().unwrap_or_else(|e| e.into_inner());
        if connections <= pool.capacity {
            return Ok(());
        }

        pool.client = build_client(connections)?;
        pool.capacity = connections;
        tracing::debug!(connections, "connection pool resized");
        Ok(())
    }
}
