//! Deterministic stand-ins for [`HttpClient`] and [`Saver`].

use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use dwl_core::download::{BodyReader, DownloadError, HttpClient, HttpResponse};
use dwl_core::saver::{SaveError, Saver};
use reqwest::{Request, StatusCode};
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

/// Decrements the in-flight counter even when the request future is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Client answering from a path → (status, body) table, 404 otherwise.
///
/// Every call sleeps for `delay` first, so tests can hold slots open.
#[derive(Default)]
pub struct FakeClient {
    routes: HashMap<String, (StatusCode, Vec<u8>)>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: &str, status: StatusCode, body: &[u8]) -> Self {
        self.routes.insert(path.to_string(), (status, body.to_vec()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// URLs requested so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Highest number of requests observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for FakeClient {
    async fn execute(&self, request: Request) -> Result<HttpResponse, DownloadError> {
        let url = request.url().clone();
        self.requests.lock().unwrap().push(url.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        let (status, body) = self
            .routes
            .get(url.path())
            .cloned()
            .unwrap_or((StatusCode::NOT_FOUND, Vec::new()));
        Ok(HttpResponse::new(status, Cursor::new(body)))
    }
}

/// Body that yields `first_chunk` and then never produces another byte.
pub struct StalledBody {
    first_chunk: Option<Vec<u8>>,
}

impl AsyncRead for StalledBody {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.first_chunk.take() {
            Some(chunk) => {
                buf.put_slice(&chunk);
                Poll::Ready(Ok(()))
            }
            None => Poll::Pending,
        }
    }
}

/// Client whose `200 OK` body stalls after `chunk_len` bytes.
pub struct StallingClient {
    chunk_len: usize,
}

impl StallingClient {
    pub fn new(chunk_len: usize) -> Self {
        Self { chunk_len }
    }
}

#[async_trait]
impl HttpClient for StallingClient {
    async fn execute(&self, _request: Request) -> Result<HttpResponse, DownloadError> {
        let body = StalledBody {
            first_chunk: Some(vec![0x5A; self.chunk_len]),
        };
        Ok(HttpResponse::new(StatusCode::OK, body))
    }
}

/// Saver that records bodies in memory.
///
/// Names in `failing` return an error, names in `panicking` panic.
#[derive(Default)]
pub struct MemorySaver {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn panicking_on(mut self, name: &str) -> Self {
        self.panicking.insert(name.to_string());
        self
    }

    /// Saved names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .saved
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn body(&self, name: &str) -> Option<Vec<u8>> {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .find(|(saved, _)| saved == name)
            .map(|(_, body)| body.clone())
    }
}

#[async_trait]
impl Saver for MemorySaver {
    async fn save(&self, name: &str, body: &mut BodyReader) -> Result<u64, SaveError> {
        if self.panicking.contains(name) {
            panic!("saver asked to panic on {name}");
        }
        if self.failing.contains(name) {
            return Err(SaveError::io(
                name,
                std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full"),
            ));
        }

        let mut data = Vec::new();
        body.read_to_end(&mut data)
            .await
            .map_err(|e| SaveError::io(name, e))?;
        let len = data.len() as u64;
        self.saved.lock().unwrap().push((name.to_string(), data));
        Ok(len)
    }
}
