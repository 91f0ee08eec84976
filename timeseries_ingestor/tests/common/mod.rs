#![allow(dead_code)]

use std::{
    collections::VecDeque,
    io,
    sync::{Arc, Mutex},
    time::Instant,
};

use async_trait::async_trait;
use tracing::subscriber::DefaultGuard;
use timeseries_ingestor::{
    models::{item::ItemId, request_params::PageRequest, sample::Sample, timestep::Timestep},
    providers::{InternalSnafu, PageSource, ProviderError},
};

pub type PageResult = Result<Option<Vec<Sample>>, ProviderError>;

/// A page source that replays a fixed script, then reports exhaustion.
pub struct ScriptedSource {
    script: Mutex<VecDeque<PageResult>>,
    seen: Mutex<Vec<(PageRequest, Instant)>>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = PageResult>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.seen.lock().unwrap().iter().map(|(r, _)| r.clone()).collect()
    }

    pub fn request_times(&self) -> Vec<Instant> {
        self.seen.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(&self, request: PageRequest) -> PageResult {
        self.seen.lock().unwrap().push((request, Instant::now()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Some(vec![])))
    }
}

pub fn item() -> ItemId {
    ItemId::from_u32(565).unwrap()
}

pub const STEP: Timestep = Timestep::FiveMinutes;

pub fn sample(ts: i64, high: f64) -> Sample {
    Sample {
        timestamp: ts,
        avg_high_price: Some(high),
        avg_low_price: Some(high - 1.0),
        high_price_volume: Some(10),
        low_price_volume: Some(5),
    }
}

/// `len` consecutive 5-minute samples starting at `start`, ascending.
pub fn page(start: i64, len: usize) -> Vec<Sample> {
    (0..len as i64).map(|i| sample(start + i * 300, 100.0)).collect()
}

pub fn ok(samples: Vec<Sample>) -> PageResult {
    Ok(Some(samples))
}

pub fn failure(message: &str) -> PageResult {
    Err(InternalSnafu { message }.build())
}

/// Collects formatted log lines written while its guard is alive.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Installs a subscriber for the current thread only.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
