//! Shared fixtures for hwdash-core integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hwdash_core::{
    CpuMetrics, FetchError, MetricsSnapshot, NetworkInfo, RecordingRegions, SnapshotSource,
};
use tokio::time::Instant;

/// Handle kept by the test after the source moves into a scheduler.
#[derive(Clone, Default)]
pub struct Probe {
    calls: Arc<AtomicUsize>,
    started_at: Arc<Mutex<Vec<Instant>>>,
}

impl Probe {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn started_at(&self) -> Vec<Instant> {
        self.started_at.lock().unwrap().clone()
    }
}

/// Plays back a fixed list of outcomes, then repeats `fallback` forever.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<MetricsSnapshot, FetchError>>>,
    fallback: Result<MetricsSnapshot, FetchError>,
    delay: Duration,
    probe: Probe,
}

impl ScriptedSource {
    pub fn new(
        script: Vec<Result<MetricsSnapshot, FetchError>>,
        fallback: Result<MetricsSnapshot, FetchError>,
    ) -> (Self, Probe) {
        let probe = Probe::default();
        let source = Self {
            script: Mutex::new(script.into()),
            fallback,
            delay: Duration::ZERO,
            probe: probe.clone(),
        };
        (source, probe)
    }

    /// Every fetch takes `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl SnapshotSource for ScriptedSource {
    async fn fetch(&self) -> Result<MetricsSnapshot, FetchError> {
        self.probe.calls.fetch_add(1, Ordering::SeqCst);
        self.probe.started_at.lock().unwrap().push(Instant::now());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        next
    }
}

pub fn shared_regions() -> Arc<Mutex<RecordingRegions>> {
    Arc::new(Mutex::new(RecordingRegions::default()))
}

pub fn cpu_snapshot(usage: f64) -> MetricsSnapshot {
    MetricsSnapshot {
        cpu: Some(CpuMetrics {
            usage: Some(usage),
            temperature: None,
        }),
        ..Default::default()
    }
}

pub fn identity_snapshot(hostname: &str, ip: &str) -> MetricsSnapshot {
    MetricsSnapshot {
        network: Some(NetworkInfo {
            hostname: Some(hostname.to_string()),
            ip: Some(ip.to_string()),
        }),
        ..Default::default()
    }
}

pub fn refused(host: &str) -> FetchError {
    FetchError::Unreachable {
        host: host.to_string(),
        port: hwdash_core::METRICS_PORT,
    }
}
