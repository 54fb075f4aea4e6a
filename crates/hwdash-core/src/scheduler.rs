//! Poll scheduler: drives fetch → render cycles at a fixed cadence.
//!
//! A [`PollScheduler`] owns its timer and event channel explicitly, so each
//! instance can be started, stopped and dropped on its own.
//!
//! Timeline after [`PollScheduler::start`]:
//!
//! ```text
//! t=0          startup cycle (before any tick)
//! t=interval   tick cycle
//! t=2*interval tick cycle
//! ...          + one out-of-band cycle per offline→online transition
//!              + one per HostEvent::RefreshRequested
//! ```
//!
//! Every cycle runs as its own task. A failed or slow cycle never cancels or
//! delays the next tick, and there is no overlap guard: a fetch that outlasts
//! the interval can still be in flight when the next one starts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::DEFAULT_POLL_INTERVAL;
use crate::error::FetchError;
use crate::regions::DisplayRegions;
use crate::render::{render, render_error};
use crate::transport::SnapshotSource;

// ---------------------------------------------------------------------------
// Config, events, stats
// ---------------------------------------------------------------------------

/// Scheduler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Time between scheduled cycles.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Signals from the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Host connectivity came back. Triggers a cycle only after `Offline`.
    Online,
    /// Host connectivity was lost. Logged; the display is left alone.
    Offline,
    /// The user asked for an immediate refresh.
    RefreshRequested,
}

/// Counters shared between the scheduler, its cycles and the UI.
#[derive(Debug, Default)]
pub struct CycleStats {
    started: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl CycleStats {
    pub fn started(&self) -> u64 {
        self.started.load(Ordering::Relaxed)
    }
    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Relaxed)
    }
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
    /// Cycles started but not yet rendered.
    pub fn in_flight(&self) -> u64 {
        self.started().saturating_sub(self.succeeded() + self.failed())
    }
}

/// What one cycle ended up painting.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Rendered,
    Failed(FetchError),
}

// ---------------------------------------------------------------------------
// One cycle
// ---------------------------------------------------------------------------

/// Fetch once, then paint either the snapshot or the error.
///
/// The regions lock is taken only after the fetch completes and is released
/// before returning, so it is never held across an await.
pub async fn run_cycle<S, R>(source: &S, regions: &Mutex<R>, stats: &CycleStats) -> CycleOutcome
where
    S: SnapshotSource,
    R: DisplayRegions,
{
    stats.started.fetch_add(1, Ordering::Relaxed);

    match source.fetch().await {
        Ok(snapshot) => {
            render(&mut *lock(regions), &snapshot);
            stats.succeeded.fetch_add(1, Ordering::Relaxed);
            debug!("cycle rendered");
            CycleOutcome::Rendered
        }
        Err(e) => {
            warn!("poll cycle failed ({}): {e}", e.kind());
            render_error(&mut *lock(regions), &e);
            stats.failed.fetch_add(1, Ordering::Relaxed);
            CycleOutcome::Failed(e)
        }
    }
}

/// A panic inside a render must not wedge every later cycle.
fn lock<R>(regions: &Mutex<R>) -> MutexGuard<'_, R> {
    match regions.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

// ---------------------------------------------------------------------------
// PollScheduler
// ---------------------------------------------------------------------------

struct CycleContext<S, R> {
    source: Arc<S>,
    regions: Arc<Mutex<R>>,
    stats: Arc<CycleStats>,
}

impl<S, R> CycleContext<S, R>
where
    S: SnapshotSource,
    R: DisplayRegions + Send + 'static,
{
    fn spawn_cycle(&self, trigger: &'static str) {
        debug!("starting {trigger} cycle");
        let source = Arc::clone(&self.source);
        let regions = Arc::clone(&self.regions);
        let stats = Arc::clone(&self.stats);
        tokio::spawn(async move {
            run_cycle(&*source, &regions, &stats).await;
        });
    }
}

/// Repeating fetch → render driver with an explicit lifecycle.
pub struct PollScheduler<S, R> {
    source: Arc<S>,
    regions: Arc<Mutex<R>>,
    config: PollConfig,
    stats: Arc<CycleStats>,
    events_tx: UnboundedSender<HostEvent>,
    events_rx: Option<UnboundedReceiver<HostEvent>>,
    driver: Option<JoinHandle<()>>,
}

impl<S, R> PollScheduler<S, R>
where
    S: SnapshotSource,
    R: DisplayRegions + Send + 'static,
{
    pub fn new(source: S, regions: Arc<Mutex<R>>, config: PollConfig) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            source: Arc::new(source),
            regions,
            config,
            stats: Arc::new(CycleStats::default()),
            events_tx,
            events_rx: Some(events_rx),
            driver: None,
        }
    }

    /// Begin polling on the current tokio runtime. No-op while running.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        // The previous receiver died with the previous driver.
        let events_rx = match self.events_rx.take() {
            Some(rx) => rx,
            None => {
                let (tx, rx) = unbounded_channel();
                self.events_tx = tx;
                rx
            }
        };

        let ctx = CycleContext {
            source: Arc::clone(&self.source),
            regions: Arc::clone(&self.regions),
            stats: Arc::clone(&self.stats),
        };
        info!("polling every {} ms", self.config.interval.as_millis());
        self.driver = Some(tokio::spawn(drive(ctx, self.config.interval, events_rx)));
    }

    /// Stop scheduling new cycles. A cycle already in flight still renders.
    pub fn stop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
            info!("polling stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.driver.as_ref().is_some_and(|d| !d.is_finished())
    }

    /// Sender for host events. Senders taken before a `stop()`/`start()`
    /// pair are disconnected by the restart; take a fresh one.
    pub fn events(&self) -> UnboundedSender<HostEvent> {
        self.events_tx.clone()
    }

    pub fn stats(&self) -> Arc<CycleStats> {
        Arc::clone(&self.stats)
    }

    pub fn regions(&self) -> &Arc<Mutex<R>> {
        &self.regions
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }
}

impl<S, R> Drop for PollScheduler<S, R> {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}

async fn drive<S, R>(
    ctx: CycleContext<S, R>,
    interval: Duration,
    mut events: UnboundedReceiver<HostEvent>,
) where
    S: SnapshotSource,
    R: DisplayRegions + Send + 'static,
{
    ctx.spawn_cycle("startup");

    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut online = true;
    let mut events_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => ctx.spawn_cycle("tick"),
            event = events.recv(), if events_open => match event {
                Some(HostEvent::Online) if !online => {
                    info!("connectivity restored, refreshing");
                    online = true;
                    ctx.spawn_cycle("online");
                }
                Some(HostEvent::Online) => debug!("online event while already online"),
                Some(HostEvent::Offline) => {
                    if online {
                        info!("connectivity lost");
                    }
                    online = false;
                }
                Some(HostEvent::RefreshRequested) => ctx.spawn_cycle("refresh"),
                None => events_open = false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::{BannerStyle, Gauge, RecordingRegions};
    use crate::snapshot::{CpuMetrics, MetricsSnapshot};

    struct FixedSource(Result<MetricsSnapshot, FetchError>);

    impl SnapshotSource for FixedSource {
        async fn fetch(&self) -> Result<MetricsSnapshot, FetchError> {
            self.0.clone()
        }
    }

    fn cpu(usage: f64) -> MetricsSnapshot {
        MetricsSnapshot {
            cpu: Some(CpuMetrics {
                usage: Some(usage),
                temperature: None,
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn successful_cycle_renders_and_counts() {
        let regions = Mutex::new(RecordingRegions::default());
        let stats = CycleStats::default();
        let outcome = run_cycle(&FixedSource(Ok(cpu(12.0))), &regions, &stats).await;

        assert_eq!(outcome, CycleOutcome::Rendered);
        let regions = regions.lock().unwrap();
        assert_eq!(regions.gauge(Gauge::Cpu).unwrap().percent, 12.0);
        assert_eq!(regions.banner().unwrap().style, BannerStyle::Connected);
        assert_eq!((stats.started(), stats.succeeded(), stats.failed()), (1, 1, 0));
        assert_eq!(stats.in_flight(), 0);
    }

    #[tokio::test]
    async fn failed_cycle_renders_error_banner() {
        let regions = Mutex::new(RecordingRegions::default());
        let stats = CycleStats::default();
        let outcome = run_cycle(
            &FixedSource(Err(FetchError::HttpStatus(500))),
            &regions,
            &stats,
        )
        .await;

        assert_eq!(outcome, CycleOutcome::Failed(FetchError::HttpStatus(500)));
        let regions = regions.lock().unwrap();
        let banner = regions.banner().unwrap();
        assert_eq!(banner.style, BannerStyle::Error);
        assert_eq!(banner.text, "Error: HTTP 500");
        assert_eq!(stats.failed(), 1);
    }

    #[tokio::test]
    async fn poisoned_regions_still_render() {
        let regions = Arc::new(Mutex::new(RecordingRegions::default()));
        let poison = Arc::clone(&regions);
        let _ = std::thread::spawn(move || {
            let _guard = poison.lock().unwrap();
            panic!("render blew up");
        })
        .join();
        assert!(regions.is_poisoned());

        let stats = CycleStats::default();
        run_cycle(&FixedSource(Ok(cpu(3.0))), &regions, &stats).await;
        assert_eq!(stats.succeeded(), 1);
    }

    #[test]
    fn default_interval_is_one_second() {
        assert_eq!(PollConfig::default().interval, Duration::from_millis(1000));
    }
}
