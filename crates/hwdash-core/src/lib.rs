//! # hwdash-core
//!
//! **A live view of a remote machine's hardware, one snapshot at a time.**
//!
//! `hwdash-core` polls a metrics endpoint, parses each response into a
//! [`MetricsSnapshot`], and paints it onto a set of named display regions.
//! Every layer is built to keep going: a refused connection, a 500, a garbled
//! body or a payload with half its fields missing never stops the next cycle.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::{Arc, Mutex};
//! use hwdash_core::{HttpTransport, MetricsEndpoint, PollConfig, PollScheduler, RecordingRegions};
//!
//! # async fn demo() {
//! let transport = HttpTransport::new(MetricsEndpoint::for_host("localhost"));
//! let regions = Arc::new(Mutex::new(RecordingRegions::default()));
//!
//! let mut scheduler = PollScheduler::new(transport, Arc::clone(&regions), PollConfig::default());
//! scheduler.start();
//! // ... the dashboard refreshes every second until:
//! scheduler.stop();
//! # }
//! ```
//!
//! ## Architecture
//!
//! PollScheduler → SnapshotSource (fetch + parse) → render / render_error → DisplayRegions
//!
//! - [`transport`]: one request per cycle, failures folded into [`FetchError`].
//! - [`render`]: field-by-field, best-effort mapping that cannot fail.
//! - [`regions`]: the [`DisplayRegions`] capability the UI implements.
//! - [`scheduler`]: fixed cadence, immediate startup cycle, connectivity events.

pub mod error;
pub mod regions;
pub mod render;
pub mod scheduler;
pub mod snapshot;
pub mod transport;

use std::time::Duration;

pub use error::FetchError;
pub use regions::{
    BannerStyle, BannerView, DisplayRegions, Gauge, GaugeView, RecordingRegions, Region,
    RegionContents, TableView,
};
pub use render::{EMPTY_MARKER, render, render_error};
pub use scheduler::{CycleOutcome, CycleStats, HostEvent, PollConfig, PollScheduler, run_cycle};
pub use snapshot::{
    CpuMetrics, DiskMetrics, GpuMetrics, MetricsSnapshot, NetworkInfo, ProcessEntry, RamMetrics,
};
pub use transport::{HttpTransport, MetricsEndpoint, SnapshotSource, fetch_snapshot};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Port the metrics server listens on.
pub const METRICS_PORT: u16 = 5000;

/// Path of the metrics endpoint on the server.
pub const METRICS_PATH: &str = "/api/metrics";

/// Time between scheduled poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
