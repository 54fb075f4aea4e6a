//! Host connectivity watcher.
//!
//! Samples the kernel's per-interface `operstate` files and reports
//! transitions to the scheduler as [`HostEvent`]s. The host counts as online
//! while any non-loopback interface is up. Where `/sys/class/net` does not
//! exist the watcher exits at once and the host is assumed online.

use std::path::{Path, PathBuf};
use std::time::Duration;

use hwdash_core::HostEvent;
use log::{debug, info};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

pub const SYSFS_NET: &str = "/sys/class/net";
pub const SAMPLE_PERIOD: Duration = Duration::from_secs(2);

/// Whether any interface under `root` is usable, or `None` when `root`
/// cannot be read at all.
pub fn link_up(root: &Path) -> Option<bool> {
    let entries = std::fs::read_dir(root).ok()?;
    let up = entries.flatten().any(|entry| {
        if entry.file_name() == "lo" {
            return false;
        }
        std::fs::read_to_string(entry.path().join("operstate"))
            .map(|state| matches!(state.trim(), "up" | "unknown"))
            .unwrap_or(false)
    });
    Some(up)
}

/// Turns a stream of link samples into transition events.
#[derive(Debug)]
pub struct LinkTracker {
    online: bool,
}

impl Default for LinkTracker {
    fn default() -> Self {
        Self { online: true }
    }
}

impl LinkTracker {
    pub fn observe(&mut self, up: bool) -> Option<HostEvent> {
        if up == self.online {
            return None;
        }
        self.online = up;
        Some(if up {
            HostEvent::Online
        } else {
            HostEvent::Offline
        })
    }
}

/// Start watching `/sys/class/net` on the current tokio runtime.
pub fn spawn(events: UnboundedSender<HostEvent>) -> JoinHandle<()> {
    spawn_at(PathBuf::from(SYSFS_NET), SAMPLE_PERIOD, events)
}

pub fn spawn_at(
    root: PathBuf,
    period: Duration,
    events: UnboundedSender<HostEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tracker = LinkTracker::default();
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let Some(up) = link_up(&root) else {
                debug!("{} unavailable, connectivity watcher off", root.display());
                return;
            };
            if let Some(event) = tracker.observe(up) {
                info!("link state changed: {event:?}");
                if events.send(event).is_err() {
                    debug!("scheduler gone, connectivity watcher exiting");
                    return;
                }
            }
        }
    })
}
