//! Render engine and error surface.
//!
//! [`render`] maps a snapshot onto the display one field at a time. It cannot
//! fail: a missing group leaves its gauge untouched, a missing value in a
//! table becomes [`EMPTY_MARKER`], and nothing here panics on odd input.
//!
//! [`render_error`] is the fallback path for a failed cycle. It only touches
//! the shared banner, so every other region keeps its last good value.

use crate::METRICS_PORT;
use crate::error::FetchError;
use crate::regions::{BannerStyle, BannerView, DisplayRegions, Gauge, GaugeView, TableView};
use crate::snapshot::{MetricsSnapshot, ProcessEntry};

/// Placeholder for a value the snapshot did not carry.
pub const EMPTY_MARKER: &str = "—";

/// Header row of the process table.
pub const PROCESS_HEADER: [&str; 4] = ["Process name", "CPU", "RAM", "GPU"];

/// Row labels of the temperature table, top to bottom.
pub const TEMPERATURE_ROWS: [&str; 3] = ["CPU", "GPU", "SSD"];

// ---------------------------------------------------------------------------
// Success path
// ---------------------------------------------------------------------------

/// Paint `snapshot` onto `regions`.
pub fn render<R: DisplayRegions + ?Sized>(regions: &mut R, snapshot: &MetricsSnapshot) {
    render_gauges(regions, snapshot);
    render_disk_label(regions, snapshot);
    regions.set_temperature_table(temperature_table(snapshot));
    regions.set_process_table(process_table(snapshot.processes.as_deref()));
    regions.set_banner(network_banner(snapshot));
}

fn render_gauges<R: DisplayRegions + ?Sized>(regions: &mut R, snapshot: &MetricsSnapshot) {
    let usages = [
        (Gauge::Cpu, snapshot.cpu.as_ref().and_then(|m| m.usage)),
        (Gauge::Ram, snapshot.ram.as_ref().and_then(|m| m.usage)),
        (Gauge::Gpu, snapshot.gpu.as_ref().and_then(|m| m.usage)),
        (Gauge::Disk, snapshot.disk.as_ref().and_then(|m| m.usage)),
    ];
    for (gauge, usage) in usages {
        // Absent usage keeps whatever the gauge showed before.
        if let Some(value) = usage {
            regions.set_gauge(gauge, gauge_view(gauge, value));
        }
    }
}

fn render_disk_label<R: DisplayRegions + ?Sized>(regions: &mut R, snapshot: &MetricsSnapshot) {
    if let Some(disk) = &snapshot.disk {
        regions.set_disk_usage_label(format!(
            "{}GB / {}GB",
            number_or_marker(disk.used_gb),
            number_or_marker(disk.total_gb)
        ));
    }
}

/// Gauge content for a raw usage value.
///
/// The indicator is clamped to `[0, 100]`; the title echoes the raw value.
pub fn gauge_view(gauge: Gauge, value: f64) -> GaugeView {
    let percent = if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    };
    GaugeView {
        percent,
        title: format!("{} Usage {value}%", gauge.label()),
    }
}

/// The fixed three-row CPU/GPU/SSD temperature table.
pub fn temperature_table(snapshot: &MetricsSnapshot) -> TableView {
    let readings = [
        snapshot.cpu.as_ref().and_then(|m| m.temperature),
        snapshot.gpu.as_ref().and_then(|m| m.temperature),
        snapshot.disk.as_ref().and_then(|m| m.temperature),
    ];
    TableView {
        header: Vec::new(),
        rows: TEMPERATURE_ROWS
            .iter()
            .zip(readings)
            .map(|(label, reading)| vec![label.to_string(), celsius(reading)])
            .collect(),
    }
}

/// Header plus one row per process, in input order.
pub fn process_table(processes: Option<&[ProcessEntry]>) -> TableView {
    TableView {
        header: PROCESS_HEADER.iter().map(|h| h.to_string()).collect(),
        rows: processes
            .unwrap_or_default()
            .iter()
            .map(|p| {
                vec![
                    p.name.clone().unwrap_or_else(|| EMPTY_MARKER.to_string()),
                    percent(p.cpu),
                    percent(p.ram),
                    percent(p.gpu),
                ]
            })
            .collect(),
    }
}

fn network_banner(snapshot: &MetricsSnapshot) -> BannerView {
    let network = snapshot.network.as_ref();
    let hostname = network
        .and_then(|n| n.hostname.as_deref())
        .unwrap_or(EMPTY_MARKER);
    let ip = network.and_then(|n| n.ip.as_deref()).unwrap_or(EMPTY_MARKER);
    BannerView {
        text: format!("{hostname} {ip}:{METRICS_PORT}"),
        style: BannerStyle::Connected,
    }
}

fn number_or_marker(value: Option<f64>) -> String {
    value.map_or_else(|| EMPTY_MARKER.to_string(), |v| v.to_string())
}

fn celsius(value: Option<f64>) -> String {
    value.map_or_else(|| EMPTY_MARKER.to_string(), |v| format!("{v}°C"))
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| EMPTY_MARKER.to_string(), |v| format!("{v}%"))
}

// ---------------------------------------------------------------------------
// Failure path
// ---------------------------------------------------------------------------

/// Write a diagnostic for a failed cycle into the shared banner.
pub fn render_error<R: DisplayRegions + ?Sized>(regions: &mut R, error: &FetchError) {
    regions.set_banner(BannerView {
        text: error_message(error),
        style: BannerStyle::Error,
    });
}

/// Banner text for a failed cycle.
pub fn error_message(error: &FetchError) -> String {
    match error {
        FetchError::Unreachable { host, port } => {
            format!("Cannot connect to {host}:{port} - check that the server is running")
        }
        other => format!("Error: {other}"),
    }
}
