//! The CLI's display surface, shared by the TUI and headless output.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use hwdash_core::{
    BannerStyle, BannerView, DisplayRegions, EMPTY_MARKER, Gauge, GaugeView, RegionContents,
    TableView,
};

/// Latest content of every dashboard region plus when it last changed.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub contents: RegionContents,
    last_update: Option<Instant>,
}

impl DashboardState {
    /// Time since any region was last written, `None` before the first write.
    pub fn since_update(&self) -> Option<Duration> {
        self.last_update.map(|t| t.elapsed())
    }

    pub fn banner(&self) -> Option<&BannerView> {
        self.contents.banner.as_ref()
    }

    /// Plain-text rendering for `hwdash fetch`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(banner) = self.banner() {
            let tag = match banner.style {
                BannerStyle::Connected => "connected",
                BannerStyle::Error => "error",
            };
            let _ = writeln!(out, "{} [{tag}]", banner.text);
            out.push('\n');
        }

        for gauge in Gauge::ALL {
            let title = match self.contents.gauge(gauge) {
                Some(view) => view.title.clone(),
                None => format!("{} Usage {EMPTY_MARKER}", gauge.label()),
            };
            match (&self.contents.disk_usage_label, gauge) {
                (Some(label), Gauge::Disk) => {
                    let _ = writeln!(out, "{title} ({label})");
                }
                _ => {
                    let _ = writeln!(out, "{title}");
                }
            }
        }

        if let Some(table) = &self.contents.temperature_table {
            out.push_str("\nTemperatures\n");
            push_table(&mut out, table);
        }
        if let Some(table) = &self.contents.process_table {
            out.push_str("\nProcesses\n");
            push_table(&mut out, table);
        }
        out
    }

    fn touch(&mut self) {
        self.last_update = Some(Instant::now());
    }
}

impl DisplayRegions for DashboardState {
    fn set_gauge(&mut self, gauge: Gauge, view: GaugeView) {
        self.contents.set_gauge(gauge, view);
        self.touch();
    }

    fn set_disk_usage_label(&mut self, label: String) {
        self.contents.set_disk_usage_label(label);
        self.touch();
    }

    fn set_temperature_table(&mut self, table: TableView) {
        self.contents.set_temperature_table(table);
        self.touch();
    }

    fn set_process_table(&mut self, table: TableView) {
        self.contents.set_process_table(table);
        self.touch();
    }

    fn set_banner(&mut self, banner: BannerView) {
        self.contents.set_banner(banner);
        self.touch();
    }
}

/// Left-aligned columns, two spaces apart, indented by two.
fn push_table(out: &mut String, table: &TableView) {
    let lines: Vec<&Vec<String>> = std::iter::once(&table.header)
        .filter(|h| !h.is_empty())
        .chain(&table.rows)
        .collect();

    let columns = lines.iter().map(|l| l.len()).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            lines
                .iter()
                .filter_map(|l| l.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for line in lines {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(out, "  {}", cells.join("  ").trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwdash_core::{FetchError, MetricsSnapshot, render, render_error};

    fn snapshot(json: &str) -> MetricsSnapshot {
        MetricsSnapshot::from_json(json.as_bytes()).unwrap()
    }

    #[test]
    fn fresh_state_has_no_update_time() {
        let state = DashboardState::default();
        assert!(state.since_update().is_none());
        assert!(state.banner().is_none());
    }

    #[test]
    fn any_write_marks_an_update() {
        let mut state = DashboardState::default();
        render_error(&mut state, &FetchError::HttpStatus(502));
        assert!(state.since_update().is_some());
        assert_eq!(state.banner().unwrap().style, BannerStyle::Error);
    }

    #[test]
    fn text_output_for_a_full_snapshot() {
        let mut state = DashboardState::default();
        render(
            &mut state,
            &snapshot(
                r#"{
                    "cpu": {"usage": 42, "temperature": 55},
                    "disk": {"usage": 44, "used_gb": 410.7, "total_gb": 931.5},
                    "network": {"hostname": "rig", "ip": "10.0.0.5"},
                    "processes": [{"name": "python.exe", "cpu": 12.1, "ram": 2.4, "gpu": 0}]
                }"#,
            ),
        );

        let text = state.to_text();
        assert!(text.starts_with("rig 10.0.0.5:5000 [connected]\n"), "{text}");
        assert!(text.contains("CPU Usage 42%\n"));
        assert!(text.contains("RAM Usage —\n"));
        assert!(text.contains("Disk Usage 44% (410.7GB / 931.5GB)\n"));
        assert!(text.contains("  CPU  55°C\n"));
        assert!(text.contains("  GPU  —\n"));
        assert!(text.contains("  Process name  CPU    RAM   GPU\n"), "{text}");
        assert!(text.contains("  python.exe    12.1%  2.4%  0%\n"), "{text}");
    }

    #[test]
    fn text_output_after_failure_only() {
        let mut state = DashboardState::default();
        render_error(
            &mut state,
            &FetchError::Unreachable {
                host: "box".into(),
                port: 5000,
            },
        );

        let text = state.to_text();
        assert!(text.starts_with(
            "Cannot connect to box:5000 - check that the server is running [error]\n"
        ));
        assert!(!text.contains("Temperatures"));
        assert!(!text.contains("Processes"));
    }
}
