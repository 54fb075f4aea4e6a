//! The display surface as seen by the render engine.
//!
//! A UI exposes its named slots through [`DisplayRegions`]. Each method fully
//! overwrites one region; there is no diffing and no read-back. A surface
//! that lacks a region simply ignores writes to it.

use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Region identifiers
// ---------------------------------------------------------------------------

/// A named, independently updatable slot of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    CpuGauge,
    RamGauge,
    GpuGauge,
    DiskGauge,
    TemperatureTable,
    ProcessTable,
    /// Shared by the connected (network identity) and error paths.
    Banner,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::CpuGauge,
        Region::RamGauge,
        Region::GpuGauge,
        Region::DiskGauge,
        Region::TemperatureTable,
        Region::ProcessTable,
        Region::Banner,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::CpuGauge => "cpu-gauge",
            Self::RamGauge => "ram-gauge",
            Self::GpuGauge => "gpu-gauge",
            Self::DiskGauge => "disk-gauge",
            Self::TemperatureTable => "temperature-table",
            Self::ProcessTable => "process-table",
            Self::Banner => "network-banner",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The four usage gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gauge {
    Cpu,
    Ram,
    Gpu,
    Disk,
}

impl Gauge {
    pub const ALL: [Gauge; 4] = [Gauge::Cpu, Gauge::Ram, Gauge::Gpu, Gauge::Disk];

    /// Label used in the gauge title, e.g. `CPU` in `"CPU Usage 42%"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Ram => "RAM",
            Self::Gpu => "GPU",
            Self::Disk => "Disk",
        }
    }

    pub fn region(self) -> Region {
        match self {
            Self::Cpu => Region::CpuGauge,
            Self::Ram => Region::RamGauge,
            Self::Gpu => Region::GpuGauge,
            Self::Disk => Region::DiskGauge,
        }
    }
}

// ---------------------------------------------------------------------------
// Region content
// ---------------------------------------------------------------------------

/// Content of a usage gauge.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeView {
    /// Indicator position, always within `[0, 100]`.
    pub percent: f64,
    /// Title text, e.g. `"CPU Usage 42%"`.
    pub title: String,
}

/// A fully regenerated text table. `header` may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Visual style of the shared banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerStyle {
    /// Last cycle succeeded; banner shows the server identity.
    Connected,
    /// Last cycle failed; banner shows a diagnostic.
    Error,
}

/// Content of the shared banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerView {
    pub text: String,
    pub style: BannerStyle,
}

// ---------------------------------------------------------------------------
// DisplayRegions
// ---------------------------------------------------------------------------

/// Write-only capability over the display surface.
///
/// Implementations must tolerate any call; a missing region is a silent
/// no-op, never a panic.
pub trait DisplayRegions {
    fn set_gauge(&mut self, gauge: Gauge, view: GaugeView);

    /// Auxiliary `"<used>GB / <total>GB"` text attached to the disk region.
    fn set_disk_usage_label(&mut self, label: String);

    fn set_temperature_table(&mut self, table: TableView);

    fn set_process_table(&mut self, table: TableView);

    fn set_banner(&mut self, banner: BannerView);
}

// ---------------------------------------------------------------------------
// RecordingRegions
// ---------------------------------------------------------------------------

/// Latest content of every region. Usable directly as a surface that has
/// every slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionContents {
    pub cpu: Option<GaugeView>,
    pub ram: Option<GaugeView>,
    pub gpu: Option<GaugeView>,
    pub disk: Option<GaugeView>,
    pub disk_usage_label: Option<String>,
    pub temperature_table: Option<TableView>,
    pub process_table: Option<TableView>,
    pub banner: Option<BannerView>,
}

impl RegionContents {
    pub fn gauge(&self, gauge: Gauge) -> Option<&GaugeView> {
        match gauge {
            Gauge::Cpu => self.cpu.as_ref(),
            Gauge::Ram => self.ram.as_ref(),
            Gauge::Gpu => self.gpu.as_ref(),
            Gauge::Disk => self.disk.as_ref(),
        }
    }

    fn gauge_slot(&mut self, gauge: Gauge) -> &mut Option<GaugeView> {
        match gauge {
            Gauge::Cpu => &mut self.cpu,
            Gauge::Ram => &mut self.ram,
            Gauge::Gpu => &mut self.gpu,
            Gauge::Disk => &mut self.disk,
        }
    }
}

/// In-memory surface that keeps the latest content of each region and a log
/// of every write, in order. Regions can be marked missing to exercise the
/// absent-region path.
#[derive(Debug, Clone, Default)]
pub struct RecordingRegions {
    pub contents: RegionContents,
    writes: Vec<Region>,
    missing: HashSet<Region>,
}

impl RecordingRegions {
    /// A surface that has no slot for any of `missing`.
    pub fn without(missing: impl IntoIterator<Item = Region>) -> Self {
        Self {
            missing: missing.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Regions written so far, oldest first. Writes to missing regions are
    /// not recorded.
    pub fn writes(&self) -> &[Region] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    pub fn gauge(&self, gauge: Gauge) -> Option<&GaugeView> {
        self.contents.gauge(gauge)
    }

    pub fn banner(&self) -> Option<&BannerView> {
        self.contents.banner.as_ref()
    }

    fn accept(&mut self, region: Region) -> bool {
        if self.missing.contains(&region) {
            return false;
        }
        self.writes.push(region);
        true
    }
}

impl DisplayRegions for RegionContents {
    fn set_gauge(&mut self, gauge: Gauge, view: GaugeView) {
        *self.gauge_slot(gauge) = Some(view);
    }

    fn set_disk_usage_label(&mut self, label: String) {
        self.disk_usage_label = Some(label);
    }

    fn set_temperature_table(&mut self, table: TableView) {
        self.temperature_table = Some(table);
    }

    fn set_process_table(&mut self, table: TableView) {
        self.process_table = Some(table);
    }

    fn set_banner(&mut self, banner: BannerView) {
        self.banner = Some(banner);
    }
}

impl DisplayRegions for RecordingRegions {
    fn set_gauge(&mut self, gauge: Gauge, view: GaugeView) {
        if self.accept(gauge.region()) {
            self.contents.set_gauge(gauge, view);
        }
    }

    fn set_disk_usage_label(&mut self, label: String) {
        if self.accept(Region::DiskGauge) {
            self.contents.set_disk_usage_label(label);
        }
    }

    fn set_temperature_table(&mut self, table: TableView) {
        if self.accept(Region::TemperatureTable) {
            self.contents.set_temperature_table(table);
        }
    }

    fn set_process_table(&mut self, table: TableView) {
        if self.accept(Region::ProcessTable) {
            self.contents.set_process_table(table);
        }
    }

    fn set_banner(&mut self, banner: BannerView) {
        if self.accept(Region::Banner) {
            self.contents.set_banner(banner);
        }
    }
}
