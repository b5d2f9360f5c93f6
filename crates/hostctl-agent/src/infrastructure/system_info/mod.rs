//! Host information adapters for the introspection service.
//!
//! [`SysinfoProvider`] is the production [`SystemInfoProvider`]: memory, CPU
//! and OS identity come from the `sysinfo` crate, displays from the
//! platform's [`NativeDisplayEnumerator`].  [`FixedSystemInfo`] is always
//! compiled and returns canned records for tests and for hosts that want a
//! deterministic answer.

pub mod displays;
#[cfg(target_os = "windows")]
mod nt_version;

use hostctl_core::domain::introspection::{
    Architecture, CpuRecord, DisplayRecord, KernelRecord, KernelVariant, MemoryRecord, OsRecord,
    VersionQuad,
};
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};
use tracing::{debug, warn};

use crate::application::introspection::SystemInfoProvider;
use displays::{NativeDisplayEnumerator, PlatformDisplayEnumerator};

/// [`SystemInfoProvider`] backed by `sysinfo` and native display
/// enumeration.  Every call performs a fresh query.
pub struct SysinfoProvider {
    displays: Box<dyn PlatformDisplayEnumerator>,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        Self::with_display_enumerator(Box::new(NativeDisplayEnumerator::new()))
    }

    pub fn with_display_enumerator(displays: Box<dyn PlatformDisplayEnumerator>) -> Self {
        Self { displays }
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemInfoProvider for SysinfoProvider {
    fn memory(&self) -> MemoryRecord {
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
        );
        let (ram_total, ram_free) = (sys.total_memory(), sys.available_memory());
        MemoryRecord {
            physical_total: ram_total,
            physical_available: ram_free,
            virtual_total: ram_total.saturating_add(sys.total_swap()),
            virtual_available: ram_free.saturating_add(sys.free_swap()),
        }
    }

    fn cpu(&self) -> CpuRecord {
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()),
        );
        let cpus = sys.cpus();
        let (vendor, model, frequency_mhz) = cpus
            .first()
            .map(|c| (c.vendor_id().to_string(), c.brand().trim().to_string(), c.frequency()))
            .unwrap_or_default();
        let logical_threads = cpus.len() as u32;

        CpuRecord {
            vendor,
            model,
            frequency_hz: frequency_mhz.saturating_mul(1_000_000),
            architecture: self.architecture(),
            logical_threads,
            physical_cores: System::physical_core_count().map_or(0, |n| n as u32),
            physical_units: physical_packages(logical_threads),
        }
    }

    fn architecture(&self) -> Architecture {
        Architecture::from_raw(&System::cpu_arch())
    }

    fn kernel(&self) -> KernelRecord {
        let raw = System::kernel_version().unwrap_or_default();
        debug!(kernel = %raw, "kernel version");
        KernelRecord {
            variant: KernelVariant::from_target_os(std::env::consts::OS),
            version: native_version().unwrap_or_else(|| VersionQuad::parse_lenient(&raw)),
        }
    }

    fn os(&self) -> OsRecord {
        let name = System::name().unwrap_or_default();
        let version = native_version().unwrap_or_else(|| {
            VersionQuad::parse_lenient(&System::os_version().unwrap_or_default())
        });
        OsRecord {
            full_name: System::long_os_version().unwrap_or_else(|| name.clone()),
            version,
            name,
        }
    }

    fn displays(&self) -> Vec<DisplayRecord> {
        self.displays.enumerate_displays().unwrap_or_else(|e| {
            warn!("display enumeration failed: {e}");
            Vec::new()
        })
    }
}

/// The full version quad where the platform exposes one directly.
/// `sysinfo`'s strings are only parsed when this is `None`.
#[cfg(target_os = "windows")]
fn native_version() -> Option<VersionQuad> {
    nt_version::current_version()
}

#[cfg(not(target_os = "windows"))]
fn native_version() -> Option<VersionQuad> {
    None
}

/// Number of physical CPU packages (sockets).
///
/// Linux reports one distinct `physical id` per package in `/proc/cpuinfo`;
/// elsewhere, or if the file cannot be read, a machine with any CPU counts
/// as one package.
fn physical_packages(logical_threads: u32) -> u32 {
    let fallback = u32::from(logical_threads > 0);
    if cfg!(target_os = "linux") {
        if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
            return parse_physical_packages(&cpuinfo).unwrap_or(fallback);
        }
    }
    fallback
}

/// Counts distinct `physical id` values in `/proc/cpuinfo` text.  `None` if
/// the field never appears (common on ARM).
pub(crate) fn parse_physical_packages(cpuinfo: &str) -> Option<u32> {
    let mut ids: Vec<&str> = cpuinfo
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            (key.trim() == "physical id").then(|| value.trim())
        })
        .collect();
    if ids.is_empty() {
        return None;
    }
    ids.sort_unstable();
    ids.dedup();
    Some(ids.len() as u32)
}

// ── Fixed provider (always compiled for tests) ────────────────────────────────

/// A provider that returns the records it was built with.  Makes no OS
/// calls.
#[derive(Debug, Clone)]
pub struct FixedSystemInfo {
    pub memory: MemoryRecord,
    pub cpu: CpuRecord,
    pub kernel: KernelRecord,
    pub os: OsRecord,
    pub displays: Vec<DisplayRecord>,
}

impl FixedSystemInfo {
    /// A typical single-socket x64 Linux workstation with one 1080p display.
    pub fn workstation() -> Self {
        Self {
            memory: MemoryRecord {
                physical_total: 16 * 1024 * 1024 * 1024,
                physical_available: 8 * 1024 * 1024 * 1024,
                virtual_total: 18 * 1024 * 1024 * 1024,
                virtual_available: 10 * 1024 * 1024 * 1024,
            },
            cpu: CpuRecord {
                vendor: "GenuineIntel".into(),
                model: "Intel(R) Core(TM) i7-9700K CPU @ 3.60GHz".into(),
                frequency_hz: 3_600_000_000,
                architecture: Architecture::X64,
                logical_threads: 8,
                physical_cores: 8,
                physical_units: 1,
            },
            kernel: KernelRecord {
                variant: KernelVariant::Linux,
                version: VersionQuad::new(6, 5, 0, 14),
            },
            os: OsRecord {
                name: "Ubuntu".into(),
                full_name: "Linux 22.04 Ubuntu".into(),
                version: VersionQuad::new(22, 4, 0, 0),
            },
            displays: vec![DisplayRecord {
                width: 1920,
                height: 1080,
                dpi: 96,
                bpp: 24,
                refresh_rate: 60.0,
            }],
        }
    }
}

impl SystemInfoProvider for FixedSystemInfo {
    fn memory(&self) -> MemoryRecord {
        self.memory
    }

    fn cpu(&self) -> CpuRecord {
        self.cpu.clone()
    }

    fn architecture(&self) -> Architecture {
        self.cpu.architecture
    }

    fn kernel(&self) -> KernelRecord {
        self.kernel.clone()
    }

    fn os(&self) -> OsRecord {
        self.os.clone()
    }

    fn displays(&self) -> Vec<DisplayRecord> {
        self.displays.clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
