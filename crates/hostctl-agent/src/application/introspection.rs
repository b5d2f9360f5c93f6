//! Introspection Service: stateless host queries.
//!
//! Each operation asks the [`SystemInfoProvider`] for one raw record and
//! reshapes it into its response payload.  Nothing is cached between calls.

use std::sync::Arc;

use hostctl_core::domain::introspection::{
    Architecture, CpuRecord, DisplayRecord, KernelRecord, MemoryRecord, OsRecord,
};
use hostctl_core::protocol::payloads::{CpuInfo, DisplayInfo, KernelInfo, MemoryInfo, OsInfo};
use tracing::debug;

/// Source of raw host information.
///
/// Implementations perform one-shot queries against the OS and return
/// whatever they could read; fields they cannot determine are zero / empty.
#[cfg_attr(test, mockall::automock)]
pub trait SystemInfoProvider: Send + Sync {
    fn memory(&self) -> MemoryRecord;
    fn cpu(&self) -> CpuRecord;
    /// The CPU architecture alone, without the cost of a full CPU query.
    fn architecture(&self) -> Architecture;
    fn kernel(&self) -> KernelRecord;
    fn os(&self) -> OsRecord;
    /// Attached displays in the provider's enumeration order.
    fn displays(&self) -> Vec<DisplayRecord>;
}

pub struct IntrospectionService {
    provider: Arc<dyn SystemInfoProvider>,
}

impl IntrospectionService {
    pub fn new(provider: Arc<dyn SystemInfoProvider>) -> Self {
        Self { provider }
    }

    pub fn memory_info(&self) -> MemoryInfo {
        self.provider.memory().into()
    }

    /// One of `"x64"`, `"arm"`, `"itanium"`, `"ia32"`, `"unknown"`.
    pub fn arch(&self) -> &'static str {
        self.provider.architecture().as_str()
    }

    pub fn kernel_info(&self) -> KernelInfo {
        self.provider.kernel().into()
    }

    pub fn os_info(&self) -> OsInfo {
        self.provider.os().into()
    }

    pub fn cpu_info(&self) -> CpuInfo {
        self.provider.cpu().into()
    }

    /// Attached displays with ordinal ids `0..N-1` in enumeration order.
    ///
    /// Entries with a zero width or height are skipped before ids are
    /// assigned.  Ids are not stable across calls when displays are added or
    /// removed in between.
    pub fn displays(&self) -> Vec<DisplayInfo> {
        let records = self.provider.displays();
        let total = records.len();
        let displays: Vec<DisplayInfo> = records
            .iter()
            .filter(|r| r.width > 0 && r.height > 0)
            .zip(0u32..)
            .map(|(r, id)| DisplayInfo::from_record(id, r))
            .collect();
        if displays.len() != total {
            debug!(skipped = total - displays.len(), "skipped zero-sized displays");
        }
        displays
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hostctl_core::domain::introspection::{KernelVariant, VersionQuad};

    fn service_with(provider: MockSystemInfoProvider) -> IntrospectionService {
        IntrospectionService::new(Arc::new(provider))
    }

    fn display(width: u32, height: u32) -> DisplayRecord {
        DisplayRecord {
            width,
            height,
            dpi: 96,
            bpp: 32,
            refresh_rate: 60.0,
        }
    }

    #[test]
    fn test_arch_unknown_value_is_reported_as_unknown() {
        // Arrange
        let mut provider = MockSystemInfoProvider::new();
        provider
            .expect_architecture()
            .returning(|| Architecture::from_raw("loongarch64"));

        // Act / Assert
        assert_eq!(service_with(provider).arch(), "unknown");
    }

    #[test]
    fn test_displays_are_numbered_in_enumeration_order() {
        // Arrange
        let mut provider = MockSystemInfoProvider::new();
        provider
            .expect_displays()
            .returning(|| vec![display(1920, 1080), display(2560, 1440), display(1280, 1024)]);

        // Act
        let displays = service_with(provider).displays();

        // Assert
        let ids: Vec<u32> = displays.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(displays[1].resolution.width, 2560);
        assert!(displays
            .iter()
            .all(|d| d.resolution.width > 0 && d.resolution.height > 0));
    }

    #[test]
    fn test_zero_sized_displays_are_skipped_without_gaps_in_ids() {
        let mut provider = MockSystemInfoProvider::new();
        provider
            .expect_displays()
            .returning(|| vec![display(0, 0), display(1920, 1080), display(800, 0), display(1024, 768)]);

        let displays = service_with(provider).displays();

        assert_eq!(displays.len(), 2);
        assert_eq!(displays[0].id, 0);
        assert_eq!(displays[0].resolution.width, 1920);
        assert_eq!(displays[1].id, 1);
        assert_eq!(displays[1].resolution.width, 1024);
    }

    #[test]
    fn test_no_displays_is_an_empty_list() {
        let mut provider = MockSystemInfoProvider::new();
        provider.expect_displays().returning(Vec::new);
        assert!(service_with(provider).displays().is_empty());
    }

    #[test]
    fn test_kernel_info_is_formatted() {
        let mut provider = MockSystemInfoProvider::new();
        provider.expect_kernel().returning(|| KernelRecord {
            variant: KernelVariant::Linux,
            version: VersionQuad::new(6, 8, 0, 45),
        });
        let info = service_with(provider).kernel_info();
        assert_eq!(info.variant, "Linux");
        assert_eq!(info.version, "6.8.0-45");
    }

    #[test]
    fn test_os_info_maps_full_name_to_description() {
        let mut provider = MockSystemInfoProvider::new();
        provider.expect_os().returning(|| OsRecord {
            name: "Ubuntu".into(),
            full_name: "Linux 24.04 Ubuntu".into(),
            version: VersionQuad::new(24, 4, 0, 0),
        });
        let info = service_with(provider).os_info();
        assert_eq!(info.name, "Ubuntu");
        assert_eq!(info.description, "Linux 24.04 Ubuntu");
        assert_eq!(info.version, "24.4.0-0");
    }

    #[test]
    fn test_cpu_info_reports_architecture_label() {
        let mut provider = MockSystemInfoProvider::new();
        provider.expect_cpu().returning(|| CpuRecord {
            vendor: "AuthenticAMD".into(),
            model: "Ryzen 9".into(),
            frequency_hz: 4_200_000_000,
            architecture: Architecture::X64,
            logical_threads: 32,
            physical_cores: 16,
            physical_units: 1,
        });
        let info = service_with(provider).cpu_info();
        assert_eq!(info.architecture, "x64");
        assert_eq!(info.logical_threads, 32);
        assert_eq!(info.physical_units, 1);
    }

    #[test]
    fn test_memory_info_passes_totals_through() {
        let mut provider = MockSystemInfoProvider::new();
        provider.expect_memory().returning(|| MemoryRecord {
            physical_total: 100,
            physical_available: 40,
            virtual_total: 150,
            virtual_available: 60,
        });
        let info = service_with(provider).memory_info();
        assert_eq!(info.physical.total, 100);
        assert_eq!(info.virtual_memory.available, 60);
    }
}
