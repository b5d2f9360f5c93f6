//! `returnValue` shapes for the introspection and pointer operations.
//!
//! Field names follow the camelCase convention of the calling runtime.

use serde::{Deserialize, Serialize};

use crate::domain::introspection::{CpuRecord, DisplayRecord, KernelRecord, MemoryRecord, OsRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryAmounts {
    pub total: u64,
    pub available: u64,
}

/// `getMemoryInfo` → `{physical:{total,available}, virtual:{total,available}}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub physical: MemoryAmounts,
    #[serde(rename = "virtual")]
    pub virtual_memory: MemoryAmounts,
}

impl From<MemoryRecord> for MemoryInfo {
    fn from(r: MemoryRecord) -> Self {
        Self {
            physical: MemoryAmounts {
                total: r.physical_total,
                available: r.physical_available,
            },
            virtual_memory: MemoryAmounts {
                total: r.virtual_total,
                available: r.virtual_available,
            },
        }
    }
}

/// `getKernelInfo` → `{variant, version}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelInfo {
    pub variant: String,
    pub version: String,
}

impl From<KernelRecord> for KernelInfo {
    fn from(r: KernelRecord) -> Self {
        Self {
            variant: r.variant.as_str().to_string(),
            version: r.version.to_string(),
        }
    }
}

/// `getOSInfo` → `{name, description, version}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub name: String,
    pub description: String,
    pub version: String,
}

impl From<OsRecord> for OsInfo {
    fn from(r: OsRecord) -> Self {
        Self {
            name: r.name,
            description: r.full_name,
            version: r.version.to_string(),
        }
    }
}

/// `getCPUInfo` → `{vendor, model, frequency, architecture, logicalThreads,
/// physicalCores, physicalUnits}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    pub vendor: String,
    pub model: String,
    pub frequency: u64,
    pub architecture: String,
    pub logical_threads: u32,
    pub physical_cores: u32,
    pub physical_units: u32,
}

impl From<CpuRecord> for CpuInfo {
    fn from(r: CpuRecord) -> Self {
        Self {
            vendor: r.vendor,
            model: r.model,
            frequency: r.frequency_hz,
            architecture: r.architecture.as_str().to_string(),
            logical_threads: r.logical_threads,
            physical_cores: r.physical_cores,
            physical_units: r.physical_units,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// One element of the `getDisplays` array.
///
/// `id` is the 0-based enumeration index.  It is not stable across calls if
/// the attached display set changes between queries; callers must not
/// persist it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayInfo {
    pub id: u32,
    pub resolution: Resolution,
    pub dpi: u32,
    pub bpp: u32,
    pub refresh_rate: f64,
}

impl DisplayInfo {
    pub fn from_record(id: u32, r: &DisplayRecord) -> Self {
        Self {
            id,
            resolution: Resolution {
                width: r.width,
                height: r.height,
            },
            dpi: r.dpi,
            bpp: r.bpp,
            refresh_rate: r.refresh_rate,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::introspection::{Architecture, KernelVariant, VersionQuad};
    use serde_json::json;

    #[test]
    fn test_memory_info_uses_virtual_key() {
        // Arrange
        let info = MemoryInfo::from(MemoryRecord {
            physical_total: 16,
            physical_available: 8,
            virtual_total: 32,
            virtual_available: 20,
        });

        // Act
        let v = serde_json::to_value(info).expect("serialize");

        // Assert
        assert_eq!(
            v,
            json!({
                "physical": { "total": 16, "available": 8 },
                "virtual": { "total": 32, "available": 20 }
            })
        );
    }

    #[test]
    fn test_cpu_info_uses_camel_case_and_arch_label() {
        let info = CpuInfo::from(CpuRecord {
            vendor: "GenuineIntel".into(),
            model: "Core i7".into(),
            frequency_hz: 3_600_000_000,
            architecture: Architecture::X64,
            logical_threads: 8,
            physical_cores: 4,
            physical_units: 1,
        });
        let v = serde_json::to_value(info).expect("serialize");
        assert_eq!(v["architecture"], "x64");
        assert_eq!(v["logicalThreads"], 8);
        assert_eq!(v["physicalCores"], 4);
        assert_eq!(v["physicalUnits"], 1);
        assert_eq!(v["frequency"], 3_600_000_000u64);
    }

    #[test]
    fn test_kernel_info_formats_variant_and_version() {
        let info = KernelInfo::from(KernelRecord {
            variant: KernelVariant::Darwin,
            version: VersionQuad::new(23, 1, 0, 0),
        });
        assert_eq!(info.variant, "Darwin");
        assert_eq!(info.version, "23.1.0-0");
    }

    #[test]
    fn test_display_info_shape() {
        let r = DisplayRecord {
            width: 2560,
            height: 1440,
            dpi: 109,
            bpp: 24,
            refresh_rate: 59.95,
        };
        let v = serde_json::to_value(DisplayInfo::from_record(1, &r)).expect("serialize");
        assert_eq!(
            v,
            json!({
                "id": 1,
                "resolution": { "width": 2560, "height": 1440 },
                "dpi": 109,
                "bpp": 24,
                "refreshRate": 59.95
            })
        );
    }
}
