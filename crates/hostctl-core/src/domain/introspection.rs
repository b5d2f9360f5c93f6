//! Raw introspection records and their normalisation rules.
//!
//! A system information provider returns these records; the introspection
//! service reformats them into the response payloads in
//! [`crate::protocol::payloads`].  The records carry no identity beyond the
//! query that produced them and are never persisted.

use std::fmt;

/// CPU architecture tag.
///
/// The set is fixed.  Any architecture string the provider reports that is
/// not recognised maps to [`Architecture::Unknown`] rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Architecture {
    X64,
    Arm,
    Itanium,
    Ia32,
    #[default]
    Unknown,
}

impl Architecture {
    /// Maps an OS / toolchain architecture name onto the fixed tag set.
    ///
    /// Accepts the spellings produced by `uname -m`, Rust's
    /// `std::env::consts::ARCH`, and Windows `PROCESSOR_ARCHITECTURE`.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Architecture::X64,
            "x86" | "i386" | "i486" | "i586" | "i686" | "ia32" => Architecture::Ia32,
            "ia64" | "itanium" => Architecture::Itanium,
            s if s == "arm" || s == "arm64" || s.starts_with("armv") || s.starts_with("aarch64") => {
                Architecture::Arm
            }
            _ => Architecture::Unknown,
        }
    }

    /// The wire label: `"x64"`, `"arm"`, `"itanium"`, `"ia32"`, or `"unknown"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Architecture::X64 => "x64",
            Architecture::Arm => "arm",
            Architecture::Itanium => "itanium",
            Architecture::Ia32 => "ia32",
            Architecture::Unknown => "unknown",
        }
    }
}

/// Kernel family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KernelVariant {
    WindowsNt,
    Linux,
    Darwin,
    #[default]
    Unknown,
}

impl KernelVariant {
    /// Maps a Rust target OS name (`std::env::consts::OS`) to a kernel family.
    pub fn from_target_os(os: &str) -> Self {
        match os {
            "windows" => KernelVariant::WindowsNt,
            "linux" | "android" => KernelVariant::Linux,
            "macos" | "ios" => KernelVariant::Darwin,
            _ => KernelVariant::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KernelVariant::WindowsNt => "Windows NT",
            KernelVariant::Linux => "Linux",
            KernelVariant::Darwin => "Darwin",
            KernelVariant::Unknown => "Unknown",
        }
    }
}

/// A `major.minor.patch-build` version.
///
/// Displayed as `"6.8.0-45"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VersionQuad {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: u32,
}

impl VersionQuad {
    pub fn new(major: u32, minor: u32, patch: u32, build: u32) -> Self {
        Self { major, minor, patch, build }
    }

    /// Leniently parses an OS-reported version string.
    ///
    /// Takes the first four runs of ASCII digits in order, whatever separates
    /// them (`.`, `-`, `_`, spaces, or text).  Missing components are zero,
    /// and a run too large for `u32` saturates.
    ///
    /// ```
    /// use hostctl_core::domain::introspection::VersionQuad;
    ///
    /// assert_eq!(VersionQuad::parse_lenient("6.8.0-45-generic").to_string(), "6.8.0-45");
    /// assert_eq!(VersionQuad::parse_lenient("23.1.0").to_string(), "23.1.0-0");
    /// ```
    pub fn parse_lenient(raw: &str) -> Self {
        let mut parts = raw
            .split(|c: char| !c.is_ascii_digit())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<u32>().unwrap_or(u32::MAX));
        let mut next = || parts.next().unwrap_or(0);
        Self {
            major: next(),
            minor: next(),
            patch: next(),
            build: next(),
        }
    }

    /// Builds a version from the Windows NT `CurrentVersion` values.
    ///
    /// The build number is stored as a string; anything that does not parse
    /// becomes zero.  `ubr` is the update build revision.
    ///
    /// ```
    /// use hostctl_core::domain::introspection::VersionQuad;
    ///
    /// assert_eq!(VersionQuad::from_nt(10, 0, "22631", 4169).to_string(), "10.0.22631-4169");
    /// ```
    pub fn from_nt(major: u32, minor: u32, build: &str, ubr: u32) -> Self {
        Self::new(major, minor, build.trim().parse().unwrap_or(0), ubr)
    }
}

impl fmt::Display for VersionQuad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}-{}", self.major, self.minor, self.patch, self.build)
    }
}

/// Memory totals in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryRecord {
    pub physical_total: u64,
    pub physical_available: u64,
    pub virtual_total: u64,
    pub virtual_available: u64,
}

/// Processor identity and topology.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CpuRecord {
    pub vendor: String,
    pub model: String,
    /// Nominal frequency in Hz.
    pub frequency_hz: u64,
    pub architecture: Architecture,
    pub logical_threads: u32,
    pub physical_cores: u32,
    pub physical_units: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KernelRecord {
    pub variant: KernelVariant,
    pub version: VersionQuad,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OsRecord {
    pub name: String,
    /// Human-readable description, e.g. `"Linux 24.04 Ubuntu"`.
    pub full_name: String,
    pub version: VersionQuad,
}

/// One attached display, in provider enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayRecord {
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
    /// Bits per pixel.
    pub bpp: u32,
    /// Refresh rate in Hz; `0.0` when the platform does not report one.
    pub refresh_rate: f64,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
