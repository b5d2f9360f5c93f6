//! Operation names accepted on the command surface.

use std::fmt;
use std::str::FromStr;

use crate::protocol::envelope::CommandError;

/// Optional namespace prefix callers may put in front of a method name.
pub const NAMESPACE_PREFIX: &str = "computer.";

/// Every operation the command surface exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetMemoryInfo,
    GetArch,
    GetKernelInfo,
    GetOsInfo,
    GetCpuInfo,
    GetDisplays,
    GetMousePosition,
    SetMousePosition,
    SetMouseGrabbing,
    SendKey,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::GetMemoryInfo,
        Operation::GetArch,
        Operation::GetKernelInfo,
        Operation::GetOsInfo,
        Operation::GetCpuInfo,
        Operation::GetDisplays,
        Operation::GetMousePosition,
        Operation::SetMousePosition,
        Operation::SetMouseGrabbing,
        Operation::SendKey,
    ];

    /// The method name used on the wire.
    pub fn method_name(self) -> &'static str {
        match self {
            Operation::GetMemoryInfo => "getMemoryInfo",
            Operation::GetArch => "getArch",
            Operation::GetKernelInfo => "getKernelInfo",
            Operation::GetOsInfo => "getOSInfo",
            Operation::GetCpuInfo => "getCPUInfo",
            Operation::GetDisplays => "getDisplays",
            Operation::GetMousePosition => "getMousePosition",
            Operation::SetMousePosition => "setMousePosition",
            Operation::SetMouseGrabbing => "setMouseGrabbing",
            Operation::SendKey => "sendKey",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

impl FromStr for Operation {
    type Err = CommandError;

    /// Parses a method name, with or without the `computer.` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(NAMESPACE_PREFIX).unwrap_or(s);
        Operation::ALL
            .into_iter()
            .find(|op| op.method_name() == name)
            .ok_or_else(|| CommandError::UnknownOperation(s.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_operation_parses_from_its_own_name() {
        for op in Operation::ALL {
            assert_eq!(op.method_name().parse::<Operation>(), Ok(op));
        }
    }

    #[test]
    fn test_namespaced_name_parses() {
        assert_eq!(
            "computer.sendKey".parse::<Operation>(),
            Ok(Operation::SendKey)
        );
    }

    #[test]
    fn test_unknown_name_is_unknown_operation() {
        assert_eq!(
            "computer.getBattery".parse::<Operation>(),
            Err(CommandError::UnknownOperation("computer.getBattery".into()))
        );
    }

    #[test]
    fn test_method_names_are_case_sensitive() {
        assert!("getosinfo".parse::<Operation>().is_err());
    }
}
