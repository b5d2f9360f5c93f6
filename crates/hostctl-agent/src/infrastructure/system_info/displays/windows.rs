//! Windows display enumeration via `EnumDisplayMonitors`.
//!
//! Per monitor: resolution, depth and refresh rate from the current mode
//! (`EnumDisplaySettingsW` on the monitor's device name), DPI from
//! `GetDpiForMonitor` (effective DPI, 96 = 100 % scaling).

use hostctl_core::domain::introspection::DisplayRecord;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, EnumDisplaySettingsW, GetMonitorInfoW, DEVMODEW, ENUM_CURRENT_SETTINGS,
    HDC, HMONITOR, MONITORINFO, MONITORINFOEXW,
};
use windows::Win32::UI::HiDpi::{GetDpiForMonitor, MDT_EFFECTIVE_DPI};

use super::{DisplayError, PlatformDisplayEnumerator};

#[derive(Debug, Default)]
pub struct WindowsDisplayEnumerator;

impl WindowsDisplayEnumerator {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformDisplayEnumerator for WindowsDisplayEnumerator {
    fn enumerate_displays(&self) -> Result<Vec<DisplayRecord>, DisplayError> {
        let mut displays: Vec<DisplayRecord> = Vec::new();

        // SAFETY: the callback is synchronous and only runs inside this
        // call, while `displays` is alive.
        let ok = unsafe {
            EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(monitor_enum_proc),
                LPARAM(&mut displays as *mut Vec<DisplayRecord> as isize),
            )
        };
        if !ok.as_bool() {
            return Err(DisplayError::PlatformError(
                "EnumDisplayMonitors failed".to_string(),
            ));
        }
        Ok(displays)
    }
}

/// # Safety
///
/// Called by Win32 inside `EnumDisplayMonitors`.  `lparam` must point to a
/// live `Vec<DisplayRecord>` for the duration of the enumeration.
unsafe extern "system" fn monitor_enum_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let displays = &mut *(lparam.0 as *mut Vec<DisplayRecord>);

    let mut info: MONITORINFOEXW = std::mem::zeroed();
    info.monitorInfo.cbSize = std::mem::size_of::<MONITORINFOEXW>() as u32;
    if !GetMonitorInfoW(hmonitor, &mut info as *mut MONITORINFOEXW as *mut MONITORINFO).as_bool() {
        return BOOL(1);
    }

    let rc = info.monitorInfo.rcMonitor;
    let mut record = DisplayRecord {
        width: (rc.right - rc.left).max(0) as u32,
        height: (rc.bottom - rc.top).max(0) as u32,
        dpi: 0,
        bpp: 0,
        refresh_rate: 0.0,
    };

    let mut mode: DEVMODEW = std::mem::zeroed();
    mode.dmSize = std::mem::size_of::<DEVMODEW>() as u16;
    if EnumDisplaySettingsW(PCWSTR(info.szDevice.as_ptr()), ENUM_CURRENT_SETTINGS, &mut mode).as_bool() {
        record.width = mode.dmPelsWidth;
        record.height = mode.dmPelsHeight;
        record.bpp = mode.dmBitsPerPel;
        record.refresh_rate = f64::from(mode.dmDisplayFrequency);
    }

    let (mut dpi_x, mut dpi_y) = (0u32, 0u32);
    if GetDpiForMonitor(hmonitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y).is_ok() {
        record.dpi = dpi_x;
    }

    displays.push(record);
    BOOL(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_display_enumerator_smoke() {
        // Service sessions may have no monitors; only a panic is a failure.
        if let Ok(displays) = WindowsDisplayEnumerator::new().enumerate_displays() {
            for d in displays {
                assert!(d.width > 0 && d.height > 0);
            }
        }
    }
}
