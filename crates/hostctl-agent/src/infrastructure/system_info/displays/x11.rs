//! X11 display enumeration via Xlib and XRandR.
//!
//! One record per X screen.  Xinerama / RandR outputs sharing a single X
//! screen are reported as that one screen.  Refresh rate comes from
//! `XRRConfigCurrentRate`; it is 0 when RandR is unavailable.

use std::ptr;

use hostctl_core::domain::introspection::DisplayRecord;
use x11::{xlib, xrandr};

use super::{dpi_from_physical, DisplayError, PlatformDisplayEnumerator};

#[derive(Debug, Default)]
pub struct X11DisplayEnumerator;

impl X11DisplayEnumerator {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformDisplayEnumerator for X11DisplayEnumerator {
    fn enumerate_displays(&self) -> Result<Vec<DisplayRecord>, DisplayError> {
        // SAFETY: a null name means "use $DISPLAY"; checked before use.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            let name = std::env::var("DISPLAY").unwrap_or_else(|_| "<unset>".to_string());
            return Err(DisplayError::PlatformError(format!(
                "XOpenDisplay failed; DISPLAY={name}"
            )));
        }

        // SAFETY: `display` is valid until XCloseDisplay below; every screen
        // number is in [0, screen_count).
        let records = unsafe {
            let screen_count = xlib::XScreenCount(display);
            (0..screen_count)
                .map(|screen| {
                    let width = xlib::XDisplayWidth(display, screen).max(0) as u32;
                    let height = xlib::XDisplayHeight(display, screen).max(0) as u32;
                    let width_mm = f64::from(xlib::XDisplayWidthMM(display, screen));
                    DisplayRecord {
                        width,
                        height,
                        dpi: dpi_from_physical(width, width_mm),
                        bpp: xlib::XDefaultDepth(display, screen).max(0) as u32,
                        refresh_rate: current_rate(display, screen),
                    }
                })
                .collect()
        };

        // SAFETY: opened above and not used after this point.
        unsafe { xlib::XCloseDisplay(display) };
        Ok(records)
    }
}

/// Current refresh rate of `screen` in Hz, or 0 if RandR cannot tell.
///
/// # Safety
///
/// `display` must be an open connection and `screen` a valid screen number.
unsafe fn current_rate(display: *mut xlib::Display, screen: i32) -> f64 {
    let root = xlib::XRootWindow(display, screen);
    let config = xrandr::XRRGetScreenInfo(display, root);
    if config.is_null() {
        return 0.0;
    }
    let rate = xrandr::XRRConfigCurrentRate(config);
    xrandr::XRRFreeScreenConfigInfo(config);
    f64::from(rate.max(0))
}
