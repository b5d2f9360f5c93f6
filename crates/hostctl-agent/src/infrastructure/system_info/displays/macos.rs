//! macOS display enumeration via Core Graphics (`CGDisplay`).
//!
//! Resolution is in physical pixels (`CGDisplayPixelsWide/High`), so a
//! Retina panel reports its native size.  DPI is derived from the panel's
//! physical width; refresh rate and depth come from the current display
//! mode.  Built-in panels often report a refresh rate of 0.

use core_graphics::display::CGDisplay;
use hostctl_core::domain::introspection::DisplayRecord;

use super::{dpi_from_physical, DisplayError, PlatformDisplayEnumerator};

#[derive(Debug, Default)]
pub struct MacosDisplayEnumerator;

impl MacosDisplayEnumerator {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformDisplayEnumerator for MacosDisplayEnumerator {
    fn enumerate_displays(&self) -> Result<Vec<DisplayRecord>, DisplayError> {
        let ids = CGDisplay::active_displays()
            .map_err(|e| DisplayError::PlatformError(format!("CGGetActiveDisplayList: CGError {e}")))?;

        Ok(ids
            .into_iter()
            .map(|id| {
                let display = CGDisplay::new(id);
                let width = display.pixels_wide() as u32;
                let mode = display.display_mode();
                DisplayRecord {
                    width,
                    height: display.pixels_high() as u32,
                    dpi: dpi_from_physical(width, display.screen_size().width),
                    bpp: mode.as_ref().map_or(0, |m| m.bit_depth() as u32),
                    refresh_rate: mode.as_ref().map_or(0.0, |m| m.refresh_rate()),
                }
            })
            .collect())
    }
}
