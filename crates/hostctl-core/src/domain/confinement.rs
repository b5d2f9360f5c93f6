//! Pointer confinement emulation: window bounds and the clamp computation.
//!
//! Backends without a native clip primitive (macOS) emulate confinement by
//! intercepting every pointer-moved / dragged event, looking up the target
//! window's *current* bounds, and clamping the event's coordinates into that
//! rectangle before the event is delivered further.
//!
//! The bounds are never cached: the window can move or resize while a grab
//! is active, so [`PointerClamp`] calls its bounds lookup on every event.
//!
//! # Callback constraints
//!
//! [`PointerClamp::confine`] runs inside a callback invoked by the host's
//! native event-delivery loop, on whatever thread that loop runs on.  It must
//! stay fast and non-blocking (one bounds lookup plus a clamp) and must never
//! call back into the grab enable/disable operations.

/// A window's on-screen rectangle, stored as inclusive edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl WindowBounds {
    /// Builds bounds from an origin and a size.
    ///
    /// The maximum edge is the last pixel inside the window
    /// (`origin + size - 1`).  A dimension smaller than one pixel collapses
    /// the range onto the origin.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + (width - 1.0).max(0.0),
            max_y: y + (height - 1.0).max(0.0),
        }
    }

    /// Returns `true` if `(x, y)` lies within the inclusive bounds.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Clamps `(x, y)` into the inclusive bounds.
    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        // Not f64::clamp: that panics when min > max.
        (
            x.max(self.min_x).min(self.max_x),
            y.max(self.min_y).min(self.max_y),
        )
    }
}

/// What the interception callback should do with one pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClampOutcome {
    /// The event is already inside the window; deliver it untouched.
    Inside,
    /// The event was outside; rewrite it (and the system pointer) to this point.
    Clamped { x: f64, y: f64 },
    /// The window's bounds could not be determined (closed, minimised, or the
    /// lookup failed); deliver the event untouched.
    BoundsUnavailable,
}

/// Clamps pointer events into the bounds returned by a lookup function.
pub struct PointerClamp<F>
where
    F: Fn() -> Option<WindowBounds>,
{
    bounds: F,
}

impl<F> PointerClamp<F>
where
    F: Fn() -> Option<WindowBounds>,
{
    /// Creates a clamp that re-queries `bounds` for every event.
    pub fn new(bounds: F) -> Self {
        Self { bounds }
    }

    /// Decides how a pointer event at raw coordinates `(x, y)` is delivered.
    pub fn confine(&self, x: f64, y: f64) -> ClampOutcome {
        let Some(bounds) = (self.bounds)() else {
            return ClampOutcome::BoundsUnavailable;
        };
        if bounds.contains(x, y) {
            return ClampOutcome::Inside;
        }
        let (x, y) = bounds.clamp(x, y);
        ClampOutcome::Clamped { x, y }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
