//! Pointer confinement on macOS via a `CGEventTap`.
//!
//! macOS has no clip-region primitive.  Confinement is emulated: an active
//! event tap sees every pointer motion event, runs it through a
//! [`PointerClamp`] and, when the event lies outside the window, rewrites
//! its location and warps the cursor to the clamped point.
//!
//! Ownership:
//!   [`EventTap`] owns the tap port, its run-loop source and the callback
//!   state (passed to the C callback through `user_info`).  Releasing or
//!   dropping the tap detaches it from the main run loop at once.  The
//!   callback only ever runs on the main thread, so the three resources are
//!   freed there: immediately when teardown already runs on the main
//!   thread, otherwise by the next [`pump_main_run_loop`] pass.
//!
//! The source is added to the **main** run loop in the common modes, so
//! the process must pump the main run loop (see [`pump_main_run_loop`]) for
//! the tap to see events.
//!
//! Required permission: Accessibility (System Settings > Privacy &
//! Security > Accessibility).

use std::ffi::c_void;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::{Mutex, MutexGuard};

use core_graphics::geometry::{CGPoint, CGRect};
use hostctl_core::{ClampOutcome, PointerClamp, WindowBounds};
use tracing::{debug, info};

use crate::application::capability::{BackendError, Confinement};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const CG_EVENT_MOUSE_MOVED: u32 = 5;
const CG_EVENT_LEFT_MOUSE_DRAGGED: u32 = 6;
const CG_EVENT_RIGHT_MOUSE_DRAGGED: u32 = 7;
const CG_EVENT_OTHER_MOUSE_DRAGGED: u32 = 27;

/// The OS disabled the tap because a callback took too long.
const CG_EVENT_TAP_DISABLED_BY_TIMEOUT: u32 = 0xFFFF_FFFE;
/// The OS disabled the tap in response to user input (secure input etc.).
const CG_EVENT_TAP_DISABLED_BY_USER_INPUT: u32 = 0xFFFF_FFFF;

const EVENT_MASK: u64 = (1u64 << CG_EVENT_MOUSE_MOVED)
    | (1u64 << CG_EVENT_LEFT_MOUSE_DRAGGED)
    | (1u64 << CG_EVENT_RIGHT_MOUSE_DRAGGED)
    | (1u64 << CG_EVENT_OTHER_MOUSE_DRAGGED);

/// kCGSessionEventTap
const CG_SESSION_EVENT_TAP: u32 = 1;
/// kCGHeadInsertEventTap
const CG_HEAD_INSERT_EVENT_TAP: u32 = 0;
/// kCGEventTapOptionDefault: active tap, events may be modified.
const CG_EVENT_TAP_OPTION_DEFAULT: u32 = 0;

/// kCGWindowListOptionIncludingWindow
const CG_WINDOW_LIST_OPTION_INCLUDING_WINDOW: u32 = 1 << 3;

// ---------------------------------------------------------------------------
// Raw FFI
// ---------------------------------------------------------------------------

type CFMachPortRef = *mut c_void;
type CFRunLoopRef = *mut c_void;
type CFRunLoopSourceRef = *mut c_void;
type CFStringRef = *const c_void;
type CFArrayRef = *const c_void;
type CFDictionaryRef = *const c_void;
type CGEventRef = *mut c_void;
type CGEventTapProxy = *mut c_void;

type CGEventTapCallBack = unsafe extern "C" fn(
    proxy: CGEventTapProxy,
    event_type: u32,
    event: CGEventRef,
    user_info: *mut c_void,
) -> CGEventRef;

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXIsProcessTrusted() -> bool;

    fn CGEventTapCreate(
        tap: u32,
        place: u32,
        options: u32,
        events_of_interest: u64,
        callback: CGEventTapCallBack,
        user_info: *mut c_void,
    ) -> CFMachPortRef;

    fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);

    fn CGEventGetLocation(event: CGEventRef) -> CGPoint;

    fn CGEventSetLocation(event: CGEventRef, location: CGPoint);

    fn CGWarpMouseCursorPosition(new_position: CGPoint) -> i32;

    fn CGAssociateMouseAndMouseCursorPosition(connected: bool) -> i32;

    fn CGWindowListCopyWindowInfo(option: u32, relative_to_window: u32) -> CFArrayRef;

    fn CGRectMakeWithDictionaryRepresentation(dict: CFDictionaryRef, rect: *mut CGRect) -> bool;

    static kCGWindowBounds: CFStringRef;
}

#[link(name = "CoreFoundation", kind = "framework")]
extern "C" {
    fn CFMachPortCreateRunLoopSource(
        allocator: *mut c_void,
        port: CFMachPortRef,
        order: isize,
    ) -> CFRunLoopSourceRef;

    fn CFMachPortInvalidate(port: CFMachPortRef);

    fn CFRunLoopGetMain() -> CFRunLoopRef;

    fn CFRunLoopGetCurrent() -> CFRunLoopRef;

    fn CFRunLoopAddSource(rl: CFRunLoopRef, source: CFRunLoopSourceRef, mode: CFStringRef);

    fn CFRunLoopRemoveSource(rl: CFRunLoopRef, source: CFRunLoopSourceRef, mode: CFStringRef);

    fn CFRunLoopRunInMode(mode: CFStringRef, seconds: f64, return_after_source_handled: bool) -> i32;

    fn CFArrayGetCount(array: CFArrayRef) -> isize;

    fn CFArrayGetValueAtIndex(array: CFArrayRef, index: isize) -> *const c_void;

    fn CFDictionaryGetValue(dict: CFDictionaryRef, key: *const c_void) -> *const c_void;

    fn CFRelease(cf: *const c_void);

    static kCFRunLoopCommonModes: CFStringRef;

    static kCFRunLoopDefaultMode: CFStringRef;
}

// ---------------------------------------------------------------------------
// Window bounds
// ---------------------------------------------------------------------------

/// Current on-screen bounds of Quartz window `window_id`, in global
/// top-left-origin coordinates, or `None` if the window is gone.
pub(crate) fn window_bounds(window_id: u32) -> Option<WindowBounds> {
    // SAFETY: the returned array is owned by us (Copy rule) and released
    // below; dictionary values are borrowed from it and not used after.
    unsafe {
        let list = CGWindowListCopyWindowInfo(CG_WINDOW_LIST_OPTION_INCLUDING_WINDOW, window_id);
        if list.is_null() {
            return None;
        }
        let mut bounds = None;
        if CFArrayGetCount(list) > 0 {
            let info = CFArrayGetValueAtIndex(list, 0) as CFDictionaryRef;
            let dict = CFDictionaryGetValue(info, kCGWindowBounds) as CFDictionaryRef;
            let mut rect = std::mem::zeroed::<CGRect>();
            if !dict.is_null() && CGRectMakeWithDictionaryRepresentation(dict, &mut rect) {
                bounds = Some(WindowBounds::from_origin_size(
                    rect.origin.x,
                    rect.origin.y,
                    rect.size.width,
                    rect.size.height,
                ));
            }
        }
        CFRelease(list);
        bounds
    }
}

// ---------------------------------------------------------------------------
// Callback state
// ---------------------------------------------------------------------------

type BoundsLookup = Box<dyn Fn() -> Option<WindowBounds> + Send>;

/// Heap state handed to the C callback through `user_info`.
struct TapState {
    clamp: PointerClamp<BoundsLookup>,
    /// The tap's own port, needed to re-enable it.  Set before the source is
    /// added to the run loop.
    port: AtomicPtr<c_void>,
}

unsafe extern "C" fn tap_callback(
    _proxy: CGEventTapProxy,
    event_type: u32,
    event: CGEventRef,
    user_info: *mut c_void,
) -> CGEventRef {
    // SAFETY: `user_info` is the `TapState` leaked in `EventTap::install`.
    // It is freed only on the main thread outside any callback, after the
    // source has left the run loop.
    let state = &*(user_info as *const TapState);

    if event_type == CG_EVENT_TAP_DISABLED_BY_TIMEOUT || event_type == CG_EVENT_TAP_DISABLED_BY_USER_INPUT {
        let port = state.port.load(Ordering::Acquire);
        if !port.is_null() {
            CGEventTapEnable(port, true);
            info!(event_type, "confinement event tap re-enabled");
        }
        return event;
    }

    let location = CGEventGetLocation(event);
    if let ClampOutcome::Clamped { x, y } = state.clamp.confine(location.x, location.y) {
        let clamped = CGPoint::new(x, y);
        CGEventSetLocation(event, clamped);
        CGWarpMouseCursorPosition(clamped);
        CGAssociateMouseAndMouseCursorPosition(true);
    }
    event
}

// ---------------------------------------------------------------------------
// The tap
// ---------------------------------------------------------------------------

/// An installed confinement tap.
pub(crate) struct EventTap {
    port: CFMachPortRef,
    source: CFRunLoopSourceRef,
    state: *mut TapState,
}

// SAFETY: Core Foundation objects may be used from any thread; the state
// pointer is only dereferenced by the callback and freed once, on the main
// thread.
unsafe impl Send for EventTap {}

impl EventTap {
    /// Creates the tap for window `window_id` and adds it to the main run
    /// loop.
    pub(crate) fn install(window_id: u32) -> Result<Self, BackendError> {
        // SAFETY: no preconditions.
        if !unsafe { AXIsProcessTrusted() } {
            return Err(BackendError::native(
                "CGEventTapCreate",
                "Accessibility permission required",
            ));
        }
        if window_bounds(window_id).is_none() {
            return Err(BackendError::native(
                "CGWindowListCopyWindowInfo",
                format!("window {window_id} is not on screen"),
            ));
        }

        let lookup: BoundsLookup = Box::new(move || window_bounds(window_id));
        let state = Box::into_raw(Box::new(TapState {
            clamp: PointerClamp::new(lookup),
            port: AtomicPtr::new(std::ptr::null_mut()),
        }));

        // SAFETY: `state` stays valid until `teardown` frees it.
        let port = unsafe {
            CGEventTapCreate(
                CG_SESSION_EVENT_TAP,
                CG_HEAD_INSERT_EVENT_TAP,
                CG_EVENT_TAP_OPTION_DEFAULT,
                EVENT_MASK,
                tap_callback,
                state as *mut c_void,
            )
        };
        if port.is_null() {
            // SAFETY: the tap was never created, so nothing else holds `state`.
            drop(unsafe { Box::from_raw(state) });
            return Err(BackendError::native("CGEventTapCreate", "returned null"));
        }

        // SAFETY: `port` is a live mach port we own.
        let source = unsafe { CFMachPortCreateRunLoopSource(std::ptr::null_mut(), port, 0) };
        if source.is_null() {
            // SAFETY: the port has no source, so the callback can never run.
            unsafe {
                CFMachPortInvalidate(port);
                CFRelease(port);
                drop(Box::from_raw(state));
            }
            return Err(BackendError::native("CFMachPortCreateRunLoopSource", "returned null"));
        }

        // SAFETY: `state` is live; the port is published before the callback
        // can be dispatched.
        unsafe {
            (*state).port.store(port, Ordering::Release);
            CFRunLoopAddSource(CFRunLoopGetMain(), source, kCFRunLoopCommonModes);
            CGEventTapEnable(port, true);
        }
        debug!(window_id, "confinement event tap installed");
        Ok(Self { port, source, state })
    }

    fn teardown(&mut self) {
        if self.state.is_null() {
            return;
        }
        // SAFETY: `port` and `source` are live until `Retired::free`; these
        // calls are thread-safe and stop any further dispatch.
        unsafe {
            CGEventTapEnable(self.port, false);
            CFRunLoopRemoveSource(CFRunLoopGetMain(), self.source, kCFRunLoopCommonModes);
            CFMachPortInvalidate(self.port);
        }
        let retired = Retired {
            port: std::mem::replace(&mut self.port, std::ptr::null_mut()),
            source: std::mem::replace(&mut self.source, std::ptr::null_mut()),
            state: std::mem::replace(&mut self.state, std::ptr::null_mut()),
        };
        if on_main_thread() {
            // SAFETY: on the main thread no callback is in flight.
            unsafe { retired.free() };
            debug!("confinement event tap removed");
        } else {
            retired_taps().push(retired);
            debug!("confinement event tap detached; freed on the next main run loop pass");
        }
    }
}

/// Resources of a detached tap awaiting release on the main thread.
struct Retired {
    port: CFMachPortRef,
    source: CFRunLoopSourceRef,
    state: *mut TapState,
}

// SAFETY: the pointers are only freed, once, by whoever pops the entry.
unsafe impl Send for Retired {}

impl Retired {
    /// # Safety
    ///
    /// No tap callback may be running, and the source must no longer be
    /// attached to any run loop.
    unsafe fn free(self) {
        if !self.source.is_null() {
            CFRelease(self.source);
        }
        if !self.port.is_null() {
            CFRelease(self.port);
        }
        if !self.state.is_null() {
            drop(Box::from_raw(self.state));
        }
    }
}

static RETIRED: Mutex<Vec<Retired>> = Mutex::new(Vec::new());

fn retired_taps() -> MutexGuard<'static, Vec<Retired>> {
    RETIRED.lock().unwrap_or_else(|p| p.into_inner())
}

fn on_main_thread() -> bool {
    // SAFETY: no preconditions.
    unsafe { CFRunLoopGetCurrent() == CFRunLoopGetMain() }
}

/// Frees every tap detached off the main thread.  Must not be called from
/// inside a tap callback.
fn release_retired_taps() {
    let retired = std::mem::take(&mut *retired_taps());
    for tap in retired {
        // SAFETY: called between run loop passes, so no callback is running;
        // each entry's source was removed by `teardown`.
        unsafe { tap.free() };
    }
}

impl Confinement for EventTap {
    fn release(mut self: Box<Self>) -> Result<(), BackendError> {
        self.teardown();
        Ok(())
    }
}

impl Drop for EventTap {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Runs the main run loop for up to `seconds`, returning early after one
/// source is handled, then frees taps released from other threads.  Must
/// be called on the main thread.
pub fn pump_main_run_loop(seconds: f64) {
    // SAFETY: the default mode constant is a static CFString.
    unsafe {
        CFRunLoopRunInMode(kCFRunLoopDefaultMode, seconds, true);
    }
    release_retired_taps();
}

// ── Tests ─────────────────────────────────────────────────────────────────────
