//! Backend contract for window-system integrations
//!
//! A window system plugs into the video subsystem through two traits:
//!
//! - [`BackendBootstrap`]: registered ahead of time; probes availability and
//!   constructs the device.
//! - [`VideoBackend`]: the device's operation table, driven by
//!   [`VideoSubsystem`](super::VideoSubsystem) for the lifetime of the device.
//!
//! Backends never see each other. The subsystem owns the device, the display
//! list and the windows, and passes each operation exactly what it needs.

use std::ffi::c_void;
use std::ptr::NonNull;

use crate::config::VideoConfig;

use super::display::{DisplayMode, VideoDisplay};
use super::error::VideoResult;
use super::syswm::{BackendIdentity, Version, WindowInfo};
use super::window::Window;

/// Registration entry for one backend
///
/// Bootstraps are probed in the order they are handed to
/// [`VideoSubsystem::init`](super::VideoSubsystem::init); the first available
/// one whose device constructs and initializes becomes the active backend.
pub trait BackendBootstrap {
    /// Driver name, matched against [`VideoConfig::driver`]
    fn name(&self) -> &'static str;

    /// One-line description for logs
    fn description(&self) -> &'static str;

    /// Whether this process runs under the backend's window system
    ///
    /// Must be free of side effects.
    fn available(&self) -> bool;

    /// Allocate the device and wire its operation table
    ///
    /// Fails with [`VideoError::OutOfMemory`](super::VideoError::OutOfMemory)
    /// when the device record cannot be allocated.
    fn create_device(&self, config: &VideoConfig) -> VideoResult<Box<dyn VideoBackend>>;
}

/// Operation table of a constructed backend device
///
/// # Thread Safety
/// Not `Send`: native window handles are usually bound to the thread that
/// created them, so a device stays on the thread that constructed it.
pub trait VideoBackend {
    /// Window system this device drives
    fn identity(&self) -> BackendIdentity;

    /// Bring the device up and register its displays
    ///
    /// On success `displays` holds at least one display. A failure leaves the
    /// device constructed but uninitialized.
    fn video_init(&mut self, displays: &mut Vec<VideoDisplay>) -> VideoResult<()>;

    /// Undo what [`video_init`](Self::video_init) set up
    fn video_quit(&mut self);

    /// Attach native state to a freshly inserted window
    ///
    /// The backend may override the requested geometry and flags. On error
    /// the window is discarded by the caller, so the backend must not have
    /// recorded it anywhere.
    fn create_window(&mut self, window: &mut Window, displays: &[VideoDisplay]) -> VideoResult<()>;

    /// Release native state attached to a window that is being destroyed
    fn destroy_window(&mut self, window: &mut Window);

    /// Switch `display` to `mode`
    fn set_display_mode(&mut self, display: &VideoDisplay, mode: &DisplayMode) -> VideoResult<()>;

    /// Describe the window's native handles for a caller built against `version`
    fn window_wm_info(&self, window: &Window, version: Version) -> VideoResult<WindowInfo>;

    /// Attach (or find) the `CAMetalLayer` MoltenVK renders the window into
    ///
    /// Only meaningful on Apple window systems. The first call may create the
    /// layer and attach it to the window's view; later calls return the same
    /// layer. Returns `None` when no layer can be attached.
    fn attach_metal_view(&mut self, _window: &mut Window) -> Option<NonNull<c_void>> {
        None
    }
}
