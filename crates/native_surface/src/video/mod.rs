//! Video subsystem: backend registry, device lifecycle and windows
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Application Code            │
//! └─────────────┬───────────────────┘
//!               │ Uses
//!      ┌────────▼────────┐
//!      │ VideoSubsystem  │ ← Context object (this module)
//!      └────────┬────────┘
//!               │ Owns one
//!      ┌────────▼────────┐
//!      │ VideoDevice     │ ← Displays, windows, operation table
//!      └────────┬────────┘
//!               │ Drives
//!   ┌───────────▼───────────┐
//!   │ dyn VideoBackend      │ ← winrt::WinRtBackend, raw::RawHandleBackend
//!   └───────────────────────┘
//! ```
//!
//! # Lifecycle
//!
//! `construct_device → video_init → [create_window ⇄ destroy_window]* →
//! video_quit → destroy_device`. [`VideoSubsystem::init`] and
//! [`VideoSubsystem::quit`] run the whole sequence.
//!
//! At most one device is active per process: constructing a device claims a
//! process-wide slot, and destroying it releases the slot. Within a
//! subsystem all mutators take `&mut self`, which serializes
//! construct/destroy and window create/destroy.

pub mod backend;
pub mod display;
pub mod error;
pub mod metal;
pub mod raw;
pub mod syswm;
pub mod window;
pub mod winrt;

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::{Mutex, PoisonError};

use log::{debug, info, warn};
use slotmap::SlotMap;

use crate::config::VideoConfig;

pub use backend::{BackendBootstrap, VideoBackend};
pub use display::{DisplayMode, PixelFormat, VideoDisplay};
pub use error::{VideoError, VideoResult, ViewAttachmentFailure};
pub use syswm::{BackendIdentity, NativeHandles, Version, WindowInfo, X11Connection, SYSWM_INFO_VERSION};
pub use window::{Window, WindowFlags, WindowId};

/// Driver of the one device active in this process
static ACTIVE_DRIVER: Mutex<Option<&'static str>> = Mutex::new(None);

/// The active backend device and everything it owns
pub struct VideoDevice {
    driver: &'static str,
    backend: Box<dyn VideoBackend>,
    displays: Vec<VideoDisplay>,
    windows: SlotMap<WindowId, Window>,
    initialized: bool,
}

impl VideoDevice {
    fn new(driver: &'static str, backend: Box<dyn VideoBackend>) -> Self {
        Self {
            driver,
            backend,
            displays: Vec::new(),
            windows: SlotMap::with_key(),
            initialized: false,
        }
    }
}

/// Explicit context for the process's video state
#[derive(Default)]
pub struct VideoSubsystem {
    device: Option<VideoDevice>,
}

impl VideoSubsystem {
    /// Create an empty subsystem with no device
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct and initialize the first available backend
    ///
    /// If initialization fails the constructed device is destroyed again, so
    /// the subsystem is left exactly as it was.
    pub fn init(&mut self, bootstraps: &[&dyn BackendBootstrap], config: &VideoConfig) -> VideoResult<()> {
        self.construct_device(bootstraps, config)?;
        if let Err(err) = self.video_init() {
            self.destroy_device();
            return Err(err);
        }
        Ok(())
    }

    /// Probe `bootstraps` in order and construct the first available device
    pub fn construct_device(&mut self, bootstraps: &[&dyn BackendBootstrap], config: &VideoConfig) -> VideoResult<()> {
        if let Some(device) = &self.device {
            return Err(VideoError::AlreadyInitialized { driver: device.driver });
        }

        let mut active = ACTIVE_DRIVER.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(driver) = *active {
            warn!("Video driver '{driver}' is already active in this process");
            return Err(VideoError::AlreadyInitialized { driver });
        }

        let requested = config.driver.as_deref().map(str::trim);
        for bootstrap in bootstraps {
            if let Some(name) = requested {
                if !bootstrap.name().eq_ignore_ascii_case(name) {
                    continue;
                }
            }
            if !bootstrap.available() {
                debug!("Video driver '{}' is not available", bootstrap.name());
                continue;
            }

            let backend = bootstrap.create_device(config)?;
            info!("Constructed video device '{}' ({})", bootstrap.name(), bootstrap.description());
            *active = Some(bootstrap.name());
            self.device = Some(VideoDevice::new(bootstrap.name(), backend));
            return Ok(());
        }

        let err = VideoError::NoBackendAvailable { requested: requested.map(str::to_string) };
        warn!("{err}");
        Err(err)
    }

    /// Initialize the constructed device
    pub fn video_init(&mut self) -> VideoResult<()> {
        let device = self.device.as_mut().ok_or(VideoError::NotInitialized)?;
        if device.initialized {
            return Err(VideoError::AlreadyInitialized { driver: device.driver });
        }

        let mut displays = Vec::new();
        device.backend.video_init(&mut displays).map_err(|err| {
            warn!("Video driver '{}' failed to initialize: {err}", device.driver);
            err
        })?;
        device.displays = displays;
        device.initialized = true;
        info!("Video driver '{}' initialized with {} display(s)", device.driver, device.displays.len());
        Ok(())
    }

    /// Destroy every window and shut the device down; the device stays constructed
    pub fn video_quit(&mut self) {
        let Some(device) = self.device.as_mut().filter(|device| device.initialized) else {
            return;
        };

        let ids: Vec<WindowId> = device.windows.keys().collect();
        for id in ids {
            if let Some(mut window) = device.windows.remove(id) {
                device.backend.destroy_window(&mut window);
            }
        }
        device.backend.video_quit();
        device.displays.clear();
        device.initialized = false;
        debug!("Video driver '{}' shut down", device.driver);
    }

    /// Release the device; quits it first if it is still initialized
    pub fn destroy_device(&mut self) {
        self.video_quit();
        if let Some(device) = self.device.take() {
            *ACTIVE_DRIVER.lock().unwrap_or_else(PoisonError::into_inner) = None;
            debug!("Destroyed video device '{}'", device.driver);
        }
    }

    /// Shut down and destroy the active device
    pub fn quit(&mut self) {
        self.destroy_device();
    }

    /// Whether a device is constructed and initialized
    pub fn is_initialized(&self) -> bool {
        self.device.as_ref().is_some_and(|device| device.initialized)
    }

    /// Whether a device is constructed, initialized or not
    pub fn has_device(&self) -> bool {
        self.device.is_some()
    }

    /// Name of the initialized driver
    pub fn current_driver(&self) -> Option<&'static str> {
        self.active().ok().map(|device| device.driver)
    }

    /// Window system of the initialized driver
    pub fn active_backend(&self) -> Option<BackendIdentity> {
        self.active().ok().map(|device| device.backend.identity())
    }

    /// Displays registered by the initialized driver
    pub fn displays(&self) -> &[VideoDisplay] {
        self.active().map(|device| device.displays.as_slice()).unwrap_or_default()
    }

    /// Ask the backend to switch a display's mode
    ///
    /// The index is checked here, before the backend runs: an index with no
    /// display is `InvalidDisplay` and a subsystem without a device is
    /// `NotInitialized`. Whatever the backend answers is returned unchanged
    /// (WinRT accepts every mode and changes nothing).
    pub fn set_display_mode(&mut self, display_index: usize, mode: &DisplayMode) -> VideoResult<()> {
        let device = self.active_mut()?;
        let display = device.displays.get(display_index).ok_or(VideoError::InvalidDisplay(display_index))?;
        device.backend.set_display_mode(display, mode)
    }

    /// Create a window; the backend may override the requested geometry
    pub fn create_window(
        &mut self,
        title: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: WindowFlags,
    ) -> VideoResult<WindowId> {
        let device = self.active_mut()?;
        let id = device
            .windows
            .insert_with_key(|id| Window::new(id, title, x, y, width, height, flags));

        if let Err(err) = device.backend.create_window(&mut device.windows[id], &device.displays) {
            device.windows.remove(id);
            warn!("Failed to create window '{title}': {err}");
            return Err(err);
        }

        debug!("Created window {id:?} '{title}'");
        Ok(id)
    }

    /// Destroy a window and release the backend's per-window record
    pub fn destroy_window(&mut self, id: WindowId) -> VideoResult<()> {
        let device = self.active_mut()?;
        let mut window = device.windows.remove(id).ok_or(VideoError::InvalidWindow(id))?;
        device.backend.destroy_window(&mut window);
        debug!("Destroyed window {id:?}");
        Ok(())
    }

    /// Borrow a live window
    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.active().ok().and_then(|device| device.windows.get(id))
    }

    /// Number of live windows
    pub fn window_count(&self) -> usize {
        self.active().map_or(0, |device| device.windows.len())
    }

    /// Describe a window's native handles
    pub fn window_wm_info(&self, id: WindowId, version: Version) -> VideoResult<WindowInfo> {
        let device = self.active()?;
        let window = device.windows.get(id).ok_or(VideoError::InvalidWindow(id))?;
        device.backend.window_wm_info(window, version)
    }

    /// Attach a `CAMetalLayer` to a window's view, creating it on first use
    pub fn attach_metal_view(&mut self, id: WindowId) -> VideoResult<Option<NonNull<c_void>>> {
        let device = self.active_mut()?;
        let window = device.windows.get_mut(id).ok_or(VideoError::InvalidWindow(id))?;
        Ok(device.backend.attach_metal_view(window))
    }

    fn active(&self) -> VideoResult<&VideoDevice> {
        self.device
            .as_ref()
            .filter(|device| device.initialized)
            .ok_or(VideoError::NotInitialized)
    }

    fn active_mut(&mut self) -> VideoResult<&mut VideoDevice> {
        self.device
            .as_mut()
            .filter(|device| device.initialized)
            .ok_or(VideoError::NotInitialized)
    }
}

impl Drop for VideoSubsystem {
    fn drop(&mut self) {
        self.destroy_device();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::ops::{Deref, DerefMut};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use super::VideoSubsystem;

    static SERIAL: Mutex<()> = Mutex::new(());

    /// A subsystem holding the test-wide device lock
    ///
    /// The device slot is process-wide, so tests that construct a device run
    /// one at a time. The subsystem is dropped before the lock is released.
    pub struct SerialVideo {
        video: VideoSubsystem,
        _serial: MutexGuard<'static, ()>,
    }

    impl Deref for SerialVideo {
        type Target = VideoSubsystem;

        fn deref(&self) -> &VideoSubsystem {
            &self.video
        }
    }

    impl DerefMut for SerialVideo {
        fn deref_mut(&mut self) -> &mut VideoSubsystem {
            &mut self.video
        }
    }

    /// Empty subsystem; blocks until no other test holds a device
    pub fn subsystem() -> SerialVideo {
        let serial = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        SerialVideo { video: VideoSubsystem::new(), _serial: serial }
    }

    /// Second subsystem sharing the lock held by `first`
    pub fn sibling(_first: &SerialVideo) -> VideoSubsystem {
        VideoSubsystem::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::testing;
    use crate::video::winrt::{FixedShell, WinRtBootstrap};

    struct Unavailable;

    impl BackendBootstrap for Unavailable {
        fn name(&self) -> &'static str {
            "offline"
        }

        fn description(&self) -> &'static str {
            "never available"
        }

        fn available(&self) -> bool {
            false
        }

        fn create_device(&self, _config: &VideoConfig) -> VideoResult<Box<dyn VideoBackend>> {
            unreachable!("create_device called on an unavailable bootstrap")
        }
    }

    fn winrt() -> WinRtBootstrap<FixedShell> {
        WinRtBootstrap::new(FixedShell::new(800.0, 600.0))
    }

    #[test]
    fn test_init_skips_unavailable() {
        let bootstrap = winrt();
        let mut video = testing::subsystem();
        video.init(&[&Unavailable, &bootstrap], &VideoConfig::default()).unwrap();

        assert_eq!(video.current_driver(), Some("winrt"));
        assert_eq!(video.active_backend(), Some(BackendIdentity::WinRt));
        assert_eq!(video.displays().len(), 1);
    }

    #[test]
    fn test_init_with_no_backend() {
        let mut video = testing::subsystem();
        let result = video.init(&[&Unavailable], &VideoConfig::default());
        assert!(matches!(result, Err(VideoError::NoBackendAvailable { requested: None })));
        assert!(!video.has_device());
    }

    #[test]
    fn test_driver_hint_filters_bootstraps() {
        let bootstrap = winrt();
        let mut video = testing::subsystem();
        let config = VideoConfig::default().with_driver("x11");
        let result = video.init(&[&bootstrap], &config);
        assert!(matches!(result, Err(VideoError::NoBackendAvailable { requested: Some(ref name) }) if name == "x11"));

        let config = VideoConfig::default().with_driver("WinRT");
        video.init(&[&bootstrap], &config).unwrap();
        assert!(video.is_initialized());
    }

    #[test]
    fn test_double_init_rejected() {
        let bootstrap = winrt();
        let mut video = testing::subsystem();
        video.init(&[&bootstrap], &VideoConfig::default()).unwrap();
        let result = video.init(&[&bootstrap], &VideoConfig::default());
        assert!(matches!(result, Err(VideoError::AlreadyInitialized { driver: "winrt" })));
    }

    #[test]
    fn test_failed_init_leaves_no_device() {
        let bootstrap = WinRtBootstrap::new(FixedShell::new(0.0, 0.0));
        let mut video = testing::subsystem();
        let result = video.init(&[&bootstrap], &VideoConfig::default());
        assert!(matches!(result, Err(VideoError::DisplaySizeUnavailable)));
        assert!(!video.has_device());
        assert_eq!(video.active_backend(), None);
    }

    #[test]
    fn test_staged_lifecycle() {
        let bootstrap = winrt();
        let mut video = testing::subsystem();

        video.construct_device(&[&bootstrap], &VideoConfig::default()).unwrap();
        assert!(video.has_device());
        assert!(!video.is_initialized());
        assert!(matches!(
            video.create_window("early", 0, 0, 1, 1, WindowFlags::empty()),
            Err(VideoError::NotInitialized)
        ));

        video.video_init().unwrap();
        let id = video.create_window("main", 0, 0, 1, 1, WindowFlags::empty()).unwrap();
        assert_eq!(video.window_count(), 1);

        video.video_quit();
        assert!(video.has_device());
        assert!(!video.is_initialized());
        assert!(video.window(id).is_none());

        video.destroy_device();
        assert!(!video.has_device());
    }

    #[test]
    fn test_stale_window_id() {
        let bootstrap = winrt();
        let mut video = testing::subsystem();
        video.init(&[&bootstrap], &VideoConfig::default()).unwrap();

        let id = video.create_window("main", 0, 0, 1, 1, WindowFlags::empty()).unwrap();
        video.destroy_window(id).unwrap();
        assert!(matches!(video.destroy_window(id), Err(VideoError::InvalidWindow(_))));
        assert!(matches!(video.window_wm_info(id, SYSWM_INFO_VERSION), Err(VideoError::InvalidWindow(_))));
    }

    #[test]
    fn test_set_display_mode_bad_index() {
        let bootstrap = winrt();
        let mut video = testing::subsystem();
        video.init(&[&bootstrap], &VideoConfig::default()).unwrap();
        let mode = DisplayMode::zeroed();
        assert!(matches!(video.set_display_mode(3, &mode), Err(VideoError::InvalidDisplay(3))));
    }

    #[test]
    fn test_one_device_per_process() {
        let bootstrap = winrt();
        let mut first = testing::subsystem();
        first.init(&[&bootstrap], &VideoConfig::default()).unwrap();

        let mut second = testing::sibling(&first);
        let result = second.init(&[&bootstrap], &VideoConfig::default());
        assert!(matches!(result, Err(VideoError::AlreadyInitialized { driver: "winrt" })));
        assert!(!second.has_device());
        assert!(first.create_window("main", 0, 0, 1, 1, WindowFlags::empty()).is_ok());

        first.quit();
        second.init(&[&bootstrap], &VideoConfig::default()).unwrap();
        assert_eq!(second.current_driver(), Some("winrt"));
        second.quit();
    }

    #[test]
    fn test_failed_init_releases_process_slot() {
        let empty = WinRtBootstrap::new(FixedShell::new(0.0, 0.0));
        let mut video = testing::subsystem();
        assert!(video.init(&[&empty], &VideoConfig::default()).is_err());

        let mut other = testing::sibling(&video);
        other.init(&[&winrt()], &VideoConfig::default()).unwrap();
        other.quit();
    }
}
