//! WinRT CoreWindow video backend
//!
//! WinRT gives an application exactly one CoreWindow, sized and placed by
//! the shell. This backend therefore:
//!
//! - allows a single window per device;
//! - forces that window fullscreen at (0,0) with the size of the current
//!   display mode, ignoring the requested geometry;
//! - derives the display mode from the CoreWindow bounds scaled by the
//!   display's logical DPI;
//! - accepts but ignores display mode changes.
//!
//! WinRT has no Vulkan surface path, so the surface dispatcher reports this
//! backend as unsupported. Its window info still carries the CoreWindow.

pub mod shell;

use log::{debug, info, warn};

use crate::config::VideoConfig;
use crate::foundation::memory::try_box;

use super::backend::{BackendBootstrap, VideoBackend};
use super::display::{DisplayMode, PixelFormat, VideoDisplay};
use super::error::{VideoError, VideoResult};
use super::syswm::{check_info_version, BackendIdentity, NativeHandles, Version, WindowInfo};
use super::window::{Window, WindowFlags, WindowId};

pub use shell::{Bounds, CoreShell, DeviceFamily, FixedCoreWindow, FixedShell, NativeCoreWindow, Orientation};
#[cfg(target_os = "windows")]
pub use shell::CoreWindowShell;

/// Driver name used for registration and configuration hints
pub const DRIVER_NAME: &str = "winrt";

/// Flags every WinRT window carries, whatever the caller asked for
pub const FORCED_WINDOW_FLAGS: WindowFlags = WindowFlags::FULLSCREEN
    .union(WindowFlags::SHOWN)
    .union(WindowFlags::BORDERLESS)
    .union(WindowFlags::MAXIMIZED)
    .union(WindowFlags::INPUT_GRABBED);

/// Registration entry for the WinRT backend
pub struct WinRtBootstrap<S> {
    shell: S,
}

impl<S: CoreShell + Clone + 'static> WinRtBootstrap<S> {
    /// Bootstrap that builds devices on `shell`
    pub fn new(shell: S) -> Self {
        Self { shell }
    }
}

impl<S: CoreShell + Clone + 'static> BackendBootstrap for WinRtBootstrap<S> {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn description(&self) -> &'static str {
        "WinRT CoreWindow video driver"
    }

    fn available(&self) -> bool {
        self.shell.is_present()
    }

    fn create_device(&self, config: &VideoConfig) -> VideoResult<Box<dyn VideoBackend>> {
        let device = try_box(WinRtBackend::new(self.shell.clone(), config))?;
        Ok(device)
    }
}

/// Per-window record attached to the single WinRT window
#[derive(Debug)]
pub struct WinRtWindowData<W> {
    /// Window this record belongs to
    pub window: WindowId,
    /// The CoreWindow; unset in restricted interaction mode
    pub core_window: Option<W>,
}

/// Pointer capability state brought up by `video_init`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    /// Set between `video_init` and `video_quit`
    pub initialized: bool,
    /// Relative pointer motion is available (not under a XAML overlay)
    pub relative_mode_supported: bool,
}

/// The WinRT device
pub struct WinRtBackend<S: CoreShell> {
    shell: S,
    restricted_interaction: bool,
    dips_per_inch: f32,
    global_window: Option<WindowId>,
    pointer: PointerState,
}

impl<S: CoreShell> WinRtBackend<S> {
    /// Device on `shell`, configured from `config`
    pub fn new(shell: S, config: &VideoConfig) -> Self {
        Self {
            shell,
            restricted_interaction: config.restricted_interaction,
            dips_per_inch: config.dips_per_inch,
            global_window: None,
            pointer: PointerState::default(),
        }
    }

    /// The one window this device currently hosts
    pub fn global_window(&self) -> Option<WindowId> {
        self.global_window
    }

    /// Pointer capability state
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Compute the display mode from the CoreWindow of the calling thread
    ///
    /// Returns [`DisplayMode::zeroed`] when no CoreWindow is reachable.
    pub fn calc_display_mode(&self) -> DisplayMode {
        let Some(window) = self.shell.core_window_for_current_thread() else {
            return DisplayMode::zeroed();
        };
        let Some(bounds) = window.bounds() else {
            return DisplayMode::zeroed();
        };

        let dpi = self.shell.logical_dpi();
        let orientation = self.shell.current_orientation();
        let mut mode = DisplayMode {
            format: PixelFormat::Rgb888,
            width: (bounds.width * dpi / self.dips_per_inch) as i32,
            height: (bounds.height * dpi / self.dips_per_inch) as i32,
            refresh_rate: 0,
            driver_data: orientation.bits() as usize,
        };

        // Phone CoreWindows report portrait bounds regardless of rotation.
        if self.shell.device_family() == DeviceFamily::Phone && orientation.is_landscape() {
            std::mem::swap(&mut mode.width, &mut mode.height);
        }

        mode
    }
}

impl<S: CoreShell> VideoBackend for WinRtBackend<S> {
    fn identity(&self) -> BackendIdentity {
        BackendIdentity::WinRt
    }

    fn video_init(&mut self, displays: &mut Vec<VideoDisplay>) -> VideoResult<()> {
        let mode = self.calc_display_mode();
        if !mode.has_area() {
            warn!("Unable to calculate the WinRT window/display's size");
            return Err(VideoError::DisplaySizeUnavailable);
        }

        let mut display = VideoDisplay::basic(mode);
        display.add_mode(mode);
        displays.push(display);

        self.pointer = PointerState {
            initialized: true,
            relative_mode_supported: !self.restricted_interaction,
        };
        info!("WinRT display mode {}x{}", mode.width, mode.height);
        Ok(())
    }

    fn video_quit(&mut self) {
        self.pointer = PointerState::default();
    }

    fn create_window(&mut self, window: &mut Window, displays: &[VideoDisplay]) -> VideoResult<()> {
        if self.global_window.is_some() {
            return Err(VideoError::SingleWindowLimitExceeded { driver: DRIVER_NAME });
        }

        // Under a XAML overlay the CoreWindow is off limits to this thread.
        let core_window = if self.restricted_interaction {
            None
        } else {
            self.shell.core_window_for_current_thread()
        };
        let data = try_box(WinRtWindowData { window: window.id(), core_window })?;
        window.set_driver_data(data);

        window.set_position(0, 0);
        window.set_flags(FORCED_WINDOW_FLAGS);
        if let Some(display) = displays.first() {
            window.set_size(display.current_mode.width, display.current_mode.height);
        }

        self.global_window = Some(window.id());
        debug!("WinRT window {:?} is now the global window", window.id());
        Ok(())
    }

    fn destroy_window(&mut self, window: &mut Window) {
        if self.global_window == Some(window.id()) {
            self.global_window = None;
        }
        drop(window.take_driver_data());
    }

    fn set_display_mode(&mut self, _display: &VideoDisplay, _mode: &DisplayMode) -> VideoResult<()> {
        Ok(())
    }

    fn window_wm_info(&self, window: &Window, version: Version) -> VideoResult<WindowInfo> {
        check_info_version(version)?;
        let core_window = window
            .driver_data::<WinRtWindowData<S::Window>>()
            .and_then(|data| data.core_window.as_ref())
            .and_then(NativeCoreWindow::as_raw);
        Ok(WindowInfo { version, handles: NativeHandles::WinRt { core_window } })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::testing::{self, SerialVideo};
    use crate::video::SYSWM_INFO_VERSION;

    fn boot(shell: FixedShell, config: &VideoConfig) -> SerialVideo {
        let bootstrap = WinRtBootstrap::new(shell);
        let mut video = testing::subsystem();
        video.init(&[&bootstrap], config).unwrap();
        video
    }

    #[test]
    fn test_display_mode_scales_by_dpi() {
        let backend = WinRtBackend::new(FixedShell::new(800.0, 600.0).with_dpi(144.0), &VideoConfig::default());
        let mode = backend.calc_display_mode();
        assert_eq!((mode.width, mode.height), (1200, 900));
        assert_eq!(mode.format, PixelFormat::Rgb888);
        assert_eq!(mode.refresh_rate, 0);
        assert_eq!(mode.driver_data, Orientation::Landscape.bits() as usize);
    }

    #[test]
    fn test_phone_landscape_swaps_dimensions() {
        let shell = FixedShell::new(480.0, 800.0)
            .with_device_family(DeviceFamily::Phone)
            .with_orientation(Orientation::LandscapeFlipped);
        let mode = WinRtBackend::new(shell.clone(), &VideoConfig::default()).calc_display_mode();
        assert_eq!((mode.width, mode.height), (800, 480));

        let portrait = shell.with_orientation(Orientation::Portrait);
        let mode = WinRtBackend::new(portrait, &VideoConfig::default()).calc_display_mode();
        assert_eq!((mode.width, mode.height), (480, 800));
    }

    #[test]
    fn test_display_mode_from_other_thread_is_zeroed() {
        let backend = WinRtBackend::new(FixedShell::new(800.0, 600.0), &VideoConfig::default());
        let mode = std::thread::spawn(move || backend.calc_display_mode()).join().unwrap();
        assert_eq!(mode, DisplayMode::zeroed());
    }

    #[test]
    fn test_init_without_window_fails() {
        let mut backend = WinRtBackend::new(FixedShell::new(800.0, 600.0).without_window(), &VideoConfig::default());
        let mut displays = Vec::new();
        assert!(matches!(backend.video_init(&mut displays), Err(VideoError::DisplaySizeUnavailable)));
        assert!(displays.is_empty());
        assert!(!backend.pointer().initialized);
    }

    #[test]
    fn test_init_registers_single_display() {
        let mut backend = WinRtBackend::new(FixedShell::new(800.0, 600.0), &VideoConfig::default());
        let mut displays = Vec::new();
        backend.video_init(&mut displays).unwrap();

        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].modes(), &[displays[0].current_mode]);
        assert!(backend.pointer().initialized);

        backend.video_quit();
        assert_eq!(backend.pointer(), PointerState::default());
    }

    #[test]
    fn test_create_window_forces_geometry() {
        let mut video = boot(FixedShell::new(1024.0, 768.0), &VideoConfig::default());
        let id = video
            .create_window("game", 100, 200, 320, 240, WindowFlags::RESIZABLE | WindowFlags::HIDDEN)
            .unwrap();

        let window = video.window(id).unwrap();
        assert_eq!(window.position(), (0, 0));
        assert_eq!(window.size(), (1024, 768));
        assert_eq!(
            window.flags(),
            WindowFlags::FULLSCREEN
                | WindowFlags::SHOWN
                | WindowFlags::BORDERLESS
                | WindowFlags::MAXIMIZED
                | WindowFlags::INPUT_GRABBED
        );
        assert!(window.has_driver_data());
    }

    #[test]
    fn test_second_window_rejected_without_side_effects() {
        let mut video = boot(FixedShell::new(800.0, 600.0), &VideoConfig::default());
        let first = video.create_window("first", 0, 0, 1, 1, WindowFlags::empty()).unwrap();
        let before = video.window_wm_info(first, SYSWM_INFO_VERSION).unwrap();

        for _ in 0..2 {
            let result = video.create_window("second", 5, 5, 10, 10, WindowFlags::empty());
            assert!(matches!(result, Err(VideoError::SingleWindowLimitExceeded { driver: "winrt" })));
        }

        assert_eq!(video.window_count(), 1);
        assert_eq!(video.window_wm_info(first, SYSWM_INFO_VERSION).unwrap(), before);
        assert_eq!(video.window(first).unwrap().size(), (800, 600));
    }

    #[test]
    fn test_window_slot_is_reusable() {
        let mut video = boot(FixedShell::new(800.0, 600.0), &VideoConfig::default());
        let first = video.create_window("first", 0, 0, 1, 1, WindowFlags::empty()).unwrap();
        video.destroy_window(first).unwrap();
        let second = video.create_window("second", 0, 0, 1, 1, WindowFlags::empty()).unwrap();
        assert!(video.window(second).is_some());
    }

    #[test]
    fn test_destroy_non_global_window_is_noop_for_slot() {
        let mut backend = WinRtBackend::new(FixedShell::new(800.0, 600.0), &VideoConfig::default());
        let mut displays = Vec::new();
        backend.video_init(&mut displays).unwrap();

        let mut ids: slotmap::SlotMap<WindowId, ()> = slotmap::SlotMap::with_key();
        let global_id = ids.insert(());
        let other_id = ids.insert(());

        let mut global = Window::new(global_id, "global", 0, 0, 1, 1, WindowFlags::empty());
        backend.create_window(&mut global, &displays).unwrap();

        let mut other = Window::new(other_id, "other", 0, 0, 1, 1, WindowFlags::empty());
        backend.destroy_window(&mut other);
        assert_eq!(backend.global_window(), Some(global_id));

        backend.destroy_window(&mut global);
        assert_eq!(backend.global_window(), None);
        assert!(!global.has_driver_data());
    }

    #[test]
    fn test_set_display_mode_is_noop() {
        let mut video = boot(FixedShell::new(800.0, 600.0), &VideoConfig::default());
        let before = video.displays().to_vec();
        let requested = DisplayMode { format: PixelFormat::Argb8888, width: 1, height: 1, refresh_rate: 144, driver_data: 7 };

        assert!(video.set_display_mode(0, &requested).is_ok());
        assert!(video.set_display_mode(0, &DisplayMode::zeroed()).is_ok());
        assert_eq!(video.displays(), before.as_slice());
    }

    #[test]
    fn test_wm_info_carries_core_window() {
        let mut video = boot(FixedShell::new(800.0, 600.0), &VideoConfig::default());
        let id = video.create_window("main", 0, 0, 1, 1, WindowFlags::empty()).unwrap();

        let info = video.window_wm_info(id, SYSWM_INFO_VERSION).unwrap();
        assert_eq!(info.identity(), BackendIdentity::WinRt);
        assert!(matches!(info.handles, NativeHandles::WinRt { core_window: Some(_) }));
    }

    #[test]
    fn test_restricted_mode_leaves_core_window_unset() {
        let config = VideoConfig::default().with_restricted_interaction(true);
        let mut video = boot(FixedShell::new(800.0, 600.0), &config);
        let id = video.create_window("xaml", 0, 0, 1, 1, WindowFlags::empty()).unwrap();

        let info = video.window_wm_info(id, SYSWM_INFO_VERSION).unwrap();
        assert_eq!(info.handles, NativeHandles::WinRt { core_window: None });
    }

    #[test]
    fn test_wm_info_rejects_newer_major() {
        let mut video = boot(FixedShell::new(800.0, 600.0), &VideoConfig::default());
        let id = video.create_window("main", 0, 0, 1, 1, WindowFlags::empty()).unwrap();

        let newer = Version::new(SYSWM_INFO_VERSION.major + 1, 0, 0);
        assert!(matches!(
            video.window_wm_info(id, newer),
            Err(VideoError::VersionMismatch { expected_major: 3, supported_major: 2 })
        ));
        assert!(video.window_wm_info(id, Version::new(1, 2, 0)).is_ok());
    }
}
