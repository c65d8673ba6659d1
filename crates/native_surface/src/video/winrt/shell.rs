//! Access to the WinRT application shell
//!
//! The CoreWindow belongs to the application's UI thread. Every accessor that
//! can reach it is fallible: asking from any other thread (the XAML thread,
//! a worker) yields `None` rather than an invalid handle.

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use crate::config::DEFAULT_DIPS_PER_INCH;

/// Window bounds in device-independent pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Width in DIPs
    pub width: f32,
    /// Height in DIPs
    pub height: f32,
}

/// Screen orientation as reported by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Unknown or not reported
    None,
    /// Landscape
    Landscape,
    /// Portrait
    Portrait,
    /// Landscape, rotated 180 degrees
    LandscapeFlipped,
    /// Portrait, rotated 180 degrees
    PortraitFlipped,
}

impl Orientation {
    /// Raw `DisplayOrientations` bits
    pub const fn bits(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Landscape => 1,
            Self::Portrait => 2,
            Self::LandscapeFlipped => 4,
            Self::PortraitFlipped => 8,
        }
    }

    /// Decode raw `DisplayOrientations` bits
    pub const fn from_bits(bits: u32) -> Self {
        match bits {
            1 => Self::Landscape,
            2 => Self::Portrait,
            4 => Self::LandscapeFlipped,
            8 => Self::PortraitFlipped,
            _ => Self::None,
        }
    }

    /// Whether the long edge is horizontal
    pub const fn is_landscape(self) -> bool {
        matches!(self, Self::Landscape | Self::LandscapeFlipped)
    }
}

/// Device family of the running shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    /// Desktop and tablet; the native window follows the device's rotation
    Desktop,
    /// Phone; the native window is always reported in portrait
    Phone,
}

/// A CoreWindow reference
pub trait NativeCoreWindow: 'static {
    /// Current bounds, if the window can report them
    fn bounds(&self) -> Option<Bounds>;

    /// `IUnknown*` of the window
    fn as_raw(&self) -> Option<NonNull<c_void>>;
}

/// The application shell hosting the CoreWindow
pub trait CoreShell {
    /// CoreWindow reference type
    type Window: NativeCoreWindow;

    /// Whether this process runs inside the shell. Free of side effects.
    fn is_present(&self) -> bool;

    /// The CoreWindow bound to the calling thread, if any
    fn core_window_for_current_thread(&self) -> Option<Self::Window>;

    /// Logical DPI of the current display
    fn logical_dpi(&self) -> f32;

    /// Current screen orientation
    fn current_orientation(&self) -> Orientation;

    /// Device family of the running shell
    fn device_family(&self) -> DeviceFamily;
}

/// A shell with fixed geometry, bound to the thread that created it
///
/// Stands in for the real shell on hosts without WinRT: demos, tests, and
/// headless tooling.
#[derive(Debug, Clone)]
pub struct FixedShell {
    owner: ThreadId,
    window: Option<FixedCoreWindow>,
    dpi: f32,
    orientation: Orientation,
    family: DeviceFamily,
}

impl FixedShell {
    /// Shell with a window of `width` x `height` DIPs at 96 DPI, landscape, desktop
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            owner: thread::current().id(),
            window: Some(FixedCoreWindow(Arc::new(Bounds { width, height }))),
            dpi: DEFAULT_DIPS_PER_INCH,
            orientation: Orientation::Landscape,
            family: DeviceFamily::Desktop,
        }
    }

    /// Set the logical DPI
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the reported orientation
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the reported device family
    pub fn with_device_family(mut self, family: DeviceFamily) -> Self {
        self.family = family;
        self
    }

    /// Shell whose CoreWindow is not reachable from any thread
    pub fn without_window(mut self) -> Self {
        self.window = None;
        self
    }
}

impl CoreShell for FixedShell {
    type Window = FixedCoreWindow;

    fn is_present(&self) -> bool {
        true
    }

    fn core_window_for_current_thread(&self) -> Option<FixedCoreWindow> {
        if thread::current().id() != self.owner {
            return None;
        }
        self.window.clone()
    }

    fn logical_dpi(&self) -> f32 {
        self.dpi
    }

    fn current_orientation(&self) -> Orientation {
        self.orientation
    }

    fn device_family(&self) -> DeviceFamily {
        self.family
    }
}

/// CoreWindow stand-in for [`FixedShell`]
#[derive(Debug, Clone)]
pub struct FixedCoreWindow(Arc<Bounds>);

impl NativeCoreWindow for FixedCoreWindow {
    fn bounds(&self) -> Option<Bounds> {
        Some(*self.0)
    }

    fn as_raw(&self) -> Option<NonNull<c_void>> {
        Some(NonNull::from(&*self.0).cast())
    }
}

#[cfg(target_os = "windows")]
pub use native::CoreWindowShell;

#[cfg(target_os = "windows")]
mod native {
    use super::{Bounds, CoreShell, DeviceFamily, NativeCoreWindow, Orientation};
    use crate::config::DEFAULT_DIPS_PER_INCH;
    use std::ffi::c_void;
    use std::ptr::NonNull;
    use windows::core::Interface;
    use windows::Graphics::Display::DisplayInformation;
    use windows::System::Profile::AnalyticsInfo;
    use windows::UI::Core::CoreWindow;

    /// The real WinRT shell
    #[derive(Debug, Clone, Copy, Default)]
    pub struct CoreWindowShell;

    impl NativeCoreWindow for CoreWindow {
        fn bounds(&self) -> Option<Bounds> {
            self.Bounds().ok().map(|rect| Bounds { width: rect.Width, height: rect.Height })
        }

        fn as_raw(&self) -> Option<NonNull<c_void>> {
            NonNull::new(Interface::as_raw(self))
        }
    }

    impl CoreShell for CoreWindowShell {
        type Window = CoreWindow;

        fn is_present(&self) -> bool {
            true
        }

        fn core_window_for_current_thread(&self) -> Option<CoreWindow> {
            CoreWindow::GetForCurrentThread().ok()
        }

        fn logical_dpi(&self) -> f32 {
            DisplayInformation::GetForCurrentView()
                .and_then(|info| info.LogicalDpi())
                .unwrap_or(DEFAULT_DIPS_PER_INCH)
        }

        fn current_orientation(&self) -> Orientation {
            DisplayInformation::GetForCurrentView()
                .and_then(|info| info.CurrentOrientation())
                .map_or(Orientation::None, |orientation| Orientation::from_bits(orientation.0))
        }

        fn device_family(&self) -> DeviceFamily {
            match AnalyticsInfo::VersionInfo().and_then(|info| info.DeviceFamily()) {
                Ok(family) if family == "Windows.Mobile" => DeviceFamily::Phone,
                _ => DeviceFamily::Desktop,
            }
        }
    }
}
