//! Window-system identity and native handle records
//!
//! [`NativeHandles`] is what a backend hands back when asked to describe one of
//! its windows. Exactly one variant is meaningful per [`BackendIdentity`], and
//! the record is built fresh for every query.

use std::ffi::{c_ulong, c_void};
use std::ptr::NonNull;

use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use super::error::{VideoError, VideoResult};

/// The window system a backend drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendIdentity {
    /// No window system, or one this library does not know
    Unknown,
    /// Win32 desktop windows
    Windows,
    /// X11 through Xlib or XCB
    X11,
    /// macOS AppKit hosting a Metal layer
    Cocoa,
    /// iOS UIKit hosting a Metal layer
    UiKit,
    /// Wayland compositor
    Wayland,
    /// WinRT CoreWindow
    WinRt,
    /// Android native window
    Android,
}

impl BackendIdentity {
    /// Stable numeric tag used when reporting the subsystem in messages
    pub const fn subsystem_tag(self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::Windows => 1,
            Self::X11 => 2,
            Self::Cocoa => 4,
            Self::UiKit => 5,
            Self::Wayland => 6,
            Self::WinRt => 8,
            Self::Android => 9,
        }
    }

    /// Short driver name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Windows => "windows",
            Self::X11 => "x11",
            Self::Cocoa => "cocoa",
            Self::UiKit => "uikit",
            Self::Wayland => "wayland",
            Self::WinRt => "winrt",
            Self::Android => "android",
        }
    }

    /// Name of the native entry point that creates a surface for this backend
    pub const fn surface_entry_point(self) -> &'static str {
        match self {
            Self::Windows => "vkCreateWin32SurfaceKHR",
            Self::X11 => "vkCreateXcbSurfaceKHR",
            Self::Cocoa => "vkCreateMacOSSurfaceMVK",
            Self::UiKit => "vkCreateIOSSurfaceMVK",
            Self::Wayland => "vkCreateWaylandSurfaceKHR",
            Self::Android => "vkCreateAndroidSurfaceKHR",
            Self::WinRt | Self::Unknown => "<none>",
        }
    }
}

impl std::fmt::Display for BackendIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How an X11 window's server connection is reachable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum X11Connection {
    /// An Xlib `Display*`; the XCB connection must be resolved from it
    Xlib(NonNull<c_void>),
    /// An `xcb_connection_t*` usable as is
    Xcb(NonNull<c_void>),
}

/// Native handles describing one window, keyed by window system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeHandles {
    /// The backend cannot describe its window
    Unknown,
    /// Win32 window
    Windows {
        /// `HWND` of the window
        hwnd: NonNull<c_void>,
        /// `HINSTANCE` of the module that registered the window class
        hinstance: NonNull<c_void>,
    },
    /// X11 window
    X11 {
        /// Server connection
        connection: X11Connection,
        /// X window id
        window: u32,
    },
    /// AppKit window
    Cocoa {
        /// `NSWindow*`
        window: NonNull<c_void>,
    },
    /// UIKit window
    UiKit {
        /// `UIWindow*`
        window: NonNull<c_void>,
    },
    /// Wayland surface
    Wayland {
        /// `wl_display*`
        display: NonNull<c_void>,
        /// `wl_surface*`
        surface: NonNull<c_void>,
    },
    /// WinRT CoreWindow
    WinRt {
        /// `IUnknown*` of the CoreWindow; absent when the window was created in
        /// restricted interaction mode
        core_window: Option<NonNull<c_void>>,
    },
    /// Android window
    Android {
        /// `ANativeWindow*`
        window: NonNull<c_void>,
    },
}

impl NativeHandles {
    /// Window system these handles belong to
    pub const fn identity(&self) -> BackendIdentity {
        match self {
            Self::Unknown => BackendIdentity::Unknown,
            Self::Windows { .. } => BackendIdentity::Windows,
            Self::X11 { .. } => BackendIdentity::X11,
            Self::Cocoa { .. } => BackendIdentity::Cocoa,
            Self::UiKit { .. } => BackendIdentity::UiKit,
            Self::Wayland { .. } => BackendIdentity::Wayland,
            Self::WinRt { .. } => BackendIdentity::WinRt,
            Self::Android { .. } => BackendIdentity::Android,
        }
    }

    /// Build a record from `raw-window-handle` handles
    ///
    /// Fails with [`VideoError::NativeQueryFailed`] for handle kinds that have
    /// no Vulkan surface path, mismatched display/window kinds, or null
    /// handles a surface cannot be created without.
    pub fn from_raw(display: RawDisplayHandle, window: RawWindowHandle) -> VideoResult<Self> {
        let handles = match (display, window) {
            (RawDisplayHandle::Xlib(d), RawWindowHandle::Xlib(w)) => Self::X11 {
                connection: X11Connection::Xlib(non_null(d.display, "Xlib display")?),
                window: x11_window_id(w.window)?,
            },
            (RawDisplayHandle::Xcb(d), RawWindowHandle::Xcb(w)) => Self::X11 {
                connection: X11Connection::Xcb(non_null(d.connection, "XCB connection")?),
                window: w.window,
            },
            (RawDisplayHandle::Wayland(d), RawWindowHandle::Wayland(w)) => Self::Wayland {
                display: non_null(d.display, "wl_display")?,
                surface: non_null(w.surface, "wl_surface")?,
            },
            (RawDisplayHandle::Windows(_), RawWindowHandle::Win32(w)) => Self::Windows {
                hwnd: non_null(w.hwnd, "HWND")?,
                hinstance: non_null(w.hinstance, "HINSTANCE")?,
            },
            (RawDisplayHandle::Windows(_), RawWindowHandle::WinRt(w)) => Self::WinRt {
                core_window: NonNull::new(w.core_window),
            },
            (RawDisplayHandle::AppKit(_), RawWindowHandle::AppKit(w)) => Self::Cocoa {
                window: non_null(w.ns_window, "NSWindow")?,
            },
            (RawDisplayHandle::UiKit(_), RawWindowHandle::UiKit(w)) => Self::UiKit {
                window: non_null(w.ui_window, "UIWindow")?,
            },
            (RawDisplayHandle::Android(_), RawWindowHandle::AndroidNdk(w)) => Self::Android {
                window: non_null(w.a_native_window, "ANativeWindow")?,
            },
            (display, window) => {
                return Err(VideoError::NativeQueryFailed {
                    reason: format!("unsupported handle pair {display:?} / {window:?}"),
                })
            }
        };
        Ok(handles)
    }
}

fn non_null(ptr: *mut c_void, what: &str) -> VideoResult<NonNull<c_void>> {
    NonNull::new(ptr).ok_or_else(|| VideoError::NativeQueryFailed {
        reason: format!("{what} handle is null"),
    })
}

fn x11_window_id(window: c_ulong) -> VideoResult<u32> {
    u32::try_from(window).map_err(|_| VideoError::NativeQueryFailed {
        reason: format!("X window id {window:#x} does not fit a 32-bit XID"),
    })
}

/// Version of the window info structure a caller was built against
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    /// Major version; a caller with a newer major is rejected
    pub major: u8,
    /// Minor version
    pub minor: u8,
    /// Patch level
    pub patch: u8,
}

impl Version {
    /// Create a version triple
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self { major, minor, patch }
    }
}

/// Newest window info layout this library fills in
pub const SYSWM_INFO_VERSION: Version = Version::new(2, 0, 0);

/// Answer to a window-system info query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowInfo {
    /// Version the caller asked for
    pub version: Version,
    /// Native handles of the window
    pub handles: NativeHandles,
}

impl WindowInfo {
    /// Window system that owns the window
    pub const fn identity(&self) -> BackendIdentity {
        self.handles.identity()
    }
}

/// Reject callers whose expected major version is newer than supported
pub fn check_info_version(expected: Version) -> VideoResult<()> {
    if expected.major > SYSWM_INFO_VERSION.major {
        return Err(VideoError::VersionMismatch {
            expected_major: expected.major,
            supported_major: SYSWM_INFO_VERSION.major,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{
        AndroidDisplayHandle, AndroidNdkWindowHandle, WaylandDisplayHandle, WaylandWindowHandle,
        Win32WindowHandle, WindowsDisplayHandle, XlibDisplayHandle, XlibWindowHandle,
    };

    fn fake_ptr(addr: usize) -> *mut c_void {
        addr as *mut c_void
    }

    #[test]
    fn test_xlib_handles_convert() {
        let mut display = XlibDisplayHandle::empty();
        display.display = fake_ptr(0x1000);
        let mut window = XlibWindowHandle::empty();
        window.window = 0x0040_0001;

        let handles = NativeHandles::from_raw(
            RawDisplayHandle::Xlib(display),
            RawWindowHandle::Xlib(window),
        )
        .unwrap();

        assert_eq!(handles.identity(), BackendIdentity::X11);
        assert!(matches!(
            handles,
            NativeHandles::X11 { connection: X11Connection::Xlib(_), window: 0x0040_0001 }
        ));
    }

    #[test]
    fn test_win32_requires_instance_handle() {
        let mut window = Win32WindowHandle::empty();
        window.hwnd = fake_ptr(0x2000);

        let result = NativeHandles::from_raw(
            RawDisplayHandle::Windows(WindowsDisplayHandle::empty()),
            RawWindowHandle::Win32(window),
        );
        assert!(matches!(result, Err(VideoError::NativeQueryFailed { .. })));

        window.hinstance = fake_ptr(0x3000);
        let handles = NativeHandles::from_raw(
            RawDisplayHandle::Windows(WindowsDisplayHandle::empty()),
            RawWindowHandle::Win32(window),
        )
        .unwrap();
        assert_eq!(handles.identity(), BackendIdentity::Windows);
    }

    #[test]
    fn test_mismatched_pair_rejected() {
        let mut display = WaylandDisplayHandle::empty();
        display.display = fake_ptr(0x1000);
        let mut window = AndroidNdkWindowHandle::empty();
        window.a_native_window = fake_ptr(0x2000);

        let result = NativeHandles::from_raw(
            RawDisplayHandle::Wayland(display),
            RawWindowHandle::AndroidNdk(window),
        );
        assert!(matches!(result, Err(VideoError::NativeQueryFailed { .. })));
    }

    #[test]
    fn test_null_wayland_surface_rejected() {
        let mut display = WaylandDisplayHandle::empty();
        display.display = fake_ptr(0x1000);

        let result = NativeHandles::from_raw(
            RawDisplayHandle::Wayland(display),
            RawWindowHandle::Wayland(WaylandWindowHandle::empty()),
        );
        assert!(matches!(result, Err(VideoError::NativeQueryFailed { .. })));
    }

    #[test]
    fn test_android_handles_convert() {
        let mut window = AndroidNdkWindowHandle::empty();
        window.a_native_window = fake_ptr(0x4000);
        let handles = NativeHandles::from_raw(
            RawDisplayHandle::Android(AndroidDisplayHandle::empty()),
            RawWindowHandle::AndroidNdk(window),
        )
        .unwrap();
        assert_eq!(handles.identity(), BackendIdentity::Android);
    }

    #[test]
    fn test_version_check() {
        assert!(check_info_version(Version::new(1, 9, 9)).is_ok());
        assert!(check_info_version(SYSWM_INFO_VERSION).is_ok());
        assert!(matches!(
            check_info_version(Version::new(3, 0, 0)),
            Err(VideoError::VersionMismatch { expected_major: 3, supported_major: 2 })
        ));
    }

    #[test]
    fn test_subsystem_tags() {
        assert_eq!(BackendIdentity::WinRt.subsystem_tag(), 8);
        assert_eq!(BackendIdentity::Unknown.subsystem_tag(), 0);
        assert_eq!(BackendIdentity::X11.to_string(), "x11");
    }
}
