//! Xlib to XCB connection bridge
//!
//! Surfaces are created through `VK_KHR_xcb_surface`, but many X11 windows
//! are described by an Xlib `Display*`. `libX11-xcb` maps one to the other;
//! it is opened at runtime so the crate carries no link-time X11 dependency.

use std::ffi::c_void;
use std::ptr::NonNull;

/// Resolves the XCB connection behind an Xlib display
pub trait XcbConnectionSource {
    /// XCB connection of `display`, or `None` when it cannot be resolved
    fn xcb_connection(&self, display: NonNull<c_void>) -> Option<NonNull<c_void>>;
}

#[cfg(all(unix, not(any(target_os = "macos", target_os = "ios", target_os = "android"))))]
mod imp {
    use std::cell::OnceCell;
    use std::ffi::c_void;
    use std::ptr::NonNull;

    use log::{debug, warn};
    use x11_dl::xlib_xcb::Xlib_xcb;

    /// `XGetXCBConnection` from a lazily opened `libX11-xcb`
    #[derive(Default)]
    pub struct XlibXcbSource {
        library: OnceCell<Option<Xlib_xcb>>,
    }

    impl XlibXcbSource {
        /// Source that opens `libX11-xcb` on first use
        pub fn new() -> Self {
            Self::default()
        }

        fn library(&self) -> Option<&Xlib_xcb> {
            self.library
                .get_or_init(|| match Xlib_xcb::open() {
                    Ok(library) => {
                        debug!("Loaded libX11-xcb");
                        Some(library)
                    }
                    Err(err) => {
                        warn!("Unable to load libX11-xcb: {err}");
                        None
                    }
                })
                .as_ref()
        }
    }

    impl super::XcbConnectionSource for XlibXcbSource {
        fn xcb_connection(&self, display: NonNull<c_void>) -> Option<NonNull<c_void>> {
            let library = self.library()?;
            // SAFETY: `display` is a live Xlib display owned by the window's backend.
            let connection = unsafe { (library.XGetXCBConnection)(display.as_ptr().cast()) };
            NonNull::new(connection.cast())
        }
    }
}

#[cfg(not(all(unix, not(any(target_os = "macos", target_os = "ios", target_os = "android")))))]
mod imp {
    use std::ffi::c_void;
    use std::ptr::NonNull;

    /// Stand-in for targets without Xlib; never resolves a connection
    #[derive(Debug, Default)]
    pub struct XlibXcbSource;

    impl XlibXcbSource {
        /// Source that never resolves a connection
        pub fn new() -> Self {
            Self
        }
    }

    impl super::XcbConnectionSource for XlibXcbSource {
        fn xcb_connection(&self, _display: NonNull<c_void>) -> Option<NonNull<c_void>> {
            None
        }
    }
}

pub use imp::XlibXcbSource;
