//! CAMetalLayer attachment for AppKit and UIKit windows
//!
//! MoltenVK renders into a `CAMetalLayer`. A window handed over by another
//! library usually has a plain view, so the layer is attached on demand:
//! an existing `CAMetalLayer` is reused, otherwise a new one is created and
//! attached to the view (AppKit makes it the backing layer, UIKit adds it as
//! a sublayer).

use std::ffi::c_void;
use std::ptr::NonNull;

use raw_window_handle::RawWindowHandle;

/// Attaches (or finds) the `CAMetalLayer` of a window; `None` when it cannot
pub type MetalLayerAttach = fn(RawWindowHandle) -> Option<NonNull<c_void>>;

/// Attach a `CAMetalLayer` to the AppKit view of `window`
///
/// Must be called on the main thread.
#[cfg(target_os = "macos")]
pub fn attach_metal_layer(window: RawWindowHandle) -> Option<NonNull<c_void>> {
    use raw_window_metal::{appkit, Layer};

    let RawWindowHandle::AppKit(handle) = window else {
        return None;
    };
    // SAFETY: the handle describes a live AppKit window owned by the caller.
    let layer = match unsafe { appkit::metal_layer_from_handle(handle) } {
        Layer::Existing(layer) | Layer::Allocated(layer) => layer as *mut c_void,
        Layer::None => return None,
    };
    NonNull::new(layer)
}

/// Attach a `CAMetalLayer` to the UIKit view of `window`
///
/// Must be called on the main thread.
#[cfg(target_os = "ios")]
pub fn attach_metal_layer(window: RawWindowHandle) -> Option<NonNull<c_void>> {
    use raw_window_metal::{uikit, Layer};

    let RawWindowHandle::UiKit(handle) = window else {
        return None;
    };
    // SAFETY: the handle describes a live UIKit window owned by the caller.
    let layer = match unsafe { uikit::metal_layer_from_handle(handle) } {
        Layer::Existing(layer) | Layer::Allocated(layer) => layer as *mut c_void,
        Layer::None => return None,
    };
    NonNull::new(layer)
}

/// No Metal outside Apple targets
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub fn attach_metal_layer(_window: RawWindowHandle) -> Option<NonNull<c_void>> {
    None
}
