//! Native surface creation for a window

use std::ffi::c_void;
use std::ptr::NonNull;

use ash::vk;
use log::{debug, warn};

use crate::video::{
    BackendIdentity, NativeHandles, VideoError, VideoResult, VideoSubsystem, ViewAttachmentFailure, WindowId,
    X11Connection, SYSWM_INFO_VERSION,
};

use super::loader::SurfaceLoader;

/// Properties of the compilation target that rule out Metal surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetEnvironment {
    /// Pointers are 32 bits wide; MoltenVK needs 64
    pub pointer_width_32: bool,
    /// Running inside the iOS simulator, which has no Metal
    pub ios_simulator: bool,
}

impl TargetEnvironment {
    /// Environment of the target this crate was compiled for
    pub const fn current() -> Self {
        Self {
            pointer_width_32: cfg!(target_pointer_width = "32"),
            ios_simulator: cfg!(all(target_os = "ios", any(target_abi = "sim", target_arch = "x86_64"))),
        }
    }
}

/// Create a Vulkan surface for `window` on `instance`
///
/// `instance` must have been created with the names from
/// [`surface_instance_extensions`](super::surface_instance_extensions)
/// enabled. One native call is made; its failure status is reported as
/// [`VideoError::NativeSurfaceCreationFailed`] and never retried. The surface
/// belongs to the caller.
pub fn create_surface(
    video: &mut VideoSubsystem,
    window: Option<WindowId>,
    instance: vk::Instance,
    loader: &dyn SurfaceLoader,
) -> VideoResult<vk::SurfaceKHR> {
    create_surface_for_target(video, window, instance, loader, TargetEnvironment::current())
}

/// [`create_surface`] with an explicit target environment
pub fn create_surface_for_target(
    video: &mut VideoSubsystem,
    window: Option<WindowId>,
    instance: vk::Instance,
    loader: &dyn SurfaceLoader,
    target: TargetEnvironment,
) -> VideoResult<vk::SurfaceKHR> {
    dispatch(video, window, instance, loader, target).map_err(|err| {
        warn!("{err}");
        err
    })
}

fn dispatch(
    video: &mut VideoSubsystem,
    window: Option<WindowId>,
    instance: vk::Instance,
    loader: &dyn SurfaceLoader,
    target: TargetEnvironment,
) -> VideoResult<vk::SurfaceKHR> {
    let window = window.ok_or(VideoError::NullWindow)?;
    if instance == vk::Instance::null() {
        return Err(VideoError::NullInstance);
    }

    let info = video.window_wm_info(window, SYSWM_INFO_VERSION)?;
    let backend = info.identity();

    // SAFETY: every handle below comes from the live window's backend, and the
    // caller created `instance` with this backend's surface extension.
    let status = match info.handles {
        NativeHandles::Android { window: native } => {
            let create_info = vk::AndroidSurfaceCreateInfoKHR { window: native.as_ptr(), ..Default::default() };
            unsafe { loader.create_android_surface(instance, &create_info) }
        }
        NativeHandles::UiKit { .. } => {
            if target.ios_simulator {
                return Err(view_failure(backend, ViewAttachmentFailure::SimulatorUnsupported));
            }
            let view = metal_view(video, window, backend)?;
            let create_info = vk::IOSSurfaceCreateInfoMVK { p_view: view.as_ptr().cast_const(), ..Default::default() };
            unsafe { loader.create_ios_surface(instance, &create_info) }
        }
        NativeHandles::Cocoa { .. } => {
            if target.pointer_width_32 {
                return Err(view_failure(backend, ViewAttachmentFailure::ArchitectureUnsupported));
            }
            let view = metal_view(video, window, backend)?;
            let create_info = vk::MacOSSurfaceCreateInfoMVK { p_view: view.as_ptr().cast_const(), ..Default::default() };
            unsafe { loader.create_macos_surface(instance, &create_info) }
        }
        NativeHandles::Wayland { display, surface } => {
            let create_info = vk::WaylandSurfaceCreateInfoKHR {
                display: display.as_ptr(),
                surface: surface.as_ptr(),
                ..Default::default()
            };
            unsafe { loader.create_wayland_surface(instance, &create_info) }
        }
        NativeHandles::Windows { hwnd, hinstance } => {
            let create_info = vk::Win32SurfaceCreateInfoKHR {
                hinstance: hinstance.as_ptr().cast_const(),
                hwnd: hwnd.as_ptr().cast_const(),
                ..Default::default()
            };
            unsafe { loader.create_win32_surface(instance, &create_info) }
        }
        NativeHandles::X11 { connection, window: xid } => {
            let connection = match connection {
                X11Connection::Xcb(connection) => connection,
                X11Connection::Xlib(display) => {
                    loader.xcb_connection(display).ok_or_else(|| VideoError::NativeQueryFailed {
                        reason: "XGetXCBConnection returned no connection".to_string(),
                    })?
                }
            };
            let create_info = vk::XcbSurfaceCreateInfoKHR { connection: connection.as_ptr(), window: xid, ..Default::default() };
            unsafe { loader.create_xcb_surface(instance, &create_info) }
        }
        NativeHandles::WinRt { .. } | NativeHandles::Unknown => {
            return Err(VideoError::UnsupportedBackend { identity: backend });
        }
    };

    let surface = status.map_err(|status| VideoError::NativeSurfaceCreationFailed { backend, status })?;
    debug!("Created {backend} surface {surface:?} for window {window:?}");
    Ok(surface)
}

/// `pView` for MoltenVK, which accepts the `CAMetalLayer` itself
fn metal_view(video: &mut VideoSubsystem, window: WindowId, backend: BackendIdentity) -> VideoResult<NonNull<c_void>> {
    video
        .attach_metal_view(window)?
        .ok_or_else(|| view_failure(backend, ViewAttachmentFailure::NoViewReturned))
}

const fn view_failure(backend: BackendIdentity, reason: ViewAttachmentFailure) -> VideoError {
    VideoError::NativeViewAttachmentFailed { backend, reason }
}
