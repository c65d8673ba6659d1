//! Instance extensions needed for surface creation

use std::ffi::CStr;

use ash::extensions::khr::{AndroidSurface, Surface, WaylandSurface, Win32Surface, XcbSurface};
use ash::extensions::mvk::{IOSSurface, MacOSSurface};
use log::warn;

use crate::video::{BackendIdentity, VideoError, VideoResult, VideoSubsystem};

/// Platform surface extensions for a window system, in canonical order
///
/// `None` for window systems without a Vulkan surface path.
pub fn extensions_for(identity: BackendIdentity) -> Option<Vec<&'static CStr>> {
    let name = match identity {
        BackendIdentity::Android => AndroidSurface::name(),
        BackendIdentity::Cocoa => MacOSSurface::name(),
        BackendIdentity::UiKit => IOSSurface::name(),
        BackendIdentity::Wayland => WaylandSurface::name(),
        BackendIdentity::Windows => Win32Surface::name(),
        BackendIdentity::X11 => XcbSurface::name(),
        BackendIdentity::WinRt | BackendIdentity::Unknown => return None,
    };
    Some(vec![name])
}

/// Extension names the active backend needs, as an owned list
pub fn required_instance_extensions(video: &VideoSubsystem) -> VideoResult<Vec<&'static CStr>> {
    let identity = video.active_backend().ok_or(VideoError::NoActiveBackend)?;
    extensions_for(identity).ok_or(VideoError::UnsupportedBackend { identity })
}

/// Required extensions preceded by `VK_KHR_surface`, ready for an instance create-info
pub fn surface_instance_extensions(video: &VideoSubsystem) -> VideoResult<Vec<&'static CStr>> {
    let mut names = vec![Surface::name()];
    names.extend(required_instance_extensions(video).map_err(log_failure)?);
    Ok(names)
}

/// Two-phase extension query
///
/// With `names == None` only the number of required names is returned.
/// Otherwise the names are written to the front of `names` and their count
/// returned. When `capacity` (clamped to the slice length) is smaller than the
/// count, nothing is written and `InsufficientCapacity` is returned.
pub fn instance_extensions(
    video: &VideoSubsystem,
    capacity: usize,
    names: Option<&mut [&'static CStr]>,
) -> VideoResult<usize> {
    let required = required_instance_extensions(video).map_err(log_failure)?;

    let Some(names) = names else {
        return Ok(required.len());
    };

    let capacity = capacity.min(names.len());
    if capacity < required.len() {
        return Err(log_failure(VideoError::InsufficientCapacity { capacity, required: required.len() }));
    }

    names[..required.len()].copy_from_slice(&required);
    Ok(required.len())
}

fn log_failure(err: VideoError) -> VideoError {
    warn!("{err}");
    err
}
