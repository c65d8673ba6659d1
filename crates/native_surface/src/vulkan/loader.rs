//! Platform surface creation entry points

use std::ffi::c_void;
use std::ptr::NonNull;

use ash::extensions::khr::{AndroidSurface, WaylandSurface, Win32Surface, XcbSurface};
use ash::extensions::mvk::{IOSSurface, MacOSSurface};
use ash::prelude::VkResult;
use ash::{vk, Entry, Instance};

use super::xlib::{XcbConnectionSource, XlibXcbSource};

/// Loader for the platform `vkCreate*Surface*` entry points
///
/// Each method makes exactly one native call and reports its status
/// unchanged.
///
/// # Safety
/// Implementations receive raw native handles; callers pass handles taken from
/// a live window, and `instance` must have been created with the extension
/// the method belongs to enabled.
pub trait SurfaceLoader: XcbConnectionSource {
    /// `vkCreateAndroidSurfaceKHR`
    unsafe fn create_android_surface(
        &self,
        instance: vk::Instance,
        create_info: &vk::AndroidSurfaceCreateInfoKHR,
    ) -> VkResult<vk::SurfaceKHR>;

    /// `vkCreateIOSSurfaceMVK`
    unsafe fn create_ios_surface(
        &self,
        instance: vk::Instance,
        create_info: &vk::IOSSurfaceCreateInfoMVK,
    ) -> VkResult<vk::SurfaceKHR>;

    /// `vkCreateMacOSSurfaceMVK`
    unsafe fn create_macos_surface(
        &self,
        instance: vk::Instance,
        create_info: &vk::MacOSSurfaceCreateInfoMVK,
    ) -> VkResult<vk::SurfaceKHR>;

    /// `vkCreateWaylandSurfaceKHR`
    unsafe fn create_wayland_surface(
        &self,
        instance: vk::Instance,
        create_info: &vk::WaylandSurfaceCreateInfoKHR,
    ) -> VkResult<vk::SurfaceKHR>;

    /// `vkCreateWin32SurfaceKHR`
    unsafe fn create_win32_surface(
        &self,
        instance: vk::Instance,
        create_info: &vk::Win32SurfaceCreateInfoKHR,
    ) -> VkResult<vk::SurfaceKHR>;

    /// `vkCreateXcbSurfaceKHR`
    unsafe fn create_xcb_surface(
        &self,
        instance: vk::Instance,
        create_info: &vk::XcbSurfaceCreateInfoKHR,
    ) -> VkResult<vk::SurfaceKHR>;
}

/// [`SurfaceLoader`] backed by `ash`'s extension loaders
///
/// Only serves the instance it was built for; any other handle is rejected
/// with `ERROR_INITIALIZATION_FAILED` before a native call is made.
pub struct AshSurfaceLoader {
    entry: Entry,
    instance: Instance,
    xcb: XlibXcbSource,
}

impl AshSurfaceLoader {
    /// Loader for `instance`, which must outlive it
    pub fn new(entry: &Entry, instance: &Instance) -> Self {
        Self {
            entry: entry.clone(),
            instance: instance.clone(),
            xcb: XlibXcbSource::new(),
        }
    }

    fn check_instance(&self, instance: vk::Instance) -> VkResult<()> {
        if instance == self.instance.handle() {
            Ok(())
        } else {
            Err(vk::Result::ERROR_INITIALIZATION_FAILED)
        }
    }
}

impl XcbConnectionSource for AshSurfaceLoader {
    fn xcb_connection(&self, display: NonNull<c_void>) -> Option<NonNull<c_void>> {
        self.xcb.xcb_connection(display)
    }
}

impl SurfaceLoader for AshSurfaceLoader {
    unsafe fn create_android_surface(
        &self,
        instance: vk::Instance,
        create_info: &vk::AndroidSurfaceCreateInfoKHR,
    ) -> VkResult<vk::SurfaceKHR> {
        self.check_instance(instance)?;
        AndroidSurface::new(&self.entry, &self.instance).create_android_surface(create_info, None)
    }

    unsafe fn create_ios_surface(
        &self,
        instance: vk::Instance,
        create_info: &vk::IOSSurfaceCreateInfoMVK,
    ) -> VkResult<vk::SurfaceKHR> {
        self.check_instance(instance)?;
        IOSSurface::new(&self.entry, &self.instance).create_ios_surface(create_info, None)
    }

    unsafe fn create_macos_surface(
        &self,
        instance: vk::Instance,
        create_info: &vk::MacOSSurfaceCreateInfoMVK,
    ) -> VkResult<vk::SurfaceKHR> {
        self.check_instance(instance)?;
        MacOSSurface::new(&self.entry, &self.instance).create_mac_os_surface(create_info, None)
    }

    unsafe fn create_wayland_surface(
        &self,
        instance: vk::Instance,
        create_info: &vk::WaylandSurfaceCreateInfoKHR,
    ) -> VkResult<vk::SurfaceKHR> {
        self.check_instance(instance)?;
        WaylandSurface::new(&self.entry, &self.instance).create_wayland_surface(create_info, None)
    }

    unsafe fn create_win32_surface(
        &self,
        instance: vk::Instance,
        create_info: &vk::Win32SurfaceCreateInfoKHR,
    ) -> VkResult<vk::SurfaceKHR> {
        self.check_instance(instance)?;
        Win32Surface::new(&self.entry, &self.instance).create_win32_surface(create_info, None)
    }

    unsafe fn create_xcb_surface(
        &self,
        instance: vk::Instance,
        create_info: &vk::XcbSurfaceCreateInfoKHR,
    ) -> VkResult<vk::SurfaceKHR> {
        self.check_instance(instance)?;
        XcbSurface::new(&self.entry, &self.instance).create_xcb_surface(create_info, None)
    }
}
