//! Backend adopting a window owned by another windowing library
//!
//! Any library exposing `raw-window-handle` handles (winit, glfw) can
//! hand its window to the video subsystem through [`RawHandleBootstrap`].
//! The adopted window is the device's only window; its geometry is taken as
//! given and never forced. On AppKit and UIKit a `CAMetalLayer` is attached
//! to the window's view the first time a Metal view is requested.

use std::ffi::c_void;
use std::ptr::NonNull;

use log::{debug, warn};
use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle, RawDisplayHandle, RawWindowHandle};

use crate::config::VideoConfig;
use crate::foundation::memory::try_box;

use super::backend::{BackendBootstrap, VideoBackend};
use super::display::{DisplayMode, VideoDisplay};
use super::error::{VideoError, VideoResult};
use super::metal::{attach_metal_layer, MetalLayerAttach};
use super::syswm::{check_info_version, BackendIdentity, NativeHandles, Version, WindowInfo};
use super::window::{Window, WindowId};

/// Driver name used for registration and configuration hints
pub const DRIVER_NAME: &str = "raw";

/// Registration entry wrapping a foreign window's raw handles
#[derive(Debug, Clone, Copy)]
pub struct RawHandleBootstrap {
    display: RawDisplayHandle,
    window: RawWindowHandle,
    width: i32,
    height: i32,
    attach_layer: MetalLayerAttach,
}

impl RawHandleBootstrap {
    /// Bootstrap for a window described by raw handles and its size in pixels
    ///
    /// # Safety
    /// The handles must stay valid for as long as any device constructed from
    /// this bootstrap is alive.
    pub unsafe fn from_raw_handles(display: RawDisplayHandle, window: RawWindowHandle, width: i32, height: i32) -> Self {
        Self { display, window, width, height, attach_layer: attach_metal_layer }
    }

    /// Replace the routine that attaches a `CAMetalLayer` to Apple views
    pub fn with_metal_layer_attach(mut self, attach: MetalLayerAttach) -> Self {
        self.attach_layer = attach;
        self
    }

    /// Bootstrap for a window object of another windowing library
    ///
    /// # Safety
    /// `window` must outlive every device constructed from this bootstrap.
    pub unsafe fn from_window<W>(window: &W, width: i32, height: i32) -> Self
    where
        W: HasRawWindowHandle + HasRawDisplayHandle,
    {
        Self::from_raw_handles(window.raw_display_handle(), window.raw_window_handle(), width, height)
    }
}

impl BackendBootstrap for RawHandleBootstrap {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn description(&self) -> &'static str {
        "Adopted raw-window-handle window"
    }

    fn available(&self) -> bool {
        NativeHandles::from_raw(self.display, self.window).is_ok()
    }

    fn create_device(&self, _config: &VideoConfig) -> VideoResult<Box<dyn VideoBackend>> {
        let handles = NativeHandles::from_raw(self.display, self.window)?;
        let mode = DisplayMode { width: self.width, height: self.height, ..DisplayMode::zeroed() };

        let device = try_box(RawHandleBackend {
            handles,
            window: self.window,
            attach_layer: self.attach_layer,
            metal_layer: None,
            mode,
            global_window: None,
        })?;
        Ok(device)
    }
}

/// Device driving one adopted window
#[derive(Debug)]
pub struct RawHandleBackend {
    handles: NativeHandles,
    window: RawWindowHandle,
    attach_layer: MetalLayerAttach,
    metal_layer: Option<NonNull<c_void>>,
    mode: DisplayMode,
    global_window: Option<WindowId>,
}

impl RawHandleBackend {
    /// The window currently bound to the adopted native window
    pub fn global_window(&self) -> Option<WindowId> {
        self.global_window
    }
}

impl VideoBackend for RawHandleBackend {
    fn identity(&self) -> BackendIdentity {
        self.handles.identity()
    }

    fn video_init(&mut self, displays: &mut Vec<VideoDisplay>) -> VideoResult<()> {
        if !self.mode.has_area() {
            warn!("Adopted window has no size");
            return Err(VideoError::DisplaySizeUnavailable);
        }
        displays.push(VideoDisplay::basic(self.mode));
        debug!("Adopted {} window, {}x{}", self.identity(), self.mode.width, self.mode.height);
        Ok(())
    }

    fn video_quit(&mut self) {}

    fn create_window(&mut self, window: &mut Window, _displays: &[VideoDisplay]) -> VideoResult<()> {
        if self.global_window.is_some() {
            return Err(VideoError::SingleWindowLimitExceeded { driver: DRIVER_NAME });
        }
        self.global_window = Some(window.id());
        Ok(())
    }

    fn destroy_window(&mut self, window: &mut Window) {
        if self.global_window == Some(window.id()) {
            self.global_window = None;
        }
    }

    fn set_display_mode(&mut self, _display: &VideoDisplay, _mode: &DisplayMode) -> VideoResult<()> {
        Ok(())
    }

    fn window_wm_info(&self, window: &Window, version: Version) -> VideoResult<WindowInfo> {
        check_info_version(version)?;
        if self.global_window != Some(window.id()) {
            return Err(VideoError::InvalidWindow(window.id()));
        }
        Ok(WindowInfo { version, handles: self.handles })
    }

    fn attach_metal_view(&mut self, _window: &mut Window) -> Option<NonNull<c_void>> {
        if !matches!(self.handles.identity(), BackendIdentity::Cocoa | BackendIdentity::UiKit) {
            return None;
        }
        if self.metal_layer.is_none() {
            self.metal_layer = (self.attach_layer)(self.window);
            match self.metal_layer {
                Some(layer) => debug!("Attached CAMetalLayer {layer:?} to the adopted view"),
                None => warn!("Could not attach a CAMetalLayer to the adopted view"),
            }
        }
        self.metal_layer
    }
}
