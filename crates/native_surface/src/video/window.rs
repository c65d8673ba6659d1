//! Generic window record owned by the video subsystem
//!
//! The subsystem owns the geometry and flags; the active backend attaches its
//! own per-window record through [`Window::set_driver_data`] and reads it back
//! by downcasting.

use std::any::Any;

use bitflags::bitflags;
use slotmap::new_key_type;

new_key_type! {
    /// Stable handle to a window owned by a [`VideoSubsystem`](super::VideoSubsystem)
    pub struct WindowId;
}

bitflags! {
    /// Window state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        /// Covers the whole display
        const FULLSCREEN = 0x0000_0001;
        /// Visible
        const SHOWN = 0x0000_0004;
        /// Not visible
        const HIDDEN = 0x0000_0008;
        /// No decorations
        const BORDERLESS = 0x0000_0010;
        /// User resizable
        const RESIZABLE = 0x0000_0020;
        /// Minimized
        const MINIMIZED = 0x0000_0040;
        /// Maximized
        const MAXIMIZED = 0x0000_0080;
        /// Input is confined to the window
        const INPUT_GRABBED = 0x0000_0100;
        /// Usable with Vulkan
        const VULKAN = 0x1000_0000;
    }
}

/// A window as seen by the generic video layer
pub struct Window {
    id: WindowId,
    title: String,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    flags: WindowFlags,
    driver_data: Option<Box<dyn Any>>,
}

impl Window {
    pub(crate) fn new(id: WindowId, title: &str, x: i32, y: i32, width: i32, height: i32, flags: WindowFlags) -> Self {
        Self {
            id,
            title: title.to_string(),
            x,
            y,
            width,
            height,
            flags,
            driver_data: None,
        }
    }

    /// Handle of this window
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Window title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Position of the top-left corner
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Set the position of the top-left corner
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Client area size in pixels
    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Set the client area size in pixels
    pub fn set_size(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    /// Current flags
    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    /// Replace all flags
    pub fn set_flags(&mut self, flags: WindowFlags) {
        self.flags = flags;
    }

    /// Attach the backend's per-window record, replacing any previous one
    pub fn set_driver_data(&mut self, data: Box<dyn Any>) {
        self.driver_data = Some(data);
    }

    /// Borrow the backend's per-window record as `T`
    pub fn driver_data<T: Any>(&self) -> Option<&T> {
        self.driver_data.as_deref().and_then(|data| data.downcast_ref::<T>())
    }

    /// Detach the backend's per-window record
    pub fn take_driver_data(&mut self) -> Option<Box<dyn Any>> {
        self.driver_data.take()
    }

    /// Whether a backend record is attached
    pub fn has_driver_data(&self) -> bool {
        self.driver_data.is_some()
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("position", &(self.x, self.y))
            .field("size", &(self.width, self.height))
            .field("flags", &self.flags)
            .field("driver_data", &self.driver_data.is_some())
            .finish()
    }
}
