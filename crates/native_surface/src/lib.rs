//! # Native Surface
//!
//! Window-system backend registry and native Vulkan surface creation.
//!
//! ## Features
//!
//! - **Backend registry**: backends are probed in order and exactly one
//!   becomes the active device of a [`video::VideoSubsystem`]
//! - **Surface dispatch**: one call creates a `VkSurfaceKHR` for whichever
//!   window system owns the window
//! - **Extension negotiation**: the instance extensions a window system needs,
//!   with a two-phase count/fill query
//! - **WinRT CoreWindow backend**: single fullscreen window, DPI-scaled display mode
//! - **Raw handle adoption**: windows from any `raw-window-handle` library
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use native_surface::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let shell = FixedShell::new(1280.0, 720.0);
//!     let winrt = WinRtBootstrap::new(shell);
//!
//!     let mut video = VideoSubsystem::new();
//!     video.init(&[&winrt], &VideoConfig::default())?;
//!
//!     let window = video.create_window("main", 0, 0, 1280, 720, WindowFlags::VULKAN)?;
//!     let info = video.window_wm_info(window, SYSWM_INFO_VERSION)?;
//!     println!("window system: {}", info.identity());
//!
//!     video.quit();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod video;
pub mod vulkan;

/// Common imports for users of the crate
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, VideoConfig},
        video::{
            raw::RawHandleBootstrap,
            winrt::{CoreShell, FixedShell, WinRtBootstrap},
            BackendBootstrap, BackendIdentity, NativeHandles, VideoBackend, VideoError, VideoResult,
            VideoSubsystem, WindowFlags, WindowId, WindowInfo, SYSWM_INFO_VERSION,
        },
        vulkan::{create_surface, instance_extensions, surface_instance_extensions, AshSurfaceLoader, SurfaceLoader},
    };
}
