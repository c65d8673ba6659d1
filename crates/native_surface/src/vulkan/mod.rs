//! Vulkan surface support for the active video backend
//!
//! # Usage
//!
//! ```no_run
//! # use native_surface::video::VideoSubsystem;
//! # use native_surface::vulkan::{self, SurfaceLoader};
//! # fn demo(video: &mut VideoSubsystem, window: native_surface::video::WindowId,
//! #         instance: ash::vk::Instance, loader: &dyn SurfaceLoader) -> native_surface::video::VideoResult<()> {
//! // 1. Ask which instance extensions the window system needs
//! let extensions = vulkan::surface_instance_extensions(video)?;
//!
//! // 2. Create the instance with them (not shown), then the surface
//! let surface = vulkan::create_surface(video, Some(window), instance, loader)?;
//! # let _ = (extensions, surface);
//! # Ok(())
//! # }
//! ```
//!
//! The returned surface belongs to the caller and must be destroyed through
//! `VK_KHR_surface` before the instance.

pub mod extensions;
pub mod loader;
pub mod surface;
pub mod xlib;

pub use extensions::{extensions_for, instance_extensions, required_instance_extensions, surface_instance_extensions};
pub use loader::{AshSurfaceLoader, SurfaceLoader};
pub use surface::{create_surface, create_surface_for_target, TargetEnvironment};
pub use xlib::{XcbConnectionSource, XlibXcbSource};
