//! Foundation module - Core utilities shared by the video and Vulkan layers
//!
//! - Fallible allocation for backend-owned records
//! - Logging setup

pub mod memory;
pub mod logging;
