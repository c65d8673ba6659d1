//! Video subsystem error types

use ash::vk;
use thiserror::Error;

use super::syswm::BackendIdentity;
use super::window::WindowId;

/// Why a Metal-backed view could not be attached to a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAttachmentFailure {
    /// MoltenVK requires a 64-bit target
    ArchitectureUnsupported,
    /// Metal is not available inside the iOS simulator
    SimulatorUnsupported,
    /// The backend could not produce a layer-backed view for the window
    NoViewReturned,
}

impl std::fmt::Display for ViewAttachmentFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::ArchitectureUnsupported => "MoltenVK is not supported on 32-bit architectures",
            Self::SimulatorUnsupported => "Metal (& MoltenVK) not supported by the iOS simulator",
            Self::NoViewReturned => "no Metal view could be attached to the window",
        })
    }
}

/// Errors raised by the video subsystem and the surface dispatcher
#[derive(Error, Debug)]
pub enum VideoError {
    /// A query that needs an active backend was made before one was initialized
    #[error("No video driver - has the video subsystem been initialized?")]
    NoActiveBackend,

    /// A window or display operation was attempted without an initialized device
    #[error("Video subsystem has not been initialized")]
    NotInitialized,

    /// `init` was called while a device is already active
    #[error("Video subsystem is already initialized with driver '{driver}'")]
    AlreadyInitialized {
        /// Name of the active driver
        driver: &'static str,
    },

    /// No registered bootstrap reported itself available
    #[error("No available video device (requested driver: {requested:?})")]
    NoBackendAvailable {
        /// Driver name hint from configuration, if any
        requested: Option<String>,
    },

    /// The active backend has no extension list or surface creation procedure
    #[error("Video driver '{identity}' (subsystem {}) does not support Vulkan", .identity.subsystem_tag())]
    UnsupportedBackend {
        /// The backend that was resolved
        identity: BackendIdentity,
    },

    /// Output buffer for extension names is too small; nothing was written
    #[error("Insufficient capacity for extension names: {capacity} < {required}")]
    InsufficientCapacity {
        /// Capacity the caller offered
        capacity: usize,
        /// Number of names the caller must make room for
        required: usize,
    },

    /// No window was given
    #[error("'window' is null")]
    NullWindow,

    /// No graphics instance was given
    #[error("'instance' is null")]
    NullInstance,

    /// The window id does not refer to a live window
    #[error("Invalid window: {0:?}")]
    InvalidWindow(WindowId),

    /// The display index is out of range
    #[error("Invalid display index: {0}")]
    InvalidDisplay(usize),

    /// The window system could not describe the window's native handles
    #[error("Window system query failed: {reason}")]
    NativeQueryFailed {
        /// Description of the failure
        reason: String,
    },

    /// A Metal-backed view could not be attached to the window
    #[error("Could not attach a Metal view for '{backend}': {reason}")]
    NativeViewAttachmentFailed {
        /// Backend that required the view
        backend: BackendIdentity,
        /// Sub-reason for the failure
        reason: ViewAttachmentFailure,
    },

    /// The native surface creation entry point returned a failure status
    #[error("{} failed for '{backend}': {status:?} ({})", .backend.surface_entry_point(), .status.as_raw())]
    NativeSurfaceCreationFailed {
        /// Backend whose entry point failed
        backend: BackendIdentity,
        /// Status returned by the entry point
        status: vk::Result,
    },

    /// Device or window data allocation failed
    #[error("Out of memory")]
    OutOfMemory,

    /// A second window was requested on a single-window backend
    #[error("{driver} only supports one window")]
    SingleWindowLimitExceeded {
        /// Name of the backend enforcing the limit
        driver: &'static str,
    },

    /// The native window is not reachable from this thread, or has no size
    #[error("Unable to calculate the window/display's size")]
    DisplaySizeUnavailable,

    /// The caller's info structure is newer than this library
    #[error("Application expects window info version {expected_major}.x, this library supports {supported_major}.x")]
    VersionMismatch {
        /// Major version the caller asked for
        expected_major: u8,
        /// Newest major version supported
        supported_major: u8,
    },
}

impl From<crate::foundation::memory::AllocError> for VideoError {
    fn from(_: crate::foundation::memory::AllocError) -> Self {
        Self::OutOfMemory
    }
}

/// Result type for video subsystem operations
pub type VideoResult<T> = Result<T, VideoError>;
