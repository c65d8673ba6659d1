//! Memory management utilities
//!
//! Backend devices and per-window records are allocated through [`try_box`]
//! so that an exhausted allocator is reported as an error instead of
//! aborting the process.

use std::alloc::{alloc, Layout};
use thiserror::Error;

/// The global allocator could not satisfy a request
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("allocation of {size} bytes failed")]
pub struct AllocError {
    /// Number of bytes that were requested
    pub size: usize,
}

/// Move `value` into a new heap allocation, reporting allocator exhaustion
pub fn try_box<T>(value: T) -> Result<Box<T>, AllocError> {
    let layout = Layout::new::<T>();
    if layout.size() == 0 {
        return Ok(Box::new(value));
    }

    // SAFETY: `layout` has a non-zero size.
    let ptr = unsafe { alloc(layout) }.cast::<T>();
    if ptr.is_null() {
        return Err(AllocError { size: layout.size() });
    }

    // SAFETY: `ptr` is non-null, freshly allocated by the global allocator
    // with the layout of `T`, which is exactly what `Box<T>` expects to own.
    unsafe {
        ptr.write(value);
        Ok(Box::from_raw(ptr))
    }
}
