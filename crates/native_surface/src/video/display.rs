//! Displays and display modes

/// Pixel layout of a display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// Not reported by the backend
    #[default]
    Unknown,
    /// 24-bit RGB in a 32-bit word
    Rgb888,
    /// 32-bit ARGB
    Argb8888,
}

/// A display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayMode {
    /// Pixel format
    pub format: PixelFormat,
    /// Width in physical pixels
    pub width: i32,
    /// Height in physical pixels
    pub height: i32,
    /// Refresh rate in Hz, 0 when unknown
    pub refresh_rate: i32,
    /// Opaque backend value (WinRT stores the current orientation here)
    pub driver_data: usize,
}

impl DisplayMode {
    /// An all-zero mode, used when the native window cannot be reached
    pub const fn zeroed() -> Self {
        Self {
            format: PixelFormat::Unknown,
            width: 0,
            height: 0,
            refresh_rate: 0,
            driver_data: 0,
        }
    }

    /// Whether both dimensions are non-zero
    pub const fn has_area(&self) -> bool {
        self.width != 0 && self.height != 0
    }
}

/// A display and the modes it supports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDisplay {
    /// Human-readable name
    pub name: String,
    /// Mode of the desktop
    pub desktop_mode: DisplayMode,
    /// Mode currently in effect
    pub current_mode: DisplayMode,
    modes: Vec<DisplayMode>,
}

impl VideoDisplay {
    /// A display whose desktop and current modes are both `mode`
    pub fn basic(mode: DisplayMode) -> Self {
        Self {
            name: "0".to_string(),
            desktop_mode: mode,
            current_mode: mode,
            modes: Vec::new(),
        }
    }

    /// Add a supported mode; returns `false` if it was already listed
    pub fn add_mode(&mut self, mode: DisplayMode) -> bool {
        if self.modes.contains(&mode) {
            return false;
        }
        self.modes.push(mode);
        true
    }

    /// Supported modes in registration order
    pub fn modes(&self) -> &[DisplayMode] {
        &self.modes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_mode_dedups() {
        let mode = DisplayMode { format: PixelFormat::Rgb888, width: 800, height: 600, ..DisplayMode::zeroed() };
        let mut display = VideoDisplay::basic(mode);
        assert!(display.add_mode(mode));
        assert!(!display.add_mode(mode));
        assert_eq!(display.modes(), &[mode]);
        assert_eq!(display.current_mode, mode);
    }

    #[test]
    fn test_zeroed_has_no_area() {
        assert!(!DisplayMode::zeroed().has_area());
        assert!(!DisplayMode { width: 10, ..DisplayMode::zeroed() }.has_area());
    }
}
