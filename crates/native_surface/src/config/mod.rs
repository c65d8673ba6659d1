//! Configuration system
//!
//! File-backed configuration for the video subsystem. The file format is
//! chosen by extension: `.toml` or `.ron`.

use std::ffi::OsStr;
use std::path::Path;

use serde::de::DeserializeOwned;
pub use serde::{Deserialize, Serialize};

/// On-disk configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML
    Toml,
    /// Rusty Object Notation
    Ron,
}

impl ConfigFormat {
    /// Format named by the file extension of `path`, case-insensitive
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Decode `text` in this format
    pub fn decode<T: DeserializeOwned>(self, text: &str) -> Result<T, ConfigError> {
        let decoded = match self {
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            Self::Ron => ron::from_str(text).map_err(|e| e.to_string()),
        };
        decoded.map_err(|reason| ConfigError::Parse { format: self, reason })
    }

    /// Encode `value` in this format, pretty-printed
    pub fn encode<T: Serialize>(self, value: &T) -> Result<String, ConfigError> {
        let encoded = match self {
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default()).map_err(|e| e.to_string()),
        };
        encoded.map_err(|reason| ConfigError::Serialize { format: self, reason })
    }
}

/// A settings struct that can live in a TOML or RON file
pub trait Config: Serialize + DeserializeOwned + Default {
    /// Read settings from `path`; missing keys take their defaults
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        format.decode(&std::fs::read_to_string(path)?)
    }

    /// Read settings from `path` when given, defaults otherwise
    fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), |path| Self::load_from_file(path))
    }

    /// Write settings to `path`, replacing the file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = ConfigFormat::from_path(path)?.encode(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("Configuration file access failed: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents do not match the settings struct
    #[error("Malformed {format:?} configuration: {reason}")]
    Parse {
        /// Format the file was decoded as
        format: ConfigFormat,
        /// Decoder message
        reason: String,
    },

    /// The settings could not be encoded
    #[error("Could not encode {format:?} configuration: {reason}")]
    Serialize {
        /// Format the settings were encoded as
        format: ConfigFormat,
        /// Encoder message
        reason: String,
    },

    /// The path has no `.toml` or `.ron` extension
    #[error("No configuration format for '{0}'")]
    UnsupportedFormat(String),

    /// A field holds a value the video subsystem cannot use
    #[error("Invalid value for '{field}': {reason}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Device-independent pixels per inch used by WinRT to express window bounds
pub const DEFAULT_DIPS_PER_INCH: f32 = 96.0;

/// # Video Subsystem Configuration
///
/// Controls backend selection and backend-specific behavior at
/// [`VideoSubsystem::init`](crate::video::VideoSubsystem::init) time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Backend name to use instead of probing ("winrt", "x11", ...).
    /// Matched case-insensitively against bootstrap names.
    pub driver: Option<String>,
    /// The application hosts its content in a XAML overlay. The native
    /// CoreWindow is not reachable from the UI thread in this mode, so it is
    /// never attached to window data.
    pub restricted_interaction: bool,
    /// Logical units per inch the shell reports window bounds in
    pub dips_per_inch: f32,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
}

impl VideoConfig {
    /// Create a configuration that probes every registered backend
    pub fn new() -> Self {
        Self {
            driver: None,
            restricted_interaction: false,
            dips_per_inch: DEFAULT_DIPS_PER_INCH,
            log_level: "info".to_string(),
        }
    }

    /// Force a specific backend by name
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    /// Enable or disable the restricted (XAML) interaction mode
    pub fn with_restricted_interaction(mut self, enabled: bool) -> Self {
        self.restricted_interaction = enabled;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dips_per_inch.is_finite() && self.dips_per_inch > 0.0) {
            return Err(ConfigError::Invalid {
                field: "dips_per_inch",
                reason: format!("must be a positive number, got {}", self.dips_per_inch),
            });
        }

        if matches!(self.driver.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "driver",
                reason: "must not be empty when set".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for VideoConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: VideoConfig = toml::from_str("driver = \"winrt\"").unwrap();
        assert_eq!(config.driver.as_deref(), Some("winrt"));
        assert!(!config.restricted_interaction);
        assert_eq!(config.dips_per_inch, DEFAULT_DIPS_PER_INCH);
    }

    #[test]
    fn test_ron_parses() {
        let config: VideoConfig =
            ron::from_str("(restricted_interaction: true, log_level: \"debug\")").unwrap();
        assert!(config.restricted_interaction);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_validate_rejects_bad_dpi() {
        let mut config = VideoConfig::default();
        config.dips_per_inch = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "dips_per_inch", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_blank_driver() {
        let config = VideoConfig::default().with_driver("  ");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "driver", .. })
        ));
    }

    #[test]
    fn test_save_and_load_toml() {
        let path = std::env::temp_dir().join(format!("native_surface_{}.toml", std::process::id()));

        let config = VideoConfig::default()
            .with_driver("winrt")
            .with_restricted_interaction(true);
        config.save_to_file(&path).unwrap();
        let loaded = VideoConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = VideoConfig::default().save_to_file("video.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("video.TOML")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("dir.d/video.ron")).unwrap(), ConfigFormat::Ron);
        assert!(matches!(ConfigFormat::from_path(Path::new("video")), Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_malformed_ron_names_format() {
        let result: Result<VideoConfig, _> = ConfigFormat::Ron.decode("(dips_per_inch: \"wide\")");
        assert!(matches!(result, Err(ConfigError::Parse { format: ConfigFormat::Ron, .. })));
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(VideoConfig::load_or_default(None).unwrap(), VideoConfig::default());
    }
}
