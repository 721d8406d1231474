use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default font location, carried over from the environments this tool grew
/// up on. Override it via the `[text]` section or the `--font` flag.
pub const DEFAULT_FONT_PATH: &str = "/Library/Fonts/SF-Pro-Display-Regular.otf";

/// Main configuration for the template-compositor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Placeholder-region detection settings
    pub detector: DetectorConfig,

    /// Text overlay settings
    pub text: TextConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            text: TextConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string(),
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.detector.validate()?;
        self.text.validate()?;
        Ok(())
    }
}

/// Placeholder-region detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Maximum Euclidean RGB distance from the dominant color for a pixel
    /// to count as part of the placeholder region
    pub threshold: f64,

    /// Blur the mask before taking its bounding box, softening the region
    /// edge. The default is a hard-edged mask.
    pub smooth_mask_edges: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: 30.0,
            smooth_mask_edges: false,
        }
    }
}

impl DetectorConfig {
    fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "detector.threshold".to_string(),
                value: self.threshold.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Text overlay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Path to a scalable font file (TTF/OTF)
    pub font_path: PathBuf,

    /// Font size in pixels
    pub font_size: f32,

    /// Text fill color (RGB)
    pub fill: [u8; 3],

    /// Vertical anchor: the text block is centered on this y coordinate,
    /// independent of the image height
    pub anchor_y: i32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            font_size: 128.0,
            fill: [241, 242, 247],
            anchor_y: 265,
        }
    }
}

impl TextConfig {
    fn validate(&self) -> Result<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "text.font_size".to_string(),
                value: self.font_size.to_string(),
            }
            .into());
        }

        if self.font_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "text.font_path".to_string(),
                value: String::new(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_matches_reference_behavior() {
        let config = Config::default();
        assert_eq!(config.detector.threshold, 30.0);
        assert!(!config.detector.smooth_mask_edges);
        assert_eq!(config.text.font_size, 128.0);
        assert_eq!(config.text.fill, [241, 242, 247]);
        assert_eq!(config.text.anchor_y, 265);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.detector.threshold = 45.0;
        original_config.text.font_path = PathBuf::from("/tmp/some-font.ttf");

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config.detector.threshold, loaded_config.detector.threshold);
        assert_eq!(original_config.text.font_path, loaded_config.text.font_path);
        assert_eq!(original_config.text.fill, loaded_config.text.fill);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[detector]\nthreshold = 12.5\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.detector.threshold, 12.5);
        assert_eq!(config.text.font_size, 128.0);
    }

    #[test]
    fn test_invalid_threshold() {
        let mut config = Config::default();
        config.detector.threshold = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_font_size() {
        let mut config = Config::default();
        config.text.font_size = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::from_file("/definitely/not/here.toml");
        assert!(result.is_err());
    }
}
