use thiserror::Error;

/// Main error type for the template-compositor library
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("Region detection error: {0}")]
    Detector(#[from] DetectorError),

    #[error("Text overlay error: {0}")]
    Text(#[from] TextError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Region-detection errors
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Cannot compute dominant color of an empty image")]
    EmptyImage,

    #[error("No pixel within distance {threshold} of the dominant color {dominant:?}")]
    NoMatchRegion { dominant: [u8; 3], threshold: f64 },
}

/// Text-overlay errors
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Font file not found: {path}")]
    FontUnavailable { path: String },

    #[error("Failed to parse font file: {path} - {reason}")]
    FontParseFailed { path: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using CompositorError
pub type Result<T> = std::result::Result<T, CompositorError>;

impl CompositorError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Process exit status for this error.
    ///
    /// Each branch of the failure taxonomy maps to a distinct non-zero code
    /// so scripting callers can tell a missing placeholder region apart from
    /// a missing font or an unreadable file.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Detector(DetectorError::NoMatchRegion { .. }) => 2,
            Self::Text(_) => 3,
            Self::Detector(DetectorError::EmptyImage) => 4,
            Self::Config(_) => 5,
            Self::Image(_) | Self::Io(_) => 6,
            Self::Generic(_) => 1,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Detector(DetectorError::NoMatchRegion { .. }) => {
                "No dominant color area found.".to_string()
            }
            Self::Text(TextError::FontUnavailable { path }) => {
                format!("Font file not found. Please check the font path: {}", path)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
