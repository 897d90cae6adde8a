use thiserror::Error;

/// Main error type for the Photolapse library
#[derive(Error, Debug)]
pub enum LapseError {
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Frame processing error: {0}")]
    Frame(#[from] FrameError),

    #[error("Sequence error: {0}")]
    Sequence(#[from] SequenceError),

    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Metadata read failures
///
/// These never cross the crate boundary: the extractors absorb them and
/// degrade to fallback values (modification time, `Orientation::Normal`).
/// "Absent" and "malformed" are deliberately one case per field.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("capture time absent or malformed: {reason}")]
    CaptureTimeUnavailable { reason: String },

    #[error("orientation tag absent or malformed: {reason}")]
    OrientationUnavailable { reason: String },
}

/// Per-photo frame errors
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Failed to decode photo: {path}")]
    DecodeFailed { path: String },
}

/// Batch-level sequencing errors
#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("No photos left to process after filtering")]
    EmptyBatch,

    #[error("No supported photos found in directory: {path}")]
    NoPhotosFound { path: String },
}

/// Encoding errors
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("ffmpeg not found on PATH")]
    EncoderUnavailable,

    #[error("Refusing to encode an empty frame sequence")]
    EmptySequence,

    #[error("Failed to write intermediate frame: {reason}")]
    FrameWriteFailed { reason: String },

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },
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

/// Convenience type alias for Results using LapseError
pub type Result<T> = std::result::Result<T, LapseError>;

impl LapseError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Sequence(SequenceError::EmptyBatch) => {
                "No valid photos to process. Nothing was encoded.".to_string()
            }
            Self::Sequence(SequenceError::NoPhotosFound { path }) => {
                format!(
                    "No supported photos (.jpg, .jpeg, .png) found in '{}'.",
                    path
                )
            }
            Self::Encode(EncodeError::EncoderUnavailable) => {
                "ffmpeg was not found. Please install FFmpeg and make sure it is on PATH."
                    .to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
