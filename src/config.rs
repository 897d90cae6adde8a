use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    sequence::Direction,
    video::EncoderParams,
};

/// Main configuration for Photolapse
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Video output settings
    pub video: VideoConfig,

    /// Sequencing settings
    pub sequence: SequenceConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|_| ConfigError::ParseFailed {
            path: path.display().to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.video.validate()?;
        Ok(())
    }
}

/// Video output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Encoder output parameters
    pub params: EncoderParams,

    /// Number of worker threads for per-photo composition
    pub worker_threads: usize,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            params: EncoderParams::default(),
            worker_threads: num_cpus::get(),
        }
    }
}

impl VideoConfig {
    fn validate(&self) -> Result<()> {
        if self.params.fps == 0 {
            return Err(ConfigError::InvalidValue {
                key: "video.params.fps".to_string(),
                value: self.params.fps.to_string(),
            }
            .into());
        }

        let (width, height) = self.params.resolution;
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "video.params.resolution".to_string(),
                value: format!("{}x{}", width, height),
            }
            .into());
        }

        if self.params.quality > 100 {
            return Err(ConfigError::InvalidValue {
                key: "video.params.quality".to_string(),
                value: self.params.quality.to_string(),
            }
            .into());
        }

        if self.worker_threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "video.worker_threads".to_string(),
                value: self.worker_threads.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Sequencing configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SequenceConfig {
    /// Playback order of the assembled sequence
    pub direction: Direction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.video.params.fps, 24);
        assert_eq!(config.video.params.resolution, (1920, 1080));
        assert_eq!(config.sequence.direction, Direction::Ascending);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original = Config::default();
        original.sequence.direction = Direction::Descending;
        original.video.params.fps = 12;

        original.save_to_file(&file_path).unwrap();
        let loaded = Config::from_file(&file_path).unwrap();

        assert_eq!(loaded.video.params.fps, 12);
        assert_eq!(loaded.video.params.codec, original.video.params.codec);
        assert_eq!(loaded.sequence.direction, Direction::Descending);
    }

    #[test]
    fn test_invalid_fps() {
        let mut config = Config::default();
        config.video.params.fps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_resolution() {
        let mut config = Config::default();
        config.video.params.resolution = (1920, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::from_file("/no/such/config.toml").is_err());
    }
}
