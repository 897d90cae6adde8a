//! # Photolapse
//!
//! Turn a folder of photographs into a capture-time-ordered timelapse video.
//!
//! Each photo gets a reliable ordering key (EXIF capture time, falling back
//! to file modification time), is rotated upright according to its sensor
//! orientation, and is letterboxed onto a fixed-size canvas. The ordered
//! frames are then encoded into a single H.264 stream at a constant frame
//! rate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use photolapse::{config::Config, pipeline::LapseEngine};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = LapseEngine::new(Config::default());
//! let artifact = engine.run("photos/", "timelapse.mp4").await?;
//! println!("{} frames -> {:?}", artifact.frame_count, artifact.path);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`photo`] - Photo handles plus the EXIF date and orientation readers
//! - [`sequence`] - Capture-time ordering and per-photo composition
//! - [`video`] - Frame buffers, letterbox compositing, stream encoding
//! - [`pipeline`] - End-to-end engine wiring the steps together
//! - [`config`] - Configuration management
//!
//! Metadata problems never abort a run: a photo with a missing or corrupt
//! EXIF block sorts by modification time and renders unrotated. Only
//! batch-level failures (nothing to process) and encoder failures surface
//! to the caller.

pub mod config;
pub mod error;
pub mod photo;
pub mod pipeline;
pub mod sequence;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{LapseError, Result},
    pipeline::LapseEngine,
    sequence::{Direction, SequenceBuilder},
    video::{FrameCompositor, VideoArtifact, VideoAssembler},
};
