use std::fmt;
use std::str::FromStr;

use image::DynamicImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{FrameError, Result, SequenceError};
use crate::photo::{date, CaptureTimestamp, Orientation, Photo};
use crate::video::compositor::FrameCompositor;
use crate::video::types::{Frame, FrameSequence};

/// Temporal ordering of the output sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Oldest capture first
    #[default]
    Ascending,
    /// Newest capture first
    Descending,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascending" | "oldest-first" => Ok(Self::Ascending),
            "descending" | "newest-first" => Ok(Self::Descending),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "ascending"),
            Self::Descending => write!(f, "descending"),
        }
    }
}

/// Builds an ordered frame sequence from a batch of photos
///
/// Each photo gets a capture timestamp, the batch is stable-sorted by
/// that key, and every photo is then normalized and composited in sorted
/// order. Either the full sequence is produced or the builder fails;
/// there are no partial results.
pub struct SequenceBuilder {
    compositor: FrameCompositor,
}

impl SequenceBuilder {
    pub fn new(compositor: FrameCompositor) -> Self {
        Self { compositor }
    }

    /// Order the batch by capture time and compose one canvas per photo
    ///
    /// Photos that fail to decode are skipped with a warning; the result
    /// length equals the number of successfully decoded photos. An empty
    /// input batch, or a batch where nothing decodes, is `EmptyBatch`.
    pub fn build(&self, photos: &[Photo], direction: Direction) -> Result<FrameSequence> {
        if photos.is_empty() {
            return Err(SequenceError::EmptyBatch.into());
        }

        info!("Sequencing {} photos ({})", photos.len(), direction);

        let mut keyed: Vec<(CaptureTimestamp, &Photo)> =
            photos.iter().map(|photo| (date::extract(photo), photo)).collect();
        sort_by_capture_time(&mut keyed, direction);

        for (timestamp, photo) in &keyed {
            debug!(photo = %photo.name, %timestamp, "sequenced");
        }

        // The sort key already fixed the global order, so the per-photo
        // normalize+compose step can fan out; collecting Options keeps
        // the sorted positions intact.
        let composed: Vec<Option<Frame>> = keyed
            .par_iter()
            .map(|(_, photo)| self.compose_photo(photo))
            .collect();

        let sequence: FrameSequence = composed.into_iter().flatten().collect();

        if sequence.is_empty() {
            return Err(SequenceError::EmptyBatch.into());
        }

        info!("Sequence ready: {} frames", sequence.len());
        Ok(sequence)
    }

    /// Decode, orientation-correct, and letterbox a single photo.
    fn compose_photo(&self, photo: &Photo) -> Option<Frame> {
        let image = match load_photo(photo) {
            Ok(image) => image,
            Err(err) => {
                warn!(photo = %photo.name, %err, "skipping photo");
                return None;
            }
        };

        let oriented = Orientation::read_from(&photo.path).apply(image);
        Some(self.compositor.compose(&oriented))
    }
}

fn load_photo(photo: &Photo) -> std::result::Result<DynamicImage, FrameError> {
    image::open(&photo.path).map_err(|_| FrameError::DecodeFailed {
        path: photo.path.display().to_string(),
    })
}

/// Stable sort by timestamp. Descending reverses the comparator rather
/// than the sorted result, so equal timestamps keep input order in both
/// directions.
fn sort_by_capture_time<T>(entries: &mut [(CaptureTimestamp, T)], direction: Direction) {
    match direction {
        Direction::Ascending => entries.sort_by(|a, b| a.0.cmp(&b.0)),
        Direction::Descending => entries.sort_by(|a, b| b.0.cmp(&a.0)),
    }
}
