use std::path::Path;

use tracing::{debug, info};

use crate::{
    config::Config,
    error::{LapseError, Result, SequenceError},
    photo::Photo,
    sequence::SequenceBuilder,
    video::{FrameCompositor, VideoAssembler, VideoArtifact},
};

/// End-to-end engine that turns a directory of photos into one video
///
/// The pipeline runs in three steps:
/// 1. Discovery - scan the photo directory, keep supported raster files
/// 2. Sequencing - order by capture time, normalize and letterbox each photo
/// 3. Encoding - hand the ordered frames to the encoder
pub struct LapseEngine {
    config: Config,
}

impl LapseEngine {
    /// Create a new engine with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the full pipeline
    pub async fn run<P: AsRef<Path>>(&self, photo_dir: P, output_path: P) -> Result<VideoArtifact> {
        let photo_dir = photo_dir.as_ref();
        let output_path = output_path.as_ref();
        let direction = self.config.sequence.direction;

        info!("Starting timelapse assembly");
        info!("   Photos: {:?}", photo_dir);
        info!("   Output: {:?}", output_path);
        info!("   Direction: {}", direction);

        // Step 1: Discovery
        let photos = self.discover_photos(photo_dir)?;
        info!("   Photos discovered: {}", photos.len());

        // Step 2: Sequencing
        let compositor = FrameCompositor::new(self.config.video.params.resolution);
        let builder = SequenceBuilder::new(compositor);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.video.worker_threads)
            .build()
            .map_err(|e| LapseError::generic(format!("failed to build worker pool: {}", e)))?;
        let frames = pool.install(|| builder.build(&photos, direction))?;

        // Step 3: Encoding
        let mut assembler = VideoAssembler::new(self.config.video.params.clone());
        let artifact = assembler.assemble(&frames, direction, output_path).await?;
        assembler.cleanup()?;

        info!("Timelapse complete: {:?}", artifact.path);
        Ok(artifact)
    }

    /// Input-provider boundary: only supported raster files reach the
    /// core, and discovery order is name-sorted so timestamp tie-breaks
    /// are deterministic across platforms.
    fn discover_photos(&self, dir: &Path) -> Result<Vec<Photo>> {
        if !dir.exists() {
            return Err(SequenceError::NoPhotosFound {
                path: dir.display().to_string(),
            }
            .into());
        }

        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut photos = Vec::new();
        for path in paths {
            let photo = Photo::new(path);
            if photo.is_supported() {
                photos.push(photo);
            } else {
                debug!(file = %photo.name, "ignoring unsupported file");
            }
        }

        if photos.is_empty() {
            return Err(SequenceError::NoPhotosFound {
                path: dir.display().to_string(),
            }
            .into());
        }

        Ok(photos)
    }
}
