use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tokio::task;
use tracing::{debug, info, warn};

use crate::error::{EncodeError, Result};
use crate::sequence::Direction;
use crate::video::types::{EncoderParams, FrameSequence};

/// The finished encoded output plus the parameters that produced it
#[derive(Debug, Clone)]
pub struct VideoArtifact {
    /// Where the encoded stream was written; the caller owns the file
    pub path: PathBuf,
    pub fps: u32,
    pub direction: Direction,
    pub frame_count: usize,
    pub duration: f64,
    pub file_size: u64,
}

/// Encodes an ordered frame sequence into a single H.264 stream using
/// the system ffmpeg binary
///
/// Frames are written as numbered PNGs into a scoped temp directory and
/// fed to ffmpeg through a concat list, one canvas per output frame in
/// sequence order. The encoder needs the complete sequence up front;
/// nothing is streamed.
pub struct VideoAssembler {
    params: EncoderParams,
    temp_dir: Option<PathBuf>,
}

impl VideoAssembler {
    pub fn new(params: EncoderParams) -> Self {
        Self {
            params,
            temp_dir: None,
        }
    }

    pub fn check_ffmpeg_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn ensure_temp_dir(&mut self) -> Result<PathBuf> {
        if let Some(ref temp_dir) = self.temp_dir {
            return Ok(temp_dir.clone());
        }

        let temp_dir = PathBuf::from(format!("./temp_photolapse_{}", std::process::id()));
        create_dir_all(&temp_dir)?;
        self.temp_dir = Some(temp_dir.clone());
        Ok(temp_dir)
    }

    /// Encode `frames` in order at a constant frame rate
    ///
    /// Frame i of the output corresponds to `frames[i]`. Either the whole
    /// artifact is produced or an error is returned; a failed run leaves
    /// no partial output behind the returned handle.
    pub async fn assemble<P: AsRef<Path>>(
        &mut self,
        frames: &FrameSequence,
        direction: Direction,
        output_path: P,
    ) -> Result<VideoArtifact> {
        info!("Encoding {} frames at {} fps", frames.len(), self.params.fps);

        // Empty batches are rejected upstream; this guard keeps a broken
        // caller from handing ffmpeg a zero-entry concat list.
        if frames.is_empty() {
            return Err(EncodeError::EmptySequence.into());
        }

        if !Self::check_ffmpeg_available() {
            return Err(EncodeError::EncoderUnavailable.into());
        }

        let temp_dir = self.ensure_temp_dir()?;
        let frame_paths = self.write_frames(frames, &temp_dir)?;
        let list_path = self.write_concat_list(&frame_paths, &temp_dir)?;

        let output_path = output_path.as_ref();
        self.encode_from_list(&list_path, output_path).await?;

        let file_size = std::fs::metadata(output_path)?.len();
        let artifact = VideoArtifact {
            path: output_path.to_path_buf(),
            fps: self.params.fps,
            direction,
            frame_count: frames.len(),
            duration: frames.len() as f64 / f64::from(self.params.fps),
            file_size,
        };

        info!(
            "Encoded {:.1}s of video ({:.1} MB)",
            artifact.duration,
            artifact.file_size as f64 / 1024.0 / 1024.0
        );

        Ok(artifact)
    }

    fn write_frames(&self, frames: &FrameSequence, temp_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut frame_paths = Vec::with_capacity(frames.len());

        for (index, frame) in frames.iter().enumerate() {
            let frame_path = temp_dir.join(format!("frame_{:06}.png", index));
            frame
                .save_png(&frame_path)
                .map_err(|e| EncodeError::FrameWriteFailed {
                    reason: format!("{}: {}", frame_path.display(), e),
                })?;
            frame_paths.push(frame_path);
        }

        debug!("Wrote {} intermediate frames to {:?}", frame_paths.len(), temp_dir);
        Ok(frame_paths)
    }

    fn write_concat_list(&self, frame_paths: &[PathBuf], temp_dir: &Path) -> Result<PathBuf> {
        let list_path = temp_dir.join("frame_list.txt");
        let mut file = File::create(&list_path)?;

        let frame_duration = 1.0 / f64::from(self.params.fps);

        for frame_path in frame_paths {
            let absolute = frame_path
                .canonicalize()
                .unwrap_or_else(|_| frame_path.clone());

            writeln!(file, "file '{}'", absolute.display())?;
            writeln!(file, "duration {:.6}", frame_duration)?;
        }

        // The concat demuxer ignores the final duration entry unless the
        // last file is listed again.
        if let Some(last) = frame_paths.last() {
            let absolute = last.canonicalize().unwrap_or_else(|_| last.clone());
            writeln!(file, "file '{}'", absolute.display())?;
        }

        Ok(list_path)
    }

    async fn encode_from_list(&self, list_path: &Path, output_path: &Path) -> Result<()> {
        let mut cmd = Command::new("ffmpeg");
        cmd.args([
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            &list_path.display().to_string(),
            "-c:v",
            &self.params.codec,
            "-r",
            &self.params.fps.to_string(),
            "-pix_fmt",
            &self.params.pixel_format,
            "-crf",
            &Self::quality_to_crf(self.params.quality).to_string(),
            "-y",
            &output_path.display().to_string(),
        ]);

        let output = task::spawn_blocking(move || cmd.output())
            .await
            .map_err(|e| EncodeError::EncodingFailed {
                reason: format!("failed to spawn ffmpeg task: {}", e),
            })?
            .map_err(|e| EncodeError::EncodingFailed {
                reason: format!("ffmpeg execution failed: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EncodeError::EncodingFailed {
                reason: format!("ffmpeg exited with {}: {}", output.status, stderr),
            }
            .into());
        }

        Ok(())
    }

    fn quality_to_crf(quality: u8) -> u8 {
        (51 - ((quality as f32 / 100.0) * 51.0) as u8).clamp(0, 51)
    }

    pub fn cleanup(&mut self) -> Result<()> {
        if let Some(temp_dir) = self.temp_dir.take() {
            if let Err(e) = std::fs::remove_dir_all(&temp_dir) {
                warn!("Failed to remove temporary directory {:?}: {}", temp_dir, e);
            }
        }
        Ok(())
    }
}

impl Drop for VideoAssembler {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LapseError;
    use crate::video::types::Frame;
    use image::RgbImage;
    use tempfile::tempdir;

    #[test]
    fn test_quality_to_crf() {
        assert_eq!(VideoAssembler::quality_to_crf(100), 0);
        assert_eq!(VideoAssembler::quality_to_crf(0), 51);
        assert_eq!(VideoAssembler::quality_to_crf(85), 8);
    }

    #[tokio::test]
    async fn test_empty_sequence_is_rejected() {
        let mut assembler = VideoAssembler::new(EncoderParams::default());
        let result = assembler
            .assemble(&FrameSequence::new(), Direction::Ascending, "out.mp4")
            .await;

        assert!(matches!(
            result,
            Err(LapseError::Encode(EncodeError::EmptySequence))
        ));
    }

    #[test]
    fn test_concat_list_repeats_final_frame() {
        let dir = tempdir().unwrap();
        let assembler = VideoAssembler::new(EncoderParams {
            fps: 24,
            ..EncoderParams::default()
        });

        let frames: FrameSequence = (0..2)
            .map(|_| Frame::new(RgbImage::new(4, 4)))
            .collect();

        let frame_paths = assembler.write_frames(&frames, dir.path()).unwrap();
        assert_eq!(frame_paths.len(), 2);

        let list_path = assembler.write_concat_list(&frame_paths, dir.path()).unwrap();
        let list = std::fs::read_to_string(list_path).unwrap();

        assert_eq!(list.matches("file '").count(), 3);
        assert_eq!(list.matches("duration 0.041667").count(), 2);
    }
}
