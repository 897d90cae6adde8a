use std::fs;
use std::io::BufReader;
use std::path::Path;

use exif::{In, Reader, Tag};
use image::{imageops, DynamicImage};
use tracing::debug;

use crate::error::MetadataError;

/// Sensor orientation read from the EXIF orientation tag
///
/// Only the pure rotations are supported. Mirrored variants (tags 2, 4,
/// 5, 7) and unknown values read as `Normal`, so normalization is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    /// Tag 3
    Rotate180,
    /// Tag 6: sensor stored the reading 90 degrees CCW, display
    /// correction is a 90 degree clockwise rotation
    Rotate90,
    /// Tag 8: 270 degrees clockwise
    Rotate270,
}

impl Orientation {
    /// Constant tag table, the only mapping in the crate.
    pub fn from_exif_tag(tag: u32) -> Self {
        match tag {
            3 => Self::Rotate180,
            6 => Self::Rotate90,
            8 => Self::Rotate270,
            _ => Self::Normal,
        }
    }

    /// Read the orientation tag for a file
    ///
    /// Absent or corrupt metadata reads as `Normal`.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match read_orientation_tag(path) {
            Ok(tag) => Self::from_exif_tag(tag),
            Err(err) => {
                debug!(path = %path.display(), %err, "treating photo as unrotated");
                Self::Normal
            }
        }
    }

    /// Apply the rotation, expanding the canvas so no pixel is cropped
    ///
    /// 90/270 degree rotations swap width and height.
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Self::Normal => image,
            Self::Rotate180 => DynamicImage::ImageRgb8(imageops::rotate180(&image.to_rgb8())),
            Self::Rotate90 => DynamicImage::ImageRgb8(imageops::rotate90(&image.to_rgb8())),
            Self::Rotate270 => DynamicImage::ImageRgb8(imageops::rotate270(&image.to_rgb8())),
        }
    }
}

fn read_orientation_tag(path: &Path) -> Result<u32, MetadataError> {
    let unavailable = |reason: String| MetadataError::OrientationUnavailable { reason };

    let file = fs::File::open(path).map_err(|e| unavailable(e.to_string()))?;
    let mut reader = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| unavailable(e.to_string()))?;

    let field = exif
        .get_field(Tag::Orientation, In::PRIMARY)
        .ok_or_else(|| unavailable("orientation tag not present".to_string()))?;

    field
        .value
        .get_uint(0)
        .ok_or_else(|| unavailable("orientation tag is not an integer".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_tag_mapping() {
        assert_eq!(Orientation::from_exif_tag(1), Orientation::Normal);
        assert_eq!(Orientation::from_exif_tag(3), Orientation::Rotate180);
        assert_eq!(Orientation::from_exif_tag(6), Orientation::Rotate90);
        assert_eq!(Orientation::from_exif_tag(8), Orientation::Rotate270);
    }

    #[test]
    fn test_mirrored_and_unknown_tags_are_normal() {
        for tag in [0, 2, 4, 5, 7, 9, 99] {
            assert_eq!(Orientation::from_exif_tag(tag), Orientation::Normal);
        }
    }

    #[test]
    fn test_rotation_expands_canvas() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 2, Rgb([10, 20, 30])));

        assert_eq!(Orientation::Rotate90.apply(image.clone()).dimensions(), (2, 4));
        assert_eq!(Orientation::Rotate270.apply(image.clone()).dimensions(), (2, 4));
        assert_eq!(Orientation::Rotate180.apply(image.clone()).dimensions(), (4, 2));
        assert_eq!(Orientation::Normal.apply(image.clone()).dimensions(), (4, 2));
    }

    #[test]
    fn test_rotate90_moves_top_left_to_top_right() {
        let mut buffer = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        buffer.put_pixel(0, 0, Rgb([255, 0, 0]));
        let rotated = Orientation::Rotate90.apply(DynamicImage::ImageRgb8(buffer));

        assert_eq!(rotated.get_pixel(1, 0), image::Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_unreadable_metadata_reads_as_normal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.jpg");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"definitely not exif").unwrap();
        drop(file);

        assert_eq!(Orientation::read_from(&path), Orientation::Normal);
        assert_eq!(Orientation::read_from("/missing/file.jpg"), Orientation::Normal);
    }
}
