use image::{imageops, imageops::FilterType, DynamicImage, GenericImageView, RgbImage};

use crate::video::types::Frame;

/// Letterboxes photos onto a fixed-size canvas
///
/// The photo is scaled so its longest side touches the bound, preserving
/// aspect ratio, then centered on an opaque black background. Every
/// composed frame has exactly the configured dimensions; that is the
/// contract the encoder depends on.
#[derive(Debug, Clone)]
pub struct FrameCompositor {
    target: (u32, u32),
}

impl FrameCompositor {
    /// Create a compositor for the given canvas size
    pub fn new(target: (u32, u32)) -> Self {
        Self { target }
    }

    /// Get the canvas size
    pub fn target(&self) -> (u32, u32) {
        self.target
    }

    /// Scale-to-fit plus centered letterbox
    ///
    /// Total for any raster size, including degenerate 1x1 sources
    /// (which scale up until they touch a bound).
    pub fn compose(&self, image: &DynamicImage) -> Frame {
        let (width, height) = self.target;

        // Lanczos3 keeps fine detail through large scale changes.
        let scaled = image.resize(width, height, FilterType::Lanczos3);

        // Leftover space splits evenly, integer-floored.
        let offset_x = i64::from((width - scaled.width()) / 2);
        let offset_y = i64::from((height - scaled.height()) / 2);

        let mut canvas = RgbImage::new(width, height);
        imageops::overlay(&mut canvas, &scaled.to_rgb8(), offset_x, offset_y);

        Frame::new(canvas)
    }
}
