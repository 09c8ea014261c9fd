//! Store configuration

/// Default throttle rate: one frame every 200 ms
pub const DEFAULT_FRAME_FPS: f64 = 5.0;

/// Whether written JPEGs carry an EXIF orientation tag.
///
/// Pixels are always rotated before encoding. `Tag` additionally embeds an
/// Orientation entry describing the pixels as written (top-left), which keeps
/// viewers from applying a stale camera orientation on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExifOrientation {
    #[default]
    Omit,
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreConfig {
    /// Throttle rate in frames per second; `None` or `<= 0` accepts every frame
    pub frame_fps: Option<f64>,
    pub exif_orientation: ExifOrientation,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            frame_fps: Some(DEFAULT_FRAME_FPS),
            exif_orientation: ExifOrientation::Omit,
        }
    }
}

impl StoreConfig {
    pub fn with_frame_fps(mut self, frame_fps: Option<f64>) -> Self {
        self.frame_fps = frame_fps;
        self
    }

    pub fn with_exif_orientation(mut self, exif_orientation: ExifOrientation) -> Self {
        self.exif_orientation = exif_orientation;
        self
    }
}
