//! Error types for the frame pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("frame has zero dimension ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },
    #[error("plane {plane} has invalid strides (row {row_stride}, pixel {pixel_stride})")]
    InvalidStride {
        plane: usize,
        row_stride: usize,
        pixel_stride: usize,
    },
    #[error("output buffer too small: have {have}, need {need}")]
    OutputTooSmall { have: usize, need: usize },
}

/// Why an accept call did not publish a frame
#[derive(Error, Debug)]
pub enum AcceptError {
    #[error("no frame supplied")]
    InputRejected,
    #[error("frame arrived before the minimum interval elapsed")]
    Throttled,
    #[error("conversion failed: {0}")]
    Conversion(#[from] ConversionError),
}

#[derive(Error, Debug)]
pub enum RotateError {
    #[error("rotation requires even dimensions, got {width}x{height}")]
    OddDimensions { width: u32, height: u32 },
    #[error("source buffer too small: have {have}, need {need}")]
    SourceTooSmall { have: usize, need: usize },
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("no frame available")]
    NoFrameAvailable,
    #[error("rotation failed: {0}")]
    Rotate(#[from] RotateError),
    #[error("JPEG compression failed: {0}")]
    Compress(#[from] image::ImageError),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error a listener reports back to the dispatcher. Logged, never propagated.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;
