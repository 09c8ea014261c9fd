//! Frame data types and constants

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Instant;

use crate::error::ConversionError;

/// Pixel format tags reported to frame consumers
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Nv21 = 17, // Semi-planar YUV 4:2:0 (Y plane, interleaved VU)
}

impl PixelFormat {
    /// Numeric tag handed across the host boundary
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Byte length of an NV21 buffer: full-res luma plus half of it for chroma.
pub fn nv21_size(width: u32, height: u32) -> usize {
    let y_size = width as usize * height as usize;
    y_size + y_size / 2
}

/// Borrowed view of one plane of a planar frame.
///
/// `limit` is the number of readable bytes the producer declared; reads never
/// go past `min(limit, data.len())`.
#[derive(Debug, Clone, Copy)]
pub struct PlaneView<'a> {
    pub data: &'a [u8],
    pub row_stride: usize,
    pub pixel_stride: usize,
    pub limit: usize,
}

impl<'a> PlaneView<'a> {
    pub fn new(data: &'a [u8], row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            data,
            row_stride,
            pixel_stride,
            limit: data.len(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Bytes that may actually be read
    pub fn available(&self) -> usize {
        self.limit.min(self.data.len())
    }
}

/// Optional capture metadata passed through verbatim to consumers
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CaptureMetadata {
    pub lens_aperture: Option<f32>,
    pub exposure_time_ns: Option<i64>,
    pub sensor_sensitivity: Option<i32>,
}

/// A raw planar YUV 4:2:0 frame supplied by the camera.
///
/// The store takes ownership of each frame it is handed and drops it before
/// `accept` returns, on every path. Implementors that wrap a producer-owned
/// image release it in `Drop`.
pub trait RawFrame {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Y, U and V planes in that order
    fn planes(&self) -> Result<[PlaneView<'_>; 3], ConversionError>;

    fn metadata(&self) -> CaptureMetadata {
        CaptureMetadata::default()
    }
}

/// Owned plane storage for [`PlanarFrame`]
#[derive(Debug, Clone)]
pub struct PlaneBuffer {
    pub data: Vec<u8>,
    pub row_stride: usize,
    pub pixel_stride: usize,
    pub limit: usize,
}

impl PlaneBuffer {
    pub fn new(data: Vec<u8>, row_stride: usize, pixel_stride: usize) -> Self {
        let limit = data.len();
        Self {
            data,
            row_stride,
            pixel_stride,
            limit,
        }
    }

    pub fn view(&self) -> PlaneView<'_> {
        PlaneView::new(&self.data, self.row_stride, self.pixel_stride).with_limit(self.limit)
    }
}

/// Heap-backed planar frame, for hosts that copy planes out of their camera API
#[derive(Debug, Clone)]
pub struct PlanarFrame {
    pub width: u32,
    pub height: u32,
    pub planes: [PlaneBuffer; 3],
    pub metadata: CaptureMetadata,
}

impl PlanarFrame {
    pub fn new(width: u32, height: u32, planes: [PlaneBuffer; 3]) -> Self {
        Self {
            width,
            height,
            planes,
            metadata: CaptureMetadata::default(),
        }
    }

    /// Tightly packed I420 planes (row stride = plane width, pixel stride = 1)
    pub fn i420(width: u32, height: u32, y: Vec<u8>, u: Vec<u8>, v: Vec<u8>) -> Self {
        let w = width as usize;
        Self::new(
            width,
            height,
            [
                PlaneBuffer::new(y, w, 1),
                PlaneBuffer::new(u, w / 2, 1),
                PlaneBuffer::new(v, w / 2, 1),
            ],
        )
    }

    pub fn with_metadata(mut self, metadata: CaptureMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl RawFrame for PlanarFrame {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn planes(&self) -> Result<[PlaneView<'_>; 3], ConversionError> {
        Ok([
            self.planes[0].view(),
            self.planes[1].view(),
            self.planes[2].view(),
        ])
    }

    fn metadata(&self) -> CaptureMetadata {
        self.metadata
    }
}

/// Shared handle onto a ring slot's NV21 bytes
pub type FrameBuffer = Arc<Vec<u8>>;

/// An accepted, converted frame. Never mutated after construction.
pub struct DecodedFrame {
    buffer: FrameBuffer,
    width: u32,
    height: u32,
    timestamp: Instant,
    metadata: CaptureMetadata,
}

impl DecodedFrame {
    pub fn new(
        buffer: FrameBuffer,
        width: u32,
        height: u32,
        timestamp: Instant,
        metadata: CaptureMetadata,
    ) -> Self {
        debug_assert_eq!(buffer.len(), nv21_size(width, height));
        Self {
            buffer,
            width,
            height,
            timestamp,
            metadata,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    /// Shared handle to the backing buffer. Holding it keeps the ring from
    /// reusing the slot in place.
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    pub fn metadata(&self) -> CaptureMetadata {
        self.metadata
    }
}

impl fmt::Debug for DecodedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.buffer.len())
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

/// Frame bytes handed to readers: either a private copy or the ring's buffer
#[derive(Debug, Clone)]
pub enum FrameBytes {
    Owned(Vec<u8>),
    Shared(FrameBuffer),
}

impl Deref for FrameBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            FrameBytes::Owned(bytes) => bytes,
            FrameBytes::Shared(buffer) => buffer,
        }
    }
}

/// One plane of a [`PreviewFrame`]
#[derive(Debug, Clone)]
pub struct PlaneDescriptor {
    pub bytes: FrameBytes,
    pub bytes_per_row: u32,
    pub bytes_per_pixel: u32,
    pub width: u32,
    pub height: u32,
}

/// Structured description of the latest frame, as delivered to listeners and
/// preview queries
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub planes: Vec<PlaneDescriptor>,
    pub metadata: CaptureMetadata,
}

impl PreviewFrame {
    pub fn from_decoded(frame: &DecodedFrame, copy_bytes: bool) -> Self {
        let bytes = if copy_bytes {
            FrameBytes::Owned(frame.data().to_vec())
        } else {
            FrameBytes::Shared(Arc::clone(frame.buffer()))
        };

        Self {
            format: PixelFormat::Nv21,
            width: frame.width(),
            height: frame.height(),
            planes: vec![PlaneDescriptor {
                bytes,
                bytes_per_row: frame.width(),
                bytes_per_pixel: 1,
                width: frame.width(),
                height: frame.height(),
            }],
            metadata: frame.metadata(),
        }
    }
}
