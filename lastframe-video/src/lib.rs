//! Last-frame camera pipeline
//!
//! Keeps the most recent camera frame as NV21 for other threads to query,
//! preview or save as JPEG.
//!
//! Key pieces:
//! - Stride- and truncation-tolerant planar YUV 4:2:0 to NV21 conversion
//! - Three-slot buffer ring so readers are not overwritten mid-use
//! - Lock-free publish of the latest frame
//! - Per-store throttle and synchronous listener dispatch
//! - Quarter-turn rotation and JPEG encoding on a private snapshot

pub mod config;
pub mod error;
pub mod format_conversion;
pub mod frame_ring;
pub mod jpeg;
pub mod last_frame;
pub mod listener;
pub mod rotation;
pub mod throttle;
pub mod types;

pub use config::*;
pub use error::*;
pub use format_conversion::*;
pub use frame_ring::*;
pub use jpeg::*;
pub use last_frame::*;
pub use listener::*;
pub use rotation::*;
pub use throttle::*;
pub use types::*;
