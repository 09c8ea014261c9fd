//! lastframe FFI - C Foreign Function Interface
//!
//! Provides a C-compatible API so a host camera layer can feed frames into a
//! [`LastFrameStore`] and query or save the latest one.
//!
//! Every call that receives a [`CRawFrame`] invokes its `release` callback
//! exactly once before returning, including on error paths.

use libc::{c_char, c_int, c_void};
use std::ffi::CStr;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use lastframe_video::{
    AcceptError, CaptureMetadata, ConversionError, EncodeError, ExifOrientation, LastFrameStore,
    PlaneView, RawFrame, StoreConfig,
};

mod preview_ffi;
pub use preview_ffi::*;

pub const LASTFRAME_OK: c_int = 0;
pub const LASTFRAME_ERR_NULL: c_int = -1;
pub const LASTFRAME_ERR_THROTTLED: c_int = -2;
pub const LASTFRAME_ERR_CONVERSION: c_int = -3;
pub const LASTFRAME_ERR_NO_FRAME: c_int = -4;
pub const LASTFRAME_ERR_ENCODE: c_int = -5;
pub const LASTFRAME_ERR_IO: c_int = -6;
pub const LASTFRAME_ERR_INVALID_ARG: c_int = -7;
pub const LASTFRAME_ERR_PANIC: c_int = -8;

/// Opaque handle to LastFrameStore (C-compatible)
pub struct LFStore {
    _private: [u8; 0],
}

/// C-compatible store configuration
#[repr(C)]
pub struct CStoreConfig {
    /// Frames per second; `<= 0` disables throttling
    pub frame_fps: f64,
    /// Nonzero embeds an EXIF orientation tag in written JPEGs
    pub exif_orientation: c_int,
}

/// One plane of a raw frame
#[repr(C)]
pub struct CPlane {
    pub data: *const u8,
    /// Readable bytes starting at `data`
    pub len: usize,
    pub row_stride: u32,
    pub pixel_stride: u32,
}

/// C-compatible raw camera frame (Y, U, V planes)
#[repr(C)]
pub struct CRawFrame {
    pub width: u32,
    pub height: u32,
    pub planes: [CPlane; 3],
    pub has_lens_aperture: bool,
    pub lens_aperture: f32,
    pub has_exposure_time: bool,
    pub exposure_time_ns: i64,
    pub has_sensor_sensitivity: bool,
    pub sensor_sensitivity: i32,
    /// Called once with `release_ctx` when the store is done with the frame
    pub release: Option<unsafe extern "C" fn(*mut c_void)>,
    pub release_ctx: *mut c_void,
}

/// Borrowed C frame that runs its release callback when dropped
struct FfiFrame<'a> {
    desc: &'a CRawFrame,
}

impl RawFrame for FfiFrame<'_> {
    fn width(&self) -> u32 {
        self.desc.width
    }

    fn height(&self) -> u32 {
        self.desc.height
    }

    fn planes(&self) -> Result<[PlaneView<'_>; 3], ConversionError> {
        let view = |plane: &CPlane| {
            let data: &[u8] = if plane.data.is_null() || plane.len == 0 {
                &[]
            } else {
                // SAFETY: the caller of `lastframe_store_accept` guarantees
                // `len` readable bytes at `data` for the duration of the call.
                unsafe { std::slice::from_raw_parts(plane.data, plane.len) }
            };
            PlaneView::new(data, plane.row_stride as usize, plane.pixel_stride as usize)
        };

        let [y, u, v] = &self.desc.planes;
        Ok([view(y), view(u), view(v)])
    }

    fn metadata(&self) -> CaptureMetadata {
        let desc = self.desc;
        CaptureMetadata {
            lens_aperture: desc.has_lens_aperture.then_some(desc.lens_aperture),
            exposure_time_ns: desc.has_exposure_time.then_some(desc.exposure_time_ns),
            sensor_sensitivity: desc.has_sensor_sensitivity.then_some(desc.sensor_sensitivity),
        }
    }
}

impl Drop for FfiFrame<'_> {
    fn drop(&mut self) {
        if let Some(release) = self.desc.release {
            // SAFETY: the host supplied this callback and context together.
            unsafe { release(self.desc.release_ctx) };
        }
    }
}

/// Run `f`, turning a panic into an error status instead of unwinding into C
fn ffi_guard<F: FnOnce() -> c_int>(f: F) -> c_int {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        log::error!("Panic caught at FFI boundary");
        LASTFRAME_ERR_PANIC
    })
}

fn accept_status(err: &AcceptError) -> c_int {
    match err {
        AcceptError::InputRejected => LASTFRAME_ERR_NULL,
        AcceptError::Throttled => LASTFRAME_ERR_THROTTLED,
        AcceptError::Conversion(_) => LASTFRAME_ERR_CONVERSION,
    }
}

fn encode_status(err: &EncodeError) -> c_int {
    match err {
        EncodeError::NoFrameAvailable => LASTFRAME_ERR_NO_FRAME,
        EncodeError::Rotate(_) | EncodeError::Compress(_) => LASTFRAME_ERR_ENCODE,
        EncodeError::Io { .. } => LASTFRAME_ERR_IO,
    }
}

// ============================================================================
// STORE API
// ============================================================================

/// Create a new store. A null config selects defaults (5 fps, no EXIF tag).
///
/// # Safety
/// `config` must be null or point to a valid CStoreConfig.
#[no_mangle]
pub unsafe extern "C" fn lastframe_store_create(config: *const CStoreConfig) -> *mut LFStore {
    let config = if config.is_null() {
        StoreConfig::default()
    } else {
        let exif = if (*config).exif_orientation != 0 {
            ExifOrientation::Tag
        } else {
            ExifOrientation::Omit
        };
        StoreConfig::default()
            .with_frame_fps(Some((*config).frame_fps))
            .with_exif_orientation(exif)
    };

    let store = Box::new(LastFrameStore::new(config));
    Box::into_raw(store) as *mut LFStore
}

/// Destroy a store
///
/// # Safety
/// Caller must ensure ptr is valid and not already freed.
#[no_mangle]
pub unsafe extern "C" fn lastframe_store_destroy(ptr: *mut LFStore) {
    if !ptr.is_null() {
        let _ = Box::from_raw(ptr as *mut LastFrameStore);
    }
}

/// Convert and publish a camera frame. Returns `LASTFRAME_OK` if accepted.
///
/// The frame's release callback runs exactly once before this returns.
///
/// # Safety
/// `ptr` must be a valid store. `frame` must be null or point to a valid
/// CRawFrame whose planes stay readable until the call returns.
#[no_mangle]
pub unsafe extern "C" fn lastframe_store_accept(
    ptr: *const LFStore,
    frame: *const CRawFrame,
) -> c_int {
    let frame = if frame.is_null() {
        None
    } else {
        Some(FfiFrame { desc: &*frame })
    };

    if ptr.is_null() {
        return LASTFRAME_ERR_NULL;
    }

    let store = &*(ptr as *const LastFrameStore);
    ffi_guard(move || match store.try_accept(frame) {
        Ok(()) => LASTFRAME_OK,
        Err(err) => accept_status(&err),
    })
}

/// Like `lastframe_store_accept`, gated by `min_interval_ns` since the last
/// accepted frame instead of the configured rate. Negative intervals count
/// as zero.
///
/// # Safety
/// Same contract as `lastframe_store_accept`.
#[no_mangle]
pub unsafe extern "C" fn lastframe_store_accept_with_interval(
    ptr: *const LFStore,
    frame: *const CRawFrame,
    min_interval_ns: i64,
) -> c_int {
    let frame = if frame.is_null() {
        None
    } else {
        Some(FfiFrame { desc: &*frame })
    };

    if ptr.is_null() {
        return LASTFRAME_ERR_NULL;
    }

    let store = &*(ptr as *const LastFrameStore);
    let interval = Duration::from_nanos(min_interval_ns.max(0) as u64);
    ffi_guard(move || match store.try_accept_with_interval(frame, interval) {
        Ok(()) => LASTFRAME_OK,
        Err(err) => accept_status(&err),
    })
}

/// Check whether a frame has been published
///
/// # Safety
/// Caller must ensure ptr is valid.
#[no_mangle]
pub unsafe extern "C" fn lastframe_store_has_frame(ptr: *const LFStore) -> c_int {
    if ptr.is_null() {
        return 0;
    }

    let store = &*(ptr as *const LastFrameStore);
    c_int::from(store.has_frame())
}

/// Change the throttle rate; `fps <= 0` disables throttling. The next frame is
/// always accepted.
///
/// # Safety
/// Caller must ensure ptr is valid.
#[no_mangle]
pub unsafe extern "C" fn lastframe_store_set_frame_fps(ptr: *const LFStore, fps: f64) {
    if ptr.is_null() {
        return;
    }

    let store = &*(ptr as *const LastFrameStore);
    store.set_frame_fps(Some(fps));
}

/// Write the latest frame as JPEG to `path`, rotated clockwise by
/// `rotation_degrees`. `quality` is 0-100.
///
/// # Safety
/// `ptr` must be a valid store and `path` a NUL-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn lastframe_store_write_jpeg(
    ptr: *const LFStore,
    path: *const c_char,
    rotation_degrees: c_int,
    quality: c_int,
) -> c_int {
    if ptr.is_null() || path.is_null() {
        return LASTFRAME_ERR_NULL;
    }

    let Ok(path) = CStr::from_ptr(path).to_str() else {
        return LASTFRAME_ERR_INVALID_ARG;
    };

    let store = &*(ptr as *const LastFrameStore);
    let quality = quality.clamp(0, 100) as u8;

    ffi_guard(|| match store.write_jpeg(path, rotation_degrees, quality) {
        Ok(_) => LASTFRAME_OK,
        Err(err) => {
            log::warn!("JPEG write to {} failed: {}", path, err);
            encode_status(&err)
        }
    })
}

/// Get accepted frame count
///
/// # Safety
/// Caller must ensure ptr is valid.
#[no_mangle]
pub unsafe extern "C" fn lastframe_store_get_accepted_frames(ptr: *const LFStore) -> u64 {
    if ptr.is_null() {
        return 0;
    }

    let store = &*(ptr as *const LastFrameStore);
    store.stats().accepted
}

/// Get throttled frame count
///
/// # Safety
/// Caller must ensure ptr is valid.
#[no_mangle]
pub unsafe extern "C" fn lastframe_store_get_throttled_frames(ptr: *const LFStore) -> u64 {
    if ptr.is_null() {
        return 0;
    }

    let store = &*(ptr as *const LastFrameStore);
    store.stats().throttled
}

// ============================================================================
// UTILITY FUNCTIONS
// ============================================================================

/// Get library version string
#[no_mangle]
pub extern "C" fn lastframe_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
