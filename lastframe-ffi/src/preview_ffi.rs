//! Preview and listener FFI bindings

use crate::{ffi_guard, LFStore, LASTFRAME_ERR_NO_FRAME, LASTFRAME_ERR_NULL, LASTFRAME_OK};
use lastframe_video::{
    Delivery, FrameBytes, FrameListener, LastFrameStore, ListenerError, PreviewFrame,
};
use libc::{c_int, c_void};
use std::ptr;

/// C-compatible preview of the latest frame (single NV21 plane)
#[repr(C)]
pub struct CPreviewFrame {
    /// Pixel format code (17 = NV21)
    pub format: u32,
    pub width: u32,
    pub height: u32,
    pub bytes: *const u8,
    pub len: usize,
    pub bytes_per_row: u32,
    pub bytes_per_pixel: u32,
    pub has_lens_aperture: bool,
    pub lens_aperture: f32,
    pub has_exposure_time: bool,
    pub exposure_time_ns: i64,
    pub has_sensor_sensitivity: bool,
    pub sensor_sensitivity: i32,
    /// Owns `bytes` for frames from `lastframe_store_preview_frame`; null for
    /// frames passed to a listener callback
    pub handle: *mut c_void,
}

impl CPreviewFrame {
    fn empty() -> Self {
        Self {
            format: 0,
            width: 0,
            height: 0,
            bytes: ptr::null(),
            len: 0,
            bytes_per_row: 0,
            bytes_per_pixel: 0,
            has_lens_aperture: false,
            lens_aperture: 0.0,
            has_exposure_time: false,
            exposure_time_ns: 0,
            has_sensor_sensitivity: false,
            sensor_sensitivity: 0,
            handle: ptr::null_mut(),
        }
    }

    /// Describe `frame` without taking ownership of its bytes
    fn borrowed(frame: &PreviewFrame) -> Self {
        let mut out = Self::empty();
        out.format = frame.format.code();
        out.width = frame.width;
        out.height = frame.height;

        if let Some(plane) = frame.planes.first() {
            out.bytes = plane.bytes.as_ptr();
            out.len = plane.bytes.len();
            out.bytes_per_row = plane.bytes_per_row;
            out.bytes_per_pixel = plane.bytes_per_pixel;
        }

        let meta = frame.metadata;
        out.has_lens_aperture = meta.lens_aperture.is_some();
        out.lens_aperture = meta.lens_aperture.unwrap_or_default();
        out.has_exposure_time = meta.exposure_time_ns.is_some();
        out.exposure_time_ns = meta.exposure_time_ns.unwrap_or_default();
        out.has_sensor_sensitivity = meta.sensor_sensitivity.is_some();
        out.sensor_sensitivity = meta.sensor_sensitivity.unwrap_or_default();
        out
    }
}

/// Listener callback. Return 0 on success; anything else is logged as a
/// listener failure. `frame` is only valid during the call.
pub type CFrameCallback =
    unsafe extern "C" fn(frame: *const CPreviewFrame, user_data: *mut c_void) -> c_int;

struct UserData(*mut c_void);

// SAFETY: the host promises user_data may be used from the producer thread.
unsafe impl Send for UserData {}
unsafe impl Sync for UserData {}

struct CallbackListener {
    callback: CFrameCallback,
    user_data: UserData,
}

impl FrameListener for CallbackListener {
    fn on_frame(&self, frame: &PreviewFrame) -> Result<(), ListenerError> {
        let desc = CPreviewFrame::borrowed(frame);
        let status = unsafe { (self.callback)(&desc, self.user_data.0) };
        if status == LASTFRAME_OK {
            Ok(())
        } else {
            Err(format!("frame callback returned {}", status).into())
        }
    }
}

// ============================================================================
// PREVIEW API
// ============================================================================

/// Fill `out` with the latest frame. Release it with
/// `lastframe_preview_frame_release`.
///
/// `copy_bytes = false` shares the store's ring buffer, which keeps that slot
/// pinned until release.
///
/// # Safety
/// `ptr` must be a valid store and `out` writable.
#[no_mangle]
pub unsafe extern "C" fn lastframe_store_preview_frame(
    ptr: *const LFStore,
    copy_bytes: bool,
    out: *mut CPreviewFrame,
) -> c_int {
    if ptr.is_null() || out.is_null() {
        return LASTFRAME_ERR_NULL;
    }

    let store = &*(ptr as *const LastFrameStore);
    ffi_guard(|| {
        let Some(mut frame) = store.preview_frame(copy_bytes) else {
            *out = CPreviewFrame::empty();
            return LASTFRAME_ERR_NO_FRAME;
        };

        let mut desc = CPreviewFrame::borrowed(&frame);
        if !frame.planes.is_empty() {
            // Heap contents do not move when the owner is boxed
            let bytes = Box::new(frame.planes.swap_remove(0).bytes);
            desc.bytes = bytes.as_ptr();
            desc.handle = Box::into_raw(bytes) as *mut c_void;
        }
        *out = desc;
        LASTFRAME_OK
    })
}

/// Release bytes held by a preview frame. Safe to call twice.
///
/// # Safety
/// `frame` must be null or a frame filled by `lastframe_store_preview_frame`.
#[no_mangle]
pub unsafe extern "C" fn lastframe_preview_frame_release(frame: *mut CPreviewFrame) {
    if frame.is_null() {
        return;
    }

    let frame = &mut *frame;
    if !frame.handle.is_null() {
        let _ = Box::from_raw(frame.handle as *mut FrameBytes);
    }
    frame.handle = ptr::null_mut();
    frame.bytes = ptr::null();
    frame.len = 0;
}

// ============================================================================
// LISTENER API
// ============================================================================

/// Register a callback for every accepted frame, replacing any previous one.
/// A null callback clears the registration.
///
/// The callback runs synchronously on the thread calling
/// `lastframe_store_accept`.
///
/// # Safety
/// `ptr` must be a valid store. `user_data` must stay valid until the
/// listener is replaced, cleared or the store destroyed.
#[no_mangle]
pub unsafe extern "C" fn lastframe_store_set_listener(
    ptr: *const LFStore,
    callback: Option<CFrameCallback>,
    user_data: *mut c_void,
    copy_bytes: bool,
) -> c_int {
    if ptr.is_null() {
        return LASTFRAME_ERR_NULL;
    }

    let store = &*(ptr as *const LastFrameStore);
    match callback {
        Some(callback) => {
            let delivery = if copy_bytes {
                Delivery::Copy
            } else {
                Delivery::Shared
            };
            let listener = CallbackListener {
                callback,
                user_data: UserData(user_data),
            };
            store.set_listener(listener, delivery);
        }
        None => store.clear_listener(),
    }
    LASTFRAME_OK
}
