//! Latest-frame store
//!
//! One producer thread feeds camera frames through the throttle, converts them
//! into the ring and publishes the result with a single atomic pointer swap.
//! Any number of reader threads can query or encode the latest frame without
//! blocking the producer.

use crate::config::{ExifOrientation, StoreConfig};
use crate::error::{AcceptError, ConversionError, EncodeError};
use crate::format_conversion::convert_yuv420_to_nv21;
use crate::frame_ring::FrameRing;
use crate::jpeg::{encode_nv21_jpeg, insert_exif_orientation, ORIENTATION_TOP_LEFT};
use crate::listener::{Delivery, DispatchOutcome, FrameListener, ListenerRegistry};
use crate::rotation::{rotate_nv21_into, Rotation};
use crate::throttle::FrameThrottle;
use crate::types::{DecodedFrame, PreviewFrame, RawFrame};
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Producer-side state. Only the accepting thread and rate changes touch it.
struct Producer {
    ring: FrameRing,
    throttle: FrameThrottle,
}

impl Producer {
    fn convert<F: RawFrame>(
        &mut self,
        frame: &F,
        now: Instant,
    ) -> Result<DecodedFrame, ConversionError> {
        let (width, height) = (frame.width(), frame.height());
        let [y, u, v] = frame.planes()?;

        let mut buffer = self.ring.checkout(width, height);
        if let Err(err) = convert_yuv420_to_nv21(
            &y,
            &u,
            &v,
            width as usize,
            height as usize,
            &mut buffer,
        ) {
            self.ring.restore(buffer);
            return Err(err);
        }

        let shared = self.ring.commit(buffer);
        Ok(DecodedFrame::new(
            shared,
            width,
            height,
            now,
            frame.metadata(),
        ))
    }
}

/// Reusable buffers for encoding, private to one encode at a time
#[derive(Default)]
struct EncodeWorkspace {
    snapshot: Vec<u8>,
    rotated: Vec<u8>,
    rgb: Vec<u8>,
}

#[derive(Default)]
struct Counters {
    accepted: AtomicU64,
    throttled: AtomicU64,
    rejected: AtomicU64,
    conversion_failures: AtomicU64,
    listener_failures: AtomicU64,
    // Mirrors of ring state so readers never take the producer lock
    ring_reallocations: AtomicU64,
    ring_index: AtomicUsize,
}

impl Counters {
    fn sync_ring(&self, ring: &FrameRing) {
        self.ring_reallocations
            .store(ring.reallocations(), Ordering::Relaxed);
        self.ring_index.store(ring.index(), Ordering::Relaxed);
    }
}

/// Which interval gates an accept
#[derive(Clone, Copy)]
enum Gate {
    Configured,
    Interval(Duration),
}

/// Keeps the most recent camera frame as NV21
pub struct LastFrameStore {
    config: StoreConfig,
    producer: Mutex<Producer>,
    latest: ArcSwapOption<DecodedFrame>,
    listeners: ListenerRegistry,
    workspace: Mutex<EncodeWorkspace>,
    counters: Counters,
}

impl LastFrameStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            producer: Mutex::new(Producer {
                ring: FrameRing::new(),
                throttle: FrameThrottle::new(config.frame_fps),
            }),
            latest: ArcSwapOption::empty(),
            listeners: ListenerRegistry::new(),
            workspace: Mutex::new(EncodeWorkspace::default()),
            counters: Counters::default(),
        }
    }

    /// Accept a camera frame. Returns true if it was converted and published.
    ///
    /// The frame is dropped (released to its producer) before this returns,
    /// whatever the outcome.
    pub fn accept<F: RawFrame>(&self, frame: Option<F>) -> bool {
        self.try_accept(frame).is_ok()
    }

    /// Like [`accept`](Self::accept), reporting why a frame was not published
    pub fn try_accept<F: RawFrame>(&self, frame: Option<F>) -> Result<(), AcceptError> {
        match frame {
            Some(frame) => self.accept_at(frame, Instant::now(), Gate::Configured),
            None => self.reject(),
        }
    }

    /// Accept gated by `min_interval` since the last accepted frame instead
    /// of the configured rate. The configured rate is left unchanged.
    pub fn try_accept_with_interval<F: RawFrame>(
        &self,
        frame: Option<F>,
        min_interval: Duration,
    ) -> Result<(), AcceptError> {
        match frame {
            Some(frame) => self.accept_at(frame, Instant::now(), Gate::Interval(min_interval)),
            None => self.reject(),
        }
    }

    fn reject(&self) -> Result<(), AcceptError> {
        self.counters.rejected.fetch_add(1, Ordering::Relaxed);
        Err(AcceptError::InputRejected)
    }

    fn accept_at<F: RawFrame>(
        &self,
        frame: F,
        now: Instant,
        gate: Gate,
    ) -> Result<(), AcceptError> {
        let published = {
            let mut producer = self.producer.lock();

            let open = match gate {
                Gate::Configured => producer.throttle.is_open(now),
                Gate::Interval(interval) => producer.throttle.is_open_after(now, interval),
            };
            if !open {
                self.counters.throttled.fetch_add(1, Ordering::Relaxed);
                return Err(AcceptError::Throttled);
            }

            let converted = producer.convert(&frame, now);
            self.counters.sync_ring(&producer.ring);

            let decoded = match converted {
                Ok(decoded) => Arc::new(decoded),
                Err(err) => {
                    log::error!(
                        "Failed to convert {}x{} frame: {}",
                        frame.width(),
                        frame.height(),
                        err
                    );
                    self.counters
                        .conversion_failures
                        .fetch_add(1, Ordering::Relaxed);
                    return Err(err.into());
                }
            };

            producer.throttle.mark_accepted(now);
            self.latest.store(Some(Arc::clone(&decoded)));
            decoded
        };
        drop(frame);

        self.counters.accepted.fetch_add(1, Ordering::Relaxed);

        if self.listeners.dispatch(&published) == DispatchOutcome::Failed {
            self.counters
                .listener_failures
                .fetch_add(1, Ordering::Relaxed);
        }

        Ok(())
    }

    /// Whether any frame has been published
    pub fn has_frame(&self) -> bool {
        self.latest.load().is_some()
    }

    /// The latest frame. Holding it past the next two accepts makes the ring
    /// allocate a fresh buffer for that slot instead of overwriting it.
    pub fn latest(&self) -> Option<Arc<DecodedFrame>> {
        self.latest.load_full()
    }

    /// Describe the latest frame, either with a private copy of its bytes or
    /// sharing the ring buffer
    pub fn preview_frame(&self, copy_bytes: bool) -> Option<PreviewFrame> {
        let frame = self.latest.load_full()?;
        Some(PreviewFrame::from_decoded(&frame, copy_bytes))
    }

    /// Change the throttle rate. `None` or `<= 0` disables throttling. The next
    /// frame is accepted regardless of when the previous one was.
    pub fn set_frame_fps(&self, rate: Option<f64>) {
        let mut producer = self.producer.lock();
        producer.throttle.set_rate(rate);
        match producer.throttle.min_interval() {
            Some(interval) => log::info!("Frame throttle set to one frame per {:?}", interval),
            None => log::info!("Frame throttle disabled"),
        }
    }

    pub fn set_listener<L: FrameListener + 'static>(&self, listener: L, delivery: Delivery) {
        self.listeners.set(Arc::new(listener), delivery);
    }

    /// Stop dispatching to the current listener
    pub fn clear_listener(&self) {
        self.listeners.clear();
    }

    /// Slot the next accepted frame will be written to
    pub fn ring_index(&self) -> usize {
        self.counters.ring_index.load(Ordering::Relaxed)
    }

    /// Write the latest frame as a JPEG, rotated clockwise by
    /// `rotation_degrees` (normalized to a quarter turn).
    pub fn write_jpeg(
        &self,
        path: impl AsRef<Path>,
        rotation_degrees: i32,
        quality: u8,
    ) -> Result<PathBuf, EncodeError> {
        let path = path.as_ref();

        let (mut workspace, width, height) = {
            let mut guard = self.workspace.lock();
            let frame = self
                .latest
                .load_full()
                .ok_or(EncodeError::NoFrameAvailable)?;

            let mut workspace = std::mem::take(&mut *guard);
            workspace.snapshot.clear();
            workspace.snapshot.extend_from_slice(frame.data());
            log::debug!(
                "Encoding snapshot of frame accepted {:?} ago",
                frame.timestamp().elapsed()
            );
            (workspace, frame.width(), frame.height())
        };

        let result = self.encode_snapshot(
            &mut workspace,
            path,
            width,
            height,
            Rotation::from_degrees(rotation_degrees),
            quality,
        );

        *self.workspace.lock() = workspace;
        result
    }

    fn encode_snapshot(
        &self,
        workspace: &mut EncodeWorkspace,
        path: &Path,
        width: u32,
        height: u32,
        rotation: Rotation,
        quality: u8,
    ) -> Result<PathBuf, EncodeError> {
        let EncodeWorkspace {
            snapshot,
            rotated,
            rgb,
        } = workspace;

        let (pixels, width, height) = if rotation == Rotation::None {
            (&snapshot[..], width, height)
        } else {
            let (width, height) = rotate_nv21_into(snapshot, width, height, rotation, rotated)?;
            (&rotated[..], width, height)
        };

        let mut jpeg = encode_nv21_jpeg(pixels, width, height, quality, rgb)?;
        if self.config.exif_orientation == ExifOrientation::Tag {
            insert_exif_orientation(&mut jpeg, ORIENTATION_TOP_LEFT);
        }

        if let Err(source) = std::fs::write(path, &jpeg) {
            let _ = std::fs::remove_file(path);
            return Err(EncodeError::Io {
                path: path.to_path_buf(),
                source,
            });
        }

        log::info!(
            "Wrote {}x{} JPEG ({} bytes, rotated {}) to {}",
            width,
            height,
            jpeg.len(),
            rotation.degrees(),
            path.display()
        );
        Ok(path.to_path_buf())
    }

    /// Get store statistics
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            accepted: self.counters.accepted.load(Ordering::Relaxed),
            throttled: self.counters.throttled.load(Ordering::Relaxed),
            rejected: self.counters.rejected.load(Ordering::Relaxed),
            conversion_failures: self.counters.conversion_failures.load(Ordering::Relaxed),
            listener_failures: self.counters.listener_failures.load(Ordering::Relaxed),
            ring_reallocations: self.counters.ring_reallocations.load(Ordering::Relaxed),
        }
    }
}

impl Default for LastFrameStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub accepted: u64,
    pub throttled: u64,
    pub rejected: u64,
    pub conversion_failures: u64,
    pub listener_failures: u64,
    pub ring_reallocations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListenerError;
    use crate::frame_ring::RING_SIZE;
    use crate::types::{
        CaptureMetadata, FrameBytes, PixelFormat, PlanarFrame, PlaneBuffer, PlaneView,
    };
    use std::sync::atomic::AtomicUsize;

    fn unthrottled() -> LastFrameStore {
        LastFrameStore::new(StoreConfig::default().with_frame_fps(None))
    }

    fn gray(width: u32, height: u32, luma: u8) -> PlanarFrame {
        let (w, h) = (width as usize, height as usize);
        PlanarFrame::i420(
            width,
            height,
            vec![luma; w * h],
            vec![128; (w / 2) * (h / 2)],
            vec![128; (w / 2) * (h / 2)],
        )
    }

    /// Counts how often the store releases it
    struct TrackedFrame {
        inner: PlanarFrame,
        releases: Arc<AtomicUsize>,
    }

    impl RawFrame for TrackedFrame {
        fn width(&self) -> u32 {
            self.inner.width()
        }

        fn height(&self) -> u32 {
            self.inner.height()
        }

        fn planes(&self) -> Result<[PlaneView<'_>; 3], ConversionError> {
            self.inner.planes()
        }
    }

    impl Drop for TrackedFrame {
        fn drop(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn broken(width: u32, height: u32) -> PlanarFrame {
        let mut frame = gray(width, height, 0);
        frame.planes[2] = PlaneBuffer::new(vec![0; 4], 0, 1);
        frame
    }

    #[test]
    fn test_accept_publishes_latest() {
        let store = unthrottled();
        assert!(!store.has_frame());

        assert!(store.accept(Some(gray(8, 4, 77))));

        assert!(store.has_frame());
        let latest = store.latest().unwrap();
        assert_eq!((latest.width(), latest.height()), (8, 4));
        assert_eq!(latest.data().len(), 48);
        assert!(latest.data()[..32].iter().all(|&b| b == 77));
    }

    #[test]
    fn test_null_input_rejected() {
        let store = unthrottled();
        let err = store.try_accept(None::<PlanarFrame>).unwrap_err();

        assert!(matches!(err, AcceptError::InputRejected));
        assert!(!store.has_frame());
        assert_eq!(store.stats().rejected, 1);
    }

    #[test]
    fn test_second_accept_inside_interval_is_throttled() {
        let store = LastFrameStore::new(StoreConfig::default().with_frame_fps(Some(1.0)));

        assert!(store.accept(Some(gray(4, 4, 1))));
        let first = store.latest().unwrap();

        assert!(!store.accept(Some(gray(4, 4, 2))));
        assert!(Arc::ptr_eq(&first, &store.latest().unwrap()));
        assert_eq!(store.stats().throttled, 1);
        assert_eq!(store.ring_index(), 1);
    }

    #[test]
    fn test_set_frame_fps_resets_throttle() {
        let store = LastFrameStore::new(StoreConfig::default().with_frame_fps(Some(1.0)));
        assert!(store.accept(Some(gray(4, 4, 1))));

        store.set_frame_fps(Some(1.0));
        assert!(store.accept(Some(gray(4, 4, 2))));

        store.set_frame_fps(Some(0.0));
        assert!(store.accept(Some(gray(4, 4, 3))));
        assert!(store.accept(Some(gray(4, 4, 4))));
    }

    #[test]
    fn test_ring_index_cycles() {
        let store = unthrottled();
        let start = store.ring_index();

        for i in 0..RING_SIZE {
            assert!(store.accept(Some(gray(4, 4, i as u8))));
        }

        assert_eq!(store.ring_index(), start);
        assert_eq!(store.stats().ring_reallocations, RING_SIZE as u64);
    }

    #[test]
    fn test_conversion_failure_keeps_latest() {
        let store = unthrottled();
        assert!(store.accept(Some(gray(4, 4, 5))));
        let before = store.latest().unwrap();
        let index = store.ring_index();

        let err = store.try_accept(Some(broken(4, 4))).unwrap_err();

        assert!(matches!(err, AcceptError::Conversion(_)));
        assert!(Arc::ptr_eq(&before, &store.latest().unwrap()));
        assert_eq!(store.ring_index(), index);
        assert_eq!(store.stats().conversion_failures, 1);

        // No lingering state
        assert!(store.accept(Some(gray(4, 4, 6))));
    }

    #[test]
    fn test_frame_released_once_on_every_path() {
        let releases = Arc::new(AtomicUsize::new(0));
        let tracked = |inner: PlanarFrame| TrackedFrame {
            inner,
            releases: Arc::clone(&releases),
        };
        let store = LastFrameStore::new(StoreConfig::default().with_frame_fps(Some(1.0)));

        assert!(store.accept(Some(tracked(gray(4, 4, 1)))));
        assert_eq!(releases.load(Ordering::SeqCst), 1);

        // Throttled
        assert!(!store.accept(Some(tracked(gray(4, 4, 1)))));
        assert_eq!(releases.load(Ordering::SeqCst), 2);

        // Conversion failure
        store.set_frame_fps(None);
        assert!(!store.accept(Some(tracked(broken(4, 4)))));
        assert_eq!(releases.load(Ordering::SeqCst), 3);

        // Nothing to release
        assert!(!store.accept(None::<TrackedFrame>));
        assert_eq!(releases.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_listener_receives_frame_description() {
        let store = unthrottled();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        store.set_listener(
            move |frame: &PreviewFrame| -> Result<(), ListenerError> {
                sink.lock().push(frame.clone());
                Ok(())
            },
            Delivery::Copy,
        );

        let metadata = CaptureMetadata {
            lens_aperture: Some(1.8),
            exposure_time_ns: Some(10_000_000),
            sensor_sensitivity: None,
        };
        assert!(store.accept(Some(gray(6, 4, 42).with_metadata(metadata))));

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        let frame = &seen[0];
        assert_eq!(frame.format, PixelFormat::Nv21);
        assert_eq!((frame.width, frame.height), (6, 4));
        assert_eq!(frame.metadata, metadata);
        assert_eq!(frame.planes.len(), 1);

        let plane = &frame.planes[0];
        assert_eq!(plane.bytes_per_row, 6);
        assert_eq!(plane.bytes_per_pixel, 1);
        assert_eq!((plane.width, plane.height), (6, 4));
        assert_eq!(plane.bytes.len(), 36);
        assert!(!matches!(plane.bytes, FrameBytes::Shared(_)));
    }

    #[test]
    fn test_failing_listener_does_not_fail_accept() {
        let store = unthrottled();

        store.set_listener(
            |_: &PreviewFrame| -> Result<(), ListenerError> { Err("downstream gone".into()) },
            Delivery::Shared,
        );
        assert!(store.accept(Some(gray(4, 4, 1))));

        store.set_listener(
            |_: &PreviewFrame| -> Result<(), ListenerError> { panic!("listener exploded") },
            Delivery::Copy,
        );
        assert!(store.accept(Some(gray(4, 4, 2))));

        store.clear_listener();
        assert!(store.accept(Some(gray(4, 4, 3))));

        let stats = store.stats();
        assert_eq!(stats.accepted, 3);
        assert_eq!(stats.listener_failures, 2);
    }

    #[test]
    fn test_preview_frame_copy_and_shared() {
        let store = unthrottled();
        assert!(store.preview_frame(true).is_none());

        assert!(store.accept(Some(gray(4, 2, 9))));

        let copied = store.preview_frame(true).unwrap();
        let shared = store.preview_frame(false).unwrap();
        assert!(!matches!(copied.planes[0].bytes, FrameBytes::Shared(_)));
        assert!(matches!(shared.planes[0].bytes, FrameBytes::Shared(_)));
        assert_eq!(&copied.planes[0].bytes[..], &shared.planes[0].bytes[..]);
    }

    #[test]
    fn test_shared_reader_survives_ring_cycle() {
        let store = unthrottled();
        assert!(store.accept(Some(gray(4, 4, 11))));
        let held = store.preview_frame(false).unwrap();

        for i in 0..RING_SIZE * 2 {
            assert!(store.accept(Some(gray(4, 4, 100 + i as u8))));
        }

        assert!(held.planes[0].bytes[..16].iter().all(|&b| b == 11));
    }

    #[test]
    fn test_encode_before_accept_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        let store = unthrottled();

        let err = store.write_jpeg(&path, 0, 90).unwrap_err();

        assert!(matches!(err, EncodeError::NoFrameAvailable));
        assert!(!path.exists());
    }

    #[test]
    fn test_encode_writes_rotated_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let store = unthrottled();
        assert!(store.accept(Some(gray(16, 8, 120))));

        let upright = store.write_jpeg(dir.path().join("upright.jpg"), 0, 85).unwrap();
        let bytes = std::fs::read(&upright).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let img = image::open(&upright).unwrap();
        assert_eq!((img.width(), img.height()), (16, 8));

        let turned = store.write_jpeg(dir.path().join("turned.jpg"), 90, 85).unwrap();
        let img = image::open(&turned).unwrap();
        assert_eq!((img.width(), img.height()), (8, 16));

        // The published frame itself is never rotated
        let latest = store.latest().unwrap();
        assert_eq!((latest.width(), latest.height()), (16, 8));
    }

    #[test]
    fn test_encode_with_exif_tag() {
        let dir = tempfile::tempdir().unwrap();
        let store = LastFrameStore::new(
            StoreConfig::default()
                .with_frame_fps(None)
                .with_exif_orientation(ExifOrientation::Tag),
        );
        assert!(store.accept(Some(gray(8, 8, 60))));

        let path = store.write_jpeg(dir.path().join("tagged.jpg"), 270, 70).unwrap();
        let bytes = std::fs::read(path).unwrap();

        assert_eq!(&bytes[2..4], &[0xFF, 0xE1]);
        assert_eq!(&bytes[6..12], b"Exif\0\0");
    }

    #[test]
    fn test_encode_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = unthrottled();
        assert!(store.accept(Some(gray(4, 4, 1))));

        let err = store
            .write_jpeg(dir.path().join("missing").join("frame.jpg"), 0, 90)
            .unwrap_err();
        assert!(matches!(err, EncodeError::Io { .. }));
    }

    #[test]
    fn test_odd_sized_frames_publish_neutral_chroma_tail() {
        let store = unthrottled();

        // Four accepts so the first slot is reused with its old bytes
        for luma in 0..=RING_SIZE as u8 {
            let frame = PlanarFrame::i420(3, 3, vec![luma; 9], vec![200], vec![201]);
            assert!(store.accept(Some(frame)));

            let latest = store.latest().unwrap();
            assert_eq!(latest.data().len(), 13);
            assert_eq!(&latest.data()[9..], &[201, 200, 128, 128]);
        }
        assert_eq!(store.stats().ring_reallocations, RING_SIZE as u64);
    }

    #[test]
    fn test_accept_with_explicit_interval() {
        let store = LastFrameStore::new(StoreConfig::default().with_frame_fps(Some(1.0)));
        assert!(store.accept(Some(gray(4, 4, 1))));

        // Zero interval bypasses the configured rate for this call only
        assert!(store
            .try_accept_with_interval(Some(gray(4, 4, 2)), Duration::ZERO)
            .is_ok());
        assert_eq!(store.latest().unwrap().data()[0], 2);

        let err = store
            .try_accept_with_interval(Some(gray(4, 4, 3)), Duration::from_secs(60))
            .unwrap_err();
        assert!(matches!(err, AcceptError::Throttled));
        assert!(!store.accept(Some(gray(4, 4, 4))));

        let err = store
            .try_accept_with_interval(None::<PlanarFrame>, Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, AcceptError::InputRejected));

        let stats = store.stats();
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.throttled, 2);
        assert_eq!(stats.rejected, 1);
    }

    #[test]
    fn test_diagnostics_do_not_take_producer_lock() {
        let store = unthrottled();
        assert!(store.accept(Some(gray(4, 4, 1))));
        assert!(store.accept(Some(gray(4, 4, 2))));

        let _producer = store.producer.lock();
        assert_eq!(store.ring_index(), 2);
        assert_eq!(store.stats().ring_reallocations, 2);
        assert_eq!(store.stats().accepted, 2);
    }

    #[test]
    fn test_readers_never_observe_torn_frames() {
        const FRAMES: usize = 200;
        let store = unthrottled();
        let (width, height) = (32u32, 16u32);
        let luma_len = (width * height) as usize;

        crossbeam::scope(|s| {
            for _ in 0..3 {
                s.spawn(|_| {
                    let mut observed = 0;
                    while observed < FRAMES {
                        if let Some(frame) = store.preview_frame(false) {
                            let bytes = &frame.planes[0].bytes;
                            let first = bytes[0];
                            assert!(bytes[..luma_len].iter().all(|&b| b == first));
                            assert!(bytes[luma_len..].iter().all(|&b| b == 128));
                        }
                        observed += 1;
                    }
                });
            }

            for i in 0..FRAMES {
                assert!(store.accept(Some(gray(width, height, i as u8))));
            }
        })
        .unwrap();

        assert_eq!(store.stats().accepted, FRAMES as u64);
    }
}
