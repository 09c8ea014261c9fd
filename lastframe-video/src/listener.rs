//! Synchronous frame listener dispatch

use crate::error::ListenerError;
use crate::types::{DecodedFrame, PreviewFrame};
use parking_lot::RwLock;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// How frame bytes reach the listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delivery {
    /// Private copy per frame
    #[default]
    Copy,
    /// The ring buffer itself. A listener that keeps the bytes past the call
    /// pins that ring slot, forcing a reallocation on its next turn.
    Shared,
}

/// Receives every accepted frame on the producer's thread.
///
/// Errors and panics are logged by the dispatcher and never reach the
/// producer.
pub trait FrameListener: Send + Sync {
    fn on_frame(&self, frame: &PreviewFrame) -> Result<(), ListenerError>;
}

impl<F> FrameListener for F
where
    F: Fn(&PreviewFrame) -> Result<(), ListenerError> + Send + Sync,
{
    fn on_frame(&self, frame: &PreviewFrame) -> Result<(), ListenerError> {
        self(frame)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    NoListener,
    Delivered,
    Failed,
}

struct Registration {
    listener: Arc<dyn FrameListener>,
    delivery: Delivery,
}

/// Holds at most one listener registration
#[derive(Default)]
pub struct ListenerRegistry {
    registration: RwLock<Option<Registration>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, listener: Arc<dyn FrameListener>, delivery: Delivery) {
        *self.registration.write() = Some(Registration { listener, delivery });
    }

    pub fn clear(&self) {
        *self.registration.write() = None;
    }

    /// Describe `frame` and hand it to the registered listener, if any
    pub fn dispatch(&self, frame: &DecodedFrame) -> DispatchOutcome {
        // Lock released before the call so a listener may re-register
        let (listener, delivery) = match self.registration.read().as_ref() {
            Some(reg) => (Arc::clone(&reg.listener), reg.delivery),
            None => return DispatchOutcome::NoListener,
        };

        let preview = PreviewFrame::from_decoded(frame, delivery == Delivery::Copy);

        match panic::catch_unwind(AssertUnwindSafe(|| listener.on_frame(&preview))) {
            Ok(Ok(())) => DispatchOutcome::Delivered,
            Ok(Err(err)) => {
                log::warn!("Frame listener failed: {}", err);
                DispatchOutcome::Failed
            }
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::warn!("Frame listener panicked: {}", reason);
                DispatchOutcome::Failed
            }
        }
    }
}
