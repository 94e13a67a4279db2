//! Capture adapter contracts and the scan flow state machine.
//!
//! Two ways of getting a payload out of the world feed the same resolver:
//! a continuous camera stream ([`ScanSession`]) and a single-shot still
//! image ([`scan_still`]). The continuous path deduplicates detections
//! through a [`ScanGate`] so a code that stays in frame across many frames
//! fires exactly one resolution event, and releases the camera on every
//! exit path via `Drop`.

use image::GrayImage;
use thiserror::Error;

use crate::qr::{self, DecodeError};
use crate::types::ProductId;

/// Failure of the capture hardware, distinct from decode failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScanError {
    /// The camera could not be acquired (permission denied, no device).
    /// Reported once; the session does not retry on its own.
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
}

/// A live source of grayscale camera frames.
///
/// `release` must be idempotent: [`ScanSession`] calls it from `Drop`, so
/// it runs on success, user-cancel and error paths alike.
pub trait FrameSource {
    /// Fetch the next frame, or `None` once the stream has ended.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::CameraUnavailable`] if the device cannot be
    /// (or can no longer be) acquired.
    fn next_frame(&mut self) -> Result<Option<GrayImage>, ScanError>;

    /// Release the underlying camera resource.
    fn release(&mut self);
}

/// Deduplicates successful detections in a continuous scan.
///
/// After emitting a payload the gate suspends; further detections are
/// swallowed until the caller acknowledges that the previous result has
/// been handled.
#[derive(Debug, Default)]
pub struct ScanGate {
    suspended: bool,
}

impl ScanGate {
    #[must_use]
    pub const fn new() -> Self {
        Self { suspended: false }
    }

    /// Offer a freshly decoded payload. Returns it for emission unless the
    /// gate is suspended waiting on an acknowledgement.
    pub fn offer(&mut self, payload: String) -> Option<String> {
        if self.suspended {
            return None;
        }
        self.suspended = true;
        Some(payload)
    }

    /// Acknowledge the previously emitted payload, resuming emission.
    pub fn acknowledge(&mut self) {
        self.suspended = false;
    }

    #[must_use]
    pub const fn is_suspended(&self) -> bool {
        self.suspended
    }
}

/// A continuous scanning session over a live frame source.
///
/// Owns the source for its lifetime; dropping the session releases the
/// camera regardless of how the session ended.
pub struct ScanSession<S: FrameSource> {
    source: S,
    gate: ScanGate,
}

impl<S: FrameSource> ScanSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            gate: ScanGate::new(),
        }
    }

    /// Process one frame.
    ///
    /// Returns `Ok(Some(payload))` for a new detection event, `Ok(None)`
    /// when the frame held no decodable code, the gate is suspended, or
    /// the stream ended. Decode failures never end the session.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the camera fails; the caller is expected
    /// to close the session rather than retry.
    pub fn poll(&mut self) -> Result<Option<String>, ScanError> {
        let Some(frame) = self.source.next_frame()? else {
            return Ok(None);
        };

        match qr::decode_frame(frame) {
            Ok(payload) => Ok(self.gate.offer(payload)),
            Err(_) => Ok(None),
        }
    }

    /// Acknowledge the last emitted payload so scanning can emit again.
    pub fn acknowledge(&mut self) {
        self.gate.acknowledge();
    }
}

impl<S: FrameSource> Drop for ScanSession<S> {
    fn drop(&mut self) {
        self.source.release();
    }
}

/// Single-shot decode of a still image (camera snapshot or uploaded file).
///
/// Exactly one attempt; there is no retry loop.
///
/// # Errors
///
/// Returns [`DecodeError`] when no valid code is found in the image.
pub fn scan_still(bytes: &[u8]) -> Result<String, DecodeError> {
    qr::decode(bytes)
}

/// The scan-and-resolve UI flow as an explicit state machine.
///
/// Replaces nested boolean show-flags: every modal chain step is a state,
/// and [`ScanFlow::apply`] is the single place transitions are defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanFlow {
    Idle,
    Capturing,
    Resolving { payload: String },
    ViewingDetails { product_id: ProductId },
    Editing { product_id: ProductId },
}

/// Events driving [`ScanFlow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    OpenScanner,
    Detected { payload: String },
    Resolved { product_id: ProductId },
    Missed,
    Edit,
    Close,
}

/// An event arrived in a state that does not accept it.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid scan-flow transition: {event} while {state}")]
pub struct InvalidTransition {
    state: &'static str,
    event: &'static str,
}

impl ScanFlow {
    /// Apply an event, yielding the next state.
    ///
    /// `Close` is accepted everywhere and returns to `Idle`; a resolution
    /// miss returns to `Capturing` so the user lands back on the scanner.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] for any event/state pair not listed.
    pub fn apply(self, event: FlowEvent) -> Result<Self, InvalidTransition> {
        match (self, event) {
            (_, FlowEvent::Close) => Ok(Self::Idle),
            (Self::Idle, FlowEvent::OpenScanner) => Ok(Self::Capturing),
            (Self::Capturing, FlowEvent::Detected { payload }) => Ok(Self::Resolving { payload }),
            (Self::Resolving { .. }, FlowEvent::Resolved { product_id }) => {
                Ok(Self::ViewingDetails { product_id })
            }
            (Self::Resolving { .. }, FlowEvent::Missed) => Ok(Self::Capturing),
            (Self::ViewingDetails { product_id }, FlowEvent::Edit) => {
                Ok(Self::Editing { product_id })
            }
            (state, event) => Err(InvalidTransition {
                state: state.name(),
                event: event.name(),
            }),
        }
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::Resolving { .. } => "resolving",
            Self::ViewingDetails { .. } => "viewing-details",
            Self::Editing { .. } => "editing",
        }
    }
}

impl FlowEvent {
    const fn name(&self) -> &'static str {
        match self {
            Self::OpenScanner => "open-scanner",
            Self::Detected { .. } => "detected",
            Self::Resolved { .. } => "resolved",
            Self::Missed => "missed",
            Self::Edit => "edit",
            Self::Close => "close",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use image::Luma;

    use super::*;

    /// Frame source playing back a fixed script of frames.
    struct ScriptedSource {
        frames: VecDeque<Result<Option<GrayImage>, ScanError>>,
        released: Arc<AtomicBool>,
    }

    impl ScriptedSource {
        fn new(
            frames: Vec<Result<Option<GrayImage>, ScanError>>,
        ) -> (Self, Arc<AtomicBool>) {
            let released = Arc::new(AtomicBool::new(false));
            (
                Self {
                    frames: frames.into(),
                    released: Arc::clone(&released),
                },
                released,
            )
        }
    }

    impl FrameSource for ScriptedSource {
        fn next_frame(&mut self) -> Result<Option<GrayImage>, ScanError> {
            self.frames.pop_front().unwrap_or(Ok(None))
        }

        fn release(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    fn code_frame(payload: &str) -> GrayImage {
        let png = qr::encode(payload).expect("encodes");
        image::load_from_memory(&png).expect("loads").to_luma8()
    }

    fn blank_frame() -> GrayImage {
        GrayImage::from_pixel(200, 200, Luma([255u8]))
    }

    #[test]
    fn gate_emits_once_until_acknowledged() {
        let mut gate = ScanGate::new();
        assert_eq!(gate.offer("p1".to_string()), Some("p1".to_string()));
        assert_eq!(gate.offer("p1".to_string()), None);
        assert_eq!(gate.offer("p2".to_string()), None);
        assert!(gate.is_suspended());

        gate.acknowledge();
        assert_eq!(gate.offer("p2".to_string()), Some("p2".to_string()));
    }

    #[test]
    fn session_emits_payload_once_while_code_stays_in_frame() {
        let (source, _) = ScriptedSource::new(vec![
            Ok(Some(code_frame("abc-123"))),
            Ok(Some(code_frame("abc-123"))),
            Ok(Some(code_frame("abc-123"))),
        ]);
        let mut session = ScanSession::new(source);

        assert_eq!(session.poll().expect("ok"), Some("abc-123".to_string()));
        assert_eq!(session.poll().expect("ok"), None);
        assert_eq!(session.poll().expect("ok"), None);
    }

    #[test]
    fn session_resumes_after_acknowledge() {
        let (source, _) = ScriptedSource::new(vec![
            Ok(Some(code_frame("first"))),
            Ok(Some(code_frame("second"))),
        ]);
        let mut session = ScanSession::new(source);

        assert_eq!(session.poll().expect("ok"), Some("first".to_string()));
        session.acknowledge();
        assert_eq!(session.poll().expect("ok"), Some("second".to_string()));
    }

    #[test]
    fn frame_without_code_emits_nothing_and_keeps_session_alive() {
        let (source, _) = ScriptedSource::new(vec![
            Ok(Some(blank_frame())),
            Ok(Some(code_frame("after-noise"))),
        ]);
        let mut session = ScanSession::new(source);

        assert_eq!(session.poll().expect("ok"), None);
        assert_eq!(session.poll().expect("ok"), Some("after-noise".to_string()));
    }

    #[test]
    fn camera_failure_propagates_distinctly() {
        let (source, _) = ScriptedSource::new(vec![Err(ScanError::CameraUnavailable(
            "permission denied".to_string(),
        ))]);
        let mut session = ScanSession::new(source);

        assert_eq!(
            session.poll(),
            Err(ScanError::CameraUnavailable("permission denied".to_string()))
        );
    }

    #[test]
    fn camera_is_released_on_every_exit_path() {
        // Normal drop.
        let (source, released) = ScriptedSource::new(vec![]);
        drop(ScanSession::new(source));
        assert!(released.load(Ordering::SeqCst));

        // Drop after a camera error.
        let (source, released) = ScriptedSource::new(vec![Err(ScanError::CameraUnavailable(
            "gone".to_string(),
        ))]);
        let mut session = ScanSession::new(source);
        assert!(session.poll().is_err());
        drop(session);
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn still_scan_round_trip_and_failure() {
        let png = qr::encode("still-1").expect("encodes");
        assert_eq!(scan_still(&png).expect("decodes"), "still-1");
        assert!(scan_still(b"not an image").is_err());
    }

    #[test]
    fn flow_happy_path() {
        let product_id = ProductId::generate();
        let flow = ScanFlow::Idle
            .apply(FlowEvent::OpenScanner)
            .and_then(|f| {
                f.apply(FlowEvent::Detected {
                    payload: "p".to_string(),
                })
            })
            .and_then(|f| f.apply(FlowEvent::Resolved { product_id }))
            .expect("valid chain");
        assert_eq!(flow, ScanFlow::ViewingDetails { product_id });

        let flow = flow.apply(FlowEvent::Edit).expect("edit is valid");
        assert_eq!(flow, ScanFlow::Editing { product_id });
    }

    #[test]
    fn flow_miss_returns_to_capturing() {
        let flow = ScanFlow::Resolving {
            payload: "unknown".to_string(),
        }
        .apply(FlowEvent::Missed)
        .expect("miss is valid");
        assert_eq!(flow, ScanFlow::Capturing);
    }

    #[test]
    fn flow_close_is_valid_everywhere() {
        let product_id = ProductId::generate();
        for state in [
            ScanFlow::Idle,
            ScanFlow::Capturing,
            ScanFlow::Resolving {
                payload: "p".to_string(),
            },
            ScanFlow::ViewingDetails { product_id },
            ScanFlow::Editing { product_id },
        ] {
            assert_eq!(state.apply(FlowEvent::Close).expect("close"), ScanFlow::Idle);
        }
    }

    #[test]
    fn flow_rejects_out_of_order_events() {
        let err = ScanFlow::Idle
            .apply(FlowEvent::Edit)
            .expect_err("edit from idle is invalid");
        assert_eq!(
            err.to_string(),
            "invalid scan-flow transition: edit while idle"
        );
    }
}
