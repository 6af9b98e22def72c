use std::time::Duration;

use crate::models::config::StreamSettings;
use crate::models::direction::Direction;
use crate::models::error::StreamError;
use crate::processing::stage::BlockOutcome;

/// Callback driven by the host once per block of captured frames.
///
/// `input` is `None` when the host presented no samples for this
/// invocation; the stage records silence in that case.
pub type CaptureCallback = Box<dyn FnMut(Option<&[i16]>) -> BlockOutcome + Send + 'static>;

/// Callback driven by the host once per block of output frames to fill.
pub type PlaybackCallback = Box<dyn FnMut(&mut [i16]) -> BlockOutcome + Send + 'static>;

/// Interface to the external audio subsystem.
///
/// The subsystem owns device discovery, stream lifecycle, and the
/// real-time thread that schedules callbacks; this trait is the whole
/// boundary the session controller drives. Implemented by
/// `recplay_cpal::CpalHost`, and by a scripted mock in tests.
///
/// Callbacks fire on a thread the caller does not own and must not retain
/// borrows past a single invocation. The host guarantees invocations for
/// one stream are never concurrent with each other. Subsystem teardown is
/// ownership-based: dropping the host and its streams releases everything,
/// on success and failure paths alike.
pub trait StreamHost {
    type Device;
    type Stream;

    /// Default device for the given direction, or `None` when the
    /// environment has none.
    fn default_device(&self, direction: Direction) -> Option<Self::Device>;

    /// Human-readable device name for diagnostics.
    fn device_name(&self, device: &Self::Device) -> String;

    fn open_capture_stream(
        &self,
        device: &Self::Device,
        settings: &StreamSettings,
        callback: CaptureCallback,
    ) -> Result<Self::Stream, StreamError>;

    fn open_playback_stream(
        &self,
        device: &Self::Device,
        settings: &StreamSettings,
        callback: PlaybackCallback,
    ) -> Result<Self::Stream, StreamError>;

    fn start_stream(&self, stream: &Self::Stream) -> Result<(), StreamError>;

    /// Tri-state activity poll: `Ok(true)` still streaming, `Ok(false)`
    /// naturally finished, `Err` when the host reported a stream failure.
    fn poll_active(&self, stream: &Self::Stream) -> Result<bool, StreamError>;

    /// Stop and release a stream. Consumes the handle; it never outlives
    /// the stage it served.
    fn close_stream(&self, stream: Self::Stream) -> Result<(), StreamError>;

    /// Coarse suspension between activity polls.
    fn sleep(&self, duration: Duration);
}
