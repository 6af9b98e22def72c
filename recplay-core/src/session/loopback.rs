//! Record-then-replay session controller.
//!
//! Drives the per-stage lifecycle state machine against a [`StreamHost`]:
//! select device, open stream, start, coarse-poll until the stream reports
//! itself finished, close. The capture stage runs to completion before the
//! playback stage opens; both share one frame buffer and cursor, which is
//! safe without further coordination because the stages are temporally
//! disjoint by construction.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use parking_lot::Mutex;

use crate::models::config::StreamSettings;
use crate::models::direction::Direction;
use crate::models::error::StreamError;
use crate::models::state::StagePhase;
use crate::processing::frame_buffer::{FrameBuffer, FrameCursor};
use crate::processing::stage;
use crate::traits::session_observer::SessionObserver;
use crate::traits::stream_host::{CaptureCallback, PlaybackCallback, StreamHost};

/// Interval between stream activity polls. Coarse by design; the
/// controlling thread sleeps here, it never spins.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shared state between the controlling thread and the active callback.
///
/// The lock is uncontended in practice: only one stage's callback is ever
/// live, and the controller does not touch the context while a stream is
/// active.
struct StageContext {
    buffer: FrameBuffer,
    cursor: FrameCursor,
}

/// Captures a fixed duration of audio into memory, then plays it back.
///
/// Owns the frame buffer and the currently open stream handle; callbacks
/// get borrowed access per invocation through the shared context. All
/// resources are released by ownership on every exit path, success or
/// failure, and no failure is retried.
pub struct LoopbackSession<H: StreamHost> {
    host: H,
    settings: StreamSettings,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl<H: StreamHost> LoopbackSession<H> {
    pub fn new(host: H, settings: StreamSettings) -> Self {
        Self {
            host,
            settings,
            observer: None,
        }
    }

    pub fn set_observer(&mut self, observer: Arc<dyn SessionObserver>) {
        self.observer = Some(observer);
    }

    pub fn settings(&self) -> &StreamSettings {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Run the full capture-then-playback cycle.
    ///
    /// Any failure skips the remaining stages and propagates; the buffer
    /// and any open stream are released on the way out.
    pub fn run(&mut self) -> Result<(), StreamError> {
        self.settings
            .validate()
            .map_err(StreamError::InvalidSettings)?;

        let total = self.settings.total_frames();
        let channels = self.settings.channels as usize;
        let buffer = FrameBuffer::allocate(total, channels)?;
        info!(
            "allocated frame buffer: {} frames, {} channels",
            total, channels
        );

        let shared = Arc::new(Mutex::new(StageContext {
            buffer,
            cursor: FrameCursor::new(total),
        }));

        self.run_capture(&shared)?;

        // Playback re-traverses the buffer from frame zero.
        shared.lock().cursor.reset();

        self.run_playback(&shared)?;
        Ok(())
    }

    fn run_capture(&self, shared: &Arc<Mutex<StageContext>>) -> Result<(), StreamError> {
        let device = self
            .host
            .default_device(Direction::Input)
            .ok_or(StreamError::NoDevice(Direction::Input))?;
        self.enter(Direction::Input, StagePhase::DeviceSelected);
        debug!("capture device: {}", self.host.device_name(&device));

        let ctx = Arc::clone(shared);
        let frames_per_block = self.settings.frames_per_block as usize;
        let channels = self.settings.channels as usize;
        let callback: CaptureCallback = Box::new(move |input| {
            let mut guard = ctx.lock();
            let ctx = &mut *guard;
            let frames = input.map_or(frames_per_block, |samples| samples.len() / channels);
            stage::capture_block(&mut ctx.buffer, &mut ctx.cursor, input, frames)
        });

        let stream = self
            .host
            .open_capture_stream(&device, &self.settings, callback)?;
        self.enter(Direction::Input, StagePhase::StreamOpen);

        self.drive_stream(Direction::Input, stream)
    }

    fn run_playback(&self, shared: &Arc<Mutex<StageContext>>) -> Result<(), StreamError> {
        let device = self
            .host
            .default_device(Direction::Output)
            .ok_or(StreamError::NoDevice(Direction::Output))?;
        self.enter(Direction::Output, StagePhase::DeviceSelected);
        debug!("playback device: {}", self.host.device_name(&device));

        let ctx = Arc::clone(shared);
        let callback: PlaybackCallback = Box::new(move |output| {
            let mut guard = ctx.lock();
            let ctx = &mut *guard;
            stage::playback_block(&ctx.buffer, &mut ctx.cursor, output)
        });

        let stream = self
            .host
            .open_playback_stream(&device, &self.settings, callback)?;
        self.enter(Direction::Output, StagePhase::StreamOpen);

        self.drive_stream(Direction::Output, stream)
    }

    /// Start a stream, wait for its natural completion, close it.
    ///
    /// Completion is driven purely by frame-count exhaustion inside the
    /// callback; there is no cancellation and no timeout. A failing start
    /// or poll drops the stream handle on propagation.
    fn drive_stream(&self, direction: Direction, stream: H::Stream) -> Result<(), StreamError> {
        self.host.start_stream(&stream)?;
        self.enter(direction, StagePhase::StreamActive);

        while self.host.poll_active(&stream)? {
            self.host.sleep(POLL_INTERVAL);
        }
        self.enter(direction, StagePhase::StreamComplete);

        self.host.close_stream(stream)?;
        self.enter(direction, StagePhase::StreamClosed);
        Ok(())
    }

    fn enter(&self, direction: Direction, phase: StagePhase) {
        debug!("{} stage: {:?}", direction, phase);
        if let Some(ref observer) = self.observer {
            observer.on_phase_changed(direction, phase);
        }
    }
}
