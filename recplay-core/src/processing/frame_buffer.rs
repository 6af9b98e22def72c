use crate::models::error::StreamError;

/// Fixed-capacity interleaved sample store for one record/replay run.
///
/// Holds exactly `capacity * channels` signed 16-bit samples, zero-filled
/// at allocation. Allocated once before any stream opens and released only
/// after both stages have closed; the active stage borrows it per callback
/// invocation.
#[derive(Debug)]
pub struct FrameBuffer {
    samples: Vec<i16>,
    capacity: usize,
    channels: usize,
}

impl FrameBuffer {
    /// Allocate a zero-filled buffer for `capacity` frames.
    ///
    /// Fails with `StreamError::Allocation` when the storage cannot be
    /// obtained; the caller must abort before touching any hardware.
    pub fn allocate(capacity: usize, channels: usize) -> Result<Self, StreamError> {
        let len = capacity
            .checked_mul(channels)
            .ok_or(StreamError::Allocation { frames: capacity })?;

        let mut samples = Vec::new();
        samples
            .try_reserve_exact(len)
            .map_err(|_| StreamError::Allocation { frames: capacity })?;
        samples.resize(len, 0);

        Ok(Self {
            samples,
            capacity,
            channels,
        })
    }

    /// Buffer capacity in frames.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Interleaved channel count.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Interleaved samples for `count` frames starting at frame `index`.
    ///
    /// Bounds are checked once here, per callback invocation, not per
    /// sample; the cursor guarantees `index + count <= capacity`.
    pub fn frames(&self, index: usize, count: usize) -> &[i16] {
        &self.samples[index * self.channels..(index + count) * self.channels]
    }

    /// Mutable counterpart of [`frames`](Self::frames).
    pub fn frames_mut(&mut self, index: usize, count: usize) -> &mut [i16] {
        &mut self.samples[index * self.channels..(index + count) * self.channels]
    }

    /// The full interleaved sample storage.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }
}

/// Position, in frames, within a [`FrameBuffer`] traversal.
///
/// One stage at a time owns the cursor: the index only increases, advanced
/// solely by the active callback, and never exceeds the target. Reset to
/// zero between the capture and playback stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCursor {
    index: usize,
    target: usize,
}

impl FrameCursor {
    pub fn new(target: usize) -> Self {
        Self { index: 0, target }
    }

    /// Current frame index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Frames left before the target is reached.
    pub fn remaining(&self) -> usize {
        self.target - self.index
    }

    /// Advance past `frames` processed frames. Never moves past the target.
    pub fn advance(&mut self, frames: usize) {
        debug_assert!(frames <= self.remaining());
        self.index += frames.min(self.remaining());
    }

    /// Rewind to frame zero for the next stage.
    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn is_exhausted(&self) -> bool {
        self.index == self.target
    }
}
