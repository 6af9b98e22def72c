/// Fixed stream parameters for a record/replay run.
///
/// Constructed once at startup and threaded through both stages. There is
/// no runtime negotiation: the host either honors these values or the run
/// fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
    /// Sample rate in Hz.
    pub sample_rate: u32,

    /// Frames the host delivers to (or requests from) a callback per
    /// invocation.
    pub frames_per_block: u32,

    /// Interleaved channel count.
    pub channels: u16,

    /// Capture duration in whole seconds.
    pub duration_secs: u32,
}

impl StreamSettings {
    /// Total frames captured and played back in one run.
    pub fn total_frames(&self) -> usize {
        self.sample_rate as usize * self.duration_secs as usize
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if self.frames_per_block == 0 {
            return Err("frames per block must be positive".into());
        }
        if ![1, 2].contains(&self.channels) {
            return Err(format!("unsupported channel count: {}", self.channels));
        }
        if self.duration_secs == 0 {
            return Err("duration must be positive".into());
        }
        Ok(())
    }
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            frames_per_block: 512,
            channels: 2,
            duration_secs: 5,
        }
    }
}
