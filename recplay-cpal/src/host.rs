//! cpal-backed [`StreamHost`] implementation.
//!
//! Binds the generic session controller to the platform's default audio
//! host: default input/output device queries, fixed-format i16 stream
//! construction, and completion/error signalling out of the real-time
//! callback via atomics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, SampleFormat, SampleRate, StreamConfig};
use log::{debug, error};
use parking_lot::Mutex;

use recplay_core::models::config::StreamSettings;
use recplay_core::models::direction::Direction;
use recplay_core::models::error::{StreamError, StreamOp};
use recplay_core::processing::stage::BlockOutcome;
use recplay_core::traits::stream_host::{CaptureCallback, PlaybackCallback, StreamHost};

/// Stable numeric codes reported for host-level failures.
///
/// cpal surfaces typed errors rather than numeric ones; this table gives
/// each failure class a fixed code so exit statuses stay meaningful.
pub mod code {
    pub const DEVICE_UNAVAILABLE: i32 = 10;
    pub const FORMAT_UNSUPPORTED: i32 = 11;
    pub const INVALID_ARGUMENT: i32 = 12;
    pub const BACKEND: i32 = 13;
    pub const STREAM_RUNTIME: i32 = 14;
}

/// An open cpal stream plus the flags its real-time callback reports
/// through.
pub struct CpalStream {
    stream: cpal::Stream,
    done: Arc<AtomicBool>,
    error: Arc<Mutex<Option<StreamError>>>,
}

/// Audio host backed by cpal's default platform host.
pub struct CpalHost {
    host: cpal::Host,
}

impl CpalHost {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }
}

impl Default for CpalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamHost for CpalHost {
    type Device = Device;
    type Stream = CpalStream;

    fn default_device(&self, direction: Direction) -> Option<Device> {
        match direction {
            Direction::Input => self.host.default_input_device(),
            Direction::Output => self.host.default_output_device(),
        }
    }

    fn device_name(&self, device: &Device) -> String {
        device.name().unwrap_or_else(|_| "unknown".to_string())
    }

    fn open_capture_stream(
        &self,
        device: &Device,
        settings: &StreamSettings,
        mut callback: CaptureCallback,
    ) -> Result<CpalStream, StreamError> {
        let config = stream_config(device, settings, Direction::Input)?;
        debug!("capture config: {:?}", config);

        let done = Arc::new(AtomicBool::new(false));
        let error = Arc::new(Mutex::new(None));

        let done_flag = Arc::clone(&done);
        let data_callback = move |data: &[i16], _: &cpal::InputCallbackInfo| {
            // The host keeps invoking after completion; those calls are
            // no-ops until the controller closes the stream.
            if done_flag.load(Ordering::Acquire) {
                return;
            }
            if callback(Some(data)) == BlockOutcome::Complete {
                done_flag.store(true, Ordering::Release);
            }
        };

        let stream = device
            .build_input_stream(
                &config,
                data_callback,
                error_callback(Arc::clone(&error)),
                None,
            )
            .map_err(build_stream_error)?;

        Ok(CpalStream {
            stream,
            done,
            error,
        })
    }

    fn open_playback_stream(
        &self,
        device: &Device,
        settings: &StreamSettings,
        mut callback: PlaybackCallback,
    ) -> Result<CpalStream, StreamError> {
        let config = stream_config(device, settings, Direction::Output)?;
        debug!("playback config: {:?}", config);

        let done = Arc::new(AtomicBool::new(false));
        let error = Arc::new(Mutex::new(None));

        let done_flag = Arc::clone(&done);
        let data_callback = move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
            if done_flag.load(Ordering::Acquire) {
                data.fill(0);
                return;
            }
            if callback(data) == BlockOutcome::Complete {
                done_flag.store(true, Ordering::Release);
            }
        };

        let stream = device
            .build_output_stream(
                &config,
                data_callback,
                error_callback(Arc::clone(&error)),
                None,
            )
            .map_err(build_stream_error)?;

        Ok(CpalStream {
            stream,
            done,
            error,
        })
    }

    fn start_stream(&self, stream: &CpalStream) -> Result<(), StreamError> {
        stream.stream.play().map_err(|e| host_error(
            StreamOp::StartStream,
            match e {
                cpal::PlayStreamError::DeviceNotAvailable => code::DEVICE_UNAVAILABLE,
                cpal::PlayStreamError::BackendSpecific { .. } => code::BACKEND,
            },
            e,
        ))
    }

    fn poll_active(&self, stream: &CpalStream) -> Result<bool, StreamError> {
        if let Some(err) = stream.error.lock().take() {
            return Err(err);
        }
        Ok(!stream.done.load(Ordering::Acquire))
    }

    fn close_stream(&self, stream: CpalStream) -> Result<(), StreamError> {
        stream.stream.pause().map_err(|e| host_error(
            StreamOp::CloseStream,
            match e {
                cpal::PauseStreamError::DeviceNotAvailable => code::DEVICE_UNAVAILABLE,
                cpal::PauseStreamError::BackendSpecific { .. } => code::BACKEND,
            },
            e,
        ))?;
        drop(stream);
        Ok(())
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Pick a stream config honoring the fixed settings: i16 samples, the
/// configured channel count and sample rate, and a fixed block size.
///
/// The settings are not negotiable; a device that cannot satisfy them is a
/// host error, not a fallback path.
fn stream_config(
    device: &Device,
    settings: &StreamSettings,
    direction: Direction,
) -> Result<StreamConfig, StreamError> {
    let ranges: Vec<cpal::SupportedStreamConfigRange> = match direction {
        Direction::Input => device
            .supported_input_configs()
            .map_err(configs_error)?
            .collect(),
        Direction::Output => device
            .supported_output_configs()
            .map_err(configs_error)?
            .collect(),
    };

    let rate = SampleRate(settings.sample_rate);
    let range = ranges
        .into_iter()
        .find(|r| {
            r.channels() == settings.channels
                && r.sample_format() == SampleFormat::I16
                && r.min_sample_rate() <= rate
                && r.max_sample_rate() >= rate
        })
        .ok_or_else(|| StreamError::Host {
            op: StreamOp::QueryConfig,
            code: code::FORMAT_UNSUPPORTED,
            text: format!(
                "{} device supports no i16 config at {} Hz with {} channels",
                direction, settings.sample_rate, settings.channels
            ),
        })?;

    let mut config = range.with_sample_rate(rate).config();
    config.buffer_size = BufferSize::Fixed(settings.frames_per_block);
    Ok(config)
}

/// Stream error callback: records the failure for the controller's next
/// activity poll to surface.
fn error_callback(
    slot: Arc<Mutex<Option<StreamError>>>,
) -> impl FnMut(cpal::StreamError) + Send + 'static {
    move |err| {
        error!("stream error: {}", err);
        let code = match err {
            cpal::StreamError::DeviceNotAvailable => code::DEVICE_UNAVAILABLE,
            cpal::StreamError::BackendSpecific { .. } => code::STREAM_RUNTIME,
        };
        *slot.lock() = Some(host_error(StreamOp::PollStream, code, err));
    }
}

fn build_stream_error(err: cpal::BuildStreamError) -> StreamError {
    let code = match err {
        cpal::BuildStreamError::DeviceNotAvailable => code::DEVICE_UNAVAILABLE,
        cpal::BuildStreamError::StreamConfigNotSupported => code::FORMAT_UNSUPPORTED,
        cpal::BuildStreamError::InvalidArgument => code::INVALID_ARGUMENT,
        _ => code::BACKEND,
    };
    host_error(StreamOp::OpenStream, code, err)
}

fn configs_error(err: cpal::SupportedStreamConfigsError) -> StreamError {
    let code = match err {
        cpal::SupportedStreamConfigsError::DeviceNotAvailable => code::DEVICE_UNAVAILABLE,
        cpal::SupportedStreamConfigsError::InvalidArgument => code::INVALID_ARGUMENT,
        cpal::SupportedStreamConfigsError::BackendSpecific { .. } => code::BACKEND,
    };
    host_error(StreamOp::QueryConfig, code, err)
}

fn host_error(op: StreamOp, code: i32, err: impl std::fmt::Display) -> StreamError {
    StreamError::Host {
        op,
        code,
        text: err.to_string(),
    }
}
