//! # recplay-cpal
//!
//! cpal backend for recplay.
//!
//! Provides `CpalHost`, a `StreamHost` implementation over the platform's
//! default audio host: default input/output device selection and
//! fixed-format (i16, fixed rate, fixed block size) capture and playback
//! streams.
//!
//! ## Usage
//! ```ignore
//! use recplay_core::{LoopbackSession, StreamSettings};
//! use recplay_cpal::CpalHost;
//!
//! let mut session = LoopbackSession::new(CpalHost::new(), StreamSettings::default());
//! session.run()?;
//! ```

pub mod host;

pub use host::{CpalHost, CpalStream};
