//! # recplay-core
//!
//! Platform-agnostic core for fixed-duration record/replay: capture a set
//! number of seconds from an input device into memory, then play the same
//! buffer back out. Platform backends implement the `StreamHost` trait and
//! plug into the generic `LoopbackSession`.
//!
//! ## Architecture
//!
//! ```text
//! recplay-core (this crate)
//! ├── traits/       ← StreamHost, SessionObserver
//! ├── models/       ← StreamSettings, StreamError, StagePhase, Direction
//! ├── processing/   ← FrameBuffer, FrameCursor, capture/playback blocks
//! └── session/      ← LoopbackSession (generic lifecycle controller)
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::StreamSettings;
pub use models::direction::Direction;
pub use models::error::{StreamError, StreamOp};
pub use models::state::StagePhase;
pub use processing::frame_buffer::{FrameBuffer, FrameCursor};
pub use processing::stage::{capture_block, playback_block, BlockOutcome};
pub use session::loopback::LoopbackSession;
pub use traits::session_observer::SessionObserver;
pub use traits::stream_host::{CaptureCallback, PlaybackCallback, StreamHost};
