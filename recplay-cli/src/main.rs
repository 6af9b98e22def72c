//! Record five seconds from the default microphone, then play it back.
//!
//! No flags, no config files: sample rate, block size, channel count, and
//! duration are fixed in `StreamSettings::default()`. Exit status is 0 on
//! success, otherwise the failure's numeric code.

use std::process::ExitCode;
use std::sync::Arc;

use log::info;

use recplay_core::{Direction, LoopbackSession, SessionObserver, StagePhase, StreamSettings};
use recplay_cpal::CpalHost;

/// Console progress messages, driven off the session's phase transitions.
struct ConsoleObserver {
    duration_secs: u32,
}

impl SessionObserver for ConsoleObserver {
    fn on_phase_changed(&self, direction: Direction, phase: StagePhase) {
        match (direction, phase) {
            (Direction::Input, StagePhase::StreamActive) => {
                println!("Recording for {} seconds...", self.duration_secs);
            }
            (Direction::Input, StagePhase::StreamClosed) => {
                println!("Recording complete. Now playing back...");
            }
            (Direction::Output, StagePhase::StreamClosed) => {
                println!("Playback complete.");
            }
            _ => {}
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut session = LoopbackSession::new(CpalHost::new(), StreamSettings::default());
    session.set_observer(Arc::new(ConsoleObserver {
        duration_secs: session.settings().duration_secs,
    }));

    match session.run() {
        Ok(()) => {
            info!("run finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            // Exit codes are i32-shaped; the process status only keeps the
            // low byte, so clamp into the conventional range.
            ExitCode::from(err.exit_code().clamp(1, 255) as u8)
        }
    }
}
