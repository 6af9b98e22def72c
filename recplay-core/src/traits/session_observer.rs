use crate::models::direction::Direction;
use crate::models::state::StagePhase;

/// Observer for session lifecycle notifications.
///
/// Called from the controlling thread, never from the real-time callback.
/// The CLI uses this for its console messages; headless embedders can skip
/// installing one.
pub trait SessionObserver: Send + Sync {
    /// A stage's stream moved to a new phase.
    fn on_phase_changed(&self, direction: Direction, phase: StagePhase);
}
