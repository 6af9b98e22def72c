/// Lifecycle phase of one stage's hardware stream.
///
/// Phase transitions, driven once per stage by the session controller:
/// ```text
/// uninitialized → device-selected → stream-open → stream-active
///                                                      ↓
///                                   stream-closed ← stream-complete
/// ```
/// Any failure abandons the machine where it stands; resources are released
/// by ownership, not by further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePhase {
    Uninitialized,
    DeviceSelected,
    StreamOpen,
    StreamActive,
    StreamComplete,
    StreamClosed,
}

impl StagePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::StreamClosed)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::StreamActive)
    }
}
