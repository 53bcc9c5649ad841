//! Outgoing events for the finality gadget

use serde::{Deserialize, Serialize};

/// Emitted whenever one of the two watermarks moves.
///
/// `current` is normally above `previous`; it can only be lower after a
/// `recompute` re-derived the watermarks from a truncated window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatermarkEvent {
    FinalizedHeightChanged { previous: u64, current: u64 },
    PrevotedConfirmedHeightChanged { previous: u64, current: u64 },
}

impl WatermarkEvent {
    pub fn current(&self) -> u64 {
        match self {
            Self::FinalizedHeightChanged { current, .. } => *current,
            Self::PrevotedConfirmedHeightChanged { current, .. } => *current,
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::FinalizedHeightChanged { .. })
    }
}
