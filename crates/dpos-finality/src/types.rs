use crate::error::{FinalityError, FinalityResult};
use serde::{Deserialize, Serialize};

/// Largest delegate set the engine accepts
pub const MAX_ACTIVE_DELEGATES: u32 = u16::MAX as u32;

/// Finality configuration
///
/// Both values come from genesis parameters or persisted node state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinalityConfig {
    /// Size of the active delegate set (forging slots per round)
    pub active_delegates: u32,
    /// Trusted finalized height to start from
    pub finalized_height: u64,
}

impl Default for FinalityConfig {
    fn default() -> Self {
        Self {
            active_delegates: 101,
            finalized_height: 0,
        }
    }
}

impl FinalityConfig {
    pub fn new(active_delegates: u32, finalized_height: u64) -> Self {
        Self {
            active_delegates,
            finalized_height,
        }
    }

    pub fn validate(&self) -> FinalityResult<()> {
        if self.active_delegates == 0 {
            return Err(FinalityError::InvalidConfig {
                reason: "active_delegates must be greater than zero".to_string(),
            });
        }
        if self.active_delegates > MAX_ACTIVE_DELEGATES {
            return Err(FinalityError::InvalidConfig {
                reason: format!(
                    "active_delegates {} exceeds maximum {}",
                    self.active_delegates, MAX_ACTIVE_DELEGATES
                ),
            });
        }
        Ok(())
    }

    /// Votes needed for a pre-vote or pre-commit: ceil(2n / 3)
    pub fn threshold(&self) -> u32 {
        ((u64::from(self.active_delegates) * 2 + 2) / 3) as u32
    }

    /// Maximum header age (in heights) that fork choice rules look at
    pub fn processing_threshold(&self) -> u64 {
        (u64::from(self.active_delegates) * 3).saturating_sub(1)
    }

    /// Header window capacity
    pub fn max_headers(&self) -> usize {
        self.active_delegates as usize * 5
    }
}

/// How a header made it into the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderOutcome {
    /// Window too short to judge fork choice rules; header taken as is
    Unchecked,
    /// All fork choice rules passed
    Verified,
    /// Delegate's history does not yet overlap the window; header was still
    /// ingested. Callers outside of sync should treat this as a rejection.
    ChainDisjoint,
}
