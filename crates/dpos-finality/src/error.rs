//! Error types for the finality gadget
//!
//! Four kinds describe byzantine input: `InvalidAttribute`, `ForkChoiceRule`,
//! `ChainDisjoint` and `LowerChainBranch`. `Window` is a caller bug (a header
//! handed over out of chain order) and is kept apart from those four.

use shared_types::PublicKey;
use thiserror::Error;

/// Header window contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// Header height does not extend either end of the window
    #[error("Invalid header height {height}: window spans {first}..={last}")]
    InvalidHeight { height: u64, first: u64, last: u64 },
}

/// Finality gadget errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinalityError {
    /// Malformed header, or a pre-voted watermark that disagrees with ours
    #[error("Invalid header attribute: {reason}")]
    InvalidAttribute { reason: String },

    /// Delegate forged again at or below a height it already forged at
    #[error("Fork choice rule violated by delegate {delegate:?}: height {height} does not extend prior header at {prior_height}")]
    ForkChoiceRule {
        delegate: PublicKey,
        height: u64,
        prior_height: u64,
    },

    /// Delegate's claimed history does not include a block we know it forged
    #[error("Chain disjoint for delegate {delegate:?}: prior header at {prior_height}, claimed max previously forged {claimed}")]
    ChainDisjoint {
        delegate: PublicKey,
        prior_height: u64,
        claimed: u64,
    },

    /// Delegate regressed its own reported pre-voted watermark
    #[error("Lower chain branch from delegate {delegate:?}: prevoted height {claimed} below previously reported {prior}")]
    LowerChainBranch {
        delegate: PublicKey,
        prior: u64,
        claimed: u64,
    },

    /// Header window contract violation
    #[error("Header window contract violated: {0}")]
    Window(#[from] WindowError),

    /// Accessor called on an empty header window
    #[error("Header window is empty")]
    EmptyWindow,

    /// Engine configuration rejected
    #[error("Invalid finality configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl FinalityError {
    /// Only a disjoint chain may be tolerated by the import pipeline.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ChainDisjoint { .. })
    }

    /// Programming errors in the caller rather than byzantine input.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Window(_) | Self::EmptyWindow | Self::InvalidConfig { .. })
    }

    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAttribute { .. } => "invalid_attribute",
            Self::ForkChoiceRule { .. } => "fork_choice_rule",
            Self::ChainDisjoint { .. } => "chain_disjoint",
            Self::LowerChainBranch { .. } => "lower_chain_branch",
            Self::Window(_) => "window_contract",
            Self::EmptyWindow => "empty_window",
            Self::InvalidConfig { .. } => "invalid_config",
        }
    }
}

/// Result type for finality operations
pub type FinalityResult<T> = Result<T, FinalityError>;
