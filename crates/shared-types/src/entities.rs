//! # Core Domain Entities
//!
//! Chain-level types shared across the node.
//!
//! ## Clusters
//!
//! - **Chain**: `Hash`, `BlockHeader`
//! - **Validators**: `PublicKey`

use serde::{Deserialize, Serialize};

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte hash (block identifier).
pub type Hash = [u8; 32];

/// A 32-byte Ed25519 public key identifying a delegate.
pub type PublicKey = [u8; 32];

/// The subset of a block header the finality gadget reasons about.
///
/// Every field is claimed by the forging delegate and covered by its
/// signature, so the values are trusted to be *authentic* but not to be
/// *honest*; the finality gadget checks the latter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    /// Opaque block identifier.
    pub id: Hash,
    /// Block height in the chain. Always positive.
    pub height: u64,
    /// Highest height at which this delegate forged before this block.
    pub max_height_previously_forged: u64,
    /// Pre-voted watermark the delegate saw when forging this block.
    pub prevoted_confirmed_upto_height: u64,
    /// First round in which the delegate was eligible to forge.
    pub active_since_round: u64,
    /// The delegate who forged this block.
    pub delegate_public_key: PublicKey,
}

impl BlockHeader {
    /// Whether `other` was forged by the same delegate.
    pub fn same_delegate(&self, other: &BlockHeader) -> bool {
        self.delegate_public_key == other.delegate_public_key
    }
}
