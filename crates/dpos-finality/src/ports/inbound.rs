//! Driving Ports (API - Inbound)

use crate::error::FinalityResult;
use crate::types::HeaderOutcome;
use shared_types::BlockHeader;

/// Primary Finality API
///
/// Driven by the block-import pipeline. Headers must arrive in the order the
/// pipeline applies blocks; reverts go through `revert_to`.
pub trait FinalityApi: Send + Sync {
    /// Ingest a decoded, signature-verified header.
    ///
    /// # Returns
    /// * How the header was admitted, or the reason it must be rejected
    fn add_header(&self, header: BlockHeader) -> FinalityResult<HeaderOutcome>;

    /// Drop headers above `height` and re-derive tallies.
    fn revert_to(&self, height: u64) -> Vec<BlockHeader>;

    /// Re-derive tallies and watermarks from the current window.
    fn recompute(&self);

    fn finalized_height(&self) -> u64;

    fn prevoted_confirmed_height(&self) -> u64;

    /// Lowest height in the header window
    fn min_height(&self) -> FinalityResult<u64>;

    /// Highest height in the header window
    fn max_height(&self) -> FinalityResult<u64>;

    /// Check the delegate's claimed previous block against the window
    fn is_bft_protocol_compliant(&self, header: &BlockHeader) -> bool;
}
