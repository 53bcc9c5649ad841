//! Structural header checks
//!
//! Run before anything touches engine state. Decoding already guarantees the
//! field types, so only the value ranges are left to check.

use crate::error::{FinalityError, FinalityResult};
use shared_types::BlockHeader;

pub fn validate_header(header: &BlockHeader) -> FinalityResult<()> {
    if header.height == 0 {
        return Err(invalid("height must be positive"));
    }
    if header.active_since_round == 0 {
        return Err(invalid("activeSinceRound must be positive"));
    }
    Ok(())
}

fn invalid(reason: &str) -> FinalityError {
    FinalityError::InvalidAttribute {
        reason: reason.to_string(),
    }
}
