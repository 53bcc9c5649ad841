//! Domain module for the finality gadget
//!
//! ## Core Modules
//! - window: bounded, height-contiguous header buffer
//! - tally: sparse pre-vote / pre-commit counts and per-delegate progress
//! - validation: structural header checks
//! - engine: fork choice rules and watermark computation

pub mod engine;
pub mod tally;
pub mod validation;
pub mod window;

pub use engine::FinalityEngine;
pub use tally::{DelegateState, HeightTallies};
pub use validation::validate_header;
pub use window::HeaderWindow;
