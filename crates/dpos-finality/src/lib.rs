//! # dpos-finality
//!
//! Byzantine fault tolerant finality gadget for a delegated proof-of-stake
//! chain.
//!
//! ## Overview
//!
//! This crate provides:
//! - **Header Window**: the last `5 × delegates` headers, contiguous by height
//! - **Implied Votes**: every header pre-votes and pre-commits on behalf of
//!   its delegate; nothing is gossiped
//! - **2/3 Threshold**: `ceil(2n / 3)` for both pre-votes and pre-commits
//! - **Fork Choice Rules**: equivocation, disjoint history and watermark
//!   regression are detected per header
//!
//! ## Architecture
//!
//! ```text
//! Block import ──BlockHeader──→ FinalityEngine::add_header
//!                                   │
//!                                   ├── verify_header (fork choice rules)
//!                                   ├── HeaderWindow::add
//!                                   ├── tallies (pre-votes / pre-commits)
//!                                   └── watermarks ──WatermarkEvent──→ WatermarkSink
//! ```
//!
//! ## Error Kinds
//!
//! | Error | Caller action |
//! |-------|---------------|
//! | InvalidAttribute | reject block |
//! | ForkChoiceRule | reject block, may penalize delegate |
//! | ChainDisjoint | tolerated during sync, reject otherwise |
//! | LowerChainBranch | reject block |
//!
//! ## Example
//!
//! ```rust,ignore
//! use dpos_finality::{FinalityConfig, FinalityEngine, HeaderOutcome};
//!
//! let mut engine = FinalityEngine::new(FinalityConfig::new(101, stored_finalized))?;
//!
//! match engine.add_header(header) {
//!     Ok(HeaderOutcome::ChainDisjoint) if !syncing => reject(block),
//!     Ok(_) => {}
//!     Err(err) => reject(block),
//! }
//!
//! let finalized = engine.finalized_height();
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod types;

pub use adapters::{BufferedWatermarkSink, TracingWatermarkSink};
pub use domain::{DelegateState, FinalityEngine, HeaderWindow};
pub use error::{FinalityError, FinalityResult, WindowError};
pub use events::WatermarkEvent;
pub use ports::{FinalityApi, WatermarkSink};
pub use service::FinalityService;
pub use types::{FinalityConfig, HeaderOutcome, MAX_ACTIVE_DELEGATES};
