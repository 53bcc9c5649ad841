//! # Finality Metrics
//!
//! Prometheus metrics for the finality gadget.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! dpos-finality = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `finality_headers_processed_total` - Counter of headers ingested
//! - `finality_headers_rejected_total` - Counter of rejected headers (by kind)
//! - `finality_recomputes_total` - Counter of full tally replays
//! - `finality_finalized_height` - Gauge of the finalized height
//! - `finality_prevoted_confirmed_height` - Gauge of the pre-voted height
//! - `finality_header_window_length` - Gauge of headers held in the window

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_counter_vec, register_gauge, register_int_counter, CounterVec, Gauge, IntCounter,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total headers ingested
    pub static ref HEADERS_PROCESSED: IntCounter = register_int_counter!(
        "finality_headers_processed_total",
        "Total number of block headers ingested"
    )
    .expect("Failed to create HEADERS_PROCESSED metric");

    /// Total headers rejected, labeled by error kind
    pub static ref HEADERS_REJECTED: CounterVec = register_counter_vec!(
        "finality_headers_rejected_total",
        "Total number of block headers rejected",
        &["kind"]
    )
    .expect("Failed to create HEADERS_REJECTED metric");

    /// Total tally replays
    pub static ref RECOMPUTES: IntCounter = register_int_counter!(
        "finality_recomputes_total",
        "Total number of tally recomputations"
    )
    .expect("Failed to create RECOMPUTES metric");

    /// Current finalized height
    pub static ref FINALIZED_HEIGHT: Gauge = register_gauge!(
        "finality_finalized_height",
        "Highest height that cleared the pre-commit threshold"
    )
    .expect("Failed to create FINALIZED_HEIGHT metric");

    /// Current pre-voted confirmed height
    pub static ref PREVOTED_CONFIRMED_HEIGHT: Gauge = register_gauge!(
        "finality_prevoted_confirmed_height",
        "Highest height that cleared the pre-vote threshold"
    )
    .expect("Failed to create PREVOTED_CONFIRMED_HEIGHT metric");

    /// Headers currently held in the window
    pub static ref WINDOW_LENGTH: Gauge = register_gauge!(
        "finality_header_window_length",
        "Number of headers in the header window"
    )
    .expect("Failed to create WINDOW_LENGTH metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

#[cfg(feature = "metrics")]
pub fn record_header_processed() {
    HEADERS_PROCESSED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_header_rejected(kind: &str) {
    HEADERS_REJECTED.with_label_values(&[kind]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_recompute() {
    RECOMPUTES.inc();
}

#[cfg(feature = "metrics")]
pub fn set_watermarks(finalized: u64, prevoted_confirmed: u64) {
    FINALIZED_HEIGHT.set(finalized as f64);
    PREVOTED_CONFIRMED_HEIGHT.set(prevoted_confirmed as f64);
}

#[cfg(feature = "metrics")]
pub fn set_window_length(len: usize) {
    WINDOW_LENGTH.set(len as f64);
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_header_processed() {}

#[cfg(not(feature = "metrics"))]
pub fn record_header_rejected(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_recompute() {}

#[cfg(not(feature = "metrics"))]
pub fn set_watermarks(_finalized: u64, _prevoted_confirmed: u64) {}

#[cfg(not(feature = "metrics"))]
pub fn set_window_length(_len: usize) {}
