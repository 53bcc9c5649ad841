//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of the outbound ports.

mod watermark_sink;

pub use watermark_sink::{BufferedWatermarkSink, TracingWatermarkSink};
