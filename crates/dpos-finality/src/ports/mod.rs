//! Ports module for the finality gadget

pub mod inbound;
pub mod outbound;

pub use inbound::FinalityApi;
pub use outbound::WatermarkSink;
