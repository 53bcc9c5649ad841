//! Events module for the finality gadget

pub mod outgoing;

pub use outgoing::WatermarkEvent;
