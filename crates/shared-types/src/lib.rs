//! # Shared Types Crate
//!
//! Chain entities exchanged between the block-import pipeline and the
//! finality gadget.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the header shape the pipeline produces is the
//!   one the finality gadget consumes; there is no second definition.
//! - **Pre-verified Input**: values of these types are decoded and signature
//!   checked before they are built. Nothing here performs cryptography.

pub mod entities;

pub use entities::*;
