//! Finality Service - shareable handle around the engine
//!
//! The engine itself is a single-writer state machine. The service gives the
//! block-import pipeline exclusive write access for the duration of each
//! call, lets other components read watermark snapshots, and forwards
//! watermark changes to the outbound sink once the lock is released.

use crate::domain::FinalityEngine;
use crate::error::FinalityResult;
use crate::events::WatermarkEvent;
use crate::ports::inbound::FinalityApi;
use crate::ports::outbound::WatermarkSink;
use crate::types::{FinalityConfig, HeaderOutcome};
use parking_lot::RwLock;
use shared_types::BlockHeader;
use std::sync::Arc;

pub struct FinalityService<S>
where
    S: WatermarkSink,
{
    engine: Arc<RwLock<FinalityEngine>>,
    sink: Arc<S>,
}

impl<S> Clone for FinalityService<S>
where
    S: WatermarkSink,
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<S> FinalityService<S>
where
    S: WatermarkSink,
{
    /// Create new finality service
    pub fn new(config: FinalityConfig, sink: Arc<S>) -> FinalityResult<Self> {
        Ok(Self::from_engine(FinalityEngine::new(config)?, sink))
    }

    pub fn from_engine(engine: FinalityEngine, sink: Arc<S>) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            sink,
        }
    }

    /// Run `f` against a read-locked snapshot of the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&FinalityEngine) -> R) -> R {
        f(&self.engine.read())
    }

    /// Run `f` with exclusive access, then publish any watermark changes.
    ///
    /// Use for direct window surgery; finish with `recompute`.
    pub fn with_engine_mut<R>(&self, f: impl FnOnce(&mut FinalityEngine) -> R) -> R {
        let (result, events) = {
            let mut engine = self.engine.write();
            let result = f(&mut engine);
            (result, engine.take_events())
        };
        self.publish(events);
        result
    }

    fn publish(&self, events: Vec<WatermarkEvent>) {
        for event in events {
            self.sink.on_watermark_changed(event);
        }
    }
}

impl<S> FinalityApi for FinalityService<S>
where
    S: WatermarkSink + 'static,
{
    fn add_header(&self, header: BlockHeader) -> FinalityResult<HeaderOutcome> {
        self.with_engine_mut(|engine| engine.add_header(header))
    }

    fn revert_to(&self, height: u64) -> Vec<BlockHeader> {
        self.with_engine_mut(|engine| engine.revert_to(height))
    }

    fn recompute(&self) {
        self.with_engine_mut(FinalityEngine::recompute)
    }

    fn finalized_height(&self) -> u64 {
        self.engine.read().finalized_height()
    }

    fn prevoted_confirmed_height(&self) -> u64 {
        self.engine.read().prevoted_confirmed_height()
    }

    fn min_height(&self) -> FinalityResult<u64> {
        self.engine.read().min_height()
    }

    fn max_height(&self) -> FinalityResult<u64> {
        self.engine.read().max_height()
    }

    fn is_bft_protocol_compliant(&self, header: &BlockHeader) -> bool {
        self.engine.read().is_bft_protocol_compliant(header)
    }
}
