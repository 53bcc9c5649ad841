//! Watermark sink adapters

use crate::events::WatermarkEvent;
use crate::ports::outbound::WatermarkSink;
use parking_lot::Mutex;
use tracing::info;

/// Logs every watermark change.
#[derive(Debug, Default)]
pub struct TracingWatermarkSink;

impl WatermarkSink for TracingWatermarkSink {
    fn on_watermark_changed(&self, event: WatermarkEvent) {
        match event {
            WatermarkEvent::FinalizedHeightChanged { previous, current } => {
                info!(previous, current, "Finalized height changed");
            }
            WatermarkEvent::PrevotedConfirmedHeightChanged { previous, current } => {
                info!(previous, current, "Prevoted confirmed height changed");
            }
        }
    }
}

/// Buffers events for a consumer that polls.
#[derive(Debug, Default)]
pub struct BufferedWatermarkSink {
    events: Mutex<Vec<WatermarkEvent>>,
}

impl BufferedWatermarkSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take and clear buffered events
    pub fn drain(&self) -> Vec<WatermarkEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl WatermarkSink for BufferedWatermarkSink {
    fn on_watermark_changed(&self, event: WatermarkEvent) {
        self.events.lock().push(event);
    }
}
