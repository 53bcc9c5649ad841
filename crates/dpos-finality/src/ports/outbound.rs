//! Driven Ports (SPI - Outbound Dependencies)

use crate::events::WatermarkEvent;

/// Receiver of watermark changes.
///
/// Typically block storage (to mark blocks final) or the fork choice
/// component. Called after the engine lock has been released.
pub trait WatermarkSink: Send + Sync {
    fn on_watermark_changed(&self, event: WatermarkEvent);
}
