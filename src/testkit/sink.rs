//! Recording notification sink.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{SaleEvent, SubscriberId};
use crate::error::SinkError;
use crate::port::NotificationSink;

/// Sink that records successful deliveries and can be switched into a
/// failing mode.
#[derive(Default)]
pub struct RecordingSink {
    deliveries: Mutex<Vec<(SaleEvent, SubscriberId)>>,
    failing: AtomicBool,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every delivery from now on fail until cleared.
    pub fn fail_next_deliveries(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn clear_failure(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }

    /// Deliveries that succeeded, in order.
    #[must_use]
    pub fn deliveries(&self) -> Vec<(SaleEvent, SubscriberId)> {
        self.deliveries.lock().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(
        &self,
        event: &SaleEvent,
        subscriber: &SubscriberId,
    ) -> Result<(), SinkError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::new("recording", "scripted failure"));
        }
        self.deliveries
            .lock()
            .push((event.clone(), subscriber.clone()));
        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        "recording"
    }
}
