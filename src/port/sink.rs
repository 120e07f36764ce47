//! Notification sink port.
//!
//! The chat-platform adapter (embeds, channels) lives outside this crate
//! and implements [`NotificationSink`]. Delivery is attempted exactly once
//! per admitted event per subscriber; a failed delivery is surfaced in the
//! cycle report but never re-queued, and never reverses dedup admission.

use async_trait::async_trait;
use tracing::info;

use crate::domain::{SaleEvent, SubscriberId};
use crate::error::SinkError;

/// Receives admitted sale events, one call per tracking subscriber.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, event: &SaleEvent, subscriber: &SubscriberId)
        -> Result<(), SinkError>;

    fn sink_name(&self) -> &'static str;
}

/// Sink that logs deliveries via `tracing`. Always registered in the
/// shipped binary; doubles as the reference implementation.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(
        &self,
        event: &SaleEvent,
        subscriber: &SubscriberId,
    ) -> Result<(), SinkError> {
        info!(
            collection = %event.collection,
            sale_id = %event.sale_id,
            subscriber = %subscriber,
            price = ?event.estimated_price,
            volume_delta = %event.metrics.volume_delta,
            sales_count_delta = event.metrics.sales_count_delta,
            "Sale notification"
        );
        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        "log"
    }
}

/// Sink that drops everything. Useful for dry runs and tests.
pub struct NullSink;

#[async_trait]
impl NotificationSink for NullSink {
    async fn deliver(
        &self,
        _event: &SaleEvent,
        _subscriber: &SubscriberId,
    ) -> Result<(), SinkError> {
        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        "null"
    }
}
