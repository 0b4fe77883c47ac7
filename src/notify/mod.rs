//! Real-time admin notifications
//!
//! An explicit [`ChannelRegistry`] holds every live admin connection; order
//! creation broadcasts into it as a fire-and-forget side effect. Delivery is
//! best-effort: no retry, no queueing, no backfill for absent channels.

pub mod registry;
pub mod ws;

pub use registry::ChannelRegistry;

use crate::db::models::Order;
use serde::Serialize;

/// Payload of the `order` event sent to admin dashboards
#[derive(Debug, Clone, Serialize)]
pub struct OrderNotification {
    pub message: String,
    pub order: Order,
}
