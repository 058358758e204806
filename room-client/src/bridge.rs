use async_trait::async_trait;
use futures_util::stream::BoxStream;
use tracing::warn;

use room_types::{Player, RoomEvent, RoomId};

pub type EventStream = BoxStream<'static, RoomEvent>;

/// The realtime pub/sub transport, one logical event stream per room id.
/// Implementations own reconnection; after a reconnect the transport fires
/// a fresh `presence-sync` and may replay history, which the session's
/// idempotent handlers absorb.
#[async_trait]
pub trait RealtimeBridge: Send + Sync {
    /// Subscribes to the room's event stream and announces the current
    /// player, so peers receive them through their own `presence-join`.
    async fn subscribe(&self, room_id: RoomId, announce: Player) -> anyhow::Result<EventStream>;

    /// Drops interest in the room's stream. Idempotent.
    async fn unsubscribe(&self, room_id: RoomId);
}

/// Decodes one wire payload into a room event. Malformed payloads (missing
/// fields, unknown kind) are dropped here with a warning and must never
/// break ingestion of subsequent events.
pub fn decode_event(payload: &str) -> Option<RoomEvent> {
    match serde_json::from_str(payload) {
        Ok(event) => Some(event),
        Err(err) => {
            warn!("dropping malformed room event: {err}");
            None
        }
    }
}
