use dashmap::DashMap;
use tokio::sync::broadcast;
use ulid::Ulid;

use crate::model::Event;

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast hub for LISTEN/NOTIFY per room. Payloads are the JSON
/// rendering of the event, matching what a NOTIFY payload carries.
pub struct NotifyHub {
    channels: DashMap<Ulid, broadcast::Sender<String>>,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to a room's events. Creates the channel if needed.
    pub fn subscribe(&self, room_id: Ulid) -> broadcast::Receiver<String> {
        let sender = self
            .channels
            .entry(room_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Publish an event. No-op if nobody is listening.
    pub fn send(&self, room_id: Ulid, event: &Event) {
        if let Some(sender) = self.channels.get(&room_id)
            && let Ok(payload) = serde_json::to_string(event) {
                let _ = sender.send(payload);
            }
    }

    /// Drop a room's channel (room deleted).
    pub fn remove(&self, room_id: &Ulid) {
        self.channels.remove(room_id);
    }
}
