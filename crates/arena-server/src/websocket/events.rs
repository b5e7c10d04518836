//! Event broadcasting to connected clients

use arena_core::{ArenaEvent, EventSink};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

pub type EventSender = broadcast::Sender<ArenaEvent>;
pub type EventReceiver = broadcast::Receiver<ArenaEvent>;

#[derive(Clone)]
pub struct WsConnection {
    pub id: Uuid,
    /// Agent the client identified as, if any
    pub agent_id: Option<String>,
}

/// Fans arena events out to every connected WebSocket.
///
/// Implements [`EventSink`], so the engine publishes through this
/// directly; a send with no subscribers is fine (events are
/// fire-and-forget).
pub struct EventBroadcaster {
    sender: EventSender,
    connections: Arc<RwLock<HashMap<Uuid, WsConnection>>>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    pub fn broadcast(&self, event: ArenaEvent) {
        let _ = self.sender.send(event);
    }

    pub fn add_connection(&self, conn: WsConnection) {
        self.connections.write().insert(conn.id, conn);
    }

    pub fn remove_connection(&self, id: &Uuid) {
        self.connections.write().remove(id);
    }

    pub fn connection_count(&self) -> usize {
        self.connections.read().len()
    }
}

impl EventSink for EventBroadcaster {
    fn publish(&self, event: ArenaEvent) {
        self.broadcast(event);
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(1000)
    }
}
