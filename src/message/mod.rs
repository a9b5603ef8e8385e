//! Socket.IO notifier
//!
//! Best-effort change notifications for connected clients. Emits never
//! block or fail a request: before the Socket.IO layer is built, or when
//! a broadcast errors, the event is logged at debug level and dropped.
//!
//! Clients may also emit any of the known events themselves; the server
//! rebroadcasts the payload verbatim to every connected client, sender
//! included. Kitchen displays and waiter handhelds stay in sync through
//! the server without polling.

use std::sync::{Arc, OnceLock};

use serde::Serialize;
use serde_json::Value;
use socketioxide::SocketIo;
use socketioxide::extract::{Data, SocketRef};
use tracing::debug;

/// A new order was opened.
pub const ORDER_CREATED: &str = "order:created";
/// An order moved through its lifecycle.
pub const ORDER_STATUS_CHANGED: &str = "order:status-changed";
/// A kitchen item moved through its pipeline.
pub const ITEM_STATUS_CHANGED: &str = "item:status-changed";

/// Events clients may emit for server-side rebroadcast.
const RELAYED_EVENTS: &[&str] = &[ORDER_CREATED, ORDER_STATUS_CHANGED, ITEM_STATUS_CHANGED];

/// Handle for broadcasting domain events.
///
/// The Socket.IO instance is born together with its tower layer when the
/// router is assembled, which happens after the services holding this
/// notifier are constructed. [`Notifier::attach`] binds the instance late;
/// until then every emit is a no-op.
#[derive(Clone, Default)]
pub struct Notifier {
    io: Arc<OnceLock<SocketIo>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the relay namespace and bind the instance for emits.
    pub fn attach(&self, io: SocketIo) {
        let relay_io = io.clone();
        io.ns("/", move |socket: SocketRef| async move {
            debug!(target: "socketio", sid = %socket.id, "client connected");

            for event in RELAYED_EVENTS {
                let io = relay_io.clone();
                socket.on(*event, move |Data::<Value>(payload)| {
                    let io = io.clone();
                    async move {
                        broadcast(&io, event, &payload).await;
                    }
                });
            }

            socket.on_disconnect(|socket: SocketRef| async move {
                debug!(target: "socketio", sid = %socket.id, "client disconnected");
            });
        });

        if self.io.set(io).is_err() {
            debug!(target: "socketio", "notifier already attached");
        }
    }

    /// Broadcast an event to every connected client. Best effort.
    pub async fn emit<T: Serialize + ?Sized>(&self, event: &'static str, payload: &T) {
        match self.io.get() {
            Some(io) => broadcast(io, event, payload).await,
            None => debug!(target: "socketio", event, "notifier not attached, dropping event"),
        }
    }
}

async fn broadcast<T: Serialize + ?Sized>(io: &SocketIo, event: &'static str, payload: &T) {
    let Some(ns) = io.of("/") else {
        debug!(target: "socketio", event, "default namespace missing, dropping event");
        return;
    };
    if let Err(e) = ns.emit(event, payload).await {
        debug!(target: "socketio", event, error = %e, "broadcast failed");
    }
}
