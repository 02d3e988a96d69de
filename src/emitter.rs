//! In-process change notifications for record store subscribers.
//!
//! A UI session registers listeners by event type and re-renders when the
//! store confirms a change. Payloads are the JSON form of `RecordEvent`.
//!
//! ```ignore
//! use archive_registry::{RecordStore, StoreEmitter, InMemoryModelStore};
//!
//! let mut emitter = StoreEmitter::new();
//! emitter.on("FileAdded", |json| println!("added: {}", json));
//!
//! let mut store = RecordStore::new(InMemoryModelStore::new()).with_emitter(emitter);
//! ```

use event_emitter_rs::EventEmitter;

use crate::store::RecordEvent;

/// Wraps an `EventEmitter` and queues record events until their mutation is
/// confirmed.
pub struct StoreEmitter {
    event_emitter: EventEmitter,
    events_to_emit: Vec<RecordEvent>,
}

impl Default for StoreEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreEmitter {
    pub fn new() -> Self {
        Self {
            event_emitter: EventEmitter::new(),
            events_to_emit: Vec::new(),
        }
    }

    /// Register a listener for an event type, or `RecordEvent::ANY`.
    pub fn on<F>(&mut self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.event_emitter.on(event, listener);
    }

    /// Queue an event to be emitted once the mutation is confirmed.
    pub fn enqueue(&mut self, event: RecordEvent) {
        self.events_to_emit.push(event);
    }

    /// Emit all queued events and wait for their listeners to finish.
    pub fn emit_queued(&mut self) {
        let events: Vec<_> = self.events_to_emit.drain(..).collect();
        for event in events {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(err) => {
                    tracing::warn!(%err, event = event.event_type(), "dropping unserializable record event");
                    continue;
                }
            };

            let mut handles = self.event_emitter.emit(event.event_type(), payload.clone());
            handles.extend(self.event_emitter.emit(RecordEvent::ANY, payload));
            for handle in handles {
                if handle.join().is_err() {
                    tracing::warn!(event = event.event_type(), "record event listener panicked");
                }
            }
        }
    }

    /// Number of events queued for emission.
    pub fn queued_len(&self) -> usize {
        self.events_to_emit.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn enqueue_and_emit() {
        let mut emitter = StoreEmitter::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&received);
        emitter.on("FileRemoved", move |data| sink.lock().unwrap().push(data));

        emitter.enqueue(RecordEvent::FileRemoved { id: "a".into() });
        assert_eq!(emitter.queued_len(), 1);

        emitter.emit_queued();
        assert_eq!(emitter.queued_len(), 0);

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        let payload: serde_json::Value = serde_json::from_str(&received[0]).unwrap();
        assert_eq!(payload["type"], "FileRemoved");
        assert_eq!(payload["data"]["id"], "a");
    }

    #[test]
    fn any_listener_sees_every_event() {
        let mut emitter = StoreEmitter::new();
        let count = Arc::new(Mutex::new(0));

        let counter = Arc::clone(&count);
        emitter.on(RecordEvent::ANY, move |_| *counter.lock().unwrap() += 1);

        emitter.enqueue(RecordEvent::FilesLoaded { count: 3 });
        emitter.enqueue(RecordEvent::FileRemoved { id: "a".into() });
        emitter.emit_queued();

        assert_eq!(*count.lock().unwrap(), 2);
    }
}
