//! Change notification
//!
//! A typed registry of callbacks and channel subscribers. Each state object
//! owns an `EventBus` over its own event enum, so subscribers match on
//! variants instead of string event names.

use chrono::{DateTime, Utc};
use std::sync::mpsc::{self, Receiver, Sender};

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Published event with its sequence number and timestamp
#[derive(Debug, Clone)]
pub struct EventEnvelope<E> {
    pub sequence: u64,
    pub at: DateTime<Utc>,
    pub event: E,
}

type Callback<E> = Box<dyn FnMut(&EventEnvelope<E>)>;

/// Callback and channel fan-out for one event type
pub struct EventBus<E: Clone> {
    next_subscription: u64,
    sequence: u64,
    callbacks: Vec<(SubscriptionId, Callback<E>)>,
    channels: Vec<Sender<EventEnvelope<E>>>,
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_subscription: 0,
            sequence: 0,
            callbacks: Vec::new(),
            channels: Vec::new(),
        }
    }

    /// Register a callback invoked synchronously on every publish
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&EventEnvelope<E>) + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sid, _)| *sid != id);
        self.callbacks.len() != before
    }

    /// Receive events through a channel; dropped receivers are pruned on publish
    pub fn subscribe_channel(&mut self) -> Receiver<EventEnvelope<E>> {
        let (tx, rx) = mpsc::channel();
        self.channels.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.callbacks.len() + self.channels.len()
    }

    /// Deliver an event to every subscriber; returns its sequence number
    pub fn publish(&mut self, event: E) -> u64 {
        self.sequence += 1;
        let envelope = EventEnvelope {
            sequence: self.sequence,
            at: Utc::now(),
            event,
        };
        for (_, callback) in self.callbacks.iter_mut() {
            callback(&envelope);
        }
        self.channels
            .retain(|tx| tx.send(envelope.clone()).is_ok());
        envelope.sequence
    }
}
