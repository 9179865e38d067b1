//! Reaction collectors.
//!
//! A [`Subscription`] listens for reactions on one message. The platform
//! glue pushes every reaction event into [`Collectors::dispatch`], which
//! forwards it to the subscription for that message if its filter accepts
//! it. Dropping or cancelling the subscription deregisters it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::ids::{MessageId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Add,
    Remove,
}

/// A reaction being added to or removed from a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub message: MessageId,
    pub user: UserId,
    pub emoji: String,
    pub kind: ReactionKind,
}

type Filter = Box<dyn Fn(&ReactionEvent) -> bool + Send + Sync>;

struct Slot {
    token: u64,
    filter: Filter,
    tx: mpsc::UnboundedSender<ReactionEvent>,
}

/// Registry of active subscriptions, at most one per message.
#[derive(Default)]
pub struct Collectors {
    slots: DashMap<MessageId, Slot>,
    next_token: AtomicU64,
}

impl Collectors {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::default()
    }

    /// Starts collecting reactions on `message` that pass `filter`.
    ///
    /// An existing subscription for the same message is replaced and will
    /// see no further events.
    pub fn subscribe<F>(self: &Arc<Self>, message: MessageId, filter: F) -> Subscription
    where
        F: Fn(&ReactionEvent) -> bool + Send + Sync + 'static,
    {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        let slot = Slot {
            token,
            filter: Box::new(filter),
            tx,
        };

        if self.slots.insert(message, slot).is_some() {
            log::debug!("Replaced collector on message {message}.");
        }

        Subscription {
            hub: Arc::clone(self),
            message,
            token,
            rx,
            closed: false,
        }
    }

    /// Hands an event to the matching subscription.
    ///
    /// Returns whether any subscription took the event.
    pub fn dispatch(&self, event: ReactionEvent) -> bool {
        let Some(slot) = self.slots.get(&event.message) else {
            return false;
        };

        if !(slot.filter)(&event) {
            return false;
        }

        slot.tx.send(event).is_ok()
    }

    /// Whether a subscription is active for `message`.
    #[must_use]
    pub fn is_collecting(&self, message: MessageId) -> bool {
        self.slots.contains_key(&message)
    }

    fn release(&self, message: MessageId, token: u64) {
        self.slots.remove_if(&message, |_, slot| slot.token == token);
    }
}

impl std::fmt::Debug for Collectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collectors")
            .field("active", &self.slots.len())
            .finish()
    }
}

/// An active reaction collector.
#[must_use = "the subscription ends when dropped"]
pub struct Subscription {
    hub: Arc<Collectors>,
    message: MessageId,
    token: u64,
    rx: mpsc::UnboundedReceiver<ReactionEvent>,
    closed: bool,
}

impl Subscription {
    #[must_use]
    pub fn message(&self) -> MessageId {
        self.message
    }

    /// Waits for the next accepted event.
    ///
    /// Returns `None` once the subscription was replaced or cancelled.
    pub async fn next(&mut self) -> Option<ReactionEvent> {
        if self.closed {
            return None;
        }

        self.rx.recv().await
    }

    /// Stops collecting. Events dispatched afterwards are not delivered.
    pub fn cancel(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.hub.release(self.message, self.token);
            self.rx.close();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("message", &self.message)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
