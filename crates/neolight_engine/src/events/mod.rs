//! Type-keyed event bus
//!
//! Systems publish plain Rust values; subscribers register for a concrete
//! event type and are invoked with a reference to it. Events can be
//! delivered immediately with [`EventBus::publish`] or queued with
//! [`EventBus::post`] and flushed by [`EventBus::dispatch`], which the engine
//! calls once per tick.

use slotmap::{new_key_type, SlotMap};
use std::any::{Any, TypeId};
use std::collections::HashMap;

new_key_type! {
    /// Handle returned by [`EventBus::subscribe`]
    pub struct SubscriptionKey;
}

type Handler = Box<dyn FnMut(&dyn Any) + Send>;

struct Subscription {
    event_type: TypeId,
    handler: Handler,
}

/// Publish/subscribe hub keyed by event type
#[derive(Default)]
pub struct EventBus {
    subscriptions: SlotMap<SubscriptionKey, Subscription>,
    by_type: HashMap<TypeId, Vec<SubscriptionKey>>,
    queued: Vec<Box<dyn Any + Send>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `handler` for every published `E`
    ///
    /// Handlers run in subscription order.
    pub fn subscribe<E, F>(&mut self, mut handler: F) -> SubscriptionKey
    where
        E: Any,
        F: FnMut(&E) + Send + 'static,
    {
        let event_type = TypeId::of::<E>();
        let handler: Handler = Box::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });

        let key = self.subscriptions.insert(Subscription { event_type, handler });
        self.by_type.entry(event_type).or_default().push(key);
        key
    }

    /// Remove a subscription; returns whether it existed
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        let Some(subscription) = self.subscriptions.remove(key) else {
            return false;
        };
        if let Some(keys) = self.by_type.get_mut(&subscription.event_type) {
            keys.retain(|k| *k != key);
            if keys.is_empty() {
                self.by_type.remove(&subscription.event_type);
            }
        }
        true
    }

    /// Deliver `event` now; returns how many handlers ran
    pub fn publish<E: Any>(&mut self, event: &E) -> usize {
        self.deliver(event)
    }

    /// Queue `event` for the next [`dispatch`](Self::dispatch)
    pub fn post<E: Any + Send>(&mut self, event: E) {
        self.queued.push(Box::new(event));
    }

    /// Deliver every queued event in posting order; returns how many handlers ran
    ///
    /// Events posted by handlers during this call wait for the next dispatch.
    pub fn dispatch(&mut self) -> usize {
        let queued = std::mem::take(&mut self.queued);
        queued.iter().map(|event| self.deliver(&**event)).sum()
    }

    /// Number of events waiting for dispatch
    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    /// Number of handlers subscribed to `E`
    pub fn subscriber_count<E: Any>(&self) -> usize {
        self.by_type.get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }

    /// Drop every subscription and queued event
    pub fn clear(&mut self) {
        self.subscriptions.clear();
        self.by_type.clear();
        self.queued.clear();
    }

    fn deliver(&mut self, event: &dyn Any) -> usize {
        let Some(keys) = self.by_type.get(&event.type_id()) else {
            return 0;
        };

        let mut delivered = 0;
        for key in keys {
            if let Some(subscription) = self.subscriptions.get_mut(*key) {
                (subscription.handler)(event);
                delivered += 1;
            }
        }
        delivered
    }
}
