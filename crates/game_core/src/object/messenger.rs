//! Per-object message channel
//!
//! Key principles:
//! - Key-value arguments (no order dependency)
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Subscription by message key (only interested handlers are notified)
//! - Queuing support (immediate + delayed delivery)
//!
//! Each [`GameObject`](super::GameObject) owns one messenger and releases it
//! during its own release; after that the channel silently drops everything.

use super::ObjectId;
use std::collections::HashMap;

/// Typed message argument
#[derive(Debug, Clone, PartialEq)]
pub enum MessageArg {
    /// Boolean flag
    Flag(bool),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f32),
    /// Text value
    Text(String),
    /// Reference to another object
    Object(ObjectId),
}

/// Message with a routing key and key-value arguments
#[derive(Debug, Clone)]
pub struct Message {
    /// Routing key handlers subscribe to
    pub key: String,
    /// Time the message was created (seconds)
    pub timestamp: f64,
    args: HashMap<&'static str, MessageArg>,
}

impl Message {
    /// Create a new message
    pub fn new(key: impl Into<String>, timestamp: f64) -> Self {
        Self {
            key: key.into(),
            timestamp,
            args: HashMap::new(),
        }
    }

    /// Add an argument to the message (builder pattern)
    #[must_use]
    pub fn with_arg(mut self, name: &'static str, value: MessageArg) -> Self {
        self.args.insert(name, value);
        self
    }

    /// Get an argument by name
    pub fn arg(&self, name: &str) -> Option<&MessageArg> {
        self.args.get(name)
    }

    /// Get an object argument if present
    pub fn object_arg(&self, name: &str) -> Option<ObjectId> {
        match self.arg(name) {
            Some(MessageArg::Object(id)) => Some(*id),
            _ => None,
        }
    }

    /// Get a float argument if present
    pub fn float_arg(&self, name: &str) -> Option<f32> {
        match self.arg(name) {
            Some(MessageArg::Float(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Message handler
/// Returns true if the message was consumed (stops forwarding)
pub trait MessageHandler {
    /// Handle a message, return true if consumed
    fn on_message(&mut self, message: &Message) -> bool;
}

impl<F> MessageHandler for F
where
    F: FnMut(&Message) -> bool,
{
    fn on_message(&mut self, message: &Message) -> bool {
        self(message)
    }
}

/// Token returned by [`Messenger::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Message channel with subscription and queuing
pub struct Messenger {
    immediate_queue: Vec<Message>,
    delayed_queue: Vec<(f64, Message)>,
    handlers: HashMap<String, Vec<(SubscriptionId, Box<dyn MessageHandler>)>>,
    next_subscription: u64,
    current_time: f64,
    released: bool,
    /// Unsubscribes this channel could not apply, handed on by `absorb`
    detached: Vec<SubscriptionId>,
}

impl Messenger {
    /// Create a new empty messenger
    pub fn new() -> Self {
        Self {
            immediate_queue: Vec::new(),
            delayed_queue: Vec::new(),
            handlers: HashMap::new(),
            next_subscription: 0,
            current_time: 0.0,
            released: false,
            detached: Vec::new(),
        }
    }

    /// Empty channel that stands in while this one is delivering
    ///
    /// It continues this channel's subscription numbering so that ids stay
    /// unique after [`absorb`](Self::absorb).
    pub fn staging(&self) -> Self {
        Self {
            next_subscription: self.next_subscription,
            current_time: self.current_time,
            ..Self::new()
        }
    }

    /// Take over everything queued on a staging channel
    ///
    /// Staged messages are delivered on the next dispatch, after anything
    /// already pending here.
    pub fn absorb(&mut self, staged: Self) {
        if self.released {
            return;
        }
        for subscription in staged.detached {
            self.unsubscribe(subscription);
        }
        self.detached.clear();
        self.immediate_queue.extend(staged.immediate_queue);
        self.delayed_queue.extend(staged.delayed_queue);
        for (key, handlers) in staged.handlers {
            self.handlers.entry(key).or_default().extend(handlers);
        }
        self.next_subscription = self.next_subscription.max(staged.next_subscription);
    }

    /// Update current time (seconds since start)
    pub fn update_time(&mut self, time: f64) {
        self.current_time = time;
    }

    /// Register a handler for a message key
    pub fn subscribe(
        &mut self,
        key: impl Into<String>,
        handler: impl MessageHandler + 'static,
    ) -> Option<SubscriptionId> {
        if self.released {
            return None;
        }
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.handlers
            .entry(key.into())
            .or_default()
            .push((id, Box::new(handler)));
        Some(id)
    }

    /// Remove a handler; unknown ids are ignored
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) {
        let before = self.subscription_count();
        for handlers in self.handlers.values_mut() {
            handlers.retain(|(id, _)| *id != subscription);
        }
        if self.subscription_count() == before && !self.released {
            self.detached.push(subscription);
        }
    }

    /// Queue a message for this frame's dispatch
    pub fn send(&mut self, message: Message) {
        if !self.released {
            self.immediate_queue.push(message);
        }
    }

    /// Queue a message for delivery once `delivery_time` is reached
    pub fn post(&mut self, delivery_time: f64, message: Message) {
        if !self.released {
            self.delayed_queue.push((delivery_time, message));
        }
    }

    /// Dispatch all pending messages
    /// Processes immediate queue first, then due delayed messages
    pub fn dispatch(&mut self) -> usize {
        let mut delivered = 0;

        let immediate = std::mem::take(&mut self.immediate_queue);
        for message in &immediate {
            delivered += self.dispatch_message(message);
        }

        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.delayed_queue)
            .into_iter()
            .partition(|(time, _)| *time <= self.current_time);
        self.delayed_queue = pending;
        for (_, message) in &due {
            delivered += self.dispatch_message(message);
        }

        delivered
    }

    /// Deliver to subscribers in registration order until one consumes it
    fn dispatch_message(&mut self, message: &Message) -> usize {
        let mut delivered = 0;
        if let Some(handlers) = self.handlers.get_mut(&message.key) {
            for (_, handler) in handlers.iter_mut() {
                delivered += 1;
                if handler.on_message(message) {
                    break;
                }
            }
        }
        delivered
    }

    /// Number of messages waiting for dispatch
    pub fn pending(&self) -> usize {
        self.immediate_queue.len() + self.delayed_queue.len()
    }

    /// Number of live subscriptions
    pub fn subscription_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Tear down the channel; later calls become no-ops
    pub fn release(&mut self) {
        self.immediate_queue.clear();
        self.delayed_queue.clear();
        self.handlers.clear();
        self.detached.clear();
        self.released = true;
    }

    /// Whether [`release`](Self::release) has run
    pub const fn is_released(&self) -> bool {
        self.released
    }
}

impl Default for Messenger {
    fn default() -> Self {
        Self::new()
    }
}
