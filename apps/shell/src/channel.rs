//! # Channels
//!
//! Named request/reply tables that let shell modules call each other
//! without holding references to one another.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    channel("header")                                    │
//! │                                                                         │
//! │  HeaderService ── reply("update:title", f) ──►  ┌──────────────────┐    │
//! │                                                  │  update:title → f │    │
//! │                                                  │  open:menu    → g │    │
//! │                                                  │  close:menu   → h │    │
//! │                                                  └────────┬─────────┘    │
//! │  any module ───── request("update:title", "Till 2") ──────┘             │
//! │                         │                                               │
//! │                         ▼                                               │
//! │                   Ok(f("Till 2"))  or  Err(ChannelError::NoHandler)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers are cloned out of the table before they run, so a handler may
//! itself register or remove handlers on the same channel.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::ChannelError;

/// A request handler: payload in, response out.
pub type Handler = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Locks `mutex`, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One named channel.
pub struct Channel {
    name: String,
    handlers: Mutex<HashMap<String, Handler>>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Channel {
            name: name.into(),
            handlers: Mutex::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Answers `request` with `handler`, replacing any previous handler.
    pub fn reply<F>(&self, request: &str, handler: F)
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        let replaced = lock(&self.handlers)
            .insert(request.to_string(), Arc::new(handler))
            .is_some();
        debug!(channel = %self.name, request, replaced, "handler registered");
    }

    /// Sends `payload` to the handler for `request`.
    pub fn request(&self, request: &str, payload: Value) -> Result<Value, ChannelError> {
        let handler = lock(&self.handlers).get(request).cloned();
        match handler {
            Some(handler) => {
                trace!(channel = %self.name, request, "request");
                Ok(handler(payload))
            }
            None => Err(ChannelError::NoHandler {
                channel: self.name.clone(),
                request: request.to_string(),
            }),
        }
    }

    /// Removes the handler for `request`. Returns whether one was registered.
    pub fn stop_replying(&self, request: &str) -> bool {
        lock(&self.handlers).remove(request).is_some()
    }

    /// Removes every handler.
    pub fn reset(&self) {
        let mut handlers = lock(&self.handlers);
        debug!(channel = %self.name, removed = handlers.len(), "channel reset");
        handlers.clear();
    }

    pub fn has_handler(&self, request: &str) -> bool {
        lock(&self.handlers).contains_key(request)
    }

    pub fn handler_count(&self) -> usize {
        lock(&self.handlers).len()
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut requests: Vec<String> = lock(&self.handlers).keys().cloned().collect();
        requests.sort();
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("requests", &requests)
            .finish()
    }
}

/// Registry of channels, created on first use.
#[derive(Debug, Default)]
pub struct Channels {
    channels: Mutex<HashMap<String, Arc<Channel>>>,
}

impl Channels {
    pub fn new() -> Self {
        Self::default()
    }

    /// The channel called `name`. Every call with the same name returns the
    /// same channel.
    pub fn channel(&self, name: &str) -> Arc<Channel> {
        lock(&self.channels)
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Channel::new(name)))
            .clone()
    }

    /// Shorthand for `channel(channel).request(request, payload)`.
    pub fn request(&self, channel: &str, request: &str, payload: Value) -> Result<Value, ChannelError> {
        self.channel(channel).request(request, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_reply() {
        let channel = Channel::new("math");
        channel.reply("double", |payload| json!(payload.as_i64().unwrap_or(0) * 2));

        assert_eq!(channel.request("double", json!(21)), Ok(json!(42)));
        assert!(channel.has_handler("double"));
    }

    #[test]
    fn test_unregistered_request() {
        let channel = Channel::new("math");
        assert_eq!(
            channel.request("triple", json!(1)),
            Err(ChannelError::NoHandler {
                channel: "math".to_string(),
                request: "triple".to_string(),
            })
        );
    }

    #[test]
    fn test_reply_replaces_handler() {
        let channel = Channel::new("c");
        channel.reply("r", |_| json!(1));
        channel.reply("r", |_| json!(2));

        assert_eq!(channel.request("r", Value::Null), Ok(json!(2)));
        assert_eq!(channel.handler_count(), 1);
    }

    #[test]
    fn test_stop_replying_and_reset() {
        let channel = Channel::new("c");
        channel.reply("a", |_| Value::Null);
        channel.reply("b", |_| Value::Null);

        assert!(channel.stop_replying("a"));
        assert!(!channel.stop_replying("a"));
        assert!(channel.has_handler("b"));

        channel.reset();
        assert_eq!(channel.handler_count(), 0);
        assert!(channel.request("b", Value::Null).is_err());
    }

    #[test]
    fn test_handler_may_touch_its_own_channel() {
        let channels = Arc::new(Channels::new());
        let inner = channels.clone();
        channels.channel("c").reply("once", move |_| {
            json!(inner.channel("c").stop_replying("once"))
        });

        assert_eq!(channels.request("c", "once", Value::Null), Ok(json!(true)));
        assert!(!channels.channel("c").has_handler("once"));
    }

    #[test]
    fn test_channels_are_shared_by_name() {
        let channels = Channels::new();
        channels.channel("header").reply("ping", |_| json!("pong"));

        assert!(Arc::ptr_eq(&channels.channel("header"), &channels.channel("header")));
        assert_eq!(channels.request("header", "ping", Value::Null), Ok(json!("pong")));
        assert!(channels.request("other", "ping", Value::Null).is_err());
    }
}
