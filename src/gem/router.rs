//! Stream/function message routing.

use std::collections::HashMap;

use tracing::warn;

use crate::error::GemResult;
use crate::message::Message;

/// Handler for one `(stream, function)` pair. The returned message, if any,
/// is a reply to transmit to the origin.
pub type RouteHandler<O> =
    Box<dyn Fn(&O, &Message) -> GemResult<Option<Message>> + Send + Sync>;

/// Lookup-table dispatch of decoded messages keyed by `(stream, function)`.
///
/// Handlers are registered once at assembly time; routing is a plain map
/// lookup. Messages with no registered handler are logged and produce no
/// reply.
pub struct MessageRouter<O> {
    handlers: HashMap<(u8, u8), RouteHandler<O>>,
}

impl<O> std::fmt::Debug for MessageRouter<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut routes: Vec<&(u8, u8)> = self.handlers.keys().collect();
        routes.sort();
        f.debug_struct("MessageRouter").field("routes", &routes).finish()
    }
}

impl<O> Default for MessageRouter<O> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<O> MessageRouter<O> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for `(stream, function)`, replacing (with a
    /// warning) any handler previously registered for the pair.
    pub fn register(
        &mut self,
        stream: u8,
        function: u8,
        handler: impl Fn(&O, &Message) -> GemResult<Option<Message>> + Send + Sync + 'static,
    ) {
        if self
            .handlers
            .insert((stream, function), Box::new(handler))
            .is_some()
        {
            warn!(stream, function, "replaced existing message handler");
        }
    }

    /// Whether a handler is registered for `(stream, function)`.
    #[must_use]
    pub fn handles(&self, stream: u8, function: u8) -> bool {
        self.handlers.contains_key(&(stream, function))
    }

    /// Routes a message to its handler.
    ///
    /// Returns the handler's optional reply; unhandled pairs are logged and
    /// yield `Ok(None)`.
    pub fn route(&self, origin: &O, message: &Message) -> GemResult<Option<Message>> {
        match self.handlers.get(&(message.stream, message.function)) {
            Some(handler) => handler(origin, message),
            None => {
                warn!(
                    stream = message.stream,
                    function = message.function,
                    "no handler registered for message"
                );
                Ok(None)
            }
        }
    }
}
