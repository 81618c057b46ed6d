//! Outbound message port.
//!
//! The session never owns a socket. It hands encoded text to a [`Transport`]
//! and moves on; whatever drives the socket decides when the text actually
//! leaves the process. [`Outbox`] is the in-crate implementation: a FIFO queue
//! that the driver drains after each step.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::collections::VecDeque;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,
    #[error("transport rejected message: {0}")]
    Rejected(String),
}

/// Message-oriented outbound channel. Sends are fire-and-forget.
pub trait Transport {
    /// Queue or deliver one text message.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the message cannot be accepted.
    fn send(&mut self, text: String) -> Result<(), TransportError>;
}

/// Queue of encoded messages awaiting flush.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: VecDeque<String>,
    /// Maximum queued messages; `None` is unbounded.
    limit: Option<usize>,
    closed: bool,
}

impl Outbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outbox that rejects sends once `limit` messages are waiting.
    #[must_use]
    pub fn bounded(limit: usize) -> Self {
        Self { limit: Some(limit), ..Self::default() }
    }

    /// Take every queued message in send order.
    pub fn drain(&mut self) -> Vec<String> {
        self.queue.drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Refuse further sends. Messages already queued stay drainable.
    pub fn close(&mut self) {
        self.closed = true;
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Transport for Outbox {
    fn send(&mut self, text: String) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        if self.limit.is_some_and(|limit| self.queue.len() >= limit) {
            return Err(TransportError::Rejected(format!("outbox full ({} queued)", self.queue.len())));
        }
        self.queue.push_back(text);
        Ok(())
    }
}
