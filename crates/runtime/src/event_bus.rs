use crate::frame::Frame;

/// Event recorded together with the frame it was emitted in.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub frame_index: u64,
    pub payload: E,
}

/// Per-frame ordered event log, optionally bounded to the newest events.
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<Event<E>>,
    keep_last: Option<usize>,
    dropped: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            keep_last: None,
            dropped: 0,
        }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest events are discarded once more than `n` are held.
    pub fn keep_last(n: usize) -> Self {
        Self {
            keep_last: Some(n.max(1)),
            ..Self::default()
        }
    }

    pub fn emit(&mut self, frame: Frame, payload: E) {
        self.events.push(Event {
            frame_index: frame.index,
            payload,
        });
        if let Some(limit) = self.keep_last
            && self.events.len() > limit
        {
            let excess = self.events.len() - limit;
            self.events.drain(..excess);
            self.dropped += excess as u64;
        }
    }

    pub fn events(&self) -> &[Event<E>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events discarded by the `keep_last` bound so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        std::mem::take(&mut self.events)
    }
}
