//! The pull-sequence contract shared by sources, the lexer and the parser.
//!
//! A [`Pull`] yields `Ok(Some(item))`, `Ok(None)` for end of input, or
//! `Err(_)`. Once end of input or an error has been returned, every later
//! call returns the same result. [`Terminal`] implements that latch for the
//! producers in this crate, and [`PushBack`] adds a small LIFO buffer in front
//! of any pull sequence for one-item lookahead.

use crate::error::{Error, Result};

/// A synchronous, pull-based sequence.
pub trait Pull {
    /// Items produced by the sequence.
    type Item;

    /// Produce the next item, `None` at end of input.
    fn pull(&mut self) -> Result<Option<Self::Item>>;
}

impl<P: Pull + ?Sized> Pull for &mut P {
    type Item = P::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        (**self).pull()
    }
}

impl<P: Pull + ?Sized> Pull for Box<P> {
    type Item = P::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        (**self).pull()
    }
}

/// Latch recording how a sequence ended.
#[derive(Debug, Clone, Default)]
pub struct Terminal {
    state: Option<std::result::Result<(), Error>>,
}

impl Terminal {
    /// Create a latch for a live sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether end of input or an error has been recorded.
    pub fn is_set(&self) -> bool {
        self.state.is_some()
    }

    /// The recorded outcome, if the sequence has ended.
    pub fn replay<T>(&self) -> Option<Result<Option<T>>> {
        match &self.state {
            None => None,
            Some(Ok(())) => Some(Ok(None)),
            Some(Err(e)) => Some(Err(e.clone())),
        }
    }

    /// Pass `result` through, latching it if it ends the sequence.
    pub fn record<T>(&mut self, result: Result<Option<T>>) -> Result<Option<T>> {
        match &result {
            Ok(Some(_)) => {}
            Ok(None) => self.state = Some(Ok(())),
            Err(e) => {
                tracing::debug!(code = e.code(), error = %e, "sequence failed");
                self.state = Some(Err(e.clone()));
            }
        }
        result
    }
}

/// A pull sequence with a push-back buffer in front of it.
///
/// Pushed items are returned most-recently-pushed first, before the
/// underlying source is resumed.
pub struct PushBack<P: Pull> {
    inner: P,
    buffer: Vec<P::Item>,
}

impl<P: Pull> PushBack<P> {
    /// Wrap `inner` with an empty buffer.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            buffer: Vec::with_capacity(1),
        }
    }

    /// Place one item at the front of the sequence.
    pub fn push_back(&mut self, item: P::Item) {
        self.buffer.push(item);
    }

    /// Pull one item and put it straight back.
    pub fn peek(&mut self) -> Result<Option<&P::Item>> {
        if self.buffer.is_empty() {
            match self.inner.pull()? {
                Some(item) => self.buffer.push(item),
                None => return Ok(None),
            }
        }
        Ok(self.buffer.last())
    }
}

impl<P: Pull> Pull for PushBack<P> {
    type Item = P::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        match self.buffer.pop() {
            Some(item) => Ok(Some(item)),
            None => self.inner.pull(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Yields the numbers below `end`, then fails if `fail` is set.
    struct Counter {
        next: u32,
        end: u32,
        fail: bool,
        latch: Terminal,
    }

    impl Pull for Counter {
        type Item = u32;

        fn pull(&mut self) -> Result<Option<u32>> {
            if let Some(end) = self.latch.replay() {
                return end;
            }
            let result = if self.next < self.end {
                self.next += 1;
                Ok(Some(self.next - 1))
            } else if self.fail {
                Err(Error::EmptyDocument)
            } else {
                Ok(None)
            };
            self.latch.record(result)
        }
    }

    fn counter(end: u32, fail: bool) -> Counter {
        Counter {
            next: 0,
            end,
            fail,
            latch: Terminal::new(),
        }
    }

    #[test]
    fn test_push_back_is_lifo() {
        let mut seq = PushBack::new(counter(3, false));
        assert_eq!(seq.pull().unwrap(), Some(0));
        seq.push_back(10);
        seq.push_back(20);
        assert_eq!(seq.pull().unwrap(), Some(20));
        assert_eq!(seq.pull().unwrap(), Some(10));
        assert_eq!(seq.pull().unwrap(), Some(1));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut seq = PushBack::new(counter(2, false));
        assert_eq!(seq.peek().unwrap(), Some(&0));
        assert_eq!(seq.peek().unwrap(), Some(&0));
        assert_eq!(seq.pull().unwrap(), Some(0));
        assert_eq!(seq.pull().unwrap(), Some(1));
        assert_eq!(seq.peek().unwrap(), None);
    }

    #[test]
    fn test_end_of_input_is_sticky() {
        let mut seq = counter(1, false);
        assert_eq!(seq.pull().unwrap(), Some(0));
        assert_eq!(seq.pull().unwrap(), None);
        assert_eq!(seq.pull().unwrap(), None);
        assert!(seq.latch.is_set());
    }

    #[test]
    fn test_error_is_sticky() {
        let mut seq = counter(0, true);
        assert_eq!(seq.pull().unwrap_err().code(), 200);
        assert_eq!(seq.pull().unwrap_err().code(), 200);
    }

    #[test]
    fn test_buffer_served_after_exhaustion() {
        let mut seq = PushBack::new(counter(0, false));
        assert_eq!(seq.pull().unwrap(), None);
        seq.push_back(7);
        assert_eq!(seq.pull().unwrap(), Some(7));
        assert_eq!(seq.pull().unwrap(), None);
    }
}
