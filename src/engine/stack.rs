//! Capacity-limited LIFO container for move history and captured pieces.

use crate::engine::types::ChessError;

/// A bounded LIFO stack. `push` fails with `ChessError::HistoryOverflow`
/// once `capacity` elements are held.
#[derive(Clone, Debug)]
pub struct BoundedStack<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> BoundedStack<T> {
    pub fn new(capacity: usize) -> Self {
        BoundedStack {
            items: Vec::new(),
            capacity,
        }
    }

    /// Push an element, failing when the stack is full.
    pub fn push(&mut self, item: T) -> Result<(), ChessError> {
        if self.items.len() >= self.capacity {
            return Err(ChessError::HistoryOverflow(self.capacity));
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove and return the most recently pushed element.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// The most recently pushed element.
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate oldest-first.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_lifo_order() {
        let mut stack = BoundedStack::new(8);
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        stack.push(3).unwrap();
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn peek_sees_most_recent_push() {
        let mut stack = BoundedStack::new(4);
        assert_eq!(stack.peek(), None);
        stack.push("a").unwrap();
        assert_eq!(stack.peek(), Some(&"a"));
        stack.push("b").unwrap();
        assert_eq!(stack.peek(), Some(&"b"));
        stack.pop();
        assert_eq!(stack.peek(), Some(&"a"));
    }

    #[test]
    fn overflow_is_an_error() {
        let mut stack = BoundedStack::new(2);
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        let err = stack.push(3).unwrap_err();
        assert!(matches!(err, ChessError::HistoryOverflow(2)));
        // The failed push must not have altered the stack.
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.peek(), Some(&2));
    }

    #[test]
    fn iter_is_oldest_first() {
        let mut stack = BoundedStack::new(4);
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        let collected: Vec<_> = stack.iter().copied().collect();
        assert_eq!(collected, vec![1, 2]);
    }
}
