//! Bounded FIFO of ownership tokens with front re-insertion for retries.
use heapless::Deque;

/// Capacity-limited FIFO.
///
/// Every operation is O(1) and runs to completion. A push on a full queue
/// never overwrites: the item is handed back to the caller, which decides
/// what to do with it.
pub struct BoundedQueue<T, const C: usize> {
    items: Deque<T, C>,
}

impl<T, const C: usize> Default for BoundedQueue<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const C: usize> BoundedQueue<T, C> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            items: Deque::new(),
        }
    }

    /// Enqueue at the tail.
    #[inline]
    pub fn push_back(&mut self, item: T) -> Result<(), T> {
        self.items.push_back(item)
    }

    /// Re-insert at the head so `item` is the next one popped.
    ///
    /// Reserved for retries: it is the only way the FIFO order changes.
    #[inline]
    pub fn push_front(&mut self, item: T) -> Result<(), T> {
        self.items.push_front(item)
    }

    /// Dequeue the head.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Borrow the head without removing it.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.is_full()
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        C
    }

    /// Head-to-tail iteration.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}
