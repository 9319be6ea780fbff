//! Static arena of host-record buffers with single-owner tokens.
//!
//! A [`FrameToken`] is the only handle to a buffer. It is neither `Clone` nor
//! `Copy`, so moving it between the free list and the relay queues moves
//! ownership: a buffer cannot sit in two containers at once. Buffers are
//! never freed; a reused buffer is overwritten by its next frame.
use crate::infra::queue::BoundedQueue;
use crate::protocol::host_frame::HostFrame;

//==================================================================================FrameToken
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Ownership token for one pool slot.
pub struct FrameToken(u8);

impl FrameToken {
    /// Slot index inside the pool that issued the token.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

//==================================================================================FramePool
/// Fixed pool of `N` host records (1 ≤ `N` ≤ 256).
pub struct FramePool<const N: usize> {
    slots: [HostFrame; N],
    free: BoundedQueue<FrameToken, N>,
}

impl<const N: usize> Default for FramePool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FramePool<N> {
    const VALID_SIZE: () = assert!(N > 0 && N <= u8::MAX as usize + 1, "pool size must be 1..=256");

    /// Create the pool with every buffer on the free list.
    pub fn new() -> Self {
        let _: () = Self::VALID_SIZE;

        let mut free = BoundedQueue::new();
        for index in 0..N {
            // Capacity equals N: every slot fits.
            let _ = free.push_back(FrameToken(index as u8));
        }

        Self {
            slots: [HostFrame::zeroed(); N],
            free,
        }
    }

    /// Take a free buffer.
    #[inline]
    pub fn acquire(&mut self) -> Option<FrameToken> {
        self.free.pop_front()
    }

    /// Return a buffer to the free list. Its content is left as is.
    pub fn release(&mut self, token: FrameToken) {
        let accepted = self.free.push_back(token).is_ok();
        debug_assert!(accepted, "free list overflow: token issued by another pool");
    }

    /// Record held by `token`.
    #[inline]
    pub fn get(&self, token: &FrameToken) -> &HostFrame {
        &self.slots[token.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, token: &FrameToken) -> &mut HostFrame {
        &mut self.slots[token.index()]
    }

    /// Number of buffers on the free list.
    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Slot indices currently on the free list, head first.
    pub fn free_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.free.iter().map(FrameToken::index)
    }
}
