//! Fixed-capacity containers backing the relay: the frame pool arena and
//! the bounded FIFO queues that carry buffer ownership between stages.
pub mod pool;
pub mod queue;
