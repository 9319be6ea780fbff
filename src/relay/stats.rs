//! Counters and snapshots exposed by the relay. All counters wrap.

/// Event counters since start-up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayStats {
    /// Host submissions accepted by the bus; each produced one echo.
    pub echoed: u32,
    /// Records handed to the USB transport.
    pub delivered: u32,
    /// Frames read from the bus into a pool buffer.
    pub received: u32,
    /// Pending indications that yielded no frame.
    pub rx_empty_polls: u32,
    /// Iterations where a pending reception was left unread because the pool
    /// was empty. The controller keeps or discards that frame on its own.
    pub rx_dropped: u32,
    /// Failed bus transmissions put back at the head of the host → bus queue.
    pub can_tx_retries: u32,
    /// Failed USB transmissions put back at the head of the bus → host queue.
    pub usb_tx_retries: u32,
    /// Host submissions given up under [`RetryPolicy::MaxAttempts`](super::RetryPolicy).
    pub tx_abandoned: u32,
    /// Records for the host given up under [`RetryPolicy::MaxAttempts`](super::RetryPolicy).
    pub usb_abandoned: u32,
    /// Host submissions refused at the door (malformed or pool empty).
    pub host_rejected: u32,
    /// Buffers returned to the pool because a queue was full.
    pub queue_overflows: u32,
}

#[inline]
pub(crate) fn bump(counter: &mut u32) {
    *counter = counter.wrapping_add(1);
}

/// Number of buffers held by each container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Census {
    pub free: usize,
    pub host_to_bus: usize,
    pub bus_to_host: usize,
}

impl Census {
    /// Buffers accounted for. Equals the pool size between relay steps.
    pub fn total(&self) -> usize {
        self.free + self.host_to_bus + self.bus_to_host
    }
}
