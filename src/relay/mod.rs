//! Frame relay scheduler.
//!
//! Owns the frame pool and the two transfer queues and moves buffer tokens
//! between them, one step at a time:
//!
//! * **host → bus**: pop the head of `host_to_bus`, translate, send. Success
//!   re-queues the same buffer on `bus_to_host` as the echo; failure puts it
//!   back at the head of `host_to_bus`.
//! * **bus → host**: only when the USB transport is ready, pop the head of
//!   `bus_to_host` and transmit it. Success frees the buffer; failure puts it
//!   back at the head of `bus_to_host`.
//! * **bus ingestion**: when a reception is pending and a buffer is free,
//!   read the frame into it and queue it on `bus_to_host`.
//!
//! Every step runs to completion from a single execution context, so no
//! container needs locking. Moving reception or USB completion into
//! interrupt handlers would require synchronizing these queues.
use crate::error::{AuditError, SubmitError};
use crate::infra::pool::{FramePool, FrameToken};
use crate::infra::queue::BoundedQueue;
use crate::protocol::host_frame::HostFrame;
use crate::protocol::traits::{can_transceiver::CanTransceiver, usb_transport::UsbTransport};
use crate::protocol::translate;

pub mod config;
pub mod stats;

pub use config::{RelayConfig, RetryPolicy};
pub use stats::{Census, RelayStats};

use stats::bump;

//==================================================================================Outcomes
/// What a single relay step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// Nothing to do: empty queue or nothing pending.
    Idle,
    /// USB transport not ready; `bus_to_host` left untouched.
    NotReady,
    /// Host frame accepted by the bus and queued as an echo.
    Sent,
    /// Record handed to the USB transport; buffer back in the pool.
    Delivered,
    /// Bus frame read and queued for the host.
    Received,
    /// Reception was pending but the read returned nothing.
    NoData,
    /// Reception was pending but the pool was empty; the frame was not read.
    Dropped,
    /// Transmission failed; frame re-queued at the head for retry.
    Retry,
    /// Retry budget exhausted; buffer back in the pool.
    Abandoned,
    /// Destination queue full; buffer back in the pool. See [`FrameRelay`].
    Overflow,
}

/// Outcomes of one pass over the three relay steps, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    pub host_to_bus: StepOutcome,
    pub bus_to_host: StepOutcome,
    pub bus_ingest: StepOutcome,
}

/// Container currently holding a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Owner {
    Free,
    HostToBus,
    BusToHost,
}

#[derive(Clone, Copy)]
enum Lane {
    HostToBus,
    BusToHost,
}

//==================================================================================FrameRelay
/// Relay scheduler over a pool of `N` buffers.
///
/// Both queues hold `N` tokens and the pool issues only `N`, so a push never
/// meets a full queue. Every push still goes through one guard that hands a
/// refused token back to the pool and reports [`StepOutcome::Overflow`].
pub struct FrameRelay<const N: usize> {
    pool: FramePool<N>,
    host_to_bus: BoundedQueue<FrameToken, N>,
    bus_to_host: BoundedQueue<FrameToken, N>,
    /// Consecutive transmit failures of the frame held by each slot.
    failures: [u8; N],
    config: RelayConfig,
    stats: RelayStats,
}

impl<const N: usize> Default for FrameRelay<N> {
    fn default() -> Self {
        Self::new(RelayConfig::default())
    }
}

impl<const N: usize> FrameRelay<N> {
    /// Create a relay with every buffer in the pool.
    pub fn new(config: RelayConfig) -> Self {
        Self {
            pool: FramePool::new(),
            host_to_bus: BoundedQueue::new(),
            bus_to_host: BoundedQueue::new(),
            failures: [0; N],
            config,
            stats: RelayStats::default(),
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    //==============================================================================Host ingress
    /// Store a raw record received from the host on the bulk-OUT endpoint.
    pub fn submit_from_host(&mut self, raw: &[u8]) -> Result<(), SubmitError> {
        let frame = HostFrame::from_bytes(raw).map_err(|err| {
            bump(&mut self.stats.host_rejected);
            #[cfg(feature = "defmt")]
            defmt::warn!("Malformed host frame: {}", err);
            err
        })?;
        self.submit(frame)
    }

    /// Queue a decoded host record for transmission on the bus.
    pub fn submit(&mut self, frame: HostFrame) -> Result<(), SubmitError> {
        let Some(token) = self.pool.acquire() else {
            bump(&mut self.stats.host_rejected);
            #[cfg(feature = "defmt")]
            defmt::warn!("Host frame refused: pool exhausted");
            return Err(SubmitError::PoolExhausted);
        };

        *self.pool.get_mut(&token) = frame;
        self.failures[token.index()] = 0;

        if self.enqueue(Lane::HostToBus, token, false) {
            Ok(())
        } else {
            Err(SubmitError::QueueFull)
        }
    }

    //==============================================================================Steps
    /// One pass: host → bus, bus → host, then bus ingestion.
    pub fn step<C, U>(&mut self, can: &mut C, usb: &mut U) -> StepReport
    where
        C: CanTransceiver,
        U: UsbTransport,
    {
        StepReport {
            host_to_bus: self.relay_host_to_bus(can),
            bus_to_host: self.relay_bus_to_host(usb),
            bus_ingest: self.ingest_from_bus(can),
        }
    }

    /// Send the head of `host_to_bus` to the bus.
    pub fn relay_host_to_bus<C: CanTransceiver>(&mut self, can: &mut C) -> StepOutcome {
        let Some(token) = self.host_to_bus.pop_front() else {
            return StepOutcome::Idle;
        };

        let descriptor = translate::to_bus_frame(self.pool.get(&token));
        match can.send(&descriptor, self.config.can_send_timeout_ms) {
            Ok(()) => {
                self.failures[token.index()] = 0;
                bump(&mut self.stats.echoed);
                self.forward(Lane::BusToHost, token, false, StepOutcome::Sent)
            }
            Err(_err) => {
                if self.register_failure(&token) {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Bus transmit abandoned for slot {}", token.index());
                    bump(&mut self.stats.tx_abandoned);
                    self.recycle(token);
                    return StepOutcome::Abandoned;
                }
                #[cfg(feature = "defmt")]
                defmt::trace!("Bus busy, retrying slot {}", token.index());
                bump(&mut self.stats.can_tx_retries);
                self.forward(Lane::HostToBus, token, true, StepOutcome::Retry)
            }
        }
    }

    /// Hand the head of `bus_to_host` to the USB transport when it is ready.
    pub fn relay_bus_to_host<U: UsbTransport>(&mut self, usb: &mut U) -> StepOutcome {
        if !usb.is_ready() {
            return StepOutcome::NotReady;
        }
        let Some(token) = self.bus_to_host.pop_front() else {
            return StepOutcome::Idle;
        };

        let bytes = self.pool.get(&token).to_bytes();
        match usb.transmit(&bytes) {
            Ok(()) => {
                bump(&mut self.stats.delivered);
                self.recycle(token);
                StepOutcome::Delivered
            }
            Err(_err) => {
                if self.register_failure(&token) {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("USB transmit abandoned for slot {}", token.index());
                    bump(&mut self.stats.usb_abandoned);
                    self.recycle(token);
                    return StepOutcome::Abandoned;
                }
                #[cfg(feature = "defmt")]
                defmt::trace!("USB transmit failed, retrying slot {}", token.index());
                bump(&mut self.stats.usb_tx_retries);
                self.forward(Lane::BusToHost, token, true, StepOutcome::Retry)
            }
        }
    }

    /// Read a pending bus frame into a free buffer and queue it for the host.
    ///
    /// With the pool empty the frame is left unread and `rx_dropped` counts it.
    pub fn ingest_from_bus<C: CanTransceiver>(&mut self, can: &mut C) -> StepOutcome {
        if !can.is_rx_pending() {
            return StepOutcome::Idle;
        }
        let Some(token) = self.pool.acquire() else {
            #[cfg(feature = "defmt")]
            defmt::debug!("Pool exhausted, bus frame not read");
            bump(&mut self.stats.rx_dropped);
            return StepOutcome::Dropped;
        };

        match can.receive(self.config.can_receive_timeout_ms) {
            Some(frame) => {
                translate::write_received(self.pool.get_mut(&token), &frame);
                self.failures[token.index()] = 0;
                bump(&mut self.stats.received);
                self.forward(Lane::BusToHost, token, false, StepOutcome::Received)
            }
            None => {
                bump(&mut self.stats.rx_empty_polls);
                self.pool.release(token);
                StepOutcome::NoData
            }
        }
    }

    //==============================================================================Inspection
    /// Buffers per container.
    pub fn census(&self) -> Census {
        Census {
            free: self.pool.free_len(),
            host_to_bus: self.host_to_bus.len(),
            bus_to_host: self.bus_to_host.len(),
        }
    }

    /// Check that every slot is held by exactly one container and return
    /// the owner of each slot.
    pub fn audit(&self) -> Result<[Owner; N], AuditError> {
        let mut owners: [Option<Owner>; N] = [None; N];

        let free = self.pool.free_slots().map(|slot| (slot, Owner::Free));
        let outbound = self
            .host_to_bus
            .iter()
            .map(|token| (token.index(), Owner::HostToBus));
        let inbound = self
            .bus_to_host
            .iter()
            .map(|token| (token.index(), Owner::BusToHost));

        for (slot, owner) in free.chain(outbound).chain(inbound) {
            if owners[slot].replace(owner).is_some() {
                return Err(AuditError::Duplicate { slot });
            }
        }

        let mut resolved = [Owner::Free; N];
        for (slot, owner) in owners.iter().enumerate() {
            resolved[slot] = owner.ok_or(AuditError::Missing { slot })?;
        }
        Ok(resolved)
    }

    /// Records waiting for the bus, head first.
    pub fn host_to_bus_frames(&self) -> impl Iterator<Item = &HostFrame> + '_ {
        self.host_to_bus.iter().map(move |token| self.pool.get(token))
    }

    /// Records waiting for the host, head first.
    pub fn bus_to_host_frames(&self) -> impl Iterator<Item = &HostFrame> + '_ {
        self.bus_to_host.iter().map(move |token| self.pool.get(token))
    }

    //==============================================================================Internals
    fn lane_mut(&mut self, lane: Lane) -> &mut BoundedQueue<FrameToken, N> {
        match lane {
            Lane::HostToBus => &mut self.host_to_bus,
            Lane::BusToHost => &mut self.bus_to_host,
        }
    }

    /// Push onto `lane` and report `done`, or `Overflow` when the queue is full.
    fn forward(
        &mut self,
        lane: Lane,
        token: FrameToken,
        front: bool,
        done: StepOutcome,
    ) -> StepOutcome {
        if self.enqueue(lane, token, front) {
            done
        } else {
            StepOutcome::Overflow
        }
    }

    /// Push onto `lane`; a full queue sends the buffer back to the pool.
    fn enqueue(&mut self, lane: Lane, token: FrameToken, front: bool) -> bool {
        let queue = self.lane_mut(lane);
        let pushed = if front {
            queue.push_front(token)
        } else {
            queue.push_back(token)
        };

        match pushed {
            Ok(()) => true,
            Err(token) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Queue full, slot {} returned to pool", token.index());
                bump(&mut self.stats.queue_overflows);
                self.recycle(token);
                false
            }
        }
    }

    /// Count a failed attempt; `true` when the retry policy gives up.
    fn register_failure(&mut self, token: &FrameToken) -> bool {
        let failures = &mut self.failures[token.index()];
        *failures = failures.saturating_add(1);
        self.config.retry.is_exhausted(*failures)
    }

    fn recycle(&mut self, token: FrameToken) {
        self.failures[token.index()] = 0;
        self.pool.release(token);
    }
}
