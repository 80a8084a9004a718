//! State shared between interrupt context and foreground code
//!
//! Everything in [`SlaveQueues`] is atomic, so it can live in a `static`
//! and be reached from both sides without a lock. Ownership of each field
//! is still split by context:
//!
//! | Field | Written by |
//! |---|---|
//! | receive queue head, counters | interrupt |
//! | receive queue tail | foreground |
//! | transmit queue head | foreground |
//! | transmit queue tail | interrupt |
//!
//! Foreground code works through [`SlaveHandle`].

use core::future::poll_fn;
use core::task::Poll;

use embassy_sync::waitqueue::AtomicWaker;
use portable_atomic::{AtomicU16, Ordering};

use crate::error::QueueFull;
use crate::queue::{ByteQueue, DEFAULT_QUEUE_CAPACITY};

/// Receive/transmit queues plus the wakers and counters tied to them
pub struct SlaveQueues<const N: usize = DEFAULT_QUEUE_CAPACITY> {
    pub(crate) rx: ByteQueue<N>,
    pub(crate) tx: ByteQueue<N>,
    pub(crate) rx_waker: AtomicWaker,
    pub(crate) tx_waker: AtomicWaker,
    pub(crate) counters: Counters,
}

impl<const N: usize> SlaveQueues<N> {
    /// Create empty queues; usable in a `static` initializer
    pub const fn new() -> Self {
        Self {
            rx: ByteQueue::new(),
            tx: ByteQueue::new(),
            rx_waker: AtomicWaker::new(),
            tx_waker: AtomicWaker::new(),
            counters: Counters::new(),
        }
    }

    /// Foreground access to the queues
    pub fn handle(&self) -> SlaveHandle<'_, N> {
        SlaveHandle { queues: self }
    }

    /// Empty both queues and zero the counters (interrupts must be off)
    pub(crate) fn reset(&self) {
        self.rx.clear();
        self.tx.clear();
        self.counters.reset();
    }
}

impl<const N: usize> Default for SlaveQueues<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the interrupt-side counters
///
/// All counters wrap at `u16::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlaveStats {
    /// Bytes stored in the receive queue
    pub received: u16,
    /// Bytes loaded into the shift register for the master
    pub transmitted: u16,
    /// Bytes lost because the receive queue was full
    pub dropped: u16,
    /// Read transactions ended by a master NACK
    pub nacked: u16,
    /// Shifts during which the collision flag was raised
    pub collisions: u16,
}

/// Event counters, written only from interrupt context
pub(crate) struct Counters {
    received: AtomicU16,
    transmitted: AtomicU16,
    dropped: AtomicU16,
    nacked: AtomicU16,
    collisions: AtomicU16,
}

impl Counters {
    const fn new() -> Self {
        Self {
            received: AtomicU16::new(0),
            transmitted: AtomicU16::new(0),
            dropped: AtomicU16::new(0),
            nacked: AtomicU16::new(0),
            collisions: AtomicU16::new(0),
        }
    }

    // Single writer: load + store is enough, no read-modify-write needed
    fn bump(counter: &AtomicU16) {
        let value = counter.load(Ordering::Relaxed);
        counter.store(value.wrapping_add(1), Ordering::Relaxed);
    }

    pub(crate) fn received(&self) {
        Self::bump(&self.received);
    }

    pub(crate) fn transmitted(&self) {
        Self::bump(&self.transmitted);
    }

    pub(crate) fn dropped(&self) {
        Self::bump(&self.dropped);
    }

    pub(crate) fn nacked(&self) {
        Self::bump(&self.nacked);
    }

    pub(crate) fn collision(&self) {
        Self::bump(&self.collisions);
    }

    fn reset(&self) {
        for counter in [
            &self.received,
            &self.transmitted,
            &self.dropped,
            &self.nacked,
            &self.collisions,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> SlaveStats {
        SlaveStats {
            received: self.received.load(Ordering::Relaxed),
            transmitted: self.transmitted.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            nacked: self.nacked.load(Ordering::Relaxed),
            collisions: self.collisions.load(Ordering::Relaxed),
        }
    }
}

/// Foreground side of the slave driver
///
/// Produces into the transmit queue and consumes from the receive queue.
/// The blocking calls spin until the interrupt side makes room or delivers
/// data; they have no timeout, so they never return if the master stops
/// clocking.
#[derive(Clone, Copy)]
pub struct SlaveHandle<'a, const N: usize = DEFAULT_QUEUE_CAPACITY> {
    queues: &'a SlaveQueues<N>,
}

impl<'a, const N: usize> SlaveHandle<'a, N> {
    /// Queue a byte for the next master read, spinning while the queue is full
    pub fn queue_transmit(&self, byte: u8) {
        while !self.queues.tx.try_push(byte) {
            core::hint::spin_loop();
        }
    }

    /// Queue a byte without waiting
    pub fn try_queue_transmit(&self, byte: u8) -> Result<(), QueueFull> {
        if self.queues.tx.try_push(byte) {
            Ok(())
        } else {
            Err(QueueFull(byte))
        }
    }

    /// Queue a byte, suspending the task while the queue is full
    pub async fn queue_transmit_async(&self, byte: u8) {
        poll_fn(|cx| {
            if self.queues.tx.try_push(byte) {
                return Poll::Ready(());
            }
            self.queues.tx_waker.register(cx.waker());
            // The interrupt may have freed a slot before the waker was stored
            if self.queues.tx.try_push(byte) {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await
    }

    /// Take the oldest received byte, spinning while none is available
    pub fn receive_byte(&self) -> u8 {
        loop {
            if let Some(byte) = self.queues.rx.try_pop() {
                return byte;
            }
            core::hint::spin_loop();
        }
    }

    /// Take the oldest received byte without waiting
    pub fn try_receive_byte(&self) -> Option<u8> {
        self.queues.rx.try_pop()
    }

    /// Take the oldest received byte, suspending the task until one arrives
    pub async fn receive_byte_async(&self) -> u8 {
        poll_fn(|cx| {
            if let Some(byte) = self.queues.rx.try_pop() {
                return Poll::Ready(byte);
            }
            self.queues.rx_waker.register(cx.waker());
            match self.queues.rx.try_pop() {
                Some(byte) => Poll::Ready(byte),
                None => Poll::Pending,
            }
        })
        .await
    }

    /// Take every byte received so far, up to `M`
    pub fn drain_received<const M: usize>(&self) -> heapless::Vec<u8, M> {
        core::iter::from_fn(|| self.queues.rx.try_pop())
            .take(M)
            .collect()
    }

    /// Check if at least one received byte is waiting
    pub fn has_received_data(&self) -> bool {
        !self.queues.rx.is_empty()
    }

    /// Number of bytes still waiting to be read by the master
    pub fn transmit_pending(&self) -> usize {
        self.queues.tx.len()
    }

    /// Current interrupt-side counters
    pub fn stats(&self) -> SlaveStats {
        self.queues.counters.snapshot()
    }
}
