//! Lock-free single-producer/single-consumer byte queue
//!
//! Bridges interrupt context and foreground code. The producer owns `head`,
//! the consumer owns `tail`; each side only ever loads the other's index.
//! One slot is always left unused so that `head == tail` means empty and
//! `head + 1 == tail` means full.
//!
//! Slots are atomics as well, so a queue shared between two producers can
//! lose bytes but can never observe torn state.

use portable_atomic::{AtomicU8, Ordering};

/// Default number of slots (one of them always stays unused)
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Fixed-size circular byte buffer
///
/// `N` must be a power of two between 2 and 256; the queue holds at most
/// `N - 1` bytes.
pub struct ByteQueue<const N: usize = DEFAULT_QUEUE_CAPACITY> {
    slots: [AtomicU8; N],
    /// Next slot to write (producer-owned)
    head: AtomicU8,
    /// Next slot to read (consumer-owned)
    tail: AtomicU8,
}

impl<const N: usize> ByteQueue<N> {
    const VALID: () = assert!(
        N >= 2 && N <= 256 && N.is_power_of_two(),
        "queue size must be a power of two between 2 and 256"
    );

    const MASK: u8 = (N - 1) as u8;

    /// Create an empty queue
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;

        Self {
            slots: [const { AtomicU8::new(0) }; N],
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
        }
    }

    #[inline]
    fn advance(index: u8) -> u8 {
        index.wrapping_add(1) & Self::MASK
    }

    /// Append a byte
    ///
    /// Returns false without storing anything if the queue is full.
    /// Must only be called from the producer context.
    pub fn try_push(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next = Self::advance(head);

        if next == self.tail.load(Ordering::Acquire) {
            return false;
        }

        self.slots[head as usize].store(byte, Ordering::Relaxed);
        // Publish the slot before the index
        self.head.store(next, Ordering::Release);
        true
    }

    /// Remove the oldest byte
    ///
    /// Must only be called from the consumer context.
    pub fn try_pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);

        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        let byte = self.slots[tail as usize].load(Ordering::Relaxed);
        // Hand the slot back to the producer
        self.tail.store(Self::advance(tail), Ordering::Release);
        Some(byte)
    }

    /// Check if no bytes are queued
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Check if the next push would fail
    pub fn is_full(&self) -> bool {
        Self::advance(self.head.load(Ordering::Acquire)) == self.tail.load(Ordering::Acquire)
    }

    /// Number of queued bytes
    ///
    /// Only a snapshot when the other side is running concurrently.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head.wrapping_sub(tail) & Self::MASK) as usize
    }

    /// Maximum number of bytes the queue can hold
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Discard everything
    ///
    /// Only sound while neither the producer nor the consumer is active,
    /// i.e. before the bus interrupts are enabled.
    pub(crate) fn clear(&self) {
        self.tail.store(0, Ordering::Relaxed);
        self.head.store(0, Ordering::Release);
    }
}

impl<const N: usize> Default for ByteQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for ByteQueue<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteQueue")
            .field("head", &self.head.load(Ordering::Relaxed))
            .field("tail", &self.tail.load(Ordering::Relaxed))
            .field("len", &self.len())
            .finish()
    }
}
