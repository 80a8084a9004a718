//! Board-agnostic two-wire slave driver
//!
//! Turns a universal shift-register peripheral into an addressable
//! I2C-compatible bus slave. The crate contains everything that does not
//! depend on a specific chip:
//!
//! - Lock-free byte queues bridging interrupt and foreground context
//! - Address matching (own 7-bit address plus general call)
//! - The interrupt-driven protocol state machine
//! - The foreground driver API (blocking, non-blocking and async)
//!
//! # Contexts
//!
//! ```text
//!   bus edges ──► UsiSlave::on_start_detected / on_shift_complete   (ISR)
//!                         │                 ▲
//!                  rx.try_push          tx.try_pop
//!                         ▼                 │
//!                      SlaveQueues  (static, all atomics)
//!                         │                 ▲
//!                  rx.try_pop           tx.try_push
//!                         ▼                 │
//!   application ──► SlaveHandle::receive_byte / queue_transmit     (main)
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod address;
pub mod config;
pub mod error;
pub mod queue;
pub mod shared;
pub mod slave;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use address::{SlaveAddress, TransferDirection, GENERAL_CALL};
pub use config::{RxOverflow, SlaveConfig};
pub use error::{AddressError, QueueFull};
pub use queue::{ByteQueue, DEFAULT_QUEUE_CAPACITY};
pub use shared::{SlaveHandle, SlaveQueues, SlaveStats};
pub use slave::UsiSlave;
pub use state::ProtocolState;
pub use usitwi_hal::{BusEvent, ShiftWidth, UsiBus};
