//! usitwi Hardware Abstraction Layer
//!
//! This crate defines the capability set the two-wire slave engine needs from
//! a shift-register peripheral. Chip-specific crates implement it; the protocol
//! engine in `usitwi-core` only ever talks to these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (foreground + ISR glue)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  usitwi-core (state machine, queues)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  usitwi-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ usitwi-hal-   │
//!             │    attiny     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`bus::UsiBus`] - Line control, shift counter, status flags, events

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod line;

// Re-export key types at crate root for convenience
pub use bus::{BusEvent, ShiftWidth, UsiBus};
pub use line::{Level, LineDirection};
