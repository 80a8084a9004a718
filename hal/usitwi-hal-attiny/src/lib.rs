//! ATtiny-specific HAL for usitwi
//!
//! Implements [`usitwi_hal::UsiBus`] on top of the Universal Serial
//! Interface of the ATtiny2313: SDA on PB5, SCL on PB7.
//!
//! # Layout
//!
//! - [`regs`] - register addresses, bit positions and the pure functions
//!   that compose control/status words (host-testable)
//! - [`usi`] - the peripheral handle performing the volatile accesses
//!
//! Interrupt vector binding stays in the application; forward `USI_START`
//! and `USI_OVERFLOW` to the slave's event handlers.

#![cfg_attr(not(test), no_std)]

pub mod regs;
pub mod usi;

pub use usi::Attiny2313Usi;
