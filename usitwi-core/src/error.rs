//! Error types
//!
//! Nothing in the interrupt path fails; these only cover construction and
//! the non-blocking foreground calls.

use core::fmt;

/// Invalid slave address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressError {
    /// Value does not fit in 7 bits
    OutOfRange(u8),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::OutOfRange(value) => {
                write!(f, "address {:#04x} does not fit in 7 bits", value)
            }
        }
    }
}

/// Transmit queue had no free slot
///
/// Carries the rejected byte back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull(pub u8);

impl fmt::Display for QueueFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transmit queue full, byte {:#04x} rejected", self.0)
    }
}
