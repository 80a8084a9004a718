//! Driver configuration

use crate::address::SlaveAddress;
use crate::error::AddressError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What to do with a byte that arrives while the receive queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RxOverflow {
    /// Discard the byte but still ACK it; the master sees no difference
    #[default]
    Drop,
    /// Discard the byte and answer NACK so the master stops writing
    Nack,
}

/// Slave configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlaveConfig {
    /// Own 7-bit address
    pub address: SlaveAddress,
    /// Receive overflow handling
    pub rx_overflow: RxOverflow,
}

impl SlaveConfig {
    /// Configuration with the default overflow policy
    pub const fn new(address: SlaveAddress) -> Self {
        Self {
            address,
            rx_overflow: RxOverflow::Drop,
        }
    }

    /// Build from a raw address value
    pub fn from_address(address: u8) -> Result<Self, AddressError> {
        Ok(Self::new(SlaveAddress::new(address)?))
    }

    /// Replace the overflow policy
    pub const fn with_rx_overflow(mut self, rx_overflow: RxOverflow) -> Self {
        self.rx_overflow = rx_overflow;
        self
    }
}
