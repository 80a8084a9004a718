//! Slave addressing
//!
//! The first byte after a start condition is the address header: seven
//! address bits followed by the read/write bit, most significant bit first.

use crate::error::AddressError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Header byte of a general call (broadcast write)
pub const GENERAL_CALL: u8 = 0x00;

/// Largest 7-bit address
pub const MAX_ADDRESS: u8 = 0x7F;

/// Direction of a transaction, from the slave's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferDirection {
    /// Master writes, slave receives (R/W bit 0)
    Receive,
    /// Master reads, slave transmits (R/W bit 1)
    Transmit,
}

impl TransferDirection {
    /// Decode the R/W bit of an address header
    pub fn from_header(header: u8) -> Self {
        if header & 0x01 != 0 {
            TransferDirection::Transmit
        } else {
            TransferDirection::Receive
        }
    }
}

/// Validated 7-bit slave address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct SlaveAddress(u8);

impl SlaveAddress {
    /// Create an address, rejecting values wider than 7 bits
    pub const fn new(address: u8) -> Result<Self, AddressError> {
        if address > MAX_ADDRESS {
            return Err(AddressError::OutOfRange(address));
        }
        Ok(Self(address))
    }

    /// The raw 7-bit value
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Header byte a master sends to address this slave
    pub const fn header(self, direction: TransferDirection) -> u8 {
        let rw = match direction {
            TransferDirection::Receive => 0,
            TransferDirection::Transmit => 1,
        };
        (self.0 << 1) | rw
    }

    /// Check an address header against this address
    ///
    /// Returns the transfer direction when the header is a general call or
    /// names this slave, `None` when the transaction is for someone else.
    pub fn match_header(self, header: u8) -> Option<TransferDirection> {
        if header == GENERAL_CALL || header >> 1 == self.0 {
            Some(TransferDirection::from_header(header))
        } else {
            None
        }
    }
}

impl TryFrom<u8> for SlaveAddress {
    type Error = AddressError;

    fn try_from(address: u8) -> Result<Self, Self::Error> {
        Self::new(address)
    }
}

impl From<SlaveAddress> for u8 {
    fn from(address: SlaveAddress) -> Self {
        address.0
    }
}
