//! Protocol state definition
//!
//! Each state names what the *next* shift-complete event will mean, and
//! therefore how the peripheral has to be set up while waiting for it.
//! Address headers and payload bytes are 8-bit shifts; every acknowledge
//! slot is a 1-bit shift, so consecutive states alternate between the two.

use usitwi_hal::{LineDirection, ShiftWidth};

/// Slave protocol states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolState {
    /// Shifting in the address header after a start condition
    #[default]
    CheckAddress,
    /// Address ACK (or a master ACK) done, next byte goes out
    SendData,
    /// Shifting a byte out to the master
    RequestReplyAfterSend,
    /// Sampling the master's ACK/NACK for the byte just sent
    CheckReplyAfterSend,
    /// Driving the ACK slot, then a data byte comes in
    RequestData,
    /// Shifting a data byte in from the master
    ReceiveDataAndAck,
}

impl ProtocolState {
    /// Shift width armed while waiting in this state
    pub fn armed_width(self) -> ShiftWidth {
        match self {
            ProtocolState::CheckAddress
            | ProtocolState::RequestReplyAfterSend
            | ProtocolState::ReceiveDataAndAck => ShiftWidth::Byte,
            ProtocolState::SendData
            | ProtocolState::CheckReplyAfterSend
            | ProtocolState::RequestData => ShiftWidth::Bit,
        }
    }

    /// Data line direction while waiting in this state
    ///
    /// The slave drives the line for its own ACK slots and for bytes it
    /// transmits, and releases it whenever the master is talking.
    pub fn data_direction(self) -> LineDirection {
        match self {
            ProtocolState::SendData
            | ProtocolState::RequestReplyAfterSend
            | ProtocolState::RequestData => LineDirection::Output,
            ProtocolState::CheckAddress
            | ProtocolState::CheckReplyAfterSend
            | ProtocolState::ReceiveDataAndAck => LineDirection::Input,
        }
    }
}
