//! Test doubles: a scripted shift-register peripheral and a bit-level master
//!
//! [`MockBus`] models the peripheral registers. [`Bench`] plays the bus
//! master: it clocks bits through the mock exactly as the hardware would,
//! combining the master's and the slave's open-drain outputs on the data
//! line, and raises shift-complete when the armed count runs out.

use core::cell::Cell;

use usitwi_hal::{BusEvent, Level, LineDirection, ShiftWidth, UsiBus};

use crate::address::TransferDirection;
use crate::config::SlaveConfig;
use crate::shared::SlaveQueues;
use crate::slave::UsiSlave;

/// Register-level stand-in for the peripheral
#[derive(Debug)]
pub struct MockBus {
    pub clock: Option<(LineDirection, Level)>,
    pub data_direction: LineDirection,
    pub shift_register: u8,
    pub armed: Option<ShiftWidth>,
    pub bits_left: u8,
    pub start_enabled: bool,
    pub shift_enabled: bool,
    pub stop_flag: bool,
    pub collision_flag: bool,
    /// Number of upcoming clock samples that read high
    pub clock_high_polls: Cell<u32>,
    pub clock_reads: Cell<u32>,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            clock: None,
            data_direction: LineDirection::Input,
            shift_register: 0,
            armed: None,
            bits_left: 0,
            start_enabled: false,
            shift_enabled: false,
            stop_flag: false,
            collision_flag: false,
            clock_high_polls: Cell::new(0),
            clock_reads: Cell::new(0),
        }
    }
}

impl UsiBus for MockBus {
    fn set_clock_line(&mut self, direction: LineDirection, level: Level) {
        self.clock = Some((direction, level));
    }

    fn set_data_line(&mut self, direction: LineDirection, _level: Level) {
        self.data_direction = direction;
    }

    fn read_clock_line(&self) -> bool {
        self.clock_reads.set(self.clock_reads.get() + 1);
        let polls = self.clock_high_polls.get();
        if polls > 0 {
            self.clock_high_polls.set(polls - 1);
            true
        } else {
            false
        }
    }

    fn read_stop_condition_flag(&self) -> bool {
        self.stop_flag
    }

    fn read_collision_flag(&self) -> bool {
        self.collision_flag
    }

    fn arm_shift(&mut self, width: ShiftWidth) {
        self.armed = Some(width);
        self.bits_left = width.bits();
        self.stop_flag = false;
        self.collision_flag = false;
    }

    fn clear_status_flags(&mut self) {
        self.stop_flag = false;
        self.collision_flag = false;
    }

    fn enable_event(&mut self, event: BusEvent) {
        match event {
            BusEvent::StartDetected => self.start_enabled = true,
            BusEvent::ShiftComplete => self.shift_enabled = true,
        }
    }

    fn disable_event(&mut self, event: BusEvent) {
        match event {
            BusEvent::StartDetected => self.start_enabled = false,
            BusEvent::ShiftComplete => self.shift_enabled = false,
        }
    }

    fn read_shift_register(&self) -> u8 {
        self.shift_register
    }

    fn write_shift_register(&mut self, byte: u8) {
        self.shift_register = byte;
    }
}

/// Simulated bus master wired to a slave on a mock peripheral
pub struct Bench<'q, const N: usize> {
    pub slave: UsiSlave<'q, MockBus, N>,
    /// Counter ran out with shift-complete enabled, event not yet delivered
    overflow_pending: bool,
}

impl<'q, const N: usize> Bench<'q, N> {
    pub fn new(queues: &'q SlaveQueues<N>, config: SlaveConfig) -> Self {
        Self {
            slave: UsiSlave::init(MockBus::new(), queues, config),
            overflow_pending: false,
        }
    }

    /// Start (or repeated start) condition
    pub fn start(&mut self) {
        let bus = self.slave.bus_mut();
        assert!(bus.start_enabled, "start-condition interrupt disabled");
        bus.stop_flag = false;
        self.overflow_pending = false;
        self.slave.on_start_detected();
    }

    /// Stop condition; the peripheral only flags it
    pub fn stop(&mut self) {
        self.slave.bus_mut().stop_flag = true;
    }

    /// One clock pulse; returns the level seen on the data line
    fn clock(&mut self, master_bit: bool) -> bool {
        let bus = self.slave.bus_mut();
        let slave_bit = match bus.data_direction {
            LineDirection::Output => bus.shift_register & 0x80 != 0,
            LineDirection::Input => true,
        };
        let line = master_bit && slave_bit;

        bus.shift_register = (bus.shift_register << 1) | line as u8;
        if bus.bits_left > 0 {
            bus.bits_left -= 1;
            if bus.bits_left == 0 {
                bus.armed = None;
                if bus.shift_enabled {
                    self.overflow_pending = true;
                    self.deliver_shift_complete();
                }
            }
        }
        line
    }

    /// Raise the shift-complete interrupt
    ///
    /// Panics unless the counter actually overflowed: the state machine
    /// has no defined behaviour for events out of hardware order.
    pub fn deliver_shift_complete(&mut self) {
        assert!(
            self.overflow_pending && self.slave.bus().shift_enabled,
            "spurious shift-complete"
        );
        self.overflow_pending = false;
        self.slave.on_shift_complete();
    }

    /// Clock a byte out MSB first, stopping before the acknowledge slot
    pub fn shift_out(&mut self, byte: u8) {
        for bit in (0..8).rev() {
            self.clock(byte >> bit & 1 != 0);
        }
    }

    /// Release the line for the acknowledge slot; true if the slave ACKed
    pub fn acknowledged(&mut self) -> bool {
        !self.clock(true)
    }

    /// Send a byte MSB first, then sample the acknowledge slot
    ///
    /// Returns true if the slave ACKed.
    pub fn write_byte(&mut self, byte: u8) -> bool {
        self.shift_out(byte);
        self.acknowledged()
    }

    /// Send the header naming the slave under test
    pub fn address(&mut self, direction: TransferDirection) -> bool {
        let header = self.slave.config().address.header(direction);
        self.write_byte(header)
    }

    /// Read a byte MSB first, then answer ACK (`true`) or NACK
    pub fn read_byte(&mut self, ack: bool) -> u8 {
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | self.clock(true) as u8;
        }
        self.clock(!ack);
        byte
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_line_reads_high() {
        let queues: SlaveQueues = SlaveQueues::new();
        let mut bench = Bench::new(&queues, SlaveConfig::from_address(0x10).unwrap());
        // Nobody addressed, nobody drives
        assert_eq!(bench.read_byte(false), 0xFF);
        assert!(bench.slave.is_listening());
    }

    #[test]
    fn test_wired_and() {
        let queues: SlaveQueues = SlaveQueues::new();
        let mut bench = Bench::new(&queues, SlaveConfig::from_address(0x10).unwrap());
        let bus = bench.slave.bus_mut();
        bus.data_direction = LineDirection::Output;
        bus.shift_register = 0x00;

        // Slave holds the line low regardless of the master
        assert!(!bench.clock(true));
    }
}
