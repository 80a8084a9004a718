//! Interrupt side of the slave driver
//!
//! [`UsiSlave`] owns the bus peripheral and the protocol state. The platform
//! glue moves it into interrupt context and forwards the two peripheral
//! vectors to [`UsiSlave::on_start_detected`] and
//! [`UsiSlave::on_shift_complete`]:
//!
//! ```ignore
//! static QUEUES: SlaveQueues = SlaveQueues::new();
//! static SLAVE: Mutex<RefCell<Option<UsiSlave<'static, Attiny2313Usi>>>> =
//!     Mutex::new(RefCell::new(None));
//!
//! #[avr_device::interrupt(attiny2313)]
//! fn USI_START() {
//!     avr_device::interrupt::free(|cs| {
//!         if let Some(slave) = SLAVE.borrow(cs).borrow_mut().as_mut() {
//!             slave.on_start_detected();
//!         }
//!     });
//! }
//! ```
//!
//! Transaction flow, one row per shift-complete event:
//!
//! ```text
//! master write:  CheckAddress → RequestData → ReceiveDataAndAck → RequestData → …
//! master read:   CheckAddress → SendData → RequestReplyAfterSend
//!                             → CheckReplyAfterSend (ACK) → RequestReplyAfterSend → …
//!                             → CheckReplyAfterSend (NACK) → listening
//! ```

use usitwi_hal::{BusEvent, Level, LineDirection, UsiBus};

use crate::address::TransferDirection;
use crate::config::{RxOverflow, SlaveConfig};
use crate::queue::DEFAULT_QUEUE_CAPACITY;
use crate::shared::{SlaveHandle, SlaveQueues};
use crate::state::ProtocolState;

/// Shift register value that drives ACK in the next 1-bit slot
const ACK: u8 = 0x00;

/// Shift register value that leaves the line released (NACK)
const NACK: u8 = 0xFF;

/// Two-wire slave protocol engine
pub struct UsiSlave<'a, B, const N: usize = DEFAULT_QUEUE_CAPACITY> {
    bus: B,
    queues: &'a SlaveQueues<N>,
    config: SlaveConfig,
    state: ProtocolState,
    /// Shift-complete armed; false while waiting for a start condition
    active: bool,
}

impl<'a, B: UsiBus, const N: usize> UsiSlave<'a, B, N> {
    /// Reset the queues and put the peripheral into idle listening
    ///
    /// Must run before the bus interrupts are unmasked: it empties queues
    /// that the interrupt side would otherwise be using.
    pub fn init(mut bus: B, queues: &'a SlaveQueues<N>, config: SlaveConfig) -> Self {
        queues.reset();

        bus.disable_event(BusEvent::ShiftComplete);
        bus.set_clock_line(LineDirection::Output, Level::High);
        bus.set_data_line(LineDirection::Input, Level::High);
        bus.clear_status_flags();
        bus.enable_event(BusEvent::StartDetected);

        #[cfg(feature = "defmt")]
        defmt::debug!("USI slave listening on {=u8:#x}", config.address.get());

        Self {
            bus,
            queues,
            config,
            state: ProtocolState::CheckAddress,
            active: false,
        }
    }

    /// Handle a start (or repeated start) condition
    ///
    /// Aborts whatever transaction was in progress.
    pub fn on_start_detected(&mut self) {
        self.state = ProtocolState::CheckAddress;
        self.bus.set_data_line(LineDirection::Input, Level::High);

        // The first address bit starts once the master pulls the clock low
        while self.bus.read_clock_line() && !self.bus.read_stop_condition_flag() {
            core::hint::spin_loop();
        }

        self.bus.enable_event(BusEvent::ShiftComplete);
        self.bus.clear_status_flags();
        self.bus.arm_shift(ProtocolState::CheckAddress.armed_width());
        self.active = true;
    }

    /// Handle the shift counter reaching its armed bit count
    ///
    /// Only valid while a transaction is active; the peripheral never raises
    /// it otherwise because [`BusEvent::ShiftComplete`] is disabled.
    pub fn on_shift_complete(&mut self) {
        if self.bus.read_collision_flag() {
            self.queues.counters.collision();
        }

        match self.state {
            ProtocolState::CheckAddress => self.check_address(),
            ProtocolState::SendData => self.send_next(),
            ProtocolState::RequestReplyAfterSend => {
                self.bus.write_shift_register(0);
                self.enter(ProtocolState::CheckReplyAfterSend);
            }
            ProtocolState::CheckReplyAfterSend => {
                if self.bus.read_shift_register() & 0x01 != 0 {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("master NACK, {} bytes left", self.queues.tx.len());

                    self.queues.counters.nacked();
                    self.listen();
                } else {
                    self.send_next();
                }
            }
            ProtocolState::RequestData => self.enter(ProtocolState::ReceiveDataAndAck),
            ProtocolState::ReceiveDataAndAck => self.store_received(),
        }
    }

    fn check_address(&mut self) {
        let header = self.bus.read_shift_register();

        match self.config.address.match_header(header) {
            Some(direction) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("addressed: {=u8:#x} {}", header, direction);

                // Drive the address ACK, then branch on the R/W bit
                self.bus.write_shift_register(ACK);
                self.enter(match direction {
                    TransferDirection::Transmit => ProtocolState::SendData,
                    TransferDirection::Receive => ProtocolState::RequestData,
                });
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::trace!("ignoring header {=u8:#x}", header);

                self.listen();
            }
        }
    }

    /// Load the next transmit byte, or go idle once the queue is exhausted
    fn send_next(&mut self) {
        match self.queues.tx.try_pop() {
            Some(byte) => {
                self.queues.tx_waker.wake();
                self.queues.counters.transmitted();

                self.bus.write_shift_register(byte);
                self.enter(ProtocolState::RequestReplyAfterSend);
            }
            None => self.listen(),
        }
    }

    fn store_received(&mut self) {
        let byte = self.bus.read_shift_register();

        let reply = if self.queues.rx.try_push(byte) {
            self.queues.counters.received();
            self.queues.rx_waker.wake();
            ACK
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("receive queue full, dropping {=u8:#x}", byte);

            self.queues.counters.dropped();
            match self.config.rx_overflow {
                RxOverflow::Drop => ACK,
                RxOverflow::Nack => NACK,
            }
        };

        self.bus.write_shift_register(reply);
        self.enter(ProtocolState::RequestData);
    }

    /// Move to `next` and set the peripheral up for the shift it expects
    fn enter(&mut self, next: ProtocolState) {
        self.state = next;
        self.bus.set_data_line(next.data_direction(), Level::High);
        self.bus.arm_shift(next.armed_width());
    }

    /// Stop following the bus until the next start condition
    fn listen(&mut self) {
        self.bus.disable_event(BusEvent::ShiftComplete);
        self.bus.set_data_line(LineDirection::Input, Level::High);
        self.state = ProtocolState::CheckAddress;
        self.active = false;
    }

    /// Current protocol state
    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Check if the slave is idle, waiting for a start condition
    pub fn is_listening(&self) -> bool {
        !self.active
    }

    /// Active configuration
    pub fn config(&self) -> &SlaveConfig {
        &self.config
    }

    /// Foreground handle onto the same queues
    pub fn handle(&self) -> SlaveHandle<'a, N> {
        self.queues.handle()
    }

    /// Borrow the bus peripheral
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the bus peripheral
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give the peripheral back
    pub fn release(self) -> B {
        self.bus
    }
}
