//! USI peripheral handle

use usitwi_hal::{BusEvent, Level, LineDirection, ShiftWidth, UsiBus};

use crate::regs::{
    arm_word, clear_word, control_word, DDRB, PINB, PORTB, SCL_PIN, SDA_PIN, USICR, USIDC,
    USIDR, USIPF, USISR,
};

/// The ATtiny2313 Universal Serial Interface in two-wire mode
///
/// Keeps a shadow of the two interrupt enables so that each change is a
/// single write of the complete control word.
pub struct Attiny2313Usi {
    start_enabled: bool,
    shift_enabled: bool,
}

impl Attiny2313Usi {
    /// Take the USI and port B pins 5 and 7
    ///
    /// # Safety
    ///
    /// At most one instance may exist, and nothing else may touch USIDR,
    /// USISR, USICR or the SDA/SCL bits of port B while it is alive.
    pub unsafe fn steal() -> Self {
        Self {
            start_enabled: false,
            shift_enabled: false,
        }
    }

    fn read(&self, register: *mut u8) -> u8 {
        // SAFETY: fixed, valid I/O address; exclusive access per `steal`
        unsafe { register.read_volatile() }
    }

    fn write(&mut self, register: *mut u8, value: u8) {
        // SAFETY: fixed, valid I/O address; exclusive access per `steal`
        unsafe { register.write_volatile(value) }
    }

    fn write_bit(&mut self, register: *mut u8, bit: u8, set: bool) {
        let value = self.read(register);
        let value = if set {
            value | (1 << bit)
        } else {
            value & !(1 << bit)
        };
        self.write(register, value);
    }

    fn configure_pin(&mut self, pin: u8, direction: LineDirection, level: Level) {
        self.write_bit(PORTB, pin, level.is_high());
        self.write_bit(DDRB, pin, direction == LineDirection::Output);
    }

    fn write_control(&mut self) {
        self.write(USICR, control_word(self.start_enabled, self.shift_enabled));
    }

    fn set_event(&mut self, event: BusEvent, enabled: bool) {
        match event {
            BusEvent::StartDetected => self.start_enabled = enabled,
            BusEvent::ShiftComplete => self.shift_enabled = enabled,
        }
        self.write_control();
    }
}

impl UsiBus for Attiny2313Usi {
    fn set_clock_line(&mut self, direction: LineDirection, level: Level) {
        self.configure_pin(SCL_PIN, direction, level);
    }

    fn set_data_line(&mut self, direction: LineDirection, level: Level) {
        self.configure_pin(SDA_PIN, direction, level);
    }

    fn read_clock_line(&self) -> bool {
        self.read(PINB) & (1 << SCL_PIN) != 0
    }

    fn read_stop_condition_flag(&self) -> bool {
        self.read(USISR) & USIPF != 0
    }

    fn read_collision_flag(&self) -> bool {
        self.read(USISR) & USIDC != 0
    }

    fn arm_shift(&mut self, width: ShiftWidth) {
        self.write(USISR, arm_word(width));
    }

    fn clear_status_flags(&mut self) {
        self.write(USISR, clear_word());
    }

    fn enable_event(&mut self, event: BusEvent) {
        self.set_event(event, true);
    }

    fn disable_event(&mut self, event: BusEvent) {
        self.set_event(event, false);
    }

    fn read_shift_register(&self) -> u8 {
        self.read(USIDR)
    }

    fn write_shift_register(&mut self, byte: u8) {
        self.write(USIDR, byte);
    }
}
