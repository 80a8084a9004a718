//! USI and port B register map for the ATtiny2313
//!
//! Addresses are data-space addresses (I/O address + 0x20).

use usitwi_hal::ShiftWidth;

/// The address of the USI data register
pub const USIDR: *mut u8 = 0x002F as *mut u8;

/// The address of the USI status register
pub const USISR: *mut u8 = 0x002E as *mut u8;

/// The address of the USI control register
pub const USICR: *mut u8 = 0x002D as *mut u8;

/// The address of the port B input pins register
pub const PINB: *mut u8 = 0x0036 as *mut u8;

/// The address of the port B data direction register
pub const DDRB: *mut u8 = 0x0037 as *mut u8;

/// The address of the port B data register
pub const PORTB: *mut u8 = 0x0038 as *mut u8;

/// Port B bit carrying SDA
pub const SDA_PIN: u8 = 5;

/// Port B bit carrying SCL
pub const SCL_PIN: u8 = 7;

// USICR bits

/// Start condition interrupt enable
pub const USISIE: u8 = 1 << 7;
/// Counter overflow interrupt enable
pub const USIOIE: u8 = 1 << 6;
/// Wire mode bit 1 (two-wire mode)
pub const USIWM1: u8 = 1 << 5;
/// Wire mode bit 0 (hold SCL low on counter overflow)
pub const USIWM0: u8 = 1 << 4;
/// Clock source select bit 1 (external clock)
pub const USICS1: u8 = 1 << 3;
/// Clock source select bit 0 (negative edge when set)
pub const USICS0: u8 = 1 << 2;
/// Software clock strobe
pub const USICLK: u8 = 1 << 1;
/// Toggle clock port pin
pub const USITC: u8 = 1 << 0;

// USISR bits; writing one clears a flag

/// Start condition flag
pub const USISIF: u8 = 1 << 7;
/// Counter overflow flag
pub const USIOIF: u8 = 1 << 6;
/// Stop condition flag
pub const USIPF: u8 = 1 << 5;
/// Data output collision flag
pub const USIDC: u8 = 1 << 4;
/// 4-bit counter value
pub const USICNT_MASK: u8 = 0x0F;

/// Control register value
///
/// Always two-wire mode with the shift register clocked on the external
/// positive edge and the counter on both edges. Enabling the overflow
/// interrupt also selects the mode that holds SCL low after an overflow.
pub const fn control_word(start_enabled: bool, shift_enabled: bool) -> u8 {
    let mut word = USIWM1 | USICS1;
    if start_enabled {
        word |= USISIE;
    }
    if shift_enabled {
        word |= USIOIE | USIWM0;
    }
    word
}

/// Counter preload that overflows after `width` bits
///
/// The counter advances on both clock edges, two counts per bit, and
/// overflows when it wraps past 15.
pub const fn counter_preload(width: ShiftWidth) -> u8 {
    (16 - 2 * width.bits()) & USICNT_MASK
}

/// Status register value that clears the transfer flags and arms the counter
///
/// The start-condition flag is left alone so a pending start is not lost.
pub const fn arm_word(width: ShiftWidth) -> u8 {
    USIOIF | USIPF | USIDC | counter_preload(width)
}

/// Status register value that clears every flag and zeroes the counter
pub const fn clear_word() -> u8 {
    USISIF | USIOIF | USIPF | USIDC
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_preload() {
        assert_eq!(counter_preload(ShiftWidth::Byte), 0x00);
        assert_eq!(counter_preload(ShiftWidth::Bit), 0x0E);
    }

    #[test]
    fn test_idle_control_word() {
        // Start interrupt only, no SCL hold
        assert_eq!(control_word(true, false), 0b1010_1000);
    }

    #[test]
    fn test_active_control_word() {
        // Start and overflow interrupts, SCL held on overflow
        assert_eq!(control_word(true, true), 0b1111_1000);
    }

    #[test]
    fn test_arm_word_keeps_start_flag() {
        assert_eq!(arm_word(ShiftWidth::Byte) & USISIF, 0);
        assert_eq!(arm_word(ShiftWidth::Byte), 0x70);
        assert_eq!(arm_word(ShiftWidth::Bit), 0x7E);
    }

    #[test]
    fn test_clear_word() {
        assert_eq!(clear_word(), 0xF0);
        assert_eq!(clear_word() & USICNT_MASK, 0);
    }
}
