//! Bus line vocabulary
//!
//! Both bus lines are open-drain: a line configured as input is released and
//! pulled high externally, a line configured as output follows the peripheral.

/// Direction of a bus line pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineDirection {
    /// Released; the pin only samples the line
    Input,
    /// Driven by the peripheral
    Output,
}

/// Logic level of a bus line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Check if this is the high level
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}
