//! Driver setup errors
//!
//! Only setup can fail. Interrupt handlers and deferred tasks have no
//! error path; dropped or coalesced edges are never reported.

use core::fmt;

use echolot_hal::PinId;

/// What a pin argument is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    /// Ultrasonic trigger output
    Trigger,
    /// Ultrasonic echo input (needs interrupts)
    Echo,
    /// Encoder counting input (needs interrupts)
    Counter,
}

impl PinRole {
    /// Position of this argument in the scripted `setup` call (1-based)
    pub const fn argument(self) -> u8 {
        match self {
            PinRole::Trigger => 1,
            PinRole::Echo => 2,
            PinRole::Counter => 1,
        }
    }

    /// Check if this role needs an interrupt-capable pin
    pub const fn needs_interrupt(self) -> bool {
        !matches!(self, PinRole::Trigger)
    }
}

/// Errors raised synchronously by driver setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// Pin does not exist or lacks the capability its role needs
    InvalidPin { role: PinRole, pin: PinId },
    /// Result callback argument is not callable
    InvalidCallback,
}

impl DriverError {
    /// Position of the offending argument in the scripted call (1-based)
    ///
    /// The binding layer uses this to build its "bad argument #n" error.
    pub const fn argument(&self) -> u8 {
        match self {
            DriverError::InvalidPin { role, .. } => role.argument(),
            DriverError::InvalidCallback => 3,
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::InvalidPin {
                role: PinRole::Trigger,
                pin,
            } => write!(f, "invalid trigger pin {}", pin),
            DriverError::InvalidPin {
                role: PinRole::Echo,
                pin,
            } => write!(f, "invalid echo pin {}, cannot be used for interrupt", pin),
            DriverError::InvalidPin {
                role: PinRole::Counter,
                pin,
            } => write!(f, "invalid interrupt pin {}", pin),
            DriverError::InvalidCallback => f.write_str("invalid callback type"),
        }
    }
}
