//! GPIO platform abstraction
//!
//! Pins are addressed by their board number (the number printed on the
//! board). The platform maps each board number to a hardware GPIO and
//! from there to the bit used in interrupt status words.

/// Board pin number
pub type PinId = u8;

/// Digital pin level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Level as the integer the hardware reports (0 or 1)
    pub const fn as_u32(self) -> u32 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }

    /// Check if the level is high
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Pin direction / function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Plain digital input
    Input,
    /// Push-pull digital output
    Output,
    /// Digital input with edge interrupt routing enabled
    Interrupt,
}

/// Internal pull resistor setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// No pull resistor
    #[default]
    Floating,
    /// Internal pull-up enabled
    PullUp,
}

/// Edge interrupt trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptMode {
    /// Interrupt disabled
    #[default]
    Disabled,
    /// Rising edge only
    RisingEdge,
    /// Falling edge only
    FallingEdge,
    /// Both edges
    AnyEdge,
}

impl InterruptMode {
    /// Check if this mode fires on anything
    pub const fn is_enabled(self) -> bool {
        !matches!(self, InterruptMode::Disabled)
    }
}

/// GPIO platform layer
///
/// Configuration methods take `&mut self`. The methods an interrupt
/// handler needs (`read`, `clear_pending`) take `&self`, so the handler
/// can hold its own shared handle to the platform next to the driver's.
pub trait GpioPlatform {
    /// Check that a board pin exists
    fn exists(&self, pin: PinId) -> bool;

    /// Check that a board pin can raise edge interrupts
    ///
    /// Board pin 0 has no interrupt routing on the supported boards.
    fn supports_interrupt(&self, pin: PinId) -> bool {
        pin != 0 && self.exists(pin)
    }

    /// Bit for this pin in interrupt status words
    fn gpio_bit(&self, pin: PinId) -> u32;

    /// Configure pin direction and pull
    fn set_mode(&mut self, pin: PinId, mode: PinMode, pull: Pull);

    /// Configure (or disable) the edge interrupt for a pin
    fn set_interrupt(&mut self, pin: PinId, mode: InterruptMode);

    /// Claim the pins in `mask` for a driver-owned interrupt hook
    ///
    /// Claimed pins bypass the platform's generic clear-and-callback path.
    fn register_hook(&mut self, mask: u32);

    /// Release a previously claimed mask
    fn unregister_hook(&mut self, mask: u32);

    /// Read the current input level
    fn read(&self, pin: PinId) -> Level;

    /// Drive an output pin
    fn write(&mut self, pin: PinId, level: Level);

    /// Acknowledge pending interrupts (write-one-to-clear)
    fn clear_pending(&self, mask: u32);
}
