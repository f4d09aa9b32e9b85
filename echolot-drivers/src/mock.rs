//! Test doubles for the platform collaborators
//!
//! The platform is shared by reference: the driver front-end configures
//! it while the interrupt handler reads and acknowledges through the same
//! instance, as both do with the real register block.

use core::cell::{Cell, RefCell};

use echolot_hal::{
    dispatch_hooks, GpioPlatform, InterruptHook, InterruptMode, Level, MicrosClock, PinId,
    PinMode, Pull,
};
use embedded_hal::delay::DelayNs;

/// Board pin to hardware GPIO, NodeMCU style
///
/// Board pin 0 maps to GPIO16, which has no interrupt routing.
const GPIO_MAP: [u8; 13] = [16, 5, 4, 0, 2, 14, 12, 13, 15, 3, 1, 9, 10];

pub const PIN_COUNT: usize = GPIO_MAP.len();

/// Recording GPIO platform
pub struct MockPlatform {
    modes: RefCell<[Option<(PinMode, Pull)>; PIN_COUNT]>,
    interrupts: RefCell<[InterruptMode; PIN_COUNT]>,
    /// Masks claimed by driver hooks
    hooks: Cell<u32>,
    writes: RefCell<heapless::Vec<(PinId, Level), 32>>,
    /// Input levels, one bit per board pin
    levels: Cell<u32>,
    /// Pending interrupt bits, by GPIO
    pending: Cell<u32>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            modes: RefCell::new([None; PIN_COUNT]),
            interrupts: RefCell::new([InterruptMode::Disabled; PIN_COUNT]),
            hooks: Cell::new(0),
            writes: RefCell::new(heapless::Vec::new()),
            levels: Cell::new(0),
            pending: Cell::new(0),
        }
    }

    pub fn mode(&self, pin: PinId) -> Option<(PinMode, Pull)> {
        self.modes.borrow()[pin as usize]
    }

    pub fn unconfigured(&self) -> bool {
        self.modes.borrow().iter().all(Option::is_none)
    }

    pub fn interrupt(&self, pin: PinId) -> InterruptMode {
        self.interrupts.borrow()[pin as usize]
    }

    pub fn hooks(&self) -> u32 {
        self.hooks.get()
    }

    pub fn bit(&self, pin: PinId) -> u32 {
        1 << GPIO_MAP[pin as usize]
    }

    pub fn writes(&self) -> heapless::Vec<(PinId, Level), 32> {
        self.writes.borrow().clone()
    }

    pub fn set_level(&self, pin: PinId, high: bool) {
        let bit = 1 << pin;
        let levels = self.levels.get();
        self.levels
            .set(if high { levels | bit } else { levels & !bit });
    }

    pub fn pending(&self) -> u32 {
        self.pending.get()
    }

    /// Raise an edge interrupt on `pin` and run it through `hook`
    ///
    /// Nothing happens unless the pin's interrupt is enabled and claimed,
    /// like real hardware. Returns the status left for the generic path.
    pub fn fire(&self, hook: &dyn InterruptHook, pin: PinId) -> u32 {
        let bit = self.bit(pin);
        if !self.interrupt(pin).is_enabled() || self.hooks.get() & bit == 0 {
            return 0;
        }

        self.pending.set(self.pending.get() | bit);
        let hooks: [(u32, &dyn InterruptHook); 1] = [(self.hooks.get(), hook)];
        dispatch_hooks(self.pending.get(), &hooks)
    }
}

impl GpioPlatform for &MockPlatform {
    fn exists(&self, pin: PinId) -> bool {
        (pin as usize) < PIN_COUNT
    }

    fn gpio_bit(&self, pin: PinId) -> u32 {
        self.bit(pin)
    }

    fn set_mode(&mut self, pin: PinId, mode: PinMode, pull: Pull) {
        self.modes.borrow_mut()[pin as usize] = Some((mode, pull));
    }

    fn set_interrupt(&mut self, pin: PinId, mode: InterruptMode) {
        self.interrupts.borrow_mut()[pin as usize] = mode;
    }

    fn register_hook(&mut self, mask: u32) {
        self.hooks.set(self.hooks.get() | mask);
    }

    fn unregister_hook(&mut self, mask: u32) {
        self.hooks.set(self.hooks.get() & !mask);
    }

    fn read(&self, pin: PinId) -> Level {
        Level::from(self.levels.get() & (1 << pin) != 0)
    }

    fn write(&mut self, pin: PinId, level: Level) {
        let _ = self.writes.borrow_mut().push((pin, level));
    }

    fn clear_pending(&self, mask: u32) {
        self.pending.set(self.pending.get() & !mask);
    }
}

/// Settable microsecond clock
pub struct MockClock {
    pub now: Cell<u32>,
}

impl MockClock {
    pub fn new() -> Self {
        Self { now: Cell::new(0) }
    }
}

impl MicrosClock for MockClock {
    fn now_us(&self) -> u32 {
        self.now.get()
    }
}

/// Delay that records requested time instead of waiting
#[derive(Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}
