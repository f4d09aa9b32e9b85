//! Single-channel optical encoder
//!
//! Counts rising edges on one interrupt pin. The handler samples the pin
//! and adds the sampled level, so an interrupt that arrives after the
//! level already dropped again does not count. There is no debouncing;
//! edges the interrupt controller coalesces are lost.
//!
//! ```ignore
//! static WHEEL: CounterState = CounterState::new();
//!
//! let mut encoder = OpticalEncoder::new(&WHEEL, gpio);
//! encoder.setup(5)?;
//! let handler = CounterHandler::new(&WHEEL, gpio_irq);
//! // GPIO interrupt
//! let rest = handler.on_interrupt(status);
//! ```

use portable_atomic::{AtomicI32, AtomicU32, AtomicU8, Ordering};

use echolot_core::config::EncoderConfig;
use echolot_core::error::{DriverError, PinRole};
use echolot_core::pins::check_pin;
use echolot_hal::{GpioPlatform, InterruptHook, InterruptMode, PinId, PinMode, Pull};

/// Edge count shared by the interrupt handler and the driver
#[derive(Debug, Default)]
pub struct CounterState {
    /// Interrupt status bit of the counting pin, 0 while closed
    bit: AtomicU32,
    pin: AtomicU8,
    counter: AtomicI32,
}

impl CounterState {
    /// Create closed state with a zero count
    pub const fn new() -> Self {
        Self {
            bit: AtomicU32::new(0),
            pin: AtomicU8::new(0),
            counter: AtomicI32::new(0),
        }
    }

    /// Edges counted so far
    pub fn get_counter(&self) -> i32 {
        self.counter.load(Ordering::Relaxed)
    }

    /// Zero the count
    pub fn reset_counter(&self) {
        self.counter.store(0, Ordering::Relaxed);
    }

    /// Interrupt status mask the handler services (0 when closed)
    pub fn hook_mask(&self) -> u32 {
        self.bit.load(Ordering::Acquire)
    }
}

/// Interrupt side of the encoder
pub struct CounterHandler<'a, P> {
    state: &'a CounterState,
    platform: P,
}

impl<'a, P: GpioPlatform> CounterHandler<'a, P> {
    pub fn new(state: &'a CounterState, platform: P) -> Self {
        Self { state, platform }
    }
}

impl<P: GpioPlatform> InterruptHook for CounterHandler<'_, P> {
    fn on_interrupt(&self, status: u32) -> u32 {
        let state = self.state;
        let bit = state.bit.load(Ordering::Acquire);
        if bit == 0 || status & bit == 0 {
            return status;
        }

        let level = self.platform.read(state.pin.load(Ordering::Relaxed));
        state
            .counter
            .fetch_add(level.as_u32() as i32, Ordering::Relaxed);

        self.platform.clear_pending(bit);
        status & !bit
    }
}

/// Optical encoder driver
pub struct OpticalEncoder<'a, P> {
    state: &'a CounterState,
    platform: P,
    pin: Option<PinId>,
}

impl<'a, P: GpioPlatform> OpticalEncoder<'a, P> {
    /// Create an unconfigured encoder
    pub fn new(state: &'a CounterState, platform: P) -> Self {
        Self {
            state,
            platform,
            pin: None,
        }
    }

    /// Route rising edges on `pin` to the counter
    ///
    /// The pin must be interrupt capable. The count is kept across
    /// repeated setup calls; use [`Self::reset_counter`] to clear it.
    pub fn setup(&mut self, pin: PinId) -> Result<(), DriverError> {
        check_pin(&self.platform, PinRole::Counter, pin)?;

        if let Some(old) = self.pin {
            if old != pin {
                self.release(old);
            }
        }

        self.platform.set_mode(pin, PinMode::Interrupt, Pull::Floating);

        let bit = self.platform.gpio_bit(pin);
        self.state.pin.store(pin, Ordering::Relaxed);
        self.state.bit.store(bit, Ordering::Release);

        self.platform.set_interrupt(pin, InterruptMode::RisingEdge);
        self.platform.register_hook(bit);
        self.pin = Some(pin);

        debug!("opt_enc: setup pin={}", pin);
        Ok(())
    }

    /// Configure from board config
    pub fn setup_with(&mut self, config: &EncoderConfig) -> Result<(), DriverError> {
        self.setup(config.pin)
    }

    /// Edges counted so far
    pub fn get_counter(&self) -> i32 {
        self.state.get_counter()
    }

    /// Zero the count
    pub fn reset_counter(&self) {
        self.state.reset_counter();
    }

    /// Stop counting and park the pin as a pulled-up input
    ///
    /// The count is left as it was.
    pub fn close(&mut self) {
        if let Some(pin) = self.pin.take() {
            self.release(pin);
            debug!("opt_enc: closed pin={}", pin);
        }
        self.state.bit.store(0, Ordering::Release);
    }

    fn release(&mut self, pin: PinId) {
        self.platform.set_interrupt(pin, InterruptMode::Disabled);
        self.platform.set_mode(pin, PinMode::Input, Pull::PullUp);
        self.platform.unregister_hook(self.platform.gpio_bit(pin));
    }

    /// Counting pin, if set up
    pub fn pin(&self) -> Option<PinId> {
        self.pin
    }

    /// Shared count state
    pub fn state(&self) -> &'a CounterState {
        self.state
    }
}
