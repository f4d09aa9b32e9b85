//! HC-SR04 ultrasonic range finder
//!
//! A 20 µs pulse on the trigger pin starts a measurement. The sensor then
//! raises the echo pin for as long as the sound took to come back. The
//! echo pin interrupt fires on both edges: the rising edge arms the timer,
//! the falling edge records the pulse width and posts a deferred task. The
//! task converts the width to millimetres and calls the user callback
//! outside interrupt context.
//!
//! The driver is split three ways so the interrupt and the main loop never
//! contend for the same `&mut`:
//!
//! - [`EchoState`]: atomics shared by both sides, usable as a `static`
//! - [`EchoHandler`]: the interrupt side, owns read-only collaborators
//! - [`Hcsr04`]: the main-loop side, owns the trigger delay and callback
//!
//! # Usage
//!
//! ```ignore
//! static ECHO: EchoState = EchoState::new();
//! static TASKS: TaskQueue<4> = TaskQueue::new();
//!
//! let mut sensor = Hcsr04::new(&ECHO, gpio, delay);
//! sensor.setup(1, 2, Some(|mm| info!("range {} mm", mm)))?;
//! let handler = EchoHandler::new(&ECHO, gpio_irq, clock, &TASKS, HCSR04_TASK);
//!
//! // GPIO interrupt: route the status word through the hook
//! let rest = handler.on_interrupt(status);
//!
//! // Main loop, interrupts enabled
//! sensor.trigger();
//! TASKS.run_pending(|task| {
//!     if task == HCSR04_TASK {
//!         sensor.run_deferred();
//!     }
//! });
//! ```
//!
//! # Pulse marker
//!
//! The in-flight state is a single signed word. Zero means idle. While a
//! pulse is in flight it holds the bitwise complement of the start
//! timestamp's low 31 bits, which is always negative, so a start time of
//! zero or one past 2^31 µs still arms correctly. Pulse widths are
//! therefore measured modulo 2^31 µs.

use embedded_hal::delay::DelayNs;
use portable_atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicU8, Ordering};

use echolot_core::config::UltrasonicConfig;
use echolot_core::error::{DriverError, PinRole};
use echolot_core::handoff::DeferredSignal;
use echolot_core::pins::check_pin;
use echolot_core::units::pulse_us_to_mm;
use echolot_hal::{
    GpioPlatform, InterruptHook, InterruptMode, Level, MicrosClock, PinId, PinMode, Pull, TaskId,
    TaskPoster, TaskPriority,
};

/// Trigger pulse width required by the sensor
pub const TRIGGER_PULSE_US: u32 = 20;

/// Priority the distance callback task is posted at
pub const CALLBACK_PRIORITY: TaskPriority = TaskPriority::Medium;

/// Marker value while no pulse is in flight
const IDLE: i32 = 0;

/// Timestamp bits kept in the marker
const TIME_MASK: u32 = 0x7FFF_FFFF;

/// Marker for a pulse that started at `now`
#[inline(always)]
fn arm_marker(now: u32) -> i32 {
    !((now & TIME_MASK) as i32)
}

/// Pulse width from an armed marker to `now`
#[inline(always)]
fn elapsed_since(marker: i32, now: u32) -> u32 {
    now.wrapping_add(marker as u32).wrapping_add(1) & TIME_MASK
}

/// Receives each measured distance
///
/// Implemented for any `FnMut(u32)`. The scripting bindings implement it
/// for their callback reference.
pub trait DistanceCallback {
    /// Called from the deferred task with the range in millimetres
    fn on_distance(&mut self, distance_mm: u32);
}

impl<F: FnMut(u32)> DistanceCallback for F {
    fn on_distance(&mut self, distance_mm: u32) {
        self(distance_mm)
    }
}

/// Trigger and echo pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hcsr04Pins {
    /// Trigger output
    pub trigger: PinId,
    /// Echo input
    pub echo: PinId,
}

/// Measurement state shared by the interrupt handler and the driver
///
/// Only atomics, so one instance can sit in a `static` and be referenced
/// from both contexts without a lock.
#[derive(Debug, Default)]
pub struct EchoState {
    /// Interrupt status bit of the echo pin, 0 while closed
    echo_bit: AtomicU32,
    echo_pin: AtomicU8,
    /// 0 = idle, negative = pulse in flight (see module docs)
    elapsed_marker: AtomicI32,
    /// Width of the last completed pulse
    last_pulse_us: AtomicU32,
    /// A completed pulse has not been delivered yet
    unread: AtomicBool,
    deferred: DeferredSignal,
}

impl EchoState {
    /// Create closed, idle state
    pub const fn new() -> Self {
        Self {
            echo_bit: AtomicU32::new(0),
            echo_pin: AtomicU8::new(0),
            elapsed_marker: AtomicI32::new(IDLE),
            last_pulse_us: AtomicU32::new(0),
            unread: AtomicBool::new(false),
            deferred: DeferredSignal::new(),
        }
    }

    /// Check if an echo pulse is in flight
    pub fn is_measuring(&self) -> bool {
        self.elapsed_marker.load(Ordering::Acquire) < 0
    }

    /// Width of the last completed echo pulse in microseconds
    pub fn last_pulse_us(&self) -> u32 {
        self.last_pulse_us.load(Ordering::Acquire)
    }

    /// Check if a distance task is posted and not yet run
    pub fn is_task_queued(&self) -> bool {
        self.deferred.is_queued()
    }

    /// Interrupt status mask the handler services (0 when closed)
    pub fn hook_mask(&self) -> u32 {
        self.echo_bit.load(Ordering::Acquire)
    }

    fn disarm(&self) {
        self.elapsed_marker.store(IDLE, Ordering::Release);
    }
}

/// Interrupt side of the driver
///
/// Needs only shared access to the platform (pin read and pending-bit
/// acknowledge), the clock and the task poster.
pub struct EchoHandler<'a, P, C, T> {
    state: &'a EchoState,
    platform: P,
    clock: C,
    poster: T,
    task: TaskId,
}

impl<'a, P, C, T> EchoHandler<'a, P, C, T>
where
    P: GpioPlatform,
    C: MicrosClock,
    T: TaskPoster,
{
    /// Create the handler
    ///
    /// `task` is the id the dispatcher hands back when the distance task
    /// is due; the main loop then calls [`Hcsr04::run_deferred`].
    pub fn new(state: &'a EchoState, platform: P, clock: C, poster: T, task: TaskId) -> Self {
        Self {
            state,
            platform,
            clock,
            poster,
            task,
        }
    }

    /// Task id this handler posts
    pub fn task(&self) -> TaskId {
        self.task
    }
}

impl<P, C, T> InterruptHook for EchoHandler<'_, P, C, T>
where
    P: GpioPlatform,
    C: MicrosClock,
    T: TaskPoster,
{
    fn on_interrupt(&self, status: u32) -> u32 {
        let state = self.state;
        let bit = state.echo_bit.load(Ordering::Acquire);
        if bit == 0 || status & bit == 0 {
            return status;
        }

        let level = self.platform.read(state.echo_pin.load(Ordering::Relaxed));
        let now = self.clock.now_us();
        let marker = state.elapsed_marker.load(Ordering::Acquire);

        if marker == IDLE && level.is_high() {
            state.elapsed_marker.store(arm_marker(now), Ordering::Release);
        } else if marker < 0 && !level.is_high() {
            // Width first, then idle: the task must never see a partial value
            state
                .last_pulse_us
                .store(elapsed_since(marker, now), Ordering::Release);
            state.elapsed_marker.store(IDLE, Ordering::Release);
            state.unread.store(true, Ordering::Release);
            state
                .deferred
                .post_once(&self.poster, self.task, CALLBACK_PRIORITY);
        }

        // This pin is fully serviced here; keep the generic path off it
        self.platform.clear_pending(bit);
        status & !bit
    }
}

/// Main-loop side of the driver
///
/// Owns pin configuration, the trigger delay and the distance callback.
/// Never shared with the interrupt handler, so the callback runs with
/// interrupts enabled.
pub struct Hcsr04<'a, P, D, F> {
    state: &'a EchoState,
    platform: P,
    delay: D,
    pins: Option<Hcsr04Pins>,
    on_distance: Option<F>,
}

impl<'a, P, D, F> Hcsr04<'a, P, D, F>
where
    P: GpioPlatform,
    D: DelayNs,
    F: DistanceCallback,
{
    /// Create an unconfigured driver
    pub fn new(state: &'a EchoState, platform: P, delay: D) -> Self {
        Self {
            state,
            platform,
            delay,
            pins: None,
            on_distance: None,
        }
    }

    /// Configure the pins and store the distance callback
    ///
    /// The trigger pin must exist; the echo pin must also be interrupt
    /// capable. `on_distance` is `None` when the caller passed something
    /// that is not callable. On error nothing is changed.
    pub fn setup(
        &mut self,
        trigger: PinId,
        echo: PinId,
        on_distance: Option<F>,
    ) -> Result<(), DriverError> {
        check_pin(&self.platform, PinRole::Trigger, trigger)?;
        check_pin(&self.platform, PinRole::Echo, echo)?;
        let on_distance = on_distance.ok_or(DriverError::InvalidCallback)?;

        if let Some(old) = self.pins {
            if old.echo != echo {
                self.release_echo(old.echo);
            }
        }

        self.on_distance = Some(on_distance);

        self.platform.set_mode(trigger, PinMode::Output, Pull::Floating);
        self.platform.set_mode(echo, PinMode::Interrupt, Pull::Floating);

        let bit = self.platform.gpio_bit(echo);
        self.state.echo_pin.store(echo, Ordering::Relaxed);
        self.state.echo_bit.store(bit, Ordering::Release);
        self.state.disarm();

        self.platform.set_interrupt(echo, InterruptMode::AnyEdge);
        self.platform.register_hook(bit);

        self.pins = Some(Hcsr04Pins { trigger, echo });

        debug!("hcsr04: setup trigger={} echo={}", trigger, echo);
        Ok(())
    }

    /// Configure from board config
    pub fn setup_with(
        &mut self,
        config: &UltrasonicConfig,
        on_distance: Option<F>,
    ) -> Result<(), DriverError> {
        self.setup(config.trigger_pin, config.echo_pin, on_distance)
    }

    /// Start a measurement
    ///
    /// Discards any pulse still in flight, then drives the trigger pin high
    /// for [`TRIGGER_PULSE_US`]. Busy-waits for the pulse width.
    pub fn trigger(&mut self) {
        let Some(pins) = self.pins else {
            warn!("hcsr04: trigger before setup");
            return;
        };

        self.state.disarm();

        self.platform.write(pins.trigger, Level::High);
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.platform.write(pins.trigger, Level::Low);
    }

    /// Stop measuring
    ///
    /// Disables the echo interrupt, parks the echo pin as a pulled-up input
    /// and drops the callback. Handler invocations after this are no-ops,
    /// and a pulse completed before the close is never delivered.
    pub fn close(&mut self) {
        if let Some(pins) = self.pins.take() {
            self.release_echo(pins.echo);
            debug!("hcsr04: closed echo={}", pins.echo);
        }

        self.state.echo_bit.store(0, Ordering::Release);
        self.state.disarm();
        self.state.unread.store(false, Ordering::Release);
        self.state.last_pulse_us.store(0, Ordering::Release);
        self.on_distance = None;
    }

    fn release_echo(&mut self, echo: PinId) {
        self.platform.set_interrupt(echo, InterruptMode::Disabled);
        self.platform.set_mode(echo, PinMode::Input, Pull::PullUp);
        self.platform.unregister_hook(self.platform.gpio_bit(echo));
    }

    /// Deferred distance task
    ///
    /// Run when the dispatcher hands back the handler's task id. Converts
    /// the latest pulse width and calls the callback, unless that pulse was
    /// already delivered or discarded by [`Self::close`]. Then allows the
    /// next completed pulse to post again.
    pub fn run_deferred(&mut self) {
        if self.state.unread.swap(false, Ordering::AcqRel) {
            let distance_mm = pulse_us_to_mm(self.state.last_pulse_us());

            if let Some(on_distance) = self.on_distance.as_mut() {
                on_distance.on_distance(distance_mm);
            }
        }

        self.state.deferred.complete();
    }

    /// Current pin assignment, if set up
    pub fn pins(&self) -> Option<Hcsr04Pins> {
        self.pins
    }

    /// Shared measurement state
    pub fn state(&self) -> &'a EchoState {
        self.state
    }
}
