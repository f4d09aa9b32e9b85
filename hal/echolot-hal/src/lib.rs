//! Echolot Hardware Abstraction Layer
//!
//! This crate defines the collaborator interfaces the sensor drivers
//! consume. The firmware's platform layer implements them; the drivers
//! never touch registers directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Scripting bindings / firmware glue     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  echolot-drivers (hcsr04, opt_enc)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  echolot-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  Platform GPIO layer + task dispatcher  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioPlatform`] - Pin modes, interrupt modes, hooks, raw I/O
//! - [`interrupt::InterruptHook`] - Per-pin interrupt handler owned by a driver
//! - [`clock::MicrosClock`] - Monotonic microsecond timestamp
//! - [`task::TaskPoster`] - Deferred task posting

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod interrupt;
pub mod task;

// Re-export key traits at crate root for convenience
pub use clock::MicrosClock;
pub use gpio::{GpioPlatform, InterruptMode, Level, PinId, PinMode, Pull};
pub use interrupt::{dispatch_hooks, InterruptHook};
pub use task::{TaskId, TaskPoster, TaskPriority};
