//! Interrupt-driven sensor drivers
//!
//! This crate provides drivers whose measurement logic runs inside the
//! GPIO interrupt handler:
//!
//! - Ultrasonic range finder (HC-SR04): times the echo pulse and hands the
//!   distance to a deferred callback
//! - Optical encoder: counts rising edges on one pin
//!
//! Each driver is split into a state block of atomics (fit for a
//! `static`), an interrupt handler implementing
//! [`echolot_hal::InterruptHook`] that platform glue routes the GPIO
//! interrupt to, and a main-loop front-end that owns configuration.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod encoder;
pub mod ultrasonic;

#[cfg(test)]
pub(crate) mod mock;

pub use encoder::{CounterHandler, CounterState, OpticalEncoder};
pub use ultrasonic::{DistanceCallback, EchoHandler, EchoState, Hcsr04};
