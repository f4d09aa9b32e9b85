//! Board-agnostic core logic for the Echolot sensor drivers
//!
//! This crate contains everything the drivers share that does not depend
//! on a specific platform:
//!
//! - Driver error types and pin validation
//! - Unit conversion (echo time to distance)
//! - The interrupt-to-task handoff flag
//! - A fixed-capacity priority task queue
//! - Board configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handoff;
pub mod pins;
pub mod units;

pub use dispatch::TaskQueue;
pub use error::{DriverError, PinRole};
pub use handoff::DeferredSignal;
