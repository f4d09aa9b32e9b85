//! Edge-counting encoders
//!
//! - Optical encoder: single channel, rising edges only, no direction

pub mod optical;

pub use optical::{CounterHandler, CounterState, OpticalEncoder};
