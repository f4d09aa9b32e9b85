//! Ultrasonic range finders
//!
//! - HC-SR04: trigger pulse out, echo pulse width in

pub mod hcsr04;

pub use hcsr04::{
    DistanceCallback, EchoHandler, EchoState, Hcsr04, Hcsr04Pins, CALLBACK_PRIORITY,
    TRIGGER_PULSE_US,
};
