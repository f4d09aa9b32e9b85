//! Echo time to distance conversion
//!
//! Sound travels roughly 343 m/s, so the round trip to a target 1 cm away
//! takes about 58 µs. Integer math only; results truncate.

/// Round-trip echo time per centimetre of range, in microseconds
pub const ECHO_US_PER_CM: u32 = 58;

/// Convert an echo pulse width to range in millimetres
///
/// `distance_mm = duration_us * 10 / 58`, truncated. Widened internally so
/// pulses longer than ~7 minutes cannot overflow.
pub const fn pulse_us_to_mm(duration_us: u32) -> u32 {
    ((duration_us as u64 * 10) / ECHO_US_PER_CM as u64) as u32
}
