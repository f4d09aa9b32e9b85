//! Microsecond clock abstraction

/// Monotonic microsecond clock
///
/// The value wraps at `u32::MAX`; consumers must use wrapping arithmetic.
pub trait MicrosClock {
    /// Current timestamp in microseconds
    fn now_us(&self) -> u32;
}

impl<T: MicrosClock + ?Sized> MicrosClock for &T {
    fn now_us(&self) -> u32 {
        (**self).now_us()
    }
}
