//! Driver-owned interrupt hooks
//!
//! The platform's GPIO interrupt dispatcher hands the pending-status word
//! to every hook that claimed a pin. A hook that fully services its pin
//! clears the pending bit itself and masks its bit out of the returned
//! status, so the generic dispatch path leaves that pin alone.

/// Interrupt handler owned by a driver
///
/// Runs in interrupt context with other interrupts masked: no blocking,
/// no allocation, no error path.
pub trait InterruptHook {
    /// Service pending interrupts in `status`
    ///
    /// Returns `status` with the bits this hook handled cleared.
    fn on_interrupt(&self, status: u32) -> u32;
}

impl<T: InterruptHook + ?Sized> InterruptHook for &T {
    fn on_interrupt(&self, status: u32) -> u32 {
        (**self).on_interrupt(status)
    }
}

/// Pass a status word through the hooks that claim it
///
/// Each entry pairs a claimed pin mask with its hook. A hook only runs if
/// one of its claimed bits is still set. Returns the bits no hook handled,
/// which the caller services on its generic path.
pub fn dispatch_hooks(mut status: u32, hooks: &[(u32, &dyn InterruptHook)]) -> u32 {
    for (mask, hook) in hooks {
        if status & mask != 0 {
            status = hook.on_interrupt(status);
        }
    }
    status
}
