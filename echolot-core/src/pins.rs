//! Pin validation shared by driver setup and board config checks

use echolot_hal::{GpioPlatform, PinId};

use crate::error::{DriverError, PinRole};

/// Check that `pin` can serve `role` on this platform
pub fn check_pin<P: GpioPlatform + ?Sized>(
    platform: &P,
    role: PinRole,
    pin: PinId,
) -> Result<(), DriverError> {
    let ok = if role.needs_interrupt() {
        platform.supports_interrupt(pin)
    } else {
        platform.exists(pin)
    };

    if ok {
        Ok(())
    } else {
        Err(DriverError::InvalidPin { role, pin })
    }
}
