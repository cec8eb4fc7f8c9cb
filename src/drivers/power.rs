use crate::abi::PowerState;

/// `GET_DEVICE_POWER`. Resolves the open question of how the device-power
/// value is modeled by exposing it as a plain value object rather than the
/// raw `retro_device_power` struct, so host code never touches the `-1`
/// sentinel directly.
#[derive(Debug, Clone, Copy)]
pub struct DevicePower {
    pub state: PowerState,
    pub seconds: Option<u32>,
    pub percent: Option<u8>,
}

pub trait PowerDriver: Send {
    fn device_power(&self) -> Option<DevicePower>;
}

/// Declines the query; used on hosts that don't track battery state.
#[derive(Default)]
pub struct NullPowerDriver;

impl PowerDriver for NullPowerDriver {
    fn device_power(&self) -> Option<DevicePower> {
        None
    }
}
