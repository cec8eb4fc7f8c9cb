#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PowerState {
    Unknown = 0,
    Discharging = 1,
    Charging = 2,
    Charged = 3,
    PluggedIn = 4,
}

/// `retro_device_power`. `seconds == -1` / `percent == -1` mean "no
/// estimate", mirroring `RETRO_POWERSTATE_NO_ESTIMATE`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroDevicePower {
    pub state: i32,
    pub seconds: i32,
    pub percent: i8,
}
