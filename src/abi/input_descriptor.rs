use std::os::raw::{c_char, c_uint};

/// `retro_input_descriptor`. The core hands the frontend an array of
/// these terminated by a zeroed entry (`description == NULL`); the
/// dispatcher copies every entry into owned storage before the array
/// (which lives in core-owned memory only for the callback's duration)
/// goes out of scope.
#[repr(C)]
pub struct RetroInputDescriptor {
    pub port: c_uint,
    pub device: c_uint,
    pub index: c_uint,
    pub id: c_uint,
    pub description: *const c_char,
}

/// Owned, frontend-side copy of one `retro_input_descriptor`.
#[derive(Debug, Clone)]
pub struct InputDescriptor {
    pub port: u32,
    pub device: u32,
    pub index: u32,
    pub id: u32,
    pub description: String,
}

/// `retro_controller_description`.
#[repr(C)]
pub struct RetroControllerDescription {
    pub desc: *const c_char,
    pub id: c_uint,
}

/// `retro_controller_info`. The core hands an array terminated by
/// `num_types == 0`.
#[repr(C)]
pub struct RetroControllerInfo {
    pub types: *const RetroControllerDescription,
    pub num_types: c_uint,
}

#[derive(Debug, Clone)]
pub struct ControllerDescription {
    pub desc: String,
    pub id: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ControllerPortInfo {
    pub types: Vec<ControllerDescription>,
}

pub type RetroKeyboardEventT =
    unsafe extern "C" fn(down: bool, keycode: c_uint, character: u32, key_modifiers: u16);

/// `retro_keyboard_callback`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroKeyboardCallback {
    pub callback: Option<RetroKeyboardEventT>,
}

pub type RetroSetRumbleStateT =
    unsafe extern "C" fn(port: c_uint, effect: c_uint, strength: u16) -> bool;

/// `retro_rumble_interface`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroRumbleInterface {
    pub set_rumble_state: Option<RetroSetRumbleStateT>,
}

pub type RetroSetSensorStateT = unsafe extern "C" fn(port: c_uint, action: c_uint, rate: c_uint) -> bool;
pub type RetroSensorGetInputT = unsafe extern "C" fn(port: c_uint, id: c_uint) -> f32;

/// `retro_sensor_interface`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroSensorInterface {
    pub set_sensor_state: Option<RetroSetSensorStateT>,
    pub get_sensor_input: Option<RetroSensorGetInputT>,
}
