use std::os::raw::c_int;

pub type RetroSetLedStateT = unsafe extern "C" fn(led: c_int, state: c_int);

#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroLedInterface {
    pub set_led_state: Option<RetroSetLedStateT>,
}
