use std::os::raw::{c_uchar, c_uint};

pub type RetroMidiInputEnabledT = unsafe extern "C" fn() -> bool;
pub type RetroMidiOutputEnabledT = unsafe extern "C" fn() -> bool;
pub type RetroMidiReadT = unsafe extern "C" fn(byte: *mut c_uchar) -> bool;
pub type RetroMidiWriteT = unsafe extern "C" fn(byte: c_uchar, delta_time: c_uint) -> bool;
pub type RetroMidiFlushT = unsafe extern "C" fn() -> bool;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroMidiInterface {
    pub input_enabled: Option<RetroMidiInputEnabledT>,
    pub output_enabled: Option<RetroMidiOutputEnabledT>,
    pub read: Option<RetroMidiReadT>,
    pub write: Option<RetroMidiWriteT>,
    pub flush: Option<RetroMidiFlushT>,
}
