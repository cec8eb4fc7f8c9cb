use std::os::raw::{c_int, c_void};

pub const RETRO_MICROPHONE_INTERFACE_VERSION: u32 = 1;

/// Opaque microphone handle, analogous to `RetroVfsFileHandle`.
pub enum RetroMicrophone {}

#[repr(C)]
pub struct RetroMicrophoneParams {
    pub rate: c_int,
}

pub type RetroOpenMicT = unsafe extern "C" fn(params: *const RetroMicrophoneParams) -> *mut RetroMicrophone;
pub type RetroCloseMicT = unsafe extern "C" fn(microphone: *mut RetroMicrophone);
pub type RetroSetMicStateT = unsafe extern "C" fn(microphone: *mut RetroMicrophone, state: bool) -> bool;
pub type RetroGetMicStateT = unsafe extern "C" fn(microphone: *mut RetroMicrophone) -> bool;
pub type RetroGetParamsMicT =
    unsafe extern "C" fn(microphone: *mut RetroMicrophone, params: *mut RetroMicrophoneParams) -> bool;
pub type RetroReadMicT =
    unsafe extern "C" fn(microphone: *mut RetroMicrophone, samples: *mut c_void, num_samples: c_int) -> c_int;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroMicrophoneInterface {
    pub interface_version: u32,
    pub open_mic: Option<RetroOpenMicT>,
    pub close_mic: Option<RetroCloseMicT>,
    pub set_mic_state: Option<RetroSetMicStateT>,
    pub get_mic_state: Option<RetroGetMicStateT>,
    pub get_params: Option<RetroGetParamsMicT>,
    pub read_mic: Option<RetroReadMicT>,
}
