use std::os::raw::c_int;

pub type RetroAudioCallbackT = unsafe extern "C" fn();
pub type RetroAudioSetStateCallbackT = unsafe extern "C" fn(enabled: bool);

/// `retro_audio_callback`, registered via `SET_AUDIO_CALLBACK` for cores
/// producing audio asynchronously from `retro_run`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroAudioCallback {
    pub callback: Option<RetroAudioCallbackT>,
    pub set_state: Option<RetroAudioSetStateCallbackT>,
}

pub type RetroAudioBufferStatusCallbackT =
    unsafe extern "C" fn(active: bool, occupancy: c_int, underrun_likely: bool);

/// `retro_audio_buffer_status_callback`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroAudioBufferStatusCallback {
    pub callback: Option<RetroAudioBufferStatusCallbackT>,
}

pub type RetroFrameTimeCallbackT = unsafe extern "C" fn(usec: i64);

/// `retro_frame_time_callback`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroFrameTimeCallback {
    pub callback: Option<RetroFrameTimeCallbackT>,
    pub reference: i64,
}

pub type RetroLogPrintfT = unsafe extern "C" fn(level: u32, fmt: *const std::os::raw::c_char, ...);

/// `retro_log_callback`.
#[repr(C)]
pub struct RetroLogCallback {
    pub log: Option<RetroLogPrintfT>,
}

pub type RetroPerfGetTimeUsecT = unsafe extern "C" fn() -> i64;
pub type RetroPerfGetCounterT = unsafe extern "C" fn() -> i64;
pub type RetroGetCpuFeaturesT = unsafe extern "C" fn() -> u64;
pub type RetroPerfLogT = unsafe extern "C" fn();
pub type RetroPerfRegisterT = unsafe extern "C" fn(counter: *mut RetroPerfCounter);
pub type RetroPerfStartT = unsafe extern "C" fn(counter: *mut RetroPerfCounter);
pub type RetroPerfStopT = unsafe extern "C" fn(counter: *mut RetroPerfCounter);

#[repr(C)]
pub struct RetroPerfCounter {
    pub ident: *const std::os::raw::c_char,
    pub start: u64,
    pub total: u64,
    pub call_cnt: u64,
    pub registered: bool,
}

/// `retro_perf_callback`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroPerfCallback {
    pub get_time_usec: Option<RetroPerfGetTimeUsecT>,
    pub get_cpu_features: Option<RetroGetCpuFeaturesT>,
    pub get_perf_counter: Option<RetroPerfGetCounterT>,
    pub perf_register: Option<RetroPerfRegisterT>,
    pub perf_start: Option<RetroPerfStartT>,
    pub perf_stop: Option<RetroPerfStopT>,
    pub perf_log: Option<RetroPerfLogT>,
}

pub type RetroLocationSetInterval = unsafe extern "C" fn(interval_ms: u32, interval_distance: u32);
pub type RetroLocationStartT = unsafe extern "C" fn() -> bool;
pub type RetroLocationStopT = unsafe extern "C" fn();
pub type RetroLocationGetPositionT = unsafe extern "C" fn(
    lat: *mut f64,
    lon: *mut f64,
    horiz_accuracy: *mut f64,
    vert_accuracy: *mut f64,
) -> bool;
pub type RetroLocationInitializedT = unsafe extern "C" fn();
pub type RetroLocationDeinitializedT = unsafe extern "C" fn();

/// `retro_location_callback`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroLocationCallback {
    pub start: Option<RetroLocationStartT>,
    pub stop: Option<RetroLocationStopT>,
    pub get_position: Option<RetroLocationGetPositionT>,
    pub set_interval: Option<RetroLocationSetInterval>,
    pub initialized: Option<RetroLocationInitializedT>,
    pub deinitialized: Option<RetroLocationDeinitializedT>,
}

pub type RetroCameraFrameRawFramebufferT =
    unsafe extern "C" fn(buffer: *const u32, width: u32, height: u32, pitch: usize);
pub type RetroCameraFrameOpenglTextureT =
    unsafe extern "C" fn(texture_id: u32, texture_target: u32, affine: *const f32);
pub type RetroCameraInitializedT = unsafe extern "C" fn();
pub type RetroCameraDeinitializedT = unsafe extern "C" fn();
pub type RetroCameraStartT = unsafe extern "C" fn() -> bool;
pub type RetroCameraStopT = unsafe extern "C" fn();

/// `retro_camera_callback`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroCameraCallback {
    pub caps: u64,
    pub width: c_int,
    pub height: c_int,
    pub start: Option<RetroCameraStartT>,
    pub stop: Option<RetroCameraStopT>,
    pub frame_raw_framebuffer: Option<RetroCameraFrameRawFramebufferT>,
    pub frame_opengl_texture: Option<RetroCameraFrameOpenglTextureT>,
    pub initialized: Option<RetroCameraInitializedT>,
    pub deinitialized: Option<RetroCameraDeinitializedT>,
}

pub const RETRO_CAMERA_BUFFER_OPENGL_TEXTURE: u32 = 1 << 0;
pub const RETRO_CAMERA_BUFFER_RAW_FRAMEBUFFER: u32 = 1 << 1;
