use std::os::raw::{c_uint, c_void};

/// `RETRO_HW_CONTEXT_*`. Only the values cores commonly negotiate are
/// named; anything else round-trips through `SET_HW_RENDER` as a raw
/// `u32` since the frontend never has to act on the context type itself,
/// only store and hand it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum HwContextType {
    None = 0,
    OpenGl = 1,
    OpenGlEs2 = 2,
    OpenGlCore = 3,
    OpenGlEs3 = 4,
    OpenGlEsVersion = 5,
    Vulkan = 6,
    D3d11 = 7,
    D3d10 = 8,
    D3d12 = 9,
    D3d9 = 10,
}

impl HwContextType {
    pub fn from_raw(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::None,
            1 => Self::OpenGl,
            2 => Self::OpenGlEs2,
            3 => Self::OpenGlCore,
            4 => Self::OpenGlEs3,
            5 => Self::OpenGlEsVersion,
            6 => Self::Vulkan,
            7 => Self::D3d11,
            8 => Self::D3d10,
            9 => Self::D3d12,
            10 => Self::D3d9,
            _ => return None,
        })
    }
}

pub type RetroHwContextResetT = unsafe extern "C" fn();
pub type RetroHwGetCurrentFramebufferT = unsafe extern "C" fn() -> usize;
pub type RetroHwGetProcAddressT = unsafe extern "C" fn(sym: *const std::os::raw::c_char) -> *mut c_void;

/// `retro_hw_render_callback`; `libretro-sys` 0.1 does not cover it, so
/// this is hand-rolled field-for-field against the upstream header.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroHwRenderCallback {
    pub context_type: c_uint,
    pub context_reset: Option<RetroHwContextResetT>,
    pub get_current_framebuffer: Option<RetroHwGetCurrentFramebufferT>,
    pub get_proc_address: Option<RetroHwGetProcAddressT>,
    pub depth: bool,
    pub stencil: bool,
    pub bottom_left_origin: bool,
    pub version_major: c_uint,
    pub version_minor: c_uint,
    pub cache_context: bool,
    pub context_destroy: Option<RetroHwContextResetT>,
    pub debug_context: bool,
}

/// `retro_framebuffer`, used by `GET_CURRENT_SOFTWARE_FRAMEBUFFER`.
#[repr(C)]
pub struct RetroFramebuffer {
    pub data: *mut c_void,
    pub width: c_uint,
    pub height: c_uint,
    pub pitch: usize,
    pub format: c_uint,
    pub access_flags: c_uint,
    pub memory_flags: c_uint,
}

pub const RETRO_MEMORY_ACCESS_WRITE: u32 = 1 << 0;
pub const RETRO_MEMORY_ACCESS_READ: u32 = 1 << 1;
pub const RETRO_MEMORY_TYPE_CACHED: u32 = 1 << 0;
