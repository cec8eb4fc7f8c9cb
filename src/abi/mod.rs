//! C-layout structs the libretro header declares but `libretro-sys` does not
//! cover. Field order and widths are taken straight from the upstream
//! header (cross-checked against the ctypes mirror this crate was ported
//! from); everything here is `#[repr(C)]` and meant to be read/written only
//! from behind a raw pointer handed across the ABI boundary.

mod callbacks;
mod content;
mod core_options;
mod disk_control;
mod input_descriptor;
mod led;
mod message;
mod microphone;
mod midi;
mod netpacket;
mod power;
mod vfs;
mod video;

pub use callbacks::*;
pub use content::*;
pub use core_options::*;
pub use disk_control::*;
pub use input_descriptor::*;
pub use led::*;
pub use message::*;
pub use microphone::*;
pub use midi::*;
pub use netpacket::*;
pub use power::*;
pub use vfs::*;
pub use video::*;

pub const RETRO_HW_FRAME_BUFFER_VALID: *const std::ffi::c_void = usize::MAX as *const _;

pub const RETRO_MEMORY_MASK: u32 = 0xff;
pub const RETRO_MEMORY_SAVE_RAM: u32 = 0;
pub const RETRO_MEMORY_RTC: u32 = 1;
pub const RETRO_MEMORY_SYSTEM_RAM: u32 = 2;
pub const RETRO_MEMORY_VIDEO_RAM: u32 = 3;

pub const RETRO_SERIALIZATION_QUIRK_INCOMPLETE: u64 = 1 << 0;
pub const RETRO_SERIALIZATION_QUIRK_MUST_INITIALIZE: u64 = 1 << 1;
pub const RETRO_SERIALIZATION_QUIRK_CORE_VARIABLE_SIZE: u64 = 1 << 2;
pub const RETRO_SERIALIZATION_QUIRK_FRONT_VARIABLE_SIZE: u64 = 1 << 3;
pub const RETRO_SERIALIZATION_QUIRK_SINGLE_SESSION: u64 = 1 << 4;
pub const RETRO_SERIALIZATION_QUIRK_ENDIAN_DEPENDENT: u64 = 1 << 5;
pub const RETRO_SERIALIZATION_QUIRK_PLATFORM_DEPENDENT: u64 = 1 << 6;

/// `GET_AUDIO_VIDEO_ENABLE` mask bits. Plain integer bitmask values — the
/// upstream header's trailing commas after each constant build a tuple in
/// the dynamic-language source this crate was ported from, which reads as
/// an authoring slip rather than an intentional tuple; every flag here is a
/// bare `u32`.
pub const RETRO_AV_ENABLE_VIDEO: u32 = 1 << 0;
pub const RETRO_AV_ENABLE_AUDIO: u32 = 1 << 1;
pub const RETRO_AV_ENABLE_FAST_SAVESTATES: u32 = 1 << 2;
pub const RETRO_AV_ENABLE_HARD_DISABLE_AUDIO: u32 = 1 << 3;

pub const RETRO_THROTTLE_NONE: u32 = 0;
pub const RETRO_THROTTLE_FRAME_STEPPING: u32 = 1;
pub const RETRO_THROTTLE_FAST_FORWARD: u32 = 2;
pub const RETRO_THROTTLE_SLOW_MOTION: u32 = 3;
pub const RETRO_THROTTLE_REWINDING: u32 = 4;
pub const RETRO_THROTTLE_VSYNC: u32 = 5;
pub const RETRO_THROTTLE_UNBLOCKED: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SavestateContext {
    Normal = 0,
    RunaheadSameInstance = 1,
    RunaheadSameBinary = 2,
    RollbackNetplay = 3,
}

/// `retro_fastforwarding_override`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroFastforwardingOverride {
    pub ratio: f32,
    pub fastforward: bool,
    pub notification: bool,
}

/// `retro_throttle_state`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroThrottleState {
    pub mode: u32,
    pub rate: f32,
}

impl SavestateContext {
    pub fn from_raw(value: i32) -> Option<Self> {
        Some(match value {
            0 => Self::Normal,
            1 => Self::RunaheadSameInstance,
            2 => Self::RunaheadSameBinary,
            3 => Self::RollbackNetplay,
            _ => return None,
        })
    }
}
