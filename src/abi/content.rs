use std::os::raw::{c_char, c_uint};

/// `retro_subsystem_memory_info`.
#[repr(C)]
pub struct RetroSubsystemMemoryInfo {
    pub extension: *const c_char,
    pub kind: c_uint,
}

/// `retro_subsystem_rom_info`.
#[repr(C)]
pub struct RetroSubsystemRomInfo {
    pub desc: *const c_char,
    pub valid_extensions: *const c_char,
    pub need_fullpath: bool,
    pub block_extract: bool,
    pub required: bool,
    pub memory: *const RetroSubsystemMemoryInfo,
    pub num_memory: c_uint,
}

/// `retro_subsystem_info`; the core hands an array terminated by a
/// zeroed entry (`ident == NULL`).
#[repr(C)]
pub struct RetroSubsystemInfo {
    pub desc: *const c_char,
    pub ident: *const c_char,
    pub roms: *const RetroSubsystemRomInfo,
    pub num_roms: c_uint,
    pub id: c_uint,
}

#[derive(Debug, Clone)]
pub struct SubsystemRomInfo {
    pub desc: String,
    pub valid_extensions: String,
    pub need_fullpath: bool,
    pub block_extract: bool,
    pub required: bool,
}

#[derive(Debug, Clone)]
pub struct SubsystemInfo {
    pub desc: String,
    pub ident: String,
    pub roms: Vec<SubsystemRomInfo>,
    pub id: u32,
}

/// `retro_system_content_info_override`; the core hands an array
/// terminated by `extensions == NULL`.
#[repr(C)]
pub struct RetroSystemContentInfoOverride {
    pub extensions: *const c_char,
    pub need_fullpath: bool,
    pub persistent_data: bool,
}

#[derive(Debug, Clone)]
pub struct ContentInfoOverride {
    pub extensions: Vec<String>,
    pub need_fullpath: bool,
    pub persistent_data: bool,
}

/// `retro_game_info_ext`. Read-only: the frontend fills this in when the
/// core calls `GET_GAME_INFO_EXT`, it never arrives as core input.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroGameInfoExt {
    pub full_path: *const c_char,
    pub archive_path: *const c_char,
    pub archive_file: *const c_char,
    pub dir: *const c_char,
    pub name: *const c_char,
    pub ext: *const c_char,
    pub meta: *const c_char,
    pub data: *const std::os::raw::c_void,
    pub size: usize,
    pub file_in_archive: bool,
    pub persistent_data: bool,
}

pub type RetroGetProcAddressT = unsafe extern "C" fn(sym: *const c_char) -> Option<unsafe extern "C" fn()>;

/// `retro_get_proc_address_interface`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroGetProcAddressInterface {
    pub get_proc_address: Option<RetroGetProcAddressT>,
}
