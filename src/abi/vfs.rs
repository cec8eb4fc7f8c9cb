use std::os::raw::{c_char, c_int64, c_uint, c_void};

pub const RETRO_VFS_FILE_ACCESS_READ: u32 = 1 << 0;
pub const RETRO_VFS_FILE_ACCESS_WRITE: u32 = 1 << 1;
pub const RETRO_VFS_FILE_ACCESS_READ_WRITE: u32 =
    RETRO_VFS_FILE_ACCESS_READ | RETRO_VFS_FILE_ACCESS_WRITE;
pub const RETRO_VFS_FILE_ACCESS_UPDATE_EXISTING: u32 = 1 << 2;

pub const RETRO_VFS_FILE_ACCESS_HINT_NONE: u32 = 0;
pub const RETRO_VFS_FILE_ACCESS_HINT_FREQUENT_ACCESS: u32 = 1 << 0;

pub const RETRO_VFS_SEEK_POSITION_START: i32 = 0;
pub const RETRO_VFS_SEEK_POSITION_CURRENT: i32 = 1;
pub const RETRO_VFS_SEEK_POSITION_END: i32 = 2;

pub const RETRO_VFS_STAT_IS_VALID: u32 = 1 << 0;
pub const RETRO_VFS_STAT_IS_DIRECTORY: u32 = 1 << 1;
pub const RETRO_VFS_STAT_IS_CHARACTER_SPECIAL: u32 = 1 << 2;

/// Opaque handle type the default `FileSystemInterface` backend hides
/// behind `*mut c_void` at the ABI boundary.
pub enum RetroVfsFileHandle {}

pub type RetroVfsGetPathT = unsafe extern "C" fn(stream: *mut RetroVfsFileHandle) -> *const c_char;
pub type RetroVfsOpenT = unsafe extern "C" fn(
    path: *const c_char,
    mode: c_uint,
    hints: c_uint,
) -> *mut RetroVfsFileHandle;
pub type RetroVfsCloseT = unsafe extern "C" fn(stream: *mut RetroVfsFileHandle) -> c_int64;
pub type RetroVfsSizeT = unsafe extern "C" fn(stream: *mut RetroVfsFileHandle) -> c_int64;
pub type RetroVfsTruncateT =
    unsafe extern "C" fn(stream: *mut RetroVfsFileHandle, length: c_int64) -> c_int64;
pub type RetroVfsTellT = unsafe extern "C" fn(stream: *mut RetroVfsFileHandle) -> c_int64;
pub type RetroVfsSeekT =
    unsafe extern "C" fn(stream: *mut RetroVfsFileHandle, offset: c_int64, seek_position: c_int) -> c_int64;
pub type RetroVfsReadT =
    unsafe extern "C" fn(stream: *mut RetroVfsFileHandle, s: *mut c_void, len: u64) -> c_int64;
pub type RetroVfsWriteT =
    unsafe extern "C" fn(stream: *mut RetroVfsFileHandle, s: *const c_void, len: u64) -> c_int64;
pub type RetroVfsFlushT = unsafe extern "C" fn(stream: *mut RetroVfsFileHandle) -> c_int;
pub type RetroVfsRemoveT = unsafe extern "C" fn(path: *const c_char) -> c_int;
pub type RetroVfsRenameT = unsafe extern "C" fn(old_path: *const c_char, new_path: *const c_char) -> c_int;

#[repr(C)]
pub struct RetroVfsInterfaceInfo {
    pub required_interface_version: u32,
    pub iface: *mut RetroVfsInterface,
}

/// `retro_vfs_interface`, version 1/2/3 fields concatenated — a frontend
/// reporting version N leaves the fields newer than N as null, which every
/// caller must tolerate (mirrors how the real header layers the structs).
#[repr(C)]
pub struct RetroVfsInterface {
    pub get_path: Option<RetroVfsGetPathT>,
    pub open: Option<RetroVfsOpenT>,
    pub close: Option<RetroVfsCloseT>,
    pub size: Option<RetroVfsSizeT>,
    pub truncate: Option<RetroVfsTruncateT>,
    pub tell: Option<RetroVfsTellT>,
    pub seek: Option<RetroVfsSeekT>,
    pub read: Option<RetroVfsReadT>,
    pub write: Option<RetroVfsWriteT>,
    pub flush: Option<RetroVfsFlushT>,
    pub remove: Option<RetroVfsRemoveT>,
    pub rename: Option<RetroVfsRenameT>,
    // v2
    pub mkdir: Option<unsafe extern "C" fn(dir: *const c_char) -> c_int>,
    // v3 directory iteration omitted: no default backend drives it yet.
}
