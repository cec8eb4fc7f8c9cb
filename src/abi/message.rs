use std::os::raw::c_char;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MessageTarget {
    All = 0,
    Osd = 1,
    Log = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MessageType {
    Notification = 0,
    NotificationAlt = 1,
    Status = 2,
    Progress = 3,
}

/// `retro_message_ext`. The legacy `retro_message` is just `{msg, frames}`,
/// already covered by `libretro_sys::Message`.
#[repr(C)]
pub struct RetroMessageExt {
    pub msg: *const c_char,
    pub duration: u32,
    pub priority: u32,
    pub level: u32,
    pub target: u32,
    pub kind: u32,
    pub progress: i8,
}
