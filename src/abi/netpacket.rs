use std::os::raw::{c_uint, c_void};

pub const RETRO_NETPACKET_UNRELIABLE: u16 = 0;
pub const RETRO_NETPACKET_RELIABLE: u16 = 1 << 0;
pub const RETRO_NETPACKET_UNSEQUENCED: u16 = 1 << 1;
pub const RETRO_NETPACKET_FLUSH_HINT: u16 = 1 << 2;
pub const RETRO_NETPACKET_BROADCAST: u16 = 0xffff;

pub type RetroNetpacketSendT =
    unsafe extern "C" fn(flags: c_uint, buf: *const c_void, len: usize, client_id: u16, broadcast: bool);
pub type RetroNetpacketPollReceiveT = unsafe extern "C" fn();
pub type RetroNetpacketConnectedT = unsafe extern "C" fn(client_id: u16);
pub type RetroNetpacketDisconnectedT = unsafe extern "C" fn(client_id: u16);
pub type RetroNetpacketReceiveT =
    unsafe extern "C" fn(buf: *const c_void, len: usize, client_id: u16);
pub type RetroNetpacketStartT = unsafe extern "C" fn(client_id: u16, send_fn: RetroNetpacketSendT, poll_receive_fn: RetroNetpacketPollReceiveT);

/// Accepted and stored by `SET_NETPACKET_INTERFACE` but never driven: no
/// transport is implemented behind it.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroNetpacketCallback {
    pub start: Option<RetroNetpacketStartT>,
    pub receive: Option<RetroNetpacketReceiveT>,
    pub stop: Option<unsafe extern "C" fn()>,
    pub poll: Option<unsafe extern "C" fn()>,
    pub connected: Option<RetroNetpacketConnectedT>,
    pub disconnected: Option<RetroNetpacketDisconnectedT>,
}
