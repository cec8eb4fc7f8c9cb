/// `GET_CAMERA_INTERFACE`. No default backend ships with this host — webcam
/// access is platform-specific enough that picking one would bias the crate
/// toward a single OS — so a core asking for it simply gets told the
/// capability is absent unless an embedder wires one in.
pub trait CameraDriver: Send {
    /// Bitmask of `RETRO_CAMERA_BUFFER_*` the driver can deliver frames as.
    fn supported_buffer_types(&self) -> u32;

    fn start(&mut self, width: u32, height: u32) -> bool;

    fn stop(&mut self);

    /// Raw framebuffer frame, if the driver was started with
    /// `RETRO_CAMERA_BUFFER_RAW_FRAMEBUFFER` support and has one ready.
    fn poll_raw_frame(&mut self) -> Option<CameraFrame>;
}

pub struct CameraFrame {
    pub buffer: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub pitch: usize,
}
