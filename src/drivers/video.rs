use std::ffi::c_void;
use std::slice;

use itertools::Itertools;
use libretro_sys::PixelFormat;

/// One decoded `video_refresh` callback. `buffer` is `None` for the
/// duplicate-previous-frame signal (valid only once `GET_CAN_DUPE` has
/// returned true) and is otherwise a copy of the raw framebuffer taken
/// before returning control to the core, since the core is not obligated
/// to keep the pointer valid past the callback.
pub struct VideoFrame {
    pub buffer: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub pitch: usize,
    pub pixel_format: PixelFormat,
}

impl VideoFrame {
    /// # Safety
    /// `data` must either be null or point at `height * pitch` readable
    /// bytes, as guaranteed by the libretro `retro_video_refresh_t`
    /// contract for the duration of the call.
    pub unsafe fn from_raw(
        data: *const c_void,
        width: u32,
        height: u32,
        pitch: usize,
        pixel_format: PixelFormat,
    ) -> Option<Self> {
        if data.is_null() || data == crate::abi::RETRO_HW_FRAME_BUFFER_VALID {
            return None;
        }

        let size = height as usize * pitch;
        let buffer = slice::from_raw_parts(data.cast::<u8>(), size).to_vec();

        Some(Self {
            buffer,
            width: width as usize,
            height: height as usize,
            pitch,
            pixel_format,
        })
    }

    pub fn buffer_to_packed_argb32(&self) -> Vec<u32> {
        match self.pixel_format {
            PixelFormat::ARGB1555 => self.argb1555_buffer_to_packed_argb32(),
            PixelFormat::ARGB8888 => self.argb8888_buffer_to_packed_argb32(),
            PixelFormat::RGB565 => self.rgb565_buffer_to_packed_argb32(),
        }
    }

    fn argb8888_buffer_to_packed_argb32(&self) -> Vec<u32> {
        let bytes_per_row = 4 * self.width;

        self.buffer
            .chunks_exact(self.pitch)
            .flat_map(|row| &row[..bytes_per_row])
            .copied()
            .tuples()
            .map(|(b1, b2, b3, b4)| u32::from_ne_bytes([b1, b2, b3, b4]))
            .collect_vec()
    }

    fn argb1555_buffer_to_packed_argb32(&self) -> Vec<u32> {
        let bytes_per_row = 2 * self.width;
        let max_5bit = (2u8.pow(5) - 1) as f32;

        self.buffer
            .chunks_exact(self.pitch)
            .flat_map(|row| &row[..bytes_per_row])
            .copied()
            .tuples()
            .map(|(b1, b2)| {
                let pixel = u16::from_ne_bytes([b1, b2]);
                let a = if pixel & 0x8000 != 0 { 255 } else { 0 };
                let r = (pixel >> 10) & 0b11111;
                let r = ((r as f32 / max_5bit) * 255.).round() as u8;
                let g = (pixel >> 5) & 0b11111;
                let g = ((g as f32 / max_5bit) * 255.).round() as u8;
                let b = pixel & 0b11111;
                let b = ((b as f32 / max_5bit) * 255.).round() as u8;

                u32::from_be_bytes([a, r, g, b])
            })
            .collect_vec()
    }

    fn rgb565_buffer_to_packed_argb32(&self) -> Vec<u32> {
        let bytes_per_row = 2 * self.width;
        let max_r = (2u8.pow(5) - 1) as f32;
        let max_g = (2u8.pow(6) - 1) as f32;
        let max_b = (2u8.pow(5) - 1) as f32;

        self.buffer
            .chunks_exact(self.pitch)
            .flat_map(|row| &row[..bytes_per_row])
            .copied()
            .tuples()
            .map(|(b1, b2)| {
                let pixel = u16::from_ne_bytes([b1, b2]);
                let r = pixel >> 11;
                let r = ((r as f32 / max_r) * 255.).round() as u8;
                let g = (pixel >> 5) & 0b111111;
                let g = ((g as f32 / max_g) * 255.).round() as u8;
                let b = pixel & 0b11111;
                let b = ((b as f32 / max_b) * 255.).round() as u8;

                u32::from_be_bytes([0, r, g, b])
            })
            .collect_vec()
    }
}

/// Bytes-per-pixel and libretro wire-value helpers for the three pixel
/// formats the ABI allows.
pub trait PixelFormatExt: Sized {
    fn bytes_per_pixel(self) -> usize;
    fn from_wire_value(value: u32) -> Option<Self>;
}

impl PixelFormatExt for PixelFormat {
    fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::ARGB1555 => 2,
            PixelFormat::ARGB8888 => 4,
            PixelFormat::RGB565 => 2,
        }
    }

    fn from_wire_value(value: u32) -> Option<Self> {
        PixelFormat::from_uint(value)
    }
}

/// A direct-access software framebuffer handed back for
/// `GET_CURRENT_SOFTWARE_FRAMEBUFFER`, letting the core render straight
/// into frontend-owned memory instead of pushing frames through `refresh`.
pub struct SoftwareFramebuffer {
    pub data: *mut c_void,
    pub pitch: usize,
    pub format: u32,
    pub memory_flags: u32,
}

/// Receives decoded frames and answers the handful of AV-negotiation
/// questions the dispatcher needs (current pixel format's duplicate
/// support, preferred HW render context, software framebuffer access).
pub trait VideoDriver: Send {
    fn refresh(&mut self, frame: Option<VideoFrame>);

    /// Whether passing `buffer = NULL` to `refresh` (repeat the previous
    /// frame) is supported. Surfaced via `GET_CAN_DUPE`.
    fn can_dupe_frames(&self) -> bool {
        false
    }

    /// Surfaced via `GET_PREFERRED_HW_RENDER`; `None` declines the query.
    fn preferred_hw_render(&self) -> Option<u32> {
        None
    }

    /// `GET_CURRENT_SOFTWARE_FRAMEBUFFER`; `None` declines, which is the
    /// correct answer for any backend that doesn't keep a CPU-writable
    /// framebuffer around between `refresh` calls.
    fn current_software_framebuffer(&mut self, _width: u32, _height: u32) -> Option<SoftwareFramebuffer> {
        None
    }

    /// `GET_HW_RENDER_INTERFACE`; `None` declines. No default backend in
    /// this crate drives a hardware context.
    fn hw_render_interface(&self) -> Option<*mut c_void> {
        None
    }
}

/// Declines duplicate frames and preferred-HW-render queries, and drops
/// every frame it receives; used when no video backend is configured.
#[derive(Default)]
pub struct NullVideoDriver;

impl VideoDriver for NullVideoDriver {
    fn refresh(&mut self, _frame: Option<VideoFrame>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb8888_round_trip_is_identity() {
        let width = 2;
        let height = 1;
        let pitch = width * 4;
        let pixels: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

        let frame = VideoFrame {
            buffer: pixels.to_vec(),
            width,
            height,
            pitch,
            pixel_format: PixelFormat::ARGB8888,
        };

        let packed = frame.buffer_to_packed_argb32();
        assert_eq!(packed.len(), 2);
        assert_eq!(packed[0], u32::from_ne_bytes([1, 2, 3, 4]));
        assert_eq!(packed[1], u32::from_ne_bytes([5, 6, 7, 8]));
    }

    #[test]
    fn null_buffer_decodes_to_duplicate_frame_signal() {
        unsafe {
            let frame = VideoFrame::from_raw(std::ptr::null(), 0, 0, 0, PixelFormat::ARGB8888);
            assert!(frame.is_none());
        }
    }
}
