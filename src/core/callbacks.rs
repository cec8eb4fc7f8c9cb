//! Thread-local registry recovering "which session is this" for the five
//! `extern "C"` trampolines libretro calls into. A core only ever knows
//! raw function pointers, so the frontend side of each callback has to
//! find its way back to a [`crate::environment::CompositeEnvironmentDriver`]
//! through thread-local state rather than a captured closure.

use std::cell::Cell;
use std::ptr::NonNull;

use crate::environment::CompositeEnvironmentDriver;

thread_local! {
    static ACTIVE: Cell<Option<NonNull<CompositeEnvironmentDriver>>> = const { Cell::new(None) };
}

/// Registers `driver` as the target of this thread's trampolines.
///
/// # Safety
/// `driver` must outlive every subsequent trampoline call until
/// [`clear_active`] runs, and must only be reachable from the thread that
/// installs it.
pub unsafe fn install(driver: &mut CompositeEnvironmentDriver) {
    ACTIVE.with(|active| active.set(Some(NonNull::from(driver))));
}

/// Unregisters the active driver. Called from [`super::CoreHandle::deinit`]
/// so a stale pointer can never outlive the core that installed it.
pub fn clear_active() {
    ACTIVE.with(|active| active.set(None));
}

/// Exposed so the interface-specific trampolines the dispatcher hands out
/// (rumble, sensor, LED, MIDI, VFS, ...) can reach the active driver the
/// same way the five fixed libretro callbacks do.
pub(crate) fn with_active<R>(f: impl FnOnce(&mut CompositeEnvironmentDriver) -> R) -> Option<R> {
    ACTIVE.with(|active| {
        let mut ptr = active.get()?;
        // Safety: `install` guarantees this pointer outlives every call
        // until `clear_active` runs on the same thread.
        Some(f(unsafe { ptr.as_mut() }))
    })
}

/// The actual `extern "C"` functions registered with a loaded core.
pub mod ffi {
    use std::ffi::{c_uint, c_void};
    use std::slice;

    use super::with_active;
    use crate::drivers::VideoFrame;

    pub unsafe extern "C" fn video_refresh(
        data: *const c_void,
        width: c_uint,
        height: c_uint,
        pitch: usize,
    ) {
        with_active(|driver| {
            let pixel_format = driver.pixel_format();
            let frame = VideoFrame::from_raw(data, width, height, pitch, pixel_format);
            driver.video_refresh(frame);
        });
    }

    pub unsafe extern "C" fn audio_sample(left: i16, right: i16) {
        with_active(|driver| driver.audio_sample(left, right));
    }

    pub unsafe extern "C" fn audio_sample_batch(samples: *const i16, num_frames: usize) -> usize {
        let samples = if samples.is_null() || num_frames == 0 {
            &[]
        } else {
            slice::from_raw_parts(samples, num_frames * 2)
        };

        with_active(|driver| driver.audio_sample_batch(samples)).unwrap_or(num_frames)
    }

    pub unsafe extern "C" fn input_poll() {
        with_active(|driver| driver.input_poll());
    }

    pub unsafe extern "C" fn input_state(
        port: c_uint,
        device: c_uint,
        index: c_uint,
        id: c_uint,
    ) -> i16 {
        with_active(|driver| driver.input_state(port, device, index, id)).unwrap_or(0)
    }

    pub unsafe extern "C" fn environment(command: u32, data: *mut c_void) -> bool {
        with_active(|driver| driver.dispatch(command, data)).unwrap_or(false)
    }
}
