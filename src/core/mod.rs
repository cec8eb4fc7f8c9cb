//! The libretro ABI bridge: a loaded shared library, its resolved entry
//! points, and the lifecycle state machine that governs which of them may
//! legally be called next.

use std::ffi::c_void;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use libretro_sys::{GameGeometry, GameInfo, SystemAvInfo, SystemTiming};

use crate::error::SessionError;

mod api;
use self::api::Api;

pub mod callbacks;

mod memory_map;
pub use memory_map::MemoryMap;

mod state;
use self::state::IS_CORE_LOADED;

const EXPECTED_LIBRETRO_API_VERSION: u32 = 1;

/// `Loaded → Initialized → GameLoaded → Running ↔ Running → Unloaded →
/// Deinitialized → Closed`, per the libretro lifecycle contract. Every
/// [`CoreHandle`] method that crosses the ABI checks the current state
/// first and fails with [`SessionError::WrongState`] rather than calling
/// into the core out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Loaded,
    Initialized,
    GameLoaded,
    Running,
    Unloaded,
    Deinitialized,
    Closed,
}

/// A loaded core's shared library plus its resolved entry points and
/// lifecycle state. Not `Send`/`Sync`: a core's global state is only safe
/// to touch from the thread that loaded it.
pub struct CoreHandle {
    api: Api,
    state: LifecycleState,
    path: PathBuf,
    system_info: Option<SystemInfo>,
    _not_send_sync: std::marker::PhantomData<*const ()>,
}

impl CoreHandle {
    /// Loads the shared library at `path` and checks `retro_api_version`.
    /// Does not call `retro_init` yet — see [`Self::init`].
    ///
    /// # Safety
    /// `path` must name a shared library that implements the libretro ABI.
    pub unsafe fn load(path: impl AsRef<Path>) -> Result<Self> {
        if IS_CORE_LOADED.with(|loaded| loaded.get()) {
            bail!("only one core may be loaded per thread");
        }

        let path = path.as_ref().to_path_buf();
        let api = Api::load(&path).context("failed to load core library")?;

        let api_version = (api.retro_api_version)();

        if api_version != EXPECTED_LIBRETRO_API_VERSION {
            bail!(
                "core was compiled against libretro API version `{api_version}`, \
                 but this host expects version `{EXPECTED_LIBRETRO_API_VERSION}`"
            );
        }

        IS_CORE_LOADED.with(|loaded| loaded.set(true));

        Ok(Self {
            api,
            state: LifecycleState::Loaded,
            path,
            system_info: None,
            _not_send_sync: std::marker::PhantomData,
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn system_info(&self) -> Option<&SystemInfo> {
        self.system_info.as_ref()
    }

    /// Installs the `environment` trampoline and calls `retro_init`. The
    /// environment callback is the one callback libretro permits a core to
    /// invoke during its own init, which is why it must be registered
    /// first.
    ///
    /// # Safety
    /// Must be called on the thread that will drive this core for its
    /// entire lifetime; the environment trampoline resolves "which core is
    /// this" through thread-local state installed here.
    pub unsafe fn init(&mut self) -> Result<()> {
        self.ensure_state("init", &[LifecycleState::Loaded])?;

        (self.api.retro_set_environment)(callbacks::ffi::environment);
        (self.api.retro_init)();

        self.system_info = Some(self.query_system_info());
        self.state = LifecycleState::Initialized;

        Ok(())
    }

    /// Installs the video/audio/input trampolines. Must run before
    /// [`Self::load_game`].
    ///
    /// # Safety
    /// Same thread-ownership requirement as [`Self::init`].
    pub unsafe fn register_av_input_callbacks(&mut self) -> Result<()> {
        self.ensure_state(
            "register_av_input_callbacks",
            &[LifecycleState::Initialized],
        )?;

        (self.api.retro_set_video_refresh)(callbacks::ffi::video_refresh);
        (self.api.retro_set_audio_sample)(callbacks::ffi::audio_sample);
        (self.api.retro_set_audio_sample_batch)(callbacks::ffi::audio_sample_batch);
        (self.api.retro_set_input_poll)(callbacks::ffi::input_poll);
        (self.api.retro_set_input_state)(callbacks::ffi::input_state);

        Ok(())
    }

    /// # Safety
    /// Same thread-ownership requirement as [`Self::init`]; `info` must
    /// remain valid for the duration of the call.
    pub unsafe fn load_game(&mut self, info: Option<&GameInfo>) -> Result<(), SessionError> {
        self.ensure_state("load_game", &[LifecycleState::Initialized])?;

        let ptr = info
            .map(|info| info as *const GameInfo)
            .unwrap_or(std::ptr::null());

        let success = (self.api.retro_load_game)(ptr);

        if !success {
            return Err(SessionError::Content(
                "retro_load_game returned false".to_owned(),
            ));
        }

        self.state = LifecycleState::GameLoaded;

        Ok(())
    }

    /// # Safety
    /// Same requirements as [`Self::load_game`].
    pub unsafe fn load_game_special(
        &mut self,
        game_type: u32,
        info: &[GameInfo],
    ) -> Result<(), SessionError> {
        self.ensure_state("load_game_special", &[LifecycleState::Initialized])?;

        let success =
            (self.api.retro_load_game_special)(game_type, info.as_ptr(), info.len());

        if !success {
            return Err(SessionError::Content(
                "retro_load_game_special returned false".to_owned(),
            ));
        }

        self.state = LifecycleState::GameLoaded;

        Ok(())
    }

    /// # Safety
    /// Same thread-ownership requirement as [`Self::init`]. May invoke any
    /// of the five trampolines reentrantly, any number of times, in any
    /// order, during this one call.
    pub unsafe fn run(&mut self) -> Result<(), SessionError> {
        self.ensure_state(
            "run",
            &[LifecycleState::GameLoaded, LifecycleState::Running],
        )?;

        (self.api.retro_run)();
        self.state = LifecycleState::Running;

        Ok(())
    }

    /// # Safety
    /// Same thread-ownership requirement as [`Self::init`].
    pub unsafe fn reset(&mut self) -> Result<(), SessionError> {
        self.ensure_state("reset", &[LifecycleState::Running])?;

        (self.api.retro_reset)();
        self.state = LifecycleState::GameLoaded;

        Ok(())
    }

    /// # Safety
    /// Same thread-ownership requirement as [`Self::init`].
    pub unsafe fn unload_game(&mut self) -> Result<(), SessionError> {
        self.ensure_state(
            "unload_game",
            &[LifecycleState::GameLoaded, LifecycleState::Running],
        )?;

        (self.api.retro_unload_game)();
        self.state = LifecycleState::Unloaded;

        Ok(())
    }

    /// # Safety
    /// Same thread-ownership requirement as [`Self::init`].
    pub unsafe fn deinit(&mut self) -> Result<(), SessionError> {
        self.ensure_state("deinit", &[LifecycleState::Unloaded])?;

        (self.api.retro_deinit)();
        callbacks::clear_active();
        self.state = LifecycleState::Deinitialized;

        Ok(())
    }

    pub fn get_system_av_info(&self) -> SystemAvInfo {
        let mut info = SystemAvInfo {
            geometry: GameGeometry {
                aspect_ratio: f32::NAN,
                base_width: 0,
                base_height: 0,
                max_width: 0,
                max_height: 0,
            },
            timing: SystemTiming {
                fps: 0.,
                sample_rate: 0.,
            },
        };

        unsafe { (self.api.retro_get_system_av_info)(&mut info) };

        info
    }

    pub fn set_controller_port_device(&mut self, port: u32, device: u32) {
        unsafe { (self.api.retro_set_controller_port_device)(port, device) }
    }

    pub fn serialize_size(&self) -> usize {
        unsafe { (self.api.retro_serialize_size)() }
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let size = self.serialize_size();
        let mut buf = Vec::<u8>::with_capacity(size);

        unsafe {
            let success = (self.api.retro_serialize)(buf.as_mut_ptr().cast::<c_void>(), size);

            if !success {
                bail!("retro_serialize failed");
            }

            buf.set_len(size);
        }

        Ok(buf)
    }

    pub fn unserialize(&mut self, data: &[u8]) -> Result<()> {
        unsafe {
            let success = (self.api.retro_unserialize)(data.as_ptr().cast::<c_void>(), data.len());

            if !success {
                bail!("retro_unserialize failed");
            }
        }

        Ok(())
    }

    pub fn cheat_reset(&mut self) {
        unsafe { (self.api.retro_cheat_reset)() }
    }

    pub fn cheat_set(&mut self, index: u32, enabled: bool, code: &std::ffi::CStr) {
        unsafe { (self.api.retro_cheat_set)(index, enabled, code.as_ptr()) }
    }

    pub fn get_region(&self) -> u32 {
        unsafe { (self.api.retro_get_region)() }
    }

    /// Returns `(pointer, length)` for one of the `RETRO_MEMORY_*`
    /// regions; `length == 0` for an empty/unsupported region.
    pub fn get_memory(&self, region: u32) -> (*mut c_void, usize) {
        unsafe {
            let ptr = (self.api.retro_get_memory_data)(region);
            let len = (self.api.retro_get_memory_size)(region);

            (ptr, len)
        }
    }

    fn ensure_state(&self, op: &'static str, allowed: &[LifecycleState]) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::wrong_state(op, self.state))
        }
    }

    unsafe fn query_system_info(&self) -> SystemInfo {
        let mut raw = libretro_sys::SystemInfo {
            library_name: std::ptr::null(),
            library_version: std::ptr::null(),
            valid_extensions: std::ptr::null(),
            need_fullpath: false,
            block_extract: false,
        };

        (self.api.retro_get_system_info)(&mut raw);

        SystemInfo::from_raw(raw)
    }
}

impl Drop for CoreHandle {
    fn drop(&mut self) {
        if self.state != LifecycleState::Deinitialized && self.state != LifecycleState::Closed {
            log::warn!(
                "core `{}` dropped in state {:?} without a clean deinit",
                self.path.display(),
                self.state
            );
        }

        state::IS_CORE_LOADED.with(|loaded| loaded.set(false));
        self.state = LifecycleState::Closed;
    }
}

/// Owned copy of `retro_system_info`, resolved once per core load and
/// immutable thereafter.
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub library_name: String,
    pub library_version: String,
    pub valid_extensions: Vec<String>,
    pub need_fullpath: bool,
    pub block_extract: bool,
}

impl SystemInfo {
    unsafe fn from_raw(raw: libretro_sys::SystemInfo) -> Self {
        let to_string = |ptr: *const std::os::raw::c_char| -> String {
            if ptr.is_null() {
                String::new()
            } else {
                std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned()
            }
        };

        let valid_extensions = to_string(raw.valid_extensions)
            .split('|')
            .filter(|ext| !ext.is_empty())
            .map(str::to_owned)
            .collect();

        Self {
            library_name: to_string(raw.library_name),
            library_version: to_string(raw.library_version),
            valid_extensions,
            need_fullpath: raw.need_fullpath,
            block_extract: raw.block_extract,
        }
    }
}
