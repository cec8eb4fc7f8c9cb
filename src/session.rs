//! Binds a [`CoreHandle`], a loaded content bundle, and a
//! [`CompositeEnvironmentDriver`] into one run-to-completion unit. This is
//! the one piece of public API a host actually drives frame-by-frame; the
//! fluent fourth-and-final assembly step (picking drivers, core/content
//! paths) is left to the caller, since the builder that would wrap this is
//! out of scope for this crate.

use std::path::{Path, PathBuf};

use libretro_sys::{GameInfo, SystemAvInfo};

use crate::core::{callbacks, CoreHandle, LifecycleState, SystemInfo};
use crate::drivers::{ContentAttributes, ContentDriver, ContentError, LoadedContentFile};
use crate::environment::{CompositeEnvironmentDriver, CompositeEnvironmentDriverArgs};
use crate::error::SessionError;

/// Content to load: either ordinary content (one or more paths handed to
/// `retro_load_game`/no-game), or a subsystem load (`retro_load_game_special`)
/// grouping several path lists, one per declared subsystem rom slot.
pub enum Content {
    /// `paths` empty + the core has declared `support_no_game` ⇒
    /// `retro_load_game(NULL)`.
    Game(Vec<PathBuf>),
    Subsystem { game_type: u32, roms: Vec<PathBuf> },
}

/// A loaded core, its content, and the composite driver it talks to,
/// bound together for one run-to-completion session.
///
/// Not `Send`/`Sync` (inherited from [`CoreHandle`]): every method must be
/// called from the thread that created the `Session`, since the five ABI
/// trampolines recover "which session" through thread-local state.
pub struct Session {
    core: CoreHandle,
    // Boxed so the driver's address stays stable across a `Session` move;
    // `core::callbacks::install` hands the ABI trampolines a raw pointer to
    // this allocation, not to the `Session` itself.
    env: Box<CompositeEnvironmentDriver>,
    content_driver: Box<dyn ContentDriver>,
    /// Content the core required stay pointer-stable for its whole
    /// lifetime: anything loaded with `need_fullpath == false` (the core
    /// may have kept a reference into the buffer past `retro_load_game`
    /// returning) or explicitly marked persistent via a content-info
    /// override. Held here, not in the transient `LoadedContentGuard`,
    /// precisely so it outlives the load scope.
    persistent_content: Vec<LoadedContentFile>,
}

impl Session {
    /// Loads `core_path`, runs it through `retro_set_environment` +
    /// `retro_init`, then loads `content` under the core's declared
    /// extension/fullpath/persistence constraints.
    ///
    /// # Safety
    /// Must run on the thread that will drive this `Session` for its
    /// entire lifetime. `core_path` must name a shared library implementing
    /// the libretro ABI.
    pub unsafe fn load(
        core_path: impl AsRef<Path>,
        content: Content,
        env_args: CompositeEnvironmentDriverArgs,
        content_driver: Box<dyn ContentDriver>,
    ) -> Result<Self, SessionError> {
        let mut core = CoreHandle::load(core_path.as_ref())
            .map_err(|err| SessionError::CoreLoad(err.to_string()))?;

        core.init().map_err(|err| SessionError::CoreLoad(err.to_string()))?;

        let env = Box::new(CompositeEnvironmentDriver::new(env_args));

        let mut session = Self {
            core,
            env,
            content_driver,
            persistent_content: Vec::new(),
        };

        // Safety: `session.env` is heap-allocated and kept alive for the
        // rest of `session`'s lifetime; `Drop` clears the registration
        // before the allocation is freed.
        callbacks::install(&mut session.env);

        session
            .core
            .register_av_input_callbacks()
            .map_err(|err| SessionError::CoreLoad(err.to_string()))?;

        session.load_content(content)?;

        Ok(session)
    }

    fn load_content(&mut self, content: Content) -> Result<(), SessionError> {
        match content {
            Content::Game(paths) => self.load_game(&paths),
            Content::Subsystem { game_type, roms } => self.load_subsystem(game_type, &roms),
        }
    }

    fn content_attributes(&self, extension: Option<&str>) -> ContentAttributes {
        let system_info = self.core.system_info();

        let (mut need_fullpath, block_extract, mut persistent_data) = system_info
            .map(|info| (info.need_fullpath, info.block_extract, false))
            .unwrap_or_default();

        if let Some(over) = self
            .env
            .content_info_overrides()
            .iter()
            .find(|o| extension.is_some_and(|ext| o.extensions.iter().any(|e| e == ext)))
        {
            need_fullpath = over.need_fullpath;
            persistent_data = over.persistent_data;
        }

        // Invariant (§3): data handed to the core without a path, or with
        // extended game-info opted into, must stay pointer-stable for the
        // core's lifetime regardless of what the override declared.
        persistent_data |= !need_fullpath;

        ContentAttributes {
            need_fullpath,
            block_extract,
            persistent_data,
            required: true,
        }
    }

    fn load_game(&mut self, paths: &[PathBuf]) -> Result<(), SessionError> {
        if paths.is_empty() {
            if !self.env.support_no_game() {
                return Err(SessionError::Content(
                    "no content given and core does not support no-game loading".to_owned(),
                ));
            }

            unsafe { self.core.load_game(None)? };
            self.env.set_loaded_content(None);
            return Ok(());
        }

        if paths.len() > 1 {
            return Err(SessionError::Content(
                "more than one content path given for a non-subsystem load".to_owned(),
            ));
        }

        let path = &paths[0];
        self.check_extension(path)?;

        let extension = path.extension().and_then(|e| e.to_str());
        let attributes = self.content_attributes(extension);

        let guard = self
            .content_driver
            .load(paths, attributes)
            .map_err(content_error)?;

        let (persistent, mut transient) = guard.into_persistent();
        let file = persistent.first().or(transient.first()).ok_or_else(|| {
            SessionError::Content("content driver returned no files".to_owned())
        })?;

        let game_info = game_info_from_file(file);
        let result = unsafe { self.core.load_game(Some(&game_info)) };

        if result.is_ok() {
            self.env.set_loaded_content(Some(file));
        }

        // Transient buffers may be dropped once `retro_load_game` returns;
        // anything the core needed to keep was either copied out by the
        // core itself or captured via `persistent_data` above.
        transient.clear();
        self.persistent_content.extend(persistent);

        result
    }

    fn load_subsystem(&mut self, game_type: u32, roms: &[PathBuf]) -> Result<(), SessionError> {
        if roms.is_empty() {
            return Err(SessionError::Content(
                "subsystem load requires at least one rom".to_owned(),
            ));
        }

        for rom in roms {
            self.check_extension(rom)?;
        }

        let attributes = self.content_attributes(None);
        let guard = self
            .content_driver
            .load(roms, attributes)
            .map_err(content_error)?;

        let (persistent, mut transient) = guard.into_persistent();
        let mut files: Vec<&LoadedContentFile> = Vec::with_capacity(roms.len());
        files.extend(persistent.iter());
        files.extend(transient.iter());

        if files.len() != roms.len() {
            return Err(SessionError::Content(
                "content driver returned a different number of files than roms given".to_owned(),
            ));
        }

        let game_infos: Vec<GameInfo> = files.iter().map(|f| game_info_from_file(f)).collect();
        let result = unsafe { self.core.load_game_special(game_type, &game_infos) };

        if result.is_ok() {
            self.env.set_loaded_content(files.first().copied());
        }

        transient.clear();
        self.persistent_content.extend(persistent);

        result
    }

    fn check_extension(&self, path: &Path) -> Result<(), SessionError> {
        let Some(system_info) = self.core.system_info() else {
            return Ok(());
        };

        if system_info.valid_extensions.is_empty() {
            return Ok(());
        }

        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Err(SessionError::Content(format!(
                "`{}` has no extension but core declared `{:?}`",
                path.display(),
                system_info.valid_extensions
            )));
        };

        if system_info
            .valid_extensions
            .iter()
            .any(|valid| valid.eq_ignore_ascii_case(ext))
        {
            Ok(())
        } else {
            Err(SessionError::Content(format!(
                "extension `{ext}` not declared as valid by the core"
            )))
        }
    }

    pub fn system_info(&self) -> Option<&SystemInfo> {
        self.core.system_info()
    }

    pub fn av_info(&self) -> SystemAvInfo {
        self.env.av_info()
    }

    /// Runs exactly one `retro_run`. The core may call `environment`,
    /// `video_refresh`, `audio_sample`(`_batch`), and `input_poll`/
    /// `input_state` any number of times, in any interleaving, during this
    /// one call.
    pub fn run_one_frame(&mut self) -> Result<(), SessionError> {
        unsafe { self.core.run() }?;
        self.env.note_frame_ran();
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), SessionError> {
        unsafe { self.core.reset() }
    }

    pub fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        self.core.serialize()
    }

    pub fn unserialize(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.core.unserialize(data)
    }

    pub fn cheat_reset(&mut self) {
        self.core.cheat_reset();
    }

    pub fn cheat_set(&mut self, index: u32, enabled: bool, code: &std::ffi::CStr) {
        self.core.cheat_set(index, enabled, code);
    }

    /// `(pointer, length)` for one of the `RETRO_MEMORY_*` regions;
    /// `length == 0` for an empty/unsupported region.
    pub fn get_memory(&self, region: u32) -> (*mut std::ffi::c_void, usize) {
        self.core.get_memory(region)
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.core.state()
    }

    /// Reads the SHUTDOWN flag a core may have raised through the
    /// environment callback. Checked between frames, never mid-`retro_run`.
    pub fn shutdown_requested(&self) -> bool {
        self.env.shutdown_requested()
    }

    /// Drains the last ABI-boundary error a trampoline recorded (an
    /// unsupported command is not an error; this is for genuine violations).
    pub fn take_last_error(&mut self) -> Option<String> {
        self.env.take_last_error()
    }

    /// `retro_unload_game` followed by `retro_deinit`, leaving only the
    /// library handle open. Idempotent with `Drop`: calling this explicitly
    /// lets a caller observe failures `Drop` can only log.
    pub fn unload(mut self) -> Result<(), SessionError> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<(), SessionError> {
        match self.core.state() {
            LifecycleState::GameLoaded | LifecycleState::Running => unsafe {
                self.core.unload_game()?;
                self.core.deinit()?;
            },
            LifecycleState::Unloaded => unsafe {
                self.core.deinit()?;
            },
            _ => {}
        }

        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            log::error!("error tearing down session: {err}");
        }

        callbacks::clear_active();
    }
}

fn content_error(err: ContentError) -> SessionError {
    SessionError::Content(err.to_string())
}

fn game_info_from_file(file: &LoadedContentFile) -> GameInfo {
    GameInfo {
        path: file
            .path
            .as_deref()
            .map(path_to_cstring_ptr)
            .unwrap_or(std::ptr::null()),
        data: file
            .data
            .as_deref()
            .map(|d| d.as_ptr().cast::<std::ffi::c_void>())
            .unwrap_or(std::ptr::null()),
        size: file.data.as_deref().map(<[u8]>::len).unwrap_or(0),
        meta: std::ptr::null(),
    }
}

/// Leaks a `CString` for the duration of the process: `retro_game_info`'s
/// `path` only needs to be valid for the `retro_load_game` call itself, but
/// leaking keeps this helper infallible and avoids tracking a second
/// lifetime through `Session` for a handful of short-lived path strings.
fn path_to_cstring_ptr(path: &Path) -> *const std::os::raw::c_char {
    let c_string = std::ffi::CString::new(path.to_string_lossy().into_owned()).unwrap_or_default();
    c_string.into_raw()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_info_from_file_with_data_has_null_path() {
        let file = LoadedContentFile {
            path: None,
            data: Some(vec![1, 2, 3]),
            persistent: false,
        };

        let info = game_info_from_file(&file);
        assert!(info.path.is_null());
        assert_eq!(info.size, 3);
        assert!(!info.data.is_null());
    }

    #[test]
    fn game_info_from_file_with_fullpath_has_null_data() {
        let file = LoadedContentFile {
            path: Some(PathBuf::from("/tmp/rom.bin")),
            data: None,
            persistent: false,
        };

        let info = game_info_from_file(&file);
        assert!(info.data.is_null());
        assert_eq!(info.size, 0);
        assert!(!info.path.is_null());
    }
}
