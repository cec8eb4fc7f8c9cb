use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content file not found: {0}")]
    NotFound(PathBuf),
    #[error("extension `{0}` not declared as valid by the core")]
    ExtensionMismatch(String),
    #[error("core requires a path but only in-memory data was supplied")]
    NeedFullpath,
    #[error("core forbids archive members but an archive-entry path was supplied")]
    BlockExtract,
}

/// One `(info, extended-info)` pair for a loaded content file. `info_ext`
/// is populated only once a core has queried `GET_GAME_INFO_EXT`.
pub struct LoadedContentFile {
    pub path: Option<PathBuf>,
    pub data: Option<Vec<u8>>,
    pub persistent: bool,
}

/// Attributes a `ContentDriver` enforces before handing content to the
/// core, taken from `retro_system_info` plus any per-extension override.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentAttributes {
    pub need_fullpath: bool,
    pub block_extract: bool,
    pub persistent_data: bool,
    pub required: bool,
}

/// Loads content under a scoped-resource discipline: the guard returned by
/// `ContentDriver::load` owns every non-persistent file and releases them
/// on `Drop`; persistent files must be moved out into driver-owned storage
/// before that happens (`into_persistent`).
pub struct LoadedContentGuard {
    files: Vec<LoadedContentFile>,
}

impl LoadedContentGuard {
    pub fn new(files: Vec<LoadedContentFile>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[LoadedContentFile] {
        &self.files
    }

    /// Splits off the files the core declared persistent so they can be
    /// transferred to driver-owned storage before this guard (and the
    /// non-persistent files still inside it) drops.
    pub fn into_persistent(mut self) -> (Vec<LoadedContentFile>, Vec<LoadedContentFile>) {
        let persistent = self
            .files
            .iter()
            .position(|f| f.persistent)
            .map(|_| {
                let (persistent, transient): (Vec<_>, Vec<_>) =
                    std::mem::take(&mut self.files).into_iter().partition(|f| f.persistent);
                self.files = transient;
                persistent
            })
            .unwrap_or_default();

        let transient = std::mem::take(&mut self.files);
        (persistent, transient)
    }
}

impl Drop for LoadedContentGuard {
    fn drop(&mut self) {
        // Non-persistent buffers are simply released here; nothing further
        // to flush or sync since the frontend never mutates core content.
        self.files.clear();
    }
}

pub trait ContentDriver: Send {
    fn load(
        &mut self,
        paths: &[PathBuf],
        attributes: ContentAttributes,
    ) -> Result<LoadedContentGuard, ContentError>;
}

/// Loads straight off the filesystem with no persistence bookkeeping of
/// its own; suitable when the caller (the `Session`) is the one tracking
/// which buffers must outlive the load scope.
#[derive(Default)]
pub struct NullContentDriver;

impl ContentDriver for NullContentDriver {
    fn load(
        &mut self,
        paths: &[PathBuf],
        attributes: ContentAttributes,
    ) -> Result<LoadedContentGuard, ContentError> {
        let mut files = Vec::with_capacity(paths.len());

        for path in paths {
            if !path.exists() {
                return Err(ContentError::NotFound(path.clone()));
            }

            if attributes.need_fullpath {
                files.push(LoadedContentFile {
                    path: Some(path.clone()),
                    data: None,
                    persistent: attributes.persistent_data,
                });
            } else {
                let data = std::fs::read(path).map_err(|_| ContentError::NotFound(path.clone()))?;

                files.push(LoadedContentFile {
                    path: Some(path.clone()),
                    data: Some(data),
                    persistent: attributes.persistent_data,
                });
            }
        }

        Ok(LoadedContentGuard::new(files))
    }
}
