use std::path::{Path, PathBuf};

/// The directory/path queries a core can make (`GET_SYSTEM_DIRECTORY`,
/// `GET_SAVE_DIRECTORY`, `GET_CONTENT_DIRECTORY`, `GET_PLAYLIST_DIRECTORY`,
/// `GET_LIBRETRO_PATH`). Any method returning `None` makes the dispatcher
/// decline that command with `false`.
pub trait PathDriver: Send {
    fn system_directory(&self) -> Option<&Path> {
        None
    }

    fn save_directory(&self) -> Option<&Path> {
        None
    }

    fn content_directory(&self) -> Option<&Path> {
        None
    }

    fn playlist_directory(&self) -> Option<&Path> {
        None
    }

    /// The loaded core's own path, since the distilled spec leaves "how
    /// does the default `PathDriver` learn the core path" as an open
    /// question — resolved here by constructing the driver with it.
    fn core_path(&self) -> Option<&Path> {
        None
    }
}

pub struct DefaultPathDriver {
    pub core_path: PathBuf,
    pub system_directory: Option<PathBuf>,
    pub save_directory: Option<PathBuf>,
    pub content_directory: Option<PathBuf>,
    pub playlist_directory: Option<PathBuf>,
}

impl PathDriver for DefaultPathDriver {
    fn system_directory(&self) -> Option<&Path> {
        self.system_directory.as_deref()
    }

    fn save_directory(&self) -> Option<&Path> {
        self.save_directory.as_deref()
    }

    fn content_directory(&self) -> Option<&Path> {
        self.content_directory.as_deref()
    }

    fn playlist_directory(&self) -> Option<&Path> {
        self.playlist_directory.as_deref()
    }

    fn core_path(&self) -> Option<&Path> {
        Some(&self.core_path)
    }
}
