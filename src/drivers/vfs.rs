use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::abi::{
    RETRO_VFS_FILE_ACCESS_READ, RETRO_VFS_FILE_ACCESS_READ_WRITE, RETRO_VFS_FILE_ACCESS_UPDATE_EXISTING,
    RETRO_VFS_FILE_ACCESS_WRITE, RETRO_VFS_SEEK_POSITION_CURRENT, RETRO_VFS_SEEK_POSITION_END,
    RETRO_VFS_SEEK_POSITION_START,
};

/// `GET_VFS_INTERFACE`, versions 1 and 2 (directory iteration, v3, has no
/// default backend yet — see `crate::abi::RetroVfsInterface`).
pub trait FileSystemInterface: Send {
    fn open(&mut self, path: &Path, access: u32) -> Option<u64>;
    fn close(&mut self, handle: u64);

    /// `retro_vfs_get_path`: the path a handle was opened with.
    fn path(&self, handle: u64) -> Option<&Path>;
    fn size(&mut self, handle: u64) -> Option<u64>;
    fn truncate(&mut self, handle: u64, length: u64) -> bool;
    fn tell(&mut self, handle: u64) -> Option<u64>;
    fn seek(&mut self, handle: u64, offset: i64, position: i32) -> Option<u64>;
    fn read(&mut self, handle: u64, buf: &mut [u8]) -> Option<u64>;
    fn write(&mut self, handle: u64, buf: &[u8]) -> Option<u64>;
    fn flush(&mut self, handle: u64) -> bool;
    fn remove(&mut self, path: &Path) -> bool;
    fn rename(&mut self, old_path: &Path, new_path: &Path) -> bool;
    fn mkdir(&mut self, dir: &Path) -> bool;
}

/// Backs every call with `std::fs`, keeping open handles in an indexmap
/// keyed by a monotonically increasing id (the ABI only ever sees the id,
/// never a real pointer, since the `File` lives entirely on this side).
pub struct StdFileSystemInterface {
    next_handle: u64,
    open_files: std::collections::HashMap<u64, (File, PathBuf)>,
}

impl Default for StdFileSystemInterface {
    fn default() -> Self {
        Self {
            // Starts at 1 so a handle never collides with a null pointer
            // once the ABI layer casts it to `retro_vfs_file_handle *`.
            next_handle: 1,
            open_files: std::collections::HashMap::new(),
        }
    }
}

impl StdFileSystemInterface {
    fn open_options(access: u32) -> OpenOptions {
        let mut options = OpenOptions::new();

        let writable = access & RETRO_VFS_FILE_ACCESS_WRITE != 0
            || access & RETRO_VFS_FILE_ACCESS_READ_WRITE == RETRO_VFS_FILE_ACCESS_READ_WRITE;

        options.read(access & RETRO_VFS_FILE_ACCESS_READ != 0 || !writable);

        if writable {
            options.write(true);

            if access & RETRO_VFS_FILE_ACCESS_UPDATE_EXISTING == 0 {
                options.create(true).truncate(true);
            } else {
                options.create(false);
            }
        }

        options
    }
}

impl FileSystemInterface for StdFileSystemInterface {
    fn open(&mut self, path: &Path, access: u32) -> Option<u64> {
        let file = Self::open_options(access).open(path).ok()?;
        let handle = self.next_handle;
        self.next_handle += 1;
        self.open_files.insert(handle, (file, path.to_path_buf()));
        Some(handle)
    }

    fn close(&mut self, handle: u64) {
        self.open_files.remove(&handle);
    }

    fn path(&self, handle: u64) -> Option<&Path> {
        self.open_files.get(&handle).map(|(_, path)| path.as_path())
    }

    fn size(&mut self, handle: u64) -> Option<u64> {
        self.open_files
            .get(&handle)?
            .0
            .metadata()
            .ok()
            .map(|m| m.len())
    }

    fn truncate(&mut self, handle: u64, length: u64) -> bool {
        self.open_files
            .get(&handle)
            .map(|(f, _)| f.set_len(length).is_ok())
            .unwrap_or(false)
    }

    fn tell(&mut self, handle: u64) -> Option<u64> {
        self.open_files.get_mut(&handle)?.0.stream_position().ok()
    }

    fn seek(&mut self, handle: u64, offset: i64, position: i32) -> Option<u64> {
        let seek_from = match position {
            p if p == RETRO_VFS_SEEK_POSITION_START => SeekFrom::Start(offset as u64),
            p if p == RETRO_VFS_SEEK_POSITION_CURRENT => SeekFrom::Current(offset),
            p if p == RETRO_VFS_SEEK_POSITION_END => SeekFrom::End(offset),
            _ => return None,
        };

        self.open_files.get_mut(&handle)?.0.seek(seek_from).ok()
    }

    fn read(&mut self, handle: u64, buf: &mut [u8]) -> Option<u64> {
        self.open_files
            .get_mut(&handle)?
            .0
            .read(buf)
            .ok()
            .map(|n| n as u64)
    }

    fn write(&mut self, handle: u64, buf: &[u8]) -> Option<u64> {
        self.open_files
            .get_mut(&handle)?
            .0
            .write(buf)
            .ok()
            .map(|n| n as u64)
    }

    fn flush(&mut self, handle: u64) -> bool {
        self.open_files
            .get_mut(&handle)
            .map(|(f, _)| f.flush().is_ok())
            .unwrap_or(false)
    }

    fn remove(&mut self, path: &Path) -> bool {
        fs::remove_file(path).is_ok()
    }

    fn rename(&mut self, old_path: &Path, new_path: &Path) -> bool {
        fs::rename(old_path, new_path).is_ok()
    }

    fn mkdir(&mut self, dir: &Path) -> bool {
        fs::create_dir(dir).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_back_round_trips() {
        let dir = std::env::temp_dir().join(format!("libretro-host-vfs-test-{:p}", &0u8 as *const u8));
        fs::create_dir_all(&dir).unwrap();
        let path: PathBuf = dir.join("scratch.bin");

        let mut vfs = StdFileSystemInterface::default();
        let handle = vfs
            .open(&path, RETRO_VFS_FILE_ACCESS_WRITE)
            .expect("open for write");
        assert_eq!(vfs.write(handle, b"hello"), Some(5));
        vfs.close(handle);

        let handle = vfs.open(&path, RETRO_VFS_FILE_ACCESS_READ).expect("open for read");
        let mut buf = [0u8; 5];
        assert_eq!(vfs.read(handle, &mut buf), Some(5));
        assert_eq!(&buf, b"hello");
        vfs.close(handle);

        fs::remove_dir_all(&dir).ok();
    }
}
