use std::{
    fs::{File, OpenOptions},
    io::Write,
    os::fd::AsRawFd,
    path::Path,
};

use nix::fcntl::{self, FlockArg};

pub struct FileGuard {
    file: File,
}

impl Drop for FileGuard {
    fn drop(&mut self) {
        _ = fcntl::flock(self.file.as_raw_fd(), FlockArg::Unlock);
    }
}

/// Exclusive non-blocking lock, the holder's pid is written into the file
pub fn flock(path: &Path) -> std::io::Result<FileGuard> {
    let mut file = OpenOptions::new().write(true).create(true).open(path)?;
    fcntl::flock(file.as_raw_fd(), FlockArg::LockExclusiveNonblock)?;
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    Ok(FileGuard { file })
}
