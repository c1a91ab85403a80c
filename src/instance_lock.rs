use std::path::{Path, PathBuf};

pub const LOCK_FILE: &str = "stockwatch.lock";

/// Held for the lifetime of the process, released on drop
pub struct InstanceGuard {
    path: PathBuf,
    _guard: crate::os::FileGuard,
}

impl InstanceGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[must_use]
pub fn lock_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOCK_FILE)
}

/// Fails with `WouldBlock` while another instance holds the lock
pub fn acquire(data_dir: &Path) -> std::io::Result<InstanceGuard> {
    std::fs::create_dir_all(data_dir)?;
    let path = lock_file_path(data_dir);
    let guard = crate::os::flock(&path)?;
    tracing::debug!(path = %path.display(), "instance lock acquired");
    Ok(InstanceGuard {
        path,
        _guard: guard,
    })
}
