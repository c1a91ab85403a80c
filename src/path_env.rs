use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "STOCKWATCH_DATA_DIR";

/// Directory override from an environment variable, blank values ignored
#[must_use]
pub fn dir_override(key: &str) -> Option<PathBuf> {
    path_from(std::env::var(key).ok())
}

/// Where the watchlist and the instance lock live
#[must_use]
pub fn data_dir() -> PathBuf {
    dir_override(DATA_DIR_ENV).unwrap_or_else(default_data_dir)
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
        .unwrap_or_else(std::env::temp_dir)
        .join("stockwatch")
}

pub(crate) fn path_from(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
