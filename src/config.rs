use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Args;
use crate::path_env;

pub const SERVER_URL_ENV: &str = "STOCKWATCH_SERVER_URL";
pub const TIMEOUT_ENV: &str = "STOCKWATCH_TIMEOUT_SECS";

pub const DEFAULT_SERVER_URL: &str = "http://131.181.190.87:3001";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime settings: CLI flags over environment over defaults
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub server_url: String,
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Config {
    pub fn load(args: &Args) -> Self {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    fn resolve(args: &Args, env: impl Fn(&str) -> Option<String>) -> Self {
        let server_url = args
            .server
            .clone()
            .or_else(|| non_blank(env(SERVER_URL_ENV)))
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let data_dir = path_env::path_from(env(path_env::DATA_DIR_ENV))
            .unwrap_or_else(path_env::data_dir);

        let request_timeout = match non_blank(env(TIMEOUT_ENV)) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %raw, "invalid {TIMEOUT_ENV}, using default");
                    DEFAULT_TIMEOUT
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        Self {
            server_url,
            data_dir,
            request_timeout,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
