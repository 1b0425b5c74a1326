//! Runtime settings taken from the environment.

use std::path::PathBuf;
use std::time::Duration;

pub const CHROME_PATH_VAR: &str = "CHROME";
pub const TIMEOUT_VAR: &str = "WKHTMLTOPDF_TIMEOUT_SECS";
pub const NO_SANDBOX_VAR: &str = "WKHTMLTOPDF_NO_SANDBOX";

/// Same default as the page load timeout of common browser drivers.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Explicit browser executable; `None` lets headless_chrome look for one.
    pub chrome_path: Option<PathBuf>,
    /// Upper bound for navigation plus network idle.
    pub timeout: Duration,
    pub sandbox: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chrome_path: None,
            timeout: DEFAULT_TIMEOUT,
            sandbox: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let chrome_path = lookup(CHROME_PATH_VAR)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    log::warn!(
                        "{TIMEOUT_VAR}={raw:?} is not a positive number of seconds, using {}s",
                        defaults.timeout.as_secs()
                    );
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };

        let sandbox = match lookup(NO_SANDBOX_VAR).as_deref().map(str::trim) {
            None | Some("") | Some("0") => true,
            Some(flag) if flag.eq_ignore_ascii_case("false") => true,
            Some(flag) if flag == "1" || flag.eq_ignore_ascii_case("true") => false,
            Some(other) => {
                log::warn!("{NO_SANDBOX_VAR}={other:?} is not a boolean, keeping the sandbox");
                true
            }
        };

        Self {
            chrome_path,
            timeout,
            sandbox,
        }
    }
}
