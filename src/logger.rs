//! Diagnostic logging on stderr via env_logger.

/// Quiet by default so only progress lines reach the terminal.
const DEFAULT_FILTER: &str = "warn";

pub fn init_logger() {
    let env = env_logger::Env::default().default_filter_or(DEFAULT_FILTER);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .try_init();
}
