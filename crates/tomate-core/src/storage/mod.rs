mod config;
pub mod metrics;

pub use config::{
    validate_duration, Config, ConfigPatch, ConfigSource, ConfigStore, SoundConfig, SoundPatch,
    MAX_DURATION_SECS,
};
pub use metrics::{
    avg_duration, total_duration, Metrics, MetricsStats, MetricsStore, Session, SessionSink,
};

use std::path::{Path, PathBuf};

/// Directory name under the config root.
pub const APP_DIR: &str = "tomate-cli";

pub const CONFIG_PATH_ENV: &str = "TOMATE_CONFIG_PATH";
pub const METRICS_PATH_ENV: &str = "TOMATE_METRICS_PATH";

/// Returns `$XDG_CONFIG_HOME/tomate-cli/`, falling back to `~/.config/tomate-cli/`.
///
/// The directory is not created here; the stores create it on first write.
pub fn data_dir() -> PathBuf {
    let xdg = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    data_dir_from(xdg, dirs::home_dir())
}

fn data_dir_from(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    let base = xdg_config_home.unwrap_or_else(|| {
        home.unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    });
    base.join(APP_DIR)
}

fn resolve(cli_arg: Option<&Path>, env_key: &str, file_name: &str) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }
    match std::env::var_os(env_key) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => data_dir().join(file_name),
    }
}

/// Config file location: CLI argument, then `TOMATE_CONFIG_PATH`, then the
/// data directory.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> PathBuf {
    resolve(cli_arg, CONFIG_PATH_ENV, "config.json")
}

/// Metrics file location: CLI argument, then `TOMATE_METRICS_PATH`, then the
/// data directory.
pub fn resolve_metrics_path(cli_arg: Option<&Path>) -> PathBuf {
    resolve(cli_arg, METRICS_PATH_ENV, "metrics.json")
}
