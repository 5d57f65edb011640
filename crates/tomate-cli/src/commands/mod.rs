pub mod config;
pub mod stats;
pub mod timer;

use std::path::PathBuf;

use tomate_core::{ConfigStore, MetricsStore};

/// Resolved file locations shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config_path: PathBuf,
    pub metrics_path: PathBuf,
}

impl Context {
    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::new(&self.config_path)
    }

    pub fn metrics_store(&self) -> MetricsStore {
        MetricsStore::new(&self.metrics_path)
    }
}
