//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging (console on web, env_logger natively)
//! - Storage (LocalStorage on web, JSON files natively)

use crate::error::Result;

#[cfg(not(target_arch = "wasm32"))]
pub use native::*;
#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use super::Result;
    use crate::persistence::FileStore;

    /// Environment variable overriding the data directory
    pub const DATA_DIR_ENV: &str = "QUESTLOG_DATA_DIR";

    /// Store backing a session on this platform
    pub type PlatformStore = FileStore;

    pub fn init_logging() {
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info"),
        )
        .try_init();
    }

    /// `$QUESTLOG_DATA_DIR`, else `<data dir>/questlog`, else `./.questlog`
    pub fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        dirs::data_dir()
            .map(|d| d.join("questlog"))
            .unwrap_or_else(|| PathBuf::from(".questlog"))
    }

    pub fn open_store() -> Result<PlatformStore> {
        FileStore::open(data_dir())
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::Result;
    use crate::persistence::LocalStorageStore;

    pub type PlatformStore = LocalStorageStore;

    pub fn init_logging() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }

    pub fn open_store() -> Result<PlatformStore> {
        LocalStorageStore::open(LocalStorageStore::DEFAULT_PREFIX)
    }
}
