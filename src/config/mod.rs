//! TOML-based configuration.
//!
//! Supports a config file (tabula.toml) with environment variable
//! expansion.
//!
//! Example configuration:
//! ```toml
//! [preview]
//! row_cap = 100
//! timeout_seconds = 15
//!
//! [store]
//! path = "${HOME}/.local/share/tabula/queries.db"
//!
//! [dataset]
//! path = "./data/community.json"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 7878
//! ```

mod settings;

pub use settings::{
    DatasetSettings, PreviewSettings, ServerSettings, Settings, SettingsError, StoreSettings,
};
