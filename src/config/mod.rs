// src/config/mod.rs

//! Configuration loading and validation for assetpipe.
//!
//! - `model.rs`: the TOML-backed data model and the validated `Config`.
//! - `loader.rs`: reading a config file (or falling back to defaults).
//! - `validate.rs`: `RawConfig -> Config` checks.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    Config, CopySection, NotifySection, PathsSection, PipelineSection, RawConfig, ServeSection,
    WatchSection,
};
pub use validate::validate_raw_config;
