// src/config/validate.rs

use std::path::{Component, Path};

use crate::config::model::{Config, RawConfig};
use crate::errors::{AssetpipeError, Result};
use crate::paths::is_within;

impl TryFrom<RawConfig> for Config {
    type Error = AssetpipeError;

    fn try_from(mut raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        trim_in_place(&mut raw.paths.source);
        trim_in_place(&mut raw.paths.output);
        trim_in_place(&mut raw.serve.host);
        trim_in_place(&mut raw.copy.vendor_script);
        validate_raw_config(&raw)?;
        Ok(Config::new_unchecked(raw))
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Run every semantic check on a raw config.
pub fn validate_raw_config(cfg: &RawConfig) -> Result<()> {
    validate_paths(cfg)?;
    validate_serve(cfg)?;
    validate_copy(cfg)?;
    Ok(())
}

fn config_error(msg: impl Into<String>) -> AssetpipeError {
    AssetpipeError::ConfigError(msg.into())
}

fn validate_paths(cfg: &RawConfig) -> Result<()> {
    let source = cfg.paths.source.trim();
    let output = cfg.paths.output.trim();

    if source.is_empty() {
        return Err(config_error("[paths].source must not be empty"));
    }
    if output.is_empty() {
        return Err(config_error("[paths].output must not be empty"));
    }

    let source = Path::new(source);
    let output = Path::new(output);

    // `clean` wipes the output root, so it must never cover the sources.
    // `is_within` resolves both against the current directory.
    if is_within(output, source) {
        return Err(config_error(format!(
            "[paths].output ({}) must not be or contain [paths].source ({})",
            output.display(),
            source.display()
        )));
    }
    if is_within(source, output) {
        return Err(config_error(format!(
            "[paths].output ({}) must not be inside [paths].source ({})",
            output.display(),
            source.display()
        )));
    }
    Ok(())
}

fn validate_serve(cfg: &RawConfig) -> Result<()> {
    if cfg.serve.port == 0 {
        return Err(config_error("[serve].port must be >= 1 (got 0)"));
    }
    if cfg.serve.host.trim().is_empty() {
        return Err(config_error("[serve].host must not be empty"));
    }
    Ok(())
}

fn validate_copy(cfg: &RawConfig) -> Result<()> {
    let vendor = cfg.copy.vendor_script.trim();
    if vendor.is_empty() {
        return Err(config_error("[copy].vendor_script must not be empty"));
    }
    let escapes = Path::new(vendor)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(config_error(format!(
            "[copy].vendor_script must be relative to the source root without `..` (got {vendor})"
        )));
    }
    Ok(())
}
