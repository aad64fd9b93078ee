// src/config/model.rs

use serde::Deserialize;

use crate::types::OnError;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [paths]
/// source = "src"
/// output = "dist"
///
/// [serve]
/// port = 3000
/// ```
///
/// All sections are optional and have reasonable defaults. This raw form is
/// only deserialized; use `Config::try_from` to get a validated [`Config`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub pipeline: PipelineSection,
    #[serde(default)]
    pub serve: ServeSection,
    #[serde(default)]
    pub watch: WatchSection,
    #[serde(default)]
    pub copy: CopySection,
    #[serde(default)]
    pub notify: NotifySection,
}

/// `[paths]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
        }
    }
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineSection {
    /// `"continue"` (default) or `"abort"`.
    #[serde(default)]
    pub on_error: OnError,
}

/// `[serve]` section: the dev server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServeSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Inject the reload client and push reload events.
    #[serde(default = "default_true")]
    pub live_reload: bool,
}

impl Default for ServeSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            live_reload: true,
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Events arriving within this window form one batch.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Skip triggers when the bound files hash the same as last time.
    #[serde(default = "default_true")]
    pub use_hash: bool,
    /// Keep at most one pending trigger per stage.
    #[serde(default = "default_true")]
    pub coalesce: bool,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            use_hash: true,
            coalesce: true,
        }
    }
}

/// `[copy]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CopySection {
    /// Single vendor script copied as-is, relative to the source root.
    #[serde(default = "default_vendor_script")]
    pub vendor_script: String,
    /// In release, don't overwrite the pages `minify-html` produced with
    /// their unminified sources.
    #[serde(default)]
    pub skip_minified_html: bool,
}

impl Default for CopySection {
    fn default() -> Self {
        Self {
            vendor_script: default_vendor_script(),
            skip_minified_html: false,
        }
    }
}

/// `[notify]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifySection {
    #[serde(default)]
    pub desktop: bool,
}

fn default_source() -> String {
    "src".to_string()
}

fn default_output() -> String {
    "dist".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_vendor_script() -> String {
    "js/libs/modernizr.js".to_string()
}

fn default_true() -> bool {
    true
}

/// Validated configuration.
///
/// Only obtainable through `Config::try_from(RawConfig)` (or
/// [`Config::default`]), so every value here has passed validation.
#[derive(Debug, Clone)]
pub struct Config {
    paths: PathsSection,
    pipeline: PipelineSection,
    serve: ServeSection,
    watch: WatchSection,
    copy: CopySection,
    notify: NotifySection,
}

impl Default for Config {
    fn default() -> Self {
        let raw = RawConfig::default();
        Self::new_unchecked(raw)
    }
}

impl Config {
    pub(crate) fn new_unchecked(raw: RawConfig) -> Self {
        Self {
            paths: raw.paths,
            pipeline: raw.pipeline,
            serve: raw.serve,
            watch: raw.watch,
            copy: raw.copy,
            notify: raw.notify,
        }
    }

    pub fn paths(&self) -> &PathsSection {
        &self.paths
    }

    pub fn pipeline(&self) -> &PipelineSection {
        &self.pipeline
    }

    pub fn serve(&self) -> &ServeSection {
        &self.serve
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }

    pub fn copy(&self) -> &CopySection {
        &self.copy
    }

    pub fn notify(&self) -> &NotifySection {
        &self.notify
    }

    pub fn base_paths(&self) -> crate::paths::BasePaths {
        crate::paths::BasePaths::new(&self.paths.source, &self.paths.output)
    }
}
