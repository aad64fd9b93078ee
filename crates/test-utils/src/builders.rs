#![allow(dead_code)]

use assetpipe::config::{Config, RawConfig};
use assetpipe::types::OnError;

/// Builder for `Config` to simplify test setup.
pub struct ConfigBuilder {
    config: RawConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfig::default(),
        }
    }

    pub fn source(mut self, source: &str) -> Self {
        self.config.paths.source = source.to_string();
        self
    }

    pub fn output(mut self, output: &str) -> Self {
        self.config.paths.output = output.to_string();
        self
    }

    pub fn on_error(mut self, on_error: OnError) -> Self {
        self.config.pipeline.on_error = on_error;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.serve.port = port;
        self
    }

    pub fn live_reload(mut self, val: bool) -> Self {
        self.config.serve.live_reload = val;
        self
    }

    pub fn use_hash(mut self, val: bool) -> Self {
        self.config.watch.use_hash = val;
        self
    }

    pub fn coalesce(mut self, val: bool) -> Self {
        self.config.watch.coalesce = val;
        self
    }

    pub fn vendor_script(mut self, rel: &str) -> Self {
        self.config.copy.vendor_script = rel.to_string();
        self
    }

    pub fn skip_minified_html(mut self, val: bool) -> Self {
        self.config.copy.skip_minified_html = val;
        self
    }

    /// The raw, unvalidated config.
    pub fn raw(self) -> RawConfig {
        self.config
    }

    pub fn build(self) -> Config {
        Config::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
