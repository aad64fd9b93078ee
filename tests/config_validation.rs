// tests/config_validation.rs

use std::io::Write;

use tempfile::NamedTempFile;

use assetpipe::config::{load_and_validate, load_or_default, Config};
use assetpipe::errors::AssetpipeError;
use assetpipe::types::OnError;
use assetpipe_test_utils::builders::ConfigBuilder;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn empty_file_yields_defaults() {
    let file = write_config("");
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.paths().source, "src");
    assert_eq!(cfg.paths().output, "dist");
    assert_eq!(cfg.pipeline().on_error, OnError::Continue);
    assert_eq!(cfg.serve().port, 3000);
    assert!(cfg.serve().live_reload);
    assert_eq!(cfg.watch().debounce_ms, 100);
    assert!(cfg.watch().use_hash);
    assert!(cfg.watch().coalesce);
    assert_eq!(cfg.copy().vendor_script, "js/libs/modernizr.js");
    assert!(!cfg.copy().skip_minified_html);
    assert!(!cfg.notify().desktop);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_or_default(dir.path().join("Assetpipe.toml")).unwrap();
    assert_eq!(cfg.paths().output, Config::default().paths().output);
}

#[test]
fn sections_override_defaults() {
    let file = write_config(
        r#"
[paths]
source = "assets"
output = "public"

[pipeline]
on_error = "abort"

[serve]
port = 8080
live_reload = false

[watch]
debounce_ms = 250
coalesce = false
"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.paths().source, "assets");
    assert_eq!(cfg.pipeline().on_error, OnError::Abort);
    assert_eq!(cfg.serve().port, 8080);
    assert!(!cfg.serve().live_reload);
    assert_eq!(cfg.watch().debounce_ms, 250);
    assert!(!cfg.watch().coalesce);
    assert!(cfg.watch().use_hash);
}

#[test]
fn output_containing_source_is_rejected() {
    let file = write_config(
        r#"
[paths]
source = "site/src"
output = "site"
"#,
    );
    match load_and_validate(file.path()) {
        Err(AssetpipeError::ConfigError(msg)) => {
            assert!(msg.contains("[paths].output"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn parent_directory_as_output_is_rejected() {
    for output in ["..", "../..", "./.."] {
        let raw = ConfigBuilder::new().source("src").output(output).raw();
        assert!(
            matches!(Config::try_from(raw), Err(AssetpipeError::ConfigError(_))),
            "output = {output:?} must not be accepted"
        );
    }
}

#[test]
fn sibling_roots_outside_the_project_are_accepted() {
    let raw = ConfigBuilder::new().source("a").output("../../a").raw();
    assert!(Config::try_from(raw).is_ok());
}

#[test]
fn roots_are_stored_trimmed() {
    let raw = ConfigBuilder::new().source("  assets ").output(" public\t").raw();
    let cfg = Config::try_from(raw).unwrap();
    assert_eq!(cfg.paths().source, "assets");
    assert_eq!(cfg.paths().output, "public");
    assert_eq!(cfg.base_paths().source_root(), std::path::Path::new("assets"));
    assert_eq!(cfg.base_paths().output_root(), std::path::Path::new("public"));
}

#[test]
fn identical_roots_are_rejected() {
    let raw = ConfigBuilder::new().source("src").output("./src").raw();
    assert!(matches!(Config::try_from(raw), Err(AssetpipeError::ConfigError(_))));
}

#[test]
fn port_zero_is_rejected() {
    let raw = ConfigBuilder::new().port(0).raw();
    match Config::try_from(raw) {
        Err(AssetpipeError::ConfigError(msg)) => assert!(msg.contains("port")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn vendor_script_outside_source_is_rejected() {
    let raw = ConfigBuilder::new().vendor_script("../outside.js").raw();
    assert!(matches!(Config::try_from(raw), Err(AssetpipeError::ConfigError(_))));
}

#[test]
fn unknown_on_error_is_a_toml_error() {
    let file = write_config(
        r#"
[pipeline]
on_error = "explode"
"#,
    );
    assert!(matches!(load_and_validate(file.path()), Err(AssetpipeError::TomlError(_))));
}

#[test]
fn unknown_section_is_a_toml_error() {
    let file = write_config("[tasks]\nfoo = 1\n");
    assert!(matches!(load_and_validate(file.path()), Err(AssetpipeError::TomlError(_))));
}

#[test]
fn skip_minified_html_reaches_the_stage_context() {
    let file = write_config(
        r#"
[copy]
skip_minified_html = true
"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();
    assert!(cfg.copy().skip_minified_html);

    let ctx = assetpipe::stage_context(&cfg, assetpipe::graph::PipelineName::Release);
    assert!(ctx.skip_minified_html);
    assert!(!assetpipe::stage_context(&Config::default(), assetpipe::graph::PipelineName::Release).skip_minified_html);
}
