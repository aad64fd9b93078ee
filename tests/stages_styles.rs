// tests/stages_styles.rs

mod common;
use crate::common::{init_tracing, real_context, write_file};

use assetpipe::reload::ReloadHub;
use assetpipe::stages::styles::{self, CONCAT_OUTPUT, MINIFIED_OUTPUT};
use tempfile::tempdir;

#[test]
fn concatenates_then_minifies() {
    init_tracing();
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    write_file(&src, "css/a.css", "a {\n  color: #ff0000;\n}\n");
    write_file(&src, "css/nested/b.css", "b {\n  margin: 0px 0px 0px 0px;\n}\n");

    let report = styles::run(&real_context(dir.path())).unwrap();
    assert_eq!(report.written_rel, vec![CONCAT_OUTPUT, MINIFIED_OUTPUT]);

    let concat = std::fs::read_to_string(dir.path().join("dist").join(CONCAT_OUTPUT)).unwrap();
    let minified = std::fs::read_to_string(dir.path().join("dist").join(MINIFIED_OUTPUT)).unwrap();

    // Sorted walk: a.css before nested/b.css.
    let a = concat.find("a {").unwrap();
    let b = concat.find("b {").unwrap();
    assert!(a < b);
    assert!(minified.len() <= concat.len());
    assert!(!minified.contains('\n'));
}

#[test]
fn parse_error_points_at_source_file() {
    init_tracing();
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    write_file(&src, "css/a.css", "a { color: red; }\n");
    write_file(&src, "css/z-broken.css", "..broken { color: red; }\n");

    let err = styles::run(&real_context(dir.path())).unwrap_err();
    assert_eq!(err.plugin, "lightningcss");
    assert_eq!(err.file_name.as_deref(), Some("css/z-broken.css"));
    assert!(err.line_number.is_some());
    assert!(!err.message.is_empty());

    // The concatenation is written before minification fails.
    assert!(dir.path().join("dist").join(CONCAT_OUTPUT).exists());
    assert!(!dir.path().join("dist").join(MINIFIED_OUTPUT).exists());
}

#[test]
fn no_inputs_writes_nothing() {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();

    let report = styles::run(&real_context(dir.path())).unwrap();
    assert_eq!(report.files_written(), 0);
    assert!(!dir.path().join("dist").exists());
}

#[tokio::test]
async fn signals_css_only_reload() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("src"), "css/a.css", "a { color: red; }\n");

    let hub = ReloadHub::new(8);
    let mut rx = hub.subscribe().unwrap();
    styles::run(&real_context(dir.path()).with_reload(hub)).unwrap();

    let signal = rx.recv().await.unwrap();
    assert!(signal.is_css_only());
    assert_eq!(signal.payload(), "css");
}
