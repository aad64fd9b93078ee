// tests/stages_html_scripts.rs

mod common;
use crate::common::{init_tracing, real_context, write_file, write_site};

use assetpipe::stages::{html, scripts, vendor, BuildMode};
use tempfile::tempdir;

#[test]
fn html_minifier_keeps_comments_and_closing_tags() {
    init_tracing();
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    write_site(&src);

    let ctx = real_context(dir.path()).with_mode(BuildMode::Release);
    let report = html::run(&ctx).unwrap();
    // Only top-level pages.
    assert_eq!(report.written_rel, vec!["index.html"]);

    let original = std::fs::read_to_string(src.join("index.html")).unwrap();
    let minified = std::fs::read_to_string(dir.path().join("dist/index.html")).unwrap();
    assert!(minified.len() < original.len());
    assert!(minified.contains("<!-- keep me -->"));
    assert!(minified.contains("</p>"));
    assert!(minified.contains("</body>"));
}

#[test]
fn scripts_are_minified_into_one_bundle() {
    init_tracing();
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    write_site(&src);

    let report = scripts::run(&real_context(dir.path())).unwrap();
    assert_eq!(report.written_rel, vec![scripts::OUTPUT]);

    let bundle = std::fs::read_to_string(dir.path().join("dist").join(scripts::OUTPUT)).unwrap();
    assert!(bundle.contains("greet"));
    // Vendor scripts are not bundled.
    assert!(!bundle.contains("Modernizr"));
    let inputs = std::fs::read(src.join("js/app-main.js")).unwrap().len()
        + std::fs::read(src.join("js/util.js")).unwrap().len();
    assert!(bundle.len() < inputs);
}

#[test]
fn script_syntax_error_names_the_file() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("src"), "js/bad.js", "function ( {\n");

    let err = scripts::run(&real_context(dir.path())).unwrap_err();
    assert_eq!(err.plugin, "minify-js");
    assert_eq!(err.file_name.as_deref(), Some("js/bad.js"));
}

#[test]
fn vendor_scripts_are_copied_verbatim() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    write_site(&src);

    let report = vendor::run(&real_context(dir.path())).unwrap();
    assert_eq!(report.written_rel, vec!["js/libs/jquery.js", "js/libs/modernizr.js"]);
    assert_eq!(
        std::fs::read(src.join("js/libs/jquery.js")).unwrap(),
        std::fs::read(dir.path().join("dist/js/libs/jquery.js")).unwrap()
    );
}
