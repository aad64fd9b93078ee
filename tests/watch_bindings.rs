// tests/watch_bindings.rs

use std::path::PathBuf;

use assetpipe::fs::mock::MockFileSystem;
use assetpipe::stages::StageName;
use assetpipe::watch::event_handler::prime_fingerprints;
use assetpipe::watch::{stages_for_changes, FingerprintStore, WatchTable};

#[test]
fn style_change_triggers_exactly_styles() {
    let table = WatchTable::standard().unwrap();
    assert_eq!(table.stages_for("css/base.css"), vec![StageName::Styles]);
    assert_eq!(table.stages_for("css/components/deep/button.css"), vec![StageName::Styles]);
}

#[test]
fn html_binding_is_top_level_only() {
    let table = WatchTable::standard().unwrap();
    assert_eq!(table.stages_for("index.html"), vec![StageName::MinifyHtml]);
    assert!(table.stages_for("pages/about.html").is_empty());
}

#[test]
fn image_binding_does_not_descend() {
    let table = WatchTable::standard().unwrap();
    assert_eq!(table.stages_for("img/logo.png"), vec![StageName::Images]);
    assert!(table.stages_for("img/raw/logo.png").is_empty());
}

#[test]
fn unbound_paths_trigger_nothing() {
    let table = WatchTable::standard().unwrap();
    assert!(table.stages_for("js/app.js").is_empty());
    assert!(table.stages_for("robots.txt").is_empty());
}

#[test]
fn a_batch_triggers_each_stage_once() {
    let table = WatchTable::standard().unwrap();
    let stages = table.stages_for_batch(["css/a.css", "css/b.css", "img/x.png", "css/c.css"]);
    assert_eq!(stages, vec![StageName::Styles, StageName::Images]);
}

#[test]
fn unchanged_contents_are_suppressed() {
    let fs = MockFileSystem::new();
    fs.add_file("src/css/base.css", "body { margin: 0 }");
    fs.add_file("src/index.html", "<p>hi</p>");

    let table = WatchTable::standard().unwrap();
    let root = PathBuf::from("src");
    let mut store = FingerprintStore::new();
    prime_fingerprints(&fs, &root, &table, &mut store);

    let changed = vec![PathBuf::from("src/css/base.css")];

    // Touch without edit.
    let stages = stages_for_changes(&fs, &root, &changed, &table, Some(&mut store));
    assert!(stages.is_empty());

    fs.add_file("src/css/base.css", "body { margin: 1px }");
    let stages = stages_for_changes(&fs, &root, &changed, &table, Some(&mut store));
    assert_eq!(stages, vec![StageName::Styles]);
}

#[test]
fn new_file_changes_the_fingerprint() {
    let fs = MockFileSystem::new();
    fs.add_file("src/css/base.css", "a { color: red }");

    let table = WatchTable::standard().unwrap();
    let root = PathBuf::from("src");
    let mut store = FingerprintStore::new();
    prime_fingerprints(&fs, &root, &table, &mut store);

    fs.add_file("src/css/extra.css", "a { color: red }");
    let changed = vec![PathBuf::from("src/css/extra.css")];
    let stages = stages_for_changes(&fs, &root, &changed, &table, Some(&mut store));
    assert_eq!(stages, vec![StageName::Styles]);
}

#[test]
fn without_hashing_every_match_triggers() {
    let fs = MockFileSystem::new();
    fs.add_file("src/img/a.png", [1u8, 2, 3]);

    let table = WatchTable::standard().unwrap();
    let changed = vec![PathBuf::from("src/img/a.png"), PathBuf::from("elsewhere/img/b.png")];
    let stages = stages_for_changes(&fs, &PathBuf::from("src"), &changed, &table, None);
    assert_eq!(stages, vec![StageName::Images]);
}
