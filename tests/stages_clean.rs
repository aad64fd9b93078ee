// tests/stages_clean.rs

use std::sync::Arc;

use assetpipe::fs::mock::MockFileSystem;
use assetpipe::fs::FileSystem;
use assetpipe::paths::BasePaths;
use assetpipe::stages::{clean, StageContext};

fn context(fs: &MockFileSystem, source: &str, output: &str) -> StageContext {
    let fs: Arc<dyn FileSystem> = Arc::new(fs.clone());
    StageContext::new(BasePaths::new(source, output), fs)
}

#[test]
fn removes_output_and_keeps_source() {
    let fs = MockFileSystem::new();
    fs.add_file("src/index.html", "<p>hi</p>");
    fs.add_file("dist/index.html", "<p>old</p>");
    fs.add_file("dist/css/styles.css", "a{}");

    clean::run(&context(&fs, "src", "dist")).unwrap();

    assert!(!fs.exists("dist".as_ref()));
    assert_eq!(fs.file_paths(), vec![std::path::PathBuf::from("src/index.html")]);
}

#[test]
fn absent_output_is_not_an_error() {
    let fs = MockFileSystem::new();
    fs.add_file("src/index.html", "<p>hi</p>");

    let report = clean::run(&context(&fs, "src", "dist")).unwrap();
    assert_eq!(report.files_written(), 0);
}

#[test]
fn refuses_to_remove_a_directory_holding_the_source() {
    let fs = MockFileSystem::new();
    fs.add_file("site/src/index.html", "<p>hi</p>");

    let err = clean::run(&context(&fs, "site/src", "site")).unwrap_err();
    assert_eq!(err.plugin, "clean");
    assert!(fs.exists("site/src/index.html".as_ref()));
}

#[test]
fn refuses_parent_directories_of_the_source() {
    let fs = MockFileSystem::new();
    fs.add_file("src/index.html", "<p>hi</p>");

    for output in ["..", "../..", "./.."] {
        let err = clean::run(&context(&fs, "src", output)).unwrap_err();
        assert_eq!(err.plugin, "clean", "output = {output}");
    }
    assert!(fs.exists("src/index.html".as_ref()));
}

#[test]
fn parent_output_on_disk_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("proj");
    std::fs::create_dir_all(project.join("src")).unwrap();
    std::fs::write(project.join("src/index.html"), "<p>hi</p>").unwrap();

    let fs: Arc<dyn FileSystem> = Arc::new(assetpipe::fs::RealFileSystem);
    let ctx = StageContext::new(BasePaths::new(project.join("src"), project.join("src/..")), fs);

    assert!(clean::run(&ctx).is_err());
    assert!(project.join("src/index.html").exists());
}
