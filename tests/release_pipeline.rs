// tests/release_pipeline.rs

mod common;
use crate::common::{init_tracing, real_context, snapshot, with_timeout, write_file, write_site};

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use assetpipe::engine::{PipelineSummary, Runtime, RuntimeEvent, Sequencer};
use assetpipe::exec::{LocalStageExecutor, LongRunningOptions};
use assetpipe::graph::{PipelineName, TaskGraph};
use assetpipe::notifier::ErrorNotifier;
use assetpipe::stages::{BuildMode, StageName};
use assetpipe::types::{OnError, QueueMode};
use assetpipe_test_utils::recording::RecordingNotifier;
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

async fn release(root: &Path, recorder: &RecordingNotifier) -> Result<PipelineSummary, Box<dyn Error>> {
    let graph = Arc::new(TaskGraph::standard()?);
    let ctx = Arc::new(real_context(root).with_mode(BuildMode::Release));
    let notifier = Arc::new(ErrorNotifier::silent().with_channel(Arc::new(recorder.clone())));

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(16);
    let executor = LocalStageExecutor::new(
        ctx,
        notifier,
        Arc::clone(&graph),
        LongRunningOptions::default(),
        tx,
    );
    let core = Sequencer::new(graph, OnError::Continue, QueueMode::Coalesce);
    let runtime = Runtime::new(core, rx, executor);

    let summary = with_timeout(runtime.run_pipeline(PipelineName::Release, |_| {})).await?;
    Ok(summary.expect("release pipeline finishes"))
}

#[tokio::test]
async fn release_build_is_reproducible() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    write_site(&dir.path().join("src"));
    let recorder = RecordingNotifier::new();

    let first = release(dir.path(), &recorder).await?;
    assert!(first.is_success(), "failures: {:?}", first.failed);
    let first_tree = snapshot(&dir.path().join("dist"));

    let second = release(dir.path(), &recorder).await?;
    assert!(second.is_success());
    let second_tree = snapshot(&dir.path().join("dist"));

    assert_eq!(first_tree, second_tree);
    assert!(recorder.records().is_empty());

    let files: Vec<&str> = first_tree.iter().map(|(rel, _)| rel.as_str()).collect();
    for expected in [
        "css/styles.css",
        "css/styles.min.css",
        "favicon.ico",
        "img/logo.svg",
        "index.html",
        "js/app.js",
        "js/libs/jquery.js",
        "js/libs/modernizr.js",
        "pages/about.html",
        "robots.txt",
        "sitemap.xml",
    ] {
        assert!(files.contains(&expected), "missing {expected} in {files:?}");
    }
    Ok(())
}

#[tokio::test]
async fn css_error_is_reported_and_the_build_still_finishes() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let src = dir.path().join("src");
    write_site(&src);
    write_file(&src, "css/z-broken.css", "..broken { color: red; }\n");
    let recorder = RecordingNotifier::new();

    let summary = release(dir.path(), &recorder).await?;

    assert!(summary.reached_done);
    assert!(!summary.aborted);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, StageName::Styles);

    let records = recorder.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].plugin, "lightningcss");
    assert!(!recorder.lines()[0].contains('\n'));

    // Stages after the failure still ran.
    assert!(dir.path().join("dist/robots.txt").exists());
    Ok(())
}
