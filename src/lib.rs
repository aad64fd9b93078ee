// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod graph;
pub mod logging;
pub mod notifier;
pub mod paths;
pub mod reload;
pub mod server;
pub mod stages;
pub mod types;
pub mod watch;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{load_or_default, Config};
use crate::engine::{PipelineSummary, Runtime, RuntimeEvent, Sequencer};
use crate::exec::{LocalStageExecutor, LongRunningOptions};
use crate::fs::RealFileSystem;
use crate::graph::{PipelineName, TaskGraph};
use crate::notifier::ErrorNotifier;
use crate::reload::ReloadHub;
use crate::stages::{BuildMode, StageContext};
use crate::types::QueueMode;
use crate::watch::WatchOptions;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the task graph and the sequencer
/// - the local stage executor (stages, dev server, watcher)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(&args.config)?;
    let graph = Arc::new(TaskGraph::standard()?);
    let pipeline = args.pipeline();

    if args.dry_run {
        print_dry_run(&cfg, &graph, pipeline);
        return Ok(());
    }

    let notifier = Arc::new(ErrorNotifier::from_config(cfg.notify().desktop));
    let ctx = Arc::new(stage_context(&cfg, pipeline));

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let options = LongRunningOptions {
        host: cfg.serve().host.clone(),
        port: cfg.serve().port,
        watch: WatchOptions {
            debounce: Duration::from_millis(cfg.watch().debounce_ms),
            use_hash: cfg.watch().use_hash,
        },
    };
    let executor = LocalStageExecutor::new(
        ctx,
        notifier,
        Arc::clone(&graph),
        options,
        rt_tx.clone(),
    );

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let core = Sequencer::new(
        graph,
        cfg.pipeline().on_error,
        QueueMode::from_coalesce(cfg.watch().coalesce),
    );
    let runtime = Runtime::new(core, rt_rx, executor);
    let summary = runtime.run_pipeline(pipeline, report_done).await?;

    match summary {
        Some(summary) if summary.aborted => {
            bail!("pipeline '{}' aborted", summary.pipeline)
        }
        Some(_) => Ok(()),
        None => {
            debug!("runtime stopped before the pipeline finished");
            Ok(())
        }
    }
}

/// Stage context for `pipeline`: real filesystem, and a live reload hub only
/// for `dev` with `[serve] live_reload` on.
pub fn stage_context(cfg: &Config, pipeline: PipelineName) -> StageContext {
    let reload = if pipeline == PipelineName::Dev && cfg.serve().live_reload {
        ReloadHub::new(64)
    } else {
        ReloadHub::disabled()
    };

    StageContext::new(cfg.base_paths(), Arc::new(RealFileSystem))
        .with_reload(reload)
        .with_mode(BuildMode::from(pipeline))
        .with_vendor_script(cfg.copy().vendor_script.clone())
        .with_skip_minified_html(cfg.copy().skip_minified_html)
}

/// Completion callback: one line per pipeline.
fn report_done(summary: &PipelineSummary) {
    if summary.is_success() {
        info!(
            pipeline = %summary.pipeline,
            stages = summary.completed.len(),
            "done"
        );
    } else {
        let failed: Vec<&str> = summary.failed.iter().map(|(s, _)| s.as_str()).collect();
        warn!(
            pipeline = %summary.pipeline,
            ?failed,
            aborted = summary.aborted,
            "done with failures"
        );
    }
}

/// Dry-run output: resolved config, pipeline order and watch bindings.
fn print_dry_run(cfg: &Config, graph: &TaskGraph, pipeline: PipelineName) {
    let paths = cfg.base_paths();
    println!("assetpipe dry-run");
    println!("  source = {}", paths.source_root().display());
    println!("  output = {}", paths.output_root().display());
    println!("  pipeline.on_error = {:?}", cfg.pipeline().on_error);
    println!();

    let stages = graph.pipeline(pipeline);
    println!("pipeline {pipeline} ({} stages):", stages.len());
    for stage in stages {
        println!("  - {stage} ({:?})", stage.kind());
    }
    println!("  - done");

    if pipeline == PipelineName::Dev {
        println!();
        println!(
            "serve: http://{}:{} (live_reload = {})",
            cfg.serve().host,
            cfg.serve().port,
            cfg.serve().live_reload
        );
        println!(
            "watch (debounce {} ms, use_hash = {}, coalesce = {}):",
            cfg.watch().debounce_ms,
            cfg.watch().use_hash,
            cfg.watch().coalesce
        );
        for binding in graph.bindings() {
            println!("  {} -> {}", paths.source_pattern(&binding.pattern), binding.stage);
        }
    }

    debug!("dry-run complete (no execution)");
}
