// src/graph/mod.rs

//! Task graph: the stage registry, the two pipelines and the watch bindings.
//!
//! Built and validated once at startup, then shared (`Arc<TaskGraph>`) by the
//! sequencer, the executor and the watcher.

use std::collections::BTreeMap;
use std::fmt;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::errors::{AssetpipeError, Result};
use crate::stages::{StageKind, StageName};
use crate::watch::bindings::{WatchBinding, WatchTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineName {
    Dev,
    Release,
}

impl PipelineName {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineName::Dev => "dev",
            PipelineName::Release => "release",
        }
    }

    /// Whether the process should exit once the pipeline reaches done.
    pub fn exits_when_done(self) -> bool {
        matches!(self, PipelineName::Release)
    }
}

impl fmt::Display for PipelineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage lists of the built-in pipelines.
pub const DEV_PIPELINE: [StageName; 7] = [
    StageName::Clean,
    StageName::Serve,
    StageName::Scripts,
    StageName::Images,
    StageName::Styles,
    StageName::Copy,
    StageName::Watch,
];

pub const RELEASE_PIPELINE: [StageName; 7] = [
    StageName::Clean,
    StageName::Scripts,
    StageName::VendorScripts,
    StageName::Images,
    StageName::MinifyHtml,
    StageName::Styles,
    StageName::Copy,
];

#[derive(Debug, Clone)]
pub struct TaskGraph {
    stages: Vec<StageName>,
    pipelines: BTreeMap<PipelineName, Vec<StageName>>,
    watch: WatchTable,
}

impl TaskGraph {
    /// The built-in graph: every stage, `dev` + `release`, default bindings.
    pub fn standard() -> Result<Self> {
        let mut pipelines = BTreeMap::new();
        pipelines.insert(PipelineName::Dev, DEV_PIPELINE.to_vec());
        pipelines.insert(PipelineName::Release, RELEASE_PIPELINE.to_vec());
        let watch = WatchTable::standard().map_err(AssetpipeError::Other)?;
        Self::new(StageName::ALL.to_vec(), pipelines, watch)
    }

    /// Build and validate a graph.
    ///
    /// Fails when a pipeline or binding names an unregistered stage, when a
    /// pipeline lists a stage twice, or when a binding targets a
    /// long-running stage.
    pub fn new(
        stages: Vec<StageName>,
        pipelines: BTreeMap<PipelineName, Vec<StageName>>,
        watch: WatchTable,
    ) -> Result<Self> {
        let graph = Self {
            stages,
            pipelines,
            watch,
        };
        graph.validate()?;
        Ok(graph)
    }

    fn validate(&self) -> Result<()> {
        for (name, stages) in &self.pipelines {
            for stage in stages {
                if !self.is_registered(*stage) {
                    return Err(AssetpipeError::UnknownStage(format!(
                        "pipeline '{name}' references unregistered stage '{stage}'"
                    )));
                }
            }
            validate_pipeline_order(*name, stages)?;
        }

        for binding in self.watch.bindings() {
            if !self.is_registered(binding.stage) {
                return Err(AssetpipeError::UnknownStage(format!(
                    "watch binding '{}' targets unregistered stage '{}'",
                    binding.pattern, binding.stage
                )));
            }
            if binding.stage.kind() != StageKind::OneShot {
                return Err(AssetpipeError::InvalidGraph(format!(
                    "watch binding '{}' targets long-running stage '{}'",
                    binding.pattern, binding.stage
                )));
            }
        }
        Ok(())
    }

    pub fn is_registered(&self, stage: StageName) -> bool {
        self.stages.contains(&stage)
    }

    pub fn stages(&self) -> &[StageName] {
        &self.stages
    }

    /// Stage list of `name`; empty for a pipeline the graph doesn't define.
    pub fn pipeline(&self, name: PipelineName) -> &[StageName] {
        self.pipelines.get(&name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn watch_table(&self) -> &WatchTable {
        &self.watch
    }

    pub fn bindings(&self) -> &[WatchBinding] {
        self.watch.bindings()
    }
}

/// A pipeline is a chain `s0 -> s1 -> ... -> sN`. Listing a stage twice
/// closes a cycle, which `toposort` rejects.
fn validate_pipeline_order(name: PipelineName, stages: &[StageName]) -> Result<()> {
    let mut graph: DiGraphMap<StageName, ()> = DiGraphMap::new();
    for stage in stages {
        graph.add_node(*stage);
    }
    for pair in stages.windows(2) {
        graph.add_edge(pair[0], pair[1], ());
    }

    match toposort(&graph, None) {
        Ok(order) => {
            debug!(pipeline = %name, ?order, "pipeline order validated");
            Ok(())
        }
        Err(cycle) => Err(AssetpipeError::InvalidGraph(format!(
            "cycle detected in pipeline '{name}' at stage '{}'",
            cycle.node_id()
        ))),
    }
}
