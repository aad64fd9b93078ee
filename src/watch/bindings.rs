// src/watch/bindings.rs

use std::fmt;

use anyhow::Result;
use globset::GlobMatcher;

use crate::stages::select::compile_glob;
use crate::stages::StageName;

/// Default source-change bindings (patterns relative to the source root).
pub const STANDARD_BINDINGS: [(&str, StageName); 3] = [
    ("css/**/*.css", StageName::Styles),
    ("*.html", StageName::MinifyHtml),
    ("img/*", StageName::Images),
];

/// A source pattern and the stage it re-runs.
#[derive(Clone)]
pub struct WatchBinding {
    pub pattern: String,
    pub stage: StageName,
    matcher: GlobMatcher,
}

impl fmt::Debug for WatchBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchBinding")
            .field("pattern", &self.pattern)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl WatchBinding {
    pub fn new(pattern: impl Into<String>, stage: StageName) -> Result<Self> {
        let pattern = pattern.into();
        let matcher = compile_glob(&pattern)?.compile_matcher();
        Ok(Self {
            pattern,
            stage,
            matcher,
        })
    }

    /// `rel_path` is relative to the source root with `/` separators.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.matcher.is_match(rel_path)
    }
}

/// Static map from changed source paths to the stages they trigger.
#[derive(Debug, Clone, Default)]
pub struct WatchTable {
    bindings: Vec<WatchBinding>,
}

impl WatchTable {
    pub fn standard() -> Result<Self> {
        Self::from_pairs(STANDARD_BINDINGS)
    }

    pub fn from_pairs<I, P>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, StageName)>,
        P: Into<String>,
    {
        let bindings = pairs
            .into_iter()
            .map(|(pattern, stage)| WatchBinding::new(pattern, stage))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bindings })
    }

    pub fn bindings(&self) -> &[WatchBinding] {
        &self.bindings
    }

    /// Stages bound to `rel_path`, in binding order, without duplicates.
    pub fn stages_for(&self, rel_path: &str) -> Vec<StageName> {
        self.stages_for_batch([rel_path])
    }

    /// Stages bound to any path of a change batch; each stage appears once.
    pub fn stages_for_batch<'a, I>(&self, rel_paths: I) -> Vec<StageName>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rel_paths: Vec<&str> = rel_paths.into_iter().collect();
        let mut stages = Vec::new();
        for binding in &self.bindings {
            if stages.contains(&binding.stage) {
                continue;
            }
            if rel_paths.iter().any(|p| binding.matches(p)) {
                stages.push(binding.stage);
            }
        }
        stages
    }

    /// Every pattern bound to `stage`.
    pub fn patterns_for(&self, stage: StageName) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|b| b.stage == stage)
            .map(|b| b.pattern.as_str())
            .collect()
    }

    /// Distinct bound stages, in binding order.
    pub fn bound_stages(&self) -> Vec<StageName> {
        let mut stages = Vec::new();
        for binding in &self.bindings {
            if !stages.contains(&binding.stage) {
                stages.push(binding.stage);
            }
        }
        stages
    }
}
