//! Run orchestration
//!
//! Ties the pieces together for one request: resolve the project graph,
//! load artifacts in dependency order into a fresh registry, resolve the
//! target, execute the matched covers and summarize. The whole run is one
//! cooperative task; the only suspension points are cover futures, async
//! checker streams and the optional startup delay that gives an external
//! inspector time to attach.

use crate::designate;
use crate::engine::Engine;
use crate::error::RunError;
use crate::outcome::RunSummary;
use crate::report::Reporter;
use crate::settings::TargetStore;
use coverun_project::ProjectGraph;
use coverun_registry::{load_all, resolve, ArtifactHost, Registry, Target};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One already-parsed run request. Raw argv parsing belongs to the
/// excluded CLI layer.
#[derive(Debug)]
pub enum Request {
    /// Run the target previously designated for this workspace.
    Designated,

    /// Run every check in every verification root.
    All,

    /// Run the given target.
    Call(Target),

    /// Designate the cover function declared at `file:line` (1-based)
    /// as this workspace's default target.
    Designate {
        /// Source file containing the declaration.
        file: PathBuf,
        /// 1-based line number of the declaration.
        line: usize,
    },
}

/// Per-run configuration.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Workspace directory; graph resolution starts at its conventional
    /// config file.
    pub cwd: PathBuf,

    /// Delay inserted before any work, solely so an external
    /// debugger/inspector can attach. Zero by default; never a
    /// correctness dependency.
    pub startup_delay: Duration,
}

impl RunOptions {
    /// Options for a workspace with no startup delay.
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            startup_delay: Duration::ZERO,
        }
    }

    /// Set the inspector-attach delay.
    #[must_use]
    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }
}

/// Executes run requests against a host module system and a target
/// store.
pub struct Runner<'a> {
    host: &'a dyn ArtifactHost,
    store: &'a mut dyn TargetStore,
    ambient: Option<&'a Registry>,
    reporter: Reporter,
    options: RunOptions,
}

impl<'a> Runner<'a> {
    /// Runner reporting to standard output.
    pub fn new(
        host: &'a dyn ArtifactHost,
        store: &'a mut dyn TargetStore,
        options: RunOptions,
    ) -> Self {
        Self {
            host,
            store,
            ambient: None,
            reporter: Reporter::stdout(),
            options,
        }
    }

    /// Replace the reporter sink.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Provide a secondary registry consulted after the loaded namespace
    /// and its verification roots.
    #[must_use]
    pub fn with_ambient(mut self, ambient: &'a Registry) -> Self {
        self.ambient = Some(ambient);
        self
    }

    /// Execute one request.
    ///
    /// # Errors
    /// [`RunError::NothingApplicable`] when no checks ran,
    /// [`RunError::NoDesignatedTarget`] for a designated run without a
    /// designation, and the respective resolution/designation/store
    /// errors. Per-artifact and per-check failures never surface here.
    pub async fn execute(&mut self, request: Request) -> Result<RunSummary, RunError> {
        match request {
            Request::Designate { file, line } => {
                let target = designate::designate(&file, line)?;
                tracing::info!(
                    "will now run {}() in {} by default",
                    target.name,
                    target.project_path.display()
                );
                self.store.write(&self.options.cwd, target)?;
                Ok(RunSummary::default())
            }
            Request::Designated => {
                self.startup_delay().await;
                let designated = self
                    .store
                    .read(&self.options.cwd)?
                    .ok_or(RunError::NoDesignatedTarget)?;
                let start_dir = designated.project_path.clone();
                let target = Target::exact(designated.namespace, designated.name);
                let result = self.run_target(&start_dir, target).await;
                self.finish(result)
            }
            Request::Call(target) => {
                self.startup_delay().await;
                let start_dir = self.options.cwd.clone();
                let result = self.run_target(&start_dir, target).await;
                self.finish(result)
            }
            Request::All => {
                self.startup_delay().await;
                let result = self.run_all().await;
                self.finish(result)
            }
        }
    }

    async fn run_target(
        &mut self,
        start_dir: &Path,
        target: Target,
    ) -> Result<RunSummary, RunError> {
        let registry = self.load_registry(start_dir);
        let resolution = resolve(&target, &registry, self.ambient)?;

        if resolution.matches.is_empty() {
            self.reporter.nothing_applicable();
            return Err(RunError::NothingApplicable);
        }

        let mut engine = Engine::new(&mut self.reporter);
        let summary = engine
            .run_batch(&resolution.matches, resolution.reset.as_ref())
            .await;
        self.ensure_checks_ran(summary)
    }

    async fn run_all(&mut self) -> Result<RunSummary, RunError> {
        tracing::info!("running all discoverable cover functions");
        let start_dir = self.options.cwd.clone();
        let registry = self.load_registry(&start_dir);

        if registry.roots().is_empty() {
            self.reporter.no_verification_roots();
            return Err(RunError::NothingApplicable);
        }

        let ambient = self.ambient;
        let mut total = RunSummary::default();

        for root in registry.roots() {
            let target = Target::checks(vec![root.clone()]);
            let Ok(resolution) = resolve(&target, &registry, ambient) else {
                continue;
            };
            if resolution.matches.is_empty() {
                continue;
            }

            let mut engine = Engine::new(&mut self.reporter);
            let summary = engine
                .run_batch(&resolution.matches, resolution.reset.as_ref())
                .await;
            total.absorb(summary);
        }

        if total.functions == 0 {
            self.reporter.nothing_applicable();
            return Err(RunError::NothingApplicable);
        }
        self.ensure_checks_ran(total)
    }

    fn load_registry(&self, start_dir: &Path) -> Registry {
        let graph = ProjectGraph::resolve(start_dir);
        let artifacts = graph.artifact_order();
        tracing::debug!(
            "resolved {} project(s), {} artifact(s)",
            graph.len(),
            artifacts.len()
        );
        load_all(self.host, &artifacts)
    }

    fn ensure_checks_ran(&mut self, summary: RunSummary) -> Result<RunSummary, RunError> {
        if summary.checks == 0 {
            self.reporter.no_checks_produced(summary.functions);
            return Err(RunError::NothingApplicable);
        }
        Ok(summary)
    }

    fn finish(&mut self, result: Result<RunSummary, RunError>) -> Result<RunSummary, RunError> {
        self.reporter.separator();
        result
    }

    async fn startup_delay(&self) {
        if !self.options.startup_delay.is_zero() {
            tokio::time::sleep(self.options.startup_delay).await;
        }
    }
}

impl std::fmt::Debug for Runner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
