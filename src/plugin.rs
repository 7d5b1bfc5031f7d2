//! The copy transform and its per-build state.
//!
//! [`register`] adds one transform, [`TRANSFORM_NAME`], to a host registry.
//! For each rendered page it:
//!
//! 1. Ignores output paths that don't end in a watched extension.
//! 2. Ignores output paths already handled in this build.
//! 3. Resolves the page's source and output directories.
//! 4. Takes the page-level directive if there is one, otherwise the
//!    directory cascade.
//! 5. Copies matches from the source directory to the output directory.
//!
//! Content is always returned unchanged.
//!
//! ## Build sessions
//!
//! A [`BuildSession`] owns everything that lives for one build: the set of
//! output paths already processed and the sidecar read cache. Each
//! [`CascadeCopy`] gets its own session, so two builds in one process never
//! share state. The processed set uses an atomic check-and-insert, so hosts
//! may transform pages from several threads.

use crate::cascade;
use crate::config::CopyOptions;
use crate::context::{self, PageContext, PageDirs};
use crate::copy::{self, CopyError};
use crate::data::SidecarCache;
use crate::directive;
use crate::host::{Transform, TransformRegistry};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Identifier the transform is registered under.
pub const TRANSFORM_NAME: &str = "eleventyCopyDataCascade";

/// State scoped to a single build run.
#[derive(Debug, Default)]
pub struct BuildSession {
    processed: Mutex<HashSet<String>>,
    sidecars: SidecarCache,
    working_dir: Option<PathBuf>,
}

impl BuildSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the directory relative page paths are resolved against.
    ///
    /// Without this, the process working directory at invocation time is used.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Record `output_path` as processed. Returns `false` if it already was.
    pub fn mark_processed(&self, output_path: &str) -> bool {
        match self.processed.lock() {
            Ok(mut set) => set.insert(output_path.to_string()),
            Err(poisoned) => poisoned.into_inner().insert(output_path.to_string()),
        }
    }

    pub fn is_processed(&self, output_path: &str) -> bool {
        match self.processed.lock() {
            Ok(set) => set.contains(output_path),
            Err(poisoned) => poisoned.into_inner().contains(output_path),
        }
    }

    pub fn processed_count(&self) -> usize {
        match self.processed.lock() {
            Ok(set) => set.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn sidecars(&self) -> &SidecarCache {
        &self.sidecars
    }

    fn working_dir(&self) -> Option<PathBuf> {
        match &self.working_dir {
            Some(dir) => Some(dir.clone()),
            None => std::env::current_dir().ok(),
        }
    }
}

/// Where a page's effective directive came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveOrigin {
    /// Page-level data, at the given location label.
    Page(&'static str),
    /// Directory sidecar cascade.
    Cascade,
}

/// Why a page was passed through without copying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoOutputPath,
    UnwatchedExtension,
    AlreadyProcessed,
    MissingDirs,
    NoDirective,
}

/// What one invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Skipped(SkipReason),
    Copied {
        origin: DirectiveOrigin,
        globs: Vec<String>,
        files: usize,
    },
}

/// The copy transform.
#[derive(Debug)]
pub struct CascadeCopy {
    options: CopyOptions,
    session: BuildSession,
}

impl CascadeCopy {
    pub fn new(options: CopyOptions) -> Self {
        Self::with_session(options, BuildSession::new())
    }

    pub fn with_session(options: CopyOptions, session: BuildSession) -> Self {
        Self { options, session }
    }

    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    pub fn session(&self) -> &BuildSession {
        &self.session
    }

    /// Handle one page, reporting what happened.
    pub fn process(&self, ctx: &PageContext) -> Result<PageOutcome, CopyError> {
        let Some(output_path) = ctx.output_path() else {
            return Ok(PageOutcome::Skipped(SkipReason::NoOutputPath));
        };
        if !self.options.watches(output_path) {
            return Ok(PageOutcome::Skipped(SkipReason::UnwatchedExtension));
        }
        if !self.session.mark_processed(output_path) {
            return Ok(PageOutcome::Skipped(SkipReason::AlreadyProcessed));
        }

        let dirs = self
            .session
            .working_dir()
            .and_then(|cwd| context::resolve(ctx, &cwd));
        let Some(dirs) = dirs else {
            self.debug(format_args!(
                "skip (missing dirs): input={:?} output={:?}",
                ctx.input_path(),
                output_path
            ));
            return Ok(PageOutcome::Skipped(SkipReason::MissingDirs));
        };

        let Some((origin, globs)) = self.resolve_globs(ctx, &dirs.input) else {
            self.debug(format_args!("page {}: no directive", dirs.input.display()));
            return Ok(PageOutcome::Skipped(SkipReason::NoDirective));
        };

        self.debug(format_args!(
            "page {} → {}: {:?} from {:?}",
            dirs.input.display(),
            dirs.output_dir.display(),
            globs,
            origin
        ));

        let files = self.copy(&globs, &dirs)?;
        Ok(PageOutcome::Copied {
            origin,
            globs,
            files,
        })
    }

    /// Page-level directive first; the cascade only when the page has none.
    fn resolve_globs(
        &self,
        ctx: &PageContext,
        input: &Path,
    ) -> Option<(DirectiveOrigin, Vec<String>)> {
        let key = self.options.key.as_str();
        if let Some((label, globs)) = directive::from_page(ctx.value(), key) {
            return Some((DirectiveOrigin::Page(label), globs));
        }
        cascade::resolve(input, key, self.session.sidecars())
            .map(|globs| (DirectiveOrigin::Cascade, globs))
    }

    fn copy(&self, globs: &[String], dirs: &PageDirs) -> Result<usize, CopyError> {
        copy::copy_globs(globs, &dirs.source_dir, &dirs.output_dir, self.options.dot)
    }

    fn debug(&self, args: std::fmt::Arguments<'_>) {
        if self.options.debug {
            tracing::info!(target: "cascade_copy", "{}", args);
        }
    }
}

impl Transform for CascadeCopy {
    fn name(&self) -> &str {
        TRANSFORM_NAME
    }

    fn transform(&self, content: String, ctx: &PageContext) -> Result<String, CopyError> {
        self.process(ctx)?;
        Ok(content)
    }
}

/// Register the copy transform on a host registry with a fresh build session.
pub fn register(registry: &mut TransformRegistry, options: CopyOptions) {
    registry.add_transform(Box::new(CascadeCopy::new(options)));
}
