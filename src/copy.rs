//! Glob matching and page-relative file copying.
//!
//! Each glob is matched against files under the page's source directory.
//! Every match is copied to the same relative path under the page's output
//! directory:
//!
//! ```text
//! globs:  ["*.png", "assets/**"]
//! from:   /site/blog/              to: /site/_site/blog/
//!
//! /site/blog/test.png          →  /site/_site/blog/test.png
//! /site/blog/assets/a/b.svg    →  /site/_site/blog/assets/a/b.svg
//! ```
//!
//! ## Matching rules
//!
//! - Patterns are matched against `/`-separated paths relative to the source
//!   directory. A leading `./` is ignored.
//! - `*` and `?` stay within one path segment; `**` spans segments.
//! - Only files match, never directories. Symlinks are followed.
//! - Matches are produced in sorted traversal order.
//! - With `dot = false`, a path component starting with `.` only matches a
//!   pattern segment that itself starts with `.`. `.well-known/*` matches
//!   `.well-known/security.txt` but not `.well-known/.secret`, and `**` never
//!   descends into hidden directories.
//! - A pattern that fails to compile matches nothing.
//! - A pattern with a `..` segment matches nothing; globs never reach outside
//!   the source directory.
//!
//! ## Failure
//!
//! A match that disappears before it is copied is skipped. Failing to create
//! a destination directory or to copy a file is an error and is returned to
//! the caller unchanged.

use globset::{GlobBuilder, GlobMatcher};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum CopyError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One `/`-separated piece of a pattern.
#[derive(Debug, Clone)]
enum Segment {
    /// `**`: zero or more whole components.
    AnyDepth,
    /// Anything else, matched against exactly one component.
    Part {
        matcher: GlobMatcher,
        explicit_dot: bool,
    },
}

impl Segment {
    fn compile(raw: &str) -> Option<Self> {
        if raw == "**" {
            return Some(Segment::AnyDepth);
        }
        let matcher = GlobBuilder::new(raw)
            .literal_separator(true)
            .build()
            .ok()?
            .compile_matcher();
        Some(Segment::Part {
            matcher,
            explicit_dot: raw.starts_with('.'),
        })
    }
}

/// Whether `components` can be matched segment by segment, with hidden
/// components only consumed by segments that start with `.`.
fn segments_accept(segments: &[Segment], components: &[&str]) -> bool {
    match segments.split_first() {
        None => components.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            let visible = components
                .iter()
                .take_while(|c| !c.starts_with('.'))
                .count();
            (0..=visible).any(|n| segments_accept(rest, &components[n..]))
        }
        Some((Segment::Part { matcher, explicit_dot }, rest)) => match components.split_first() {
            Some((first, tail)) => {
                (*explicit_dot || !first.starts_with('.'))
                    && matcher.is_match(first)
                    && segments_accept(rest, tail)
            }
            None => false,
        },
    }
}

/// A compiled copy pattern.
#[derive(Debug, Clone)]
pub struct CopyGlob {
    pattern: String,
    matcher: GlobMatcher,
    /// Per-segment matchers; `None` when a segment does not compile alone.
    segments: Option<Vec<Segment>>,
    max_depth: Option<usize>,
    names_dot: bool,
}

impl CopyGlob {
    /// Compile a pattern. Returns `None` if the pattern is not a valid glob
    /// or climbs out of the source directory.
    pub fn new(pattern: &str) -> Option<Self> {
        let trimmed = pattern.trim_start_matches("./");
        let raw_segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        if raw_segments.contains(&"..") {
            tracing::debug!(
                target: "cascade_copy",
                "skipping glob {pattern:?}: parent segments are not supported"
            );
            return None;
        }

        let matcher = match GlobBuilder::new(trimmed).literal_separator(true).build() {
            Ok(glob) => glob.compile_matcher(),
            Err(e) => {
                tracing::debug!(
                    target: "cascade_copy",
                    "skipping invalid glob {pattern:?}: {e}"
                );
                return None;
            }
        };

        let segments = raw_segments
            .iter()
            .map(|raw| Segment::compile(raw))
            .collect::<Option<Vec<_>>>();
        let max_depth = if raw_segments.iter().any(|s| s.contains("**")) {
            None
        } else {
            Some(raw_segments.len())
        };
        let names_dot = raw_segments.iter().any(|s| s.starts_with('.'));

        Some(Self {
            pattern: pattern.to_string(),
            matcher,
            segments,
            max_depth,
            names_dot,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether `relative` (a `/`-separated path) matches this glob.
    ///
    /// With `dot = false`, hidden components must be named by a dot segment.
    pub fn is_match(&self, relative: &str, dot: bool) -> bool {
        if !self.matcher.is_match(relative) {
            return false;
        }
        let components: Vec<&str> = relative.split('/').collect();
        if dot || !components.iter().any(|c| c.starts_with('.')) {
            return true;
        }
        self.segments
            .as_deref()
            .is_some_and(|segments| segments_accept(segments, &components))
    }

    /// Find matching files under `root`, returning absolute paths.
    pub fn find(&self, root: &Path, dot: bool) -> Vec<PathBuf> {
        let prune_hidden = !dot && !self.names_dot;

        let mut walker = WalkDir::new(root).follow_links(true).sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        walker
            .into_iter()
            .filter_entry(|entry| !(prune_hidden && entry.depth() > 0 && is_hidden(entry)))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::trace!(
                        target: "cascade_copy",
                        "walk error under {}: {e}",
                        root.display()
                    );
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                relative_slash_path(entry.path(), root)
                    .is_some_and(|rel| self.is_match(&rel, dot))
            })
            .map(DirEntry::into_path)
            .collect()
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn relative_slash_path(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Copy every file matched by `globs` from `from_dir` to `to_dir`.
///
/// Globs run in list order, matches in match order. Existing targets are
/// overwritten, so a later copy of the same relative path wins. Returns the
/// number of files copied.
pub fn copy_globs(
    globs: &[String],
    from_dir: &Path,
    to_dir: &Path,
    dot: bool,
) -> Result<usize, CopyError> {
    let mut copied = 0;
    for glob in globs.iter().filter_map(|g| CopyGlob::new(g)) {
        let matches = glob.find(from_dir, dot);
        tracing::trace!(
            target: "cascade_copy",
            "{} matched {} file(s)",
            glob.pattern(),
            matches.len()
        );
        copied += copy_matches(&matches, from_dir, to_dir)?;
    }
    Ok(copied)
}

/// Copy already-matched files from `from_dir` to the same relative paths
/// under `to_dir`.
///
/// Matches that no longer exist, or that lie outside `from_dir`, are skipped.
pub fn copy_matches(
    matches: &[PathBuf],
    from_dir: &Path,
    to_dir: &Path,
) -> Result<usize, CopyError> {
    let mut copied = 0;

    for source in matches {
        if !source.exists() {
            continue;
        }
        let Ok(rel) = source.strip_prefix(from_dir) else {
            continue;
        };
        let target = to_dir.join(rel);
        if &target == source {
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| CopyError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::copy(source, &target).map_err(|e| CopyError::Copy {
            from: source.clone(),
            to: target.clone(),
            source: e,
        })?;

        tracing::debug!(
            target: "cascade_copy",
            "copied {} → {}",
            source.display(),
            target.display()
        );
        copied += 1;
    }

    Ok(copied)
}
