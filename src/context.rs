//! Per-page context supplied by the host pipeline.
//!
//! The host hands every transform invocation a loosely shaped object. The
//! parts this crate reads are:
//!
//! ```json
//! {
//!   "eleventyCopy": "...",
//!   "page": {
//!     "inputPath": "./blog/post.html",
//!     "outputPath": "_site/blog/post.html",
//!     "eleventyCopy": "...",
//!     "data": { "eleventyCopy": "..." }
//!   },
//!   "eleventy": { "data": { "eleventyCopy": "..." } }
//! }
//! ```
//!
//! Everything else is carried along untouched.
//!
//! ## Output directory
//!
//! The destination for copies is the parent of the page's own output file,
//! never a configured site-wide output root. Pages with custom permalinks can
//! land anywhere, and their assets must land next to them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};

/// The host's view of the page currently being transformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageContext(Value);

impl PageContext {
    /// Build a context with just the page's input and output paths.
    pub fn new(input_path: impl Into<String>, output_path: impl Into<String>) -> Self {
        let mut page = Map::new();
        page.insert("inputPath".into(), Value::String(input_path.into()));
        page.insert("outputPath".into(), Value::String(output_path.into()));
        let mut root = Map::new();
        root.insert("page".into(), Value::Object(page));
        Self(Value::Object(root))
    }

    /// Wrap an arbitrary host-supplied object.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Attach merged page data under `page.data`.
    ///
    /// No-op if the context has no `page` object to attach to.
    pub fn with_page_data(mut self, data: Value) -> Self {
        if let Some(page) = self.0.get_mut("page").and_then(Value::as_object_mut) {
            page.insert("data".into(), data);
        }
        self
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// `page.inputPath`, if present and a string.
    pub fn input_path(&self) -> Option<&str> {
        self.page_str("inputPath")
    }

    /// `page.outputPath`, if present and a string.
    pub fn output_path(&self) -> Option<&str> {
        self.page_str("outputPath")
    }

    fn page_str(&self, field: &str) -> Option<&str> {
        self.0
            .get("page")?
            .get(field)?
            .as_str()
            .filter(|s| !s.is_empty())
    }
}

/// Absolute locations resolved for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDirs {
    /// Absolute path of the page's source file.
    pub input: PathBuf,
    /// Directory containing the source file; globs are rooted here.
    pub source_dir: PathBuf,
    /// Directory containing the output file; copies land here.
    pub output_dir: PathBuf,
}

/// Resolve a page's source and output directories.
///
/// Relative paths are resolved against `cwd`. Returns `None` when either
/// path is missing, not a string, or has no parent directory.
pub fn resolve(ctx: &PageContext, cwd: &Path) -> Option<PageDirs> {
    let input = absolutize(Path::new(ctx.input_path()?), cwd);
    let output = absolutize(Path::new(ctx.output_path()?), cwd);
    let source_dir = input.parent()?.to_path_buf();
    let output_dir = output.parent()?.to_path_buf();
    Some(PageDirs {
        input,
        source_dir,
        output_dir,
    })
}

/// Make `path` absolute against `cwd` and fold `.` and `..` lexically.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accessors_read_page_paths() {
        let ctx = PageContext::new("blog/post.html", "_site/blog/post.html");
        assert_eq!(ctx.input_path(), Some("blog/post.html"));
        assert_eq!(ctx.output_path(), Some("_site/blog/post.html"));
    }

    #[test]
    fn non_string_paths_are_missing() {
        let ctx = PageContext::from_value(json!({
            "page": { "inputPath": 42, "outputPath": false }
        }));
        assert_eq!(ctx.input_path(), None);
        assert_eq!(ctx.output_path(), None);
    }

    #[test]
    fn page_data_attached_under_page() {
        let ctx = PageContext::new("a.html", "_site/a.html")
            .with_page_data(json!({ "eleventyCopy": "*.png" }));
        assert_eq!(ctx.value()["page"]["data"]["eleventyCopy"], "*.png");
    }

    #[test]
    fn deserializes_from_host_object() {
        let ctx: PageContext = serde_json::from_str(
            r#"{"page": {"inputPath": "./x/index.md", "outputPath": "/out/x/index.html"}}"#,
        )
        .unwrap();
        assert_eq!(ctx.input_path(), Some("./x/index.md"));
    }

    #[test]
    fn resolves_relative_paths_against_cwd() {
        let ctx = PageContext::new("./blog/post.html", "_site/blog/post.html");
        let dirs = resolve(&ctx, Path::new("/work")).unwrap();
        assert_eq!(dirs.input, PathBuf::from("/work/blog/post.html"));
        assert_eq!(dirs.source_dir, PathBuf::from("/work/blog"));
        assert_eq!(dirs.output_dir, PathBuf::from("/work/_site/blog"));
    }

    #[test]
    fn absolute_paths_kept() {
        let ctx = PageContext::new("/src/blog/post.html", "/var/www/posts/hello/index.html");
        let dirs = resolve(&ctx, Path::new("/work")).unwrap();
        assert_eq!(dirs.source_dir, PathBuf::from("/src/blog"));
        assert_eq!(dirs.output_dir, PathBuf::from("/var/www/posts/hello"));
    }

    #[test]
    fn output_dir_follows_permalink_not_input_layout() {
        let ctx = PageContext::new("blog/post.html", "_site/2024/hello/index.html");
        let dirs = resolve(&ctx, Path::new("/work")).unwrap();
        assert_eq!(dirs.output_dir, PathBuf::from("/work/_site/2024/hello"));
    }

    #[test]
    fn missing_paths_resolve_to_none() {
        let ctx = PageContext::from_value(json!({ "page": { "outputPath": "_site/a.html" } }));
        assert_eq!(resolve(&ctx, Path::new("/work")), None);

        let ctx = PageContext::from_value(json!({ "page": { "inputPath": "a.html" } }));
        assert_eq!(resolve(&ctx, Path::new("/work")), None);

        assert_eq!(resolve(&PageContext::default(), Path::new("/work")), None);
    }

    #[test]
    fn absolutize_folds_dot_segments() {
        assert_eq!(
            absolutize(Path::new("../site/./blog/post.html"), Path::new("/work/build")),
            PathBuf::from("/work/site/blog/post.html")
        );
    }
}
