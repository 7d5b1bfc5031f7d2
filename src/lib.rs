//! # Cascade Copy
//!
//! Page-relative asset copying for static site builds. Content directories
//! declare which files travel with their pages, and every rendered page gets
//! those files copied next to its own output file.
//!
//! ```text
//! blog/                              _site/
//! ├── blog.json  {"eleventyCopy":    └── blog/
//! │                ["*.png"]}            ├── post.html
//! ├── post.html                          └── test.png
//! └── test.png
//! ```
//!
//! # Pipeline
//!
//! The crate plugs into a host site generator as a single content transform.
//! Per rendered page:
//!
//! ```text
//! PageContext ─→ resolve dirs ─→ page-level directive? ─yes─→ copy globs
//!                                        │ no                    ↑
//!                                        └─→ directory cascade ──┘
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`plugin`] | The transform, its options wiring and the per-build [`plugin::BuildSession`] |
//! | [`host`] | The `Transform` trait and registry a host drives |
//! | [`context`] | Page context shape and source/output directory resolution |
//! | [`directive`] | Directive normalization and page-level lookup order |
//! | [`cascade`] | Ancestor walk collecting directives from sidecar files |
//! | [`data`] | Sidecar JSON reading and caching |
//! | [`copy`] | Glob matching and page-relative copying |
//! | [`config`] | Plugin options |
//!
//! # Design Decisions
//!
//! ## Output Directory From The Page
//!
//! Copies land in the directory of the page's computed output file, not in
//! a site-wide output root. Permalinks can put a page anywhere; its assets
//! follow it.
//!
//! ## Additive Cascade
//!
//! Every ancestor sidecar that defines a directive contributes to the glob
//! list, nearest directory first. A directive on the page itself replaces the
//! cascade entirely.
//!
//! ## Tolerant Reads, Fatal Copies
//!
//! A missing or malformed sidecar means "no directive" and never fails a
//! build. Once a directive says to copy a file, failing to do so is a build
//! error.
//!
//! # Example
//!
//! ```no_run
//! use cascade_copy::{config::CopyOptions, context::PageContext, host::TransformRegistry, plugin};
//!
//! let mut registry = TransformRegistry::new();
//! plugin::register(&mut registry, CopyOptions::default());
//!
//! let ctx = PageContext::new("blog/post.html", "_site/blog/post.html");
//! let html = registry.apply("<h1>Post</h1>".to_string(), &ctx)?;
//! assert_eq!(html, "<h1>Post</h1>");
//! # Ok::<(), cascade_copy::copy::CopyError>(())
//! ```

pub mod cascade;
pub mod config;
pub mod context;
pub mod copy;
pub mod data;
pub mod directive;
pub mod host;
pub mod plugin;

#[cfg(test)]
pub(crate) mod test_helpers;
