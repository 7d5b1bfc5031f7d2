//! Ancestor walk over directory sidecar files.
//!
//! Starting at the directory containing a page's source file, every ancestor
//! up to (but excluding) the filesystem root is checked for sidecar data:
//!
//! ```text
//! /site/blog/2024/post.html
//!
//! /site/blog/2024/2024.json    ← visited first
//! /site/blog/blog.json
//! /site/site.json              ← visited last
//! ```
//!
//! Every sidecar defining the directive key contributes. Directives are
//! additive: values are collected nearest-first, flattened in that same
//! order, and copies execute in list order with no re-sorting.
//!
//! Only the page's own directory and its ancestors are consulted, never
//! siblings or descendants.

use crate::data::{self, SidecarCache};
use crate::directive;
use serde_json::Value;
use std::path::Path;

/// Collect raw directive values from the ancestry of `page_input`.
///
/// `page_input` is the absolute path to the page source file. Values are
/// returned nearest-first; within a directory `<base>.json` precedes
/// `<base>.11tydata.json`.
pub fn collect(page_input: &Path, key: &str, cache: &SidecarCache) -> Vec<Value> {
    let mut hits = Vec::new();
    let mut dir = page_input.parent();

    while let Some(current) = dir {
        let Some(parent) = current.parent() else {
            break;
        };

        for candidate in data::sidecar_candidates(current) {
            let hit = cache
                .get(&candidate)
                .and_then(|mut sidecar| sidecar.get_mut(key).map(Value::take));
            if let Some(value) = hit {
                hits.push(value);
            }
        }

        dir = Some(parent);
    }

    hits
}

/// Resolve the flattened cascade directive for a page.
///
/// Returns `None` if no ancestor defines a usable directive.
pub fn resolve(page_input: &Path, key: &str, cache: &SidecarCache) -> Option<Vec<String>> {
    let hits = collect(page_input, key, cache);
    directive::flatten(hits.iter())
}
