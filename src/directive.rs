//! Copy directives: what they look like raw, and how they are normalized.
//!
//! A copy directive is a value stored under a single data key (by default
//! `eleventyCopy`). It may be:
//!
//! - a single glob string: `"*.png"`
//! - a list of glob strings: `["*.png", "assets/**/*.svg"]`
//! - absent
//!
//! Normalization turns any of these into an ordered `Vec<String>`, keeping
//! duplicates and order. Non-string list entries and empty strings are
//! dropped. An empty result is reported as `None` so callers can fall back
//! to the next source.
//!
//! ## Page-level sources
//!
//! The host may hand us page data in several nested shapes. Each shape is an
//! [`DirectiveSource`], tried in [`PAGE_SOURCES`] order; the first one that
//! normalizes to a non-empty list wins.
//!
//! ```text
//! 1. <key>                    top-level context
//! 2. page.<key>
//! 3. eleventy.data.<key>
//! 4. page.data.<key>
//! ```

use serde_json::Value;

/// Normalize a raw directive value into an ordered list of globs.
pub fn normalize(raw: Option<&Value>) -> Option<Vec<String>> {
    let globs: Vec<String> = match raw? {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => return None,
    };
    let globs: Vec<String> = globs.into_iter().filter(|g| !g.is_empty()).collect();
    if globs.is_empty() { None } else { Some(globs) }
}

/// Flatten a sequence of raw directive values into one glob list.
///
/// Values are visited in the given order; each contributes its normalized
/// globs in place. Values that normalize to nothing contribute nothing.
pub fn flatten<'a, I>(raw: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = &'a Value>,
{
    let globs: Vec<String> = raw
        .into_iter()
        .filter_map(|v| normalize(Some(v)))
        .flatten()
        .collect();
    if globs.is_empty() { None } else { Some(globs) }
}

/// One place in the page context where a directive may live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveSource {
    /// Human-readable location, used in debug output.
    pub label: &'static str,
    /// Object path leading to the object holding the directive key.
    pub parents: &'static [&'static str],
}

impl DirectiveSource {
    /// Look up the raw directive under `key` at this location.
    pub fn extract<'a>(&self, ctx: &'a Value, key: &str) -> Option<&'a Value> {
        let holder = self
            .parents
            .iter()
            .try_fold(ctx, |node, segment| node.get(*segment))?;
        holder.get(key)
    }
}

/// Page-level directive locations in priority order.
pub const PAGE_SOURCES: &[DirectiveSource] = &[
    DirectiveSource {
        label: "context",
        parents: &[],
    },
    DirectiveSource {
        label: "page",
        parents: &["page"],
    },
    DirectiveSource {
        label: "eleventy.data",
        parents: &["eleventy", "data"],
    },
    DirectiveSource {
        label: "page.data",
        parents: &["page", "data"],
    },
];

/// Resolve the page-level directive from the context object.
///
/// Returns the winning source's label alongside the normalized globs.
pub fn from_page(ctx: &Value, key: &str) -> Option<(&'static str, Vec<String>)> {
    PAGE_SOURCES.iter().find_map(|source| {
        normalize(source.extract(ctx, key)).map(|globs| (source.label, globs))
    })
}
