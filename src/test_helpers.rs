//! Shared test utilities for building scratch site trees.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! write_sidecar(&tmp.path().join("docs"), "docs.json", &json!({ "eleventyCopy": "*.svg" }));
//! touch(&tmp.path().join("docs"), "diagram.svg", "<svg/>");
//! ```

use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/basic/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/basic");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Tree builders
// =========================================================================

/// Write `content` to `dir/rel`, creating parent directories.
pub fn touch(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Write a JSON sidecar named `name` into `dir`, creating `dir`.
pub fn write_sidecar(dir: &Path, name: &str, data: &Value) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), serde_json::to_string_pretty(data).unwrap()).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_include_blog_sidecar() {
        let tmp = setup_fixtures();
        let blog = tmp.path().join("blog");
        assert!(blog.join("blog.json").is_file());
        assert!(blog.join("test.png").is_file());
        assert!(blog.join("post.html").is_file());
    }
}
