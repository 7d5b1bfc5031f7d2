//! The narrow slice of a site generator this crate plugs into.
//!
//! A host renders pages and then runs every registered content transform on
//! each page's rendered output, in registration order. Transforms receive the
//! content plus a [`PageContext`] and return (possibly rewritten) content.

use crate::context::PageContext;
use crate::copy::CopyError;

/// A named content transform.
pub trait Transform: Send + Sync {
    /// Identifier the transform is registered under.
    fn name(&self) -> &str;

    /// Transform one page's rendered content.
    fn transform(&self, content: String, ctx: &PageContext) -> Result<String, CopyError>;
}

/// Ordered set of transforms, applied to each rendered page.
#[derive(Default)]
pub struct TransformRegistry {
    transforms: Vec<Box<dyn Transform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transform. A transform with the same name is replaced in place.
    pub fn add_transform(&mut self, transform: Box<dyn Transform>) {
        let existing = self
            .transforms
            .iter()
            .position(|t| t.name() == transform.name());
        match existing {
            Some(index) => self.transforms[index] = transform,
            None => self.transforms.push(transform),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Run every transform over `content`, threading the output through.
    pub fn apply(&self, content: String, ctx: &PageContext) -> Result<String, CopyError> {
        self.transforms
            .iter()
            .try_fold(content, |content, t| t.transform(content, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Suffix(&'static str, &'static str);

    impl Transform for Suffix {
        fn name(&self) -> &str {
            self.0
        }

        fn transform(&self, content: String, _ctx: &PageContext) -> Result<String, CopyError> {
            Ok(content + self.1)
        }
    }

    #[test]
    fn transforms_run_in_registration_order() {
        let mut registry = TransformRegistry::new();
        registry.add_transform(Box::new(Suffix("a", "-a")));
        registry.add_transform(Box::new(Suffix("b", "-b")));

        let out = registry
            .apply("page".to_string(), &PageContext::default())
            .unwrap();
        assert_eq!(out, "page-a-b");
    }

    #[test]
    fn same_name_replaces() {
        let mut registry = TransformRegistry::new();
        registry.add_transform(Box::new(Suffix("a", "-old")));
        registry.add_transform(Box::new(Suffix("b", "-b")));
        registry.add_transform(Box::new(Suffix("a", "-new")));

        assert_eq!(registry.names(), vec!["a", "b"]);
        let out = registry
            .apply("page".to_string(), &PageContext::default())
            .unwrap();
        assert_eq!(out, "page-new-b");
    }

    #[test]
    fn empty_registry_passes_content_through() {
        let registry = TransformRegistry::new();
        assert!(registry.is_empty());
        let out = registry
            .apply("<p>hi</p>".to_string(), &PageContext::default())
            .unwrap();
        assert_eq!(out, "<p>hi</p>");
    }
}
