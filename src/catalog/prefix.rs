//! Sorted-prefix lookup of nested paths
//!
//! A field belongs to the longest configured path that equals it or is a
//! dotted prefix of it (`programs` owns `programs.code`, not `programs_x`).
//! Lookup walks the field's dot boundaries from longest to shortest and
//! binary-searches each candidate in the sorted path list.

use super::errors::{CatalogError, CatalogResult};

/// Immutable index over configured nested paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedPathIndex {
    /// Paths, sorted and unique
    paths: Vec<String>,
}

impl NestedPathIndex {
    /// Builds the index, rejecting empty, malformed, or duplicate paths.
    pub fn new(paths: impl IntoIterator<Item = impl Into<String>>) -> CatalogResult<Self> {
        let mut paths: Vec<String> = paths.into_iter().map(Into::into).collect();

        for path in &paths {
            if path.is_empty()
                || path.starts_with('.')
                || path.ends_with('.')
                || path.contains("..")
            {
                return Err(CatalogError::InvalidNestedPath(path.clone()));
            }
        }

        paths.sort();
        if let Some(dup) = paths.windows(2).find(|w| w[0] == w[1]) {
            return Err(CatalogError::DuplicateNestedPath(dup[0].clone()));
        }

        Ok(Self { paths })
    }

    /// Returns the nested path owning `field`, if any.
    pub fn resolve(&self, field: &str) -> Option<&str> {
        if self.paths.is_empty() {
            return None;
        }

        let mut candidate = field;
        loop {
            if let Ok(idx) = self.paths.binary_search_by(|p| p.as_str().cmp(candidate)) {
                return Some(self.paths[idx].as_str());
            }
            match candidate.rfind('.') {
                Some(dot) => candidate = &candidate[..dot],
                None => return None,
            }
        }
    }

    /// All configured paths in sorted order
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
