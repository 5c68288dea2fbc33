// src/watch/filter.rs

//! Exclusion filter for raw watcher events.
//!
//! Patterns are `globset` globs evaluated against paths relative to the
//! watched root, with forward slashes on every platform.

use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Compiled set of exclude patterns.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    excludes: GlobSet,
}

impl ChangeFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid exclude pattern '{pattern}'"))?;
            builder.add(glob);
        }
        let excludes = builder.build().context("building exclude set")?;
        Ok(Self { excludes })
    }

    /// True when a change to `path` should not trigger a restart.
    ///
    /// Paths that cannot be related to the watched root are not ours to
    /// react to and are ignored as well.
    pub fn ignores(&self, root: &Path, path: &Path) -> bool {
        match relative_str(root, path) {
            Some(rel) => self.excludes.is_match(&rel),
            None => true,
        }
    }
}

/// Relate `path` to `root` as a forward-slash string.
///
/// Tries a direct `strip_prefix` first; falls back to canonicalizing both
/// sides, which covers watchers that report events under a resolved symlink
/// prefix (notably `/private/var` on macOS).
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_string_lossy().replace('\\', "/"));
    }

    let root = root.canonicalize().ok()?;
    let path = path.canonicalize().ok()?;
    let rel = path.strip_prefix(&root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
