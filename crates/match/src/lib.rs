// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Include/exclude glob matching against a base directory. Pure, no I/O —
//! the caller (the `Workspace` collaborator) is responsible for actually
//! walking the filesystem.

use glob::{MatchOptions, Pattern, PatternError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A pattern string failed to compile as a glob.
#[derive(Debug, Error)]
#[error("invalid glob pattern {pattern:?}: {source}")]
pub struct InvalidPattern {
    pattern: String,
    #[source]
    source: PatternError,
}

/// Compiled include/exclude glob sets, ready to test paths under a fixed
/// base directory.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    basedir: PathBuf,
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
    options: MatchOptions,
}

impl FileMatcher {
    /// Compile `includes` and `excludes` (each `**`/`*`/`?` glob patterns,
    /// relative to `basedir`) into a matcher.
    pub fn new<I, E>(basedir: impl Into<PathBuf>, includes: I, excludes: E) -> Result<Self, InvalidPattern>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let includes = compile(includes)?;
        let excludes = compile(excludes)?;
        Ok(FileMatcher {
            basedir: basedir.into(),
            includes,
            excludes,
            options: MatchOptions {
                case_sensitive: platform_case_sensitive(),
                require_literal_separator: true,
                require_literal_leading_dot: false,
            },
        })
    }

    /// A file matches iff (includes are empty OR any include matches) AND
    /// (no exclude matches).
    pub fn matches(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.basedir).unwrap_or(path);
        let relative = relative.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/");

        let included = self.includes.is_empty()
            || self.includes.iter().any(|p| p.matches_with(&relative, self.options));
        if !included {
            return false;
        }
        !self.excludes.iter().any(|p| p.matches_with(&relative, self.options))
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }
}

fn compile<I>(patterns: I) -> Result<Vec<Pattern>, InvalidPattern>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|p| {
            let pattern = p.as_ref();
            Pattern::new(pattern).map_err(|source| InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect()
}

/// Case sensitivity as reported by the host platform, per the spec's
/// requirement that matching be "case-sensitive on case-sensitive
/// filesystems and case-insensitive otherwise."
fn platform_case_sensitive() -> bool {
    !(cfg!(target_os = "windows") || cfg!(target_os = "macos"))
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
