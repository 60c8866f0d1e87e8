//! Wildcard pattern resolution against a root directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};

/// Outcome of [`resolve_wildcard_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumResolvedPath {
    /// First existing entry matching the pattern (name order).
    Matched(PathBuf),
    /// Nothing matched; carries the literal `root/pattern`.
    Unresolved(PathBuf),
}

impl EnumResolvedPath {
    pub fn path(&self) -> &Path {
        match self {
            Self::Matched(path) | Self::Unresolved(path) => path,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            Self::Matched(path) | Self::Unresolved(path) => path,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// `true` when a path segment carries glob metacharacters.
pub fn has_glob_meta(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

/// Resolve `pattern` below `path_dir_root`.
///
/// Wildcard segments are expanded against sorted directory listings and the
/// first surviving match wins. Zero matches, an invalid glob or an unreadable
/// directory all degrade to [`EnumResolvedPath::Unresolved`] with the literal
/// joined path; callers find out about missing entries on the next `stat`.
pub fn resolve_wildcard_path<P: AsRef<Path>>(path_dir_root: P, pattern: &str) -> EnumResolvedPath {
    let path_dir_root = path_dir_root.as_ref();
    let path_literal = path_dir_root.join(pattern);

    if !has_glob_meta(pattern) {
        return match fs::symlink_metadata(&path_literal) {
            Ok(_) => EnumResolvedPath::Matched(path_literal),
            Err(_) => EnumResolvedPath::Unresolved(path_literal),
        };
    }

    let mut l_candidates = vec![path_dir_root.to_path_buf()];
    for part in Path::new(pattern).components() {
        match part {
            Component::CurDir => continue,
            Component::Normal(segment) => {
                let segment_txt = segment.to_string_lossy();
                if !has_glob_meta(&segment_txt) {
                    for path_candidate in l_candidates.iter_mut() {
                        path_candidate.push(segment);
                    }
                    continue;
                }

                let Some(matcher) = compile_segment(&segment_txt) else {
                    tracing::debug!(pattern, "invalid wildcard segment `{segment_txt}`");
                    return EnumResolvedPath::Unresolved(path_literal);
                };
                l_candidates = l_candidates
                    .iter()
                    .flat_map(|path_dir| list_matching(path_dir, &matcher))
                    .collect();
            }
            other => {
                for path_candidate in l_candidates.iter_mut() {
                    path_candidate.push(other.as_os_str());
                }
            }
        }

        if l_candidates.is_empty() {
            break;
        }
    }

    let mut l_matches: Vec<PathBuf> = l_candidates
        .into_iter()
        .filter(|path| fs::symlink_metadata(path).is_ok())
        .collect();
    l_matches.sort();

    match l_matches.into_iter().next() {
        Some(path_match) => EnumResolvedPath::Matched(path_match),
        None => EnumResolvedPath::Unresolved(path_literal),
    }
}

fn compile_segment(segment: &str) -> Option<GlobMatcher> {
    GlobBuilder::new(segment)
        .literal_separator(true)
        .build()
        .ok()
        .map(|glob| glob.compile_matcher())
}

fn list_matching(path_dir: &Path, matcher: &GlobMatcher) -> Vec<PathBuf> {
    let Ok(iter_entries) = fs::read_dir(path_dir) else {
        return Vec::new();
    };

    let mut l_names: Vec<_> = iter_entries
        .filter_map(Result::ok)
        .map(|entry| entry.file_name())
        .filter(|name| matcher.is_match(Path::new(name)))
        .collect();
    l_names.sort();
    l_names.into_iter().map(|name| path_dir.join(name)).collect()
}
