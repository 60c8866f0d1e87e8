//! Mirror specification models and top-level error types.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Matching mode for the directory exclusion set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumExcludeMatchMode {
    /// Exact, case-sensitive base-name equality.
    Literal,
    /// Shell-like wildcards (`*`, `?`, character classes) on the base name.
    Glob,
    /// Regular expression on the base name.
    Regex,
}

/// Which directory names take part in the exclusion check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumExcludeScope {
    /// The directory and every ancestor up to the filesystem root.
    Ancestry,
    /// The directory and its ancestors strictly below the job source root.
    WithinRoot,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options shared by every job of a `mirror_tree` run.
#[derive(Debug, Clone)]
pub struct SpecMirrorOptions {
    /// Bare directory names (no separators) whose subtrees are never mirrored.
    pub names_exclude_dirs: Vec<String>,
    /// Interpretation of `names_exclude_dirs`.
    pub rule_exclude_match: EnumExcludeMatchMode,
    /// Ancestor range considered by the exclusion check.
    pub rule_exclude_scope: EnumExcludeScope,
}

impl Default for SpecMirrorOptions {
    fn default() -> Self {
        Self {
            names_exclude_dirs: Vec::new(),
            rule_exclude_match: EnumExcludeMatchMode::Literal,
            rule_exclude_scope: EnumExcludeScope::Ancestry,
        }
    }
}

/// One copy job: two roots, a label and the relative patterns to mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecMirrorJob {
    /// Root the patterns are resolved against.
    pub path_dir_src: PathBuf,
    /// Root the resolved entries are mirrored into.
    pub path_dir_dst: PathBuf,
    /// Relative path patterns, attempted in order.
    pub patterns: Vec<String>,
    /// Operation label used in notices, e.g. `Backed up`.
    pub label: String,
}

impl SpecMirrorJob {
    pub fn new<P, Q, L>(path_dir_src: P, path_dir_dst: Q, patterns: Vec<String>, label: L) -> Self
    where
        P: Into<PathBuf>,
        Q: Into<PathBuf>,
        L: Into<String>,
    {
        Self {
            path_dir_src: path_dir_src.into(),
            path_dir_dst: path_dir_dst.into(),
            patterns,
            label: label.into(),
        }
    }
}

/// One progress notice emitted while mirroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumMirrorNotice {
    /// Directory subtree skipped by the exclusion set.
    SkippedDir { path: PathBuf },
    /// Directory processed (children attempted).
    CopiedDir {
        label: String,
        path_src: PathBuf,
        path_dst: PathBuf,
    },
    /// File copy attempted.
    CopiedFile {
        label: String,
        path_src: PathBuf,
        path_dst: PathBuf,
    },
}

impl fmt::Display for EnumMirrorNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedDir { path } => write!(f, "Skipping folder {}", path.display()),
            Self::CopiedDir {
                label,
                path_src,
                path_dst,
            } => write!(
                f,
                "{label} folder {} to {}",
                path_src.display(),
                path_dst.display()
            ),
            Self::CopiedFile {
                label,
                path_src,
                path_dst,
            } => write!(
                f,
                "{label} file {} to {}",
                path_src.display(),
                path_dst.display()
            ),
        }
    }
}

/// One mirror failure item with path + error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecMirrorError {
    /// Failed source or destination path.
    pub path: PathBuf,
    /// User-facing error text.
    pub exception: String,
}

/// "Top-level call failed" errors (input validation stage).
#[derive(Debug, Error)]
pub enum MirrorTreeError {
    /// Exclusion entry contains a path separator.
    #[error("Exclusion entry must be a bare directory name: `{0}`")]
    InvalidExcludeName(String),
    /// Exclusion entry is not a valid glob/regex.
    #[error("Invalid pattern in exclusion set: {0}")]
    InvalidExcludePattern(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
