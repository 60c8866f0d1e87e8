use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

use crate::spec::{EnumExcludeMatchMode, EnumExcludeScope, MirrorTreeError};

////////////////////////////////////////////////////////////////////////////////
// #region ExcludeMatching

#[derive(Debug, Clone)]
pub(crate) enum TypeExcludeNameSeq {
    Literal(Vec<String>),
    Glob(Vec<GlobMatcher>),
    Regex(Vec<Regex>),
}

impl TypeExcludeNameSeq {
    fn is_match(&self, name: &str) -> bool {
        match self {
            Self::Literal(v) => v.iter().any(|p| p == name),
            Self::Glob(v) => v.iter().any(|p| p.is_match(name)),
            Self::Regex(v) => v.iter().any(|p| p.is_match(name)),
        }
    }
}

/// Compiled exclusion set plus the scope it is evaluated in.
#[derive(Debug, Clone)]
pub(crate) struct SpecExcludeMatcher {
    names: Option<TypeExcludeNameSeq>,
    rule_scope: EnumExcludeScope,
}

impl SpecExcludeMatcher {
    pub(crate) fn from_raw(
        names_exclude_dirs: &[String],
        rule_match: EnumExcludeMatchMode,
        rule_scope: EnumExcludeScope,
    ) -> Result<Self, MirrorTreeError> {
        Ok(Self {
            names: _compile(names_exclude_dirs, rule_match)?,
            rule_scope,
        })
    }

    /// `true` when `path_dir` may be mirrored, `false` when it must be skipped.
    pub(crate) fn should_process_directory(&self, path_dir: &Path, path_dir_root: &Path) -> bool {
        let Some(names) = &self.names else {
            return true;
        };

        match self.rule_scope {
            EnumExcludeScope::Ancestry => !path_dir
                .ancestors()
                .filter_map(Path::file_name)
                .any(|name| names.is_match(&name.to_string_lossy())),
            EnumExcludeScope::WithinRoot => match path_dir.strip_prefix(path_dir_root) {
                Ok(path_rel) => !path_rel.components().any(|part| match part {
                    Component::Normal(name) => names.is_match(&name.to_string_lossy()),
                    _ => false,
                }),
                Err(_) => !path_dir
                    .file_name()
                    .is_some_and(|name| names.is_match(&name.to_string_lossy())),
            },
        }
    }
}

fn _compile(
    names: &[String],
    rule_match: EnumExcludeMatchMode,
) -> Result<Option<TypeExcludeNameSeq>, MirrorTreeError> {
    if names.is_empty() {
        return Ok(None);
    }

    match rule_match {
        EnumExcludeMatchMode::Literal => {
            for name in names {
                if name.is_empty() || name.contains(['/', '\\']) {
                    return Err(MirrorTreeError::InvalidExcludeName(name.clone()));
                }
            }
            Ok(Some(TypeExcludeNameSeq::Literal(names.to_vec())))
        }
        EnumExcludeMatchMode::Glob => {
            let mut l_glob = Vec::with_capacity(names.len());
            for name in names {
                if name.is_empty() || name.contains('/') {
                    return Err(MirrorTreeError::InvalidExcludeName(name.clone()));
                }
                let matcher = GlobBuilder::new(name)
                    .literal_separator(true)
                    .build()
                    .map_err(|e| MirrorTreeError::InvalidExcludePattern(e.to_string()))?
                    .compile_matcher();
                l_glob.push(matcher);
            }
            Ok(Some(TypeExcludeNameSeq::Glob(l_glob)))
        }
        EnumExcludeMatchMode::Regex => {
            let mut l_regex = Vec::with_capacity(names.len());
            for name in names {
                let regex = Regex::new(name)
                    .map_err(|e| MirrorTreeError::InvalidExcludePattern(e.to_string()))?;
                l_regex.push(regex);
            }
            Ok(Some(TypeExcludeNameSeq::Regex(l_regex)))
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

/// Drop embedded NUL bytes that a malformed listing or decode step may leave.
pub(crate) fn sanitize_path(path: &Path) -> PathBuf {
    #[cfg(unix)]
    {
        use std::ffi::OsString;
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let raw = path.as_os_str().as_bytes();
        if !raw.contains(&0) {
            return path.to_path_buf();
        }
        let cleaned: Vec<u8> = raw.iter().copied().filter(|b| *b != 0).collect();
        PathBuf::from(OsString::from_vec(cleaned))
    }
    #[cfg(not(unix))]
    {
        match path.to_str() {
            Some(txt) if txt.contains('\0') => PathBuf::from(txt.replace('\0', "")),
            _ => path.to_path_buf(),
        }
    }
}

/// Reject patterns that are empty, absolute or climb out of their root.
pub(crate) fn validate_pattern_within_root(pattern: &str) -> Result<(), String> {
    let mut b_has_name = false;
    for part in Path::new(pattern).components() {
        match part {
            Component::Prefix(_) | Component::RootDir => {
                return Err(format!("Pattern must be relative: `{pattern}`"));
            }
            Component::ParentDir => {
                return Err(format!("Pattern escapes its root: `{pattern}`"));
            }
            Component::CurDir => {}
            Component::Normal(_) => b_has_name = true,
        }
    }
    if !b_has_name {
        return Err(format!("Pattern names no entry: `{pattern}`"));
    }
    Ok(())
}

/// Segment-aware relative path of `path` below `path_dir_root`.
pub(crate) fn relativize_path(path: &Path, path_dir_root: &Path) -> Option<PathBuf> {
    path.strip_prefix(path_dir_root)
        .ok()
        .map(Path::to_path_buf)
}

pub(crate) fn ensure_dir(path_dir: &Path) -> Result<(), io::Error> {
    if path_dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path_dir)
}

/// Stream file bytes, truncating any existing destination.
///
/// Timestamps, permission bits and extended attributes are not carried over.
pub(crate) fn copy_file_contents(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<u64, io::Error> {
    let mut file_src = File::open(path_file_src)?;
    let mut file_dst = File::create(path_file_dst)?;
    io::copy(&mut file_src, &mut file_dst)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
