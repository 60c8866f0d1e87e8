//! Pattern dispatch and recursive tree mirroring.

use std::fs::{self, Metadata};
use std::path::Path;

use crate::report::{ReportMirror, ReportMirrorBuilder};
use crate::resolve::{has_glob_meta, resolve_wildcard_path};
use crate::spec::{EnumMirrorNotice, MirrorTreeError, SpecMirrorJob, SpecMirrorOptions};
use crate::util::{
    SpecExcludeMatcher, copy_file_contents, ensure_dir, relativize_path, sanitize_path,
    validate_pattern_within_root,
};

#[derive(Debug)]
struct SpecMirrorContext<'a> {
    spec_job: &'a SpecMirrorJob,
    spec_exclude: SpecExcludeMatcher,
    builder_report: ReportMirrorBuilder,
    /// `(dev, ino)` of the directories on the current descent path.
    l_dirs_active: Vec<(u64, u64)>,
}

/// Mirror every pattern of `spec_job` from its source root to its destination root.
///
/// For each pattern:
/// 1. reject it when it is absolute or climbs out of the source root,
/// 2. resolve wildcard segments against the source root,
/// 3. relativize the result and mirror `src/<rel>` onto `dst/<rel>`.
///
/// Directories are walked depth-first in name order. A directory whose name,
/// or an ancestor's name (see [`crate::EnumExcludeScope`]), is in the exclusion
/// set is skipped without creating anything at the destination. Files are
/// streamed byte-for-byte, overwriting existing destination files.
///
/// Returns [`ReportMirror`] when the job completes, with per-entry failures
/// stored in the report. Returns [`MirrorTreeError`] only when the exclusion
/// set itself is invalid.
pub fn mirror_tree(
    spec_job: &SpecMirrorJob,
    spec_options: &SpecMirrorOptions,
) -> Result<ReportMirror, MirrorTreeError> {
    let spec_exclude = SpecExcludeMatcher::from_raw(
        &spec_options.names_exclude_dirs,
        spec_options.rule_exclude_match,
        spec_options.rule_exclude_scope,
    )?;

    let mut spec_ctx = SpecMirrorContext {
        spec_job,
        spec_exclude,
        builder_report: ReportMirrorBuilder::default(),
        l_dirs_active: Vec::new(),
    };

    for pattern in &spec_job.patterns {
        mirror_pattern(pattern, &mut spec_ctx);
    }
    Ok(spec_ctx.builder_report.build())
}

/// Run several jobs in order with shared options, one report per job.
pub fn mirror_trees(
    l_jobs: &[SpecMirrorJob],
    spec_options: &SpecMirrorOptions,
) -> Result<Vec<ReportMirror>, MirrorTreeError> {
    l_jobs
        .iter()
        .map(|spec_job| mirror_tree(spec_job, spec_options))
        .collect()
}

fn mirror_pattern(pattern: &str, spec_ctx: &mut SpecMirrorContext<'_>) {
    let spec_job = spec_ctx.spec_job;
    let path_dir_src = &spec_job.path_dir_src;
    if let Err(message) = validate_pattern_within_root(pattern) {
        spec_ctx
            .builder_report
            .add_error(path_dir_src.join(pattern), message);
        return;
    }

    let resolved = resolve_wildcard_path(path_dir_src, pattern);
    if has_glob_meta(pattern) && !resolved.is_matched() {
        tracing::debug!(pattern, "no match, falling back to literal path");
    }
    let path_resolved = resolved.into_path();

    let Some(path_rel) = relativize_path(&path_resolved, path_dir_src) else {
        spec_ctx.builder_report.add_error(
            path_resolved.clone(),
            format!(
                "Resolved path is outside source root: {} (root={})",
                path_resolved.display(),
                path_dir_src.display()
            ),
        );
        return;
    };

    let path_src = path_dir_src.join(&path_rel);
    let path_dst = spec_job.path_dir_dst.join(&path_rel);
    copy_item_recursively(&path_src, &path_dst, spec_ctx);
}

fn copy_item_recursively(path_src: &Path, path_dst: &Path, spec_ctx: &mut SpecMirrorContext<'_>) {
    let path_src_clean = sanitize_path(path_src);
    let meta_src = match fs::metadata(&path_src_clean) {
        Ok(v) => v,
        Err(e) => {
            spec_ctx.builder_report.add_error(
                path_src_clean.clone(),
                format!("Failed to stat {} ({e})", path_src_clean.display()),
            );
            return;
        }
    };
    spec_ctx.builder_report.add_scanned();

    if meta_src.is_dir() {
        copy_dir_recursively(path_src, &path_src_clean, &meta_src, path_dst, spec_ctx);
    } else {
        copy_file_item(path_src, &path_src_clean, path_dst, spec_ctx);
    }
}

fn copy_dir_recursively(
    path_src: &Path,
    path_src_clean: &Path,
    meta_src: &Metadata,
    path_dst: &Path,
    spec_ctx: &mut SpecMirrorContext<'_>,
) {
    if !spec_ctx
        .spec_exclude
        .should_process_directory(path_src_clean, &spec_ctx.spec_job.path_dir_src)
    {
        spec_ctx
            .builder_report
            .add_skipped_dir(path_src_clean.to_path_buf());
        return;
    }

    let dir_identifier = directory_identifier(meta_src);
    if let Some(tuple_id) = dir_identifier
        && spec_ctx.l_dirs_active.contains(&tuple_id)
    {
        spec_ctx.builder_report.add_warning(format!(
            "Directory loop detected: {}",
            path_src_clean.display()
        ));
        return;
    }

    if let Err(e) = ensure_dir(path_dst) {
        spec_ctx.builder_report.add_error(
            path_dst.to_path_buf(),
            format!("Failed to create directory {} ({e})", path_dst.display()),
        );
        return;
    }
    spec_ctx.builder_report.add_copied_dir();

    let l_names = match read_dir_names_sorted(path_src_clean) {
        Ok(v) => v,
        Err(e) => {
            spec_ctx.builder_report.add_error(
                path_src_clean.to_path_buf(),
                format!("Failed to read directory {} ({e})", path_src_clean.display()),
            );
            return;
        }
    };

    if let Some(tuple_id) = dir_identifier {
        spec_ctx.l_dirs_active.push(tuple_id);
    }
    for name in l_names {
        copy_item_recursively(&path_src_clean.join(&name), &path_dst.join(&name), spec_ctx);
    }
    if dir_identifier.is_some() {
        spec_ctx.l_dirs_active.pop();
    }

    let label = spec_ctx.spec_job.label.clone();
    spec_ctx.builder_report.add_notice(EnumMirrorNotice::CopiedDir {
        label,
        path_src: path_src.to_path_buf(),
        path_dst: path_dst.to_path_buf(),
    });
}

fn copy_file_item(
    path_src: &Path,
    path_src_clean: &Path,
    path_dst: &Path,
    spec_ctx: &mut SpecMirrorContext<'_>,
) {
    let res_copy = match path_dst.parent() {
        Some(path_parent_dst) => ensure_dir(path_parent_dst).map_err(|e| {
            format!(
                "Failed to create directory {} ({e})",
                path_parent_dst.display()
            )
        }),
        None => Ok(()),
    }
    .and_then(|_| {
        copy_file_contents(path_src_clean, path_dst).map_err(|e| {
            format!(
                "Failed to copy {} to {} ({e})",
                path_src_clean.display(),
                path_dst.display()
            )
        })
    });

    match res_copy {
        Ok(_) => spec_ctx.builder_report.add_copied_file(),
        Err(message) => spec_ctx
            .builder_report
            .add_error(path_dst.to_path_buf(), message),
    }

    let label = spec_ctx.spec_job.label.clone();
    spec_ctx.builder_report.add_notice(EnumMirrorNotice::CopiedFile {
        label,
        path_src: path_src.to_path_buf(),
        path_dst: path_dst.to_path_buf(),
    });
}

fn read_dir_names_sorted(path_dir: &Path) -> Result<Vec<std::ffi::OsString>, std::io::Error> {
    let mut l_names = fs::read_dir(path_dir)?
        .map(|entry_res| entry_res.map(|entry| entry.file_name()))
        .collect::<Result<Vec<_>, _>>()?;
    l_names.sort();
    Ok(l_names)
}

#[cfg(unix)]
fn directory_identifier(meta_dir: &Metadata) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    Some((meta_dir.dev(), meta_dir.ino()))
}

#[cfg(not(unix))]
fn directory_identifier(_meta_dir: &Metadata) -> Option<(u64, u64)> {
    None
}
