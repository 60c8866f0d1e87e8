//! Mirror report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::spec::{EnumMirrorNotice, SpecMirrorError};

/// Aggregate counters and diagnostics for one mirror job.
#[derive(Debug, Default, Clone)]
pub struct ReportMirror {
    /// Entries that were stat-ed successfully.
    pub cnt_scanned: u64,
    /// Files whose bytes were fully streamed to the destination.
    pub cnt_copied_files: u64,
    /// Directories created or reused at the destination.
    pub cnt_copied_dirs: u64,
    /// Directory subtrees skipped by the exclusion set.
    pub cnt_skipped: u64,
    /// Progress notices in emission order.
    pub notices: Vec<EnumMirrorNotice>,
    /// Non-fatal warnings collected during traversal.
    pub warnings: Vec<String>,
    /// Per-entry failures.
    pub errors: Vec<SpecMirrorError>,
}

impl ReportMirror {
    /// Number of collected hard errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Paths of every skipped directory, in emission order.
    pub fn skipped_paths(&self) -> Vec<&PathBuf> {
        self.notices
            .iter()
            .filter_map(|notice| match notice {
                EnumMirrorNotice::SkippedDir { path } => Some(path),
                _ => None,
            })
            .collect()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_copied_files".to_string(), self.cnt_copied_files);
        dict_counts.insert("cnt_copied_dirs".to_string(), self.cnt_copied_dirs);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} scanned={} files={} dirs={} skipped={} errors={} warnings={}",
            dict_counts["cnt_scanned"],
            dict_counts["cnt_copied_files"],
            dict_counts["cnt_copied_dirs"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[MIRROR]"))
    }
}

/// Mutable accumulator for mirror statistics.
///
/// Every `add_*` call also emits the matching `tracing` event so the log
/// stream and the report never disagree.
#[derive(Debug, Default, Clone)]
pub struct ReportMirrorBuilder {
    report: ReportMirror,
}

impl ReportMirrorBuilder {
    pub fn add_scanned(&mut self) {
        self.report.cnt_scanned += 1;
    }

    pub fn add_copied_file(&mut self) {
        self.report.cnt_copied_files += 1;
    }

    pub fn add_copied_dir(&mut self) {
        self.report.cnt_copied_dirs += 1;
    }

    /// Record a skipped directory subtree.
    pub fn add_skipped_dir(&mut self, path: PathBuf) {
        self.report.cnt_skipped += 1;
        self.add_notice(EnumMirrorNotice::SkippedDir { path });
    }

    /// Add one progress notice.
    pub fn add_notice(&mut self, notice: EnumMirrorNotice) {
        tracing::info!("{notice}");
        self.report.notices.push(notice);
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        tracing::warn!("{warning}");
        self.report.warnings.push(warning);
    }

    /// Add one path-scoped error.
    pub fn add_error(&mut self, path: PathBuf, exception: String) {
        tracing::warn!(path = %path.display(), "{exception}");
        self.report.errors.push(SpecMirrorError { path, exception });
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportMirror {
        self.report
    }
}
