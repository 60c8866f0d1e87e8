//! `homevault_io_fs` v1:
//! Rust-side mirror engine for pattern-listed home files.
//!
//! Modules:
//! - `mirror`  : pattern dispatch and recursive copy
//! - `resolve` : wildcard path resolution
//! - `spec`    : enums/options/errors
//! - `report`  : run-time report model
//! - `util`    : shared helper functions

pub mod mirror;
pub mod report;
pub mod resolve;
pub mod spec;
mod util;

pub use mirror::{mirror_tree, mirror_trees};
pub use report::{ReportMirror, ReportMirrorBuilder};
pub use resolve::{EnumResolvedPath, has_glob_meta, resolve_wildcard_path};
pub use spec::{
    EnumExcludeMatchMode, EnumExcludeScope, EnumMirrorNotice, MirrorTreeError, SpecMirrorError,
    SpecMirrorJob, SpecMirrorOptions,
};
