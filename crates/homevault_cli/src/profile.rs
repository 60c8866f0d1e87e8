//! Environment profiles and the mirror jobs derived from them.

use std::path::{Path, PathBuf};

use homevault_io_fs::SpecMirrorJob;

/// Copy direction between live homes and the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumVaultDirection {
    /// Live home -> archive.
    Backup,
    /// Archive -> live home.
    Restore,
}

impl EnumVaultDirection {
    /// Operation label used in notices.
    pub fn label(self) -> &'static str {
        match self {
            Self::Backup => "Backed up",
            Self::Restore => "Restored",
        }
    }

    /// Short tag used in summary lines.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Backup => "BACKUP",
            Self::Restore => "RESTORE",
        }
    }
}

/// One environment: its live home and the patterns kept in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecProfile {
    /// Archive subdirectory name, e.g. `win`.
    pub name: String,
    pub path_dir_home: PathBuf,
    pub patterns: Vec<String>,
}

impl SpecProfile {
    pub fn new<P: Into<PathBuf>>(name: &str, path_dir_home: P, patterns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            path_dir_home: path_dir_home.into(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Archive directory of this profile below `path_dir_backup`.
    pub fn derive_archive_dir(&self, path_dir_backup: &Path) -> PathBuf {
        path_dir_backup.join(&self.name)
    }

    /// Mirror job moving this profile in `direction`.
    pub fn derive_mirror_job(
        &self,
        direction: EnumVaultDirection,
        path_dir_backup: &Path,
    ) -> SpecMirrorJob {
        let path_dir_archive = self.derive_archive_dir(path_dir_backup);
        let (path_dir_src, path_dir_dst) = match direction {
            EnumVaultDirection::Backup => (self.path_dir_home.clone(), path_dir_archive),
            EnumVaultDirection::Restore => (path_dir_archive, self.path_dir_home.clone()),
        };
        SpecMirrorJob::new(
            path_dir_src,
            path_dir_dst,
            self.patterns.clone(),
            direction.label(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{EnumVaultDirection, SpecProfile};

    #[test]
    fn backup_and_restore_swap_roots() {
        let spec_profile = SpecProfile::new("wsl", "/home/ana", &[".zshrc", ".kube/config"]);
        let path_dir_backup = Path::new("/backup");

        let spec_job_backup =
            spec_profile.derive_mirror_job(EnumVaultDirection::Backup, path_dir_backup);
        assert_eq!(spec_job_backup.path_dir_src, Path::new("/home/ana"));
        assert_eq!(spec_job_backup.path_dir_dst, Path::new("/backup/wsl"));
        assert_eq!(spec_job_backup.label, "Backed up");
        assert_eq!(spec_job_backup.patterns, vec![".zshrc", ".kube/config"]);

        let spec_job_restore =
            spec_profile.derive_mirror_job(EnumVaultDirection::Restore, path_dir_backup);
        assert_eq!(spec_job_restore.path_dir_src, Path::new("/backup/wsl"));
        assert_eq!(spec_job_restore.path_dir_dst, Path::new("/home/ana"));
        assert_eq!(spec_job_restore.label, "Restored");
    }
}
