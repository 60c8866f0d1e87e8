//! Compiled-in path tables, environment keys and default factories.

use std::path::PathBuf;

use homevault_io_fs::{EnumExcludeMatchMode, EnumExcludeScope, SpecMirrorOptions};

/// Archive subdirectory for the native environment.
pub const C_ARCHIVE_NAME_NATIVE: &str = "win";
/// Archive subdirectory for the secondary environment.
pub const C_ARCHIVE_NAME_SECONDARY: &str = "wsl";

/// Patterns mirrored below the native home.
pub const TUP_PATTERNS_NATIVE: [&str; 11] = [
    // folders or recursive group
    ".aws/config",
    ".aws/credentials",
    ".azure/azureProfile.json",
    ".azure/service_principal_entries.json",
    ".gnupg",
    ".ssh",
    "AppData/Local/Packages/Microsoft.WindowsTerminal_*/LocalState/settings.json",
    // direct files group
    ".gitconfig",
    ".gitignore",
    ".oh-my-posh.json",
    ".wakatime.cfg",
];

/// Patterns mirrored below the secondary home.
pub const TUP_PATTERNS_SECONDARY: [&str; 15] = [
    // folders or recursive group
    ".docker/config.json",
    ".histdb",
    ".john",
    ".kube/config",
    ".kube/config-files",
    ".sqlmap",
    // direct files group
    ".autobump.yaml",
    ".freterc",
    ".gitconfig",
    ".gitignore",
    ".npmrc",
    ".npmrc.vizir",
    ".p10k.zsh",
    ".zshrc",
    "pyvenv.cfg",
];

/// Directory names never mirrored, wherever they occur.
pub const TUP_NAMES_EXCLUDE_DIRS: [&str; 2] = [".venv", "node_modules"];

/// Account name, read first.
pub const C_ENV_USER_NAME: &str = "USERNAME";
/// Account name fallback for non-Windows shells.
pub const C_ENV_USER_NAME_FALLBACK: &str = "USER";
/// Optional override of the backup root.
pub const C_ENV_BACKUP_ROOT: &str = "HOMEVAULT_BACKUP_ROOT";
/// Optional override of the detected secondary instance.
pub const C_ENV_INSTANCE: &str = "HOMEVAULT_INSTANCE";

/// Log filter used when `RUST_LOG` is unset or invalid.
pub const C_LOG_FILTER_DEFAULT: &str = "info";

/// Program and arguments listing the secondary instances.
pub const C_INSTANCE_LIST_PROGRAM: &str = "wsl";
pub const TUP_INSTANCE_LIST_ARGS: [&str; 2] = ["-l", "-v"];
/// Marker flagging the default row in the instance listing.
pub const C_INSTANCE_DEFAULT_MARKER: char = '*';

/// Native home of `user_name`.
pub fn derive_native_home(user_name: &str) -> PathBuf {
    PathBuf::from(format!(r"C:\Users\{user_name}"))
}

/// Default backup root of `user_name`.
pub fn derive_default_backup_root(user_name: &str) -> PathBuf {
    PathBuf::from(format!(r"C:\Users\{user_name}\OneDrive\Backup"))
}

/// Secondary home of `user_name` as seen through the path bridge.
pub fn derive_secondary_home(instance: &str, user_name: &str) -> PathBuf {
    PathBuf::from(format!(r"\\wsl.localhost\{instance}\home\{user_name}"))
}

/// Build default mirror options from the exclusion table.
pub fn derive_default_mirror_options() -> SpecMirrorOptions {
    SpecMirrorOptions {
        names_exclude_dirs: TUP_NAMES_EXCLUDE_DIRS
            .iter()
            .map(|name| name.to_string())
            .collect(),
        rule_exclude_match: EnumExcludeMatchMode::Literal,
        rule_exclude_scope: EnumExcludeScope::Ancestry,
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Component, Path, PathBuf};

    use homevault_io_fs::has_glob_meta;

    use super::{
        TUP_NAMES_EXCLUDE_DIRS, TUP_PATTERNS_NATIVE, TUP_PATTERNS_SECONDARY,
        derive_default_backup_root, derive_default_mirror_options, derive_native_home,
        derive_secondary_home,
    };

    #[test]
    fn pattern_tables_stay_below_their_root() {
        for pattern in TUP_PATTERNS_NATIVE.iter().chain(TUP_PATTERNS_SECONDARY.iter()) {
            assert!(
                Path::new(pattern)
                    .components()
                    .all(|part| matches!(part, Component::Normal(_))),
                "pattern `{pattern}` must be a plain relative path"
            );
        }
    }

    #[test]
    fn only_terminal_settings_use_a_wildcard() {
        let l_wild: Vec<&str> = TUP_PATTERNS_NATIVE
            .iter()
            .chain(TUP_PATTERNS_SECONDARY.iter())
            .copied()
            .filter(|pattern| has_glob_meta(pattern))
            .collect();
        assert_eq!(
            l_wild,
            vec!["AppData/Local/Packages/Microsoft.WindowsTerminal_*/LocalState/settings.json"]
        );
    }

    #[test]
    fn exclusion_names_are_bare() {
        for name in TUP_NAMES_EXCLUDE_DIRS {
            assert!(!name.contains(['/', '\\']));
        }
        let spec_options = derive_default_mirror_options();
        assert_eq!(spec_options.names_exclude_dirs, vec![".venv", "node_modules"]);
    }

    #[test]
    fn roots_follow_account_layout() {
        assert_eq!(derive_native_home("ana"), PathBuf::from(r"C:\Users\ana"));
        assert_eq!(
            derive_default_backup_root("ana"),
            PathBuf::from(r"C:\Users\ana\OneDrive\Backup")
        );
        assert_eq!(
            derive_secondary_home("Ubuntu-22.04", "ana"),
            PathBuf::from(r"\\wsl.localhost\Ubuntu-22.04\home\ana")
        );
    }
}
