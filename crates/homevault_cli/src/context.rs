//! Run context assembled once from the environment.

use std::path::PathBuf;

use homevault_io_fs::SpecMirrorOptions;
use thiserror::Error;

use crate::conf::{
    C_ARCHIVE_NAME_NATIVE, C_ARCHIVE_NAME_SECONDARY, C_ENV_BACKUP_ROOT, C_ENV_INSTANCE,
    C_ENV_USER_NAME, C_ENV_USER_NAME_FALLBACK, TUP_PATTERNS_NATIVE, TUP_PATTERNS_SECONDARY,
    derive_default_backup_root, derive_default_mirror_options, derive_native_home,
    derive_secondary_home,
};
use crate::instance::{InstanceError, detect_default_instance};
use crate::profile::SpecProfile;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("account name not set (checked `USERNAME` and `USER`)")]
    MissingUserName,
}

/// Everything a command needs; no ambient globals past this point.
#[derive(Debug, Clone)]
pub struct SpecVaultContext {
    pub user_name: String,
    pub path_dir_backup: PathBuf,
    /// Profiles in run order; the secondary one is absent when undetected.
    pub l_profiles: Vec<SpecProfile>,
    pub spec_options: SpecMirrorOptions,
}

impl SpecVaultContext {
    /// Read the process environment and detect the default instance.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), detect_default_instance)
    }

    /// Build from a variable lookup and an instance detector.
    ///
    /// The detector only runs when `HOMEVAULT_INSTANCE` is unset. A detection
    /// failure drops the secondary profile with a warning.
    pub fn from_lookup<F, D>(lookup: F, detect_instance: D) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
        D: FnOnce() -> Result<String, InstanceError>,
    {
        let read_non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let user_name = read_non_empty(C_ENV_USER_NAME)
            .or_else(|| read_non_empty(C_ENV_USER_NAME_FALLBACK))
            .ok_or(ConfigError::MissingUserName)?;

        let path_dir_backup = read_non_empty(C_ENV_BACKUP_ROOT)
            .map(PathBuf::from)
            .unwrap_or_else(|| derive_default_backup_root(&user_name));

        let mut l_profiles = vec![SpecProfile::new(
            C_ARCHIVE_NAME_NATIVE,
            derive_native_home(&user_name),
            &TUP_PATTERNS_NATIVE,
        )];

        let res_instance = match read_non_empty(C_ENV_INSTANCE) {
            Some(instance) => Ok(instance),
            None => detect_instance(),
        };
        match res_instance {
            Ok(instance) => {
                tracing::debug!(instance = %instance, "secondary instance selected");
                l_profiles.push(SpecProfile::new(
                    C_ARCHIVE_NAME_SECONDARY,
                    derive_secondary_home(&instance, &user_name),
                    &TUP_PATTERNS_SECONDARY,
                ));
            }
            Err(e) => {
                tracing::warn!("Skipping `{C_ARCHIVE_NAME_SECONDARY}` profile: {e}");
            }
        }

        Ok(Self {
            user_name,
            path_dir_backup,
            l_profiles,
            spec_options: derive_default_mirror_options(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::{ConfigError, SpecVaultContext};
    use crate::instance::InstanceError;

    fn lookup_from(l_pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let dict_env: HashMap<String, String> = l_pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| dict_env.get(key).cloned()
    }

    #[test]
    fn builds_both_profiles_from_detected_instance() {
        let spec_ctx = SpecVaultContext::from_lookup(lookup_from(&[("USERNAME", "ana")]), || {
            Ok("Ubuntu".to_string())
        })
        .expect("context");

        assert_eq!(spec_ctx.user_name, "ana");
        assert_eq!(
            spec_ctx.path_dir_backup,
            PathBuf::from(r"C:\Users\ana\OneDrive\Backup")
        );
        let l_names: Vec<&str> = spec_ctx.l_profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(l_names, vec!["win", "wsl"]);
        assert_eq!(
            spec_ctx.l_profiles[1].path_dir_home,
            PathBuf::from(r"\\wsl.localhost\Ubuntu\home\ana")
        );
        assert_eq!(spec_ctx.spec_options.names_exclude_dirs.len(), 2);
    }

    #[test]
    fn detection_failure_drops_secondary_profile() {
        let spec_ctx = SpecVaultContext::from_lookup(lookup_from(&[("USERNAME", "ana")]), || {
            Err(InstanceError::NoDefault)
        })
        .expect("context");

        assert_eq!(spec_ctx.l_profiles.len(), 1);
        assert_eq!(spec_ctx.l_profiles[0].name, "win");
    }

    #[test]
    fn env_overrides_take_precedence() {
        let spec_ctx = SpecVaultContext::from_lookup(
            lookup_from(&[
                ("USERNAME", ""),
                ("USER", "bo"),
                ("HOMEVAULT_BACKUP_ROOT", "/mnt/backup"),
                ("HOMEVAULT_INSTANCE", "Debian"),
            ]),
            || panic!("detector must not run when the instance is set"),
        )
        .expect("context");

        assert_eq!(spec_ctx.user_name, "bo");
        assert_eq!(spec_ctx.path_dir_backup, PathBuf::from("/mnt/backup"));
        assert_eq!(
            spec_ctx.l_profiles[1].path_dir_home,
            PathBuf::from(r"\\wsl.localhost\Debian\home\bo")
        );
    }

    #[test]
    fn missing_user_name_is_an_error() {
        let err = SpecVaultContext::from_lookup(lookup_from(&[]), || Ok("Ubuntu".to_string()))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::MissingUserName));
    }
}
