//! Configuration resolution
//!
//! The controller locator is resolved exactly once at startup and stays
//! read-only afterwards: CLI flag, then config file key, then built-in
//! default.

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use ingress_nginx_rs::plugin::{ControllerLocator, DEFAULT_DEPLOYMENT, DEFAULT_NAMESPACE};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional keys of the on-disk config file
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub namespace: Option<String>,
    pub deployment: Option<String>,
}

/// Default config file location: <config_dir>/ingress-pilot/config.yaml
fn default_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("ingress-pilot").join("config.yaml"))
}

/// Read the config file if it exists; a missing file is not an error.
pub fn load(path: Option<&Path>) -> Result<FileConfig> {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_path) else {
        return Ok(FileConfig::default());
    };
    if !path.exists() {
        return Ok(FileConfig::default());
    }

    let raw = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
    let config = serde_yaml::from_str(&raw)
        .wrap_err_with(|| format!("invalid config file {}", path.display()))?;
    Ok(config)
}

/// Merge flag > file > default into the final locator.
pub fn resolve_locator(
    namespace_flag: Option<String>,
    deployment_flag: Option<String>,
    file: FileConfig,
) -> ControllerLocator {
    ControllerLocator::new(
        namespace_flag
            .or(file.namespace)
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
        deployment_flag
            .or(file.deployment)
            .unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let locator = resolve_locator(None, None, FileConfig::default());
        assert_eq!(locator.namespace, "ingress-nginx-ns");
        assert_eq!(locator.deployment, "ingress-nginx-controller");
    }

    #[test]
    fn file_overrides_defaults_and_flags_override_the_file() {
        let file = FileConfig {
            namespace: Some("edge".to_string()),
            deployment: Some("ctl".to_string()),
        };

        let from_file = resolve_locator(None, None, file.clone());
        assert_eq!(from_file.namespace, "edge");
        assert_eq!(from_file.deployment, "ctl");

        let from_flags = resolve_locator(Some("override-ns".to_string()), None, file);
        assert_eq!(from_flags.namespace, "override-ns");
        assert_eq!(from_flags.deployment, "ctl");
    }

    #[test]
    fn missing_file_yields_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(Some(&dir.path().join("nope.yaml"))).unwrap();
        assert!(config.namespace.is_none());
        assert!(config.deployment.is_none());
    }

    #[test]
    fn file_contents_are_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "namespace: edge").unwrap();
        writeln!(file, "deployment: ctl").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.namespace.as_deref(), Some("edge"));
        assert_eq!(config.deployment.as_deref(), Some("ctl"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "namespcae: typo\n").unwrap();

        assert!(load(Some(&path)).is_err());
    }
}
