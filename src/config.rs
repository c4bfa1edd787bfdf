// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portal configuration file loading.

use crate::i18n::Lang;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Directory holding `<lang>.json` content resources.
    pub content_dir: PathBuf,
    /// JSON file the language preference is persisted to.
    pub preference_file: PathBuf,
    pub default_lang: Lang,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            preference_file: PathBuf::from(".rules-portal/preferences.json"),
            default_lang: Lang::En,
            log_json: false,
        }
    }
}

impl PortalConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading portal config {}", path.display()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("parsing json portal config {}", path.display())),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml portal config {}", path.display())),
            _ => Err(anyhow!(
                "unsupported portal config extension for {}",
                path.display()
            )),
        }
    }

    /// File values, or defaults when no file is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portal.yaml");
        fs::write(&path, "content_dir: site/data\ndefault_lang: ar\n").unwrap();
        let config = PortalConfig::load(&path).unwrap();
        assert_eq!(config.content_dir, PathBuf::from("site/data"));
        assert_eq!(config.default_lang, Lang::Ar);
        assert_eq!(config.preference_file, PortalConfig::default().preference_file);
        assert!(!config.log_json);
    }

    #[test]
    fn json_config_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portal.json");
        fs::write(&path, r#"{"log_json": true}"#).unwrap();
        assert!(PortalConfig::load(&path).unwrap().log_json);
    }

    #[test]
    fn unknown_extension_and_bad_language_fail() {
        let dir = TempDir::new().unwrap();
        let toml = dir.path().join("portal.toml");
        fs::write(&toml, "").unwrap();
        assert!(PortalConfig::load(&toml).is_err());

        let yaml = dir.path().join("portal.yml");
        fs::write(&yaml, "default_lang: fr\n").unwrap();
        assert!(PortalConfig::load(&yaml).is_err());
    }

    #[test]
    fn missing_path_means_defaults() {
        assert_eq!(PortalConfig::load_or_default(None).unwrap(), PortalConfig::default());
    }
}
