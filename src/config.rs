//! Runtime configuration
//!
//! Read from environment variables with development defaults.

use crate::knowledge_base::CropKnowledgeBase;
use crate::selector::DEFAULT_TOP_N;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub port: u16,
    /// Alternative crop table; the built-in one is used when unset
    pub crop_db_path: Option<PathBuf>,
    pub default_top_n: usize,
    pub max_upload_bytes: usize,
    /// Where uploaded images are staged before analysis
    pub upload_dir: PathBuf,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            crop_db_path: None,
            default_top_n: DEFAULT_TOP_N,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_dir: std::env::temp_dir(),
        }
    }
}

impl PlannerConfig {
    /// Configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration from an arbitrary key lookup.
    ///
    /// Unset keys take defaults; set but malformed numeric keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(p) => p.trim().parse().with_context(|| format!("Invalid PORT: {}", p))?,
            None => defaults.port,
        };

        let default_top_n = match lookup("DEFAULT_TOP_N") {
            Some(n) => n
                .trim()
                .parse()
                .with_context(|| format!("Invalid DEFAULT_TOP_N: {}", n))?,
            None => defaults.default_top_n,
        };

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(n) => n
                .trim()
                .parse()
                .with_context(|| format!("Invalid MAX_UPLOAD_BYTES: {}", n))?,
            None => defaults.max_upload_bytes,
        };

        let crop_db_path = lookup("CROP_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let upload_dir = lookup("UPLOAD_DIR")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        Ok(Self {
            port,
            crop_db_path,
            default_top_n,
            max_upload_bytes,
            upload_dir,
        })
    }

    /// Load the configured knowledge base, or the built-in table
    pub fn load_knowledge_base(&self) -> Result<CropKnowledgeBase> {
        match &self.crop_db_path {
            Some(path) => CropKnowledgeBase::from_json_file(path)
                .with_context(|| format!("Failed to load crop knowledge base: {:?}", path)),
            None => Ok(CropKnowledgeBase::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.default_top_n, 5);
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert!(config.crop_db_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = PlannerConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("DEFAULT_TOP_N", "2"),
            ("CROP_DB_PATH", "/etc/planner/crops.json"),
            ("UPLOAD_DIR", "/var/tmp/uploads"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_top_n, 2);
        assert_eq!(config.crop_db_path, Some(PathBuf::from("/etc/planner/crops.json")));
        assert_eq!(config.upload_dir, PathBuf::from("/var/tmp/uploads"));
    }

    #[test]
    fn test_invalid_port() {
        assert!(PlannerConfig::from_lookup(lookup_from(&[("PORT", "http")])).is_err());
    }

    #[test]
    fn test_builtin_knowledge_base_when_unset() {
        let kb = PlannerConfig::default().load_knowledge_base().unwrap();
        assert_eq!(kb.len(), 9);
    }

    #[test]
    fn test_missing_knowledge_base_file() {
        let config = PlannerConfig {
            crop_db_path: Some(PathBuf::from("/nonexistent/crops.json")),
            ..Default::default()
        };
        let err = config.load_knowledge_base().unwrap_err();
        assert!(err.to_string().contains("Failed to load crop knowledge base"));
    }
}
