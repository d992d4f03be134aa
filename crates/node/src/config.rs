//! Node configuration, loaded from TOML.

use std::{fs, path::Path};

use anyhow::{anyhow, ensure, Context, Result};
use pcd::BATCH_PROGRAM_LABEL;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    /// Label the batch-processor program id is derived from.
    pub program_label: String,
    /// Hex-encoded 32-byte key shared by prover and ledger. Zero key if unset.
    pub backend_key: Option<String>,
    /// Messages folded per ledger update.
    pub batch_size: usize,
    pub message_count: u64,
    pub seed: u64,
    /// Corrupt every n-th generated message; `None` disables corruption.
    pub corrupt_every: Option<u64>,
    /// Fallback filter when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            program_label: BATCH_PROGRAM_LABEL.to_owned(),
            backend_key: None,
            batch_size: 4,
            message_count: 32,
            seed: 0,
            corrupt_every: Some(5),
            log_filter: "info".to_owned(),
        }
    }
}

impl NodeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: NodeConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.batch_size > 0, "batch_size must be positive");
        ensure!(self.corrupt_every != Some(0), "corrupt_every must be positive");
        ensure!(!self.program_label.is_empty(), "program_label must not be empty");
        self.backend_key()?;
        Ok(())
    }

    pub fn backend_key(&self) -> Result<[u8; 32]> {
        let Some(encoded) = &self.backend_key else {
            return Ok([0u8; 32]);
        };
        let bytes = hex::decode(encoded).context("backend_key is not hex")?;
        bytes
            .try_into()
            .map_err(|b: Vec<u8>| anyhow!("backend_key must be 32 bytes, got {}", b.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(NodeConfig::from_toml_str("").unwrap(), NodeConfig::default());
    }

    #[test]
    fn parses_all_fields() {
        let raw = r#"
            program_label = "custom"
            backend_key = "0101010101010101010101010101010101010101010101010101010101010101"
            batch_size = 8
            message_count = 100
            seed = 7
            corrupt_every = 3
            log_filter = "debug"
        "#;
        let c = NodeConfig::from_toml_str(raw).unwrap();
        assert_eq!(c.batch_size, 8);
        assert_eq!(c.corrupt_every, Some(3));
        assert_eq!(c.backend_key().unwrap(), [1u8; 32]);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(NodeConfig::from_toml_str("batch_size = 0").is_err());
        assert!(NodeConfig::from_toml_str("corrupt_every = 0").is_err());
        assert!(NodeConfig::from_toml_str(r#"backend_key = "zz""#).is_err());
        assert!(NodeConfig::from_toml_str(r#"backend_key = "0102""#).is_err());
        assert!(NodeConfig::from_toml_str("unknown_field = 1").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = NodeConfig::load(Path::new("/nonexistent/spymaster.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/spymaster.toml"));
    }
}
