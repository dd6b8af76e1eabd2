use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct Config {
    pub chains: Option<BTreeMap<String, ChainConfig>>,
    pub l2chains: Option<BTreeMap<String, L2ChainConfig>>,
    pub registry: Option<RegistryConfig>,
    pub signer: Option<SignerConfig>,
    #[serde(skip)]
    pub path: PathBuf,
}

/// An RPC endpoint under an alias.
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ChainConfig {
    pub rpc: String,
    #[serde(rename = "chainId")]
    pub chain_id: Option<u64>,
}

/// Bridge deployment for an L2, keyed by the L2 chain id in `[l2chains]`.
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct L2ChainConfig {
    #[serde(rename = "l1ChainId")]
    pub l1_chain_id: u64,
    #[serde(rename = "l1StandardBridge")]
    pub l1_standard_bridge: String,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct RegistryConfig {
    pub presets: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct SignerConfig {
    pub private_key_env: Option<String>,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "config not found, using defaults");
            return Ok(Self {
                path,
                ..Self::default()
            });
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.path = path;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = if self.path.as_os_str().is_empty() {
            default_config_path()
        } else {
            self.path.clone()
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(&self)?;
        fs::write(&path, contents)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        Ok(())
    }

    pub fn signer_env(&self) -> String {
        self.signer
            .as_ref()
            .and_then(|cfg| cfg.private_key_env.clone())
            .unwrap_or_else(|| "PRIVATE_KEY".to_string())
    }

    pub fn presets_enabled(&self) -> bool {
        self.registry
            .as_ref()
            .and_then(|cfg| cfg.presets)
            .unwrap_or(true)
    }

    pub fn set_chain(&mut self, alias: String, rpc: String, chain_id: u64) {
        let chains = self.chains.get_or_insert_with(BTreeMap::new);
        chains.insert(
            alias,
            ChainConfig {
                rpc,
                chain_id: Some(chain_id),
            },
        );
    }

    pub fn remove_chain(&mut self, alias: &str) -> bool {
        self.chains
            .as_mut()
            .and_then(|chains| chains.remove(alias))
            .is_some()
    }

    pub fn set_l2_chain(&mut self, l2_chain_id: u64, l1_chain_id: u64, bridge: String) {
        let chains = self.l2chains.get_or_insert_with(BTreeMap::new);
        chains.insert(
            l2_chain_id.to_string(),
            L2ChainConfig {
                l1_chain_id,
                l1_standard_bridge: bridge,
            },
        );
    }

    pub fn remove_l2_chain(&mut self, l2_chain_id: u64) -> bool {
        self.l2chains
            .as_mut()
            .and_then(|chains| chains.remove(&l2_chain_id.to_string()))
            .is_some()
    }

    /// RPC URLs keyed by chain id. Aliases without a recorded chain id are
    /// skipped; the first alias (by name) wins when two share a chain id.
    pub fn rpc_urls(&self) -> BTreeMap<u64, String> {
        let mut urls = BTreeMap::new();
        for cfg in self.chains.iter().flat_map(|chains| chains.values()) {
            if let Some(chain_id) = cfg.chain_id {
                urls.entry(chain_id).or_insert_with(|| cfg.rpc.clone());
            }
        }
        urls
    }
}

fn default_config_path() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        return dir.join("op-deposit").join("config.toml");
    }
    PathBuf::from("./config.toml")
}
