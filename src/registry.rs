use crate::config::Config;
use crate::types::parse_address;
use alloy_primitives::{address, Address};
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// Bridge deployment for one destination chain. The bridge contract lives on
/// `source_chain_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainRecord {
    pub source_chain_id: u64,
    pub bridge: Address,
}

pub trait ChainLookup {
    fn lookup(&self, l2_chain_id: u64) -> Option<&ChainRecord>;
}

/// Well-known L1StandardBridge proxies.
pub const PRESETS: &[(u64, ChainRecord)] = &[
    // OP Mainnet
    (
        10,
        ChainRecord {
            source_chain_id: 1,
            bridge: address!("99C9fc46f92E8a1c0deC1b1747d010903E884bE1"),
        },
    ),
    // Base
    (
        8453,
        ChainRecord {
            source_chain_id: 1,
            bridge: address!("3154Cf16ccdb4C6d922629664174b904d80F2C35"),
        },
    ),
    // OP Sepolia
    (
        11155420,
        ChainRecord {
            source_chain_id: 11155111,
            bridge: address!("FBb0621E0B23b5478B630BD55a5f21f67730B0F1"),
        },
    ),
];

#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: BTreeMap<u64, ChainRecord>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_presets() -> Self {
        Self {
            chains: PRESETS.iter().copied().collect(),
        }
    }

    /// Assemble the registry from presets (unless disabled) overlaid with the
    /// `[l2chains]` table of the config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = if config.presets_enabled() {
            Self::with_presets()
        } else {
            Self::new()
        };

        for (key, entry) in config.l2chains.iter().flatten() {
            let l2_chain_id: u64 = key
                .parse()
                .with_context(|| format!("invalid l2chains key {key}: expected a chain id"))?;
            let bridge = parse_address(&entry.l1_standard_bridge)
                .with_context(|| format!("invalid l1StandardBridge for L2 chain {key}"))?;
            registry.insert(
                l2_chain_id,
                ChainRecord {
                    source_chain_id: entry.l1_chain_id,
                    bridge,
                },
            )?;
        }

        tracing::debug!(chains = registry.len(), "chain registry assembled");
        Ok(registry)
    }

    pub fn insert(&mut self, l2_chain_id: u64, record: ChainRecord) -> Result<()> {
        if record.bridge == Address::ZERO {
            anyhow::bail!("L2 chain {l2_chain_id} has a zero bridge address");
        }
        self.chains.insert(l2_chain_id, record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &ChainRecord)> {
        self.chains.iter().map(|(id, record)| (*id, record))
    }
}

impl ChainLookup for ChainRegistry {
    fn lookup(&self, l2_chain_id: u64) -> Option<&ChainRecord> {
        self.chains.get(&l2_chain_id)
    }
}
