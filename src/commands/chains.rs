use crate::cli::{ChainsAddArgs, ChainsListArgs, ChainsRemoveArgs};
use crate::config::Config;
use crate::registry::{ChainRecord, ChainRegistry};
use crate::rpc::redact_url;
use crate::types::{address_to_hex, parse_address, L2ChainView};
use anyhow::{Context, Result};

/// List the L2 chains deposits can be sent to, with the L1 RPC that would
/// carry them.
pub fn run_list(args: ChainsListArgs, config: Config) -> Result<()> {
    let items = chain_views(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("no chains configured");
        return Ok(());
    }

    println!("{:<10} {:<10} {:<44} {}", "l2ChainId", "l1ChainId", "bridge", "l1 rpc");
    for item in items {
        let rpc = item.rpc.unwrap_or_else(|| "none".to_string());
        println!(
            "{:<10} {:<10} {:<44} {}",
            item.l2_chain_id, item.l1_chain_id, item.l1_standard_bridge, rpc
        );
    }
    Ok(())
}

/// Register (or replace) the bridge deployment for an L2 chain.
pub fn run_add(args: ChainsAddArgs, mut config: Config) -> Result<()> {
    let bridge = parse_address(&args.bridge)?;
    ChainRegistry::new()
        .insert(
            args.l2_chain_id,
            ChainRecord {
                source_chain_id: args.l1_chain_id,
                bridge,
            },
        )
        .context("refusing to store bridge")?;

    config.set_l2_chain(args.l2_chain_id, args.l1_chain_id, address_to_hex(bridge));
    config.save()?;

    println!(
        "added L2 chain {} (bridge {} on chain {})",
        args.l2_chain_id,
        address_to_hex(bridge),
        args.l1_chain_id
    );
    Ok(())
}

/// Remove an L2 chain entry from the configuration file. Built-in presets
/// stay available unless `registry.presets = false`.
pub fn run_remove(args: ChainsRemoveArgs, mut config: Config) -> Result<()> {
    if !config.remove_l2_chain(args.l2_chain_id) {
        anyhow::bail!("L2 chain not found in config: {}", args.l2_chain_id);
    }
    config.save()?;
    println!("removed L2 chain {}", args.l2_chain_id);
    Ok(())
}

fn chain_views(config: &Config) -> Result<Vec<L2ChainView>> {
    let registry = ChainRegistry::from_config(config)?;
    let rpc_urls = config.rpc_urls();
    Ok(registry
        .iter()
        .map(|(l2_chain_id, record)| L2ChainView {
            l2_chain_id,
            l1_chain_id: record.source_chain_id,
            l1_standard_bridge: address_to_hex(record.bridge),
            rpc: rpc_urls
                .get(&record.source_chain_id)
                .map(|url| redact_url(url)),
        })
        .collect())
}
