use crate::cli::{RpcAddArgs, RpcListArgs, RpcRemoveArgs};
use crate::config::Config;
use crate::rpc::{redact_url, RpcClient};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RpcListItem {
    alias: String,
    rpc: String,
    chain_id: Option<u64>,
}

/// List configured RPC aliases and the chain each one serves.
pub fn run_list(args: RpcListArgs, config: Config) -> Result<()> {
    let items: Vec<RpcListItem> = config
        .chains
        .iter()
        .flatten()
        .map(|(alias, cfg)| RpcListItem {
            alias: alias.clone(),
            rpc: redact_url(&cfg.rpc),
            chain_id: cfg.chain_id,
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("no rpc endpoints configured");
        return Ok(());
    }

    println!("{:<12} {:<10} {}", "alias", "chainId", "rpc");
    for item in items {
        let chain_id = item
            .chain_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("{:<12} {:<10} {}", item.alias, chain_id, item.rpc);
    }
    Ok(())
}

/// Add an RPC alias, recording the chain id the endpoint reports.
pub async fn run_add(args: RpcAddArgs, mut config: Config) -> Result<()> {
    let client = RpcClient::new(&args.rpc)?;
    let chain_id = client.chain_id().await?;

    config.set_chain(args.alias.clone(), args.rpc.trim().to_string(), chain_id);
    config.save()?;

    println!("added rpc {alias} (chainId {chain_id})", alias = args.alias);
    Ok(())
}

pub fn run_remove(args: RpcRemoveArgs, mut config: Config) -> Result<()> {
    if !config.remove_chain(&args.alias) {
        anyhow::bail!("rpc alias not found: {}", args.alias);
    }
    config.save()?;
    println!("removed rpc {}", args.alias);
    Ok(())
}
