use crate::commands;
use crate::config::Config;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "op-deposit",
    version,
    about = "Deposit ERC20 tokens to an L2 through the L1 standard bridge"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub async fn run(self, config: Config) -> Result<()> {
        match self.command {
            Command::Deposit(args) => commands::deposit::run(args, config).await,
            Command::Chains(cmd) => cmd.run(config).await,
            Command::Rpc(cmd) => cmd.run(config).await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deposit an ERC20 token to an L2 recipient.
    Deposit(DepositArgs),
    /// Manage the L2 bridge registry.
    Chains(ChainsCommand),
    /// Manage RPC endpoints used to submit on L1.
    Rpc(RpcCommand),
}

#[derive(Parser, Debug)]
pub struct ChainsCommand {
    #[command(subcommand)]
    pub command: ChainsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ChainsSubcommand {
    List(ChainsListArgs),
    Add(ChainsAddArgs),
    Remove(ChainsRemoveArgs),
}

impl ChainsCommand {
    pub async fn run(self, config: Config) -> Result<()> {
        match self.command {
            ChainsSubcommand::List(args) => commands::chains::run_list(args, config),
            ChainsSubcommand::Add(args) => commands::chains::run_add(args, config),
            ChainsSubcommand::Remove(args) => commands::chains::run_remove(args, config),
        }
    }
}

#[derive(Parser, Debug)]
pub struct RpcCommand {
    #[command(subcommand)]
    pub command: RpcSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RpcSubcommand {
    List(RpcListArgs),
    Add(RpcAddArgs),
    Remove(RpcRemoveArgs),
}

impl RpcCommand {
    pub async fn run(self, config: Config) -> Result<()> {
        match self.command {
            RpcSubcommand::List(args) => commands::rpc::run_list(args, config),
            RpcSubcommand::Add(args) => commands::rpc::run_add(args, config).await,
            RpcSubcommand::Remove(args) => commands::rpc::run_remove(args, config),
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct DepositArgs {
    /// Destination L2 chain id.
    #[arg(long)]
    pub l2_chain: Option<String>,

    /// Token address on L1.
    #[arg(long)]
    pub l1_token: Option<String>,

    /// Token address on L2.
    #[arg(long)]
    pub l2_token: Option<String>,

    /// Recipient on L2.
    #[arg(long)]
    pub to: Option<String>,

    /// Amount in the token's smallest unit.
    #[arg(long)]
    pub amount: Option<String>,

    #[arg(long)]
    pub min_gas_limit: Option<String>,

    #[arg(long)]
    pub extra_data: Option<String>,

    /// JSON file with the deposit fields; flags take precedence.
    #[arg(long)]
    pub request: Option<PathBuf>,

    /// Transaction request JSON to take overrides from; only value, gas, fee
    /// and nonce fields are used.
    #[arg(long)]
    pub overrides: Option<PathBuf>,

    /// ETH value (wei) attached to the transaction.
    #[arg(long)]
    pub value: Option<String>,

    #[arg(long)]
    pub gas_limit: Option<u64>,

    #[arg(long)]
    pub gas_price: Option<u128>,

    #[arg(long)]
    pub max_fee_per_gas: Option<u128>,

    #[arg(long)]
    pub max_priority_fee_per_gas: Option<u128>,

    #[arg(long)]
    pub nonce: Option<u64>,

    /// Return once the transaction is accepted instead of waiting for a receipt.
    #[arg(long)]
    pub no_wait: bool,

    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Print the resolved call without sending it.
    #[arg(long)]
    pub dry_run: bool,

    /// Account to preview the call for when no signer is loaded.
    #[arg(long)]
    pub from: Option<String>,

    #[arg(long)]
    pub json: bool,

    #[arg(long)]
    pub private_key: Option<String>,

    #[arg(long)]
    pub private_key_env: Option<String>,
}

#[derive(Args, Debug)]
pub struct ChainsListArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ChainsAddArgs {
    pub l2_chain_id: u64,

    #[arg(long)]
    pub l1_chain_id: u64,

    #[arg(long)]
    pub bridge: String,
}

#[derive(Args, Debug)]
pub struct ChainsRemoveArgs {
    pub l2_chain_id: u64,
}

#[derive(Args, Debug)]
pub struct RpcListArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RpcAddArgs {
    pub alias: String,

    pub rpc: String,
}

#[derive(Args, Debug)]
pub struct RpcRemoveArgs {
    pub alias: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deposit_flags() {
        let cli = Cli::try_parse_from([
            "op-deposit",
            "deposit",
            "--l2-chain",
            "10",
            "--l1-token",
            "0x000000000000000000000000000000000000000a",
            "--amount",
            "1000",
            "--value",
            "5",
            "--no-wait",
        ])
        .unwrap();
        match cli.command {
            Command::Deposit(args) => {
                assert_eq!(args.l2_chain.as_deref(), Some("10"));
                assert_eq!(args.amount.as_deref(), Some("1000"));
                assert_eq!(args.value.as_deref(), Some("5"));
                assert!(args.no_wait);
                assert!(!args.dry_run);
                assert!(args.to.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_chains_add() {
        let cli = Cli::try_parse_from([
            "op-deposit",
            "--config-path",
            "/tmp/op.toml",
            "chains",
            "add",
            "901",
            "--l1-chain-id",
            "900",
            "--bridge",
            "0x00000000000000000000000000000000000000b2",
        ])
        .unwrap();
        assert_eq!(cli.config_path, Some(PathBuf::from("/tmp/op.toml")));
        match cli.command {
            Command::Chains(ChainsCommand {
                command: ChainsSubcommand::Add(args),
            }) => {
                assert_eq!(args.l2_chain_id, 901);
                assert_eq!(args.l1_chain_id, 900);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
