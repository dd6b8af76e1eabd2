use crate::abi::{decode_revert_reason, deposit_erc20_to_selector, depositERC20ToCall};
use crate::cli::DepositArgs;
use crate::config::Config;
use crate::deposit::{DepositRequest, RawDepositArgs};
use crate::dispatch::{build_call, AccountContext, CallOverrides, Depositor, NormalizedCall};
use crate::error::DepositError;
use crate::executor::WalletExecutor;
use crate::registry::ChainRegistry;
use crate::signer::{load_signer, SignerOptions};
use crate::types::{
    address_to_hex, b256_to_hex, format_hex, parse_address, parse_u256, DepositArgsView,
    DepositOutput, DepositPreview,
};
use alloy_primitives::{Address, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub async fn run(args: DepositArgs, config: Config) -> Result<()> {
    let raw = merge_request(&args)?;
    let request = raw.parse()?;
    let overrides = overrides_from_args(&args)?;
    let registry = ChainRegistry::from_config(&config)?;

    let signer = load_signer(
        SignerOptions {
            private_key: args.private_key.as_deref(),
            private_key_env: args.private_key_env.as_deref(),
        },
        &config,
    )?;
    let executor = WalletExecutor::new(signer, config.rpc_urls());

    let from = args.from.as_deref().map(parse_address).transpose()?;
    if args.dry_run {
        let accounts = from.or(executor.active_account());
        let call = build_call(&registry, &accounts, &request)?;
        return print_preview(&request, &call, overrides.value, args.json);
    }
    check_sender(from, executor.active_account())?;

    let depositor = Depositor::new(&registry, &executor, &executor);
    let output = if args.no_wait {
        let handle = depositor
            .deposit_erc20(&request, &overrides)
            .await
            .map_err(explain)?;
        DepositOutput {
            chain_id: handle.chain_id,
            tx_hash: b256_to_hex(handle.tx_hash),
            block_number: None,
            status: None,
            gas_used: None,
        }
    } else {
        let settle = depositor.deposit_erc20_and_await(&request, &overrides);
        let outcome = match args.timeout_ms {
            Some(ms) => tokio::time::timeout(Duration::from_millis(ms), settle)
                .await
                .map_err(|_| anyhow!("timed out after {ms}ms waiting for the deposit receipt"))?,
            None => settle.await,
        }
        .map_err(explain)?;
        DepositOutput {
            chain_id: outcome.chain_id,
            tx_hash: b256_to_hex(outcome.tx_hash),
            block_number: outcome.block_number,
            status: Some(if outcome.success { "success" } else { "reverted" }.to_string()),
            gas_used: Some(outcome.gas_used),
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("chainId: {}", output.chain_id);
    println!("tx hash: {}", output.tx_hash);
    if let Some(status) = output.status.as_deref() {
        println!("status: {status}");
    }
    if let Some(block) = output.block_number {
        println!("block: {block}");
    }
    if let Some(gas_used) = output.gas_used {
        println!("gas used: {gas_used}");
    }
    Ok(())
}

/// A live deposit is always sent from the loaded key; `--from` may only
/// restate it.
fn check_sender(from: Option<Address>, active: Option<Address>) -> Result<()> {
    match (from, active) {
        (Some(from), Some(active)) if from != active => bail!(
            "--from {} does not match the signer account {}",
            address_to_hex(from),
            address_to_hex(active)
        ),
        (Some(from), None) => bail!(
            "--from {} given but no signer is loaded (pass --private-key or --private-key-env)",
            address_to_hex(from)
        ),
        _ => Ok(()),
    }
}

/// Flags win over fields from `--request`.
fn merge_request(args: &DepositArgs) -> Result<RawDepositArgs> {
    let base = match args.request.as_deref() {
        Some(path) => load_request(path)?,
        None => RawDepositArgs::default(),
    };
    Ok(RawDepositArgs {
        l2_chain_id: args.l2_chain.clone().or(base.l2_chain_id),
        l1_token: args.l1_token.clone().or(base.l1_token),
        l2_token: args.l2_token.clone().or(base.l2_token),
        to: args.to.clone().or(base.to),
        amount: args.amount.clone().or(base.amount),
        min_gas_limit: args.min_gas_limit.clone().or(base.min_gas_limit),
        extra_data: args.extra_data.clone().or(base.extra_data),
    })
}

fn load_request(path: &Path) -> Result<RawDepositArgs> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read request {}", path.display()))?;
    serde_json::from_str(&contents).map_err(|err| {
        DepositError::invalid(format!("request {}: {err}", path.display())).into()
    })
}

/// Overrides from `--overrides` (a transaction request JSON), then flags on top.
/// Only the overridable fields of the file are used.
fn overrides_from_args(args: &DepositArgs) -> Result<CallOverrides> {
    let base = match args.overrides.as_deref() {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read overrides {}", path.display()))?;
            let request: TransactionRequest = serde_json::from_str(&contents)
                .with_context(|| format!("invalid overrides {}", path.display()))?;
            CallOverrides::from_request(&request)
        }
        None => CallOverrides::default(),
    };
    let value = args.value.as_deref().map(parse_u256).transpose()?;
    Ok(CallOverrides {
        value: value.or(base.value),
        gas: args.gas_limit.or(base.gas),
        gas_price: args.gas_price.or(base.gas_price),
        max_fee_per_gas: args.max_fee_per_gas.or(base.max_fee_per_gas),
        max_priority_fee_per_gas: args
            .max_priority_fee_per_gas
            .or(base.max_priority_fee_per_gas),
        nonce: args.nonce.or(base.nonce),
    })
}

/// Attach a decoded revert reason to submission failures when one is present.
fn explain(err: DepositError) -> anyhow::Error {
    if err.is_configuration() {
        tracing::warn!("deposit rejected before submission");
    }
    let reason = match &err {
        DepositError::SubmissionFailure(inner) => decode_revert_reason(&format!("{inner:#}")),
        _ => None,
    };
    match reason {
        Some(reason) => {
            let head = err.to_string();
            anyhow::Error::from(err).context(format!("{head} (revert reason: {reason})"))
        }
        None => err.into(),
    }
}

fn preview(request: &DepositRequest, call: &NormalizedCall, value: Option<U256>) -> DepositPreview {
    let args = &call.call;
    DepositPreview {
        l2_chain_id: request.l2_chain_id,
        chain_id: call.chain_id,
        to: address_to_hex(call.to),
        from: address_to_hex(call.from),
        function: depositERC20ToCall::SIGNATURE.to_string(),
        selector: format_hex(&deposit_erc20_to_selector()),
        args: DepositArgsView {
            l1_token: address_to_hex(args._l1Token),
            l2_token: address_to_hex(args._l2Token),
            to: address_to_hex(args._to),
            amount: args._amount.to_string(),
            min_gas_limit: args._minGasLimit,
            extra_data: format_hex(&args._extraData),
        },
        calldata: format_hex(&call.calldata()),
        value: value.map(|value| value.to_string()),
    }
}

fn print_preview(
    request: &DepositRequest,
    call: &NormalizedCall,
    value: Option<U256>,
    json: bool,
) -> Result<()> {
    let output = preview(request, call, value);
    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("dry-run: deposit to L2 chain {}", output.l2_chain_id);
    println!("chainId: {}", output.chain_id);
    println!("bridge: {}", output.to);
    println!("from: {}", output.from);
    println!("function: {} ({})", output.function, output.selector);
    println!("  l1Token: {}", output.args.l1_token);
    println!("  l2Token: {}", output.args.l2_token);
    println!("  to: {}", output.args.to);
    println!("  amount: {}", output.args.amount);
    println!("  minGasLimit: {}", output.args.min_gas_limit);
    println!("  extraData: {}", output.args.extra_data);
    if let Some(value) = output.value.as_deref() {
        println!("value: {value}");
    }
    println!("calldata: {}", output.calldata);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ChainRecord;
    use alloy_primitives::address;
    use alloy_sol_types::SolError;

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ACCOUNT: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

    fn args() -> DepositArgs {
        DepositArgs {
            l2_chain: Some("10".to_string()),
            l1_token: Some("0x000000000000000000000000000000000000000a".to_string()),
            l2_token: Some("0x000000000000000000000000000000000000000b".to_string()),
            to: Some("0x000000000000000000000000000000000000000c".to_string()),
            amount: Some("1000".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn flags_take_precedence_over_request_file() {
        let path = std::env::temp_dir()
            .join(format!("op-deposit-request-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{"l2ChainId": "8453", "amount": "1", "extraData": "0x01"}"#,
        )
        .unwrap();

        let mut args = args();
        args.l2_chain = None;
        args.request = Some(path.clone());
        let raw = merge_request(&args).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(raw.l2_chain_id.as_deref(), Some("8453"));
        assert_eq!(raw.amount.as_deref(), Some("1000"));
        assert_eq!(raw.extra_data.as_deref(), Some("0x01"));
    }

    #[test]
    fn malformed_request_file_is_invalid_arguments() {
        let path =
            std::env::temp_dir().join(format!("op-deposit-bad-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = load_request(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(
            err.downcast_ref::<DepositError>(),
            Some(DepositError::InvalidDepositArguments(_))
        ));
    }

    #[test]
    fn overrides_come_from_transaction_flags() {
        let mut args = args();
        args.value = Some("5".to_string());
        args.gas_limit = Some(250_000);
        args.nonce = Some(3);
        let overrides = overrides_from_args(&args).unwrap();
        assert_eq!(overrides.value, Some(U256::from(5u64)));
        assert_eq!(overrides.gas, Some(250_000));
        assert_eq!(overrides.nonce, Some(3));
        assert_eq!(overrides.max_fee_per_gas, None);
    }

    #[test]
    fn overrides_file_cannot_carry_target_fields() {
        let path = std::env::temp_dir()
            .join(format!("op-deposit-overrides-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{
                "to": "0x00000000000000000000000000000000000000ff",
                "chainId": "0xa",
                "input": "0xdeadbeef",
                "value": "0x7",
                "gas": "0x493e0",
                "nonce": "0x2"
            }"#,
        )
        .unwrap();

        let mut args = args();
        args.overrides = Some(path.clone());
        args.nonce = Some(9);
        let overrides = overrides_from_args(&args).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(
            overrides,
            CallOverrides {
                value: Some(U256::from(7u64)),
                gas: Some(300_000),
                nonce: Some(9),
                ..Default::default()
            }
        );
    }

    #[test]
    fn preview_shows_source_chain_and_defaults() {
        let mut registry = ChainRegistry::new();
        registry
            .insert(
                10,
                ChainRecord {
                    source_chain_id: 1,
                    bridge: address!("00000000000000000000000000000000000b71d6"),
                },
            )
            .unwrap();
        let request = merge_request(&args()).unwrap().parse().unwrap();
        let accounts: Option<Address> = Some(address!("0000000000000000000000000000000000000acc"));
        let call = build_call(&registry, &accounts, &request).unwrap();

        let view = preview(&request, &call, None);
        assert_eq!(view.l2_chain_id, 10);
        assert_eq!(view.chain_id, 1);
        assert_eq!(view.to, "0x00000000000000000000000000000000000b71d6");
        assert_eq!(view.from, "0x0000000000000000000000000000000000000acc");
        assert_eq!(view.args.min_gas_limit, 0);
        assert_eq!(view.args.extra_data, "0x");
        assert!(view.calldata.starts_with(&view.selector));
        assert_eq!(view.function, "depositERC20To(address,address,address,uint256,uint32,bytes)");
    }

    #[test]
    fn submission_errors_keep_their_message() {
        let err = explain(DepositError::SubmissionFailure(anyhow!("nonce too low")));
        assert_eq!(err.to_string(), "nonce too low");

        let err = explain(DepositError::NoActiveAccount);
        assert!(matches!(
            err.downcast_ref::<DepositError>(),
            Some(DepositError::NoActiveAccount)
        ));
    }

    #[test]
    fn decoded_revert_reason_follows_the_provider_message() {
        let data = alloy_sol_types::Revert {
            reason: "ERC20: insufficient allowance".to_string(),
        }
        .abi_encode();
        let message = format!("execution reverted, data: {}", format_hex(&data));
        let err = explain(DepositError::SubmissionFailure(anyhow!(message.clone())));

        let shown = err.to_string();
        assert!(shown.starts_with(&message));
        assert!(shown.ends_with("(revert reason: ERC20: insufficient allowance)"));
        assert!(matches!(
            err.downcast_ref::<DepositError>(),
            Some(DepositError::SubmissionFailure(_))
        ));
    }

    #[test]
    fn sender_flag_must_match_the_signer() {
        let other = address!("0000000000000000000000000000000000000acc");
        assert!(check_sender(None, Some(DEV_ACCOUNT)).is_ok());
        assert!(check_sender(None, None).is_ok());
        assert!(check_sender(Some(DEV_ACCOUNT), Some(DEV_ACCOUNT)).is_ok());

        let err = check_sender(Some(other), Some(DEV_ACCOUNT)).unwrap_err();
        assert!(err.to_string().contains("does not match the signer account"));
        let err = check_sender(Some(other), None).unwrap_err();
        assert!(err.to_string().contains("no signer is loaded"));
    }

    #[tokio::test]
    async fn live_deposit_refuses_a_conflicting_sender() {
        let mut args = args();
        args.from = Some("0x0000000000000000000000000000000000000acc".to_string());
        args.private_key = Some(DEV_KEY.to_string());

        let err = run(args, Config::default()).await.unwrap_err();
        let message = err.to_string();
        assert!(
            message.contains("does not match the signer account"),
            "unexpected error: {message}"
        );
        assert!(!message.contains("no rpc configured"));
    }
}
