use alloy_primitives::{Address, Bytes, B256, U256};
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

pub fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value.trim()).map_err(|err| anyhow!("invalid address {value}: {err}"))
}

pub fn parse_u256(value: &str) -> Result<U256> {
    U256::from_str(value.trim()).map_err(|err| anyhow!("invalid uint256 {value}: {err}"))
}

pub fn format_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn bytes_from_hex(value: &str) -> Result<Bytes> {
    let trimmed = value.trim();
    let value = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(value).map_err(|err| anyhow!("invalid hex {value}: {err}"))?;
    Ok(Bytes::from(bytes))
}

pub fn b256_to_hex(value: B256) -> String {
    format!("{value:#x}")
}

pub fn address_to_hex(value: Address) -> String {
    format!("{value:#x}")
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositArgsView {
    pub l1_token: String,
    pub l2_token: String,
    pub to: String,
    pub amount: String,
    pub min_gas_limit: u32,
    pub extra_data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositPreview {
    pub l2_chain_id: u64,
    pub chain_id: u64,
    pub to: String,
    pub from: String,
    pub function: String,
    pub selector: String,
    pub args: DepositArgsView,
    pub calldata: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositOutput {
    pub chain_id: u64,
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub status: Option<String>,
    pub gas_used: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct L2ChainView {
    pub l2_chain_id: u64,
    pub l1_chain_id: u64,
    pub l1_standard_bridge: String,
    pub rpc: Option<String>,
}
