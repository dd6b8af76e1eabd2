use crate::abi::depositERC20ToCall;
use crate::error::DepositError;
use crate::types::{bytes_from_hex, parse_address, parse_u256};
use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Deserializer};

/// The destination-side messenger supplies the gas needed to finalize the
/// deposit, so the L1 call passes zero unless the caller asks otherwise.
pub const DEFAULT_MIN_GAS_LIMIT: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositRequest {
    pub l2_chain_id: u64,
    pub l1_token: Address,
    pub l2_token: Address,
    pub to: Address,
    pub amount: U256,
    pub min_gas_limit: Option<u32>,
    pub extra_data: Option<Bytes>,
}

/// Untyped deposit arguments as they arrive from the command line or a JSON
/// request file.
///
/// Numeric fields may be written as JSON numbers or strings; amounts beyond
/// `u64` need the string form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDepositArgs {
    #[serde(default, deserialize_with = "string_or_number")]
    pub l2_chain_id: Option<String>,
    pub l1_token: Option<String>,
    pub l2_token: Option<String>,
    pub to: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub min_gas_limit: Option<String>,
    pub extra_data: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::String(value) => value,
            StringOrNumber::Number(value) => value.to_string(),
        }),
    )
}

impl RawDepositArgs {
    pub fn parse(&self) -> Result<DepositRequest, DepositError> {
        let l2_chain_id = required(&self.l2_chain_id, "l2ChainId")?;
        let l2_chain_id = l2_chain_id
            .trim()
            .parse::<u64>()
            .map_err(|err| DepositError::invalid(format!("l2ChainId {l2_chain_id}: {err}")))?;

        let l1_token = required_address(&self.l1_token, "l1Token")?;
        let l2_token = required_address(&self.l2_token, "l2Token")?;
        let to = required_address(&self.to, "to")?;

        let amount = required(&self.amount, "amount")?;
        let amount = parse_u256(amount)
            .map_err(|err| DepositError::invalid(format!("amount: {err}")))?;

        let min_gas_limit = self
            .min_gas_limit
            .as_deref()
            .map(|value| {
                value.trim().parse::<u32>().map_err(|err| {
                    DepositError::invalid(format!("minGasLimit {value}: {err}"))
                })
            })
            .transpose()?;

        let extra_data = self
            .extra_data
            .as_deref()
            .map(|value| {
                bytes_from_hex(value)
                    .map_err(|err| DepositError::invalid(format!("extraData: {err}")))
            })
            .transpose()?;

        Ok(DepositRequest {
            l2_chain_id,
            l1_token,
            l2_token,
            to,
            amount,
            min_gas_limit,
            extra_data,
        })
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, DepositError> {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(DepositError::invalid(format!("{field} is required"))),
    }
}

fn required_address(value: &Option<String>, field: &str) -> Result<Address, DepositError> {
    let value = required(value, field)?;
    parse_address(value).map_err(|err| DepositError::invalid(format!("{field}: {err}")))
}

/// Build the `depositERC20To` argument list, filling the protocol defaults.
pub fn normalize(request: &DepositRequest) -> depositERC20ToCall {
    depositERC20ToCall {
        _l1Token: request.l1_token,
        _l2Token: request.l2_token,
        _to: request.to,
        _amount: request.amount,
        _minGasLimit: request.min_gas_limit.unwrap_or(DEFAULT_MIN_GAS_LIMIT),
        _extraData: request.extra_data.clone().unwrap_or_default(),
    }
}
