use alloy_primitives::Bytes;
use alloy_sol_types::{Panic, Revert, SolCall, SolError};
use anyhow::{anyhow, Result};

alloy_sol_types::sol! {
    #[derive(Debug, PartialEq, Eq)]
    function depositERC20To(
        address _l1Token,
        address _l2Token,
        address _to,
        uint256 _amount,
        uint32 _minGasLimit,
        bytes _extraData
    );
}

pub fn encode_deposit_erc20_to_call(call: &depositERC20ToCall) -> Bytes {
    Bytes::from(call.abi_encode())
}

pub fn deposit_erc20_to_selector() -> [u8; 4] {
    depositERC20ToCall::SELECTOR
}

/// Pull revert data out of an error message and decode it for display.
///
/// Only `Error(string)` and `Panic(uint256)` are understood; anything else
/// yields `None` and the caller shows the raw error.
pub fn decode_revert_reason(message: &str) -> Option<String> {
    message
        .match_indices("0x")
        .find_map(|(start, _)| decode_revert_data(&message[start..]))
}

fn decode_revert_data(hex_data: &str) -> Option<String> {
    let hex_end = hex_data[2..]
        .find(|c: char| !c.is_ascii_hexdigit())
        .map_or(hex_data.len(), |end| end + 2);
    let data = decode_hex(&hex_data[..hex_end]).ok()?;
    if data.len() < 4 {
        return None;
    }
    if data[..4] == Revert::SELECTOR {
        return Revert::abi_decode(&data).ok().map(|revert| revert.reason);
    }
    if data[..4] == Panic::SELECTOR {
        return Panic::abi_decode(&data)
            .ok()
            .map(|panic| format!("panic({})", panic.code));
    }
    None
}

fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let trimmed = value.trim();
    let raw = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(raw).map_err(|err| anyhow!("invalid hex {value}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, keccak256, U256};

    const DEPOSIT_ERC20_TO_SIGNATURE: &str =
        "depositERC20To(address,address,address,uint256,uint32,bytes)";

    #[test]
    fn selector_matches_bridge_signature() {
        let expected = keccak256(DEPOSIT_ERC20_TO_SIGNATURE.as_bytes());
        assert_eq!(deposit_erc20_to_selector(), expected[..4]);
        assert_eq!(depositERC20ToCall::SIGNATURE, DEPOSIT_ERC20_TO_SIGNATURE);
    }

    #[test]
    fn calldata_starts_with_selector_and_decodes_back() {
        let call = depositERC20ToCall {
            _l1Token: address!("00000000000000000000000000000000000000aa"),
            _l2Token: address!("00000000000000000000000000000000000000bb"),
            _to: address!("00000000000000000000000000000000000000cc"),
            _amount: U256::from(1000u64),
            _minGasLimit: 0,
            _extraData: Bytes::new(),
        };
        let encoded = encode_deposit_erc20_to_call(&call);
        assert_eq!(&encoded[..4], &deposit_erc20_to_selector());
        let decoded = depositERC20ToCall::abi_decode(&encoded).unwrap();
        assert_eq!(decoded, call);
    }

    #[test]
    fn decodes_error_string_revert() {
        let data = Revert {
            reason: "StandardBridge: bridging ETH must include sufficient ETH value".to_string(),
        }
        .abi_encode();
        let message = format!(
            "server returned an error response: execution reverted, data: \"0x{}\"",
            hex::encode(&data)
        );
        assert_eq!(
            decode_revert_reason(&message).as_deref(),
            Some("StandardBridge: bridging ETH must include sufficient ETH value")
        );
    }

    #[test]
    fn decodes_panic_revert() {
        let data = Panic {
            code: U256::from(0x11u64),
        }
        .abi_encode();
        let message = format!("reverted 0x{}", hex::encode(&data));
        assert_eq!(decode_revert_reason(&message).as_deref(), Some("panic(17)"));
    }

    #[test]
    fn unknown_revert_data_is_not_decoded() {
        assert_eq!(decode_revert_reason("nonce too low"), None);
        assert_eq!(decode_revert_reason("data: 0xdeadbeef"), None);
    }

    #[test]
    fn skips_hashes_and_addresses_before_the_revert_data() {
        let data = Revert {
            reason: "ERC20: transfer amount exceeds balance".to_string(),
        }
        .abi_encode();
        let message = format!(
            "tx 0x{} from 0x00000000000000000000000000000000000000aa reverted, data: 0x{}",
            "11".repeat(32),
            hex::encode(&data)
        );
        assert_eq!(
            decode_revert_reason(&message).as_deref(),
            Some("ERC20: transfer amount exceeds balance")
        );
    }
}
