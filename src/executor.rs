use crate::dispatch::{
    AccountContext, CallOverrides, Executor, NormalizedCall, SettledOutcome, SubmissionHandle,
};
use crate::rpc::redact_url;
use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// Signs with a local private key and submits over the RPC configured for the
/// call's chain. Nonce, gas and fees are filled by the provider unless the
/// caller overrides them.
///
/// The loaded key, if any, is also the active account.
pub struct WalletExecutor {
    signer: Option<PrivateKeySigner>,
    rpc_urls: BTreeMap<u64, String>,
}

impl WalletExecutor {
    pub fn new(signer: Option<PrivateKeySigner>, rpc_urls: BTreeMap<u64, String>) -> Self {
        Self { signer, rpc_urls }
    }

    fn signer_for(&self, call: &NormalizedCall) -> Result<&PrivateKeySigner> {
        let signer = self.signer.as_ref().context("no signer loaded")?;
        if call.from != signer.address() {
            anyhow::bail!(
                "call is bound to account {:#x} but the signer is {:#x}",
                call.from,
                signer.address()
            );
        }
        Ok(signer)
    }

    fn rpc_for(&self, call: &NormalizedCall) -> Result<&str> {
        self.rpc_urls
            .get(&call.chain_id)
            .map(String::as_str)
            .with_context(|| {
                format!(
                    "no rpc configured for chain {} (add one with `op-deposit rpc add`)",
                    call.chain_id
                )
            })
    }

    async fn connect(&self, call: &NormalizedCall) -> Result<impl Provider> {
        let signer = self.signer_for(call)?;
        let url = self.rpc_for(call)?;
        let provider = ProviderBuilder::new()
            .wallet(signer.clone().with_chain_id(Some(call.chain_id)))
            .connect(url)
            .await
            .with_context(|| format!("failed to connect to {}", redact_url(url)))?;

        let served = provider.get_chain_id().await?;
        if served != call.chain_id {
            anyhow::bail!(
                "rpc {} serves chain {served}, deposit must be sent on chain {}",
                redact_url(url),
                call.chain_id
            );
        }
        Ok(provider)
    }
}

impl AccountContext for WalletExecutor {
    fn active_account(&self) -> Option<Address> {
        self.signer.as_ref().map(|signer| signer.address())
    }
}

impl Executor for WalletExecutor {
    async fn submit(
        &self,
        call: &NormalizedCall,
        overrides: &CallOverrides,
    ) -> Result<SubmissionHandle> {
        let provider = self.connect(call).await?;
        let pending = provider
            .send_transaction(call.to_transaction_request(overrides))
            .await?;
        let tx_hash = *pending.tx_hash();
        tracing::info!(tx_hash = %tx_hash, chain_id = call.chain_id, "deposit submitted");
        Ok(SubmissionHandle {
            chain_id: call.chain_id,
            tx_hash,
        })
    }

    async fn submit_and_await(
        &self,
        call: &NormalizedCall,
        overrides: &CallOverrides,
    ) -> Result<SettledOutcome> {
        let provider = self.connect(call).await?;
        let pending = provider
            .send_transaction(call.to_transaction_request(overrides))
            .await?;
        tracing::info!(
            tx_hash = %pending.tx_hash(),
            chain_id = call.chain_id,
            "deposit submitted, waiting for receipt"
        );
        let receipt = pending.get_receipt().await?;
        tracing::info!(
            tx_hash = %receipt.transaction_hash,
            block = ?receipt.block_number,
            success = receipt.status(),
            "deposit settled"
        );
        Ok(SettledOutcome {
            chain_id: call.chain_id,
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
            gas_used: receipt.gas_used,
        })
    }
}
