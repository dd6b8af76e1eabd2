use crate::abi::{depositERC20ToCall, encode_deposit_erc20_to_call};
use crate::deposit::{normalize, DepositRequest};
use crate::error::DepositError;
use crate::registry::ChainLookup;
use alloy_primitives::{Address, Bytes, TxKind, B256, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use anyhow::Result;

/// A `depositERC20To` call bound to its chain, bridge and sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCall {
    /// Chain the bridge contract lives on, not the deposit destination.
    pub chain_id: u64,
    pub to: Address,
    pub call: depositERC20ToCall,
    pub from: Address,
}

impl NormalizedCall {
    pub fn calldata(&self) -> Bytes {
        encode_deposit_erc20_to_call(&self.call)
    }

    /// Resolved fields first, then whichever overrides are set.
    pub fn to_transaction_request(&self, overrides: &CallOverrides) -> TransactionRequest {
        let mut request = TransactionRequest {
            from: Some(self.from),
            to: Some(TxKind::Call(self.to)),
            input: TransactionInput::new(self.calldata()),
            chain_id: Some(self.chain_id),
            ..Default::default()
        };
        overrides.apply(&mut request);
        request
    }
}

/// Transaction fields a caller may set on a deposit. Chain, target, calldata
/// and sender are not among them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOverrides {
    pub value: Option<U256>,
    pub gas: Option<u64>,
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub nonce: Option<u64>,
}

impl CallOverrides {
    /// Take the overridable fields out of an arbitrary request; everything
    /// else in it is ignored.
    pub fn from_request(request: &TransactionRequest) -> Self {
        Self {
            value: request.value,
            gas: request.gas,
            gas_price: request.gas_price,
            max_fee_per_gas: request.max_fee_per_gas,
            max_priority_fee_per_gas: request.max_priority_fee_per_gas,
            nonce: request.nonce,
        }
    }

    fn apply(&self, request: &mut TransactionRequest) {
        if let Some(value) = self.value {
            request.value = Some(value);
        }
        if let Some(gas) = self.gas {
            request.gas = Some(gas);
        }
        if let Some(gas_price) = self.gas_price {
            request.gas_price = Some(gas_price);
        }
        if let Some(max_fee) = self.max_fee_per_gas {
            request.max_fee_per_gas = Some(max_fee);
        }
        if let Some(priority_fee) = self.max_priority_fee_per_gas {
            request.max_priority_fee_per_gas = Some(priority_fee);
        }
        if let Some(nonce) = self.nonce {
            request.nonce = Some(nonce);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionHandle {
    pub chain_id: u64,
    pub tx_hash: B256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettledOutcome {
    pub chain_id: u64,
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub success: bool,
    pub gas_used: u64,
}

pub trait AccountContext {
    fn active_account(&self) -> Option<Address>;
}

impl AccountContext for Option<Address> {
    fn active_account(&self) -> Option<Address> {
        *self
    }
}

/// Signs and submits calls. Errors are passed through to the caller as
/// [`DepositError::SubmissionFailure`] without interpretation.
#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn submit(
        &self,
        call: &NormalizedCall,
        overrides: &CallOverrides,
    ) -> Result<SubmissionHandle>;

    async fn submit_and_await(
        &self,
        call: &NormalizedCall,
        overrides: &CallOverrides,
    ) -> Result<SettledOutcome>;
}

pub struct Depositor<'a, R, A, E> {
    registry: &'a R,
    accounts: &'a A,
    executor: &'a E,
}

impl<'a, R, A, E> Depositor<'a, R, A, E>
where
    R: ChainLookup,
    A: AccountContext,
    E: Executor,
{
    pub fn new(registry: &'a R, accounts: &'a A, executor: &'a E) -> Self {
        Self {
            registry,
            accounts,
            executor,
        }
    }

    /// Hand the deposit to the executor and return as soon as it is accepted.
    pub async fn deposit_erc20(
        &self,
        request: &DepositRequest,
        overrides: &CallOverrides,
    ) -> Result<SubmissionHandle, DepositError> {
        let call = self.build_call(request)?;
        tracing::info!(
            chain_id = call.chain_id,
            bridge = %call.to,
            from = %call.from,
            "submitting deposit"
        );
        self.executor
            .submit(&call, overrides)
            .await
            .map_err(DepositError::SubmissionFailure)
    }

    /// Hand the deposit to the executor and wait for it to settle.
    pub async fn deposit_erc20_and_await(
        &self,
        request: &DepositRequest,
        overrides: &CallOverrides,
    ) -> Result<SettledOutcome, DepositError> {
        let call = self.build_call(request)?;
        tracing::info!(
            chain_id = call.chain_id,
            bridge = %call.to,
            from = %call.from,
            "submitting deposit and awaiting receipt"
        );
        self.executor
            .submit_and_await(&call, overrides)
            .await
            .map_err(DepositError::SubmissionFailure)
    }

    fn build_call(&self, request: &DepositRequest) -> Result<NormalizedCall, DepositError> {
        build_call(self.registry, self.accounts, request)
    }
}

/// Resolve the bridge for the request's destination chain, normalize the
/// arguments and bind the call to the active account.
pub fn build_call<R, A>(
    registry: &R,
    accounts: &A,
    request: &DepositRequest,
) -> Result<NormalizedCall, DepositError>
where
    R: ChainLookup,
    A: AccountContext,
{
    let record = registry
        .lookup(request.l2_chain_id)
        .ok_or(DepositError::ChainNotConfigured {
            l2_chain_id: request.l2_chain_id,
        })?;
    let from = accounts
        .active_account()
        .ok_or(DepositError::NoActiveAccount)?;

    tracing::debug!(
        l2_chain_id = request.l2_chain_id,
        l1_chain_id = record.source_chain_id,
        bridge = %record.bridge,
        "resolved bridge deployment"
    );

    Ok(NormalizedCall {
        chain_id: record.source_chain_id,
        to: record.bridge,
        call: normalize(request),
        from,
    })
}
