use thiserror::Error;

/// Failures of the deposit pipeline.
///
/// `ChainNotConfigured`, `NoActiveAccount` and `InvalidDepositArguments` are
/// configuration errors the caller fixes in its setup. `SubmissionFailure`
/// carries whatever the execution layer reported, untouched.
#[derive(Debug, Error)]
pub enum DepositError {
    #[error("L2 chain {l2_chain_id} not configured")]
    ChainNotConfigured { l2_chain_id: u64 },

    #[error("no active account to dispatch the deposit from")]
    NoActiveAccount,

    #[error("invalid deposit arguments: {0}")]
    InvalidDepositArguments(String),

    #[error(transparent)]
    SubmissionFailure(anyhow::Error),
}

impl DepositError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidDepositArguments(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::SubmissionFailure(_))
    }
}
