use crate::config::Config;
use alloy_signer_local::PrivateKeySigner;
use anyhow::{anyhow, Result};

pub struct SignerOptions<'a> {
    pub private_key: Option<&'a str>,
    pub private_key_env: Option<&'a str>,
}

/// Load the signing key from `--private-key`, or from the environment variable
/// named by `--private-key-env` / the config (`PRIVATE_KEY` by default).
pub fn load_signer(options: SignerOptions<'_>, config: &Config) -> Result<Option<PrivateKeySigner>> {
    if options.private_key.is_some() && options.private_key_env.is_some() {
        anyhow::bail!("cannot set both --private-key and --private-key-env");
    }

    if let Some(key) = options.private_key {
        return Ok(Some(load_wallet(key)?));
    }

    let env = options
        .private_key_env
        .map(|value| value.to_string())
        .unwrap_or_else(|| config.signer_env());
    match std::env::var(&env) {
        Ok(key) => {
            tracing::debug!(env = %env, "loaded signer from environment");
            Ok(Some(load_wallet(&key)?))
        }
        Err(_) => Ok(None),
    }
}

fn load_wallet(key: &str) -> Result<PrivateKeySigner> {
    key.trim()
        .parse()
        .map_err(|err| anyhow!("invalid private key: {err}"))
}
