//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (home chain is in the active set,
//!   gas overrides name real operation kinds)
//! - Validate value ranges (timeouts > 0, multiplier sane)
//! - Reject chain ids outside the known-chain table
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: WalletConfig → Result<(), Vec<ValidationError>>
//! - Runs before a config is accepted into the system, including reloads

use std::collections::HashSet;

use alloy::primitives::Address;
use thiserror::Error;
use url::Url;

use crate::config::schema::WalletConfig;
use crate::registry::KnownChain;
use crate::transactions::OperationKind;

/// A single semantic problem in a config file.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("networks: no active networks configured")]
    NoNetworks,

    #[error("networks: chain id {0} is not a known chain")]
    UnknownChain(u64),

    #[error("networks: duplicate chain id {0}")]
    DuplicateChain(u64),

    #[error("networks: chain {chain_id}: invalid rpc_url: {reason}")]
    InvalidRpcUrl { chain_id: u64, reason: String },

    #[error("networks: chain {chain_id}: chain_id_hex {found:?} does not match the id")]
    HexMismatch { chain_id: u64, found: String },

    #[error("networks: home_chain_id {0} is not in the active set")]
    HomeChainInactive(u64),

    #[error("contracts: token_address and marketplace_address must be set together")]
    PartialContractPair,

    #[error("contracts.{field}: {value:?} is not a valid address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("gas.{field} must be greater than zero")]
    ZeroGas { field: &'static str },

    #[error("gas.price_multiplier must be at least 1.0")]
    MultiplierTooLow,

    #[error("gas.budget_overrides: {0:?} is not an operation kind")]
    UnknownOperationKind(String),

    #[error("timeouts.{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("storage.path must not be empty")]
    EmptyStoragePath,
}

/// Validate a normalized configuration. Collects every problem instead
/// of stopping at the first so a reload failure log shows the whole
/// picture.
pub fn validate_config(config: &WalletConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_networks(config, &mut errors);
    validate_contracts(config, &mut errors);
    validate_gas(config, &mut errors);
    validate_timeouts(config, &mut errors);

    if config.storage.path.is_empty() {
        errors.push(ValidationError::EmptyStoragePath);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_networks(config: &WalletConfig, errors: &mut Vec<ValidationError>) {
    let nets = &config.networks.active;
    if nets.is_empty() {
        errors.push(ValidationError::NoNetworks);
        return;
    }

    let mut seen = HashSet::new();
    for net in nets {
        let Some(chain) = KnownChain::from_id(net.chain_id) else {
            errors.push(ValidationError::UnknownChain(net.chain_id));
            continue;
        };

        if !seen.insert(net.chain_id) {
            errors.push(ValidationError::DuplicateChain(net.chain_id));
        }

        match Url::parse(&net.rpc_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError::InvalidRpcUrl {
                chain_id: net.chain_id,
                reason: format!("unsupported scheme {:?}", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidRpcUrl {
                chain_id: net.chain_id,
                reason: e.to_string(),
            }),
        }

        if !net.chain_id_hex.is_empty() && !net.chain_id_hex.eq_ignore_ascii_case(&chain.id_hex())
        {
            errors.push(ValidationError::HexMismatch {
                chain_id: net.chain_id,
                found: net.chain_id_hex.clone(),
            });
        }
    }

    if !seen.is_empty() && !seen.contains(&config.networks.home_chain_id) {
        errors.push(ValidationError::HomeChainInactive(
            config.networks.home_chain_id,
        ));
    }
}

fn validate_contracts(config: &WalletConfig, errors: &mut Vec<ValidationError>) {
    let contracts = &config.contracts;
    let token_set = !contracts.token_address.is_empty();
    let marketplace_set = !contracts.marketplace_address.is_empty();

    if token_set != marketplace_set {
        errors.push(ValidationError::PartialContractPair);
    }

    if token_set && contracts.token_address.parse::<Address>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "token_address",
            value: contracts.token_address.clone(),
        });
    }
    if marketplace_set && contracts.marketplace_address.parse::<Address>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "marketplace_address",
            value: contracts.marketplace_address.clone(),
        });
    }
}

fn validate_gas(config: &WalletConfig, errors: &mut Vec<ValidationError>) {
    let gas = &config.gas;

    if gas.default_budget == 0 {
        errors.push(ValidationError::ZeroGas {
            field: "default_budget",
        });
    }
    if gas.fallback_price_wei == 0 {
        errors.push(ValidationError::ZeroGas {
            field: "fallback_price_wei",
        });
    }
    if gas.price_multiplier < 1.0 {
        errors.push(ValidationError::MultiplierTooLow);
    }

    for (key, budget) in &gas.budget_overrides {
        if OperationKind::from_config_key(key).is_none() {
            errors.push(ValidationError::UnknownOperationKind(key.clone()));
        }
        if *budget == 0 {
            errors.push(ValidationError::ZeroGas {
                field: "budget_overrides",
            });
        }
    }
}

fn validate_timeouts(config: &WalletConfig, errors: &mut Vec<ValidationError>) {
    let t = &config.timeouts;
    for (field, value) in [
        ("rpc_secs", t.rpc_secs),
        ("confirmation_poll_secs", t.confirmation_poll_secs),
        ("confirmation_secs", t.confirmation_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }
}
