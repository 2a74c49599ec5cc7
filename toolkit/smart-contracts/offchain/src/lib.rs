//! Off-chain code deploying the bond issuance protocol to Cardano

/// Primitives used for awaiting for tx being observed on the blockchain
pub mod await_tx;
/// Reading validator templates from a CIP-57 blueprint
pub mod blueprint;
/// Network keyed protocol constants
pub mod config;
/// General purpose code for interacting with cardano-serialization-lib
pub mod csl;
/// Protocol deployment: identity mint, reference scripts and protocol params
pub mod deploy;
#[cfg(test)]
mod ogmios_mock;
/// Utilities for handling Plutus script data
pub mod plutus_script;
#[cfg(test)]
mod test_values;
/// Validators of the protocol built from the blueprint
pub mod validators;
/// Keys and addresses derived from a seed phrase
pub mod wallet;

use bond_issue_domain::AssetId;

/// Errors aborting a deployment.
///
/// Transaction building and chain provider failures are not listed here,
/// they are propagated as they are.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DeployError {
	#[error("Configuration error: {0}")]
	Configuration(String),
	#[error("Blueprint mismatch: {0}")]
	BlueprintMismatch(String),
	#[error("Protocol NFT '{expected}' was not observed in the wallet after minting")]
	ProtocolNftNotObserved { expected: String },
	#[error("Insufficient funds: {0}")]
	InsufficientFunds(String),
}

impl DeployError {
	pub(crate) fn nft_not_observed(asset: &AssetId) -> Self {
		Self::ProtocolNftNotObserved { expected: asset.unit() }
	}
}
