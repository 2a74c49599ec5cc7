//! Process configuration read from environment variables.
use bond_issue_domain::network::Network;
use bond_issue_offchain::{DeployError, await_tx::FixedDelayRetries};
use serde::Deserialize;
use std::{fmt::Debug, path::PathBuf, time::Duration};

fn default_ogmios_url() -> String {
	"http://localhost:1337".to_string()
}
fn default_blueprint_path() -> PathBuf {
	PathBuf::from("plutus.json")
}
fn default_ogmios_requests_timeout_seconds() -> u64 {
	180
}
fn default_retry_delay_seconds() -> u64 {
	5
}
fn default_retry_count() -> usize {
	59
}

/// Deployer settings, each field is read from the upper-cased variable of the same name.
#[derive(Deserialize, Clone, PartialEq)]
pub struct DeployerEnv {
	/// BIP-39 seed phrase of the deploying wallet
	pub seed: String,
	pub network: Network,
	#[serde(default = "default_ogmios_url")]
	pub ogmios_url: String,
	/// Sent in the `dmtr-api-key` header when set
	pub provider_api_key: Option<String>,
	#[serde(default = "default_blueprint_path")]
	pub blueprint_path: PathBuf,
	#[serde(default = "default_ogmios_requests_timeout_seconds")]
	pub ogmios_requests_timeout_seconds: u64,
	/// Delay between checks if a submitted transaction is included in the blockchain
	#[serde(default = "default_retry_delay_seconds")]
	pub retry_delay_seconds: u64,
	#[serde(default = "default_retry_count")]
	pub retry_count: usize,
}

impl Debug for DeployerEnv {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DeployerEnv")
			.field("seed", &"<hidden>")
			.field("network", &self.network)
			.field("ogmios_url", &self.ogmios_url)
			.field("provider_api_key", &self.provider_api_key.as_ref().map(|_| "<hidden>"))
			.field("blueprint_path", &self.blueprint_path)
			.field("ogmios_requests_timeout_seconds", &self.ogmios_requests_timeout_seconds)
			.field("retry_delay_seconds", &self.retry_delay_seconds)
			.field("retry_count", &self.retry_count)
			.finish()
	}
}

impl DeployerEnv {
	pub fn read_from_env() -> Result<Self, DeployError> {
		Self::from_iter(std::env::vars())
	}

	pub fn from_iter(vars: impl Iterator<Item = (String, String)>) -> Result<Self, DeployError> {
		envy::from_iter::<_, Self>(vars).map_err(|e| DeployError::Configuration(e.to_string()))
	}

	pub fn ogmios_requests_timeout(&self) -> Duration {
		Duration::from_secs(self.ogmios_requests_timeout_seconds)
	}

	pub fn retries(&self) -> FixedDelayRetries {
		FixedDelayRetries::new(Duration::from_secs(self.retry_delay_seconds), self.retry_count)
	}
}
