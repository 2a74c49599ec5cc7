//! Protocol constants of each supported network.
//!
//! All values are hand authored, the only input is the [Network] tag.
use bond_issue_domain::{KeyHash, network::Network};
use bond_issue_plutus_data::{
	bond_config::{BasisConfig, BondIssueConfig, EpochConfig, PlatformConfig, SlotConfig},
	credentials::{Address, StakeCredential},
};
use hex_literal::hex;

/// Number of `EPOCH_LENGTH_BASE` long epochs in a year
pub const YEAR_TO_EPOCH: u64 = 73;
/// Mainnet epoch length in milliseconds
pub const EPOCH_LENGTH_BASE: u64 = 432_000_000;

pub const BASIS_POINTS: BasisConfig = BasisConfig { base: 10_000, min: 1, max: 9_999 };

const TESTNET_FEE_PAYMENT_KEY: KeyHash =
	KeyHash(hex!("b31ed465ff9ae7b02981ee5ae915977dbc55897dbccb7ea39ebd3a0b"));
const TESTNET_STAKE_KEY: KeyHash =
	KeyHash(hex!("5353caa2dd476a96de54bfc5afa93820d929c5a1912d4aa839d1f958"));
const MAINNET_FEE_PAYMENT_KEY: KeyHash =
	KeyHash(hex!("b09621db282300534cc870b75341ce8303cc294fdb2a43b492a8c238"));
const MAINNET_STAKE_KEY: KeyHash =
	KeyHash(hex!("6e577a10b4453cfb78be3023db8884f1356f973282a62b502a090200"));

pub fn slot_config(network: Network) -> SlotConfig {
	match network {
		Network::Mainnet => {
			SlotConfig { zero_time: 1_596_059_091_000, zero_slot: 4_492_800, slot_length: 1000 }
		},
		Network::Preprod => {
			SlotConfig { zero_time: 1_655_769_600_000, zero_slot: 86_400, slot_length: 1000 }
		},
		Network::Preview | Network::Custom => {
			SlotConfig { zero_time: 1_666_656_000_000, zero_slot: 0, slot_length: 1000 }
		},
	}
}

pub fn epoch_config(network: Network) -> EpochConfig {
	let (epoch_boundary, epoch_boundary_as_epoch, epoch_length) = match network {
		Network::Mainnet => (1_596_059_091_000, 208, 432_000_000),
		Network::Preprod => (1_655_769_600_000, 4, 432_000_000),
		Network::Preview | Network::Custom => (1_666_656_000_000, 0, 86_400_000),
	};
	EpochConfig {
		year_to_epoch: YEAR_TO_EPOCH,
		epoch_boundary,
		epoch_boundary_as_epoch,
		epoch_length,
		epoch_length_base: EPOCH_LENGTH_BASE,
	}
}

/// Address receiving the platform fees
pub fn fee_address(network: Network) -> Address {
	match network {
		Network::Mainnet => Address::base_key_address(MAINNET_FEE_PAYMENT_KEY, MAINNET_STAKE_KEY),
		_ => Address::base_key_address(TESTNET_FEE_PAYMENT_KEY, TESTNET_STAKE_KEY),
	}
}

/// Stake credential of bond outputs when the borrower does not provide one
pub fn default_stake_credential(network: Network) -> StakeCredential {
	match network {
		Network::Mainnet => StakeCredential::inline_key(MAINNET_STAKE_KEY),
		_ => StakeCredential::inline_key(TESTNET_STAKE_KEY),
	}
}

/// Number of epochs over which a bond is redeemed
pub fn redeem_over_epochs(network: Network) -> u64 {
	match network {
		Network::Preview | Network::Custom => 1,
		Network::Preprod | Network::Mainnet => 72,
	}
}

pub fn platform_config(network: Network) -> PlatformConfig {
	PlatformConfig {
		bond_face_value: 100_000_000,
		fee: 500,
		fee_addr: fee_address(network),
		tx_ttl: 6 * 60,
		min_buffer: 1,
		prepaid_plus: 1,
		min_requested: 1,
		min_apr: 200,
		min_duration: 1,
		min_ada: 2_000_000,
	}
}

/// Everything the validators are parameterized with, apart from the protocol identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeploymentSettings {
	pub network: Network,
	pub config: BondIssueConfig,
	pub default_stake_credential: StakeCredential,
	pub redeem_over_epochs: u64,
}

impl DeploymentSettings {
	pub fn for_network(network: Network) -> Self {
		Self {
			network,
			config: BondIssueConfig {
				slot: slot_config(network),
				epoch: epoch_config(network),
				basis: BASIS_POINTS,
				platform: platform_config(network),
			},
			default_stake_credential: default_stake_credential(network),
			redeem_over_epochs: redeem_over_epochs(network),
		}
	}
}

/// Wallet funding expectations of a deployment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FundSettings {
	/// Lovelace of a UTXO that is enough to fund one deployment transaction
	pub min_fund: u64,
	pub min_fund_utxo_count: u64,
}

impl Default for FundSettings {
	fn default() -> Self {
		Self { min_fund: 30_000_000, min_fund_utxo_count: 8 }
	}
}

impl FundSettings {
	/// Balance below which the wallet is reported as underfunded
	pub fn recommended_balance(&self) -> u64 {
		self.min_fund * self.min_fund_utxo_count
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bond_issue_plutus_data::credentials::Credential;
	use pretty_assertions::assert_eq;

	#[test]
	fn economics_are_within_bounds_for_all_networks() {
		for network in Network::ALL {
			let platform = DeploymentSettings::for_network(network).config.platform;
			assert!(platform.fee > 0 && platform.fee <= 9999, "{network}");
			assert!(platform.bond_face_value > 0, "{network}");
			assert!(platform.min_ada > 0, "{network}");
		}
	}

	#[test]
	fn fee_is_within_basis_points_range() {
		for network in Network::ALL {
			let config = DeploymentSettings::for_network(network).config;
			let fee = config.platform.fee;
			assert!(fee >= config.basis.min && fee <= config.basis.max);
		}
	}

	#[test]
	fn only_mainnet_pays_fees_to_mainnet_address() {
		assert_eq!(
			fee_address(Network::Mainnet).payment_credential,
			Credential::VerificationKey(MAINNET_FEE_PAYMENT_KEY)
		);
		for network in [Network::Preview, Network::Preprod, Network::Custom] {
			assert_eq!(fee_address(network), fee_address(Network::Preview));
			assert_eq!(
				default_stake_credential(network),
				StakeCredential::inline_key(TESTNET_STAKE_KEY)
			);
		}
	}

	#[test]
	fn custom_network_uses_preview_time_bases() {
		let custom = DeploymentSettings::for_network(Network::Custom);
		let preview = DeploymentSettings::for_network(Network::Preview);
		assert_eq!(custom.config, preview.config);
		assert_eq!(custom.redeem_over_epochs, 1);
		assert_eq!(DeploymentSettings::for_network(Network::Mainnet).redeem_over_epochs, 72);
	}

	#[test]
	fn mainnet_epoch_boundary_matches_shelley_start() {
		let slot = slot_config(Network::Mainnet);
		let epoch = epoch_config(Network::Mainnet);
		assert_eq!(epoch.epoch_boundary, slot.zero_time);
		assert_eq!(epoch.epoch_boundary_as_epoch, 208);
		assert_eq!(epoch.epoch_length, EPOCH_LENGTH_BASE);
	}

	#[test]
	fn recommended_balance_is_min_fund_times_utxo_count() {
		assert_eq!(FundSettings::default().recommended_balance(), 240_000_000);
	}
}
