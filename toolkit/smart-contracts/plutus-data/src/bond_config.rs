//! Protocol configuration record applied as a parameter to the borrow request and bond
//! validators.
//!
//! Definition in the contracts:
//! ```text
//! type BondIssueConfig {
//!   slot: SlotConfig,
//!   epoch: EpochConfig,
//!   basis: BasisConfig,
//!   platform: PlatformConfig,
//! }
//! ```
use crate::{constr, credentials::Address, integer};
use cardano_serialization_lib::PlutusData;
use serde::Serialize;

/// Slot to POSIX time conversion basis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotConfig {
	/// POSIX time in milliseconds of `zero_slot`
	pub zero_time: u64,
	pub zero_slot: u64,
	/// Slot length in milliseconds
	pub slot_length: u64,
}

/// Epoch boundary basis used to convert time to epochs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochConfig {
	/// Number of epochs in a year of `epoch_length_base` long epochs
	pub year_to_epoch: u64,
	/// POSIX time in milliseconds of a known epoch start
	pub epoch_boundary: u64,
	/// Epoch number starting at `epoch_boundary`
	pub epoch_boundary_as_epoch: u64,
	/// Epoch length in milliseconds
	pub epoch_length: u64,
	/// Mainnet epoch length in milliseconds
	pub epoch_length_base: u64,
}

/// Basis point scale
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BasisConfig {
	pub base: u64,
	pub min: u64,
	pub max: u64,
}

/// Platform economics
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
	/// Lovelace value of one bond
	pub bond_face_value: u64,
	/// Platform fee in basis points
	pub fee: u64,
	/// Address receiving platform fees
	pub fee_addr: Address,
	/// Validity interval of protocol transactions, in slots
	pub tx_ttl: u64,
	pub min_buffer: u64,
	pub prepaid_plus: u64,
	pub min_requested: u64,
	/// Minimal APR in basis points
	pub min_apr: u64,
	pub min_duration: u64,
	/// Lovelace locked with protocol outputs
	pub min_ada: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BondIssueConfig {
	pub slot: SlotConfig,
	pub epoch: EpochConfig,
	pub basis: BasisConfig,
	pub platform: PlatformConfig,
}

impl From<&SlotConfig> for PlutusData {
	fn from(slot: &SlotConfig) -> Self {
		constr(0, vec![integer(slot.zero_time), integer(slot.zero_slot), integer(slot.slot_length)])
	}
}

impl From<&EpochConfig> for PlutusData {
	fn from(epoch: &EpochConfig) -> Self {
		constr(
			0,
			vec![
				integer(epoch.year_to_epoch),
				integer(epoch.epoch_boundary),
				integer(epoch.epoch_boundary_as_epoch),
				integer(epoch.epoch_length),
				integer(epoch.epoch_length_base),
			],
		)
	}
}

impl From<&BasisConfig> for PlutusData {
	fn from(basis: &BasisConfig) -> Self {
		constr(0, vec![integer(basis.base), integer(basis.min), integer(basis.max)])
	}
}

impl From<&PlatformConfig> for PlutusData {
	fn from(platform: &PlatformConfig) -> Self {
		constr(
			0,
			vec![
				integer(platform.bond_face_value),
				integer(platform.fee),
				(&platform.fee_addr).into(),
				integer(platform.tx_ttl),
				integer(platform.min_buffer),
				integer(platform.prepaid_plus),
				integer(platform.min_requested),
				integer(platform.min_apr),
				integer(platform.min_duration),
				integer(platform.min_ada),
			],
		)
	}
}

impl From<&BondIssueConfig> for PlutusData {
	fn from(config: &BondIssueConfig) -> Self {
		constr(
			0,
			vec![
				(&config.slot).into(),
				(&config.epoch).into(),
				(&config.basis).into(),
				(&config.platform).into(),
			],
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{credentials::Credential, test_helpers::*};
	use bond_issue_domain::KeyHash;
	use pretty_assertions::assert_eq;

	fn config() -> BondIssueConfig {
		BondIssueConfig {
			slot: SlotConfig { zero_time: 1666656000000, zero_slot: 0, slot_length: 1000 },
			epoch: EpochConfig {
				year_to_epoch: 73,
				epoch_boundary: 1666656000000,
				epoch_boundary_as_epoch: 0,
				epoch_length: 86400000,
				epoch_length_base: 432000000,
			},
			basis: BasisConfig { base: 10000, min: 1, max: 9999 },
			platform: PlatformConfig {
				bond_face_value: 100000000,
				fee: 500,
				fee_addr: Address {
					payment_credential: Credential::VerificationKey(KeyHash([1; 28])),
					stake_credential: None,
				},
				tx_ttl: 360,
				min_buffer: 1,
				prepaid_plus: 1,
				min_requested: 1,
				min_apr: 200,
				min_duration: 1,
				min_ada: 2000000,
			},
		}
	}

	#[test]
	fn config_encoding() {
		let expected = test_plutus_data!({"constructor": 0, "fields": [
			{"constructor": 0, "fields": [{"int": 1666656000000u64}, {"int": 0}, {"int": 1000}]},
			{"constructor": 0, "fields": [
				{"int": 73}, {"int": 1666656000000u64}, {"int": 0}, {"int": 86400000}, {"int": 432000000}
			]},
			{"constructor": 0, "fields": [{"int": 10000}, {"int": 1}, {"int": 9999}]},
			{"constructor": 0, "fields": [
				{"int": 100000000},
				{"int": 500},
				{"constructor": 0, "fields": [
					{"constructor": 0, "fields": [
						{"bytes": "01010101010101010101010101010101010101010101010101010101"}
					]},
					{"constructor": 1, "fields": []}
				]},
				{"int": 360},
				{"int": 1},
				{"int": 1},
				{"int": 1},
				{"int": 200},
				{"int": 1},
				{"int": 2000000}
			]}
		]});
		assert_eq!(PlutusData::from(&config()), expected)
	}

	#[test]
	fn config_json_uses_camel_case_and_exact_integers() {
		let json = serde_json::to_value(config()).unwrap();
		assert_eq!(json["slot"]["zeroTime"], serde_json::json!(1666656000000u64));
		assert_eq!(json["epoch"]["epochBoundaryAsEpoch"], serde_json::json!(0));
		assert_eq!(json["platform"]["bondFaceValue"], serde_json::json!(100000000));
		assert_eq!(json["platform"]["feeAddr"].get("stakeCredential"), None);
	}
}
