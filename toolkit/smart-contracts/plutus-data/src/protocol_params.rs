//! Datum of the protocol parameters UTxO.
//!
//! It binds the hashes of all deployed validators together and is locked at the protocol
//! spending validator address together with the protocol NFT.
use crate::{
	DataDecodingError, DecodingResult, PlutusDataExtensions, constr, decoding_error_and_log,
};
use bond_issue_domain::{PolicyId, ScriptHash};
use cardano_serialization_lib::PlutusData;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ProtocolParamsDatum {
	/// Bond NFT minting policy
	pub bond_nft_pid: PolicyId,
	/// Bond NFT spending validator
	pub bond_skh: ScriptHash,
	/// Bond token minting policy
	pub bond_token_pid: PolicyId,
	/// Borrower NFT minting policy
	pub borrower_pid: PolicyId,
	/// Borrow request NFT minting policy
	pub borrow_request_pid: PolicyId,
	/// Borrow request spending validator
	pub borrow_request_skh: ScriptHash,
}

impl From<ProtocolParamsDatum> for PlutusData {
	fn from(datum: ProtocolParamsDatum) -> Self {
		constr(
			0,
			[
				datum.bond_nft_pid,
				datum.bond_skh,
				datum.bond_token_pid,
				datum.borrower_pid,
				datum.borrow_request_pid,
				datum.borrow_request_skh,
			]
			.into_iter()
			.map(|hash| PlutusData::new_bytes(hash.0.to_vec()))
			.collect(),
		)
	}
}

impl TryFrom<PlutusData> for ProtocolParamsDatum {
	type Error = DataDecodingError;

	fn try_from(datum: PlutusData) -> DecodingResult<Self> {
		datum
			.as_constr_fields(0)
			.filter(|fields| fields.len() == 6)
			.and_then(|fields| {
				let hash = |i: usize| -> Option<PolicyId> {
					Some(PolicyId(fields.get(i).as_bytes()?.try_into().ok()?))
				};
				Some(ProtocolParamsDatum {
					bond_nft_pid: hash(0)?,
					bond_skh: hash(1)?,
					bond_token_pid: hash(2)?,
					borrower_pid: hash(3)?,
					borrow_request_pid: hash(4)?,
					borrow_request_skh: hash(5)?,
				})
			})
			.ok_or_else(|| {
				let expected = "Expected Constr 0 [bytes(28) x 6]";
				decoding_error_and_log(&datum, "ProtocolParamsDatum", expected)
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_helpers::*;
	use hex_literal::hex;
	use pretty_assertions::assert_eq;

	fn datum() -> ProtocolParamsDatum {
		ProtocolParamsDatum {
			bond_nft_pid: PolicyId(hex!("01010101010101010101010101010101010101010101010101010101")),
			bond_skh: PolicyId(hex!("02020202020202020202020202020202020202020202020202020202")),
			bond_token_pid: PolicyId(hex!("03030303030303030303030303030303030303030303030303030303")),
			borrower_pid: PolicyId(hex!("04040404040404040404040404040404040404040404040404040404")),
			borrow_request_pid: PolicyId(hex!("05050505050505050505050505050505050505050505050505050505")),
			borrow_request_skh: PolicyId(hex!("06060606060606060606060606060606060606060606060606060606")),
		}
	}

	fn datum_plutus_data() -> PlutusData {
		test_plutus_data!({"constructor": 0, "fields": [
			{"bytes": "01010101010101010101010101010101010101010101010101010101"},
			{"bytes": "02020202020202020202020202020202020202020202020202020202"},
			{"bytes": "03030303030303030303030303030303030303030303030303030303"},
			{"bytes": "04040404040404040404040404040404040404040404040404040404"},
			{"bytes": "05050505050505050505050505050505050505050505050505050505"},
			{"bytes": "06060606060606060606060606060606060606060606060606060606"}
		]})
	}

	#[test]
	fn encoding() {
		assert_eq!(PlutusData::from(datum()), datum_plutus_data())
	}

	#[test]
	fn decoding() {
		assert_eq!(ProtocolParamsDatum::try_from(datum_plutus_data()), Ok(datum()))
	}

	#[test]
	fn decoding_rejects_missing_field() {
		let data = test_plutus_data!({"constructor": 0, "fields": [
			{"bytes": "01010101010101010101010101010101010101010101010101010101"}
		]});
		assert!(ProtocolParamsDatum::try_from(data).is_err())
	}

	#[test]
	fn decoding_rejects_other_constructor() {
		let data = test_plutus_data!({"constructor": 1, "fields": [
			{"bytes": "01010101010101010101010101010101010101010101010101010101"},
			{"bytes": "02020202020202020202020202020202020202020202020202020202"},
			{"bytes": "03030303030303030303030303030303030303030303030303030303"},
			{"bytes": "04040404040404040404040404040404040404040404040404040404"},
			{"bytes": "05050505050505050505050505050505050505050505050505050505"},
			{"bytes": "06060606060606060606060606060606060606060606060606060606"}
		]});
		assert!(ProtocolParamsDatum::try_from(data).is_err())
	}
}
