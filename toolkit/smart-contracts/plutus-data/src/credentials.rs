//! Plutus `Address`, `Credential` and `StakeCredential` records.
//!
//! The JSON shape produced by [serde::Serialize] follows the blueprint type conventions,
//! e.g. `{"VerificationKeyCredential": ["<hex>"]}`, so values can be recorded in
//! transaction metadata.
use crate::{constr, integer};
use bond_issue_domain::{KeyHash, ScriptHash};
use cardano_serialization_lib::PlutusData;
use serde::{Serialize, Serializer, ser::SerializeStruct};

/// Payment or staking credential
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Credential {
	/// Hash of a verification key
	VerificationKey(KeyHash),
	/// Hash of a script
	Script(ScriptHash),
}

impl From<&Credential> for PlutusData {
	fn from(credential: &Credential) -> Self {
		match credential {
			Credential::VerificationKey(hash) => {
				constr(0, vec![PlutusData::new_bytes(hash.0.to_vec())])
			},
			Credential::Script(hash) => constr(1, vec![PlutusData::new_bytes(hash.0.to_vec())]),
		}
	}
}

impl Serialize for Credential {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Credential::VerificationKey(hash) => serializer.serialize_newtype_variant(
				"Credential",
				0,
				"VerificationKeyCredential",
				&[hash.to_hex_string()],
			),
			Credential::Script(hash) => serializer.serialize_newtype_variant(
				"Credential",
				1,
				"ScriptCredential",
				&[hash.to_hex_string()],
			),
		}
	}
}

/// Delegation part of an address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakeCredential {
	Inline(Credential),
	Pointer { slot_number: u64, transaction_index: u64, certificate_index: u64 },
}

impl StakeCredential {
	/// Inline stake credential of a stake verification key hash
	pub fn inline_key(hash: KeyHash) -> Self {
		Self::Inline(Credential::VerificationKey(hash))
	}
}

impl From<&StakeCredential> for PlutusData {
	fn from(credential: &StakeCredential) -> Self {
		match credential {
			StakeCredential::Inline(credential) => constr(0, vec![credential.into()]),
			StakeCredential::Pointer { slot_number, transaction_index, certificate_index } => {
				constr(
					1,
					vec![
						integer(*slot_number),
						integer(*transaction_index),
						integer(*certificate_index),
					],
				)
			},
		}
	}
}

impl Serialize for StakeCredential {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			StakeCredential::Inline(credential) => {
				serializer.serialize_newtype_variant("StakeCredential", 0, "Inline", &[credential])
			},
			StakeCredential::Pointer { slot_number, transaction_index, certificate_index } => {
				#[derive(Serialize)]
				#[serde(rename_all = "camelCase")]
				struct Pointer {
					slot_number: u64,
					transaction_index: u64,
					certificate_index: u64,
				}
				serializer.serialize_newtype_variant(
					"StakeCredential",
					1,
					"Pointer",
					&Pointer {
						slot_number: *slot_number,
						transaction_index: *transaction_index,
						certificate_index: *certificate_index,
					},
				)
			},
		}
	}
}

/// Shelley address as seen by Plutus validators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Address {
	pub payment_credential: Credential,
	pub stake_credential: Option<StakeCredential>,
}

impl Address {
	/// Base address with key payment and key stake credentials
	pub fn base_key_address(payment: KeyHash, stake: KeyHash) -> Self {
		Self {
			payment_credential: Credential::VerificationKey(payment),
			stake_credential: Some(StakeCredential::inline_key(stake)),
		}
	}
}

impl From<&Address> for PlutusData {
	fn from(address: &Address) -> Self {
		let stake = match &address.stake_credential {
			Some(stake) => constr(0, vec![stake.into()]),
			None => constr(1, vec![]),
		};
		constr(0, vec![(&address.payment_credential).into(), stake])
	}
}

impl Serialize for Address {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		// `None` stake credentials are omitted, metadata has no null value
		let len = if self.stake_credential.is_some() { 2 } else { 1 };
		let mut state = serializer.serialize_struct("Address", len)?;
		state.serialize_field("paymentCredential", &self.payment_credential)?;
		if let Some(stake) = &self.stake_credential {
			state.serialize_field("stakeCredential", stake)?;
		}
		state.end()
	}
}
