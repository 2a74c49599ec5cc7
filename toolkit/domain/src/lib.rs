//! # Bond issuance domain types
//!
//! This crate defines common Cardano ledger identifiers shared by the bond issuance
//! protocol deployer crates.

#![deny(missing_docs)]

pub mod byte_string;
pub mod crypto;
pub mod network;

pub use network::{Network, NetworkType};

use core::{
	fmt::{Display, Formatter},
	str::FromStr,
};
use derive_more::{From, Into};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Size of a Cardano transaction hash in bytes
pub const TX_HASH_SIZE: usize = 32;

/// Cardano transaction hash
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into)]
pub struct McTxHash(pub [u8; TX_HASH_SIZE]);
fixed_byte_string!(McTxHash, TX_HASH_SIZE);

/// Index of an output within a transaction
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into)]
#[derive(Serialize, Deserialize)]
pub struct UtxoIndex(pub u16);

impl FromStr for UtxoIndex {
	type Err = core::num::ParseIntError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.parse().map(UtxoIndex)
	}
}

/// Identifies a transaction output on Cardano
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtxoId {
	/// Transaction hash
	pub tx_hash: McTxHash,
	/// Output index
	pub index: UtxoIndex,
}

impl UtxoId {
	/// Creates new [UtxoId] from primitive type arguments
	pub const fn new(hash: [u8; TX_HASH_SIZE], index: u16) -> UtxoId {
		UtxoId { tx_hash: McTxHash(hash), index: UtxoIndex(index) }
	}
}

impl FromStr for UtxoId {
	type Err = &'static str;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let Some((hash_str, index_str)) = s.split_once('#') else {
			return Err("UtxoId string must conform to format: '<hash>#<index>'");
		};
		Ok(UtxoId {
			tx_hash: McTxHash::from_str(hash_str)
				.map_err(|_| "invalid string input for McTxHash")?,
			index: UtxoIndex::from_str(index_str)
				.map_err(|_| "invalid string input for OutputIndex")?,
		})
	}
}

impl Display for UtxoId {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		write!(f, "{}#{}", self.tx_hash, self.index.0)
	}
}

impl Serialize for UtxoId {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for UtxoId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

/// Cardano Policy Id is a 224 bits blake2b hash.
pub const POLICY_ID_LEN: usize = 28;

/// Cardano Policy Id
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into)]
pub struct PolicyId(pub [u8; POLICY_ID_LEN]);
fixed_byte_string!(PolicyId, POLICY_ID_LEN);

/// Cardano script hash
pub type ScriptHash = PolicyId;

/// Length of a Cardano verification key hash
pub const KEY_HASH_LEN: usize = 28;

/// Blake2b-224 hash of a Cardano payment or stake verification key
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into)]
pub struct KeyHash(pub [u8; KEY_HASH_LEN]);
fixed_byte_string!(KeyHash, KEY_HASH_LEN);

/// Maximum length of a Cardano native asset's name in bytes
pub const MAX_ASSET_NAME_LEN: usize = 32;

/// Cardano native asset name
#[derive(Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetName(Vec<u8>);

impl AssetName {
	/// Constructs an empty [AssetName]
	pub fn empty() -> Self {
		Self(Vec::new())
	}

	/// Bytes of the asset name
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Returns the hex encoding of the asset name
	pub fn to_hex_string(&self) -> String {
		hex::encode(&self.0)
	}
}

impl From<[u8; MAX_ASSET_NAME_LEN]> for AssetName {
	fn from(value: [u8; MAX_ASSET_NAME_LEN]) -> Self {
		Self(value.to_vec())
	}
}

impl TryFrom<Vec<u8>> for AssetName {
	type Error = String;

	fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
		if value.len() > MAX_ASSET_NAME_LEN {
			return Err(format!(
				"Asset name can have at most {MAX_ASSET_NAME_LEN} bytes, got {}",
				value.len()
			));
		}
		Ok(Self(value))
	}
}

impl FromStr for AssetName {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = hex::decode(s).map_err(|e| format!("Asset name is not valid hex: {e}"))?;
		Self::try_from(bytes)
	}
}

impl core::fmt::Debug for AssetName {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		write!(f, "AssetName({})", self.to_hex_string())
	}
}

impl Display for AssetName {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		f.write_str(&self.to_hex_string())
	}
}

impl Serialize for AssetName {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_hex_string())
	}
}

impl<'de> Deserialize<'de> for AssetName {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

/// Full data identifying a Cardano native asset
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetId {
	/// Policy ID
	pub policy_id: PolicyId,
	/// Asset name
	pub asset_name: AssetName,
}

impl AssetId {
	/// Concatenated hex of policy id and asset name, the form wallets and indexers use
	pub fn unit(&self) -> String {
		format!("{}{}", self.policy_id.to_hex_string(), self.asset_name.to_hex_string())
	}
}

impl Display for AssetId {
	fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
		write!(f, "{}.{}", self.policy_id, self.asset_name)
	}
}

impl FromStr for AssetId {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.split_once(".") {
			Some((policy_id, asset_name)) => {
				let policy_id = PolicyId::from_str(policy_id)
					.map_err(|e| format!("{} is invalid Policy ID: {}", policy_id, e))?;
				let asset_name = AssetName::from_str(asset_name)
					.map_err(|e| format!("{} is invalid Asset Name: {}", asset_name, e))?;
				Ok(Self { policy_id, asset_name })
			},
			None => {
				Err("AssetId should be <hex encoded Policy ID>.<hex encoded Asset Name>"
					.to_string())
			},
		}
	}
}
