//! Ledger values as Ogmios reports them, with policy ids and asset names decoded
//! into the domain types.

use bond_issue_domain::{AssetId, AssetName, McTxHash, PolicyId, UtxoId};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Transaction output with its reference
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct OgmiosUtxo {
	pub transaction: OgmiosTx,
	pub index: u16,
	/// Bech32 encoded
	pub address: String,
	pub value: OgmiosValue,
	/// CBOR of the inline datum
	#[serde(default, deserialize_with = "optional_hex")]
	pub datum: Option<Vec<u8>>,
	/// Reference script
	pub script: Option<OgmiosScript>,
}

impl OgmiosUtxo {
	pub fn utxo_id(&self) -> UtxoId {
		UtxoId::new(self.transaction.id, self.index)
	}

	/// Amount of `asset` held by the output
	pub fn token_amount(&self, asset: &AssetId) -> u64 {
		self.value.token_amount(asset)
	}
}

impl std::fmt::Display for OgmiosUtxo {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.utxo_id())
	}
}

#[derive(Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct OgmiosTx {
	#[serde(deserialize_with = "hex_array")]
	pub id: [u8; 32],
}

impl OgmiosTx {
	pub fn hash(&self) -> McTxHash {
		McTxHash(self.id)
	}
}

impl std::fmt::Debug for OgmiosTx {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "OgmiosTx({})", hex::encode(self.id))
	}
}

/// Script attached to an output
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct OgmiosScript {
	/// `plutus:v1`, `plutus:v2`, `plutus:v3` or `native`
	pub language: String,
	#[serde(default, deserialize_with = "hex_bytes")]
	pub cbor: Vec<u8>,
}

impl std::fmt::Debug for OgmiosScript {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "OgmiosScript({}, {})", self.language, hex::encode(&self.cbor))
	}
}

const ADA: &str = "ada";
const LOVELACE: &str = "lovelace";

/// Lovelace and native tokens of an output.
///
/// Ogmios reports it as `{ "ada": { "lovelace": n }, "<policy id>": { "<asset name>": n } }`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(try_from = "BTreeMap<String, BTreeMap<String, u64>>")]
pub struct OgmiosValue {
	pub lovelace: u64,
	pub native_tokens: BTreeMap<PolicyId, BTreeMap<AssetName, u64>>,
}

impl OgmiosValue {
	pub fn new_lovelace(lovelace: u64) -> Self {
		Self { lovelace, native_tokens: BTreeMap::new() }
	}

	/// Adds `amount` of `asset` to the value
	pub fn with_token(mut self, asset: &AssetId, amount: u64) -> Self {
		let tokens = self.native_tokens.entry(asset.policy_id).or_default();
		*tokens.entry(asset.asset_name.clone()).or_default() += amount;
		self
	}

	pub fn is_lovelace_only(&self) -> bool {
		self.native_tokens.values().all(BTreeMap::is_empty)
	}

	pub fn token_amount(&self, asset: &AssetId) -> u64 {
		(self.native_tokens.get(&asset.policy_id))
			.and_then(|tokens| tokens.get(&asset.asset_name))
			.copied()
			.unwrap_or_default()
	}

	/// Tokens of `policy_id` and their amounts
	pub fn tokens_of(&self, policy_id: PolicyId) -> impl Iterator<Item = (&AssetName, u64)> {
		(self.native_tokens.get(&policy_id).into_iter())
			.flat_map(|tokens| tokens.iter().map(|(name, amount)| (name, *amount)))
	}
}

impl TryFrom<BTreeMap<String, BTreeMap<String, u64>>> for OgmiosValue {
	type Error = String;

	fn try_from(mut entries: BTreeMap<String, BTreeMap<String, u64>>) -> Result<Self, String> {
		let lovelace = (entries.remove(ADA))
			.and_then(|ada| ada.get(LOVELACE).copied())
			.ok_or_else(|| "value has no lovelace amount".to_string())?;
		let native_tokens = (entries.into_iter())
			.map(|(policy_id, tokens)| {
				let tokens = (tokens.into_iter())
					.map(|(name, amount)| Ok((name.parse::<AssetName>()?, amount)))
					.collect::<Result<BTreeMap<_, _>, String>>()?;
				Ok((policy_id.parse::<PolicyId>()?, tokens))
			})
			.collect::<Result<_, String>>()?;
		Ok(Self { lovelace, native_tokens })
	}
}

/// Lovelace of a `{ "ada": { "lovelace": n } }` amount
pub(crate) fn lovelace<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
	Ok(OgmiosValue::deserialize(deserializer)?.lovelace)
}

/// Size given as `{ "bytes": n }`
pub(crate) fn byte_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
	#[derive(Deserialize)]
	struct Size {
		bytes: u32,
	}
	Ok(Size::deserialize(deserializer)?.bytes)
}

fn hex_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
	let encoded = String::deserialize(deserializer)?;
	hex::decode(encoded).map_err(serde::de::Error::custom)
}

fn optional_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
	hex_bytes(deserializer).map(Some)
}

fn hex_array<'de, D: Deserializer<'de>, const N: usize>(
	deserializer: D,
) -> Result<[u8; N], D::Error> {
	let bytes = hex_bytes(deserializer)?;
	let len = bytes.len();
	<[u8; N]>::try_from(bytes)
		.map_err(|_| serde::de::Error::custom(format!("expected {N} bytes, got {len}")))
}

#[cfg(test)]
mod tests {
	use super::*;
	use hex_literal::hex;
	use pretty_assertions::assert_eq;
	use serde_json::json;

	const PROTOCOL_NFT_POLICY: [u8; 28] =
		hex!("5c1f6c93db56f1e9f1b0e8e1d2a4b0f1b1c1d1e1f10111213141516a");
	const PROTOCOL_NFT_NAME: [u8; 32] =
		hex!("9e1199a988ba72ffd6e9c269cadb3b53b5f360ff99f112d9b2ee30c4d74ad88b");

	fn protocol_nft() -> AssetId {
		AssetId {
			policy_id: PolicyId(PROTOCOL_NFT_POLICY),
			asset_name: AssetName::from(PROTOCOL_NFT_NAME),
		}
	}

	#[test]
	fn lovelace_only_value() {
		let value: OgmiosValue =
			serde_json::from_value(json!({ "ada": { "lovelace": 30000000 } })).unwrap();
		assert_eq!(value, OgmiosValue::new_lovelace(30000000));
		assert!(value.is_lovelace_only());
		assert_eq!(value.token_amount(&protocol_nft()), 0);
	}

	#[test]
	fn value_holding_protocol_nft() {
		let value: OgmiosValue = serde_json::from_value(json!({
			"ada": { "lovelace": 1500000 },
			(hex::encode(PROTOCOL_NFT_POLICY)): { (hex::encode(PROTOCOL_NFT_NAME)): 1 }
		}))
		.unwrap();
		assert_eq!(value, OgmiosValue::new_lovelace(1500000).with_token(&protocol_nft(), 1));
		assert!(!value.is_lovelace_only());
		assert_eq!(value.token_amount(&protocol_nft()), 1);
		let tokens: Vec<_> = value.tokens_of(PolicyId(PROTOCOL_NFT_POLICY)).collect();
		assert_eq!(tokens, vec![(&AssetName::from(PROTOCOL_NFT_NAME), 1)]);
		assert_eq!(value.tokens_of(PolicyId([0; 28])).count(), 0);
	}

	#[test]
	fn tokens_of_an_asset_add_up() {
		let value = OgmiosValue::new_lovelace(2)
			.with_token(&protocol_nft(), 1)
			.with_token(&protocol_nft(), 2);
		assert_eq!(value.token_amount(&protocol_nft()), 3);
	}

	#[test]
	fn malformed_policy_id_is_rejected() {
		let value = json!({ "ada": { "lovelace": 1 }, "abcd": { "": 1 } });
		assert!(serde_json::from_value::<OgmiosValue>(value).is_err());
	}

	#[test]
	fn value_without_lovelace_is_rejected() {
		let value = json!({ (hex::encode(PROTOCOL_NFT_POLICY)): { "": 1 } });
		assert!(serde_json::from_value::<OgmiosValue>(value).is_err());
	}

	#[test]
	fn output_locked_with_inline_datum() {
		let utxo: OgmiosUtxo = serde_json::from_value(json!({
			"transaction": { "id": "2f3b4a1e77c8d90a6b5c4d3e2f1a0b9c8d7e6f5a4b3c2d1e0f9a8b7c6d5e4f3a" },
			"index": 0,
			"address": "addr_test1wpa4ypgzv6xqwp8l5jhvxk2ll44tazmqvm04lz8gkhcdzmqfqwdua",
			"value": {
				"ada": { "lovelace": 2000000 },
				(hex::encode(PROTOCOL_NFT_POLICY)): { (hex::encode(PROTOCOL_NFT_NAME)): 1 }
			},
			"datum": "d8799f4600010203040507ff"
		}))
		.unwrap();
		assert_eq!(
			utxo,
			OgmiosUtxo {
				transaction: OgmiosTx {
					id: hex!("2f3b4a1e77c8d90a6b5c4d3e2f1a0b9c8d7e6f5a4b3c2d1e0f9a8b7c6d5e4f3a")
				},
				index: 0,
				address: "addr_test1wpa4ypgzv6xqwp8l5jhvxk2ll44tazmqvm04lz8gkhcdzmqfqwdua".into(),
				value: OgmiosValue::new_lovelace(2000000).with_token(&protocol_nft(), 1),
				datum: Some(hex!("d8799f4600010203040507ff").to_vec()),
				script: None,
			}
		);
		assert_eq!(utxo.token_amount(&protocol_nft()), 1);
	}

	#[test]
	fn output_carrying_reference_script() {
		let utxo: OgmiosUtxo = serde_json::from_value(json!({
			"transaction": { "id": "2f3b4a1e77c8d90a6b5c4d3e2f1a0b9c8d7e6f5a4b3c2d1e0f9a8b7c6d5e4f3a" },
			"index": 1,
			"address": "addr_test1vqezxrh24ts0775hulcg3ejcwj7hns8792vnn8met6z9gwsxt87zy",
			"value": { "ada": { "lovelace": 12000000 } },
			"datumHash": "5c1f6c93db56f1e9f1b0e8e1d2a4b0f1b1c1d1e1f10111213141516a01020304",
			"script": { "cbor": "4e4d01000033222220051200120011", "language": "plutus:v2" }
		}))
		.unwrap();
		assert_eq!(
			utxo.script,
			Some(OgmiosScript {
				language: "plutus:v2".into(),
				cbor: hex!("4e4d01000033222220051200120011").to_vec(),
			})
		);
		assert_eq!(utxo.datum, None);
		assert_eq!(
			utxo.to_string(),
			"2f3b4a1e77c8d90a6b5c4d3e2f1a0b9c8d7e6f5a4b3c2d1e0f9a8b7c6d5e4f3a#1"
		);
	}

	#[test]
	fn native_script_without_cbor() {
		let script: OgmiosScript = serde_json::from_value(json!({
			"language": "native",
			"json": { "clause": "signature", "from": "00" }
		}))
		.unwrap();
		assert_eq!(script.language, "native");
		assert!(script.cbor.is_empty());
	}
}
