//! `OutputReference` of a spent UTxO, the seed of the protocol NFT asset name.
use crate::{constr, integer};
use bond_issue_domain::{AssetName, UtxoId, crypto::blake2b};
use cardano_serialization_lib::PlutusData;

/// `Constr 0 [Constr 0 [tx_hash], output_index]`
pub fn output_reference_data(utxo: &UtxoId) -> PlutusData {
	constr(
		0,
		vec![
			constr(0, vec![PlutusData::new_bytes(utxo.tx_hash.0.to_vec())]),
			integer(utxo.index.0.into()),
		],
	)
}

/// Asset name that is unique to a UTxO: blake2b-256 of its CBOR encoded output reference.
///
/// The minting policy checks the name against the UTxO spent by the minting transaction.
pub fn unique_asset_name(utxo: &UtxoId) -> AssetName {
	AssetName::from(blake2b::<32>(&output_reference_data(utxo).to_bytes()))
}
