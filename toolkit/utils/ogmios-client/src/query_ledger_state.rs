//! `queryLedgerState/*` methods: unspent outputs and the protocol parameters in effect.

use crate::{
	OgmiosClient, OgmiosClientError, OgmiosParams,
	types::{OgmiosUtxo, byte_size, lovelace},
};
use bond_issue_domain::UtxoId;
use serde::{Deserialize, Deserializer};
use serde_json::json;
use std::collections::BTreeMap;

const UTXO: &str = "queryLedgerState/utxo";
const PROTOCOL_PARAMETERS: &str = "queryLedgerState/protocolParameters";

pub trait QueryLedgerState {
	/// Unspent outputs at any of the bech32 `addresses`
	#[allow(async_fn_in_trait)]
	async fn query_utxos(&self, addresses: &[String])
	-> Result<Vec<OgmiosUtxo>, OgmiosClientError>;

	#[allow(async_fn_in_trait)]
	async fn query_protocol_parameters(&self) -> Result<ProtocolParameters, OgmiosClientError>;
}

pub trait QueryUtxoByUtxoId {
	/// The output `utxo` refers to, `None` when it is spent or not yet on chain
	#[allow(async_fn_in_trait)]
	async fn query_utxo_by_id(&self, utxo: UtxoId)
	-> Result<Option<OgmiosUtxo>, OgmiosClientError>;
}

impl<T: OgmiosClient> QueryLedgerState for T {
	async fn query_utxos(
		&self,
		addresses: &[String],
	) -> Result<Vec<OgmiosUtxo>, OgmiosClientError> {
		self.request(UTXO, OgmiosParams::default().with("addresses", addresses)?).await
	}

	async fn query_protocol_parameters(&self) -> Result<ProtocolParameters, OgmiosClientError> {
		self.request(PROTOCOL_PARAMETERS, OgmiosParams::default()).await
	}
}

impl<T: OgmiosClient> QueryUtxoByUtxoId for T {
	async fn query_utxo_by_id(
		&self,
		utxo: UtxoId,
	) -> Result<Option<OgmiosUtxo>, OgmiosClientError> {
		let output_reference = json!({
			"transaction": { "id": utxo.tx_hash.to_hex_string() },
			"index": utxo.index.0,
		});
		let params = OgmiosParams::default().with("outputReferences", [output_reference])?;
		let outputs: Vec<OgmiosUtxo> = self.request(UTXO, params).await?;
		Ok(outputs.into_iter().find(|output| output.utxo_id() == utxo))
	}
}

/// Protocol parameters needed to build and balance transactions
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolParameters {
	pub min_fee_coefficient: u32,
	#[serde(deserialize_with = "lovelace")]
	pub min_fee_constant: u64,
	#[serde(rename = "minFeeReferenceScripts")]
	pub reference_script_fees: ReferenceScriptFees,
	#[serde(deserialize_with = "lovelace")]
	pub stake_pool_deposit: u64,
	#[serde(deserialize_with = "lovelace")]
	pub stake_credential_deposit: u64,
	#[serde(deserialize_with = "byte_size")]
	pub max_value_size: u32,
	#[serde(deserialize_with = "byte_size")]
	pub max_transaction_size: u32,
	/// Lovelace per byte of an output
	pub min_utxo_deposit_coefficient: u64,
	pub collateral_percentage: u32,
	pub max_collateral_inputs: u32,
	pub script_execution_prices: ExecutionPrices,
	pub plutus_cost_models: CostModels,
}

/// Lovelace per byte of reference scripts, in the first size tier
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ReferenceScriptFees {
	pub base: f64,
}

/// Prices of execution units, in lovelace
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ExecutionPrices {
	#[serde(deserialize_with = "ratio")]
	pub memory: fraction::Ratio<u64>,
	#[serde(deserialize_with = "ratio")]
	pub cpu: fraction::Ratio<u64>,
}

/// Cost models by language, keyed `plutus:v1`, `plutus:v2` and `plutus:v3`
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CostModels(pub BTreeMap<String, Vec<i128>>);

impl CostModels {
	pub fn get(&self, language: &str) -> Option<&[i128]> {
		self.0.get(language).map(Vec::as_slice)
	}
}

/// Ratio written as `"numerator/denominator"`
fn ratio<'de, D: Deserializer<'de>>(deserializer: D) -> Result<fraction::Ratio<u64>, D::Error> {
	let written = String::deserialize(deserializer)?;
	written.parse().map_err(serde::de::Error::custom)
}
