//! In-memory Ogmios client.
//!
//! Submitted transactions are applied to a ledger of UTXOs, so multi transaction flows
//! observe the outputs of their earlier transactions.
use crate::{
	plutus_script::PlutusScript,
	test_values::{protocol_parameters, shelley_config},
};
use bond_issue_domain::{AssetName, PolicyId, UtxoId, crypto::blake2b};
use cardano_serialization_lib::{Transaction, TransactionOutput};
use ogmios_client::{
	OgmiosClientError,
	query_ledger_state::{ProtocolParameters, QueryLedgerState, QueryUtxoByUtxoId},
	query_network::{GenesisConfiguration, QueryNetwork},
	transactions::{RedeemerBudget, SubmitTransactionResponse, Transactions},
	types::{OgmiosTx, OgmiosUtxo, OgmiosValue},
};
use std::{cell::RefCell, collections::BTreeMap};

const MINT_BUDGET: (u64, u64) = (1_000_000, 500_000_000);

#[derive(Clone, Debug)]
pub(crate) struct MockOgmiosClient {
	shelley_config: GenesisConfiguration,
	protocol_parameters: ProtocolParameters,
	ledger: RefCell<Vec<OgmiosUtxo>>,
	evaluate_result: Option<Vec<RedeemerBudget>>,
	submit_result: Option<SubmitTransactionResponse>,
	submitted: RefCell<Vec<Transaction>>,
}

impl Default for MockOgmiosClient {
	fn default() -> Self {
		Self::new()
	}
}

impl MockOgmiosClient {
	pub(crate) fn new() -> Self {
		Self {
			shelley_config: shelley_config(),
			protocol_parameters: protocol_parameters(),
			ledger: RefCell::new(vec![]),
			evaluate_result: None,
			submit_result: None,
			submitted: RefCell::new(vec![]),
		}
	}

	pub(crate) fn with_shelley_config(self, shelley_config: GenesisConfiguration) -> Self {
		Self { shelley_config, ..self }
	}

	pub(crate) fn with_utxos(self, utxos: Vec<OgmiosUtxo>) -> Self {
		Self { ledger: RefCell::new(utxos), ..self }
	}

	/// Fixed evaluation result. By default every minting policy gets the same budget.
	pub(crate) fn with_evaluate_result(self, evaluate_result: Vec<RedeemerBudget>) -> Self {
		Self { evaluate_result: Some(evaluate_result), ..self }
	}

	/// Fixed submit result. Transactions submitted then are not applied to the ledger.
	pub(crate) fn with_submit_result(self, submit_result: SubmitTransactionResponse) -> Self {
		Self { submit_result: Some(submit_result), ..self }
	}

	pub(crate) fn submitted_transactions(&self) -> Vec<Transaction> {
		self.submitted.borrow().clone()
	}

	pub(crate) fn ledger_utxos(&self) -> Vec<OgmiosUtxo> {
		self.ledger.borrow().clone()
	}

	pub(crate) fn utxos_at(&self, address: &str) -> Vec<OgmiosUtxo> {
		(self.ledger.borrow().iter()).filter(|utxo| utxo.address == address).cloned().collect()
	}

	fn apply(&self, tx: &Transaction) -> Result<[u8; 32], OgmiosClientError> {
		let tx_id: [u8; 32] = blake2b(&tx.body().to_bytes());
		let mut ledger = self.ledger.borrow_mut();
		for input in tx.body().inputs().into_iter() {
			let spent = UtxoId::new(
				input.transaction_id().to_bytes().try_into().map_err(|_| {
					OgmiosClientError::RequestError("Invalid transaction id".to_string())
				})?,
				input.index() as u16,
			);
			let before = ledger.len();
			ledger.retain(|utxo| utxo.utxo_id() != spent);
			if ledger.len() == before {
				return Err(OgmiosClientError::RequestError(format!("Unknown input {spent}")));
			}
		}
		for (index, output) in tx.body().outputs().into_iter().enumerate() {
			ledger.push(to_ogmios_utxo(tx_id, index as u16, output)?);
		}
		Ok(tx_id)
	}
}

fn to_ogmios_utxo(
	tx_id: [u8; 32],
	index: u16,
	output: &TransactionOutput,
) -> Result<OgmiosUtxo, OgmiosClientError> {
	let error = |e: String| OgmiosClientError::RequestError(e);
	let amount = output.amount();
	let mut native_tokens = BTreeMap::new();
	if let Some(multiasset) = amount.multiasset() {
		let policies = multiasset.keys();
		for policy in (0..policies.len()).map(|i| policies.get(i)) {
			let Some(assets) = multiasset.get(&policy) else { continue };
			let names = assets.keys();
			let mut tokens = BTreeMap::new();
			for name in (0..names.len()).map(|j| names.get(j)) {
				let amount = assets.get(&name).map(u64::from).unwrap_or_default();
				tokens.insert(AssetName::try_from(name.name()).map_err(error)?, amount);
			}
			native_tokens.insert(PolicyId::try_from(policy.to_bytes()).map_err(error)?, tokens);
		}
	}
	let script = (output.script_ref())
		.and_then(|script_ref| script_ref.plutus_script())
		.map(|script| {
			PlutusScript::from_cbor(&script.bytes(), script.language_version()).into()
		});
	Ok(OgmiosUtxo {
		transaction: OgmiosTx { id: tx_id },
		index,
		address: output.address().to_bech32(None).map_err(|e| error(format!("{e:?}")))?,
		value: OgmiosValue { lovelace: amount.coin().into(), native_tokens },
		datum: output.plutus_data().map(|data| data.to_bytes()),
		script,
	})
}

impl QueryNetwork for MockOgmiosClient {
	async fn shelley_genesis_configuration(
		&self,
	) -> Result<GenesisConfiguration, OgmiosClientError> {
		Ok(self.shelley_config.clone())
	}
}

impl QueryLedgerState for MockOgmiosClient {
	async fn query_utxos(
		&self,
		addresses: &[String],
	) -> Result<Vec<OgmiosUtxo>, OgmiosClientError> {
		Ok((self.ledger.borrow().iter())
			.filter(|utxo| addresses.contains(&utxo.address))
			.cloned()
			.collect())
	}

	async fn query_protocol_parameters(&self) -> Result<ProtocolParameters, OgmiosClientError> {
		Ok(self.protocol_parameters.clone())
	}
}

impl QueryUtxoByUtxoId for MockOgmiosClient {
	async fn query_utxo_by_id(
		&self,
		utxo: UtxoId,
	) -> Result<Option<OgmiosUtxo>, OgmiosClientError> {
		Ok(self.ledger.borrow().iter().find(|u| u.utxo_id() == utxo).cloned())
	}
}

impl Transactions for MockOgmiosClient {
	async fn evaluate_transaction(
		&self,
		tx_bytes: &[u8],
	) -> Result<Vec<RedeemerBudget>, OgmiosClientError> {
		if let Some(result) = &self.evaluate_result {
			return Ok(result.clone());
		}
		let tx = Transaction::from_bytes(tx_bytes.to_vec())
			.map_err(|e| OgmiosClientError::RequestError(format!("{e:?}")))?;
		let mints = tx.body().mint().map(|mint| mint.keys().len()).unwrap_or_default();
		Ok((0..mints)
			.map(|index| RedeemerBudget::mint(index as u32, MINT_BUDGET.0, MINT_BUDGET.1))
			.collect())
	}

	async fn submit_transaction(
		&self,
		tx_bytes: &[u8],
	) -> Result<SubmitTransactionResponse, OgmiosClientError> {
		let tx = Transaction::from_bytes(tx_bytes.to_vec())
			.map_err(|e| OgmiosClientError::RequestError(format!("{e:?}")))?;
		self.submitted.borrow_mut().push(tx.clone());
		if let Some(result) = &self.submit_result {
			return Ok(result.clone());
		}
		let id = self.apply(&tx)?;
		Ok(SubmitTransactionResponse { transaction: OgmiosTx { id } })
	}
}
