//! Script evaluation and submission of transactions.

use crate::{OgmiosClient, OgmiosClientError, OgmiosParams, types::OgmiosTx};
use serde::Deserialize;
use serde_json::json;

pub trait Transactions {
	/// Execution budgets of every redeemer of the CBOR encoded transaction.
	/// All of its inputs have to be on chain.
	#[allow(async_fn_in_trait)]
	async fn evaluate_transaction(
		&self,
		tx_bytes: &[u8],
	) -> Result<Vec<RedeemerBudget>, OgmiosClientError>;

	/// Submits the CBOR encoded, signed transaction.
	#[allow(async_fn_in_trait)]
	async fn submit_transaction(
		&self,
		tx_bytes: &[u8],
	) -> Result<SubmitTransactionResponse, OgmiosClientError>;
}

fn transaction_param(tx_bytes: &[u8]) -> Result<OgmiosParams, OgmiosClientError> {
	OgmiosParams::default().with("transaction", json!({ "cbor": hex::encode(tx_bytes) }))
}

impl<T: OgmiosClient> Transactions for T {
	async fn evaluate_transaction(
		&self,
		tx_bytes: &[u8],
	) -> Result<Vec<RedeemerBudget>, OgmiosClientError> {
		self.request("evaluateTransaction", transaction_param(tx_bytes)?).await
	}

	async fn submit_transaction(
		&self,
		tx_bytes: &[u8],
	) -> Result<SubmitTransactionResponse, OgmiosClientError> {
		self.request("submitTransaction", transaction_param(tx_bytes)?).await
	}
}

/// Execution units evaluated for the redeemer of `validator`
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RedeemerBudget {
	pub validator: RedeemerPointer,
	pub budget: ExecutionUnits,
}

impl RedeemerBudget {
	/// Budget of the minting policy at `index` of the sorted policy ids of the transaction
	pub fn mint(index: u32, memory: u64, cpu: u64) -> Self {
		Self {
			validator: RedeemerPointer { purpose: MINT.to_string(), index },
			budget: ExecutionUnits { memory, cpu },
		}
	}
}

const MINT: &str = "mint";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RedeemerPointer {
	/// `spend`, `mint`, `publish`, `withdraw`, `vote` or `propose`
	pub purpose: String,
	pub index: u32,
}

impl RedeemerPointer {
	pub fn is_mint(&self) -> bool {
		self.purpose == MINT
	}
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct ExecutionUnits {
	pub memory: u64,
	pub cpu: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SubmitTransactionResponse {
	pub transaction: OgmiosTx,
}
