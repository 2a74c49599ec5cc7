//! Deployment of the protocol is a sequence of three stages, each one a single function:
//!
//! 1. [identity::acquire_identity] mints the protocol NFT, unless the wallet already holds one.
//! 2. [reference_scripts::deploy_validators] publishes seven validators as reference scripts.
//! 3. [protocol_params::publish_protocol_params] locks the protocol NFT at the protocol
//!    spending validator, with the datum binding the hashes of the published validators.
//!
//! Only the first stage is idempotent. A failure of any transaction aborts the deployment.

use crate::{
	DeployError,
	await_tx::AwaitTx,
	config::{DeploymentSettings, FundSettings},
	csl::{NetworkTypeExt, TransactionContext},
	plutus_script::PlutusScript,
	validators::{BondIssueValidators, ParameterizedScriptSet, ValidatorKind},
	wallet::Wallet,
};
use anyhow::{Context, anyhow};
use bond_issue_domain::{AssetId, KeyHash, McTxHash, ScriptHash, UtxoId};
use bond_issue_plutus_data::protocol_params::ProtocolParamsDatum;
use cardano_serialization_lib::Transaction;
use ogmios_client::{
	query_ledger_state::{QueryLedgerState, QueryUtxoByUtxoId},
	query_network::QueryNetwork,
	transactions::Transactions,
	types::OgmiosUtxo,
};

pub mod identity;
mod metadata;
pub mod protocol_params;
pub mod reference_scripts;

/// Protocol NFT held by the deployer wallet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtocolIdentity {
	/// Minting policy of the NFT, parameterized by [Self::owner]
	pub policy: PlutusScript,
	pub asset: AssetId,
	pub owner: KeyHash,
	/// UTXO holding the NFT
	pub utxo: OgmiosUtxo,
}

impl ProtocolIdentity {
	/// Policy id followed by asset name, in hex
	pub fn unit(&self) -> String {
		self.asset.unit()
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityAcquired {
	pub identity: ProtocolIdentity,
	/// UTXO consumed by the mint, `None` when an already minted NFT is reused
	pub minted_from: Option<UtxoId>,
}

/// Validator published as a reference script
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublishedScript {
	pub kind: ValidatorKind,
	pub script_hash: ScriptHash,
	pub reference: UtxoId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorsDeployed {
	pub identity: ProtocolIdentity,
	pub scripts: ParameterizedScriptSet,
	/// In the order of publication
	pub published: Vec<PublishedScript>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamsPublished {
	pub identity: ProtocolIdentity,
	pub published: Vec<PublishedScript>,
	pub datum: ProtocolParamsDatum,
	/// Output holding the protocol NFT and the datum
	pub protocol_params_utxo: UtxoId,
}

impl ParamsPublished {
	pub fn tx_hash(&self) -> McTxHash {
		self.protocol_params_utxo.tx_hash
	}
}

/// Runs all three stages of the deployment.
pub async fn run_deployment<
	C: QueryLedgerState + QueryNetwork + Transactions + QueryUtxoByUtxoId,
	A: AwaitTx,
>(
	settings: &DeploymentSettings,
	fund_settings: &FundSettings,
	validators: &BondIssueValidators,
	wallet: &Wallet,
	client: &C,
	await_tx: &A,
) -> anyhow::Result<ParamsPublished> {
	preflight(settings, fund_settings, wallet, client).await?;
	let acquired =
		identity::acquire_identity(validators, fund_settings, wallet, client, await_tx).await?;
	let deployed = reference_scripts::deploy_validators(
		acquired, settings, validators, wallet, client, await_tx,
	)
	.await?;
	let published = protocol_params::publish_protocol_params(
		deployed,
		settings,
		fund_settings,
		wallet,
		client,
		await_tx,
	)
	.await?;
	log::info!(
		"Protocol deployed. Protocol NFT: {}, protocol params: {}",
		published.identity.unit(),
		published.protocol_params_utxo
	);
	Ok(published)
}

/// Checks that the chain provider serves `settings.network` and reports the wallet funds.
pub async fn preflight<C: QueryLedgerState + QueryNetwork>(
	settings: &DeploymentSettings,
	fund_settings: &FundSettings,
	wallet: &Wallet,
	client: &C,
) -> anyhow::Result<()> {
	let genesis = (client.shelley_genesis_configuration().await)
		.context("Could not query the network served by the chain provider")?;
	let expected = settings.network.network_type();
	if genesis.network != expected {
		return Err(DeployError::Configuration(format!(
			"NETWORK is {} ({expected}), but the chain provider serves {} (magic {})",
			settings.network, genesis.network, genesis.network_magic
		))
		.into());
	}
	let address = wallet.address(expected.to_csl()).to_bech32(None)?;
	let utxos = (client.query_utxos(&[address.clone()]).await)
		.with_context(|| format!("Could not query the deployer wallet UTXOs at {address}"))?;
	let spendable: u64 = (utxos.iter())
		.filter(|utxo| utxo.script.is_none())
		.map(|utxo| utxo.value.lovelace)
		.sum();
	log::info!(
		"Deploying to {} from {address}, UTXOs: {}, spendable lovelace: {spendable}",
		settings.network,
		utxos.len()
	);
	if spendable < fund_settings.recommended_balance() {
		log::warn!(
			"Wallet balance is lower than the recommended {} lovelace, deployment may fail",
			fund_settings.recommended_balance()
		);
	}
	Ok(())
}

/// First pure ADA UTXO with at least `min_fund` lovelace, otherwise the largest pure ADA UTXO.
pub(crate) fn select_fund_utxo(
	utxos: &[OgmiosUtxo],
	fund_settings: &FundSettings,
) -> Result<OgmiosUtxo, DeployError> {
	let pure_ada = utxos.iter().filter(|utxo| utxo.value.is_lovelace_only());
	(pure_ada.clone().find(|utxo| utxo.value.lovelace >= fund_settings.min_fund))
		.or_else(|| pure_ada.max_by_key(|utxo| utxo.value.lovelace))
		.cloned()
		.ok_or_else(|| {
			DeployError::InsufficientFunds(
				"The wallet has no UTXO holding only ADA to fund the transaction".to_string(),
			)
		})
}

/// Signs and submits `tx`, then waits until its first output can be observed.
async fn submit_and_await<C: Transactions + QueryUtxoByUtxoId, A: AwaitTx>(
	tx: &Transaction,
	ctx: &TransactionContext,
	client: &C,
	await_tx: &A,
	description: &str,
) -> anyhow::Result<OgmiosUtxo> {
	let tx_id = submit(tx, ctx, client, description).await?;
	await_tx.await_tx_output(client, UtxoId::new(tx_id.0, 0)).await
}

async fn submit<C: Transactions>(
	tx: &Transaction,
	ctx: &TransactionContext,
	client: &C,
	description: &str,
) -> anyhow::Result<McTxHash> {
	let signed_tx = ctx.sign(tx).to_bytes();
	let res = client.submit_transaction(&signed_tx).await.map_err(|e| {
		anyhow!(
			"{description} transaction request failed: {e}, tx bytes: {}",
			hex::encode(&signed_tx)
		)
	})?;
	let tx_id = res.transaction.hash();
	log::info!("{description} transaction submitted: {tx_id}");
	Ok(tx_id)
}
