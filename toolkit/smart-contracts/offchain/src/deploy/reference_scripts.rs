//! Publication of the parameterized validators as reference scripts.
//!
//! Every validator is published by a separate transaction paying to the wallet address,
//! in [ValidatorKind::DEPLOYMENT_ORDER]. A failed publication aborts the deployment
//! without reverting the already published scripts.
use super::{IdentityAcquired, PublishedScript, ValidatorsDeployed, submit_and_await};
use crate::{
	await_tx::AwaitTx,
	config::DeploymentSettings,
	csl::{
		TransactionBuilderExt, TransactionContext, TransactionOutputAmountBuilderExt,
		get_builder_config,
	},
	plutus_script::PlutusScript,
	validators::{BondIssueValidators, ValidatorKind},
	wallet::Wallet,
};
use cardano_serialization_lib::{
	ScriptRef, Transaction, TransactionBuilder, TransactionOutputBuilder,
};
use ogmios_client::{
	query_ledger_state::{QueryLedgerState, QueryUtxoByUtxoId},
	query_network::QueryNetwork,
	transactions::Transactions,
};

pub async fn deploy_validators<
	C: QueryLedgerState + QueryNetwork + Transactions + QueryUtxoByUtxoId,
	A: AwaitTx,
>(
	acquired: IdentityAcquired,
	settings: &DeploymentSettings,
	validators: &BondIssueValidators,
	wallet: &Wallet,
	client: &C,
	await_tx: &A,
) -> anyhow::Result<ValidatorsDeployed> {
	let identity = acquired.identity;
	let scripts = validators.parameterize(identity.owner, &identity.asset, settings)?;
	let mut published = Vec::with_capacity(ValidatorKind::DEPLOYMENT_ORDER.len());
	for (kind, script) in scripts.in_deployment_order() {
		// Outputs of the previous publication have to be visible
		let ctx =
			TransactionContext::for_wallet(wallet, client).await?.without_asset(&identity.asset);
		let tx = publish_script_tx(script, &ctx)?;
		let description = format!("Publish '{}'", kind.title());
		let utxo = submit_and_await(&tx, &ctx, client, await_tx, &description).await?;
		log::info!(
			"Validator '{}' ({}) published in {}",
			kind.title(),
			script.policy_id(),
			utxo.utxo_id()
		);
		published.push(PublishedScript {
			kind,
			script_hash: script.policy_id(),
			reference: utxo.utxo_id(),
		});
	}
	Ok(ValidatorsDeployed { identity, scripts, published })
}

/// Pays minimum ADA with `script` attached as reference script to the wallet, as the first output.
fn publish_script_tx(
	script: &PlutusScript,
	ctx: &TransactionContext,
) -> anyhow::Result<Transaction> {
	let mut tx_builder = TransactionBuilder::new(&get_builder_config(ctx)?);
	let output = TransactionOutputBuilder::new()
		.with_address(&ctx.change_address)
		.with_script_ref(&ScriptRef::new_plutus_script(&script.to_csl()))
		.next()?
		.with_minimum_ada(ctx)?
		.build()?;
	tx_builder.add_output(&output)?;
	Ok(tx_builder.balance_update_and_build(ctx)?)
}
