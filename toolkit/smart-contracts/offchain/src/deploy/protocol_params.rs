//! The protocol params UTXO: the protocol NFT locked at the protocol spending validator,
//! with [ProtocolParamsDatum] inlined.
//!
//! Transaction spends a fund UTXO and the UTXO holding the protocol NFT of the wallet.
//! Its metadata records the parameterization of the validators and a deployment summary.
use super::{
	ParamsPublished, ValidatorsDeployed, metadata::deployment_auxiliary_data, select_fund_utxo,
	submit_and_await,
};
use crate::{
	DeployError,
	await_tx::AwaitTx,
	config::{DeploymentSettings, FundSettings},
	csl::{
		AssetIdExt, InputsBuilderExt, OgmiosUtxoExt, TransactionBuilderExt, TransactionContext,
		TransactionOutputAmountBuilderExt, get_builder_config,
	},
	wallet::Wallet,
};
use bond_issue_domain::AssetId;
use bond_issue_plutus_data::protocol_params::ProtocolParamsDatum;
use cardano_serialization_lib::{
	Address, AuxiliaryData, PlutusData, Transaction, TransactionBuilder, TransactionOutputBuilder,
	TxInputsBuilder,
};
use ogmios_client::{
	query_ledger_state::{QueryLedgerState, QueryUtxoByUtxoId},
	query_network::QueryNetwork,
	transactions::Transactions,
	types::OgmiosUtxo,
};

pub async fn publish_protocol_params<
	C: QueryLedgerState + QueryNetwork + Transactions + QueryUtxoByUtxoId,
	A: AwaitTx,
>(
	deployed: ValidatorsDeployed,
	settings: &DeploymentSettings,
	fund_settings: &FundSettings,
	wallet: &Wallet,
	client: &C,
	await_tx: &A,
) -> anyhow::Result<ParamsPublished> {
	let ValidatorsDeployed { identity, scripts, published } = deployed;
	let ctx = TransactionContext::for_wallet(wallet, client).await?.without_asset(&identity.asset);
	let fund = select_fund_utxo(&ctx.payment_key_utxos, fund_settings)?;
	let identity_utxo = (client.query_utxo_by_id(identity.utxo.utxo_id()).await?)
		.filter(|utxo| utxo.get_asset_amount(&identity.asset) == 1)
		.ok_or_else(|| DeployError::nft_not_observed(&identity.asset))?;

	let datum = scripts.protocol_params_datum();
	log::info!("Protocol params datum: {datum:?}");
	let auxiliary_data = deployment_auxiliary_data(settings, &identity, &published)?;
	let protocol_address = scripts.protocol_spending.address(ctx.network);
	let tx = protocol_params_tx(
		&ProtocolParamsOutput { address: &protocol_address, identity: &identity.asset, datum },
		&[fund, identity_utxo],
		&auxiliary_data,
		&ctx,
	)?;
	let utxo = submit_and_await(&tx, &ctx, client, await_tx, "Publish protocol params").await?;
	log::info!(
		"Protocol params published in {} at {}",
		utxo.utxo_id(),
		protocol_address.to_bech32(None)?
	);
	Ok(ParamsPublished { identity, published, datum, protocol_params_utxo: utxo.utxo_id() })
}

struct ProtocolParamsOutput<'a> {
	address: &'a Address,
	identity: &'a AssetId,
	datum: ProtocolParamsDatum,
}

/// Spends `inputs` and pays the protocol NFT with the datum to the protocol address,
/// as the first output.
fn protocol_params_tx(
	output: &ProtocolParamsOutput,
	inputs: &[OgmiosUtxo],
	auxiliary_data: &AuxiliaryData,
	ctx: &TransactionContext,
) -> anyhow::Result<Transaction> {
	let mut tx_builder = TransactionBuilder::new(&get_builder_config(ctx)?);
	let protocol_output = TransactionOutputBuilder::new()
		.with_address(output.address)
		.with_plutus_data(&PlutusData::from(output.datum))
		.next()?
		.with_minimum_ada_and_asset(&output.identity.to_multi_asset(1u64)?, ctx)?
		.build()?;
	tx_builder.add_output(&protocol_output)?;
	tx_builder.set_inputs(&TxInputsBuilder::with_regular_inputs(inputs)?);
	tx_builder.set_auxiliary_data(auxiliary_data);
	Ok(tx_builder.balance_update_and_build(ctx)?)
}
