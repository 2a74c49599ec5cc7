//! Protocol NFT: the single token identifying the deployed protocol instance.
//!
//! Its minting policy is parameterized by the deployer's payment key hash and the asset name
//! is derived from the UTXO spent by the minting transaction, so each mint is unique.
use super::{IdentityAcquired, ProtocolIdentity, select_fund_utxo, submit};
use crate::{
	DeployError,
	await_tx::AwaitTx,
	config::FundSettings,
	csl::{
		AssetIdExt, AssetNameExt, Costs, InputsBuilderExt, OgmiosUtxoExt, TransactionBuilderExt,
		TransactionContext, TransactionOutputAmountBuilderExt, get_builder_config,
	},
	plutus_script::PlutusScript,
	validators::BondIssueValidators,
	wallet::Wallet,
};
use bond_issue_domain::{AssetId, KeyHash, UtxoId};
use bond_issue_plutus_data::output_reference::unique_asset_name;
use cardano_serialization_lib::{
	PlutusData, Transaction, TransactionBuilder, TransactionOutputBuilder, TxInputsBuilder,
};
use ogmios_client::{
	query_ledger_state::{QueryLedgerState, QueryUtxoByUtxoId},
	query_network::QueryNetwork,
	transactions::Transactions,
	types::OgmiosUtxo,
};

/// Returns the protocol NFT of the wallet, minting it first if the wallet holds none.
pub async fn acquire_identity<
	C: QueryLedgerState + QueryNetwork + Transactions + QueryUtxoByUtxoId,
	A: AwaitTx,
>(
	validators: &BondIssueValidators,
	fund_settings: &FundSettings,
	wallet: &Wallet,
	client: &C,
	await_tx: &A,
) -> anyhow::Result<IdentityAcquired> {
	let owner = wallet.payment_key_hash();
	let policy = validators.protocol_policy(owner)?;
	log::info!("Protocol NFT policy id: {}", policy.policy_id());
	let ctx = TransactionContext::for_wallet(wallet, client).await?;

	if let Some(identity) = find_identity(&ctx.payment_key_utxos, &policy, owner) {
		log::info!(
			"Wallet already holds protocol NFT '{}' in {}, skipping the mint",
			identity.unit(),
			identity.utxo.utxo_id()
		);
		return Ok(IdentityAcquired { identity, minted_from: None });
	}

	let seed = select_fund_utxo(&ctx.payment_key_utxos, fund_settings)?;
	let asset = policy.asset(unique_asset_name(&seed.utxo_id()));
	let redeemer = validators.mint_protocol_redeemer()?;
	let tx = Costs::calculate_costs(
		|costs| mint_identity_tx(&policy, &asset, &redeemer, &seed, costs, &ctx),
		client,
	)
	.await?;

	let tx_id = submit(&tx, &ctx, client, "Mint protocol NFT").await?;
	let utxo = await_tx.await_tx_output(client, UtxoId::new(tx_id.0, 0)).await.map_err(|e| {
		log::error!("Output of the protocol NFT mint was not observed: {e}");
		DeployError::nft_not_observed(&asset)
	})?;
	if utxo.get_asset_amount(&asset) != 1 {
		return Err(DeployError::nft_not_observed(&asset).into());
	}
	log::info!("Protocol NFT '{}' minted", asset.unit());
	Ok(IdentityAcquired {
		identity: ProtocolIdentity { policy, asset, owner, utxo },
		minted_from: Some(seed.utxo_id()),
	})
}

/// Finds a UTXO holding exactly one token of `policy`.
///
/// UTXOs carrying reference scripts are not considered.
pub(crate) fn find_identity(
	utxos: &[OgmiosUtxo],
	policy: &PlutusScript,
	owner: KeyHash,
) -> Option<ProtocolIdentity> {
	(utxos.iter()).filter(|utxo| utxo.script.is_none()).find_map(|utxo| {
		let (name, _) = utxo.value.tokens_of(policy.policy_id()).find(|(_, amount)| *amount == 1)?;
		Some(ProtocolIdentity {
			policy: policy.clone(),
			asset: policy.asset(name.clone()),
			owner,
			utxo: utxo.clone(),
		})
	})
}

/// Spends `seed` and mints one protocol NFT to the wallet, as the first output.
fn mint_identity_tx(
	policy: &PlutusScript,
	asset: &AssetId,
	redeemer: &PlutusData,
	seed: &OgmiosUtxo,
	costs: Costs,
	ctx: &TransactionContext,
) -> anyhow::Result<Transaction> {
	let mut tx_builder = TransactionBuilder::new(&get_builder_config(ctx)?);
	tx_builder.add_mint_one_script_token(
		policy,
		&asset.asset_name.to_csl()?,
		redeemer,
		&costs.get_mint(policy)?,
	)?;
	let output = TransactionOutputBuilder::new()
		.with_address(&ctx.change_address)
		.next()?
		.with_minimum_ada_and_asset(&asset.to_multi_asset(1u64)?, ctx)?
		.build()?;
	tx_builder.add_output(&output)?;
	tx_builder.set_inputs(&TxInputsBuilder::with_regular_inputs(&[seed.clone()])?);
	Ok(tx_builder.balance_update_and_build(ctx)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_values::{make_utxo, payment_addr, test_policy, test_validator_template};
	use bond_issue_domain::AssetName;
	use pretty_assertions::assert_eq;

	const OWNER: KeyHash = KeyHash([9; 28]);

	fn holding(utxo: OgmiosUtxo, policy: &PlutusScript, name: [u8; 32], amount: u64) -> OgmiosUtxo {
		let asset = policy.asset(AssetName::from(name));
		OgmiosUtxo { value: utxo.value.with_token(&asset, amount), ..utxo }
	}

	#[test]
	fn finds_single_token_of_policy() {
		let policy = test_policy();
		let utxos = vec![
			make_utxo(1, 0, 5_000_000, &payment_addr()),
			holding(make_utxo(2, 0, 2_000_000, &payment_addr()), &policy, [7; 32], 1),
		];
		let identity = find_identity(&utxos, &policy, OWNER).unwrap();
		assert_eq!(identity.asset, policy.asset(AssetName::from([7; 32])));
		assert_eq!(identity.utxo, utxos[1]);
		assert_eq!(identity.owner, OWNER);
	}

	#[test]
	fn ignores_utxos_with_reference_scripts() {
		let policy = test_policy();
		let mut utxo = holding(make_utxo(2, 0, 2_000_000, &payment_addr()), &policy, [7; 32], 1);
		utxo.script = Some(test_validator_template().into());
		assert_eq!(find_identity(&[utxo], &policy, OWNER), None);
	}

	#[test]
	fn ignores_other_policies_and_quantities() {
		let policy = test_policy();
		let other = test_validator_template();
		let utxos = vec![
			holding(make_utxo(1, 0, 2_000_000, &payment_addr()), &other, [7; 32], 1),
			holding(make_utxo(2, 0, 2_000_000, &payment_addr()), &policy, [7; 32], 2),
		];
		assert_eq!(find_identity(&utxos, &policy, OWNER), None);
	}

	#[test]
	fn seed_reference_determines_asset_name() {
		let policy = test_policy();
		let first = policy.asset(unique_asset_name(&UtxoId::new([1; 32], 0)));
		let second = policy.asset(unique_asset_name(&UtxoId::new([1; 32], 1)));
		assert!(first != second);
		assert_eq!(first.asset_name.as_bytes().len(), 32);
	}
}
