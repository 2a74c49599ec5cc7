use crate::plutus_script::PlutusScript;
use crate::wallet::Wallet;
use anyhow::Context;
use bond_issue_domain::{AssetId, NetworkType};
use cardano_serialization_lib::*;
use fraction::{FromPrimitive, Ratio};
use ogmios_client::{
	query_ledger_state::{
		CostModels, ExecutionPrices, ProtocolParameters, QueryLedgerState, ReferenceScriptFees,
	},
	query_network::QueryNetwork,
	transactions::{RedeemerBudget, Transactions},
	types::{OgmiosUtxo, OgmiosValue},
};
use std::collections::HashMap;

pub(crate) fn plutus_script_hash(script_bytes: &[u8], language: Language) -> [u8; 28] {
	// Before hashing the script, we need to prepend with byte denoting the language.
	let mut buf: Vec<u8> = vec![language_to_u8(language)];
	buf.extend(script_bytes);
	bond_issue_domain::crypto::blake2b(buf.as_slice())
}

/// Builds a CSL [Address] for plutus script from the data obtained from smart contracts.
pub fn script_address(script_bytes: &[u8], network: NetworkIdKind, language: Language) -> Address {
	let script_hash = plutus_script_hash(script_bytes, language);
	EnterpriseAddress::new(
		network_id_kind_to_u8(network),
		&Credential::from_scripthash(&script_hash.into()),
	)
	.to_address()
}

/// Builds a CSL base [Address] with key payment and key stake credentials.
pub fn base_key_address(
	payment_key_hash: &Ed25519KeyHash,
	stake_key_hash: &Ed25519KeyHash,
	network: NetworkIdKind,
) -> Address {
	BaseAddress::new(
		network_id_kind_to_u8(network),
		&Credential::from_keyhash(payment_key_hash),
		&Credential::from_keyhash(stake_key_hash),
	)
	.to_address()
}

/// Extension trait for [NetworkType].
pub trait NetworkTypeExt {
	/// Converts [NetworkType] to CSL [NetworkIdKind].
	fn to_csl(&self) -> NetworkIdKind;
}

impl NetworkTypeExt for NetworkType {
	fn to_csl(&self) -> NetworkIdKind {
		match self {
			Self::Mainnet => NetworkIdKind::Mainnet,
			Self::Testnet => NetworkIdKind::Testnet,
		}
	}
}

fn network_id_kind_to_u8(network: NetworkIdKind) -> u8 {
	match network {
		NetworkIdKind::Mainnet => 1,
		NetworkIdKind::Testnet => 0,
	}
}

fn language_to_u8(language: Language) -> u8 {
	match language.kind() {
		LanguageKind::PlutusV1 => 1,
		LanguageKind::PlutusV2 => 2,
		LanguageKind::PlutusV3 => 3,
	}
}

/// Transaction builder configuration from the current protocol parameters,
/// including the Conway fee for reference scripts.
pub(crate) fn get_builder_config(
	context: &TransactionContext,
) -> Result<TransactionBuilderConfig, JsError> {
	let params = &context.protocol_parameters;
	TransactionBuilderConfigBuilder::new()
		.fee_algo(&linear_fee(params))
		.pool_deposit(&params.stake_pool_deposit.into())
		.key_deposit(&params.stake_credential_deposit.into())
		.max_value_size(params.max_value_size)
		.max_tx_size(params.max_transaction_size)
		.ex_unit_prices(&ex_unit_prices(&params.script_execution_prices))
		.coins_per_utxo_byte(&params.min_utxo_deposit_coefficient.into())
		.ref_script_coins_per_byte(&reference_script_coins_per_byte(
			&params.reference_script_fees,
		)?)
		.deduplicate_explicit_ref_inputs_with_regular_inputs(true)
		.build()
}

fn linear_fee(params: &ProtocolParameters) -> LinearFee {
	LinearFee::new(&params.min_fee_coefficient.into(), &params.min_fee_constant.into())
}

fn unit_interval(ratio: &Ratio<u64>) -> UnitInterval {
	UnitInterval::new(&(*ratio.numer()).into(), &(*ratio.denom()).into())
}

fn ex_unit_prices(prices: &ExecutionPrices) -> ExUnitPrices {
	ExUnitPrices::new(&unit_interval(&prices.memory), &unit_interval(&prices.cpu))
}

/// Extension trait for [OgmiosValue].
pub trait OgmiosValueExt {
	/// Converts [OgmiosValue] to CSL [cardano_serialization_lib::Value].
	fn to_csl(&self) -> Result<Value, JsError>;
}

impl OgmiosValueExt for OgmiosValue {
	fn to_csl(&self) -> Result<Value, JsError> {
		let coin = BigNum::from(self.lovelace);
		if self.is_lovelace_only() {
			return Ok(Value::new(&coin));
		}
		let mut multiasset = MultiAsset::new();
		for (policy_id, tokens) in &self.native_tokens {
			let mut assets = Assets::new();
			for (name, amount) in tokens {
				assets.insert(&name.to_csl()?, &(*amount).into());
			}
			multiasset.insert(&policy_id.0.into(), &assets);
		}
		Ok(Value::new_with_assets(&coin, &multiasset))
	}
}

/// Cost models of the Plutus languages known to CSL, other languages are skipped
pub(crate) fn convert_cost_models(cost_models: &CostModels) -> Costmdls {
	let mut mdls = Costmdls::new();
	for (name, language) in [
		("plutus:v1", Language::new_plutus_v1()),
		("plutus:v2", Language::new_plutus_v2()),
		("plutus:v3", Language::new_plutus_v3()),
	] {
		if let Some(model) = cost_models.get(name) {
			mdls.insert(&language, &CostModel::from(model.to_vec()));
		}
	}
	mdls
}

pub(crate) fn reference_script_coins_per_byte(
	fees: &ReferenceScriptFees,
) -> Result<UnitInterval, JsError> {
	let ratio = Ratio::<u64>::from_f64(fees.base).ok_or_else(|| {
		JsError::from_str(&format!("Reference script fee {} is not a u64 ratio", fees.base))
	})?;
	Ok(unit_interval(&ratio))
}

/// Execution units of the minting policies of a transaction
pub(crate) enum Costs {
	/// Before the first evaluation every policy runs with zero units
	Unevaluated,
	Evaluated(HashMap<ScriptHash, ExUnits>),
}

impl Costs {
	pub(crate) fn get_mint(&self, script: &PlutusScript) -> Result<ExUnits, JsError> {
		let Costs::Evaluated(mints) = self else {
			return Ok(zero_ex_units());
		};
		mints.get(&script.csl_script_hash()).cloned().ok_or_else(|| {
			JsError::from_str(&format!(
				"Evaluation returned no budget for minting policy {}",
				script.policy_id()
			))
		})
	}

	/// Builds the transaction with `make_tx` three times: with zero units, then twice with the
	/// units Ogmios evaluated for the previous build.
	pub(crate) async fn calculate_costs<T: Transactions, F>(
		make_tx: F,
		client: &T,
	) -> anyhow::Result<Transaction>
	where
		F: Fn(Costs) -> anyhow::Result<Transaction>,
	{
		let mut tx = make_tx(Costs::Unevaluated)?;
		for _ in 0..2 {
			tx = make_tx(Self::evaluate(&tx, client).await?)?;
		}
		Ok(tx)
	}

	async fn evaluate<T: Transactions>(tx: &Transaction, client: &T) -> anyhow::Result<Costs> {
		let policies = tx.body().mint().map(|mint| mint.keys());
		let budgets = client.evaluate_transaction(&tx.to_bytes()).await?;
		let mut mints = HashMap::new();
		for RedeemerBudget { validator, budget } in budgets {
			if !validator.is_mint() {
				continue;
			}
			let index = validator.index as usize;
			let policy = (policies.as_ref())
				.filter(|policies| index < policies.len())
				.map(|policies| policies.get(index))
				.ok_or_else(|| {
					anyhow::anyhow!("Evaluation returned a budget of unknown minting policy #{index}")
				})?;
			mints.insert(policy, ExUnits::new(&budget.memory.into(), &budget.cpu.into()));
		}
		Ok(Costs::Evaluated(mints))
	}
}

fn zero_ex_units() -> ExUnits {
	ExUnits::new(&BigNum::zero(), &BigNum::zero())
}

pub(crate) trait OgmiosUtxoExt {
	fn to_csl_tx_input(&self) -> TransactionInput;
	fn to_csl_tx_output(&self) -> Result<TransactionOutput, JsError>;
	fn to_csl(&self) -> Result<TransactionUnspentOutput, JsError>;

	fn get_asset_amount(&self, asset: &AssetId) -> u64;

	fn get_plutus_data(&self) -> Option<PlutusData>;
}

impl OgmiosUtxoExt for OgmiosUtxo {
	fn to_csl_tx_input(&self) -> TransactionInput {
		TransactionInput::new(&TransactionHash::from(self.transaction.id), self.index.into())
	}

	fn to_csl_tx_output(&self) -> Result<TransactionOutput, JsError> {
		let mut tx_out = TransactionOutput::new(
			&Address::from_bech32(&self.address).map_err(|e| {
				JsError::from_str(&format!("Couldn't convert address from ogmios: '{}'", e))
			})?,
			&self.value.to_csl()?,
		);
		// Native script references are dropped
		if let Some(script) = (self.script.clone()).and_then(|s| PlutusScript::try_from(s).ok()) {
			tx_out.set_script_ref(&ScriptRef::new_plutus_script(&script.to_csl()));
		}
		if let Some(data) = self.get_plutus_data() {
			tx_out.set_plutus_data(&data);
		}
		Ok(tx_out)
	}

	fn to_csl(&self) -> Result<TransactionUnspentOutput, JsError> {
		Ok(TransactionUnspentOutput::new(&self.to_csl_tx_input(), &self.to_csl_tx_output()?))
	}

	fn get_asset_amount(&self, asset_id: &AssetId) -> u64 {
		self.token_amount(asset_id)
	}

	fn get_plutus_data(&self) -> Option<PlutusData> {
		PlutusData::from_bytes(self.datum.clone()?).ok()
	}
}

pub(crate) struct TransactionContext {
	/// This key is added as required signer and used to sign the transaction.
	pub(crate) payment_key: PrivateKey,
	/// Used to pay for the transaction fees and uncovered transaction inputs
	/// and as source of collateral inputs.
	/// Outputs carrying reference scripts are never part of this set.
	pub(crate) payment_key_utxos: Vec<OgmiosUtxo>,
	pub(crate) network: NetworkIdKind,
	pub(crate) protocol_parameters: ProtocolParameters,
	pub(crate) change_address: Address,
}

impl TransactionContext {
	/// Gets `TransactionContext` with spendable UTXOs of the wallet base address
	/// and the protocol parameters in effect.
	pub(crate) async fn for_wallet<C: QueryLedgerState + QueryNetwork>(
		wallet: &Wallet,
		client: &C,
	) -> Result<TransactionContext, anyhow::Error> {
		let network = client.shelley_genesis_configuration().await?.network.to_csl();
		let protocol_parameters = (client.query_protocol_parameters().await)
			.context("Could not query the protocol parameters for deployment transactions")?;
		let address = wallet.address(network);
		let payment_key_utxos = (client.query_utxos(&[address.to_bech32(None)?]).await)
			.context("Could not query the deployer wallet UTXOs")?
			.into_iter()
			.filter(|utxo| utxo.script.is_none())
			.collect();
		Ok(TransactionContext {
			payment_key: wallet.payment_key(),
			payment_key_utxos,
			network,
			protocol_parameters,
			change_address: address,
		})
	}

	/// Removes UTXOs holding `asset` from the spendable set.
	pub(crate) fn without_asset(self, asset: &AssetId) -> Self {
		let payment_key_utxos = (self.payment_key_utxos.into_iter())
			.filter(|utxo| utxo.get_asset_amount(asset) == 0)
			.collect();
		Self { payment_key_utxos, ..self }
	}

	pub(crate) fn payment_key_hash(&self) -> Ed25519KeyHash {
		self.payment_key.to_public().hash()
	}

	pub(crate) fn sign(&self, tx: &Transaction) -> Transaction {
		let tx_hash: [u8; 32] = bond_issue_domain::crypto::blake2b(tx.body().to_bytes().as_ref());
		let signature = self.payment_key.sign(&tx_hash);
		let mut witness_set = tx.witness_set();
		let mut vkeywitnesses = witness_set.vkeys().unwrap_or_else(Vkeywitnesses::new);
		vkeywitnesses.add(&Vkeywitness::new(&Vkey::new(&self.payment_key.to_public()), &signature));
		witness_set.set_vkeys(&vkeywitnesses);
		Transaction::new(&tx.body(), &witness_set, tx.auxiliary_data())
	}
}

pub(crate) trait OgmiosUtxosExt {
	fn to_csl(&self) -> Result<TransactionUnspentOutputs, JsError>;
}

impl OgmiosUtxosExt for [OgmiosUtxo] {
	fn to_csl(&self) -> Result<TransactionUnspentOutputs, JsError> {
		let mut utxos = TransactionUnspentOutputs::new();
		for utxo in self {
			utxos.add(&utxo.to_csl()?);
		}
		Ok(utxos)
	}
}

pub(crate) trait TransactionBuilderExt {
	/// Adds ogmios inputs as collateral inputs to the tx builder.
	fn add_collateral_inputs(
		&mut self,
		ctx: &TransactionContext,
		inputs: &[OgmiosUtxo],
	) -> Result<(), JsError>;

	/// Adds minting of 1 token of the given script
	fn add_mint_one_script_token(
		&mut self,
		script: &PlutusScript,
		asset_name: &AssetName,
		redeemer_data: &PlutusData,
		ex_units: &ExUnits,
	) -> Result<(), JsError>;

	/// Sets the payment key as required signer and balances the transaction
	/// using the spendable UTXOs of `ctx`.
	/// Collateral is added only when the transaction executes scripts,
	/// using quite a simple algorithm.
	fn balance_update_and_build(
		&mut self,
		ctx: &TransactionContext,
	) -> Result<Transaction, JsError>;
}

impl TransactionBuilderExt for TransactionBuilder {
	fn add_collateral_inputs(
		&mut self,
		ctx: &TransactionContext,
		inputs: &[OgmiosUtxo],
	) -> Result<(), JsError> {
		let mut collateral_builder = TxInputsBuilder::new();
		for utxo in inputs.iter() {
			collateral_builder.add_regular_input(
				&ctx.change_address,
				&utxo.to_csl_tx_input(),
				&utxo.value.to_csl()?,
			)?;
		}
		self.set_collateral(&collateral_builder);
		Ok(())
	}

	fn add_mint_one_script_token(
		&mut self,
		script: &PlutusScript,
		asset_name: &AssetName,
		redeemer_data: &PlutusData,
		ex_units: &ExUnits,
	) -> Result<(), JsError> {
		let mut mint_builder = self.get_mint_builder().unwrap_or(MintBuilder::new());

		let validator_source = PlutusScriptSource::new(&script.to_csl());
		let mint_witness = MintWitness::new_plutus_script(
			&validator_source,
			&Redeemer::new(&RedeemerTag::new_mint(), &0u32.into(), redeemer_data, ex_units),
		);
		mint_builder.add_asset(&mint_witness, asset_name, &Int::new_i32(1))?;
		self.set_mint_builder(&mint_builder);
		Ok(())
	}

	fn balance_update_and_build(
		&mut self,
		ctx: &TransactionContext,
	) -> Result<Transaction, JsError> {
		fn max_possible_collaterals(ctx: &TransactionContext) -> Vec<OgmiosUtxo> {
			let mut utxos: Vec<OgmiosUtxo> = (ctx.payment_key_utxos.iter())
				.filter(|utxo| utxo.value.is_lovelace_only())
				.cloned()
				.collect();
			utxos.sort_by(|a, b| b.value.lovelace.cmp(&a.value.lovelace));
			let max_inputs = ctx.protocol_parameters.max_collateral_inputs as usize;
			utxos.into_iter().take(max_inputs).collect()
		}
		// Tries to balance tx with given collateral inputs
		fn try_balance(
			builder: &mut TransactionBuilder,
			collateral_inputs: &[OgmiosUtxo],
			ctx: &TransactionContext,
		) -> Result<Transaction, JsError> {
			builder.add_required_signer(&ctx.payment_key_hash());
			if collateral_inputs.is_empty() {
				builder.add_inputs_from_and_change(
					&ctx.payment_key_utxos.to_csl()?,
					CoinSelectionStrategyCIP2::LargestFirstMultiAsset,
					&ChangeConfig::new(&ctx.change_address),
				)?;
			} else {
				builder.add_collateral_inputs(ctx, collateral_inputs)?;
				// Fake script data hash is required for proper fee computation
				builder.set_script_data_hash(&[0u8; 32].into());
				builder.add_inputs_from_and_change_with_collateral_return(
					&ctx.payment_key_utxos.to_csl()?,
					CoinSelectionStrategyCIP2::LargestFirstMultiAsset,
					&ChangeConfig::new(&ctx.change_address),
					&ctx.protocol_parameters.collateral_percentage.into(),
				)?;
				builder.calc_script_data_hash(&convert_cost_models(
					&ctx.protocol_parameters.plutus_cost_models,
				))?;
			}
			builder.build_tx()
		}
		// Without scripts the first attempt succeeds with no collateral.
		// Otherwise collateral grows by one UTXO, largest first, until balancing succeeds.
		let mut selected = vec![];
		for input in max_possible_collaterals(ctx) {
			let mut builder = self.clone();
			let result = try_balance(&mut builder, &selected, ctx);
			if result.is_ok() {
				return result;
			}
			selected.push(input);
		}

		try_balance(self, &selected, ctx)
			.map_err(|e| {
				JsError::from_str(&format!(
					"Could not balance transaction, the wallet funds do not cover outputs, fee and collateral: {e}"
				))
			})
	}
}

pub(crate) trait TransactionOutputAmountBuilderExt: Sized {
	fn get_minimum_ada(&self, ctx: &TransactionContext) -> Result<BigNum, JsError>;
	fn with_minimum_ada(self, ctx: &TransactionContext) -> Result<Self, JsError>;
	fn with_minimum_ada_and_asset(
		self,
		ma: &MultiAsset,
		ctx: &TransactionContext,
	) -> Result<Self, JsError>;
}

impl TransactionOutputAmountBuilderExt for TransactionOutputAmountBuilder {
	fn get_minimum_ada(&self, ctx: &TransactionContext) -> Result<BigNum, JsError> {
		MinOutputAdaCalculator::new(
			&self.build()?,
			&DataCost::new_coins_per_byte(
				&ctx.protocol_parameters.min_utxo_deposit_coefficient.into(),
			),
		)
		.calculate_ada()
	}

	fn with_minimum_ada(self, ctx: &TransactionContext) -> Result<Self, JsError> {
		let min_ada = self.with_coin(&0u64.into()).get_minimum_ada(ctx)?;
		Ok(self.with_coin(&min_ada))
	}

	fn with_minimum_ada_and_asset(
		self,
		ma: &MultiAsset,
		ctx: &TransactionContext,
	) -> Result<Self, JsError> {
		let min_ada = self.with_coin_and_asset(&0u64.into(), ma).get_minimum_ada(ctx)?;
		Ok(self.with_coin_and_asset(&min_ada, ma))
	}
}

pub(crate) trait InputsBuilderExt: Sized {
	/// Adds ogmios inputs to the tx inputs builder.
	fn add_regular_inputs(&mut self, utxos: &[OgmiosUtxo]) -> Result<(), JsError>;

	fn with_regular_inputs(utxos: &[OgmiosUtxo]) -> Result<Self, JsError>;
}

impl InputsBuilderExt for TxInputsBuilder {
	fn add_regular_inputs(&mut self, utxos: &[OgmiosUtxo]) -> Result<(), JsError> {
		for utxo in utxos.iter() {
			self.add_regular_utxo(&utxo.to_csl()?)?;
		}
		Ok(())
	}

	fn with_regular_inputs(utxos: &[OgmiosUtxo]) -> Result<Self, JsError> {
		let mut tx_input_builder = Self::new();
		tx_input_builder.add_regular_inputs(utxos)?;
		Ok(tx_input_builder)
	}
}

pub(crate) trait AssetNameExt {
	fn to_csl(&self) -> Result<cardano_serialization_lib::AssetName, JsError>;
}

impl AssetNameExt for bond_issue_domain::AssetName {
	fn to_csl(&self) -> Result<cardano_serialization_lib::AssetName, JsError> {
		cardano_serialization_lib::AssetName::new(self.as_bytes().to_vec())
	}
}

pub(crate) trait AssetIdExt {
	fn to_multi_asset(&self, amount: impl Into<BigNum>) -> Result<MultiAsset, JsError>;
}

impl AssetIdExt for AssetId {
	fn to_multi_asset(&self, amount: impl Into<BigNum>) -> Result<MultiAsset, JsError> {
		let mut ma = MultiAsset::new();
		let mut assets = Assets::new();
		assets.insert(&self.asset_name.to_csl()?, &amount.into());
		ma.insert(&self.policy_id.0.into(), &assets);
		Ok(ma)
	}
}
