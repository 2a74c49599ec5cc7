use crate::{blueprint::Blueprint, config::DeploymentSettings, plutus_script::PlutusScript};
use bond_issue_domain::{AssetId, KeyHash};
use bond_issue_plutus_data::{
	bond_config::BondIssueConfig, credentials::StakeCredential, integer,
	protocol_params::ProtocolParamsDatum,
};
use cardano_serialization_lib::PlutusData;

const PROTOCOL_POLICY_TITLE: &str = "protocol.mint_protocol";
const PROTOCOL_PARAMS_ACTION: &str = "protocol_params/types/ProtocolParamsAction";

/// Validators published as reference scripts, in the order of publication
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidatorKind {
	ProtocolSpending,
	BorrowerNftPolicy,
	BorrowRequestPolicy,
	BorrowRequestSpending,
	BondNftPolicy,
	BondNftSpending,
	BondTokenPolicy,
}

impl ValidatorKind {
	pub const DEPLOYMENT_ORDER: [ValidatorKind; 7] = [
		Self::ProtocolSpending,
		Self::BorrowerNftPolicy,
		Self::BorrowRequestPolicy,
		Self::BorrowRequestSpending,
		Self::BondNftPolicy,
		Self::BondNftSpending,
		Self::BondTokenPolicy,
	];

	/// Blueprint title of the validator
	pub fn title(&self) -> &'static str {
		match self {
			Self::ProtocolSpending => "protocol.spend_protocol",
			Self::BorrowerNftPolicy => "request.mint_borrower_nft",
			Self::BorrowRequestPolicy => "request.mint_request_nft",
			Self::BorrowRequestSpending => "request.spend_request",
			Self::BondNftPolicy => "bond.mint_bond_nft",
			Self::BondNftSpending => "bond.spend_bond",
			Self::BondTokenPolicy => "bond.mint_bond_token",
		}
	}
}

/// Builds the protocol validators from blueprint templates.
#[derive(Clone, Debug)]
pub struct BondIssueValidators {
	blueprint: Blueprint,
}

fn key_hash_data(key_hash: KeyHash) -> PlutusData {
	PlutusData::new_bytes(key_hash.0.to_vec())
}

/// Parameters shared by validators bound to a protocol instance
fn protocol_parameters(protocol_nft: &AssetId, config: &BondIssueConfig) -> Vec<PlutusData> {
	vec![
		PlutusData::new_bytes(protocol_nft.policy_id.0.to_vec()),
		PlutusData::new_bytes(protocol_nft.asset_name.as_bytes().to_vec()),
		config.into(),
	]
}

impl BondIssueValidators {
	pub fn new(blueprint: Blueprint) -> Self {
		Self { blueprint }
	}

	/// Minting policy of the protocol NFT, owned by `owner`
	pub fn protocol_policy(&self, owner: KeyHash) -> anyhow::Result<PlutusScript> {
		self.blueprint.build(PROTOCOL_POLICY_TITLE, &[key_hash_data(owner)])
	}

	/// Redeemer of the protocol NFT mint
	pub fn mint_protocol_redeemer(&self) -> anyhow::Result<PlutusData> {
		Ok(self.blueprint.enum_variant(PROTOCOL_PARAMS_ACTION, "MintProtocol")?)
	}

	pub fn protocol_spending(&self, owner: KeyHash) -> anyhow::Result<PlutusScript> {
		self.build(ValidatorKind::ProtocolSpending, vec![key_hash_data(owner)])
	}

	pub fn borrower_nft_policy(&self) -> anyhow::Result<PlutusScript> {
		self.build(ValidatorKind::BorrowerNftPolicy, vec![])
	}

	pub fn borrow_request_policy(
		&self,
		protocol_nft: &AssetId,
		config: &BondIssueConfig,
	) -> anyhow::Result<PlutusScript> {
		self.build(ValidatorKind::BorrowRequestPolicy, protocol_parameters(protocol_nft, config))
	}

	pub fn borrow_request_spending(
		&self,
		protocol_nft: &AssetId,
		config: &BondIssueConfig,
	) -> anyhow::Result<PlutusScript> {
		self.build(ValidatorKind::BorrowRequestSpending, protocol_parameters(protocol_nft, config))
	}

	pub fn bond_nft_policy(
		&self,
		protocol_nft: &AssetId,
		config: &BondIssueConfig,
		redeem_over_epochs: u64,
	) -> anyhow::Result<PlutusScript> {
		let mut parameters = protocol_parameters(protocol_nft, config);
		parameters.push(integer(redeem_over_epochs));
		self.build(ValidatorKind::BondNftPolicy, parameters)
	}

	pub fn bond_nft_spending(
		&self,
		protocol_nft: &AssetId,
		config: &BondIssueConfig,
		default_stake_credential: &StakeCredential,
	) -> anyhow::Result<PlutusScript> {
		let mut parameters = protocol_parameters(protocol_nft, config);
		parameters.push(default_stake_credential.into());
		self.build(ValidatorKind::BondNftSpending, parameters)
	}

	pub fn bond_token_policy(
		&self,
		protocol_nft: &AssetId,
		config: &BondIssueConfig,
	) -> anyhow::Result<PlutusScript> {
		self.build(ValidatorKind::BondTokenPolicy, protocol_parameters(protocol_nft, config))
	}

	/// Instantiates all seven published validators for the protocol identified by `protocol_nft`.
	pub fn parameterize(
		&self,
		owner: KeyHash,
		protocol_nft: &AssetId,
		settings: &DeploymentSettings,
	) -> anyhow::Result<ParameterizedScriptSet> {
		let config = &settings.config;
		Ok(ParameterizedScriptSet {
			protocol_spending: self.protocol_spending(owner)?,
			borrower_nft_policy: self.borrower_nft_policy()?,
			borrow_request_policy: self.borrow_request_policy(protocol_nft, config)?,
			borrow_request_spending: self.borrow_request_spending(protocol_nft, config)?,
			bond_nft_policy: self.bond_nft_policy(
				protocol_nft,
				config,
				settings.redeem_over_epochs,
			)?,
			bond_nft_spending: self.bond_nft_spending(
				protocol_nft,
				config,
				&settings.default_stake_credential,
			)?,
			bond_token_policy: self.bond_token_policy(protocol_nft, config)?,
		})
	}

	fn build(
		&self,
		kind: ValidatorKind,
		parameters: Vec<PlutusData>,
	) -> anyhow::Result<PlutusScript> {
		self.blueprint.build(kind.title(), &parameters)
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterizedScriptSet {
	pub protocol_spending: PlutusScript,
	pub borrower_nft_policy: PlutusScript,
	pub borrow_request_policy: PlutusScript,
	pub borrow_request_spending: PlutusScript,
	pub bond_nft_policy: PlutusScript,
	pub bond_nft_spending: PlutusScript,
	pub bond_token_policy: PlutusScript,
}

impl ParameterizedScriptSet {
	pub fn get(&self, kind: ValidatorKind) -> &PlutusScript {
		match kind {
			ValidatorKind::ProtocolSpending => &self.protocol_spending,
			ValidatorKind::BorrowerNftPolicy => &self.borrower_nft_policy,
			ValidatorKind::BorrowRequestPolicy => &self.borrow_request_policy,
			ValidatorKind::BorrowRequestSpending => &self.borrow_request_spending,
			ValidatorKind::BondNftPolicy => &self.bond_nft_policy,
			ValidatorKind::BondNftSpending => &self.bond_nft_spending,
			ValidatorKind::BondTokenPolicy => &self.bond_token_policy,
		}
	}

	pub fn in_deployment_order(&self) -> impl Iterator<Item = (ValidatorKind, &PlutusScript)> {
		ValidatorKind::DEPLOYMENT_ORDER.into_iter().map(move |kind| (kind, self.get(kind)))
	}

	/// Datum binding the hashes of the published validators
	pub fn protocol_params_datum(&self) -> ProtocolParamsDatum {
		ProtocolParamsDatum {
			bond_nft_pid: self.bond_nft_policy.policy_id(),
			bond_skh: self.bond_nft_spending.policy_id(),
			bond_token_pid: self.bond_token_policy.policy_id(),
			borrower_pid: self.borrower_nft_policy.policy_id(),
			borrow_request_pid: self.borrow_request_policy.policy_id(),
			borrow_request_skh: self.borrow_request_spending.policy_id(),
		}
	}
}
