//! Transaction metadata attached to the protocol params transaction.
//!
//! Label 0 holds everything the validators were parameterized with, label 1 summarizes the
//! deployment. Both are JSON encoded with the `NoConversions` schema, so integers stay integers
//! and every string has to fit in 64 bytes.
use super::{ProtocolIdentity, PublishedScript};
use crate::config::DeploymentSettings;
use bond_issue_plutus_data::{bond_config::BondIssueConfig, credentials::StakeCredential};
use cardano_serialization_lib::{
	AuxiliaryData, GeneralTransactionMetadata, MetadataJsonSchema, TransactionMetadatum,
	encode_json_str_to_metadatum,
};
use serde::Serialize;

pub(crate) const PARAMETERS_LABEL: u64 = 0;
pub(crate) const SUMMARY_LABEL: u64 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParameterizedParams<'a> {
	config: &'a BondIssueConfig,
	default_stake_cred: &'a StakeCredential,
	redeem_over_epochs: u64,
	protocol_nft_pid: String,
	protocol_nft_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentSummary {
	network: String,
	protocol_nft: ProtocolNft,
	validators: Vec<PublishedValidator>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProtocolNft {
	policy_id: String,
	asset_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishedValidator {
	title: &'static str,
	script_hash: String,
	tx_hash: String,
	output_index: u16,
}

fn to_metadatum<T: Serialize>(value: &T) -> anyhow::Result<TransactionMetadatum> {
	let json = serde_json::to_string(value)?;
	Ok(encode_json_str_to_metadatum(json, MetadataJsonSchema::NoConversions)?)
}

pub(crate) fn parameters_metadatum(
	settings: &DeploymentSettings,
	identity: &ProtocolIdentity,
) -> anyhow::Result<TransactionMetadatum> {
	to_metadatum(&ParameterizedParams {
		config: &settings.config,
		default_stake_cred: &settings.default_stake_credential,
		redeem_over_epochs: settings.redeem_over_epochs,
		protocol_nft_pid: identity.asset.policy_id.to_hex_string(),
		protocol_nft_name: identity.asset.asset_name.to_hex_string(),
	})
}

pub(crate) fn summary_metadatum(
	settings: &DeploymentSettings,
	identity: &ProtocolIdentity,
	published: &[PublishedScript],
) -> anyhow::Result<TransactionMetadatum> {
	to_metadatum(&DeploymentSummary {
		network: settings.network.to_string(),
		protocol_nft: ProtocolNft {
			policy_id: identity.asset.policy_id.to_hex_string(),
			asset_name: identity.asset.asset_name.to_hex_string(),
		},
		validators: (published.iter())
			.map(|script| PublishedValidator {
				title: script.kind.title(),
				script_hash: script.script_hash.to_hex_string(),
				tx_hash: hex::encode(script.reference.tx_hash.0),
				output_index: script.reference.index.0,
			})
			.collect(),
	})
}

pub(crate) fn deployment_auxiliary_data(
	settings: &DeploymentSettings,
	identity: &ProtocolIdentity,
	published: &[PublishedScript],
) -> anyhow::Result<AuxiliaryData> {
	let mut metadata = GeneralTransactionMetadata::new();
	metadata.insert(&PARAMETERS_LABEL.into(), &parameters_metadatum(settings, identity)?);
	metadata.insert(&SUMMARY_LABEL.into(), &summary_metadatum(settings, identity, published)?);
	let mut auxiliary_data = AuxiliaryData::new();
	auxiliary_data.set_metadata(&metadata);
	Ok(auxiliary_data)
}
