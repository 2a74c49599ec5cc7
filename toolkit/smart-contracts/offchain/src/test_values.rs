use crate::{
	blueprint::Blueprint, plutus_script::PlutusScript, validators::BondIssueValidators,
	wallet::Wallet,
};
use bond_issue_domain::NetworkType;
use bond_issue_plutus_data::{constr, integer};
use cardano_serialization_lib::{Address, Language, PlutusData, PrivateKey};
use hex_literal::hex;
use ogmios_client::{
	query_ledger_state::{CostModels, ExecutionPrices, ProtocolParameters, ReferenceScriptFees},
	query_network::GenesisConfiguration,
	types::{OgmiosTx, OgmiosUtxo, OgmiosValue},
};
use serde_json::{Value, json};
use std::collections::BTreeMap;

pub(crate) const TEST_SEED_PHRASE: &str =
	"test walk nut penalty hip pave soap entry language right filter choice";

pub(crate) fn test_wallet() -> Wallet {
	Wallet::from_seed_phrase(TEST_SEED_PHRASE).unwrap()
}

pub(crate) fn payment_key() -> PrivateKey {
	PrivateKey::from_normal_bytes(&hex!(
		"cf86dc85e4933424826e846c18d2695689bf65de1fc0c40fcd9389ba1cbdc069"
	))
	.unwrap()
}

/// Enterprise address of [payment_key]
pub(crate) const PAYMENT_ADDR: &str = "addr_test1vqezxrh24ts0775hulcg3ejcwj7hns8792vnn8met6z9gwsxt87zy";

pub(crate) fn payment_addr() -> Address {
	Address::from_bech32(PAYMENT_ADDR).unwrap()
}

pub(crate) fn test_policy() -> PlutusScript {
	PlutusScript::from_cbor(&hex!("49480100002221200101"), Language::new_plutus_v2())
}

/// Always succeeding PlutusV2 validator taking one parameter
pub(crate) const BASE_VALIDATOR_CBOR: [u8; 315] = hex!("590138010000323322323322323232322222533553353232323233012225335001100f2215333573466e3c014dd7001080909802000980798051bac330033530040022200148040dd7198011a980180311000a4010660026a600400644002900019112999ab9a33710002900009805a4810350543600133003001002300f22253350011300b49103505437002215333573466e1d20000041002133005337020089001000919199109198008018011aab9d001300735573c0026ea80044028402440204c01d2401035054350030092233335573e0024016466a0146ae84008c00cd5d100124c6010446666aae7c00480288cd4024d5d080118019aba20024988c98cd5ce00080109000891001091000980191299a800880211099a80280118020008910010910911980080200191918008009119801980100100081");

pub(crate) fn test_validator_template() -> PlutusScript {
	PlutusScript::from_cbor(&BASE_VALIDATOR_CBOR, Language::new_plutus_v2())
}

pub(crate) fn test_plutus_data() -> PlutusData {
	PlutusData::new_bytes(vec![1, 2, 3, 4])
}

pub(crate) fn unit_plutus_data() -> PlutusData {
	constr(0, vec![])
}

pub(crate) fn protocol_parameters() -> ProtocolParameters {
	ProtocolParameters {
		min_fee_coefficient: 44,
		min_fee_constant: 155381,
		reference_script_fees: ReferenceScriptFees { base: 15.0 },
		stake_pool_deposit: 500000000,
		stake_credential_deposit: 2000000,
		max_value_size: 5000,
		max_transaction_size: 16384,
		min_utxo_deposit_coefficient: 4310,
		collateral_percentage: 150,
		max_collateral_inputs: 3,
		script_execution_prices: ExecutionPrices {
			memory: fraction::Ratio::new_raw(577, 10000),
			cpu: fraction::Ratio::new_raw(721, 10000000),
		},
		plutus_cost_models: CostModels(BTreeMap::from([
			("plutus:v1".to_string(), vec![898148, 53384111, 14333]),
			("plutus:v2".to_string(), vec![43053543, 10]),
			("plutus:v3".to_string(), vec![-900, 166917843]),
		])),
	}
}

pub(crate) fn shelley_config() -> GenesisConfiguration {
	GenesisConfiguration { network: NetworkType::Testnet, network_magic: 2 }
}

pub(crate) fn make_utxo(id_byte: u8, index: u16, lovelace: u64, addr: &Address) -> OgmiosUtxo {
	OgmiosUtxo {
		transaction: OgmiosTx { id: [id_byte; 32] },
		index,
		value: OgmiosValue::new_lovelace(lovelace),
		address: addr.to_bech32(None).unwrap(),
		..Default::default()
	}
}

const BYTE_ARRAY: &str = "#/definitions/ByteArray";
const INT: &str = "#/definitions/Int";
const CONFIG: &str = "#/definitions/types~1BondIssueConfig";
const STAKE_CREDENTIAL: &str = "#/definitions/aiken~1transaction~1credential~1Referenced$aiken~1transaction~1credential~1Credential";

fn parameter(title: &str, reference: &str) -> Value {
	json!({ "title": title, "schema": { "$ref": reference } })
}

fn protocol_instance_parameters() -> Vec<Value> {
	vec![
		parameter("protocol_nft_pid", BYTE_ARRAY),
		parameter("protocol_nft_name", BYTE_ARRAY),
		parameter("config", CONFIG),
	]
}

fn constructor(title: &str, index: u64, fields: Vec<Value>) -> Value {
	json!({ "title": title, "dataType": "constructor", "index": index, "fields": fields })
}

fn field(title: &str, reference: &str) -> Value {
	json!({ "title": title, "$ref": reference })
}

/// Blueprint of the protocol validators.
///
/// Every validator is the base validator with a distinct integer applied, so all hashes differ.
pub(crate) fn test_blueprint_json() -> Value {
	let validators: Vec<(&str, Vec<Value>)> = vec![
		("protocol.mint_protocol", vec![parameter("owner", BYTE_ARRAY)]),
		("protocol.spend_protocol", vec![parameter("owner", BYTE_ARRAY)]),
		("request.mint_borrower_nft", vec![]),
		("request.mint_request_nft", protocol_instance_parameters()),
		("request.spend_request", protocol_instance_parameters()),
		("bond.mint_bond_nft", {
			let mut parameters = protocol_instance_parameters();
			parameters.push(parameter("redeem_over_epochs", INT));
			parameters
		}),
		("bond.spend_bond", {
			let mut parameters = protocol_instance_parameters();
			parameters.push(parameter("default_stake_credential", STAKE_CREDENTIAL));
			parameters
		}),
		("bond.mint_bond_token", protocol_instance_parameters()),
	];
	let validators: Vec<Value> = (validators.into_iter().enumerate())
		.map(|(i, (title, parameters))| {
			let script = test_validator_template().apply_data(&integer(i as u64)).unwrap();
			json!({
				"title": title,
				"compiledCode": hex::encode(&script.bytes),
				"hash": hex::encode(script.script_hash()),
				"parameters": parameters,
			})
		})
		.collect();
	json!({
		"preamble": {
			"title": "bond-issue/contracts",
			"version": "0.0.0",
			"plutusVersion": "v2",
		},
		"validators": validators,
		"definitions": {
			"ByteArray": { "dataType": "bytes" },
			"Int": { "dataType": "integer" },
			"Data": { "title": "Data", "description": "Any Plutus data." },
			"types/SlotConfig": {
				"anyOf": [constructor("SlotConfig", 0, vec![
					field("zero_time", INT),
					field("zero_slot", INT),
					field("slot_length", INT),
				])]
			},
			"types/BondIssueConfig": {
				"anyOf": [constructor("BondIssueConfig", 0, vec![
					field("slot", "#/definitions/types~1SlotConfig"),
					field("epoch", "#/definitions/Data"),
					field("basis", "#/definitions/Data"),
					field("platform", "#/definitions/Data"),
				])]
			},
			"aiken/transaction/credential/Credential": {
				"anyOf": [
					constructor("VerificationKeyCredential", 0, vec![json!({ "$ref": BYTE_ARRAY })]),
					constructor("ScriptCredential", 1, vec![json!({ "$ref": BYTE_ARRAY })]),
				]
			},
			"aiken/transaction/credential/Referenced$aiken/transaction/credential/Credential": {
				"anyOf": [
					constructor("Inline", 0, vec![json!({ "$ref": "#/definitions/aiken~1transaction~1credential~1Credential" })]),
					constructor("Pointer", 1, vec![
						field("slot_number", INT),
						field("transaction_index", INT),
						field("certificate_index", INT),
					]),
				]
			},
			"protocol_params/types/ProtocolParamsAction": {
				"title": "ProtocolParamsAction",
				"anyOf": [
					constructor("MintProtocol", 0, vec![]),
					constructor("UpdateProtocol", 1, vec![]),
				]
			},
		},
	})
}

pub(crate) fn test_blueprint() -> Blueprint {
	Blueprint::from_json(&test_blueprint_json().to_string()).unwrap()
}

pub(crate) fn test_validators() -> BondIssueValidators {
	BondIssueValidators::new(test_blueprint())
}
