use crate::csl::*;
use anyhow::{Error, anyhow};
use bond_issue_domain::{AssetId, AssetName, PolicyId};
use cardano_serialization_lib::{Address, Language, LanguageKind, NetworkIdKind, PlutusData};
use ogmios_client::types::OgmiosScript;
use uplc::{
	ast::{DeBruijn, Program},
	plutus_data,
};

/// Wraps a Plutus script cbor
#[derive(Clone, PartialEq, Eq)]
pub struct PlutusScript {
	/// CBOR byte string holding the flat encoded program
	pub bytes: Vec<u8>,
	pub language: Language,
}

impl std::fmt::Debug for PlutusScript {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PlutusScript")
			.field("hash", &hex::encode(self.script_hash()))
			.field("language", &self.language.kind())
			.finish()
	}
}

impl PlutusScript {
	pub fn from_cbor(cbor: &[u8], language: Language) -> Self {
		Self { bytes: cbor.into(), language }
	}

	/// Applies a parameter to the script. Parameters are applied in the order they are declared.
	pub fn apply_data(self, data: &PlutusData) -> Result<Self, Error> {
		let data = plutus_data(&data.to_bytes())
			.map_err(|e| anyhow!("Could not convert parameter to UPLC data: {e}"))?;
		self.apply_uplc_data(data)
	}

	fn apply_uplc_data(self, data: uplc::PlutusData) -> Result<Self, Error> {
		let mut buffer = Vec::new();
		let mut program = Program::<DeBruijn>::from_cbor(&self.bytes, &mut buffer)
			.map_err(|e| anyhow!(e.to_string()))?;
		program = program.apply_data(data);
		let bytes = program
			.to_cbor()
			.map_err(|_| anyhow!("Couldn't encode resulting script as CBOR."))?;
		Ok(Self { bytes, ..self })
	}

	/// Returns the most recently applied parameter.
	pub fn unapply_data_csl(&self) -> Result<PlutusData, Error> {
		let mut buffer = Vec::new();
		let program = Program::<DeBruijn>::from_cbor(&self.bytes, &mut buffer)
			.map_err(|e| anyhow!(e.to_string()))?;
		let argument: uplc::PlutusData = match program.term {
			uplc::ast::Term::Apply { function: _, argument } => {
				(*argument).clone().try_into().map_err(|e: String| anyhow!(e))?
			},
			_ => return Err(anyhow!("Given Plutus Script is not an applied term")),
		};
		let cbor_bytes = minicbor::to_vec(argument).map_err(|e| anyhow!(e.to_string()))?;
		PlutusData::from_bytes(cbor_bytes).map_err(|e| anyhow!(e))
	}

	/// Builds an CSL `Address` for plutus script from the data obtained from smart contracts.
	pub fn address(&self, network: NetworkIdKind) -> Address {
		script_address(&self.bytes, network, self.language)
	}

	pub fn script_hash(&self) -> [u8; 28] {
		plutus_script_hash(&self.bytes, self.language)
	}

	pub fn csl_script_hash(&self) -> cardano_serialization_lib::ScriptHash {
		cardano_serialization_lib::ScriptHash::from(self.script_hash())
	}

	pub fn policy_id(&self) -> PolicyId {
		PolicyId(self.script_hash())
	}

	pub fn asset(&self, asset_name: AssetName) -> AssetId {
		AssetId { policy_id: self.policy_id(), asset_name }
	}

	pub fn to_csl(&self) -> cardano_serialization_lib::PlutusScript {
		match self.language.kind() {
			LanguageKind::PlutusV1 => {
				cardano_serialization_lib::PlutusScript::new(self.bytes.clone())
			},
			LanguageKind::PlutusV2 => {
				cardano_serialization_lib::PlutusScript::new_v2(self.bytes.clone())
			},
			LanguageKind::PlutusV3 => {
				cardano_serialization_lib::PlutusScript::new_v3(self.bytes.clone())
			},
		}
	}
}

impl TryFrom<OgmiosScript> for PlutusScript {
	type Error = Error;

	fn try_from(script: OgmiosScript) -> Result<Self, Self::Error> {
		let language = match script.language.as_str() {
			"plutus:v1" => Language::new_plutus_v1(),
			"plutus:v2" => Language::new_plutus_v2(),
			"plutus:v3" => Language::new_plutus_v3(),
			_ => return Err(anyhow!("Unsupported Plutus language version: {}", script.language)),
		};
		Ok(Self::from_cbor(&script.cbor, language))
	}
}

impl From<PlutusScript> for OgmiosScript {
	fn from(val: PlutusScript) -> Self {
		OgmiosScript {
			language: match val.language.kind() {
				LanguageKind::PlutusV1 => "plutus:v1",
				LanguageKind::PlutusV2 => "plutus:v2",
				LanguageKind::PlutusV3 => "plutus:v3",
			}
			.to_string(),
			cbor: val.bytes,
		}
	}
}
