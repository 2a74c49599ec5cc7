//! CIP-57 Plutus blueprint (`plutus.json`) as produced by Aiken.
//!
//! Only the parts needed to instantiate validators are read: compiled code, declared
//! parameters with their schemas and the shared `definitions`.
use crate::{DeployError, plutus_script::PlutusScript};
use bond_issue_plutus_data::constr;
use cardano_serialization_lib::{BigNum, Language, PlutusData};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

const DEFINITIONS_REF_PREFIX: &str = "#/definitions/";
/// Bounds `$ref` chains and nested schemas
const MAX_SCHEMA_DEPTH: usize = 32;

#[derive(Clone, Debug, Deserialize)]
pub struct Blueprint {
	pub preamble: Preamble,
	pub validators: Vec<BlueprintValidator>,
	#[serde(default)]
	pub definitions: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preamble {
	pub title: String,
	#[serde(default)]
	pub version: Option<String>,
	#[serde(default)]
	pub plutus_version: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintValidator {
	pub title: String,
	/// Hex of the CBOR wrapped flat encoded program
	pub compiled_code: String,
	#[serde(default)]
	pub hash: Option<String>,
	#[serde(default)]
	pub parameters: Vec<BlueprintParameter>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BlueprintParameter {
	#[serde(default)]
	pub title: Option<String>,
	pub schema: Value,
}

fn mismatch(msg: impl Into<String>) -> DeployError {
	DeployError::BlueprintMismatch(msg.into())
}

impl Blueprint {
	pub fn from_file(path: &Path) -> Result<Self, DeployError> {
		let content = std::fs::read_to_string(path)
			.map_err(|e| mismatch(format!("Could not read blueprint at {}: {e}", path.display())))?;
		Self::from_json(&content)
	}

	pub fn from_json(json: &str) -> Result<Self, DeployError> {
		serde_json::from_str(json).map_err(|e| mismatch(format!("Invalid blueprint: {e}")))
	}

	/// Plutus language of the compiled validators. Blueprints not declaring it are PlutusV2.
	pub fn language(&self) -> Result<Language, DeployError> {
		match self.preamble.plutus_version.as_deref() {
			Some("v1") => Ok(Language::new_plutus_v1()),
			None | Some("v2") => Ok(Language::new_plutus_v2()),
			Some("v3") => Ok(Language::new_plutus_v3()),
			Some(other) => Err(mismatch(format!("Unsupported plutus version '{other}'"))),
		}
	}

	/// Finds a validator by its title.
	///
	/// Blueprints of newer Aiken versions suffix titles with the handler name,
	/// e.g. `protocol.mint_protocol.mint`, these are matched too.
	pub fn validator(&self, title: &str) -> Result<&BlueprintValidator, DeployError> {
		let handler_prefix = format!("{title}.");
		(self.validators.iter().find(|v| v.title == title))
			.or_else(|| {
				self.validators.iter().find(|v| {
					v.title.strip_prefix(&handler_prefix).is_some_and(|handler| {
						handler != "else" && !handler.contains('.')
					})
				})
			})
			.ok_or_else(|| mismatch(format!("Validator '{title}' not found in the blueprint")))
	}

	/// Instantiates validator `title` with `parameters` applied in the declared order.
	///
	/// Every parameter has to match the kind its schema declares.
	pub fn build(&self, title: &str, parameters: &[PlutusData]) -> anyhow::Result<PlutusScript> {
		let validator = self.validator(title)?;
		if validator.parameters.len() != parameters.len() {
			return Err(mismatch(format!(
				"Validator '{title}' expects {} parameters, got {}",
				validator.parameters.len(),
				parameters.len()
			))
			.into());
		}
		for (declared, data) in validator.parameters.iter().zip(parameters) {
			self.check(&declared.schema, data, 0).map_err(|e| {
				let name = declared.title.as_deref().unwrap_or("<untitled>");
				mismatch(format!("Parameter '{name}' of '{title}': {e}"))
			})?;
		}
		let bytes = hex::decode(&validator.compiled_code)
			.map_err(|e| mismatch(format!("Compiled code of '{title}' is not hex: {e}")))?;
		let mut script = PlutusScript::from_cbor(&bytes, self.language()?);
		for data in parameters {
			script = script.apply_data(data)?;
		}
		log::debug!("Built validator '{title}' with hash {}", hex::encode(script.script_hash()));
		Ok(script)
	}

	/// Value of a constructor without fields of the definition `definition`, e.g. a redeemer.
	pub fn enum_variant(&self, definition: &str, variant: &str) -> Result<PlutusData, DeployError> {
		let schema = (self.definitions.get(definition))
			.ok_or_else(|| mismatch(format!("Definition '{definition}' not found")))?;
		let alternatives = self.alternatives(schema).ok_or_else(|| {
			mismatch(format!("Definition '{definition}' is not a sum of constructors"))
		})?;
		let (index, alternative) = (alternatives.iter().enumerate())
			.find(|(_, alternative)| {
				alternative.get("title").and_then(Value::as_str) == Some(variant)
			})
			.ok_or_else(|| mismatch(format!("'{definition}' has no variant '{variant}'")))?;
		if alternative.get("fields").and_then(Value::as_array).is_some_and(|f| !f.is_empty()) {
			return Err(mismatch(format!("Variant '{variant}' of '{definition}' has fields")));
		}
		let index = alternative.get("index").and_then(Value::as_u64).unwrap_or(index as u64);
		Ok(constr(index, vec![]))
	}

	fn alternatives<'a>(&'a self, schema: &'a Value) -> Option<&'a Vec<Value>> {
		let schema = self.resolve(schema).ok()?;
		if let Some(alternatives) = schema.get("anyOf").and_then(Value::as_array) {
			return Some(alternatives);
		}
		None
	}

	/// Follows `$ref` pointers into `definitions`
	fn resolve<'a>(&'a self, mut schema: &'a Value) -> Result<&'a Value, String> {
		for _ in 0..MAX_SCHEMA_DEPTH {
			match schema.get("$ref").and_then(Value::as_str) {
				None => return Ok(schema),
				Some(reference) => {
					let name = reference
						.strip_prefix(DEFINITIONS_REF_PREFIX)
						.ok_or_else(|| format!("Unsupported reference '{reference}'"))?
						.replace("~1", "/")
						.replace("~0", "~");
					schema = self
						.definitions
						.get(&name)
						.ok_or_else(|| format!("Definition '{name}' not found"))?;
				},
			}
		}
		Err("Schema references are nested too deep".to_string())
	}

	fn check(&self, schema: &Value, data: &PlutusData, depth: usize) -> Result<(), String> {
		if depth > MAX_SCHEMA_DEPTH {
			return Err("Schema is nested too deep".to_string());
		}
		let schema = self.resolve(schema)?;
		if let Some(alternatives) = schema.get("anyOf").and_then(Value::as_array) {
			return (alternatives.iter())
				.find_map(|alternative| self.check(alternative, data, depth + 1).ok())
				.ok_or_else(|| "Value matches none of the constructors".to_string());
		}
		let Some(data_type) = schema.get("dataType").and_then(Value::as_str) else {
			// Opaque `Data`
			return Ok(());
		};
		match data_type.trim_start_matches('#') {
			"bytes" => data.as_bytes().map(|_| ()).ok_or_else(|| "Expected bytes".to_string()),
			"integer" => {
				data.as_integer().map(|_| ()).ok_or_else(|| "Expected integer".to_string())
			},
			"map" => data.as_map().map(|_| ()).ok_or_else(|| "Expected map".to_string()),
			"list" => {
				let list = data.as_list().ok_or_else(|| "Expected list".to_string())?;
				match schema.get("items") {
					Some(items) if items.is_object() => {
						for i in 0..list.len() {
							self.check(items, &list.get(i), depth + 1)?;
						}
						Ok(())
					},
					_ => Ok(()),
				}
			},
			"constructor" => {
				let constr = (data.as_constr_plutus_data())
					.ok_or_else(|| "Expected constructor".to_string())?;
				if let Some(index) = schema.get("index").and_then(Value::as_u64) {
					if constr.alternative() != BigNum::from(index) {
						return Err(format!("Expected constructor {index}"));
					}
				}
				let fields =
					schema.get("fields").and_then(Value::as_array).cloned().unwrap_or_default();
				let values = constr.data();
				if fields.len() != values.len() {
					return Err(format!(
						"Expected {} constructor fields, got {}",
						fields.len(),
						values.len()
					));
				}
				for (i, field) in fields.iter().enumerate() {
					self.check(field, &values.get(i), depth + 1)?;
				}
				Ok(())
			},
			other => Err(format!("Unsupported data type '{other}'")),
		}
	}
}
