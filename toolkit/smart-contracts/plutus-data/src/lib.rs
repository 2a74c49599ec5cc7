//! Plutus data types of the bond issuance protocol.
//!
//! Every record is encoded the way the Aiken contracts declare it, as `Constr 0` with
//! the fields in declaration order.
use cardano_serialization_lib::{BigNum, ConstrPlutusData, PlutusData, PlutusList};

pub mod bond_config;
pub mod credentials;
pub mod output_reference;
pub mod protocol_params;

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("Could not decode {datum:?} to {to}: {msg}")]
pub struct DataDecodingError {
	datum: PlutusData,
	to: String,
	msg: String,
}

pub type DecodingResult<T> = std::result::Result<T, DataDecodingError>;

pub(crate) fn decoding_error_and_log(data: &PlutusData, to: &str, msg: &str) -> DataDecodingError {
	log::error!("Could not decode {data:?} to {to}: {msg}");
	DataDecodingError { datum: data.clone(), to: to.to_string(), msg: msg.to_string() }
}

pub trait PlutusDataExtensions {
	/// Fields of `Constr alternative [...]`, `None` for other data
	fn as_constr_fields(&self, alternative: u64) -> Option<PlutusList>;
}

impl PlutusDataExtensions for PlutusData {
	fn as_constr_fields(&self, alternative: u64) -> Option<PlutusList> {
		self.as_constr_plutus_data()
			.filter(|constr| constr.alternative() == BigNum::from(alternative))
			.map(|constr| constr.data())
	}
}

/// Builds `Constr alternative [fields...]`
pub fn constr(alternative: u64, fields: Vec<PlutusData>) -> PlutusData {
	let mut list = PlutusList::new();
	for field in fields.iter() {
		list.add(field);
	}
	PlutusData::new_constr_plutus_data(&ConstrPlutusData::new(&BigNum::from(alternative), &list))
}

/// Builds an integer Plutus value
pub fn integer(value: u64) -> PlutusData {
	PlutusData::new_integer(&value.into())
}
