//! Client of the Ogmios JSON-RPC API, limited to what a deployment of the bond issuance
//! protocol reads from and sends to a Cardano node.
//!
//! Every query trait has a blanket implementation over [OgmiosClient], so the deployment code
//! is generic over the queries it makes and tests can replace the node with a ledger in memory.

#[cfg(feature = "jsonrpsee-client")]
pub mod jsonrpsee;
pub mod query_ledger_state;
pub mod query_network;
pub mod transactions;
pub mod types;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OgmiosClientError {
	#[error("Invalid Ogmios request parameters: {0}")]
	ParametersError(String),
	#[error("Ogmios request failed: {0}")]
	RequestError(String),
	#[error("Unexpected Ogmios response: {0}")]
	ResponseError(String),
}

/// Transport of Ogmios method calls
pub trait OgmiosClient {
	#[allow(async_fn_in_trait)]
	async fn request<T: DeserializeOwned>(
		&self,
		method: &str,
		params: OgmiosParams,
	) -> Result<T, OgmiosClientError>;
}

/// Parameters of an Ogmios method. Ogmios v6 takes all of them by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OgmiosParams(Map<String, Value>);

impl OgmiosParams {
	/// Adds the `name` parameter.
	pub fn with(mut self, name: &str, value: impl Serialize) -> Result<Self, OgmiosClientError> {
		let value = serde_json::to_value(value)
			.map_err(|e| OgmiosClientError::ParametersError(format!("'{name}': {e}")))?;
		self.0.insert(name.to_string(), value);
		Ok(self)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<OgmiosParams> for Value {
	fn from(params: OgmiosParams) -> Self {
		Value::Object(params.0)
	}
}
