//! [OgmiosClient] over an HTTP jsonrpsee client.
//! Error responses of HTTP 400 Bad Request are swallowed by jsonrpsee, only the status is reported.

use crate::{OgmiosClient, OgmiosClientError, OgmiosParams};
use jsonrpsee::{
	core::{ClientError, client::ClientT, traits::ToRpcParams},
	http_client::{HeaderMap, HeaderValue, HttpClient, HttpClientBuilder},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, value::RawValue};
use std::time::Duration;

/// Header carrying the hosted provider API key
pub const API_KEY_HEADER: &str = "dmtr-api-key";

/// Creates an HTTP Ogmios client for `addr`.
///
/// When `api_key` is given it is sent with every request in the [API_KEY_HEADER] header.
pub async fn client_for_url(
	addr: &str,
	timeout: Option<Duration>,
	api_key: Option<&str>,
) -> Result<HttpClient, String> {
	if !(addr.starts_with("http://") || addr.starts_with("https://")) {
		return Err(format!("Ogmios address '{addr}' has to start with http:// or https://"));
	}
	let mut headers = HeaderMap::new();
	if let Some(api_key) = api_key {
		let value = HeaderValue::from_str(api_key)
			.map_err(|e| format!("Provider API key is not a valid header value: {e}"))?;
		headers.insert(API_KEY_HEADER, value);
	}
	let builder = HttpClientBuilder::default().set_headers(headers);
	let builder = match timeout {
		Some(timeout) => builder.request_timeout(timeout),
		None => builder,
	};
	builder.build(addr).map_err(|e| e.to_string())
}

impl ToRpcParams for OgmiosParams {
	fn to_rpc_params(self) -> Result<Option<Box<RawValue>>, serde_json::Error> {
		if self.is_empty() {
			return Ok(None);
		}
		serde_json::value::to_raw_value(&Value::from(self)).map(Some)
	}
}

impl OgmiosClient for HttpClient {
	async fn request<T: DeserializeOwned>(
		&self,
		method: &str,
		params: OgmiosParams,
	) -> Result<T, OgmiosClientError> {
		log::debug!("Ogmios request {method}: {}", Value::from(params.clone()));
		let response: Result<Value, ClientError> = ClientT::request(self, method, params).await;
		match &response {
			Ok(result) => log::debug!("Ogmios response {method}: {result}"),
			Err(ClientError::Call(error)) => log::debug!(
				"Ogmios error response {method}: {}",
				serde_json::to_string(error).unwrap_or_else(|_| error.to_string())
			),
			Err(error) => log::debug!("Ogmios request {method} failed: {error}"),
		}
		serde_json::from_value(response?).map_err(|e| {
			OgmiosClientError::ResponseError(format!("'{method}' result could not be decoded: {e}"))
		})
	}
}

impl From<ClientError> for OgmiosClientError {
	fn from(e: ClientError) -> Self {
		match e {
			ClientError::ParseError(e) => Self::ResponseError(e.to_string()),
			e => Self::RequestError(e.to_string()),
		}
	}
}
