//! `queryNetwork/*` methods.

use crate::{OgmiosClient, OgmiosClientError, OgmiosParams};
use bond_issue_domain::NetworkType;
use serde::Deserialize;

pub trait QueryNetwork {
	/// Shelley genesis of the network the node follows
	#[allow(async_fn_in_trait)]
	async fn shelley_genesis_configuration(&self)
	-> Result<GenesisConfiguration, OgmiosClientError>;
}

impl<T: OgmiosClient> QueryNetwork for T {
	async fn shelley_genesis_configuration(
		&self,
	) -> Result<GenesisConfiguration, OgmiosClientError> {
		let params = OgmiosParams::default().with("era", "shelley")?;
		self.request("queryNetwork/genesisConfiguration", params).await
	}
}

/// Part of the Shelley genesis identifying the network
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenesisConfiguration {
	pub network: NetworkType,
	pub network_magic: u32,
}
