//! Cardano networks the protocol can be deployed to

use core::{fmt::Display, str::FromStr};
use serde::{Deserialize, Deserializer, Serialize};

/// Cardano network type
///
/// - mainnet: the unique, production Cardano network
/// - testnet: various public and private testnets. These testnets are further differentiated
///            by their respective "testnet magic" numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
	/// The Cardano mainnet (unique network)
	Mainnet,
	/// A Cardano testnet
	#[default]
	Testnet,
}

impl NetworkType {
	/// Network id used in address headers: 1 for mainnet, 0 for testnets
	pub fn network_id(&self) -> u8 {
		match self {
			Self::Mainnet => 1,
			Self::Testnet => 0,
		}
	}
}

impl Display for NetworkType {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let str = match self {
			Self::Mainnet => "mainnet",
			Self::Testnet => "testnet",
		};
		write!(f, "{}", str)
	}
}

/// Named Cardano network selecting the deployment constants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Network {
	/// Public preview testnet
	Preview,
	/// Public pre-production testnet
	Preprod,
	/// Cardano mainnet
	Mainnet,
	/// Private or local network
	Custom,
}

impl Network {
	/// All supported networks
	pub const ALL: [Network; 4] =
		[Network::Preview, Network::Preprod, Network::Mainnet, Network::Custom];

	/// Network type of the named network
	pub fn network_type(&self) -> NetworkType {
		match self {
			Self::Mainnet => NetworkType::Mainnet,
			_ => NetworkType::Testnet,
		}
	}
}

impl Display for Network {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let str = match self {
			Self::Preview => "Preview",
			Self::Preprod => "Preprod",
			Self::Mainnet => "Mainnet",
			Self::Custom => "Custom",
		};
		f.write_str(str)
	}
}

/// Error returned for unrecognized network names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown network '{0}'. Expected one of: Preview, Preprod, Mainnet, Custom")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
	type Err = UnknownNetwork;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Network::ALL
			.into_iter()
			.find(|network| network.to_string().eq_ignore_ascii_case(s.trim()))
			.ok_or_else(|| UnknownNetwork(s.to_string()))
	}
}

impl<'de> Deserialize<'de> for Network {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}
