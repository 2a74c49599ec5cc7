use crate::{DeployError, csl::base_key_address};
use bip39::Mnemonic;
use bond_issue_domain::KeyHash;
use cardano_serialization_lib::{Address, Bip32PrivateKey, Ed25519KeyHash, NetworkIdKind, PrivateKey};

const PURPOSE: u32 = 1852;
const COIN_TYPE: u32 = 1815;
const EXTERNAL_CHAIN: u32 = 0;
const STAKE_CHAIN: u32 = 2;

fn harden(index: u32) -> u32 {
	index | 0x80_00_00_00
}

/// First account keys derived from a BIP-39 seed phrase along `m/1852'/1815'/0'`.
pub struct Wallet {
	payment_key: Bip32PrivateKey,
	stake_key: Bip32PrivateKey,
}

impl Wallet {
	/// Derives the wallet from an English seed phrase.
	pub fn from_seed_phrase(seed_phrase: &str) -> Result<Self, DeployError> {
		let mnemonic = Mnemonic::parse_normalized(seed_phrase.trim())
			.map_err(|e| DeployError::Configuration(format!("Invalid seed phrase: {e}")))?;
		let root = Bip32PrivateKey::from_bip39_entropy(&mnemonic.to_entropy(), &[]);
		let account = root.derive(harden(PURPOSE)).derive(harden(COIN_TYPE)).derive(harden(0));
		Ok(Self {
			payment_key: account.derive(EXTERNAL_CHAIN).derive(0),
			stake_key: account.derive(STAKE_CHAIN).derive(0),
		})
	}

	pub fn payment_key_hash(&self) -> KeyHash {
		let hash = self.csl_payment_key_hash().to_bytes();
		KeyHash(hash.try_into().expect("CSL key hash is 28 bytes"))
	}

	pub fn stake_key_hash(&self) -> KeyHash {
		KeyHash(self.csl_stake_key_hash().to_bytes().try_into().expect("CSL key hash is 28 bytes"))
	}

	/// Base address of the wallet, the address of all deployment outputs except protocol params.
	pub fn address(&self, network: NetworkIdKind) -> Address {
		base_key_address(&self.csl_payment_key_hash(), &self.csl_stake_key_hash(), network)
	}

	pub(crate) fn payment_key(&self) -> PrivateKey {
		self.payment_key.to_raw_key()
	}

	fn csl_payment_key_hash(&self) -> Ed25519KeyHash {
		self.payment_key.to_public().to_raw_key().hash()
	}

	fn csl_stake_key_hash(&self) -> Ed25519KeyHash {
		self.stake_key.to_public().to_raw_key().hash()
	}
}
