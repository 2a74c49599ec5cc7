//! Deploys the bond issuance protocol: mints the protocol NFT, publishes the validators
//! as reference scripts and locks the protocol params at the protocol address.
use bond_issue_offchain::{
	blueprint::Blueprint,
	config::{DeploymentSettings, FundSettings},
	deploy::{ParamsPublished, run_deployment},
	validators::BondIssueValidators,
	wallet::Wallet,
};
use env::DeployerEnv;
use ogmios_client::jsonrpsee::client_for_url;

mod env;

#[tokio::main]
async fn main() {
	env_logger::builder().filter_level(log::LevelFilter::Info).parse_default_env().init();
	match deploy().await {
		Ok(published) => log::info!(
			"Deployment finished. Protocol params transaction: {}",
			published.tx_hash()
		),
		Err(err) => {
			log::error!("Deployment failed: {err:#}");
			std::process::exit(1);
		},
	}
}

async fn deploy() -> anyhow::Result<ParamsPublished> {
	let env = DeployerEnv::read_from_env()?;
	log::debug!("Configuration: {env:?}");
	let wallet = Wallet::from_seed_phrase(&env.seed)?;
	let blueprint = Blueprint::from_file(&env.blueprint_path)?;
	log::info!(
		"Deploying to {} from blueprint {} ({})",
		env.network,
		env.blueprint_path.display(),
		blueprint.preamble.title
	);
	let validators = BondIssueValidators::new(blueprint);
	let client = client_for_url(
		&env.ogmios_url,
		Some(env.ogmios_requests_timeout()),
		env.provider_api_key.as_deref(),
	)
	.await
	.map_err(|e| anyhow::anyhow!("Failed to connect to Ogmios at {}: {}", env.ogmios_url, e))?;
	let settings = DeploymentSettings::for_network(env.network);
	run_deployment(
		&settings,
		&FundSettings::default(),
		&validators,
		&wallet,
		&client,
		&env.retries(),
	)
	.await
}
