//! Waiting for the outputs of submitted deployment transactions to appear on chain.
use anyhow::anyhow;
use bond_issue_domain::UtxoId;
use ogmios_client::{query_ledger_state::QueryUtxoByUtxoId, types::OgmiosUtxo};
use std::time::Duration;
use tokio_retry::{Retry, strategy::FixedInterval};

pub trait AwaitTx {
	/// Waits until `utxo_id`, an output of a submitted transaction, is unspent on chain
	/// and returns it.
	#[allow(async_fn_in_trait)]
	async fn await_tx_output<C: QueryUtxoByUtxoId>(
		&self,
		client: &C,
		utxo_id: UtxoId,
	) -> anyhow::Result<OgmiosUtxo>;
}

/// Queries the output up to `retries` more times, `delay` apart.
pub struct FixedDelayRetries {
	delay: Duration,
	retries: usize,
}

impl FixedDelayRetries {
	pub fn new(delay: Duration, retries: usize) -> Self {
		Self { delay, retries }
	}
}

impl AwaitTx for FixedDelayRetries {
	async fn await_tx_output<C: QueryUtxoByUtxoId>(
		&self,
		client: &C,
		utxo_id: UtxoId,
	) -> anyhow::Result<OgmiosUtxo> {
		let attempts = FixedInterval::new(self.delay).take(self.retries);
		let observed = Retry::start(attempts, || async {
			log::info!("Waiting for output {utxo_id} to be observed");
			match client.query_utxo_by_id(utxo_id).await {
				Ok(Some(utxo)) => Ok(utxo),
				Ok(None) => Err(format!("output {utxo_id} is not on chain")),
				Err(e) => {
					log::warn!("Query of output {utxo_id} failed: {e}");
					Err(e.to_string())
				},
			}
		})
		.await;
		let utxo = observed.map_err(|last_failure| {
			anyhow!(
				"Transaction {} was not observed after {} retries: {last_failure}",
				utxo_id.tx_hash,
				self.retries
			)
		})?;
		log::info!("Output {utxo_id} observed");
		Ok(utxo)
	}
}
