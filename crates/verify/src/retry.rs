use std::time::Duration;

use tracing::{info, warn};

use crate::error::VerifyError;
use crate::explorer::{Explorer, VerifyRequest};

/// How long to wait between submissions while the explorer indexes.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Drives a [`VerifyRequest`] to a terminal outcome.
///
/// Not-yet-indexed responses retry without an attempt cap: the indexer
/// always catches up eventually, and giving up early would leave the
/// exercise half-verified. Already-verified responses are downgraded to a
/// warning. Everything else is fatal.
#[derive(Debug, Clone)]
pub struct Retrier {
    delay: Duration,
}

impl Default for Retrier {
    fn default() -> Self {
        Self { delay: RETRY_DELAY }
    }
}

impl Retrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the retry cadence. Intended for tests.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn verify<E>(&self, explorer: &E, request: &VerifyRequest) -> Result<(), VerifyError>
    where
        E: Explorer + ?Sized,
    {
        let mut attempt = 1u32;
        loop {
            match explorer.verify(request).await {
                Ok(()) => {
                    info!(
                        address = %request.address,
                        contract = %request.contract_name,
                        attempt,
                        "source verified"
                    );
                    return Ok(());
                }
                Err(VerifyError::AlreadyVerified { address }) => {
                    warn!(%address, contract = %request.contract_name, "source already verified, skipping");
                    return Ok(());
                }
                Err(VerifyError::NotIndexed { address }) => {
                    info!(
                        %address,
                        attempt,
                        delay_secs = self.delay.as_secs_f64(),
                        "bytecode not indexed yet, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(fatal) => return Err(fatal),
            }
        }
    }
}
