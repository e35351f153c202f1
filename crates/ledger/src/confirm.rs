//! Receipt waiting, single and batched.

use crate::client::{LedgerClient, PendingTx, Receipt};
use crate::error::LedgerError;

/// Wait for one transaction.
pub async fn confirm_one<C>(client: &C, pending: &PendingTx) -> Result<Receipt, LedgerError>
where
    C: LedgerClient + ?Sized,
{
    client.wait(pending).await
}

/// Wait for a batch concurrently, returning receipts in input order.
///
/// All waits run to completion regardless of individual failures; a revert
/// in one element never cancels the others' waits. The receipt at index
/// `i` always belongs to `pendings[i]`, whatever order the transactions were
/// mined in. If any element failed, the first failure in input order is
/// returned and the caller decides whether the run continues.
pub async fn confirm_all<C>(
    client: &C,
    pendings: &[PendingTx],
) -> Result<Vec<Receipt>, LedgerError>
where
    C: LedgerClient + ?Sized,
{
    let waits = pendings.iter().map(|pending| client.wait(pending));
    let results = futures::future::join_all(waits).await;
    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use alloy_primitives::{Address, B256};
    use async_trait::async_trait;

    use super::*;
    use crate::client::{CallRequest, TxRequest};

    /// Scripted client: per-hash wait outcomes with optional delays, plus a
    /// completion log to prove waits finish out of input order.
    struct ScriptedClient {
        outcomes: Vec<(B256, Duration, Result<u64, ()>)>,
        completions: Mutex<Vec<B256>>,
    }

    impl ScriptedClient {
        fn new(outcomes: Vec<(B256, Duration, Result<u64, ()>)>) -> Self {
            Self {
                outcomes,
                completions: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LedgerClient for ScriptedClient {
        async fn get_transaction_count(&self, _address: Address) -> Result<u64, LedgerError> {
            Ok(0)
        }

        async fn send_transaction(&self, _tx: TxRequest) -> Result<PendingTx, LedgerError> {
            unimplemented!("not exercised")
        }

        async fn call(&self, _request: CallRequest) -> Result<Vec<u8>, LedgerError> {
            unimplemented!("not exercised")
        }

        async fn wait(&self, pending: &PendingTx) -> Result<Receipt, LedgerError> {
            let (_, delay, outcome) = self
                .outcomes
                .iter()
                .find(|(hash, _, _)| *hash == pending.hash)
                .expect("unknown hash");
            tokio::time::sleep(*delay).await;
            self.completions.lock().unwrap().push(pending.hash);
            match outcome {
                Ok(block_number) => Ok(Receipt {
                    transaction_hash: pending.hash,
                    block_number: *block_number,
                    contract_address: None,
                    gas_used: 21_000,
                }),
                Err(()) => Err(LedgerError::TransactionReverted { hash: pending.hash }),
            }
        }
    }

    fn hash(byte: u8) -> B256 {
        B256::repeat_byte(byte)
    }

    #[tokio::test]
    async fn confirm_all_preserves_input_order() {
        // The first transaction resolves last.
        let client = ScriptedClient::new(vec![
            (hash(1), Duration::from_millis(40), Ok(10)),
            (hash(2), Duration::from_millis(5), Ok(11)),
            (hash(3), Duration::from_millis(1), Ok(12)),
        ]);
        let pendings = [
            PendingTx { hash: hash(1) },
            PendingTx { hash: hash(2) },
            PendingTx { hash: hash(3) },
        ];

        let receipts = confirm_all(&client, &pendings).await.unwrap();

        let returned: Vec<B256> = receipts.iter().map(|r| r.transaction_hash).collect();
        assert_eq!(returned, vec![hash(1), hash(2), hash(3)]);

        let completions = client.completions.lock().unwrap().clone();
        assert_eq!(completions, vec![hash(3), hash(2), hash(1)]);
    }

    #[tokio::test]
    async fn confirm_all_reports_first_failure_after_all_waits_finish() {
        let client = ScriptedClient::new(vec![
            (hash(1), Duration::from_millis(1), Ok(10)),
            (hash(2), Duration::from_millis(5), Err(())),
            (hash(3), Duration::from_millis(30), Ok(12)),
        ]);
        let pendings = [
            PendingTx { hash: hash(1) },
            PendingTx { hash: hash(2) },
            PendingTx { hash: hash(3) },
        ];

        let err = confirm_all(&client, &pendings).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::TransactionReverted { hash: h } if h == hash(2)
        ));

        // The failing element did not cancel the slowest wait.
        assert_eq!(client.completions.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn confirm_one_passes_the_receipt_through() {
        let client = ScriptedClient::new(vec![(hash(9), Duration::ZERO, Ok(42))]);
        let receipt = confirm_one(&client, &PendingTx { hash: hash(9) })
            .await
            .unwrap();
        assert_eq!(receipt.block_number, 42);
    }
}
