// src/chain/nonce.rs
use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::ChainRpc;
use crate::consts::NONCE_RETRY_DELAY_MS;
use crate::error::ChainError;

/// Owner of the writer account's next nonce and the single-slot write queue
///
/// The cursor is `None` (idle, must ask the node) or `Some(n)` (next write
/// uses `n`). The async mutex is held for the whole write, so writes queue
/// up in arrival order and never overlap.
#[derive(Debug)]
pub struct NonceManager {
    cursor: Mutex<Option<u64>>,
    retry_delay: Duration,
}

impl Default for NonceManager {
    fn default() -> Self {
        Self::new(Duration::from_millis(NONCE_RETRY_DELAY_MS))
    }
}

impl NonceManager {
    pub fn new(retry_delay: Duration) -> Self {
        Self {
            cursor: Mutex::new(None),
            retry_delay,
        }
    }

    /// Snapshot of the cursor; waits behind any in-flight write
    pub async fn cursor(&self) -> Option<u64> {
        *self.cursor.lock().await
    }

    /// Forget the cached nonce so the next write re-queries the node
    pub async fn reset(&self) {
        *self.cursor.lock().await = None;
    }

    /// Run one write with a nonce from the cursor.
    ///
    /// A nonce conflict resets the cursor and retries exactly once after the
    /// fixed delay with a freshly queried nonce. Any other failure resets the
    /// cursor and propagates immediately.
    pub async fn submit<R, F, Fut, T>(&self, rpc: &R, mut op: F) -> Result<T, ChainError>
    where
        R: ChainRpc + ?Sized,
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = Result<T, ChainError>>,
    {
        let mut cursor = self.cursor.lock().await;

        match Self::attempt(rpc, &mut cursor, &mut op).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_nonce_conflict() => {
                warn!(
                    error = %err,
                    delay_ms = self.retry_delay.as_millis() as u64,
                    "nonce conflict, retrying once with a fresh nonce"
                );
                *cursor = None;
                tokio::time::sleep(self.retry_delay).await;

                let retried = Self::attempt(rpc, &mut cursor, &mut op).await;
                if retried.is_err() {
                    *cursor = None;
                }
                retried
            }
            Err(err) => {
                *cursor = None;
                Err(err)
            }
        }
    }

    async fn attempt<R, F, Fut, T>(
        rpc: &R,
        cursor: &mut Option<u64>,
        op: &mut F,
    ) -> Result<T, ChainError>
    where
        R: ChainRpc + ?Sized,
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = Result<T, ChainError>>,
    {
        let nonce = match *cursor {
            Some(n) => n,
            None => {
                let fresh = rpc.pending_nonce().await?;
                debug!(nonce = fresh, "queried pending nonce");
                fresh
            }
        };
        *cursor = Some(nonce);

        let value = op(nonce).await?;
        *cursor = Some(nonce + 1);
        Ok(value)
    }
}
