//! Drives the checkout's applied-discount-codes collection to empty.
//!
//! The host applies mutations asynchronously and a read issued right after
//! a successful write may still see the old state, so removal is a
//! poll-mutate-settle loop bounded by a wall-clock deadline rather than a
//! single call.

use crate::domain::ports::{CheckoutSessionRef, DiscountCodeChange};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Pause after issuing mutations, letting the host state settle before the
/// next read.
const SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Extra pause when a whole iteration made no observable progress.
const STALL_BACKOFF: Duration = Duration::from_millis(200);

pub struct CodeRemover {
    session: CheckoutSessionRef,
    // Serializes overlapping invocations (auto trigger vs. manual action);
    // a second caller waits for the in-flight loop instead of interleaving
    // its mutations with ours.
    in_flight: Mutex<()>,
}

impl CodeRemover {
    pub fn new(session: CheckoutSessionRef) -> Self {
        Self {
            session,
            in_flight: Mutex::new(()),
        }
    }

    /// Attempts to clear every applied discount code within `timeout`.
    ///
    /// Returns true iff the collection was observed empty by the time the
    /// call returns. Individual mutation failures never escape this loop;
    /// they only delay convergence. Calling this when the collection is
    /// already empty performs no mutations and is always safe to repeat.
    pub async fn remove_all(&self, timeout: Duration) -> bool {
        let _guard = self.in_flight.lock().await;
        let deadline = Instant::now() + timeout;
        let mut last_count: Option<usize> = None;

        while Instant::now() < deadline {
            let codes = self.session.discount_codes().await;
            if codes.is_empty() {
                return true;
            }

            // Replace-all is the cheap first swing; the per-code removals
            // below are the real correctness mechanism, so its failure is
            // only worth a log line.
            if let Err(err) = self
                .session
                .apply_discount_code_change(DiscountCodeChange::ReplaceAll { codes: vec![] })
                .await
            {
                debug!("replace-all rejected: {err}");
            }

            // Fresh snapshot: replace-all may already have taken effect.
            // Each removal fails independently; one stubborn code must not
            // stop the attempts for the others.
            for entry in self.session.discount_codes().await {
                if let Err(err) = self
                    .session
                    .apply_discount_code_change(DiscountCodeChange::Remove {
                        code: entry.code.clone(),
                    })
                    .await
                {
                    debug!(code = %entry.code, "removal rejected: {err}");
                }
            }

            tokio::time::sleep(SETTLE_DELAY).await;

            let count = self.session.discount_codes().await.len();
            if count == 0 {
                info!("discount codes cleared");
                return true;
            }
            if Some(count) == last_count {
                debug!(count, "no progress clearing codes, backing off");
                tokio::time::sleep(STALL_BACKOFF).await;
            }
            last_count = Some(count);
        }

        // Deadline hit; report whatever the collection looks like right now
        // rather than an unconditional failure.
        let converged = self.session.discount_codes().await.is_empty();
        if !converged {
            info!("gave up clearing discount codes at deadline");
        }
        converged
    }
}
