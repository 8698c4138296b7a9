use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::api::VerificationApi;
use crate::error::ApiError;

/// Seconds a client waits between two resend requests.
pub const DEFAULT_COOLDOWN_SECS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendOutcome {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ThrottleError {
    #[error("Resend in {remaining}s")]
    CoolingDown { remaining: u32 },

    #[error("A resend request is already in progress")]
    InFlight,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Client-side cooldown between resend requests.
///
/// Clones share one timer, so a clone can be handed to a ticker task while
/// this handle keeps serving requests. At most one request is in flight
/// across all clones.
#[derive(Debug, Clone)]
pub struct ResendThrottler {
    window: u32,
    remaining: Arc<AtomicU32>,
    in_flight: Arc<AtomicBool>,
}

/// Clears the in-flight flag when the request finishes or is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ResendThrottler {
    pub fn new(window_secs: u32) -> Self {
        Self {
            window: window_secs,
            remaining: Arc::new(AtomicU32::new(0)),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Seconds left before another resend is allowed.
    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::SeqCst)
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn can_resend(&self) -> bool {
        self.remaining() == 0 && !self.is_sending()
    }

    /// Send a resend request unless the cooldown is running or another request
    /// is still in flight.
    ///
    /// The timer restarts when the server accepted the request. A rejection
    /// carrying the server's remaining cooldown adopts that value; any other
    /// failure leaves the timer unchanged.
    pub async fn request_resend(
        &self,
        api: &dyn VerificationApi,
        email: &str,
    ) -> Result<ResendOutcome, ThrottleError> {
        let remaining = self.remaining();
        if remaining > 0 {
            return Err(ThrottleError::CoolingDown { remaining });
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ThrottleError::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        match api.resend(email).await {
            Ok(message) => {
                self.remaining.store(self.window, Ordering::SeqCst);
                tracing::debug!(window = self.window, "Resend accepted, cooldown started");
                Ok(ResendOutcome { message })
            }
            Err(err) => {
                if let Some(secs) = err.retry_after_secs() {
                    tracing::debug!(secs, "Server cooldown active, syncing timer");
                    self.sync_remaining(secs);
                }
                Err(err.into())
            }
        }
    }

    /// Advance the cooldown by one second. Returns the new remaining value.
    pub fn tick(&self) -> u32 {
        let previous = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |r| {
                Some(r.saturating_sub(1))
            })
            .unwrap_or(0);
        previous.saturating_sub(1)
    }

    /// Adopt a cooldown reported by the server, e.g. one started from another tab.
    pub fn sync_remaining(&self, secs: u64) {
        let secs = u32::try_from(secs).unwrap_or(u32::MAX);
        self.remaining.store(secs, Ordering::SeqCst);
    }

    /// Tick once per second until the cooldown reaches zero.
    pub fn spawn_ticker(&self) -> JoinHandle<()> {
        let throttler = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately.
            interval.tick().await;
            while throttler.remaining() > 0 {
                interval.tick().await;
                throttler.tick();
            }
        })
    }

    /// Label for the resend button.
    pub fn button_label(&self) -> String {
        match self.remaining() {
            0 => "Resend Verification Email".to_string(),
            n => format!("Resend in {n}s"),
        }
    }
}

impl Default for ResendThrottler {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_SECS)
    }
}
