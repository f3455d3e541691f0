//! Cooperative cancellation for chart computation.
//!
//! The solar-arc search issues many sequential ephemeris queries. A
//! `Cancellation` travels with every query so the caller can stop the search
//! (token) or bound it in wall-clock time (deadline).

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::core::ephemeris::EphemerisError;
use crate::core::error::{ChartError, Result};

/// Cancel token plus an optional deadline.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    token: CancellationToken,
    started: Option<Instant>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// Never cancelled unless [`Cancellation::cancel`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancellation driven by an existing token
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    /// Add a wall-clock budget measured from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let now = Instant::now();
        self.started = Some(now);
        self.deadline = Some(now + timeout);
        self
    }

    /// Fire the token; every clone observes it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Underlying token, e.g. to wire into an async runtime.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Deadline check for adapters that only speak `EphemerisError`.
    pub fn check_deadline(&self) -> std::result::Result<(), EphemerisError> {
        match (self.started, self.deadline) {
            (Some(started), Some(deadline)) if Instant::now() >= deadline => {
                Err(EphemerisError::Timeout {
                    elapsed_ms: started.elapsed().as_millis() as u64,
                })
            }
            _ => Ok(()),
        }
    }

    /// Fail if cancelled or past the deadline.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ChartError::Cancelled);
        }
        self.check_deadline()?;
        Ok(())
    }
}
