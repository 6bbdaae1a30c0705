//! Bounded waiting on chain state.
//!
//! Every wait in the suites goes through these helpers so a stuck relayer or a
//! misbehaving contract ends the scenario with [`HarnessError::PollTimeout`]
//! instead of hanging the run.

use std::{thread, time::Duration};

use localic_std::transactions::ChainRequestBuilder;
use log::{debug, info};

use crate::{
    error::{HarnessError, HarnessResult},
    helpers::common::tick,
};

pub const DEFAULT_POLL_ATTEMPTS: u32 = 300;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollConfig {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Same interval, a different attempt budget.
    pub fn with_attempts(self, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..self
        }
    }
}

fn timeout(description: &str, cfg: &PollConfig) -> HarnessError {
    HarnessError::PollTimeout {
        what: description.to_string(),
        attempts: cfg.max_attempts,
    }
}

/// Runs `check` until it returns `Some`, sleeping `cfg.interval` between attempts.
/// Errors from `check` abort the wait.
pub fn poll_for<T>(
    description: &str,
    cfg: &PollConfig,
    mut check: impl FnMut() -> HarnessResult<Option<T>>,
) -> HarnessResult<T> {
    info!("{description}...");
    for attempt in 1..=cfg.max_attempts {
        if let Some(value) = check()? {
            debug!("{description}: done after {attempt} attempt(s)");
            return Ok(value);
        }
        if attempt < cfg.max_attempts {
            thread::sleep(cfg.interval);
        }
    }

    Err(timeout(description, cfg))
}

pub fn poll_until(
    description: &str,
    cfg: &PollConfig,
    mut check: impl FnMut() -> HarnessResult<bool>,
) -> HarnessResult<()> {
    poll_for(description, cfg, || Ok(check()?.then_some(())))
}

/// Like [`poll_for`], but an error from `action` counts as "not yet" and is
/// retried. Used for transactions that fail until some on-chain deadline passes.
pub fn retry_until_ok<T>(
    description: &str,
    cfg: &PollConfig,
    mut action: impl FnMut() -> HarnessResult<T>,
) -> HarnessResult<T> {
    poll_for(description, cfg, || match action() {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            debug!("{description}: {e}");
            Ok(None)
        }
    })
}

/// Ticks `clock` until `done` holds. `done` is checked before each tick.
pub fn tick_until(
    rb: &ChainRequestBuilder,
    from_key: &str,
    clock: &str,
    description: &str,
    cfg: &PollConfig,
    mut done: impl FnMut() -> HarnessResult<bool>,
) -> HarnessResult<()> {
    poll_until(description, cfg, || {
        if done()? {
            return Ok(true);
        }
        tick(rb, from_key, clock)?;
        Ok(false)
    })
}
