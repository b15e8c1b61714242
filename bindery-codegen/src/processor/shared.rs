//! Coordinator handle for hosts that may deliver rounds from several threads.

use std::sync::{Mutex, MutexGuard};

use bindery_model::RoundEnv;
use eyre::{Result, eyre};

use super::{Coordinator, ProcessReport};

/// A [`Coordinator`] behind a mutex.
///
/// Rounds are serialized, so lazy initialization runs once and every caller
/// sees the fully built step list. Finalization takes the coordinator out;
/// any call after it fails.
pub struct SharedCoordinator {
    inner: Mutex<Option<Coordinator>>,
}

impl SharedCoordinator {
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            inner: Mutex::new(Some(coordinator)),
        }
    }

    /// See [`Coordinator::on_round`].
    pub fn on_round(&self, round: &dyn RoundEnv) -> Result<bool> {
        let mut guard = self.lock()?;
        let coordinator = guard
            .as_mut()
            .ok_or_else(|| eyre!("round delivered after finalization"))?;
        coordinator.on_round(round)
    }

    /// See [`Coordinator::on_last_round`].
    pub fn on_last_round(&self, round: &dyn RoundEnv) -> Result<ProcessReport> {
        let coordinator = self
            .lock()?
            .take()
            .ok_or_else(|| eyre!("coordinator was already finalized"))?;
        coordinator.on_last_round(round)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Coordinator>>> {
        self.inner
            .lock()
            .map_err(|_| eyre!("coordinator lock poisoned"))
    }
}
