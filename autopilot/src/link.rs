use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use log::warn;

use crate::types::{Axis, StickState};

/// Delivers stick positions to the vehicle
pub trait StickLink: Send + Sync {
    fn send_stick_update(&self, sticks: StickState) -> Result<()>;
}

/// Stick positions shared by the navigators and manual input
pub struct Controls {
    sticks: Mutex<StickState>,
    link: Arc<dyn StickLink>,
}

impl Controls {
    pub fn new(link: Arc<dyn StickLink>) -> Self {
        Self {
            sticks: Mutex::new(StickState::default()),
            link,
        }
    }

    pub fn sticks(&self) -> StickState {
        *self.sticks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_axis(&self, axis: Axis, value: i16) {
        self.update(|sticks| axis.set(sticks, value));
    }

    pub fn update<F: FnOnce(&mut StickState)>(&self, f: F) {
        let mut sticks = self.sticks.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut sticks);
    }

    /// Send the current positions. Failures are only logged.
    pub fn flush(&self) {
        // Held across the send so packets reach the link in the order they were built
        let sticks = self.sticks.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = self.link.send_stick_update(*sticks) {
            warn!("Stick update not sent: {:#}", e);
        }
    }
}
