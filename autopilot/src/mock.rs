use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::config::AutopilotParameters;
use crate::link::StickLink;
use crate::telemetry::Telemetry;
use crate::types::StickState;

const FULL_CLIMB_DM: i16 = 2;
const FULL_TURN_DEG: i16 = 5;

/// Crude vehicle: moves a fixed amount per step in the direction of the sticks
pub struct SimulatedDrone {
    telemetry: Arc<Telemetry>,
    sticks: Mutex<StickState>,
    full_scale: i16,
}

impl SimulatedDrone {
    pub fn new(telemetry: Arc<Telemetry>, params: &AutopilotParameters) -> Self {
        Self {
            telemetry,
            sticks: Mutex::new(StickState::default()),
            full_scale: params.full_scale,
        }
    }

    pub fn step(&self) {
        let sticks = *self.sticks.lock().unwrap_or_else(PoisonError::into_inner);
        let climb = self.rate(sticks.ly, FULL_CLIMB_DM);
        let turn = self.rate(sticks.lx, FULL_TURN_DEG);
        self.telemetry.update(|fd| {
            fd.height = fd.height.saturating_add(climb);
            fd.yaw = (fd.yaw + turn + 180).rem_euclid(360) - 180;
        });
    }

    pub fn run(&self, period: Duration, stop: &AtomicBool) {
        while !stop.load(Ordering::Relaxed) {
            thread::sleep(period);
            self.step();
        }
    }

    fn rate(&self, stick: i16, full: i16) -> i16 {
        match stick {
            0 => 0,
            s if s.unsigned_abs() >= self.full_scale.unsigned_abs() => full * s.signum(),
            s => s.signum(),
        }
    }
}

impl StickLink for SimulatedDrone {
    fn send_stick_update(&self, sticks: StickState) -> Result<()> {
        *self.sticks.lock().unwrap_or_else(PoisonError::into_inner) = sticks;
        Ok(())
    }
}

/// Keeps every stick update it is given
#[derive(Default)]
pub struct RecordingLink {
    sent: Mutex<Vec<StickState>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingLink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<StickState> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last(&self) -> Option<StickState> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).last().copied()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl StickLink for RecordingLink {
    fn send_stick_update(&self, sticks: StickState) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            bail!("link down");
        }
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(sticks);
        Ok(())
    }
}
