//! Closed loop navigation on a single stick axis.
//!
//! Each navigation runs on its own thread and drives one axis with a two-speed
//! bang-bang law until the error is zero or the navigation is cancelled. The
//! caller gets a [`Done`] handle that fires once when the thread stops.
//!
//! The axis flag, the telemetry and the stick state each have their own lock and
//! none of them is taken while holding another. The only nesting is the link's own
//! lock, taken under the stick lock while a flush is sent.
pub mod height;
pub mod yaw;

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use log::{debug, info};
use thiserror::Error;
use thread_priority::{ThreadBuilder, ThreadPriority};

use crate::config::AutopilotParameters;
use crate::link::Controls;
use crate::telemetry::Telemetry;
use crate::types::{Axis, FlightData};

#[derive(Debug, Error)]
pub enum NavError {
    #[error("Vertical navigation limit exceeded: {0} dm")]
    HeightOutOfRange(i16),
    #[error("Target yaw must be between -180 and +180, got {0}")]
    YawOutOfRange(i16),
    #[error("Turn amount must be between -180 and +180, got {0}")]
    TurnOutOfRange(i16),
    #[error("Already navigating {0}")]
    AlreadyNavigating(Axis),
    #[error("Cannot start navigator thread")]
    Spawn(#[source] std::io::Error),
}

#[derive(Default, Debug)]
struct Flags {
    /// Cleared to request a stop
    active: bool,
    /// Set while a navigator thread owns the axis
    running: bool,
}

/// Ownership of one axis by at most one navigator
#[derive(Debug)]
pub struct NavigationState {
    axis: Axis,
    flags: Mutex<Flags>,
}

impl NavigationState {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            flags: Mutex::new(Flags::default()),
        }
    }

    pub fn claim(&self) -> Result<(), NavError> {
        let mut flags = self.lock();
        if flags.active || flags.running {
            return Err(NavError::AlreadyNavigating(self.axis));
        }
        flags.active = true;
        flags.running = true;
        Ok(())
    }

    /// Ask the navigator to stop. No-op when idle.
    pub fn cancel(&self) {
        self.lock().active = false;
    }

    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    /// True until the navigator thread has zeroed its axis and signalled
    pub fn is_navigating(&self) -> bool {
        self.lock().running
    }

    fn release(&self) {
        let mut flags = self.lock();
        flags.active = false;
        flags.running = false;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Flags> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fires once when a navigation stops, whether it reached its target or was cancelled
#[derive(Debug)]
pub struct Done(Receiver<()>);

impl Done {
    /// Blocks until the navigation stops
    pub fn wait(&self) -> bool {
        self.0.recv().is_ok()
    }

    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.0.recv_timeout(timeout).is_ok()
    }

    pub fn try_done(&self) -> bool {
        self.0.try_recv().is_ok()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Drive(i16),
    Reached,
}

/// Full scale beyond `threshold`, half scale within, nothing at zero error
pub fn bang_bang(error: i32, threshold: i16, full: i16, half: i16) -> Command {
    let threshold = i32::from(threshold);
    match error {
        e if e > threshold => Command::Drive(full),
        e if e > 0 => Command::Drive(half),
        e if e < -threshold => Command::Drive(-full),
        e if e < 0 => Command::Drive(-half),
        _ => Command::Reached,
    }
}

/// What a navigator is trying to zero
pub trait Seek: Send + 'static {
    const AXIS: Axis;

    fn target(&self) -> i16;

    fn error(&self, flight: &FlightData) -> i32;

    fn threshold(params: &AutopilotParameters) -> i16;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Stopped,
}

pub struct Navigator<S> {
    seek: S,
    state: Arc<NavigationState>,
    telemetry: Arc<Telemetry>,
    controls: Arc<Controls>,
    threshold: i16,
    full_scale: i16,
    half_scale: i16,
    done: SyncSender<()>,
}

impl<S: Seek> Navigator<S> {
    /// The axis must already be claimed on `state`
    pub fn new(
        seek: S,
        state: Arc<NavigationState>,
        telemetry: Arc<Telemetry>,
        controls: Arc<Controls>,
        params: &AutopilotParameters,
    ) -> (Self, Done) {
        let (done, receiver) = sync_channel(1);
        let navigator = Self {
            seek,
            state,
            telemetry,
            controls,
            threshold: S::threshold(params),
            full_scale: params.full_scale,
            half_scale: params.half_scale,
            done,
        };
        (navigator, Done(receiver))
    }

    /// One control tick
    pub fn step(&self) -> Step {
        if !self.state.is_active() {
            info!("Navigation {} cancelled", S::AXIS);
            self.finish();
            return Step::Stopped;
        }

        let flight = self.telemetry.snapshot();
        let error = self.seek.error(&flight);
        debug!("Target: {}, Flight: {:?}, Error: {}", self.seek.target(), flight, error);

        match bang_bang(error, self.threshold, self.full_scale, self.half_scale) {
            Command::Drive(value) => {
                self.controls.set_axis(S::AXIS, value);
                self.controls.flush();
                Step::Continue
            },
            Command::Reached => {
                info!("Navigation {} reached {}", S::AXIS, self.seek.target());
                self.finish();
                Step::Stopped
            },
        }
    }

    pub fn run(self, period: Duration) {
        while self.step() == Step::Continue {
            thread::sleep(period);
        }
    }

    fn finish(&self) {
        self.controls.set_axis(S::AXIS, 0);
        self.controls.flush();
        self.state.release();
        let _ = self.done.try_send(());
    }
}

fn thread_name(axis: Axis) -> &'static str {
    match axis {
        Axis::Height => "height-nav",
        Axis::Yaw => "yaw-nav",
    }
}

/// Claim the axis and start a navigator thread on it
pub fn launch<S: Seek>(
    seek: S,
    state: &Arc<NavigationState>,
    telemetry: &Arc<Telemetry>,
    controls: &Arc<Controls>,
    params: &AutopilotParameters,
) -> Result<Done, NavError> {
    state.claim()?;
    info!("Navigating {} to {}", S::AXIS, seek.target());

    let (navigator, done) = Navigator::new(seek, state.clone(), telemetry.clone(), controls.clone(), params);
    let period = params.period();
    let spawned = ThreadBuilder::default()
        .name(thread_name(S::AXIS))
        .priority(ThreadPriority::Max)
        .spawn_careless(move || navigator.run(period));

    match spawned {
        Ok(_) => Ok(done),
        Err(e) => {
            state.release();
            Err(NavError::Spawn(e))
        },
    }
}
