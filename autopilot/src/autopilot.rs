use std::sync::Arc;

use log::info;

use crate::config::AutopilotParameters;
use crate::link::{Controls, StickLink};
use crate::navigation::height::HeightSeek;
use crate::navigation::yaw::{self, YawSeek};
use crate::navigation::{launch, Done, NavError, NavigationState};
use crate::telemetry::Telemetry;
use crate::types::Axis;

/// Height and heading navigation on top of a live vehicle.
///
/// Both navigations run on their own thread and may run at the same time; each
/// only ever writes its own stick axis.
pub struct Autopilot {
    params: AutopilotParameters,
    telemetry: Arc<Telemetry>,
    controls: Arc<Controls>,
    height: Arc<NavigationState>,
    yaw: Arc<NavigationState>,
}

impl Autopilot {
    pub fn new(params: AutopilotParameters, telemetry: Arc<Telemetry>, link: Arc<dyn StickLink>) -> Self {
        Self {
            params,
            telemetry,
            controls: Arc::new(Controls::new(link)),
            height: Arc::new(NavigationState::new(Axis::Height)),
            yaw: Arc::new(NavigationState::new(Axis::Yaw)),
        }
    }

    /// Stick state shared with manual control
    pub fn controls(&self) -> &Arc<Controls> {
        &self.controls
    }

    /// Start moving to `dm` decimetres and return at once.
    /// The returned handle fires when the height is reached or the move is cancelled.
    pub fn auto_fly_to_height(&self, dm: i16) -> Result<Done, NavError> {
        let seek = HeightSeek::new(dm, &self.params)?;
        launch(seek, &self.height, &self.telemetry, &self.controls, &self.params)
    }

    /// Stop any vertical navigation. Harmless when none is running.
    pub fn cancel_auto_fly_to_height(&self) {
        self.height.cancel();
    }

    pub fn is_navigating_height(&self) -> bool {
        self.height.is_navigating()
    }

    /// Start rotating to the absolute heading `deg`, in [-180, 180]
    pub fn auto_turn_to_yaw(&self, deg: i16) -> Result<Done, NavError> {
        let seek = YawSeek::new(deg)?;
        launch(seek, &self.yaw, &self.telemetry, &self.controls, &self.params)
    }

    /// Start rotating by `delta` degrees from the current heading; negative is anticlockwise
    pub fn auto_turn_by_deg(&self, delta: i16) -> Result<Done, NavError> {
        yaw::check_turn(delta)?;
        if self.yaw.is_navigating() {
            return Err(NavError::AlreadyNavigating(Axis::Yaw));
        }
        let current = self.telemetry.yaw();
        let target = yaw::relative_target(current, delta);
        info!("Turning by {} from {}", delta, current);
        self.auto_turn_to_yaw(target)
    }

    /// Stop any rotation started by `auto_turn_to_yaw` or `auto_turn_by_deg`
    pub fn cancel_auto_turn(&self) {
        self.yaw.cancel();
    }

    pub fn is_navigating_yaw(&self) -> bool {
        self.yaw.is_navigating()
    }
}
