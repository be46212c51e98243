//! Heading navigation.
//!
//! Headings are reported in [-180, 180) with a discontinuity behind the vehicle,
//! so errors are computed on the [0, 360) compass and folded onto the short arc.
use crate::config::AutopilotParameters;
use crate::types::{Axis, FlightData};

use super::{NavError, Seek};

const HALF_TURN: i32 = 180;
const FULL_TURN: i32 = 360;

/// Heading on the [0, 360) compass
pub fn compass(deg: i16) -> i32 {
    i32::from(deg).rem_euclid(FULL_TURN)
}

/// Signed rotation in (-180, 180] taking `current` to `target` the short way.
/// Positive turns clockwise.
pub fn heading_error(target: i16, current: i16) -> i32 {
    let delta = compass(target) - compass(current);
    if delta > HALF_TURN {
        delta - FULL_TURN
    } else if delta <= -HALF_TURN {
        delta + FULL_TURN
    } else {
        delta
    }
}

/// Absolute heading reached after turning `delta` degrees from `current`
pub fn relative_target(current: i16, delta: i16) -> i16 {
    let current = (i32::from(current) + HALF_TURN).rem_euclid(FULL_TURN) - HALF_TURN;
    let target = current + i32::from(delta);
    let target = if target > HALF_TURN {
        target - FULL_TURN
    } else if target < -HALF_TURN {
        target + FULL_TURN
    } else {
        target
    };
    // [-180, 180] after folding
    target as i16
}

pub fn check_turn(delta: i16) -> Result<(), NavError> {
    if !(-180..=180).contains(&delta) {
        return Err(NavError::TurnOutOfRange(delta));
    }
    Ok(())
}

/// Rotate to an absolute heading
#[derive(Copy, Clone, Debug)]
pub struct YawSeek {
    target: i16,
}

impl YawSeek {
    pub fn new(target: i16) -> Result<Self, NavError> {
        if !(-180..=180).contains(&target) {
            return Err(NavError::YawOutOfRange(target));
        }
        Ok(Self {
            target,
        })
    }
}

impl Seek for YawSeek {
    const AXIS: Axis = Axis::Yaw;

    fn target(&self) -> i16 {
        self.target
    }

    fn error(&self, flight: &FlightData) -> i32 {
        heading_error(self.target, flight.yaw)
    }

    fn threshold(params: &AutopilotParameters) -> i16 {
        params.yaw_threshold_deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Controls;
    use crate::mock::RecordingLink;
    use crate::navigation::{NavigationState, Navigator, Step};
    use crate::telemetry::Telemetry;
    use std::sync::Arc;

    #[test]
    fn test_heading_error_short_arc() {
        assert_eq!(heading_error(-170, 170), 20);
        assert_eq!(heading_error(170, -170), -20);
        assert_eq!(heading_error(90, 0), 90);
        assert_eq!(heading_error(-90, 0), -90);
        assert_eq!(heading_error(-10, 10), -20);
        assert_eq!(heading_error(0, 179), 181 - 360);
        assert_eq!(heading_error(45, 45), 0);
    }

    #[test]
    fn test_heading_error_half_turn() {
        assert_eq!(heading_error(180, 0), 180);
        assert_eq!(heading_error(0, -180), 180);
        assert_eq!(heading_error(0, 180), 180);
        assert_eq!(heading_error(-180, 180), 0);
        for target in -180..=180 {
            for current in -180..180 {
                let e = heading_error(target, current);
                assert!(e > -180 && e <= 180, "{} -> {}: {}", current, target, e);
                assert_eq!((i32::from(current) + e - i32::from(target)).rem_euclid(360), 0);
            }
        }
    }

    #[test]
    fn test_relative_target_wraps() {
        assert_eq!(relative_target(170, 30), -160);
        assert_eq!(relative_target(-170, -30), 160);
        assert_eq!(relative_target(0, 180), 180);
        assert_eq!(relative_target(0, -180), -180);
        assert_eq!(relative_target(-180, -180), 0);
        assert_eq!(relative_target(179, 180), -1);
        assert_eq!(relative_target(20, -45), -25);
    }

    #[test]
    fn test_target_range() {
        assert!(YawSeek::new(180).is_ok());
        assert!(YawSeek::new(-180).is_ok());
        assert!(matches!(YawSeek::new(181), Err(NavError::YawOutOfRange(181))));
        assert!(matches!(YawSeek::new(-181), Err(NavError::YawOutOfRange(-181))));
        assert!(check_turn(-180).is_ok());
        assert!(matches!(check_turn(190), Err(NavError::TurnOutOfRange(190))));
    }

    #[test]
    fn test_turn_across_the_back() {
        let params = AutopilotParameters::default();
        let telemetry = Arc::new(Telemetry::new(FlightData {
            height: 0,
            yaw: 170,
        }));
        let link = Arc::new(RecordingLink::default());
        let controls = Arc::new(Controls::new(link.clone()));
        let state = Arc::new(NavigationState::new(Axis::Yaw));
        state.claim().unwrap();
        let seek = YawSeek::new(-170).unwrap();
        let (navigator, done) = Navigator::new(seek, state, telemetry.clone(), controls, &params);

        let rotation = |yaw: i16| {
            telemetry.update(|fd| fd.yaw = yaw);
            let step = navigator.step();
            (step, link.last().unwrap().lx)
        };
        assert_eq!(rotation(170), (Step::Continue, 32500));
        assert_eq!(rotation(-179), (Step::Continue, 16250));
        assert_eq!(rotation(-175), (Step::Continue, 16250));
        assert_eq!(rotation(-160), (Step::Continue, -16250));
        assert_eq!(rotation(-140), (Step::Continue, -32500));
        assert!(!done.try_done());
        assert_eq!(rotation(-170), (Step::Stopped, 0));
        assert!(done.try_done());
    }
}
