use crate::config::AutopilotParameters;
use crate::types::{Axis, FlightData};

use super::{NavError, Seek};

/// Climb or descend to an absolute height
#[derive(Copy, Clone, Debug)]
pub struct HeightSeek {
    target: i16,
}

impl HeightSeek {
    pub fn new(target: i16, params: &AutopilotParameters) -> Result<Self, NavError> {
        if target > params.height_limit_dm || target < -params.height_limit_dm {
            return Err(NavError::HeightOutOfRange(target));
        }
        Ok(Self {
            target,
        })
    }
}

impl Seek for HeightSeek {
    const AXIS: Axis = Axis::Height;

    fn target(&self) -> i16 {
        self.target
    }

    // Positive when the vehicle is too low
    fn error(&self, flight: &FlightData) -> i32 {
        i32::from(self.target) - i32::from(flight.height)
    }

    fn threshold(params: &AutopilotParameters) -> i16 {
        params.height_threshold_dm
    }
}
