use serde::{Deserialize, Serialize};

/// Live flight data as reported by the vehicle
#[derive(Serialize, Deserialize, Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlightData {
    /// Height above the takeoff point in decimetres
    pub height: i16,
    /// Heading in degrees, [-180, 180)
    pub yaw: i16,
}

/// Raw stick positions sent to the vehicle, each in the i16 range
#[derive(Serialize, Deserialize, Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct StickState {
    /// Left stick, horizontal: rotation
    pub lx: i16,
    /// Left stick, vertical: throttle
    pub ly: i16,
    /// Right stick, horizontal: roll
    pub rx: i16,
    /// Right stick, vertical: pitch
    pub ry: i16,
}

/// Stick axis driven by one of the navigators
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Height,
    Yaw,
}

impl Axis {
    pub fn set(self, sticks: &mut StickState, value: i16) {
        match self {
            Axis::Height => sticks.ly = value,
            Axis::Yaw => sticks.lx = value,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Height => f.write_str("vertically"),
            Axis::Yaw => f.write_str("rotationally"),
        }
    }
}
