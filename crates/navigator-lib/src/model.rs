use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric identifier for a road network node.
pub type NodeId = u64;

/// WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when the pair lies inside the valid WGS84 range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Driving instruction attached to a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maneuver {
    Depart,
    Continue,
    SlightLeft,
    Left,
    SharpLeft,
    SlightRight,
    Right,
    SharpRight,
    UTurn,
    Arrive,
}

impl Maneuver {
    /// Classify a signed heading change (negative = left) into a maneuver.
    pub fn from_bearing_delta(delta: f64) -> Self {
        let magnitude = delta.abs();
        let left = delta < 0.0;
        match magnitude {
            m if m < 20.0 => Maneuver::Continue,
            m if m < 60.0 => {
                if left {
                    Maneuver::SlightLeft
                } else {
                    Maneuver::SlightRight
                }
            }
            m if m < 120.0 => {
                if left {
                    Maneuver::Left
                } else {
                    Maneuver::Right
                }
            }
            m if m < 170.0 => {
                if left {
                    Maneuver::SharpLeft
                } else {
                    Maneuver::SharpRight
                }
            }
            _ => Maneuver::UTurn,
        }
    }
}

impl fmt::Display for Maneuver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Maneuver::Depart => "depart",
            Maneuver::Continue => "continue",
            Maneuver::SlightLeft => "slight left",
            Maneuver::Left => "turn left",
            Maneuver::SharpLeft => "sharp left",
            Maneuver::SlightRight => "slight right",
            Maneuver::Right => "turn right",
            Maneuver::SharpRight => "sharp right",
            Maneuver::UTurn => "make a u-turn",
            Maneuver::Arrive => "arrive",
        };
        f.write_str(value)
    }
}

/// One instruction along a computed path.
///
/// Transport layers pass these through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationStep {
    pub maneuver: Maneuver,
    pub street: String,
    /// Length of this step in meters.
    pub distance: f64,
    /// Travel time of this step in seconds.
    pub eta: f64,
    /// Where the maneuver happens.
    pub location: Coordinate,
}

/// Full outcome of a navigation computation.
///
/// `route` is kept for internal consumers; response DTOs decide whether to
/// expose it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathResult {
    /// Human-readable description of the traversed nodes, e.g. `"1->5->4"`.
    pub path: String,
    /// Total length in meters.
    pub distance: f64,
    pub steps: Vec<NavigationStep>,
    pub found: bool,
    pub route: Vec<Coordinate>,
    /// Estimated travel time in seconds.
    pub eta: f64,
}
