use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walking,
    Cycling,
    Motorcycle,
    Car,
    Bus,
    Train,
    Plane,
}

impl TravelMode {
    pub fn icon(&self) -> &'static str {
        match self {
            TravelMode::Walking => "🚶",
            TravelMode::Cycling => "🚲",
            TravelMode::Motorcycle => "🏍️",
            TravelMode::Car => "🚗",
            TravelMode::Bus => "🚌",
            TravelMode::Train => "🚆",
            TravelMode::Plane => "✈️",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
            TravelMode::Motorcycle => "motorcycle",
            TravelMode::Car => "car",
            TravelMode::Bus => "bus",
            TravelMode::Train => "train",
            TravelMode::Plane => "plane",
        };
        write!(f, "{}", s)
    }
}

/// Travel time for one mode over a fixed distance. Derived, never persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransportEstimate {
    #[serde(rename = "name")]
    pub mode: TravelMode,
    pub speed_kmh: f64,
    pub icon: &'static str,
    pub duration_hours: f64,
}

impl TransportEstimate {
    pub fn new(mode: TravelMode, speed_kmh: f64, distance_km: f64) -> Self {
        TransportEstimate {
            mode,
            speed_kmh,
            icon: mode.icon(),
            duration_hours: distance_km / speed_kmh,
        }
    }
}
