use crate::models::{TransportEstimate, TravelMode};

/// Maps a trip distance to the modes worth offering and their durations.
///
/// Distance bands overlap, so a 300 km trip gets car, bus and train.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportModeEstimator {
    include_active_modes: bool,
}

impl TransportModeEstimator {
    pub fn new(include_active_modes: bool) -> Self {
        TransportModeEstimator {
            include_active_modes,
        }
    }

    /// Precondition: `distance_km > 0`. Callers never pass a zero-length trip;
    /// the straight-line fallback between two distinct points is always positive.
    pub fn estimate_modes(&self, distance_km: f64) -> Vec<TransportEstimate> {
        let mut modes = Vec::new();

        if distance_km < 50.0 {
            modes.push((TravelMode::Motorcycle, 40.0));
            modes.push((TravelMode::Car, 60.0));
        }

        if (50.0..500.0).contains(&distance_km) {
            modes.push((TravelMode::Car, 80.0));
            modes.push((TravelMode::Bus, 70.0));
        }

        if (200.0..1000.0).contains(&distance_km) {
            modes.push((TravelMode::Train, 120.0));
        }

        if distance_km >= 500.0 {
            modes.push((TravelMode::Plane, 800.0));
        }

        if self.include_active_modes {
            modes.push((TravelMode::Walking, 5.0));
            modes.push((TravelMode::Cycling, 15.0));
        }

        modes
            .into_iter()
            .map(|(mode, speed_kmh)| TransportEstimate::new(mode, speed_kmh, distance_km))
            .collect()
    }
}
