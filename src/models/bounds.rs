use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// Rectangular viewport expressed as latitude/longitude extrema.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
            return Err(format!(
                "Invalid latitude bounds: south={} north={}",
                south, north
            ));
        }
        if !(-180.0..=180.0).contains(&west) || !(-180.0..=180.0).contains(&east) {
            return Err(format!(
                "Invalid longitude bounds: west={} east={}",
                west, east
            ));
        }
        if south > north {
            return Err(format!("south ({}) must not exceed north ({})", south, north));
        }
        Ok(BoundingBox {
            south,
            west,
            north,
            east,
        })
    }

    pub fn contains(&self, point: &Coordinates) -> bool {
        let lat_ok = (self.south..=self.north).contains(&point.lat);
        // A box whose west edge is east of its east edge spans the antimeridian
        let lng_ok = if self.west <= self.east {
            (self.west..=self.east).contains(&point.lng)
        } else {
            point.lng >= self.west || point.lng <= self.east
        };
        lat_ok && lng_ok
    }

    /// Overpass QL bbox filter body: `south,west,north,east`.
    pub fn to_overpass(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}
