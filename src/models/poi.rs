use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PoiCategory {
    Hospital,
    University,
    School,
    Supermarket,
    Restaurant,
    Bank,
    Fuel,
    Hotel,
    Worship,
    Other,
}

impl PoiCategory {
    /// Every category that maps to a spatial-query tag. `Other` is excluded
    /// since it is only ever assigned to unmatched elements.
    pub const QUERYABLE: [PoiCategory; 9] = [
        PoiCategory::Hospital,
        PoiCategory::University,
        PoiCategory::School,
        PoiCategory::Supermarket,
        PoiCategory::Restaurant,
        PoiCategory::Bank,
        PoiCategory::Fuel,
        PoiCategory::Hotel,
        PoiCategory::Worship,
    ];
}

impl fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PoiCategory::Hospital => "hospital",
            PoiCategory::University => "university",
            PoiCategory::School => "school",
            PoiCategory::Supermarket => "supermarket",
            PoiCategory::Restaurant => "restaurant",
            PoiCategory::Bank => "bank",
            PoiCategory::Fuel => "fuel",
            PoiCategory::Hotel => "hotel",
            PoiCategory::Worship => "worship",
            PoiCategory::Other => "other",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PoiCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hospital" => Ok(PoiCategory::Hospital),
            "university" => Ok(PoiCategory::University),
            "school" => Ok(PoiCategory::School),
            "supermarket" => Ok(PoiCategory::Supermarket),
            "restaurant" => Ok(PoiCategory::Restaurant),
            "bank" => Ok(PoiCategory::Bank),
            "fuel" => Ok(PoiCategory::Fuel),
            "hotel" => Ok(PoiCategory::Hotel),
            "worship" | "place_of_worship" => Ok(PoiCategory::Worship),
            "other" => Ok(PoiCategory::Other),
            _ => Err(format!("Invalid POI category: {}", s)),
        }
    }
}

/// A categorized place loaded from the spatial-query service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Poi {
    /// OpenStreetMap element id
    pub id: i64,
    pub coordinates: Coordinates,
    pub title: String,
    pub category: PoiCategory,
}

impl Poi {
    pub fn new(id: i64, coordinates: Coordinates, title: String, category: PoiCategory) -> Self {
        Poi {
            id,
            coordinates,
            title,
            category,
        }
    }
}
