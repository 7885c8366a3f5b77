use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// A WGS84 position. Services speak `[longitude, latitude]`; navigation links
/// are written `latitude,longitude`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn lat_lng(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }

    pub fn lng_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<Coordinates> for Coord<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Coord {
            x: coordinates.longitude,
            y: coordinates.latitude,
        }
    }
}
