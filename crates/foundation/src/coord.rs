use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
///
/// Containment is evaluated in planar (longitude, latitude) space, so `x()`
/// and `y()` expose that ordering.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CoordinateError {
    NotFinite,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl std::fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateError::NotFinite => write!(f, "coordinate is not finite"),
            CoordinateError::LatitudeOutOfRange(v) => {
                write!(f, "latitude {v} outside [-90, 90]")
            }
            CoordinateError::LongitudeOutOfRange(v) => {
                write!(f, "longitude {v} outside [-180, 180]")
            }
        }
    }
}

impl std::error::Error for CoordinateError {}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate from GeoJSON ordering (`[lon, lat]`).
    pub const fn from_lon_lat(longitude: f64, latitude: f64) -> Self {
        Self::new(latitude, longitude)
    }

    /// Validating constructor for values coming from outside the process.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        let c = Self::new(latitude, longitude);
        c.validate()?;
        Ok(c)
    }

    pub fn validate(&self) -> Result<(), CoordinateError> {
        if !self.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.longitude
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.latitude
    }
}
