#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A favorited location as stored by the favorites source.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct City {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl City {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_coordinates(self, latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..self
        }
    }
}

/// A device location fix in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Daily temperature breakdown reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TempRange {
    pub day: f64,
    pub eve: f64,
    pub max: f64,
    pub min: f64,
    pub morn: f64,
    pub night: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Weather {
    pub city: String,
    pub description: String,
    pub temperature: f64,
    pub temp: Option<TempRange>,
}

impl Weather {
    pub fn new(city: impl Into<String>, description: impl Into<String>, temperature: f64) -> Self {
        Self {
            city: city.into(),
            description: description.into(),
            temperature,
            temp: None,
        }
    }

    pub fn with_temp(self, temp: TempRange) -> Self {
        Self {
            temp: Some(temp),
            ..self
        }
    }
}
