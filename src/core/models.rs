//! Core data structures for bodygraph
//!
//! Bodies, locations and the per-body gate activations that every later
//! stage (profile, cross, center classification) reads from.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::core::error::{ChartError, Result};
use crate::core::longitude::Longitude;

/// The twelve bodies that receive a gate activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Earth,
    Moon,
    NorthNode,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    /// All twelve bodies, in chart display order.
    pub const ALL: [Body; 12] = [
        Body::Sun,
        Body::Earth,
        Body::Moon,
        Body::NorthNode,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Bodies the ephemeris collaborator must supply. Earth is derived.
    pub const EPHEMERIS: [Body; 11] = [
        Body::Sun,
        Body::Moon,
        Body::NorthNode,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Earth => "Earth",
            Body::Moon => "Moon",
            Body::NorthNode => "North Node",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }

    /// Parse from a table key (`"sun"`, `"north_node"`, `"North Node"`, ...)
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "sun" => Some(Body::Sun),
            "earth" => Some(Body::Earth),
            "moon" => Some(Body::Moon),
            "northnode" | "node" | "truenode" | "meannode" | "rahu" => Some(Body::NorthNode),
            "mercury" => Some(Body::Mercury),
            "venus" => Some(Body::Venus),
            "mars" => Some(Body::Mars),
            "jupiter" => Some(Body::Jupiter),
            "saturn" => Some(Body::Saturn),
            "uranus" => Some(Body::Uranus),
            "neptune" => Some(Body::Neptune),
            "pluto" => Some(Body::Pluto),
            _ => None,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which snapshot an activation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Conscious, at the birth instant
    Personality,
    /// Unconscious, 88° of solar arc earlier
    Design,
}

/// Geographic location in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude, [-90, 90]
    pub latitude: f64,
    /// Longitude, [-180, 180]
    pub longitude: f64,
}

impl GeoLocation {
    /// Create a validated location
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let location = Self {
            latitude,
            longitude,
        };
        location.validate()?;
        Ok(location)
    }

    /// Reject NaN and out-of-range coordinates
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ChartError::invalid_input(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ChartError::invalid_input(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Parse a birth instant that carries an explicit UTC offset (RFC 3339).
///
/// Naive local times are rejected: timezone resolution belongs to the caller.
pub fn parse_birth_instant(s: &str) -> Result<DateTime<Utc>> {
    DateTime::<FixedOffset>::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            ChartError::invalid_input(format!(
                "birth instant '{}' is not RFC 3339 with an explicit offset: {}",
                s, e
            ))
        })
}

/// Validated birth instant and place: the whole input of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirthData {
    pub instant: DateTime<Utc>,
    pub location: GeoLocation,
}

impl BirthData {
    /// Parse an RFC 3339 instant and validate the coordinates.
    pub fn parse(instant: &str, latitude: f64, longitude: f64) -> Result<Self> {
        Ok(Self {
            instant: parse_birth_instant(instant)?,
            location: GeoLocation::new(latitude, longitude)?,
        })
    }
}

/// One body's resolved position on the gate wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateActivation {
    pub body: Body,
    /// Gate number, 1..=64
    pub gate: u8,
    /// Line number, 1..=6
    pub line: u8,
    pub longitude: Longitude,
}

impl GateActivation {
    /// `gate.line` notation, e.g. `"41.3"`
    pub fn notation(&self) -> String {
        format!("{}.{}", self.gate, self.line)
    }
}

/// Activations for all twelve bodies of one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ActivationSet {
    activations: BTreeMap<Body, GateActivation>,
}

impl ActivationSet {
    /// Build a set; `None` unless every one of the twelve bodies is present.
    pub fn from_activations(activations: impl IntoIterator<Item = GateActivation>) -> Option<Self> {
        let activations: BTreeMap<Body, GateActivation> =
            activations.into_iter().map(|a| (a.body, a)).collect();
        if Body::ALL.iter().all(|b| activations.contains_key(b)) && activations.len() == 12 {
            Some(Self { activations })
        } else {
            None
        }
    }

    /// Activation for a body; every body is present by construction.
    pub fn get(&self, body: Body) -> &GateActivation {
        &self.activations[&body]
    }

    pub fn sun(&self) -> &GateActivation {
        self.get(Body::Sun)
    }

    pub fn earth(&self) -> &GateActivation {
        self.get(Body::Earth)
    }

    /// Activations in chart display order
    pub fn iter(&self) -> impl Iterator<Item = &GateActivation> {
        Body::ALL.iter().map(move |b| &self.activations[b])
    }

    /// Distinct activated gate numbers
    pub fn gates(&self) -> BTreeSet<u8> {
        self.activations.values().map(|a| a.gate).collect()
    }
}

impl<'de> Deserialize<'de> for ActivationSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let activations = BTreeMap::<Body, GateActivation>::deserialize(deserializer)?;
        ActivationSet::from_activations(activations.into_values())
            .ok_or_else(|| de::Error::custom("activation set must cover all twelve bodies"))
    }
}
