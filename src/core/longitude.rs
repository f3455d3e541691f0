//! Ecliptic longitude with wraparound arithmetic.
//!
//! All angles live in `[0, 360)`. Differences are taken along the signed
//! shortest arc, so 359° → 1° is +2°, never -358°.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Degrees in a full turn
pub const FULL_CIRCLE: f64 = 360.0;

/// An ecliptic longitude normalized into `[0, 360)` degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Longitude(f64);

impl Longitude {
    /// Normalize any real number of degrees into `[0, 360)`.
    pub fn new(degrees: f64) -> Self {
        Self(normalize_degrees(degrees))
    }

    /// Like [`Longitude::new`] but rejects NaN and infinities.
    pub fn try_new(degrees: f64) -> Option<Self> {
        degrees.is_finite().then(|| Self::new(degrees))
    }

    /// Raw degrees in `[0, 360)`.
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// The diametrically opposite point (Sun → Earth).
    pub fn opposite(self) -> Self {
        self + 180.0
    }

    /// Signed shortest-arc distance from `self` to `other`, in `(-180, 180]`.
    ///
    /// Positive means `other` lies ahead of `self` in zodiacal order.
    pub fn arc_to(self, other: Longitude) -> f64 {
        let delta = (other.0 - self.0).rem_euclid(FULL_CIRCLE);
        if delta > 180.0 {
            delta - FULL_CIRCLE
        } else {
            delta
        }
    }

    /// Interpolate along the shortest arc: `t = 0` gives `self`, `t = 1` gives `other`.
    pub fn lerp(self, other: Longitude, t: f64) -> Self {
        self + self.arc_to(other) * t
    }

    /// Degrees, minutes and seconds within the 30° zodiac sign.
    pub fn sign_position(self) -> (u8, u8, u8, f64) {
        let sign = (self.0 / 30.0).floor() as u8;
        let within = self.0 - f64::from(sign) * 30.0;
        let deg = within.floor();
        let minutes = ((within - deg) * 60.0).floor();
        let seconds = ((within - deg) * 60.0 - minutes) * 60.0;
        (sign.min(11), deg as u8, minutes as u8, seconds)
    }
}

impl Add<f64> for Longitude {
    type Output = Longitude;

    fn add(self, rhs: f64) -> Longitude {
        Longitude::new(self.0 + rhs)
    }
}

impl Sub<f64> for Longitude {
    type Output = Longitude;

    fn sub(self, rhs: f64) -> Longitude {
        Longitude::new(self.0 - rhs)
    }
}

impl From<f64> for Longitude {
    fn from(degrees: f64) -> Self {
        Longitude::new(degrees)
    }
}

impl fmt::Display for Longitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}°", self.0)
    }
}

/// `rem_euclid` can round a tiny negative input up to exactly 360.0.
fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(FULL_CIRCLE);
    if wrapped >= FULL_CIRCLE {
        0.0
    } else {
        wrapped
    }
}
