//! Ephemeris boundary
//!
//! The engine never computes planetary positions itself. It consumes them
//! through the [`EphemerisAdapter`] trait, which allows for mocking in tests
//! and alternative providers (Swiss Ephemeris bindings, remote services,
//! precomputed tables).
//!
//! Two data-driven adapters ship with the crate:
//!
//! - [`LinearEphemeris`]: constant daily motion per body, for tests and demos
//! - [`TabulatedEphemeris`]: externally produced samples, interpolated along
//!   the shortest arc

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::core::cancel::Cancellation;
use crate::core::error::{ChartError, Result, ResultExt};
use crate::core::longitude::Longitude;
use crate::core::models::{Body, GeoLocation};

/// Longitudes reported by an adapter for one instant
pub type BodyLongitudes = BTreeMap<Body, Longitude>;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Failures reported by an ephemeris adapter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    /// Provider failed (I/O, service error, bad data)
    #[error("{message}")]
    Unavailable { message: String },

    /// Provider answered without a required body
    #[error("no longitude for {body}")]
    MissingBody { body: Body },

    /// Instant outside the provider's coverage
    #[error("instant {instant} outside ephemeris coverage")]
    OutOfRange { instant: DateTime<Utc> },

    /// The caller's deadline passed
    #[error("timed out after {elapsed_ms} ms")]
    Timeout { elapsed_ms: u64 },

    /// A table could not be loaded
    #[error("invalid ephemeris table: {message}")]
    InvalidTable { message: String },
}

/// Source of geocentric ecliptic longitudes.
///
/// Implementations are treated as pure functions of (instant, location).
/// They may consult `cancel` during slow work; the engine also checks it
/// before every call.
#[cfg_attr(test, automock)]
pub trait EphemerisAdapter: Send + Sync {
    /// Longitudes for every body in [`Body::EPHEMERIS`] at `instant`.
    ///
    /// Any `Earth` entry is ignored by the engine; Earth is always Sun + 180°.
    fn longitudes_at(
        &self,
        instant: DateTime<Utc>,
        location: &GeoLocation,
        cancel: &Cancellation,
    ) -> std::result::Result<BodyLongitudes, EphemerisError>;

    /// Sun longitude alone; providers with a cheaper path may override.
    fn sun_longitude_at(
        &self,
        instant: DateTime<Utc>,
        location: &GeoLocation,
        cancel: &Cancellation,
    ) -> std::result::Result<Longitude, EphemerisError> {
        let longitudes = self.longitudes_at(instant, location, cancel)?;
        longitudes
            .get(&Body::Sun)
            .copied()
            .ok_or(EphemerisError::MissingBody { body: Body::Sun })
    }
}

/// Fractional days from `from` to `to` (negative if `to` is earlier).
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1e6 / SECONDS_PER_DAY,
        None => delta.num_milliseconds() as f64 / 1e3 / SECONDS_PER_DAY,
    }
}

/// Shift an instant by fractional days, at microsecond resolution.
///
/// Fails with `InvalidInput` when the result falls outside chrono's range.
pub fn offset_days(instant: DateTime<Utc>, days: f64) -> Result<DateTime<Utc>> {
    let delta = Duration::microseconds((days * SECONDS_PER_DAY * 1e6).round() as i64);
    instant.checked_add_signed(delta).ok_or_else(|| {
        ChartError::invalid_input(format!(
            "{} shifted by {} days is outside the representable range",
            instant, days
        ))
    })
}

// =============================================================================
// Linear (mean motion) adapter
// =============================================================================

/// Mean geocentric daily motion in degrees, used by [`LinearEphemeris::conjunct`].
pub const MEAN_DAILY_MOTION: [(Body, f64); 11] = [
    (Body::Sun, 0.985_647),
    (Body::Moon, 13.176_358),
    (Body::NorthNode, -0.052_954),
    (Body::Mercury, 0.985_647),
    (Body::Venus, 0.985_647),
    (Body::Mars, 0.524_033),
    (Body::Jupiter, 0.083_091),
    (Body::Saturn, 0.033_460),
    (Body::Uranus, 0.011_733),
    (Body::Neptune, 0.005_981),
    (Body::Pluto, 0.003_968),
];

/// Every body moves at a constant rate from its epoch longitude.
#[derive(Debug, Clone)]
pub struct LinearEphemeris {
    epoch: DateTime<Utc>,
    bodies: BTreeMap<Body, (Longitude, f64)>,
}

impl LinearEphemeris {
    /// Empty model; add bodies with [`LinearEphemeris::with_body`].
    pub fn new(epoch: DateTime<Utc>) -> Self {
        Self {
            epoch,
            bodies: BTreeMap::new(),
        }
    }

    /// All bodies start at `longitude` on `epoch` and move at their mean rates.
    pub fn conjunct(epoch: DateTime<Utc>, longitude: f64) -> Self {
        MEAN_DAILY_MOTION
            .iter()
            .fold(Self::new(epoch), |eph, (body, rate)| {
                eph.with_body(*body, longitude, *rate)
            })
    }

    /// Set (or replace) one body's epoch longitude and daily rate.
    pub fn with_body(mut self, body: Body, longitude: f64, degrees_per_day: f64) -> Self {
        self.bodies
            .insert(body, (Longitude::new(longitude), degrees_per_day));
        self
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }
}

impl EphemerisAdapter for LinearEphemeris {
    fn longitudes_at(
        &self,
        instant: DateTime<Utc>,
        _location: &GeoLocation,
        cancel: &Cancellation,
    ) -> std::result::Result<BodyLongitudes, EphemerisError> {
        cancel.check_deadline()?;
        let days = days_between(self.epoch, instant);
        Ok(self
            .bodies
            .iter()
            .map(|(body, (start, rate))| (*body, *start + rate * days))
            .collect())
    }
}

// =============================================================================
// Tabulated adapter
// =============================================================================

/// On-disk table layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EphemerisTable {
    pub samples: Vec<EphemerisSample>,
}

/// One row: longitudes keyed by body name (`"sun"`, `"north_node"`, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EphemerisSample {
    pub instant: DateTime<Utc>,
    pub longitudes: BTreeMap<String, f64>,
}

/// Interpolating adapter over precomputed samples.
///
/// Samples must be strictly increasing in time and close enough that no body
/// moves more than 180° between neighbours (daily rows are plenty).
#[derive(Debug, Clone)]
pub struct TabulatedEphemeris {
    samples: Vec<(DateTime<Utc>, BodyLongitudes)>,
}

impl TabulatedEphemeris {
    /// Validate and index a table.
    pub fn from_table(table: EphemerisTable) -> std::result::Result<Self, EphemerisError> {
        if table.samples.len() < 2 {
            return Err(invalid_table("at least two samples are required"));
        }

        let mut samples = Vec::with_capacity(table.samples.len());
        for (row, sample) in table.samples.into_iter().enumerate() {
            let mut longitudes = BodyLongitudes::new();
            for (name, degrees) in &sample.longitudes {
                let body = Body::parse(name)
                    .ok_or_else(|| invalid_table(format!("row {}: unknown body '{}'", row, name)))?;
                if body == Body::Earth {
                    continue;
                }
                let lon = Longitude::try_new(*degrees).ok_or_else(|| {
                    invalid_table(format!("row {}: non-finite longitude for {}", row, body))
                })?;
                longitudes.insert(body, lon);
            }
            if let Some(missing) = Body::EPHEMERIS.iter().find(|b| !longitudes.contains_key(b)) {
                return Err(invalid_table(format!("row {}: missing {}", row, missing)));
            }
            samples.push((sample.instant, longitudes));
        }

        if samples.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(invalid_table("sample instants must be strictly increasing"));
        }

        Ok(Self { samples })
    }

    /// Load a JSON table from disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(ChartError::from)
            .context(format!("reading ephemeris table {}", path.display()))?;
        let table: EphemerisTable = serde_json::from_str(&contents)
            .map_err(ChartError::from)
            .context(format!("parsing ephemeris table {}", path.display()))?;
        Ok(Self::from_table(table)?)
    }

    /// First and last covered instants
    pub fn coverage(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.samples[0].0, self.samples[self.samples.len() - 1].0)
    }
}

impl EphemerisAdapter for TabulatedEphemeris {
    fn longitudes_at(
        &self,
        instant: DateTime<Utc>,
        _location: &GeoLocation,
        cancel: &Cancellation,
    ) -> std::result::Result<BodyLongitudes, EphemerisError> {
        cancel.check_deadline()?;
        let (first, last) = self.coverage();
        if instant < first || instant > last {
            return Err(EphemerisError::OutOfRange { instant });
        }

        let hi = self.samples.partition_point(|(t, _)| *t <= instant);
        if hi == self.samples.len() {
            return Ok(self.samples[hi - 1].1.clone());
        }
        let (t0, lon0) = &self.samples[hi - 1];
        let (t1, lon1) = &self.samples[hi];
        let fraction = days_between(*t0, instant) / days_between(*t0, *t1);

        Ok(lon0
            .iter()
            .map(|(body, start)| (*body, start.lerp(lon1[body], fraction)))
            .collect())
    }
}

fn invalid_table(message: impl Into<String>) -> EphemerisError {
    EphemerisError::InvalidTable {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()
    }

    fn here() -> GeoLocation {
        GeoLocation {
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn full_row(instant: DateTime<Utc>, base: f64) -> EphemerisSample {
        let longitudes = Body::EPHEMERIS
            .iter()
            .enumerate()
            .map(|(i, b)| (format!("{:?}", b).to_lowercase(), base + i as f64))
            .collect();
        EphemerisSample {
            instant,
            longitudes,
        }
    }

    #[test]
    fn test_offset_days_out_of_range() {
        let err = offset_days(DateTime::<Utc>::MIN_UTC, -1.0).unwrap_err();
        assert!(err.is_input_error());
        assert!(offset_days(DateTime::<Utc>::MAX_UTC, 1.0).is_err());
    }

    #[test]
    fn test_days_between_and_offset_roundtrip() {
        let later = offset_days(epoch(), 1.5).unwrap();
        assert_relative_eq!(days_between(epoch(), later), 1.5, epsilon = 1e-9);
        assert_relative_eq!(days_between(later, epoch()), -1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_linear_motion() {
        let eph = LinearEphemeris::new(epoch()).with_body(Body::Sun, 359.0, 1.0);
        let cancel = Cancellation::new();
        let later = offset_days(epoch(), 2.0).unwrap();
        let lon = eph.longitudes_at(later, &here(), &cancel).unwrap();
        assert_relative_eq!(lon[&Body::Sun].degrees(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_conjunct_supplies_every_ephemeris_body() {
        let eph = LinearEphemeris::conjunct(epoch(), 10.0);
        let lon = eph
            .longitudes_at(epoch(), &here(), &Cancellation::new())
            .unwrap();
        assert_eq!(lon.len(), Body::EPHEMERIS.len());
        assert!(lon.values().all(|l| (l.degrees() - 10.0).abs() < 1e-12));
    }

    #[test]
    fn test_default_sun_longitude_reports_missing_sun() {
        let eph = LinearEphemeris::new(epoch()).with_body(Body::Moon, 0.0, 13.0);
        let err = eph
            .sun_longitude_at(epoch(), &here(), &Cancellation::new())
            .unwrap_err();
        assert_eq!(err, EphemerisError::MissingBody { body: Body::Sun });
    }

    #[test]
    fn test_table_interpolates_across_zero() {
        let t0 = epoch();
        let t1 = offset_days(t0, 1.0).unwrap();
        let table = EphemerisTable {
            samples: vec![full_row(t0, 359.5), full_row(t1, 0.5 + 360.0)],
        };
        let eph = TabulatedEphemeris::from_table(table).unwrap();
        let mid = offset_days(t0, 0.5).unwrap();
        let lon = eph.longitudes_at(mid, &here(), &Cancellation::new()).unwrap();
        assert_relative_eq!(lon[&Body::Sun].degrees(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_table_exact_endpoints() {
        let t0 = epoch();
        let t1 = offset_days(t0, 1.0).unwrap();
        let eph = TabulatedEphemeris::from_table(EphemerisTable {
            samples: vec![full_row(t0, 10.0), full_row(t1, 11.0)],
        })
        .unwrap();
        let cancel = Cancellation::new();
        let start = eph.longitudes_at(t0, &here(), &cancel).unwrap();
        let end = eph.longitudes_at(t1, &here(), &cancel).unwrap();
        assert_relative_eq!(start[&Body::Sun].degrees(), 10.0);
        assert_relative_eq!(end[&Body::Sun].degrees(), 11.0);
    }

    #[test]
    fn test_table_out_of_range() {
        let t0 = epoch();
        let eph = TabulatedEphemeris::from_table(EphemerisTable {
            samples: vec![full_row(t0, 10.0), full_row(offset_days(t0, 1.0).unwrap(), 11.0)],
        })
        .unwrap();
        let before = offset_days(t0, -1.0).unwrap();
        let err = eph
            .longitudes_at(before, &here(), &Cancellation::new())
            .unwrap_err();
        assert!(matches!(err, EphemerisError::OutOfRange { .. }));
    }

    #[test]
    fn test_table_rejects_missing_body() {
        let mut row = full_row(epoch(), 0.0);
        row.longitudes.remove("pluto");
        let err = TabulatedEphemeris::from_table(EphemerisTable {
            samples: vec![row, full_row(offset_days(epoch(), 1.0).unwrap(), 1.0)],
        })
        .unwrap_err();
        assert!(err.to_string().contains("missing Pluto"));
    }

    #[test]
    fn test_table_rejects_unordered_rows() {
        let err = TabulatedEphemeris::from_table(EphemerisTable {
            samples: vec![full_row(offset_days(epoch(), 1.0).unwrap(), 1.0), full_row(epoch(), 0.0)],
        })
        .unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn test_table_ignores_earth_column() {
        let mut row0 = full_row(epoch(), 0.0);
        row0.longitudes.insert("earth".to_string(), 42.0);
        let eph = TabulatedEphemeris::from_table(EphemerisTable {
            samples: vec![row0, full_row(offset_days(epoch(), 1.0).unwrap(), 1.0)],
        })
        .unwrap();
        let lon = eph
            .longitudes_at(epoch(), &here(), &Cancellation::new())
            .unwrap();
        assert!(!lon.contains_key(&Body::Earth));
    }

    #[test]
    fn test_table_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("table.json");
        let table = EphemerisTable {
            samples: vec![full_row(epoch(), 0.0), full_row(offset_days(epoch(), 1.0).unwrap(), 1.0)],
        };
        fs::write(&path, serde_json::to_string(&table).unwrap()).unwrap();
        let eph = TabulatedEphemeris::load_from_file(&path).unwrap();
        assert_eq!(eph.coverage().0, epoch());
    }

    #[test]
    fn test_mock_adapter_default_method_is_mockable() {
        let mut mock = MockEphemerisAdapter::new();
        mock.expect_sun_longitude_at()
            .returning(|_, _, _| Ok(Longitude::new(42.0)));
        let lon = mock
            .sun_longitude_at(epoch(), &here(), &Cancellation::new())
            .unwrap();
        assert_relative_eq!(lon.degrees(), 42.0);
    }
}
