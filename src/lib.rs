//! bodygraph - Human Design chart engine
//!
//! Computes a chart from a birth instant and location: two ephemeris
//! snapshots (Personality at birth, Design 88° of solar arc earlier), each
//! body's longitude mapped to a (gate, line) pair, and the derived Profile,
//! Incarnation Cross, defined centers, Type, Strategy and Authority.
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **lib.rs** (this file): entry point and re-exports, no CLI concerns
//! - **core/**: the engine
//! - **formats/**: JSON and text rendering
//! - **bin/bodygraph.rs**: thin CLI wrapper
//!
//! Planetary positions come from an [`EphemerisAdapter`]; the crate ships
//! only data-driven adapters and never computes an ephemeris itself.
//!
//! # Example
//!
//! ```
//! use bodygraph::{compute_chart, Cancellation, ChartConfig, GeoLocation, LinearEphemeris};
//! use bodygraph::core::parse_birth_instant;
//!
//! let birth = parse_birth_instant("1991-08-13T13:31:00Z").unwrap();
//! let ephemeris = LinearEphemeris::conjunct(birth, 140.0935);
//! let location = GeoLocation::new(12.9716, 77.5946).unwrap();
//!
//! let chart = compute_chart(
//!     birth,
//!     location,
//!     &ephemeris,
//!     &ChartConfig::default(),
//!     &Cancellation::new(),
//! )
//! .unwrap();
//! assert_eq!(chart.personality.sun().gate, 7);
//! ```

use chrono::{DateTime, Utc};

pub mod core;
pub mod formats;

pub use crate::core::{
    Cancellation, Chart, ChartAssembler, ChartConfig, ChartError, EphemerisAdapter,
    EphemerisError, GeoLocation, LinearEphemeris, Result, TabulatedEphemeris,
};
pub use formats::OutputFormat;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compute a chart.
///
/// Input is validated before the ephemeris is touched. The result is
/// all-or-nothing: any failure returns an error and no partial chart.
pub fn compute_chart<A: EphemerisAdapter + ?Sized>(
    birth_instant: DateTime<Utc>,
    location: GeoLocation,
    adapter: &A,
    config: &ChartConfig,
    cancel: &Cancellation,
) -> Result<Chart> {
    location.validate()?;
    config.validate()?;

    ChartAssembler::new(adapter)
        .with_resolver(config.resolver())
        .with_solar_arc(config.solar_arc.clone())
        .assemble(birth_instant, &location, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_invalid_location_rejected_before_ephemeris() {
        let mut mock = crate::core::ephemeris::MockEphemerisAdapter::new();
        mock.expect_longitudes_at().never();
        mock.expect_sun_longitude_at().never();
        let bad = GeoLocation {
            latitude: 95.0,
            longitude: 0.0,
        };
        let err = compute_chart(
            Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
            bad,
            &mock,
            &ChartConfig::default(),
            &Cancellation::new(),
        )
        .unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let eph = LinearEphemeris::conjunct(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(), 0.0);
        let mut config = ChartConfig::default();
        config.wheel_offset_degrees = f64::NAN;
        let err = compute_chart(
            Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
            GeoLocation::new(0.0, 0.0).unwrap(),
            &eph,
            &config,
            &Cancellation::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::InvalidConfig { .. }));
    }

    #[test]
    fn test_ephemeris_failure_keeps_its_kind() {
        let mut mock = crate::core::ephemeris::MockEphemerisAdapter::new();
        mock.expect_longitudes_at().returning(|_, _, _| {
            Err(EphemerisError::Unavailable {
                message: "down".to_string(),
            })
        });
        mock.expect_sun_longitude_at().returning(|_, _, _| {
            Err(EphemerisError::Unavailable {
                message: "down".to_string(),
            })
        });
        let err = compute_chart(
            Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
            GeoLocation::new(0.0, 0.0).unwrap(),
            &mock,
            &ChartConfig::default(),
            &Cancellation::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::EphemerisUnavailable(_)), "{:?}", err);
    }

    #[test]
    fn test_cancellation_keeps_its_kind() {
        let birth = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let eph = LinearEphemeris::conjunct(birth, 0.0);
        let cancel = Cancellation::new();
        cancel.cancel();
        let err = compute_chart(
            birth,
            GeoLocation::new(0.0, 0.0).unwrap(),
            &eph,
            &ChartConfig::default(),
            &cancel,
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::Cancelled), "{:?}", err);
    }

    #[test]
    fn test_birth_at_calendar_floor_is_input_error() {
        let birth = DateTime::<Utc>::MIN_UTC;
        let eph = LinearEphemeris::conjunct(birth, 0.0);
        let err = compute_chart(
            birth,
            GeoLocation::new(0.0, 0.0).unwrap(),
            &eph,
            &ChartConfig::default(),
            &Cancellation::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::InvalidInput { .. }), "{:?}", err);
    }

    #[test]
    fn test_configured_wheel_offset_is_applied() {
        let birth = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        // 0° Aries: gate 25 line 1 unrotated, line 2 on the mandala
        let eph = LinearEphemeris::conjunct(birth, 0.0);
        let here = GeoLocation::new(0.0, 0.0).unwrap();
        let plain = compute_chart(birth, here, &eph, &ChartConfig::default(), &Cancellation::new())
            .unwrap();
        assert_eq!(plain.personality.sun().notation(), "25.1");

        let config = ChartConfig {
            wheel_offset_degrees: crate::core::gates::MANDALA_WHEEL_OFFSET,
            ..Default::default()
        };
        let rotated = compute_chart(birth, here, &eph, &config, &Cancellation::new()).unwrap();
        assert_eq!(rotated.personality.sun().notation(), "25.2");
    }
}
