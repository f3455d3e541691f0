//! Design-instant search against a Sun with realistic, non-uniform speed

use bodygraph::core::ephemeris::{days_between, offset_days, BodyLongitudes, EphemerisAdapter};
use bodygraph::core::{
    Body, Cancellation, ChartError, EphemerisError, GeoLocation, Longitude, SolarArcConfig,
    SolarArcLocator,
};
use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Low-precision solar longitude: mean motion plus the equation of center.
/// The apparent speed varies between about 0.953 and 1.019 degrees per day.
struct KeplerSun {
    calls: AtomicUsize,
}

impl KeplerSun {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn sun(instant: DateTime<Utc>) -> Longitude {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let d = days_between(j2000, instant);
        let mean = 280.460 + 0.985_647_4 * d;
        let g = (357.528 + 0.985_600_3 * d).to_radians();
        Longitude::new(mean + 1.915 * g.sin() + 0.020 * (2.0 * g).sin())
    }
}

impl EphemerisAdapter for KeplerSun {
    fn longitudes_at(
        &self,
        instant: DateTime<Utc>,
        _location: &GeoLocation,
        cancel: &Cancellation,
    ) -> Result<BodyLongitudes, EphemerisError> {
        cancel.check_deadline()?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut lons = BodyLongitudes::new();
        lons.insert(Body::Sun, Self::sun(instant));
        Ok(lons)
    }
}

fn here() -> GeoLocation {
    GeoLocation::new(51.5, -0.12).unwrap()
}

fn locate(eph: &KeplerSun, birth: DateTime<Utc>) -> bodygraph::Result<bodygraph::core::DesignInstant> {
    SolarArcLocator::new(eph).locate_design_instant(
        birth,
        KeplerSun::sun(birth),
        &here(),
        &Cancellation::new(),
    )
}

#[test]
fn test_converges_within_tolerance() {
    let eph = KeplerSun::new();
    let birth = Utc.with_ymd_and_hms(1991, 8, 13, 13, 31, 0).unwrap();
    let found = locate(&eph, birth).unwrap();

    assert!(found.residual_degrees.abs() <= 1e-4);
    let arc = KeplerSun::sun(found.instant).arc_to(KeplerSun::sun(birth));
    assert!((arc - 88.0).abs() <= 1e-4, "arc {}", arc);
    assert!(found.iterations <= 64);
    assert_eq!(eph.calls.load(Ordering::SeqCst), found.iterations);
}

#[test]
fn test_design_gap_tracks_solar_speed() {
    let eph = KeplerSun::new();
    // Sun is fastest near perihelion (January) and slowest near aphelion (July)
    let winter = Utc.with_ymd_and_hms(2001, 3, 1, 0, 0, 0).unwrap();
    let summer = Utc.with_ymd_and_hms(2001, 9, 1, 0, 0, 0).unwrap();
    let winter_gap = -days_between(winter, locate(&eph, winter).unwrap().instant);
    let summer_gap = -days_between(summer, locate(&eph, summer).unwrap().instant);

    assert!((84.0..=96.0).contains(&winter_gap), "{}", winter_gap);
    assert!((84.0..=96.0).contains(&summer_gap), "{}", summer_gap);
    assert!(winter_gap < summer_gap);
}

#[test]
fn test_narrow_window_widens_and_converges() {
    let eph = KeplerSun::new();
    let birth = Utc.with_ymd_and_hms(1975, 2, 2, 6, 0, 0).unwrap();
    let config = SolarArcConfig {
        window_start_days: 20.0,
        window_end_days: 10.0,
        ..Default::default()
    };
    let found = SolarArcLocator::with_config(&eph, config)
        .locate_design_instant(birth, KeplerSun::sun(birth), &here(), &Cancellation::new())
        .unwrap();
    assert!(found.residual_degrees.abs() <= 1e-4);
}

#[test]
fn test_iteration_cap_surfaces_convergence_error() {
    let eph = KeplerSun::new();
    let birth = Utc.with_ymd_and_hms(1975, 2, 2, 6, 0, 0).unwrap();
    let config = SolarArcConfig {
        max_iterations: 3,
        tolerance_degrees: 1e-12,
        ..Default::default()
    };
    let err = SolarArcLocator::with_config(&eph, config)
        .locate_design_instant(birth, KeplerSun::sun(birth), &here(), &Cancellation::new())
        .unwrap_err();
    match err {
        ChartError::SolarArcConvergence { iterations, .. } => assert_eq!(iterations, 3),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(eph.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_cancellation_surfaces_cancelled() {
    let eph = KeplerSun::new();
    let cancel = Cancellation::new();
    cancel.cancel();
    let birth = Utc.with_ymd_and_hms(1975, 2, 2, 6, 0, 0).unwrap();
    let err = SolarArcLocator::new(&eph)
        .locate_design_instant(birth, KeplerSun::sun(birth), &here(), &cancel)
        .unwrap_err();
    assert!(matches!(err, ChartError::Cancelled));
    assert_eq!(eph.calls.load(Ordering::SeqCst), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Residual stays within tolerance for births across a century
    #[test]
    fn prop_residual_within_tolerance(days in 0.0f64..36_525.0) {
        let eph = KeplerSun::new();
        let epoch = Utc.with_ymd_and_hms(1925, 1, 1, 0, 0, 0).unwrap();
        let birth = offset_days(epoch, days).unwrap();
        let found = locate(&eph, birth).unwrap();
        prop_assert!(found.residual_degrees.abs() <= 1e-4);
        prop_assert!(found.instant < birth);
        prop_assert!(found.iterations <= 64);
    }
}
