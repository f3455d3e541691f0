//! Solar arc search for the Design instant
//!
//! The Design snapshot is taken when the Sun stood exactly 88° of arc behind
//! its birth position. The Sun's speed varies over the year (about
//! 0.953–1.019°/day), so the instant is found by iterating against the
//! ephemeris, never by assuming the mean rate.
//!
//! # Method
//!
//! ```text
//! residual(t) = arc from target to Sun(t)      (signed, degrees)
//!
//! [birth - 96d, birth - 84d]  bracket, residual < 0 at the early end, > 0 at the late end
//!          ↓
//! Illinois false position until |residual| ≤ tolerance
//! ```
//!
//! Every ephemeris query counts toward the iteration cap, bracketing included.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::cancel::Cancellation;
use crate::core::ephemeris::{offset_days, EphemerisAdapter};
use crate::core::error::{ChartError, Result};
use crate::core::longitude::Longitude;
use crate::core::models::GeoLocation;

/// Narrowest bracket worth splitting, in days (about 0.1 s)
const MIN_BRACKET_DAYS: f64 = 1e-6;

/// The Design instant never comes closer than this to birth
const MIN_DESIGN_GAP_DAYS: f64 = 1.0;

/// The Sun covers every longitude within a year; no bracket is sought further back
const MAX_SEARCH_DAYS: f64 = 366.0;

/// Search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarArcConfig {
    /// Solar arc between Design and Personality Sun
    pub arc_degrees: f64,
    /// Accepted |residual| in degrees
    pub tolerance_degrees: f64,
    /// Cap on ephemeris queries per search
    pub max_iterations: usize,
    /// Early end of the initial bracket, days before birth
    pub window_start_days: f64,
    /// Late end of the initial bracket, days before birth
    pub window_end_days: f64,
}

impl Default for SolarArcConfig {
    fn default() -> Self {
        Self {
            arc_degrees: 88.0,
            tolerance_degrees: 1e-4,
            max_iterations: 64,
            window_start_days: 96.0,
            window_end_days: 84.0,
        }
    }
}

impl SolarArcConfig {
    /// Reject parameters the search cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.arc_degrees.is_finite() || self.arc_degrees <= 0.0 || self.arc_degrees >= 360.0 {
            return Err(ChartError::invalid_config(format!(
                "solar_arc.arc_degrees must be in (0, 360), got {}",
                self.arc_degrees
            )));
        }
        if !self.tolerance_degrees.is_finite() || self.tolerance_degrees <= 0.0 {
            return Err(ChartError::invalid_config(format!(
                "solar_arc.tolerance_degrees must be positive, got {}",
                self.tolerance_degrees
            )));
        }
        if self.max_iterations < 2 {
            return Err(ChartError::invalid_config(
                "solar_arc.max_iterations must be at least 2",
            ));
        }
        let window_ok = self.window_start_days.is_finite()
            && self.window_end_days.is_finite()
            && self.window_end_days >= MIN_DESIGN_GAP_DAYS
            && self.window_start_days > self.window_end_days
            && self.window_start_days <= MAX_SEARCH_DAYS;
        if !window_ok {
            return Err(ChartError::invalid_config(format!(
                "solar_arc window must satisfy {} >= start > end >= {} days, got {} .. {}",
                MAX_SEARCH_DAYS, MIN_DESIGN_GAP_DAYS, self.window_start_days, self.window_end_days
            )));
        }
        Ok(())
    }
}

/// A located Design instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignInstant {
    pub instant: DateTime<Utc>,
    /// Sun longitude reported at `instant`
    pub sun: Longitude,
    /// Signed residual to the target, degrees
    pub residual_degrees: f64,
    /// Ephemeris queries spent
    pub iterations: usize,
}

/// Finds the Design instant against an ephemeris adapter.
pub struct SolarArcLocator<'a, A: EphemerisAdapter + ?Sized> {
    adapter: &'a A,
    config: SolarArcConfig,
}

/// Per-search state: counts queries and enforces the cap.
struct Probe<'a, 'b, A: EphemerisAdapter + ?Sized> {
    adapter: &'a A,
    location: &'b GeoLocation,
    cancel: &'b Cancellation,
    birth: DateTime<Utc>,
    target: Longitude,
    max_iterations: usize,
    iterations: usize,
    last_residual: f64,
}

impl<A: EphemerisAdapter + ?Sized> Probe<'_, '_, A> {
    /// Residual at `days` relative to birth; returns the evaluated instant too.
    fn eval(&mut self, days: f64) -> Result<(DateTime<Utc>, Longitude, f64)> {
        if self.iterations >= self.max_iterations {
            return Err(self.fail("iteration cap reached"));
        }
        self.cancel.check()?;
        let instant = offset_days(self.birth, days)?;
        self.iterations += 1;

        let sun = self
            .adapter
            .sun_longitude_at(instant, self.location, self.cancel)?;
        let residual = self.target.arc_to(sun);
        self.last_residual = residual;

        debug!(
            iteration = self.iterations,
            %instant,
            sun = sun.degrees(),
            residual,
            "solar arc probe"
        );
        Ok((instant, sun, residual))
    }

    fn fail(&self, reason: &str) -> ChartError {
        ChartError::SolarArcConvergence {
            iterations: self.iterations,
            residual_degrees: self.last_residual,
            reason: reason.to_string(),
        }
    }

    fn found(&self, instant: DateTime<Utc>, sun: Longitude, residual: f64) -> DesignInstant {
        DesignInstant {
            instant,
            sun,
            residual_degrees: residual,
            iterations: self.iterations,
        }
    }
}

impl<'a, A: EphemerisAdapter + ?Sized> SolarArcLocator<'a, A> {
    /// Locator with default parameters
    pub fn new(adapter: &'a A) -> Self {
        Self::with_config(adapter, SolarArcConfig::default())
    }

    pub fn with_config(adapter: &'a A, config: SolarArcConfig) -> Self {
        Self { adapter, config }
    }

    pub fn config(&self) -> &SolarArcConfig {
        &self.config
    }

    /// Sun longitude the Design instant must reach
    pub fn target_longitude(&self, personality_sun: Longitude) -> Longitude {
        personality_sun - self.config.arc_degrees
    }

    /// Find the instant before `personality_instant` at which the Sun sits
    /// `arc_degrees` behind `personality_sun`.
    pub fn locate_design_instant(
        &self,
        personality_instant: DateTime<Utc>,
        personality_sun: Longitude,
        location: &GeoLocation,
        cancel: &Cancellation,
    ) -> Result<DesignInstant> {
        let tol = self.config.tolerance_degrees;
        let mut probe = Probe {
            adapter: self.adapter,
            location,
            cancel,
            birth: personality_instant,
            target: self.target_longitude(personality_sun),
            max_iterations: self.config.max_iterations,
            iterations: 0,
            last_residual: f64::NAN,
        };

        // Bracket: early end behind the target, late end past it.
        let mut lo = -self.config.window_start_days;
        let mut hi = -self.config.window_end_days;
        let (mut t_lo, mut sun_lo, mut f_lo) = probe.eval(lo)?;
        let (mut t_hi, mut sun_hi, mut f_hi) = probe.eval(hi)?;

        while f_lo >= 0.0 || f_hi <= 0.0 {
            if f_lo.abs() <= tol {
                return Ok(probe.found(t_lo, sun_lo, f_lo));
            }
            if f_hi.abs() <= tol {
                return Ok(probe.found(t_hi, sun_hi, f_hi));
            }
            let span = hi - lo;
            warn!(lo, hi, f_lo, f_hi, "solar arc bracket does not straddle target, widening");
            if f_lo >= 0.0 {
                let widened = (lo - span).max(-MAX_SEARCH_DAYS);
                if widened >= lo {
                    return Err(probe.fail("no bracket within one year before birth"));
                }
                lo = widened;
                (t_lo, sun_lo, f_lo) = probe.eval(lo)?;
            }
            if f_hi <= 0.0 {
                let widened = (hi + span).min(-MIN_DESIGN_GAP_DAYS);
                if widened <= hi {
                    return Err(probe.fail("no bracket before the birth instant"));
                }
                hi = widened;
                (t_hi, sun_hi, f_hi) = probe.eval(hi)?;
            }
        }

        // Illinois false position: the stale end's residual is halved so the
        // bracket keeps shrinking from both sides.
        let mut stale_side = 0i8;
        loop {
            if hi - lo < MIN_BRACKET_DAYS {
                return Err(probe.fail("bracket collapsed without reaching tolerance"));
            }

            let mut t = (lo * f_hi - hi * f_lo) / (f_hi - f_lo);
            if !(t > lo && t < hi) {
                t = 0.5 * (lo + hi);
            }

            let (instant, sun, f) = probe.eval(t)?;
            if f.abs() <= tol {
                return Ok(probe.found(instant, sun, f));
            }

            if f > 0.0 {
                hi = t;
                f_hi = f;
                if stale_side == -1 {
                    f_lo *= 0.5;
                }
                stale_side = -1;
            } else {
                lo = t;
                f_lo = f;
                if stale_side == 1 {
                    f_hi *= 0.5;
                }
                stale_side = 1;
            }
        }
    }
}
