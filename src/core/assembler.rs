//! Chart assembly
//!
//! Two ephemeris snapshots in, one immutable [`Chart`] out:
//!
//! ```text
//! birth ──► longitudes ──► Personality activations ──┐
//!   │                                                 ├─► Profile, Cross, Classification
//!   └─► solar arc ──► longitudes ──► Design activations ┘
//! ```
//!
//! Earth is never asked of the ephemeris; it is the Sun's opposite in both
//! snapshots. Any failure aborts the whole chart.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::core::bodygraph::{
    Authority, BodygraphClassifier, CenterSet, Channel, Definition, EnergyType,
};
use crate::core::cancel::Cancellation;
use crate::core::cross::{IncarnationCross, Profile};
use crate::core::ephemeris::{BodyLongitudes, EphemerisAdapter, EphemerisError};
use crate::core::error::{ChartError, Result};
use crate::core::gates::GateLineResolver;
use crate::core::longitude::Longitude;
use crate::core::models::{ActivationSet, Body, GeoLocation, Side};
use crate::core::solar_arc::{SolarArcConfig, SolarArcLocator};

/// A finished chart. Never mutated after assembly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub birth_instant: DateTime<Utc>,
    pub design_instant: DateTime<Utc>,
    pub location: GeoLocation,
    pub personality: ActivationSet,
    pub design: ActivationSet,
    pub profile: Profile,
    pub incarnation_cross: IncarnationCross,
    pub defined_centers: CenterSet,
    pub channels: Vec<Channel>,
    pub energy_type: EnergyType,
    pub strategy: &'static str,
    pub authority: Authority,
    pub definition: Definition,
    pub signature: &'static str,
    pub not_self_theme: &'static str,
}

impl Chart {
    /// Activations for one side
    pub fn side(&self, side: Side) -> &ActivationSet {
        match side {
            Side::Personality => &self.personality,
            Side::Design => &self.design,
        }
    }

    /// Every activated gate from both sides
    pub fn all_gates(&self) -> BTreeSet<u8> {
        let mut gates = self.personality.gates();
        gates.extend(self.design.gates());
        gates
    }

    /// Activated gates that are not part of any formed channel
    pub fn hanging_gates(&self) -> BTreeSet<u8> {
        let in_channels: BTreeSet<u8> = self
            .channels
            .iter()
            .flat_map(|c| [c.gate_a, c.gate_b])
            .collect();
        self.all_gates().difference(&in_channels).copied().collect()
    }

    /// Centers without definition
    pub fn open_centers(&self) -> CenterSet {
        self.defined_centers.complement()
    }
}

/// Builds charts against one ephemeris adapter.
pub struct ChartAssembler<'a, A: EphemerisAdapter + ?Sized> {
    adapter: &'a A,
    resolver: GateLineResolver,
    solar_arc: SolarArcConfig,
    classifier: BodygraphClassifier,
}

impl<'a, A: EphemerisAdapter + ?Sized> ChartAssembler<'a, A> {
    pub fn new(adapter: &'a A) -> Self {
        Self {
            adapter,
            resolver: GateLineResolver::new(),
            solar_arc: SolarArcConfig::default(),
            classifier: BodygraphClassifier::new(),
        }
    }

    pub fn with_resolver(mut self, resolver: GateLineResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_solar_arc(mut self, config: SolarArcConfig) -> Self {
        self.solar_arc = config;
        self
    }

    /// Compute the full chart for a birth instant and place.
    pub fn assemble(
        &self,
        birth_instant: DateTime<Utc>,
        location: &GeoLocation,
        cancel: &Cancellation,
    ) -> Result<Chart> {
        let personality = self.snapshot(birth_instant, location, cancel)?;

        let locator = SolarArcLocator::with_config(self.adapter, self.solar_arc.clone());
        let design_at = locator.locate_design_instant(
            birth_instant,
            personality.sun().longitude,
            location,
            cancel,
        )?;

        let design = self.snapshot(design_at.instant, location, cancel)?;

        let profile = Profile::from_activations(&personality, &design);
        let incarnation_cross = IncarnationCross::from_activations(&personality, &design, profile);

        let mut gates = personality.gates();
        gates.extend(design.gates());
        let classification = self.classifier.classify(&gates)?;
        let energy_type = classification.energy_type;

        info!(
            birth = %birth_instant,
            design = %design_at.instant,
            iterations = design_at.iterations,
            energy_type = %energy_type,
            profile = %profile,
            authority = %classification.authority,
            "chart assembled"
        );

        Ok(Chart {
            birth_instant,
            design_instant: design_at.instant,
            location: *location,
            personality,
            design,
            profile,
            incarnation_cross,
            defined_centers: classification.defined_centers,
            channels: classification.channels,
            energy_type,
            strategy: classification.strategy,
            authority: classification.authority,
            definition: classification.definition,
            signature: energy_type.signature(),
            not_self_theme: energy_type.not_self_theme(),
        })
    }

    /// One ephemeris query resolved into twelve activations.
    fn snapshot(
        &self,
        instant: DateTime<Utc>,
        location: &GeoLocation,
        cancel: &Cancellation,
    ) -> Result<ActivationSet> {
        cancel.check()?;
        let longitudes = self.adapter.longitudes_at(instant, location, cancel)?;
        self.resolve_snapshot(&longitudes)
    }

    fn resolve_snapshot(&self, longitudes: &BodyLongitudes) -> Result<ActivationSet> {
        let mut activations = Vec::with_capacity(Body::ALL.len());
        for body in Body::EPHEMERIS {
            let longitude = *longitudes
                .get(&body)
                .ok_or(EphemerisError::MissingBody { body })?;
            if !longitude.degrees().is_finite() {
                return Err(EphemerisError::Unavailable {
                    message: format!("non-finite longitude for {}", body),
                }
                .into());
            }
            activations.push(self.resolver.activation(body, longitude));
        }

        let sun: Longitude = activations[0].longitude;
        activations.push(self.resolver.activation(Body::Earth, sun.opposite()));

        ActivationSet::from_activations(activations).ok_or_else(|| {
            ChartError::from(EphemerisError::Unavailable {
                message: "incomplete body set".to_string(),
            })
        })
    }
}
