//! Type, Strategy, Authority and Definition from formed channels.
//!
//! The center graph is static: nine nodes, 36 possible edges. A chart only
//! switches edges on (formed channels); every question below is a
//! reachability or set-membership query over that graph.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::centers::{Center, CenterSet};
use super::channels::{formed_channels, Channel};
use crate::core::error::{ChartError, Result};

/// Energy type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyType {
    Manifestor,
    Generator,
    ManifestingGenerator,
    Projector,
    Reflector,
}

impl EnergyType {
    pub fn name(&self) -> &'static str {
        match self {
            EnergyType::Manifestor => "Manifestor",
            EnergyType::Generator => "Generator",
            EnergyType::ManifestingGenerator => "Manifesting Generator",
            EnergyType::Projector => "Projector",
            EnergyType::Reflector => "Reflector",
        }
    }

    pub fn strategy(&self) -> &'static str {
        match self {
            EnergyType::Manifestor => "To Inform",
            EnergyType::Generator | EnergyType::ManifestingGenerator => "To Respond",
            EnergyType::Projector => "Wait for the Invitation",
            EnergyType::Reflector => "Wait a Lunar Cycle",
        }
    }

    /// Theme felt when living by the strategy
    pub fn signature(&self) -> &'static str {
        match self {
            EnergyType::Manifestor => "Peace",
            EnergyType::Generator | EnergyType::ManifestingGenerator => "Satisfaction",
            EnergyType::Projector => "Success",
            EnergyType::Reflector => "Surprise",
        }
    }

    pub fn not_self_theme(&self) -> &'static str {
        match self {
            EnergyType::Manifestor => "Anger",
            EnergyType::Generator => "Frustration",
            EnergyType::ManifestingGenerator => "Frustration and Anger",
            EnergyType::Projector => "Bitterness",
            EnergyType::Reflector => "Disappointment",
        }
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inner authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    Emotional,
    Sacral,
    Splenic,
    Ego,
    SelfProjected,
    Environmental,
    /// Only Head and/or Ajna defined: no inner authority
    Mental,
    Lunar,
}

impl Authority {
    pub fn name(&self) -> &'static str {
        match self {
            Authority::Emotional => "Emotional",
            Authority::Sacral => "Sacral",
            Authority::Splenic => "Splenic",
            Authority::Ego => "Ego",
            Authority::SelfProjected => "Self-Projected",
            Authority::Environmental => "Environmental",
            Authority::Mental => "Mental",
            Authority::Lunar => "Lunar",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Authority is taken from the first defined center in this order.
pub const AUTHORITY_PRIORITY: [(Center, Authority); 6] = [
    (Center::SolarPlexus, Authority::Emotional),
    (Center::Sacral, Authority::Sacral),
    (Center::Spleen, Authority::Splenic),
    (Center::Heart, Authority::Ego),
    (Center::G, Authority::SelfProjected),
    (Center::Throat, Authority::Environmental),
];

/// How many separate islands the defined centers form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Definition {
    None,
    Single,
    Split,
    TripleSplit,
    QuadrupleSplit,
}

impl Definition {
    /// From the number of connected components among defined centers.
    /// Each component holds at least two of the nine centers, so four is the most.
    pub fn from_components(count: usize) -> Self {
        match count {
            0 => Definition::None,
            1 => Definition::Single,
            2 => Definition::Split,
            3 => Definition::TripleSplit,
            _ => Definition::QuadrupleSplit,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Definition::None => "No Definition",
            Definition::Single => "Single Definition",
            Definition::Split => "Split Definition",
            Definition::TripleSplit => "Triple Split Definition",
            Definition::QuadrupleSplit => "Quadruple Split Definition",
        }
    }
}

/// Centers joined by formed channels, as adjacency bitmasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterGraph {
    adjacency: [u16; 9],
}

impl CenterGraph {
    pub fn from_channels<'c>(channels: impl IntoIterator<Item = &'c Channel>) -> Self {
        let mut graph = Self::default();
        for channel in channels {
            let a = CenterSet::from_iter([channel.center_a]).bits();
            let b = CenterSet::from_iter([channel.center_b]).bits();
            graph.adjacency[channel.center_a as usize] |= b;
            graph.adjacency[channel.center_b as usize] |= a;
        }
        graph
    }

    /// Direct neighbours of a center
    pub fn neighbours(&self, center: Center) -> CenterSet {
        CenterSet::from_bits(self.adjacency[center as usize])
    }

    /// Centers reachable from `start`, including `start` itself.
    pub fn reachable(&self, start: Center) -> CenterSet {
        let mut seen = CenterSet::from_iter([start]);
        let mut frontier = vec![start];
        while let Some(center) = frontier.pop() {
            for next in self.neighbours(center).iter() {
                if !seen.contains(next) {
                    seen.insert(next);
                    frontier.push(next);
                }
            }
        }
        seen
    }

    /// Centers with at least one edge
    pub fn defined(&self) -> CenterSet {
        Center::ALL
            .iter()
            .copied()
            .filter(|c| self.adjacency[*c as usize] != 0)
            .collect()
    }

    /// Connected components among defined centers
    pub fn components(&self) -> Vec<CenterSet> {
        let mut remaining = self.defined();
        let mut components = Vec::new();
        loop {
            let Some(start) = remaining.iter().next() else {
                break;
            };
            let component = self.reachable(start);
            remaining = remaining.intersection(component.complement());
            components.push(component);
        }
        components
    }
}

/// Result of classifying one chart's activated gates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub defined_centers: CenterSet,
    pub channels: Vec<Channel>,
    pub energy_type: EnergyType,
    pub strategy: &'static str,
    pub authority: Authority,
    pub definition: Definition,
}

/// Classifies a chart from the union of its Personality and Design gates.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodygraphClassifier;

impl BodygraphClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify from activated gate numbers (line values are irrelevant).
    pub fn classify(&self, gates: &BTreeSet<u8>) -> Result<Classification> {
        self.classify_channels(&formed_channels(gates))
    }

    /// Classify from an explicit set of formed channels.
    pub fn classify_channels(&self, channels: &[&Channel]) -> Result<Classification> {
        let graph = CenterGraph::from_channels(channels.iter().copied());
        let defined = graph.defined();
        let energy_type = decide_type(&graph, defined)?;
        let authority = decide_authority(defined);
        let definition = Definition::from_components(graph.components().len());

        Ok(Classification {
            defined_centers: defined,
            channels: channels.iter().map(|c| **c).collect(),
            energy_type,
            strategy: energy_type.strategy(),
            authority,
            definition,
        })
    }
}

/// First match wins:
///
/// 1. Sacral open, Throat reaches a motor (Heart, Solar Plexus, Root) → Manifestor
/// 2. Sacral defined, Throat reaches the Sacral → Manifesting Generator
/// 3. Sacral defined → Generator
/// 4. Anything defined → Projector
/// 5. Nothing defined → Reflector
fn decide_type(graph: &CenterGraph, defined: CenterSet) -> Result<EnergyType> {
    let sacral_defined = defined.contains(Center::Sacral);
    let throat_reach = if defined.contains(Center::Throat) {
        graph.reachable(Center::Throat)
    } else {
        CenterSet::new()
    };
    let throat_to_motor = [Center::Heart, Center::SolarPlexus, Center::Root]
        .into_iter()
        .any(|m| throat_reach.contains(m));

    let energy_type = if !sacral_defined && throat_to_motor {
        Some(EnergyType::Manifestor)
    } else if sacral_defined && throat_reach.contains(Center::Sacral) {
        Some(EnergyType::ManifestingGenerator)
    } else if sacral_defined {
        Some(EnergyType::Generator)
    } else if !defined.is_empty() {
        Some(EnergyType::Projector)
    } else if defined.is_empty() {
        Some(EnergyType::Reflector)
    } else {
        None
    };

    energy_type.ok_or_else(|| ChartError::ClassificationInvariantViolation {
        defined_centers: defined.to_string(),
    })
}

fn decide_authority(defined: CenterSet) -> Authority {
    AUTHORITY_PRIORITY
        .iter()
        .find(|(center, _)| defined.contains(*center))
        .map(|(_, authority)| *authority)
        .unwrap_or(if defined.is_empty() {
            Authority::Lunar
        } else {
            Authority::Mental
        })
}
