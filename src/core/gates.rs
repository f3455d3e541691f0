//! Gate and line resolution
//!
//! The ecliptic is cut into 64 equal sectors of 5.625°, each split into six
//! lines of 0.9375°. Sector 0 starts at 0° Aries; the gate occupying each
//! sector comes from the fixed [`GATE_SEQUENCE`] permutation.
//!
//! Intervals are half-open everywhere: a longitude exactly on a boundary
//! belongs to the *next* gate or line, never both.

use lazy_static::lazy_static;

use crate::core::longitude::Longitude;
use crate::core::models::{Body, GateActivation};

/// Number of gates on the wheel
pub const GATE_COUNT: usize = 64;

/// Lines per gate
pub const LINES_PER_GATE: u8 = 6;

/// Arc covered by one gate: 360 / 64
pub const GATE_WIDTH: f64 = 360.0 / GATE_COUNT as f64;

/// Arc covered by one line: 5.625 / 6
pub const LINE_WIDTH: f64 = GATE_WIDTH / LINES_PER_GATE as f64;

/// Gate number for each sequential 5.625° sector, starting at 0° Aries.
pub const GATE_SEQUENCE: [u8; GATE_COUNT] = [
    25, 17, 21, 51, 42, 3, 27, 24, 2, 23, 8, 20, 16, 35, 45, 12, //
    15, 52, 39, 53, 62, 56, 31, 33, 7, 4, 29, 59, 40, 64, 47, 6, //
    46, 18, 48, 57, 32, 50, 28, 44, 1, 43, 14, 34, 9, 5, 26, 11, //
    10, 58, 38, 54, 61, 60, 41, 19, 13, 49, 30, 55, 37, 63, 22, 36,
];

/// Wheel rotation that aligns [`GATE_SEQUENCE`] with the Rave Mandala.
///
/// Derivation: the mandala starts Gate 41 at 302° tropical. Gate 25 sits ten
/// gates later, at 302 + 10 × 5.625 = 358.25°, so 0° Aries lies 1.75° into
/// Gate 25. Adding 1.75° to every longitude before sectoring reproduces that
/// placement. This is the only offset in the engine and it applies to every
/// body alike.
pub const MANDALA_WHEEL_OFFSET: f64 = 1.75;

lazy_static! {
    /// Inverse of [`GATE_SEQUENCE`]: sector index for each gate (index 0 unused).
    static ref GATE_SECTOR: [usize; GATE_COUNT + 1] = {
        let mut sectors = [usize::MAX; GATE_COUNT + 1];
        for (sector, gate) in GATE_SEQUENCE.iter().enumerate() {
            sectors[*gate as usize] = sector;
        }
        sectors
    };
}

/// Sector index (0..64) occupied by a gate.
pub fn sector_of_gate(gate: u8) -> Option<usize> {
    match gate {
        1..=64 => Some(GATE_SECTOR[gate as usize]),
        _ => None,
    }
}

/// Keynote name of a gate.
pub fn gate_name(gate: u8) -> Option<&'static str> {
    let name = match gate {
        1 => "Self-Expression",
        2 => "Direction of the Self",
        3 => "Ordering",
        4 => "Formulization",
        5 => "Fixed Rhythms",
        6 => "Friction",
        7 => "The Role of the Self",
        8 => "Contribution",
        9 => "Focus",
        10 => "Behavior of the Self",
        11 => "Ideas",
        12 => "Caution",
        13 => "The Listener",
        14 => "Power Skills",
        15 => "Extremes",
        16 => "Skills",
        17 => "Opinions",
        18 => "Correction",
        19 => "Wanting",
        20 => "The Now",
        21 => "The Hunter",
        22 => "Openness",
        23 => "Assimilation",
        24 => "Rationalization",
        25 => "The Spirit of the Self",
        26 => "The Egoist",
        27 => "Caring",
        28 => "The Game Player",
        29 => "Perseverance",
        30 => "Recognition of Feelings",
        31 => "Influence",
        32 => "Continuity",
        33 => "Privacy",
        34 => "Power",
        35 => "Change",
        36 => "Crisis",
        37 => "Friendship",
        38 => "The Fighter",
        39 => "Provocation",
        40 => "Aloneness",
        41 => "Contraction",
        42 => "Growth",
        43 => "Insight",
        44 => "Alertness",
        45 => "The Gatherer",
        46 => "Determination of the Self",
        47 => "Realization",
        48 => "Depth",
        49 => "Principles",
        50 => "Values",
        51 => "Shock",
        52 => "Stillness",
        53 => "Beginnings",
        54 => "Ambition",
        55 => "Spirit",
        56 => "Stimulation",
        57 => "Intuitive Clarity",
        58 => "Vitality",
        59 => "Sexuality",
        60 => "Acceptance",
        61 => "Mystery",
        62 => "Detail",
        63 => "Doubt",
        64 => "Confusion",
        _ => return None,
    };
    Some(name)
}

/// Maps longitudes to (gate, line) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GateLineResolver {
    wheel_offset: f64,
}

impl GateLineResolver {
    /// Resolver with sector 0 starting exactly at 0° Aries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that rotates every longitude by `degrees` before sectoring.
    pub fn with_wheel_offset(degrees: f64) -> Self {
        Self {
            wheel_offset: degrees,
        }
    }

    /// Resolver aligned with the Rave Mandala (see [`MANDALA_WHEEL_OFFSET`]).
    pub fn mandala() -> Self {
        Self::with_wheel_offset(MANDALA_WHEEL_OFFSET)
    }

    pub fn wheel_offset(&self) -> f64 {
        self.wheel_offset
    }

    /// Gate (1..=64) and line (1..=6) for a longitude.
    pub fn resolve(&self, longitude: Longitude) -> (u8, u8) {
        let lon = (longitude + self.wheel_offset).degrees();

        // `%` on f64 is exact, so the sector and the in-gate offset always
        // agree about which side of a boundary `lon` falls on.
        let within_gate = lon % GATE_WIDTH;
        let sector = (((lon - within_gate) / GATE_WIDTH).round() as usize) % GATE_COUNT;

        let within_line = within_gate % LINE_WIDTH;
        let line_index = ((within_gate - within_line) / LINE_WIDTH).round() as u8;
        let line = (line_index + 1).clamp(1, LINES_PER_GATE);

        (GATE_SEQUENCE[sector], line)
    }

    /// Resolve raw degrees (any finite value, normalized first).
    pub fn resolve_degrees(&self, degrees: f64) -> (u8, u8) {
        self.resolve(Longitude::new(degrees))
    }

    /// Build the activation record for one body.
    pub fn activation(&self, body: Body, longitude: Longitude) -> GateActivation {
        let (gate, line) = self.resolve(longitude);
        GateActivation {
            body,
            gate,
            line,
            longitude,
        }
    }

    /// Longitude at which a gate begins under this resolver's rotation.
    pub fn gate_start(&self, gate: u8) -> Option<Longitude> {
        sector_of_gate(gate).map(|s| Longitude::new(s as f64 * GATE_WIDTH - self.wheel_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_sequence_is_permutation() {
        let gates: BTreeSet<u8> = GATE_SEQUENCE.iter().copied().collect();
        assert_eq!(gates.len(), 64);
        assert_eq!(gates.first(), Some(&1));
        assert_eq!(gates.last(), Some(&64));
    }

    #[test]
    fn test_widths() {
        assert_eq!(GATE_WIDTH, 5.625);
        assert_eq!(LINE_WIDTH, 0.9375);
    }

    #[test]
    fn test_zero_is_first_sector_line_one() {
        let r = GateLineResolver::new();
        assert_eq!(r.resolve_degrees(0.0), (GATE_SEQUENCE[0], 1));
    }

    #[test]
    fn test_gate_boundary_belongs_to_next_sector() {
        let r = GateLineResolver::new();
        assert_eq!(r.resolve_degrees(5.625 - 1e-9), (GATE_SEQUENCE[0], 6));
        assert_eq!(r.resolve_degrees(5.625), (GATE_SEQUENCE[1], 1));
    }

    #[test]
    fn test_closest_double_below_boundary_stays_in_gate() {
        let r = GateLineResolver::new();
        let below = f64::from_bits(5.625f64.to_bits() - 1);
        assert_eq!(r.resolve_degrees(below), (GATE_SEQUENCE[0], 6));
    }

    #[test]
    fn test_line_boundaries() {
        let r = GateLineResolver::new();
        for line in 0..6u8 {
            let start = GATE_WIDTH * 3.0 + LINE_WIDTH * f64::from(line);
            assert_eq!(r.resolve_degrees(start), (GATE_SEQUENCE[3], line + 1));
        }
    }

    #[test]
    fn test_last_sector_wraps_to_first() {
        let r = GateLineResolver::new();
        assert_eq!(r.resolve_degrees(359.999_999), (GATE_SEQUENCE[63], 6));
        assert_eq!(r.resolve_degrees(360.0), (GATE_SEQUENCE[0], 1));
        assert_eq!(r.resolve_degrees(-0.5), (GATE_SEQUENCE[63], 6));
    }

    #[test]
    fn test_mandala_alignment() {
        let r = GateLineResolver::mandala();
        // Gate 41 starts at 302° on the mandala
        assert_eq!(r.resolve_degrees(302.0), (41, 1));
        assert_eq!(r.resolve_degrees(301.99), (60, 6));
        // 0° Aries is 1.75° into Gate 25: line 2
        assert_eq!(r.resolve_degrees(0.0), (25, 2));
    }

    #[test]
    fn test_gate_start_inverts_resolve() {
        for resolver in [GateLineResolver::new(), GateLineResolver::mandala()] {
            for gate in 1..=64u8 {
                let start = resolver.gate_start(gate).unwrap();
                assert_eq!(resolver.resolve(start + 1e-9), (gate, 1), "gate {}", gate);
            }
        }
    }

    #[test]
    fn test_sector_of_gate() {
        assert_eq!(sector_of_gate(25), Some(0));
        assert_eq!(sector_of_gate(36), Some(63));
        assert_eq!(sector_of_gate(0), None);
        assert_eq!(sector_of_gate(65), None);
    }

    #[test]
    fn test_gate_names_complete() {
        assert!((1..=64).all(|g| gate_name(g).is_some()));
        assert_eq!(gate_name(1), Some("Self-Expression"));
        assert_eq!(gate_name(0), None);
    }

    #[test]
    fn test_activation_keeps_longitude() {
        let a = GateLineResolver::new().activation(Body::Mars, Longitude::new(12.0));
        assert_eq!(a.body, Body::Mars);
        assert_eq!(a.longitude.degrees(), 12.0);
        assert_eq!((a.gate, a.line), (GATE_SEQUENCE[2], 1));
    }
}
