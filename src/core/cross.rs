//! Profile and Incarnation Cross
//!
//! Both are read straight off the Sun and Earth activations of the two
//! snapshots. The cross angle comes from a closed 6×6 table keyed by the
//! profile line pair.

use std::fmt;

use serde::Serialize;

use crate::core::gates::{sector_of_gate, GATE_COUNT, GATE_SEQUENCE};
use crate::core::models::ActivationSet;

/// Personality Sun line over Design Sun line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Profile {
    pub personality_line: u8,
    pub design_line: u8,
}

impl Profile {
    pub fn new(personality_line: u8, design_line: u8) -> Self {
        Self {
            personality_line,
            design_line,
        }
    }

    pub fn from_activations(personality: &ActivationSet, design: &ActivationSet) -> Self {
        Self::new(personality.sun().line, design.sun().line)
    }

    /// `"4/6 Opportunist/Role Model"`
    pub fn name(&self) -> String {
        format!(
            "{} {}/{}",
            self,
            line_keynote(self.personality_line),
            line_keynote(self.design_line)
        )
    }

    pub fn angle(&self) -> CrossAngle {
        CrossAngle::for_profile(*self)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.personality_line, self.design_line)
    }
}

/// Keynote of a line number
pub fn line_keynote(line: u8) -> &'static str {
    match line {
        1 => "Investigator",
        2 => "Hermit",
        3 => "Martyr",
        4 => "Opportunist",
        5 => "Heretic",
        6 => "Role Model",
        _ => "Unknown",
    }
}

/// Geometry of an incarnation cross
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossAngle {
    RightAngle,
    LeftAngle,
    Juxtaposition,
}

use CrossAngle::{Juxtaposition as JX, LeftAngle as LA, RightAngle as RA};

/// Rows: personality line 1..=6. Columns: design line 1..=6.
///
/// The twelve canonical profiles sit at 1/3 1/4 2/4 2/5 3/5 3/6 4/6 (Right
/// Angle), 4/1 (Juxtaposition) and 5/1 5/2 6/2 6/3 (Left Angle). Line pairs
/// no birth can produce follow the personality line: 1-4 Right, 5-6 Left.
const CROSS_ANGLE_TABLE: [[CrossAngle; 6]; 6] = [
    [RA, RA, RA, RA, RA, RA],
    [RA, RA, RA, RA, RA, RA],
    [RA, RA, RA, RA, RA, RA],
    [JX, RA, RA, RA, RA, RA],
    [LA, LA, LA, LA, LA, LA],
    [LA, LA, LA, LA, LA, LA],
];

impl CrossAngle {
    /// Angle for a profile; lines outside 1..=6 are clamped.
    pub fn for_profile(profile: Profile) -> Self {
        let row = profile.personality_line.clamp(1, 6) as usize - 1;
        let col = profile.design_line.clamp(1, 6) as usize - 1;
        CROSS_ANGLE_TABLE[row][col]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CrossAngle::RightAngle => "Right Angle",
            CrossAngle::LeftAngle => "Left Angle",
            CrossAngle::Juxtaposition => "Juxtaposition",
        }
    }
}

impl fmt::Display for CrossAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Themes of the 16 quartets, indexed by the sector of the quartet's first gate.
///
/// Quartet `j` is the four gates a quarter-wheel apart:
/// `GATE_SEQUENCE[j]`, `[j + 16]`, `[j + 32]`, `[j + 48]`.
const QUARTET_THEMES: [&str; 16] = [
    "the Vessel of Love",
    "Service",
    "Tension",
    "Penetration",
    "Maya",
    "Laws",
    "the Unexpected",
    "the Four Ways",
    "the Sphinx",
    "Explanation",
    "Contagion",
    "the Sleeping Phoenix",
    "Planning",
    "Consciousness",
    "Rulership",
    "Eden",
];

const QUARTET_SPAN: usize = GATE_COUNT / 4;

/// The four gates sharing a quartet with `gate`, in wheel order.
pub fn quartet_of(gate: u8) -> Option<[u8; 4]> {
    let first = sector_of_gate(gate)? % QUARTET_SPAN;
    Some([0, 1, 2, 3].map(|q| GATE_SEQUENCE[first + q * QUARTET_SPAN]))
}

/// Theme of the quartet containing `gate`
pub fn quartet_theme(gate: u8) -> Option<&'static str> {
    sector_of_gate(gate).map(|s| QUARTET_THEMES[s % QUARTET_SPAN])
}

/// Juxtaposition themes, indexed by conscious Sun gate minus one.
const JUXTAPOSITION_THEMES: [&str; GATE_COUNT] = [
    "Self-Expression",
    "the Driver",
    "Mutation",
    "Formulization",
    "Habits",
    "Conflict",
    "Interaction",
    "Contribution",
    "Focus",
    "Behavior",
    "Ideas",
    "Articulation",
    "Listening",
    "Empowering",
    "Extremes",
    "Experimentation",
    "Opinions",
    "Correction",
    "Need",
    "the Now",
    "Control",
    "Grace",
    "Assimilation",
    "Rationalization",
    "Innocence",
    "the Trickster",
    "Caring",
    "Risks",
    "Commitment",
    "Fates",
    "Influence",
    "Conservation",
    "Retreat",
    "Power",
    "Experience",
    "Crisis",
    "Bargains",
    "Opposition",
    "Provocation",
    "Denial",
    "Fantasy",
    "Completion",
    "Insight",
    "Alertness",
    "Possession",
    "Serendipity",
    "Oppression",
    "Depth",
    "Principles",
    "Values",
    "Shock",
    "Stillness",
    "Beginnings",
    "Ambition",
    "Moods",
    "Stimulation",
    "Intuition",
    "Vitality",
    "Strategy",
    "Limitation",
    "Thinking",
    "Detail",
    "Doubts",
    "Confusion",
];

/// Left Angle themes. Each is shared by a gate and the gate opposite it on
/// the wheel, so the conscious Sun gate in either position selects it.
const LEFT_ANGLE_THEMES: [(u8, u8, &str); GATE_COUNT / 2] = [
    (25, 46, "Healing"),
    (17, 18, "Upheaval"),
    (21, 48, "Endeavor"),
    (51, 57, "the Clarion"),
    (42, 32, "Limitation"),
    (3, 50, "Wishes"),
    (27, 28, "Alignment"),
    (24, 44, "Incarnation"),
    (2, 1, "Defiance"),
    (23, 43, "Dedication"),
    (8, 14, "Uncertainty"),
    (20, 34, "Duality"),
    (16, 9, "Identification"),
    (35, 5, "Separation"),
    (45, 26, "Confrontation"),
    (12, 11, "Education"),
    (15, 10, "Prevention"),
    (52, 58, "Demands"),
    (39, 38, "Individualism"),
    (53, 54, "Cycles"),
    (62, 61, "Obscuration"),
    (56, 60, "Distraction"),
    (31, 41, "the Alpha"),
    (33, 19, "Refinement"),
    (7, 13, "Masks"),
    (4, 49, "Revolution"),
    (29, 30, "Industry"),
    (59, 55, "Spirit"),
    (40, 37, "Migration"),
    (64, 63, "Dominion"),
    (47, 22, "Informing"),
    (6, 36, "the Plane"),
];

/// Theme of a Juxtaposition cross with this conscious Sun gate
pub fn juxtaposition_theme(gate: u8) -> Option<&'static str> {
    sector_of_gate(gate)?;
    Some(JUXTAPOSITION_THEMES[gate as usize - 1])
}

/// Theme of a Left Angle cross with this conscious Sun gate
pub fn left_angle_theme(gate: u8) -> Option<&'static str> {
    LEFT_ANGLE_THEMES
        .iter()
        .find(|(a, b, _)| *a == gate || *b == gate)
        .map(|(_, _, theme)| *theme)
}

/// Theme of the cross with this angle and conscious Sun gate
pub fn cross_theme(angle: CrossAngle, conscious_sun_gate: u8) -> Option<&'static str> {
    match angle {
        CrossAngle::RightAngle => quartet_theme(conscious_sun_gate),
        CrossAngle::LeftAngle => left_angle_theme(conscious_sun_gate),
        CrossAngle::Juxtaposition => juxtaposition_theme(conscious_sun_gate),
    }
}

/// Sun and Earth gates of both snapshots, with angle and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncarnationCross {
    pub conscious_sun_gate: u8,
    pub conscious_earth_gate: u8,
    pub unconscious_sun_gate: u8,
    pub unconscious_earth_gate: u8,
    pub angle: CrossAngle,
    pub name: String,
}

impl IncarnationCross {
    pub fn new(
        conscious_sun_gate: u8,
        conscious_earth_gate: u8,
        unconscious_sun_gate: u8,
        unconscious_earth_gate: u8,
        angle: CrossAngle,
    ) -> Self {
        let gates = format!(
            "({}/{} | {}/{})",
            conscious_sun_gate, conscious_earth_gate, unconscious_sun_gate, unconscious_earth_gate
        );
        let name = match cross_theme(angle, conscious_sun_gate) {
            Some(theme) => format!("{} Cross of {} {}", angle, theme, gates),
            None => format!("{} Cross {}", angle, gates),
        };
        Self {
            conscious_sun_gate,
            conscious_earth_gate,
            unconscious_sun_gate,
            unconscious_earth_gate,
            angle,
            name,
        }
    }

    pub fn from_activations(
        personality: &ActivationSet,
        design: &ActivationSet,
        profile: Profile,
    ) -> Self {
        Self::new(
            personality.sun().gate,
            personality.earth().gate,
            design.sun().gate,
            design.earth().gate,
            profile.angle(),
        )
    }

    pub fn gates(&self) -> [u8; 4] {
        [
            self.conscious_sun_gate,
            self.conscious_earth_gate,
            self.unconscious_sun_gate,
            self.unconscious_earth_gate,
        ]
    }
}

impl fmt::Display for IncarnationCross {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_juxtaposition_profile() {
        assert_eq!(Profile::new(4, 1).angle(), CrossAngle::Juxtaposition);
    }

    #[test]
    fn test_right_angle_profile() {
        assert_eq!(Profile::new(1, 3).angle(), CrossAngle::RightAngle);
    }

    #[test]
    fn test_canonical_profiles() {
        let right = [(1, 3), (1, 4), (2, 4), (2, 5), (3, 5), (3, 6), (4, 6)];
        let left = [(5, 1), (5, 2), (6, 2), (6, 3)];
        for (p, d) in right {
            assert_eq!(Profile::new(p, d).angle(), CrossAngle::RightAngle, "{}/{}", p, d);
        }
        for (p, d) in left {
            assert_eq!(Profile::new(p, d).angle(), CrossAngle::LeftAngle, "{}/{}", p, d);
        }
    }

    #[test]
    fn test_juxtaposition_only_for_four_one() {
        let count = (1..=6u8)
            .flat_map(|p| (1..=6u8).map(move |d| Profile::new(p, d)))
            .filter(|p| p.angle() == CrossAngle::Juxtaposition)
            .count();
        assert_eq!(count, 1);
        assert_eq!(Profile::new(1, 4).angle(), CrossAngle::RightAngle);
    }

    #[test]
    fn test_profile_rendering() {
        let profile = Profile::new(4, 6);
        assert_eq!(profile.to_string(), "4/6");
        assert_eq!(profile.name(), "4/6 Opportunist/Role Model");
    }

    #[test]
    fn test_quartets_partition_the_wheel() {
        let mut seen = std::collections::BTreeSet::new();
        for gate in 1..=64u8 {
            let quartet = quartet_of(gate).unwrap();
            assert!(quartet.contains(&gate));
            seen.insert(quartet);
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn test_known_quartets() {
        assert_eq!(quartet_of(13), Some([2, 7, 1, 13]));
        assert_eq!(quartet_theme(13), Some("the Sphinx"));
        assert_eq!(quartet_theme(36), Some("Eden"));
        assert_eq!(quartet_theme(0), None);
    }

    #[test]
    fn test_right_angle_name() {
        let cross = IncarnationCross::new(13, 7, 1, 2, CrossAngle::RightAngle);
        assert_eq!(cross.name, "Right Angle Cross of the Sphinx (13/7 | 1/2)");
        assert_eq!(cross.gates(), [13, 7, 1, 2]);
    }

    #[test]
    fn test_juxtaposition_name() {
        let cross = IncarnationCross::new(1, 2, 4, 49, CrossAngle::Juxtaposition);
        assert_eq!(cross.name, "Juxtaposition Cross of Self-Expression (1/2 | 4/49)");
        assert_eq!(juxtaposition_theme(64), Some("Confusion"));
        assert_eq!(juxtaposition_theme(65), None);
    }

    #[test]
    fn test_left_angle_name() {
        let cross = IncarnationCross::new(2, 1, 49, 4, CrossAngle::LeftAngle);
        assert_eq!(cross.name, "Left Angle Cross of Defiance (2/1 | 49/4)");
        let mirrored = IncarnationCross::new(1, 2, 4, 49, CrossAngle::LeftAngle);
        assert_eq!(mirrored.name, "Left Angle Cross of Defiance (1/2 | 4/49)");
    }

    #[test]
    fn test_left_angle_pairs_are_wheel_opposites() {
        let mut covered = std::collections::BTreeSet::new();
        for (a, b, _) in LEFT_ANGLE_THEMES {
            let sa = sector_of_gate(a).unwrap();
            let sb = sector_of_gate(b).unwrap();
            assert_eq!((sa + GATE_COUNT / 2) % GATE_COUNT, sb, "{}/{}", a, b);
            covered.insert(a);
            covered.insert(b);
        }
        assert_eq!(covered.len(), GATE_COUNT);
    }

    #[test]
    fn test_every_gate_names_every_angle() {
        for gate in 1..=64u8 {
            for angle in [CrossAngle::RightAngle, CrossAngle::LeftAngle, CrossAngle::Juxtaposition] {
                assert!(cross_theme(angle, gate).is_some(), "{} {}", angle, gate);
            }
        }
    }
}
