//! The nine energy centers and the gate → center map.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// One of the nine centers of the bodygraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Center {
    Head,
    Ajna,
    Throat,
    G,
    Heart,
    Sacral,
    Spleen,
    SolarPlexus,
    Root,
}

impl Center {
    /// All centers, top of the body to bottom
    pub const ALL: [Center; 9] = [
        Center::Head,
        Center::Ajna,
        Center::Throat,
        Center::G,
        Center::Heart,
        Center::Sacral,
        Center::Spleen,
        Center::SolarPlexus,
        Center::Root,
    ];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Center::Head => "Head",
            Center::Ajna => "Ajna",
            Center::Throat => "Throat",
            Center::G => "G",
            Center::Heart => "Heart",
            Center::Sacral => "Sacral",
            Center::Spleen => "Spleen",
            Center::SolarPlexus => "Solar Plexus",
            Center::Root => "Root",
        }
    }

    /// Motors: Heart, Sacral, Solar Plexus, Root
    pub fn is_motor(&self) -> bool {
        matches!(
            self,
            Center::Heart | Center::Sacral | Center::SolarPlexus | Center::Root
        )
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Gates housed in this center
    pub fn gates(&self) -> &'static [u8] {
        match self {
            Center::Head => &[64, 61, 63],
            Center::Ajna => &[47, 24, 4, 17, 43, 11],
            Center::Throat => &[62, 23, 56, 35, 12, 45, 33, 8, 31, 20, 16],
            Center::G => &[1, 13, 25, 46, 2, 15, 10, 7],
            Center::Heart => &[21, 40, 26, 51],
            Center::Sacral => &[5, 14, 29, 59, 9, 3, 42, 27, 34],
            Center::Spleen => &[48, 57, 44, 50, 32, 28, 18],
            Center::SolarPlexus => &[6, 37, 22, 36, 49, 55, 30],
            Center::Root => &[58, 38, 54, 53, 60, 52, 19, 39, 41],
        }
    }
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Center that houses a gate.
pub fn gate_center(gate: u8) -> Option<Center> {
    Center::ALL
        .iter()
        .copied()
        .find(|c| c.gates().contains(&gate))
}

/// A set of centers, stored as a 9-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CenterSet(u16);

impl CenterSet {
    /// Mask with every center present
    pub const FULL: CenterSet = CenterSet((1 << 9) - 1);

    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the low nine bits of `mask` (bit i = `Center::ALL[i]`)
    pub fn from_bits(mask: u16) -> Self {
        Self(mask & Self::FULL.0)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn insert(&mut self, center: Center) {
        self.0 |= center.bit();
    }

    pub fn contains(&self, center: Center) -> bool {
        self.0 & center.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn union(&self, other: CenterSet) -> CenterSet {
        CenterSet(self.0 | other.0)
    }

    pub fn intersection(&self, other: CenterSet) -> CenterSet {
        CenterSet(self.0 & other.0)
    }

    /// Centers not in this set
    pub fn complement(&self) -> CenterSet {
        CenterSet(!self.0 & Self::FULL.0)
    }

    /// Members in [`Center::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = Center> + '_ {
        Center::ALL.iter().copied().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Center> for CenterSet {
    fn from_iter<I: IntoIterator<Item = Center>>(iter: I) -> Self {
        let mut set = CenterSet::new();
        for center in iter {
            set.insert(center);
        }
        set
    }
}

impl fmt::Display for CenterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|c| c.name()).collect();
        f.write_str(&names.join(", "))
    }
}

impl Serialize for CenterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
