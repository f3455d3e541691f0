//! The 36 channels of the bodygraph.
//!
//! A channel is formed when both of its gates are activated anywhere in the
//! chart (Personality or Design, any line). A formed channel defines both of
//! the centers it joins.

use std::collections::{BTreeSet, HashMap};

use lazy_static::lazy_static;
use serde::Serialize;

use super::centers::Center;

/// A fixed gate pair joining two centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Channel {
    pub gate_a: u8,
    pub gate_b: u8,
    pub center_a: Center,
    pub center_b: Center,
    pub name: &'static str,
}

impl Channel {
    const fn new(gate_a: u8, gate_b: u8, center_a: Center, center_b: Center, name: &'static str) -> Self {
        Self {
            gate_a,
            gate_b,
            center_a,
            center_b,
            name,
        }
    }

    /// `"gate_a-gate_b"` with the lower gate first, e.g. `"20-34"`
    pub fn key(&self) -> String {
        format!("{}-{}", self.gate_a, self.gate_b)
    }

    /// Both gates present in `gates`
    pub fn is_formed(&self, gates: &BTreeSet<u8>) -> bool {
        gates.contains(&self.gate_a) && gates.contains(&self.gate_b)
    }

    pub fn touches(&self, center: Center) -> bool {
        self.center_a == center || self.center_b == center
    }

    pub fn has_gate(&self, gate: u8) -> bool {
        self.gate_a == gate || self.gate_b == gate
    }
}

use Center::*;

/// The channel table, ordered by lower gate number.
pub static CHANNELS: [Channel; 36] = [
    Channel::new(1, 8, G, Throat, "Inspiration"),
    Channel::new(2, 14, G, Sacral, "The Beat"),
    Channel::new(3, 60, Sacral, Root, "Mutation"),
    Channel::new(4, 63, Ajna, Head, "Logic"),
    Channel::new(5, 15, Sacral, G, "Rhythm"),
    Channel::new(6, 59, SolarPlexus, Sacral, "Mating"),
    Channel::new(7, 31, G, Throat, "The Alpha"),
    Channel::new(9, 52, Sacral, Root, "Concentration"),
    Channel::new(10, 20, G, Throat, "Awakening"),
    Channel::new(10, 34, G, Sacral, "Exploration"),
    Channel::new(10, 57, G, Spleen, "Perfected Form"),
    Channel::new(11, 56, Ajna, Throat, "Curiosity"),
    Channel::new(12, 22, Throat, SolarPlexus, "Openness"),
    Channel::new(13, 33, G, Throat, "The Prodigal"),
    Channel::new(16, 48, Throat, Spleen, "The Wavelength"),
    Channel::new(17, 62, Ajna, Throat, "Acceptance"),
    Channel::new(18, 58, Spleen, Root, "Judgment"),
    Channel::new(19, 49, Root, SolarPlexus, "Synthesis"),
    Channel::new(20, 34, Throat, Sacral, "Charisma"),
    Channel::new(20, 57, Throat, Spleen, "The Brainwave"),
    Channel::new(21, 45, Heart, Throat, "Money"),
    Channel::new(23, 43, Throat, Ajna, "Structuring"),
    Channel::new(24, 61, Ajna, Head, "Awareness"),
    Channel::new(25, 51, G, Heart, "Initiation"),
    Channel::new(26, 44, Heart, Spleen, "Surrender"),
    Channel::new(27, 50, Sacral, Spleen, "Preservation"),
    Channel::new(28, 38, Spleen, Root, "Struggle"),
    Channel::new(29, 46, Sacral, G, "Discovery"),
    Channel::new(30, 41, SolarPlexus, Root, "Recognition"),
    Channel::new(32, 54, Spleen, Root, "Transformation"),
    Channel::new(34, 57, Sacral, Spleen, "Power"),
    Channel::new(35, 36, Throat, SolarPlexus, "Transitoriness"),
    Channel::new(37, 40, SolarPlexus, Heart, "Community"),
    Channel::new(39, 55, Root, SolarPlexus, "Emoting"),
    Channel::new(42, 53, Sacral, Root, "Maturation"),
    Channel::new(47, 64, Ajna, Head, "Abstraction"),
];

lazy_static! {
    /// Channels each gate participates in
    static ref GATE_CHANNELS: HashMap<u8, Vec<&'static Channel>> = {
        let mut index: HashMap<u8, Vec<&'static Channel>> = HashMap::new();
        for channel in CHANNELS.iter() {
            index.entry(channel.gate_a).or_default().push(channel);
            index.entry(channel.gate_b).or_default().push(channel);
        }
        index
    };
}

/// Channels a gate belongs to (empty for gates without a channel partner)
pub fn channels_for_gate(gate: u8) -> &'static [&'static Channel] {
    GATE_CHANNELS.get(&gate).map(Vec::as_slice).unwrap_or(&[])
}

/// Channels whose two gates are both in `gates`, in table order.
pub fn formed_channels(gates: &BTreeSet<u8>) -> Vec<&'static Channel> {
    CHANNELS.iter().filter(|c| c.is_formed(gates)).collect()
}
