//! Bodygraph topology and classification
//!
//! - `centers`: the nine centers, gate → center map, [`CenterSet`] bitmask
//! - `channels`: the 36 channels and formed-channel lookup
//! - `classifier`: Type, Strategy, Authority and Definition

pub mod centers;
pub mod channels;
pub mod classifier;

pub use centers::{gate_center, Center, CenterSet};
pub use channels::{channels_for_gate, formed_channels, Channel, CHANNELS};
pub use classifier::{
    Authority, BodygraphClassifier, CenterGraph, Classification, Definition, EnergyType,
    AUTHORITY_PRIORITY,
};
