//! Core chart engine
//!
//! Pure, synchronous logic with no I/O beyond loading config and ephemeris
//! tables. Data flows one way:
//!
//! ```text
//! ephemeris → solar_arc → gates → assembler → bodygraph
//! ```
//!
//! # Modules
//!
//! - `longitude`: wraparound-safe ecliptic longitude
//! - `models`: bodies, locations, activations
//! - `ephemeris`: the external position provider boundary
//! - `gates`: longitude → (gate, line)
//! - `solar_arc`: Design instant search
//! - `cross`: Profile and Incarnation Cross
//! - `bodygraph`: centers, channels, Type and Authority
//! - `assembler`: Chart construction
//! - `config`: ChartConfig
//! - `cancel`: cooperative cancellation
//! - `error`: ChartError

pub mod assembler;
pub mod bodygraph;
pub mod cancel;
pub mod config;
pub mod cross;
pub mod ephemeris;
pub mod error;
pub mod gates;
pub mod longitude;
pub mod models;
pub mod solar_arc;

// Re-export commonly used types
pub use assembler::{Chart, ChartAssembler};
pub use bodygraph::{
    Authority, BodygraphClassifier, Center, CenterSet, Channel, Classification, Definition,
    EnergyType,
};
pub use cancel::Cancellation;
pub use config::ChartConfig;
pub use cross::{CrossAngle, IncarnationCross, Profile};
pub use ephemeris::{
    BodyLongitudes, EphemerisAdapter, EphemerisError, LinearEphemeris, TabulatedEphemeris,
};
pub use error::{ChartError, Result, ResultExt};
pub use gates::{gate_name, GateLineResolver, GATE_SEQUENCE};
pub use longitude::Longitude;
pub use models::{
    parse_birth_instant, ActivationSet, BirthData, Body, GateActivation, GeoLocation, Side,
};
pub use solar_arc::{DesignInstant, SolarArcConfig, SolarArcLocator};
