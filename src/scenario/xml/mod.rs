//! Serialization of scenarios into the simulator's XML input files

pub mod additional;
pub mod bundle;
pub mod demand;
pub mod network;
pub mod parse;
pub mod records;
pub mod run_config;

pub use bundle::{GeneratedFile, Scenario, ScenarioFiles};
pub use parse::{parse_junctions, parse_links, parse_network, parse_signal_logic};
