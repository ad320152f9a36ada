//! Scenario generation for microscopic traffic simulation
//!
//! This module builds road networks from parametric templates, computes
//! signal timings, and serializes complete scenarios into the simulator's
//! XML input files. Every operation works on caller-owned values, so
//! independent scenarios can be generated concurrently.

pub mod additional;
pub mod demand;
pub mod error;
pub mod junction;
pub mod link;
pub mod road_network;
pub mod run_config;
pub mod signal;
pub mod templates;
pub mod timing;
pub mod types;
pub mod xml;

pub use additional::{AdditionalSet, Infrastructure, LaneRef};
pub use demand::{
    DemandRate, DemandSet, Flow, FlowPath, Route, Vehicle, VehicleClass, VehiclePath,
    DEFAULT_EMISSION_CLASS,
};
pub use error::{Result, ScenarioError};
pub use junction::Junction;
pub use link::{Connection, Link, DEFAULT_PRIORITY};
pub use road_network::{LinkEdge, NetworkGraph, Topology};
pub use run_config::{OutputArtifacts, RunConfig};
pub use signal::{
    Approach, ApproachLayout, Phase, SignalProgram, SignalState, StateString, DEFAULT_PROGRAM_ID,
};
pub use templates::{
    create_network, list_templates, ArmOverride, CorridorParams, FourWayParams, GridParams,
    HighwayParams, RoundaboutParams, TJunctionParams, TemplateInfo, TemplateKey, TemplateParams,
};
pub use timing::{
    ApproachSupply, CapacityAnalysis, CycleBounds, DelayEstimate, LevelOfService, WebsterTiming,
};
pub use types::{
    kmh_to_ms, ms_to_kmh, ControllerKind, JunctionId, JunctionKind, LinkId, Position, RouteId,
    VehicleCategory, VehicleClassId, DEFAULT_VEHICLE_CLASS,
};
pub use xml::{GeneratedFile, Scenario, ScenarioFiles};
