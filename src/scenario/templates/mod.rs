//! Parametric network templates
//!
//! Every template is a pure function from a small parameter struct to a
//! populated [`NetworkGraph`]. Generation is deterministic and touches no
//! shared state, so templates may be generated concurrently.

mod corridor;
mod grid;
mod highway;
mod intersection;
mod roundabout;

use std::fmt;
use std::str::FromStr;

use log::info;

use super::error::{Result, ScenarioError};
use super::link::Link;
use super::road_network::NetworkGraph;
use super::types::JunctionId;

pub use corridor::CorridorParams;
pub use grid::GridParams;
pub use highway::HighwayParams;
pub use intersection::{ArmOverride, FourWayParams, TJunctionParams};
pub use roundabout::RoundaboutParams;

/// Registered template keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    FourWay,
    TJunction,
    Roundabout,
    Grid,
    Corridor,
    Highway,
}

impl TemplateKey {
    pub const ALL: [TemplateKey; 6] = [
        TemplateKey::FourWay,
        TemplateKey::TJunction,
        TemplateKey::Roundabout,
        TemplateKey::Grid,
        TemplateKey::Corridor,
        TemplateKey::Highway,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKey::FourWay => "4way",
            TemplateKey::TJunction => "3way",
            TemplateKey::Roundabout => "roundabout",
            TemplateKey::Grid => "grid",
            TemplateKey::Corridor => "corridor",
            TemplateKey::Highway => "highway",
        }
    }
}

impl FromStr for TemplateKey {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self> {
        TemplateKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ScenarioError::UnknownTemplate(s.to_string()))
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry entry shown to users picking a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    pub key: TemplateKey,
    pub name: String,
    pub description: String,
}

/// Parameters of any template
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateParams {
    FourWay(FourWayParams),
    TJunction(TJunctionParams),
    Roundabout(RoundaboutParams),
    Grid(GridParams),
    Corridor(CorridorParams),
    Highway(HighwayParams),
}

impl TemplateParams {
    /// Default parameters for a template key such as `"grid"`.
    pub fn defaults(key: &str) -> Result<Self> {
        Ok(Self::for_key(key.parse()?))
    }

    pub fn for_key(key: TemplateKey) -> Self {
        match key {
            TemplateKey::FourWay => TemplateParams::FourWay(FourWayParams::default()),
            TemplateKey::TJunction => TemplateParams::TJunction(TJunctionParams::default()),
            TemplateKey::Roundabout => TemplateParams::Roundabout(RoundaboutParams::default()),
            TemplateKey::Grid => TemplateParams::Grid(GridParams::default()),
            TemplateKey::Corridor => TemplateParams::Corridor(CorridorParams::default()),
            TemplateKey::Highway => TemplateParams::Highway(HighwayParams::default()),
        }
    }

    pub fn key(&self) -> TemplateKey {
        match self {
            TemplateParams::FourWay(_) => TemplateKey::FourWay,
            TemplateParams::TJunction(_) => TemplateKey::TJunction,
            TemplateParams::Roundabout(_) => TemplateKey::Roundabout,
            TemplateParams::Grid(_) => TemplateKey::Grid,
            TemplateParams::Corridor(_) => TemplateKey::Corridor,
            TemplateParams::Highway(_) => TemplateKey::Highway,
        }
    }

    pub fn info(&self) -> TemplateInfo {
        let (name, description) = match self {
            TemplateParams::FourWay(_) => (
                "4-Way Intersection".to_string(),
                "Standard signalized 4-way intersection".to_string(),
            ),
            TemplateParams::TJunction(_) => (
                "3-Way T-Intersection".to_string(),
                "T-intersection (3-way)".to_string(),
            ),
            TemplateParams::Roundabout(p) => (
                format!("{}-Arm Roundabout", p.arm_count),
                format!("Roundabout with {} entry/exit arms", p.arm_count),
            ),
            TemplateParams::Grid(p) => (
                format!("{}x{} Grid Network", p.rows, p.cols),
                format!("Grid network with {} rows and {} columns", p.rows, p.cols),
            ),
            TemplateParams::Corridor(p) => (
                format!("Arterial Corridor ({} intersections)", p.intersections),
                "Linear corridor with signalized intersections".to_string(),
            ),
            TemplateParams::Highway(p) => (
                "Highway Segment".to_string(),
                format!("Highway with {} lanes and {} ramp pairs", p.lanes, p.ramps),
            ),
        };
        TemplateInfo {
            key: self.key(),
            name,
            description,
        }
    }

    pub fn generate(&self) -> Result<NetworkGraph> {
        let network = match self {
            TemplateParams::FourWay(p) => p.generate(),
            TemplateParams::TJunction(p) => p.generate(),
            TemplateParams::Roundabout(p) => p.generate(),
            TemplateParams::Grid(p) => p.generate(),
            TemplateParams::Corridor(p) => p.generate(),
            TemplateParams::Highway(p) => p.generate(),
        }?;
        info!(
            "Generated {} network: {} junctions, {} links, {} signal programs",
            self.key(),
            network.junction_count(),
            network.link_count(),
            network.programs().len()
        );
        Ok(network)
    }
}

/// Lists every template with its default name and description.
pub fn list_templates() -> Vec<TemplateInfo> {
    TemplateKey::ALL
        .into_iter()
        .map(|key| TemplateParams::for_key(key).info())
        .collect()
}

/// Generates a network from a template key and its default parameters.
pub fn create_network(key: &str) -> Result<NetworkGraph> {
    TemplateParams::defaults(key)?.generate()
}

/// Lane count, speed and priority shared by the links of one road
#[derive(Debug, Clone, Copy)]
pub(crate) struct RoadProfile {
    pub lanes: u32,
    /// m/s
    pub speed: f64,
    pub priority: i32,
}

/// Adds the two directed links of a two-way road between `a` and `b`.
pub(crate) fn add_two_way(
    network: &mut NetworkGraph,
    ids: (String, String),
    a: &JunctionId,
    b: &JunctionId,
    road: RoadProfile,
) -> Result<()> {
    let (forward, backward) = ids;
    add_one_way(network, forward, a, b, road)?;
    add_one_way(network, backward, b, a, road)
}

pub(crate) fn add_one_way(
    network: &mut NetworkGraph,
    id: String,
    from: &JunctionId,
    to: &JunctionId,
    road: RoadProfile,
) -> Result<()> {
    network.add_link(
        Link::new(id, from, to, road.lanes, road.speed)?.with_priority(road.priority),
    )
}

pub(crate) fn require_count(field: &'static str, value: u32, min: u32) -> Result<()> {
    if value < min {
        return Err(ScenarioError::invalid(
            field,
            format!("must be at least {min}, got {value}"),
        ));
    }
    Ok(())
}
