//! Single junction templates: the four-way cross and the T-junction
//!
//! ```text
//!      N                 N
//!      |                 |
//! W ---C--- E       W ---C--- E
//!      |
//!      S
//! ```
//!
//! A central junction `C` sits at the origin with one approach junction per
//! arm at `arm_length`. Each arm is a two-way road (`N2C` / `C2N`, ...).

use log::debug;

use super::{add_two_way, RoadProfile};
use crate::scenario::error::{require_positive, Result, ScenarioError};
use crate::scenario::junction::Junction;
use crate::scenario::road_network::NetworkGraph;
use crate::scenario::signal::{Approach, ApproachLayout};
use crate::scenario::types::{kmh_to_ms, ControllerKind, JunctionId, Position};

const CENTRE: &str = "C";

/// Per-arm replacement for the uniform lane count or speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmOverride {
    pub approach: Approach,
    pub lanes: Option<u32>,
    pub speed_limit_kmh: Option<f64>,
}

/// Standard signalized 4-way intersection
#[derive(Debug, Clone, PartialEq)]
pub struct FourWayParams {
    /// Length of each approach arm in m
    pub arm_length: f64,
    /// Lanes in each direction of every arm
    pub lanes_per_arm: u32,
    pub speed_limit_kmh: f64,
    /// `None` leaves the centre priority-controlled
    pub signal: Option<ControllerKind>,
    /// North-south green in s
    pub green_ns: u32,
    /// East-west green in s
    pub green_ew: u32,
    pub yellow: u32,
    pub overrides: Vec<ArmOverride>,
}

impl Default for FourWayParams {
    fn default() -> Self {
        Self {
            arm_length: 200.0,
            lanes_per_arm: 2,
            speed_limit_kmh: 50.0,
            signal: Some(ControllerKind::Static),
            green_ns: 30,
            green_ew: 30,
            yellow: 3,
            overrides: Vec::new(),
        }
    }
}

impl FourWayParams {
    pub fn generate(&self) -> Result<NetworkGraph> {
        let north_south: &[Approach] = &[Approach::North, Approach::South];
        let east_west: &[Approach] = &[Approach::East, Approach::West];
        ArmJunction {
            arm_length: self.arm_length,
            lanes: self.lanes_per_arm,
            speed_limit_kmh: self.speed_limit_kmh,
            signal: self.signal,
            yellow: self.yellow,
            overrides: &self.overrides,
        }
        .build(
            &[
                Approach::North,
                Approach::South,
                Approach::East,
                Approach::West,
            ],
            &[(north_south, self.green_ns), (east_west, self.green_ew)],
        )
    }
}

/// T-intersection: a north stem meeting an east-west through road
#[derive(Debug, Clone, PartialEq)]
pub struct TJunctionParams {
    pub arm_length: f64,
    pub lanes_per_arm: u32,
    pub speed_limit_kmh: f64,
    pub signal: Option<ControllerKind>,
    /// Green for the north stem in s
    pub green_stem: u32,
    /// Green for the east-west through road in s
    pub green_through: u32,
    pub yellow: u32,
    pub overrides: Vec<ArmOverride>,
}

impl Default for TJunctionParams {
    fn default() -> Self {
        Self {
            arm_length: 200.0,
            lanes_per_arm: 2,
            speed_limit_kmh: 50.0,
            signal: Some(ControllerKind::Static),
            green_stem: 30,
            green_through: 30,
            yellow: 3,
            overrides: Vec::new(),
        }
    }
}

impl TJunctionParams {
    pub fn generate(&self) -> Result<NetworkGraph> {
        let stem: &[Approach] = &[Approach::North];
        let through: &[Approach] = &[Approach::East, Approach::West];
        ArmJunction {
            arm_length: self.arm_length,
            lanes: self.lanes_per_arm,
            speed_limit_kmh: self.speed_limit_kmh,
            signal: self.signal,
            yellow: self.yellow,
            overrides: &self.overrides,
        }
        .build(
            &[Approach::North, Approach::East, Approach::West],
            &[(stem, self.green_stem), (through, self.green_through)],
        )
    }
}

struct ArmJunction<'a> {
    arm_length: f64,
    lanes: u32,
    speed_limit_kmh: f64,
    signal: Option<ControllerKind>,
    yellow: u32,
    overrides: &'a [ArmOverride],
}

impl ArmJunction<'_> {
    fn lanes_for(&self, approach: Approach) -> u32 {
        self.override_for(approach)
            .and_then(|o| o.lanes)
            .unwrap_or(self.lanes)
    }

    fn speed_for(&self, approach: Approach) -> f64 {
        self.override_for(approach)
            .and_then(|o| o.speed_limit_kmh)
            .unwrap_or(self.speed_limit_kmh)
    }

    fn override_for(&self, approach: Approach) -> Option<&ArmOverride> {
        self.overrides.iter().find(|o| o.approach == approach)
    }

    fn build(&self, arms: &[Approach], stages: &[(&[Approach], u32)]) -> Result<NetworkGraph> {
        require_positive("arm_length", self.arm_length)?;
        if let Some(stray) = self.overrides.iter().find(|o| !arms.contains(&o.approach)) {
            return Err(ScenarioError::invalid(
                "overrides",
                format!("template has no {:?} arm", stray.approach),
            ));
        }

        let mut network = NetworkGraph::new();
        let centre = JunctionId::from(CENTRE);
        let origin = Position::default();
        let centre_junction = match self.signal {
            Some(controller) => Junction::signalized(CENTRE, origin, Some(controller))?,
            None => Junction::priority(CENTRE, origin)?,
        };
        network.add_junction(centre_junction)?;

        for arm in arms {
            let (dx, dy) = arm.direction();
            let position = Position::new(dx * self.arm_length, dy * self.arm_length);
            network.add_junction(Junction::priority(arm.label(), position)?)?;
        }

        for arm in arms {
            let label = arm.label();
            let road = RoadProfile {
                lanes: self.lanes_for(*arm),
                speed: kmh_to_ms(self.speed_for(*arm)),
                priority: 1,
            };
            add_two_way(
                &mut network,
                (format!("{label}2{CENTRE}"), format!("{CENTRE}2{label}")),
                &JunctionId::from(label),
                &centre,
                road,
            )?;
            debug!("arm {label}: {} lanes at {:.2} m/s", road.lanes, road.speed);
        }

        if let Some(controller) = self.signal {
            let layout = arms.iter().fold(ApproachLayout::new(), |layout, arm| {
                layout.with_arm(*arm, self.lanes_for(*arm))
            });
            let program = layout.staged_program(CENTRE, controller, stages, self.yellow)?;
            network.add_program(program)?;
        }

        Ok(network)
    }
}
