//! Highway segment with paired on/off ramps
//!
//! ```text
//! start ----junc_1----junc_2---- end
//!          /     \   /     \
//!   on_ramp_1  off_ramp_1 ...
//! ```

use super::{add_one_way, RoadProfile};
use crate::scenario::error::{require_positive, Result, ScenarioError};
use crate::scenario::junction::Junction;
use crate::scenario::link::DEFAULT_PRIORITY;
use crate::scenario::road_network::NetworkGraph;
use crate::scenario::types::{kmh_to_ms, JunctionId, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct HighwayParams {
    /// Main-axis length in m
    pub length: f64,
    pub lanes: u32,
    pub speed_limit_kmh: f64,
    /// Number of on/off ramp pairs
    pub ramps: u32,
    pub ramp_lanes: u32,
    pub ramp_speed_kmh: f64,
    /// Longitudinal and lateral distance from a merge junction to its ramp ends
    pub ramp_offset: f64,
    /// Main-axis rank; must exceed `ramp_priority` so ramps yield
    pub main_priority: i32,
    pub ramp_priority: i32,
}

impl Default for HighwayParams {
    fn default() -> Self {
        Self {
            length: 2000.0,
            lanes: 3,
            speed_limit_kmh: 100.0,
            ramps: 2,
            ramp_lanes: 1,
            ramp_speed_kmh: 60.0,
            ramp_offset: 100.0,
            main_priority: 3,
            ramp_priority: DEFAULT_PRIORITY,
        }
    }
}

impl HighwayParams {
    pub fn generate(&self) -> Result<NetworkGraph> {
        require_positive("length", self.length)?;
        require_positive("ramp_offset", self.ramp_offset)?;
        if self.main_priority <= self.ramp_priority {
            return Err(ScenarioError::invalid(
                "priority",
                format!(
                    "main priority {} must exceed ramp priority {}",
                    self.main_priority, self.ramp_priority
                ),
            ));
        }
        if self.ramp_speed_kmh >= self.speed_limit_kmh {
            return Err(ScenarioError::invalid(
                "ramp_speed_kmh",
                format!(
                    "ramp speed {} km/h must be below main speed {} km/h",
                    self.ramp_speed_kmh, self.speed_limit_kmh
                ),
            ));
        }
        if self.ramp_lanes > self.lanes {
            return Err(ScenarioError::invalid(
                "ramp_lanes",
                format!(
                    "ramp lanes {} must not exceed main lanes {}",
                    self.ramp_lanes, self.lanes
                ),
            ));
        }

        let mut network = NetworkGraph::new();
        let start = JunctionId::from("start");
        let end = JunctionId::from("end");
        network.add_junction(Junction::priority(&start, Position::new(0.0, 0.0))?)?;
        network.add_junction(Junction::priority(&end, Position::new(self.length, 0.0))?)?;

        let spacing = self.length / f64::from(self.ramps + 1);
        for i in 1..=self.ramps {
            let x = f64::from(i) * spacing;
            network.add_junction(Junction::priority(merge_id(i), Position::new(x, 0.0))?)?;
            network.add_junction(Junction::priority(
                format!("on_ramp_{i}"),
                Position::new(x - self.ramp_offset, -self.ramp_offset),
            )?)?;
            network.add_junction(Junction::priority(
                format!("off_ramp_{i}"),
                Position::new(x + self.ramp_offset, -self.ramp_offset),
            )?)?;
        }

        let main = RoadProfile {
            lanes: self.lanes,
            speed: kmh_to_ms(self.speed_limit_kmh),
            priority: self.main_priority,
        };
        let mut previous = start;
        for i in 1..=self.ramps {
            let merge = merge_id(i);
            add_one_way(
                &mut network,
                format!("hw_{previous}_{merge}"),
                &previous,
                &merge,
                main,
            )?;
            previous = merge;
        }
        add_one_way(&mut network, format!("hw_{previous}_end"), &previous, &end, main)?;

        let ramp = RoadProfile {
            lanes: self.ramp_lanes,
            speed: kmh_to_ms(self.ramp_speed_kmh),
            priority: self.ramp_priority,
        };
        for i in 1..=self.ramps {
            let merge = merge_id(i);
            let on_ramp = JunctionId(format!("on_ramp_{i}"));
            let off_ramp = JunctionId(format!("off_ramp_{i}"));
            add_one_way(&mut network, format!("on_ramp_{i}"), &on_ramp, &merge, ramp)?;
            add_one_way(&mut network, format!("off_ramp_{i}"), &merge, &off_ramp, ramp)?;
        }

        Ok(network)
    }
}

fn merge_id(i: u32) -> JunctionId {
    JunctionId(format!("junc_{i}"))
}
