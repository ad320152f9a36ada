//! Roundabout: a ring of priority junctions with one approach per arm

use super::{add_one_way, add_two_way, require_count, RoadProfile};
use crate::scenario::error::{require_positive, Result};
use crate::scenario::junction::Junction;
use crate::scenario::road_network::NetworkGraph;
use crate::scenario::types::{kmh_to_ms, JunctionId, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct RoundaboutParams {
    pub arm_count: u32,
    /// Ring radius in m
    pub radius: f64,
    /// Distance from the ring to each approach junction in m
    pub arm_length: f64,
    pub arm_lanes: u32,
    pub ring_lanes: u32,
    pub speed_limit_kmh: f64,
}

impl Default for RoundaboutParams {
    fn default() -> Self {
        Self {
            arm_count: 4,
            radius: 30.0,
            arm_length: 200.0,
            arm_lanes: 1,
            ring_lanes: 2,
            speed_limit_kmh: 30.0,
        }
    }
}

impl RoundaboutParams {
    /// Ray angle of arm `i` in degrees: `i·360/K − 90`
    fn angle(&self, arm: u32) -> f64 {
        f64::from(arm) * 360.0 / f64::from(self.arm_count) - 90.0
    }

    pub fn generate(&self) -> Result<NetworkGraph> {
        require_count("arm_count", self.arm_count, 3)?;
        require_positive("radius", self.radius)?;
        require_positive("arm_length", self.arm_length)?;

        let mut network = NetworkGraph::new();
        for i in 0..self.arm_count {
            let position = Position::on_ray(self.angle(i), self.radius);
            network.add_junction(Junction::priority(ring_id(i), position)?)?;
        }
        for i in 0..self.arm_count {
            let position = Position::on_ray(self.angle(i), self.radius + self.arm_length);
            network.add_junction(Junction::priority(approach_id(i), position)?)?;
        }

        let speed = kmh_to_ms(self.speed_limit_kmh);
        let ring = RoadProfile {
            lanes: self.ring_lanes,
            speed,
            priority: 1,
        };
        for i in 0..self.arm_count {
            let next = (i + 1) % self.arm_count;
            add_one_way(
                &mut network,
                format!("R{i}2R{next}"),
                &ring_id(i),
                &ring_id(next),
                ring,
            )?;
        }

        let arm = RoadProfile {
            lanes: self.arm_lanes,
            speed,
            priority: 1,
        };
        for i in 0..self.arm_count {
            add_two_way(
                &mut network,
                (format!("A{i}2R{i}"), format!("R{i}2A{i}")),
                &approach_id(i),
                &ring_id(i),
                arm,
            )?;
        }

        Ok(network)
    }
}

fn ring_id(i: u32) -> JunctionId {
    JunctionId(format!("R{i}"))
}

fn approach_id(i: u32) -> JunctionId {
    JunctionId(format!("A{i}"))
}
