//! Arterial corridor: a main street crossed by N signalized side streets
//!
//! ```text
//!        N1      N2
//!        |       |
//! M0 ----M1------M2---- M3
//!        |       |
//!        S1      S2
//! ```

use log::debug;

use super::{add_one_way, add_two_way, require_count, RoadProfile};
use crate::scenario::error::{require_positive, Result, ScenarioError};
use crate::scenario::junction::Junction;
use crate::scenario::road_network::NetworkGraph;
use crate::scenario::signal::{Approach, ApproachLayout};
use crate::scenario::timing::{apply_offsets, green_wave_offsets};
use crate::scenario::types::{kmh_to_ms, ControllerKind, JunctionId, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct CorridorParams {
    /// Number of interior (crossing) junctions
    pub intersections: u32,
    /// Distance between consecutive main-street junctions in m
    pub spacing: f64,
    pub main_lanes: u32,
    pub cross_lanes: u32,
    pub main_speed_kmh: f64,
    pub cross_speed_kmh: f64,
    /// Length of each cross-street stub in m
    pub cross_arm_length: f64,
    pub signal: Option<ControllerKind>,
    pub main_green: u32,
    pub cross_green: u32,
    pub yellow: u32,
    /// When set, interior programs get green-wave offsets for this speed
    pub progression_speed_kmh: Option<f64>,
}

impl Default for CorridorParams {
    fn default() -> Self {
        Self {
            intersections: 5,
            spacing: 300.0,
            main_lanes: 3,
            cross_lanes: 2,
            main_speed_kmh: 60.0,
            cross_speed_kmh: 40.0,
            cross_arm_length: 150.0,
            signal: Some(ControllerKind::Static),
            main_green: 40,
            cross_green: 25,
            yellow: 3,
            progression_speed_kmh: None,
        }
    }
}

impl CorridorParams {
    pub fn generate(&self) -> Result<NetworkGraph> {
        require_count("intersections", self.intersections, 1)?;
        require_positive("spacing", self.spacing)?;
        require_positive("cross_arm_length", self.cross_arm_length)?;
        if self.main_green < self.cross_green {
            return Err(ScenarioError::invalid(
                "main_green",
                format!(
                    "main-street green {}s must not be shorter than cross-street green {}s",
                    self.main_green, self.cross_green
                ),
            ));
        }

        let mut network = NetworkGraph::new();
        let last = self.intersections + 1;
        for i in 0..=last {
            let x = f64::from(i) * self.spacing;
            let main = Position::new(x, 0.0);
            let interior = i != 0 && i != last;
            let junction = match self.signal {
                Some(controller) if interior => {
                    Junction::signalized(main_id(i), main, Some(controller))?
                }
                _ => Junction::priority(main_id(i), main)?,
            };
            network.add_junction(junction)?;
            if interior {
                network.add_junction(Junction::priority(
                    format!("N{i}"),
                    Position::new(x, self.cross_arm_length),
                )?)?;
                network.add_junction(Junction::priority(
                    format!("S{i}"),
                    Position::new(x, -self.cross_arm_length),
                )?)?;
            }
        }

        let main = RoadProfile {
            lanes: self.main_lanes,
            speed: kmh_to_ms(self.main_speed_kmh),
            priority: 1,
        };
        for i in 0..last {
            add_two_way(
                &mut network,
                (format!("main_{i}_EB"), format!("main_{i}_WB")),
                &main_id(i),
                &main_id(i + 1),
                main,
            )?;
        }

        let cross = RoadProfile {
            lanes: self.cross_lanes,
            speed: kmh_to_ms(self.cross_speed_kmh),
            priority: 1,
        };
        for i in 1..last {
            let centre = main_id(i);
            let north = JunctionId(format!("N{i}"));
            let south = JunctionId(format!("S{i}"));
            add_one_way(&mut network, format!("cross_{i}_NB"), &south, &centre, cross)?;
            add_one_way(&mut network, format!("cross_{i}_NB2"), &centre, &north, cross)?;
            add_one_way(&mut network, format!("cross_{i}_SB"), &north, &centre, cross)?;
            add_one_way(&mut network, format!("cross_{i}_SB2"), &centre, &south, cross)?;
        }

        if let Some(controller) = self.signal {
            self.add_programs(&mut network, controller)?;
        }
        Ok(network)
    }

    fn add_programs(&self, network: &mut NetworkGraph, controller: ControllerKind) -> Result<()> {
        let layout = ApproachLayout::new()
            .with_arm(Approach::North, self.cross_lanes)
            .with_arm(Approach::East, self.main_lanes)
            .with_arm(Approach::South, self.cross_lanes)
            .with_arm(Approach::West, self.main_lanes);
        let main_street: &[Approach] = &[Approach::East, Approach::West];
        let cross_street: &[Approach] = &[Approach::North, Approach::South];

        let mut programs = (1..=self.intersections)
            .map(|i| {
                layout.staged_program(
                    main_id(i),
                    controller,
                    &[(main_street, self.main_green), (cross_street, self.cross_green)],
                    self.yellow,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(speed_kmh) = self.progression_speed_kmh {
            let cycle = programs
                .first()
                .map(|p| f64::from(p.cycle_length()))
                .unwrap_or_default();
            let distances = vec![self.spacing; programs.len().saturating_sub(1)];
            let offsets = green_wave_offsets(cycle, kmh_to_ms(speed_kmh), &distances)?;
            debug!("corridor green wave at {speed_kmh} km/h: {offsets:?}");
            apply_offsets(&mut programs, &offsets)?;
        }

        for program in programs {
            network.add_program(program)?;
        }
        Ok(())
    }
}

fn main_id(i: u32) -> JunctionId {
    JunctionId(format!("M{i}"))
}
