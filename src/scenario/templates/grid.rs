//! Rectangular grid of two-way streets
//!
//! Junction `n{row}_{col}` sits at `(col·block, row·block)`. Boundary
//! junctions are priority-controlled; interior ones get the four-way
//! north-south / east-west program when the grid is signalized.

use log::debug;

use super::{add_two_way, require_count, RoadProfile};
use crate::scenario::error::{require_positive, Result};
use crate::scenario::junction::Junction;
use crate::scenario::road_network::NetworkGraph;
use crate::scenario::signal::{Approach, ApproachLayout};
use crate::scenario::types::{kmh_to_ms, ControllerKind, JunctionId, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct GridParams {
    pub rows: u32,
    pub cols: u32,
    /// Lattice spacing in m
    pub block_length: f64,
    pub lanes: u32,
    pub speed_limit_kmh: f64,
    /// `None` leaves every junction priority-controlled
    pub signal: Option<ControllerKind>,
    pub green_ns: u32,
    pub green_ew: u32,
    pub yellow: u32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 3,
            block_length: 200.0,
            lanes: 2,
            speed_limit_kmh: 50.0,
            signal: Some(ControllerKind::Static),
            green_ns: 30,
            green_ew: 30,
            yellow: 3,
        }
    }
}

impl GridParams {
    fn is_boundary(&self, row: u32, col: u32) -> bool {
        row == 0 || col == 0 || row == self.rows - 1 || col == self.cols - 1
    }

    pub fn generate(&self) -> Result<NetworkGraph> {
        require_count("rows", self.rows, 2)?;
        require_count("cols", self.cols, 2)?;
        require_positive("block_length", self.block_length)?;

        let mut network = NetworkGraph::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let position = Position::new(
                    f64::from(col) * self.block_length,
                    f64::from(row) * self.block_length,
                );
                let junction = match self.signal {
                    Some(controller) if !self.is_boundary(row, col) => {
                        Junction::signalized(node_id(row, col), position, Some(controller))?
                    }
                    _ => Junction::priority(node_id(row, col), position)?,
                };
                network.add_junction(junction)?;
            }
        }

        let road = RoadProfile {
            lanes: self.lanes,
            speed: kmh_to_ms(self.speed_limit_kmh),
            priority: 1,
        };
        for row in 0..self.rows {
            for col in 0..self.cols - 1 {
                add_two_way(
                    &mut network,
                    (format!("e{row}_{col}_EB"), format!("e{row}_{col}_WB")),
                    &node_id(row, col),
                    &node_id(row, col + 1),
                    road,
                )?;
            }
        }
        for row in 0..self.rows - 1 {
            for col in 0..self.cols {
                add_two_way(
                    &mut network,
                    (format!("e{row}_{col}_NB"), format!("e{row}_{col}_SB")),
                    &node_id(row, col),
                    &node_id(row + 1, col),
                    road,
                )?;
            }
        }
        debug!("grid {}x{}: {} links", self.rows, self.cols, network.link_count());

        if let Some(controller) = self.signal {
            let layout = ApproachLayout::uniform(&Approach::ALL, self.lanes);
            let north_south: &[Approach] = &[Approach::North, Approach::South];
            let east_west: &[Approach] = &[Approach::East, Approach::West];
            for row in 1..self.rows - 1 {
                for col in 1..self.cols - 1 {
                    let program = layout.staged_program(
                        node_id(row, col),
                        controller,
                        &[(north_south, self.green_ns), (east_west, self.green_ew)],
                        self.yellow,
                    )?;
                    network.add_program(program)?;
                }
            }
        }

        Ok(network)
    }
}

fn node_id(row: u32, col: u32) -> JunctionId {
    JunctionId(format!("n{row}_{col}"))
}
