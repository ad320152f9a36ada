//! Additional-infrastructure file (`additional` root)

use super::records::{
    number, to_document, AdditionalFile, InductionLoopRecord, LaneAreaDetectorRecord, StopRecord,
};
use crate::scenario::additional::{AdditionalSet, Infrastructure};
use crate::scenario::error::Result;
use crate::scenario::road_network::NetworkGraph;

/// Renders every element after checking its lane exists.
///
/// Elements are grouped by kind (induction loops, lane-area detectors, bus
/// stops, parking areas) and keep insertion order within a kind.
pub fn render_additional(additional: &AdditionalSet, network: &NetworkGraph) -> Result<String> {
    additional.validate_against(network)?;

    let mut file = AdditionalFile::default();
    for element in additional.elements() {
        let id = element.id().to_string();
        let lane = element.lane().to_string();
        match element {
            Infrastructure::InductionLoop {
                pos,
                period,
                file: output,
                ..
            } => file.induction_loop.push(InductionLoopRecord {
                id,
                lane,
                pos: number(*pos),
                period: period.to_string(),
                file: output.clone(),
            }),
            Infrastructure::LaneAreaDetector {
                pos,
                end_pos,
                period,
                file: output,
                ..
            } => file.lane_area_detector.push(LaneAreaDetectorRecord {
                id,
                lane,
                pos: number(*pos),
                end_pos: end_pos.map(number),
                period: period.to_string(),
                file: output.clone(),
            }),
            Infrastructure::BusStop {
                start_pos,
                end_pos,
                name,
                ..
            } => file.bus_stop.push(StopRecord {
                id,
                lane,
                start_pos: number(*start_pos),
                end_pos: number(*end_pos),
                name: name.clone(),
                roadside_capacity: None,
            }),
            Infrastructure::ParkingArea {
                start_pos,
                end_pos,
                roadside_capacity,
                ..
            } => file.parking_area.push(StopRecord {
                id,
                lane,
                start_pos: number(*start_pos),
                end_pos: number(*end_pos),
                name: None,
                roadside_capacity: Some(roadside_capacity.to_string()),
            }),
        }
    }
    to_document(&file)
}
