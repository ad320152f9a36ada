//! Junction, link, connection and signal-logic files

use log::debug;

use super::records::{
    number, to_document, ConnectionRecord, ConnectionsFile, EdgeRecord, EdgesFile, NodeRecord,
    NodesFile, PhaseRecord, TlLogicRecord, TlLogicsFile,
};
use crate::scenario::error::Result;
use crate::scenario::road_network::NetworkGraph;
use crate::scenario::types::VehicleCategory;

fn class_list(classes: &[VehicleCategory]) -> Option<String> {
    if classes.is_empty() {
        return None;
    }
    Some(
        classes
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Junction file (`nodes` root).
pub fn render_junctions(network: &NetworkGraph) -> Result<String> {
    let node = network
        .junctions()
        .iter()
        .map(|junction| {
            let position = junction.position();
            NodeRecord {
                id: junction.id().to_string(),
                x: number(position.x),
                y: number(position.y),
                kind: junction.kind().to_string(),
                tl_type: junction.controller().map(|c| c.to_string()),
            }
        })
        .collect();
    debug!("rendered {} junctions", network.junction_count());
    to_document(&NodesFile { node })
}

/// Link file (`edges` root). Fails on links whose endpoints are missing.
pub fn render_links(network: &NetworkGraph) -> Result<String> {
    let mut edge = Vec::with_capacity(network.link_count());
    for link in network.links() {
        network.check_link_endpoints(link)?;
        edge.push(EdgeRecord {
            id: link.id().to_string(),
            from: link.from().to_string(),
            to: link.to().to_string(),
            num_lanes: link.lanes().to_string(),
            speed: number(link.speed()),
            priority: link.priority().to_string(),
            kind: link.kind().map(|k| k.to_string()),
            allow: class_list(link.allowed()),
            disallow: class_list(link.disallowed()),
        });
    }
    debug!("rendered {} links", network.link_count());
    to_document(&EdgesFile { edge })
}

/// Connection file (`connections` root), or `None` when the graph has no
/// explicit connections.
pub fn render_connections(network: &NetworkGraph) -> Result<Option<String>> {
    if network.connections().is_empty() {
        return Ok(None);
    }
    let mut connection = Vec::with_capacity(network.connections().len());
    for c in network.connections() {
        network.check_connection(c)?;
        connection.push(ConnectionRecord {
            from: c.from_link.to_string(),
            to: c.to_link.to_string(),
            from_lane: c.from_lane.to_string(),
            to_lane: c.to_lane.to_string(),
        });
    }
    to_document(&ConnectionsFile { connection }).map(Some)
}

/// Signal-logic file (`tlLogics` root), or `None` when no junction is signalized.
///
/// Every program must carry phases and target a signalized junction.
pub fn render_signal_logic(network: &NetworkGraph) -> Result<Option<String>> {
    if network.programs().is_empty() {
        return Ok(None);
    }
    let mut tl_logic = Vec::with_capacity(network.programs().len());
    for program in network.programs() {
        network.check_program(program)?;
        let phase = program
            .phases()
            .iter()
            .map(|phase| PhaseRecord {
                duration: phase.duration().to_string(),
                state: phase.state().to_string(),
                min_dur: phase.min_duration().map(|d| d.to_string()),
                max_dur: phase.max_duration().map(|d| d.to_string()),
                name: phase.name().map(str::to_string),
            })
            .collect();
        tl_logic.push(TlLogicRecord {
            id: program.junction().to_string(),
            kind: program.controller().to_string(),
            program_id: program.program_id().to_string(),
            offset: program.offset().to_string(),
            phase,
        });
    }
    debug!("rendered {} signal programs", network.programs().len());
    to_document(&TlLogicsFile { tl_logic }).map(Some)
}
