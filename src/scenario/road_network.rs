//! Road network graph
//!
//! [`NetworkGraph`] owns every junction, link, connection and signal program
//! of one scenario in insertion order. It rejects duplicate ids on insert but
//! defers referential checks (does a link's endpoint exist?) to
//! [`NetworkGraph::validate_references`], which the serializer runs before
//! writing anything.

use std::collections::HashMap;

use petgraph::algo::{astar, connected_components, kosaraju_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::error::{Result, ScenarioError};
use super::junction::Junction;
use super::link::{Connection, Link};
use super::signal::SignalProgram;
use super::types::{JunctionId, LinkId};

/// Edge data for the topology graph
#[derive(Debug, Clone)]
pub struct LinkEdge {
    pub link_id: LinkId,
    pub weight: u32, // Link length scaled for integer weights
}

impl LinkEdge {
    fn new(link: &Link, length: f64) -> Self {
        // Convert length to integer weight (scaled by 100 to preserve precision)
        let weight = (length * 100.0) as u32;
        Self {
            link_id: link.id().clone(),
            weight: weight.max(1), // Ensure minimum weight of 1
        }
    }
}

/// Directed junction/link view of a network, built on demand
pub struct Topology {
    pub graph: DiGraph<JunctionId, LinkEdge>,
    pub nodes: HashMap<JunctionId, NodeIndex>,
}

/// All entities of one scenario
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    junctions: Vec<Junction>,
    links: Vec<Link>,
    connections: Vec<Connection>,
    programs: Vec<SignalProgram>,

    /// Maps junction IDs to their position in `junctions`
    junction_index: HashMap<JunctionId, usize>,

    /// Maps link IDs to their position in `links`
    link_index: HashMap<LinkId, usize>,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_junction(&mut self, junction: Junction) -> Result<()> {
        if self.junction_index.contains_key(junction.id()) {
            return Err(ScenarioError::invalid(
                "id",
                format!("duplicate junction id [{}]", junction.id()),
            ));
        }
        self.junction_index
            .insert(junction.id().clone(), self.junctions.len());
        self.junctions.push(junction);
        Ok(())
    }

    pub fn add_link(&mut self, link: Link) -> Result<()> {
        if self.link_index.contains_key(link.id()) {
            return Err(ScenarioError::invalid(
                "id",
                format!("duplicate link id [{}]", link.id()),
            ));
        }
        self.link_index.insert(link.id().clone(), self.links.len());
        self.links.push(link);
        Ok(())
    }

    pub fn add_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Adds a program; a junction may carry several programs with distinct ids.
    pub fn add_program(&mut self, program: SignalProgram) -> Result<()> {
        let clash = self.programs.iter().any(|p| {
            p.junction() == program.junction() && p.program_id() == program.program_id()
        });
        if clash {
            return Err(ScenarioError::invalid(
                "programID",
                format!(
                    "junction [{}] already has program [{}]",
                    program.junction(),
                    program.program_id()
                ),
            ));
        }
        self.programs.push(program);
        Ok(())
    }

    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn programs(&self) -> &[SignalProgram] {
        &self.programs
    }

    /// Mutable access for retiming before serialization
    pub fn programs_mut(&mut self) -> &mut [SignalProgram] {
        &mut self.programs
    }

    pub fn junction(&self, id: &str) -> Option<&Junction> {
        self.junction_index.get(id).map(|i| &self.junctions[*i])
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.link_index.get(id).map(|i| &self.links[*i])
    }

    pub fn program_for(&self, junction: &str) -> Option<&SignalProgram> {
        self.programs
            .iter()
            .find(|p| p.junction().as_str() == junction)
    }

    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Straight-line length of a link, if both endpoints exist
    pub fn link_length(&self, link: &Link) -> Option<f64> {
        let from = self.junction(link.from().as_str())?.position();
        let to = self.junction(link.to().as_str())?.position();
        Some(from.distance(&to))
    }

    /// Checks that every link, connection and program refers to entities of this graph.
    pub fn validate_references(&self) -> Result<()> {
        for link in &self.links {
            self.check_link_endpoints(link)?;
        }
        for connection in &self.connections {
            self.check_connection(connection)?;
        }
        for program in &self.programs {
            self.check_program(program)?;
        }
        Ok(())
    }

    /// A program must control an existing signalized junction and carry at least one phase.
    pub(crate) fn check_program(&self, program: &SignalProgram) -> Result<()> {
        let junction = self.junction(program.junction().as_str()).ok_or_else(|| {
            ScenarioError::dangling(
                "junction",
                format!("program {}", program.program_id()),
                program.junction().as_str(),
            )
        })?;
        if !junction.is_signalized() {
            return Err(ScenarioError::invalid(
                "tlLogic",
                format!(
                    "junction [{}] of type {} cannot carry a signal program",
                    junction.id(),
                    junction.kind()
                ),
            ));
        }
        if program.phases().is_empty() {
            return Err(ScenarioError::invalid(
                "phases",
                format!("program of junction [{}] has no phases", program.junction()),
            ));
        }
        Ok(())
    }

    pub(crate) fn check_link_endpoints(&self, link: &Link) -> Result<()> {
        for endpoint in [link.from(), link.to()] {
            if self.junction(endpoint.as_str()).is_none() {
                return Err(ScenarioError::dangling(
                    "junction",
                    link.id().as_str(),
                    endpoint.as_str(),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn check_connection(&self, connection: &Connection) -> Result<()> {
        let owner = format!("connection {}->{}", connection.from_link, connection.to_link);
        let lanes = [
            (&connection.from_link, connection.from_lane),
            (&connection.to_link, connection.to_lane),
        ];
        for (link_id, lane) in lanes {
            let link = self
                .link(link_id.as_str())
                .ok_or_else(|| ScenarioError::dangling("link", owner.clone(), link_id.as_str()))?;
            if lane >= link.lanes() {
                return Err(ScenarioError::dangling(
                    "lane",
                    owner,
                    format!("{}_{}", link_id, lane),
                ));
            }
        }
        Ok(())
    }

    /// Builds the directed junction/link graph.
    pub fn topology(&self) -> Result<Topology> {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        for junction in &self.junctions {
            let index = graph.add_node(junction.id().clone());
            nodes.insert(junction.id().clone(), index);
        }
        for link in &self.links {
            self.check_link_endpoints(link)?;
            let length = self.link_length(link).unwrap_or_default();
            graph.add_edge(
                nodes[link.from()],
                nodes[link.to()],
                LinkEdge::new(link, length),
            );
        }
        Ok(Topology { graph, nodes })
    }

    /// Whether every junction can reach every other junction
    pub fn is_strongly_connected(&self) -> Result<bool> {
        let topology = self.topology()?;
        Ok(kosaraju_scc(&topology.graph).len() <= 1)
    }

    /// Number of components when link direction is ignored
    pub fn component_count(&self) -> Result<usize> {
        Ok(connected_components(&self.topology()?.graph))
    }

    /// Finds the shortest link sequence that starts with `from` and ends with `to`
    pub fn shortest_path(&self, from: &str, to: &str) -> Result<Option<Vec<LinkId>>> {
        let from_link = self
            .link(from)
            .ok_or_else(|| ScenarioError::dangling("link", "route", from))?;
        let to_link = self
            .link(to)
            .ok_or_else(|| ScenarioError::dangling("link", "route", to))?;

        if from_link.id() == to_link.id() {
            return Ok(Some(vec![from_link.id().clone()]));
        }

        let topology = self.topology()?;
        let start = topology.nodes[from_link.to()];
        let goal = topology.nodes[to_link.from()];

        let Some((_, node_path)) = astar(
            &topology.graph,
            start,
            |node| node == goal,
            |edge| edge.weight().weight,
            |_| 0, // Null heuristic = Dijkstra
        ) else {
            return Ok(None);
        };

        let mut path = vec![from_link.id().clone()];
        for pair in node_path.windows(2) {
            // Cheapest of the parallel links between consecutive junctions
            let link = topology
                .graph
                .edges(pair[0])
                .filter(|edge| edge.target() == pair[1])
                .min_by_key(|edge| edge.weight().weight)
                .map(|edge| edge.weight().link_id.clone());
            match link {
                Some(link) => path.push(link),
                None => return Ok(None),
            }
        }
        path.push(to_link.id().clone());
        Ok(Some(path))
    }
}
