//! Re-parsing of junction, link and signal-logic files into the entity model

use anyhow::{anyhow, bail, Context, Result};
use roxmltree as xml;

use crate::scenario::junction::Junction;
use crate::scenario::link::{Link, DEFAULT_PRIORITY};
use crate::scenario::road_network::NetworkGraph;
use crate::scenario::signal::{Phase, SignalProgram};
use crate::scenario::types::{ControllerKind, JunctionKind, VehicleCategory};

fn document_root<'a, 'input>(
    doc: &'a xml::Document<'input>,
    tag: &str,
) -> Result<xml::Node<'a, 'input>> {
    let root = doc.root_element();
    if !root.has_tag_name(tag) {
        bail!(
            "expected <{tag}> root element, found <{}>",
            root.tag_name().name()
        );
    }
    Ok(root)
}

fn attr<'a>(node: &xml::Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        anyhow!(
            "<{}> at byte {} is missing attribute {name}",
            node.tag_name().name(),
            node.range().start
        )
    })
}

fn number_attr<T>(node: &xml::Node, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = attr(node, name)?;
    raw.parse()
        .with_context(|| format!("attribute {name}=\"{raw}\" is not a number"))
}

fn optional_number<T>(node: &xml::Node, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match node.attribute(name) {
        Some(_) => number_attr(node, name).map(Some),
        None => Ok(None),
    }
}

fn categories(raw: Option<&str>) -> Result<Vec<VehicleCategory>> {
    raw.unwrap_or_default()
        .split_whitespace()
        .map(|c| c.parse::<VehicleCategory>().map_err(anyhow::Error::from))
        .collect()
}

pub fn parse_junctions(data: &str) -> Result<Vec<Junction>> {
    let doc = xml::Document::parse(data).context("junction file is not well-formed XML")?;
    let root = document_root(&doc, "nodes")?;
    let mut junctions = Vec::new();
    for node in root.children().filter(|c| c.has_tag_name("node")) {
        let id = attr(&node, "id")?;
        let kind: JunctionKind = attr(&node, "type")?.parse()?;
        let mut junction = Junction::new(
            id,
            number_attr(&node, "x")?,
            number_attr(&node, "y")?,
            kind,
        )
        .with_context(|| format!("invalid junction [{id}]"))?;
        if let Some(controller) = node.attribute("tlType") {
            junction = junction.with_controller(controller.parse::<ControllerKind>()?)?;
        }
        junctions.push(junction);
    }
    Ok(junctions)
}

pub fn parse_links(data: &str) -> Result<Vec<Link>> {
    let doc = xml::Document::parse(data).context("link file is not well-formed XML")?;
    let root = document_root(&doc, "edges")?;
    let mut links = Vec::new();
    for edge in root.children().filter(|c| c.has_tag_name("edge")) {
        let id = attr(&edge, "id")?;
        let mut link = Link::new(
            id,
            attr(&edge, "from")?,
            attr(&edge, "to")?,
            number_attr(&edge, "numLanes")?,
            number_attr(&edge, "speed")?,
        )
        .with_context(|| format!("invalid link [{id}]"))?
        .with_priority(optional_number(&edge, "priority")?.unwrap_or(DEFAULT_PRIORITY))
        .allowing(categories(edge.attribute("allow"))?)
        .disallowing(categories(edge.attribute("disallow"))?);
        if let Some(kind) = edge.attribute("type") {
            link = link.with_type(kind)?;
        }
        links.push(link);
    }
    Ok(links)
}

pub fn parse_signal_logic(data: &str) -> Result<Vec<SignalProgram>> {
    let doc = xml::Document::parse(data).context("signal-logic file is not well-formed XML")?;
    let root = document_root(&doc, "tlLogics")?;
    let mut programs = Vec::new();
    for logic in root.children().filter(|c| c.has_tag_name("tlLogic")) {
        let id = attr(&logic, "id")?;
        let controller: ControllerKind = attr(&logic, "type")?.parse()?;
        let mut program = SignalProgram::new(
            id,
            controller,
            optional_number(&logic, "offset")?.unwrap_or_default(),
        )?;
        if let Some(program_id) = logic.attribute("programID") {
            program = program.with_program_id(program_id)?;
        }
        for node in logic.children().filter(|c| c.has_tag_name("phase")) {
            let mut phase = Phase::new(number_attr(&node, "duration")?, attr(&node, "state")?)?
                .with_bounds(
                    optional_number(&node, "minDur")?,
                    optional_number(&node, "maxDur")?,
                )?;
            if let Some(name) = node.attribute("name") {
                phase = phase.named(name);
            }
            program
                .append_phase(phase)
                .with_context(|| format!("invalid phase in program [{id}]"))?;
        }
        programs.push(program);
    }
    Ok(programs)
}

/// Rebuilds a graph from its junction and link files and, optionally, its
/// signal-logic file.
pub fn parse_network(
    junctions: &str,
    links: &str,
    signal_logic: Option<&str>,
) -> Result<NetworkGraph> {
    let mut network = NetworkGraph::new();
    for junction in parse_junctions(junctions)? {
        network.add_junction(junction)?;
    }
    for link in parse_links(links)? {
        network.add_link(link)?;
    }
    if let Some(signal_logic) = signal_logic {
        for program in parse_signal_logic(signal_logic)? {
            network.add_program(program)?;
        }
    }
    network
        .validate_references()
        .context("re-parsed network has dangling references")?;
    Ok(network)
}
