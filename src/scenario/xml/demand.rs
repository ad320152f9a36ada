//! Demand file: vehicle classes, routes, vehicles and flows

use log::debug;

use super::records::{
    number, to_document, FlowRecord, RouteRecord, RoutesFile, VTypeRecord, VehicleRecord,
};
use crate::scenario::demand::{DemandRate, DemandSet, Flow, FlowPath, VehicleClass, VehiclePath};
use crate::scenario::error::{Result, ScenarioError};
use crate::scenario::road_network::NetworkGraph;
use crate::scenario::types::LinkId;

fn link_list(links: &[LinkId]) -> String {
    links
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn class_record(class: &VehicleClass) -> VTypeRecord {
    VTypeRecord {
        id: class.id().to_string(),
        length: number(class.length()),
        min_gap: number(class.min_gap()),
        max_speed: number(class.max_speed()),
        accel: number(class.accel()),
        decel: number(class.decel()),
        sigma: number(class.sigma()),
        tau: number(class.tau()),
        v_class: class.category().to_string(),
        emission_class: class.emission_class().map(|e| e.to_string()),
        color: class.color().map(|c| c.to_string()),
        car_follow_model: class.car_follow_model().map(|m| m.to_string()),
    }
}

fn inline_route(links: &[LinkId]) -> Option<RouteRecord> {
    Some(RouteRecord {
        id: None,
        edges: link_list(links),
    })
}

fn flow_record(flow: &Flow) -> FlowRecord {
    let mut record = FlowRecord {
        id: flow.id.clone(),
        kind: flow.class.to_string(),
        begin: number(flow.begin),
        end: number(flow.end),
        ..FlowRecord::default()
    };
    match &flow.path {
        FlowPath::Route(route) => record.route_ref = Some(route.to_string()),
        FlowPath::OriginDestination { from, to } => {
            record.from = Some(from.to_string());
            record.to = Some(to.to_string());
        }
        FlowPath::Links(links) => record.inline_route = inline_route(links),
    }
    match flow.rate {
        DemandRate::VehiclesPerHour(v) => record.vehs_per_hour = Some(number(v)),
        DemandRate::Probability(p) => record.probability = Some(number(p)),
        DemandRate::Period(p) => record.period = Some(number(p)),
        DemandRate::Number(n) => record.number = Some(n.to_string()),
    }
    record
}

fn check_links(network: Option<&NetworkGraph>, owner: &str, links: &[&LinkId]) -> Result<()> {
    if let Some(network) = network {
        for link in links {
            if network.link(link.as_str()).is_none() {
                return Err(ScenarioError::dangling("link", owner, link.as_str()));
            }
        }
    }
    Ok(())
}

/// Checks every class, route and (when a network is given) link reference.
pub fn validate_demand(demand: &DemandSet, network: Option<&NetworkGraph>) -> Result<()> {
    for route in demand.routes() {
        check_links(network, route.id.as_str(), &route.links.iter().collect::<Vec<_>>())?;
    }
    for vehicle in demand.vehicles() {
        if !demand.has_class(vehicle.class.as_str()) {
            return Err(ScenarioError::dangling(
                "vehicle class",
                &vehicle.id,
                vehicle.class.as_str(),
            ));
        }
        match &vehicle.path {
            VehiclePath::Route(route) if demand.route(route.as_str()).is_none() => {
                return Err(ScenarioError::dangling("route", &vehicle.id, route.as_str()));
            }
            VehiclePath::Route(_) => {}
            VehiclePath::Links(links) => {
                check_links(network, &vehicle.id, &links.iter().collect::<Vec<_>>())?
            }
        }
    }
    for flow in demand.flows() {
        if !demand.has_class(flow.class.as_str()) {
            return Err(ScenarioError::dangling(
                "vehicle class",
                &flow.id,
                flow.class.as_str(),
            ));
        }
        match &flow.path {
            FlowPath::Route(route) if demand.route(route.as_str()).is_none() => {
                return Err(ScenarioError::dangling("route", &flow.id, route.as_str()));
            }
            FlowPath::Route(_) => {}
            FlowPath::Links(links) => {
                check_links(network, &flow.id, &links.iter().collect::<Vec<_>>())?
            }
            FlowPath::OriginDestination { from, to } => check_links(network, &flow.id, &[from, to])?,
        }
    }
    Ok(())
}

/// Demand file (`routes` root).
///
/// Classes come first, then routes, vehicles and flows, each in insertion
/// order. Link references are only checked when `network` is given.
pub fn render_demand(demand: &DemandSet, network: Option<&NetworkGraph>) -> Result<String> {
    validate_demand(demand, network)?;

    let file = RoutesFile {
        v_type: demand.classes().iter().map(class_record).collect(),
        route: demand
            .routes()
            .iter()
            .map(|route| RouteRecord {
                id: Some(route.id.to_string()),
                edges: link_list(&route.links),
            })
            .collect(),
        vehicle: demand
            .vehicles()
            .iter()
            .map(|vehicle| {
                let (route_ref, inline) = match &vehicle.path {
                    VehiclePath::Route(route) => (Some(route.to_string()), None),
                    VehiclePath::Links(links) => (None, inline_route(links)),
                };
                VehicleRecord {
                    id: vehicle.id.clone(),
                    kind: vehicle.class.to_string(),
                    depart: number(vehicle.depart),
                    depart_lane: vehicle.depart_lane.clone(),
                    depart_speed: vehicle.depart_speed.clone(),
                    route_ref,
                    inline_route: inline,
                }
            })
            .collect(),
        flow: demand.flows().iter().map(flow_record).collect(),
    };
    debug!(
        "rendered demand: {} classes, {} routes, {} vehicles, {} flows",
        demand.classes().len(),
        demand.routes().len(),
        demand.vehicles().len(),
        demand.flows().len()
    );
    to_document(&file)
}
