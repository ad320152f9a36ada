//! Entity validation tests
//!
//! Junctions, links, demand and the network graph reject malformed input at
//! construction and insertion time.

use traffic_scenario::scenario::{
    Connection, ControllerKind, DemandRate, DemandSet, Flow, FlowPath, FourWayParams, GridParams,
    HighwayParams, Junction, JunctionKind, Link, NetworkGraph, Position, Route, ScenarioError,
    Vehicle, VehicleCategory, VehicleClass, VehiclePath, DEFAULT_VEHICLE_CLASS,
};

fn two_junctions() -> NetworkGraph {
    let mut network = NetworkGraph::new();
    network
        .add_junction(Junction::priority("a", Position::new(0.0, 0.0)).unwrap())
        .unwrap();
    network
        .add_junction(Junction::priority("b", Position::new(100.0, 0.0)).unwrap())
        .unwrap();
    network
}

#[test]
fn test_junction_rejects_empty_id() {
    let err = Junction::new("", 0.0, 0.0, JunctionKind::Priority).unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "id", .. }));
}

#[test]
fn test_junction_rejects_non_finite_coordinates() {
    let err = Junction::new("a", f64::NAN, 0.0, JunctionKind::Priority).unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "x", .. }));
}

#[test]
fn test_controller_only_on_signalized_junction() {
    let err = Junction::priority("a", Position::default())
        .unwrap()
        .with_controller(ControllerKind::Actuated)
        .unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "tlType", .. }));

    let junction =
        Junction::signalized("b", Position::default(), Some(ControllerKind::Actuated)).unwrap();
    assert!(junction.is_signalized());
    assert_eq!(junction.controller(), Some(ControllerKind::Actuated));
}

#[test]
fn test_junction_kind_parses_from_file_names() {
    assert_eq!(
        "right_before_left".parse::<JunctionKind>().unwrap(),
        JunctionKind::RightBeforeLeft
    );
    assert_eq!(JunctionKind::TrafficLight.to_string(), "traffic_light");
    assert!("roundabout".parse::<JunctionKind>().is_err());
}

#[test]
fn test_link_validation() {
    let self_loop = Link::new("l", "a", "a", 1, 10.0).unwrap_err();
    assert!(matches!(self_loop, ScenarioError::Validation { field: "to", .. }));

    let no_lanes = Link::new("l", "a", "b", 0, 10.0).unwrap_err();
    assert!(matches!(no_lanes, ScenarioError::Validation { field: "numLanes", .. }));

    let no_speed = Link::new("l", "a", "b", 1, 0.0).unwrap_err();
    assert!(matches!(no_speed, ScenarioError::Validation { field: "speed", .. }));

    let link = Link::new("l", "a", "b", 2, 13.9)
        .unwrap()
        .with_priority(3)
        .allowing([VehicleCategory::Bus, VehicleCategory::Taxi]);
    assert_eq!(link.priority(), 3);
    assert_eq!(link.allowed(), &[VehicleCategory::Bus, VehicleCategory::Taxi]);
}

#[test]
fn test_network_rejects_duplicate_ids() {
    let mut network = two_junctions();
    let err = network
        .add_junction(Junction::priority("a", Position::new(5.0, 5.0)).unwrap())
        .unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "id", .. }));

    network
        .add_link(Link::new("ab", "a", "b", 1, 10.0).unwrap())
        .unwrap();
    let err = network
        .add_link(Link::new("ab", "b", "a", 1, 10.0).unwrap())
        .unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "id", .. }));
    assert_eq!(network.link_count(), 1);
}

#[test]
fn test_validate_references_finds_missing_endpoint() {
    let mut network = two_junctions();
    network
        .add_link(Link::new("ac", "a", "c", 1, 10.0).unwrap())
        .unwrap();
    match network.validate_references() {
        Err(ScenarioError::DanglingReference { kind, owner, missing }) => {
            assert_eq!(kind, "junction");
            assert_eq!(owner, "ac");
            assert_eq!(missing, "c");
        }
        other => panic!("expected a dangling junction, got {:?}", other),
    }
}

#[test]
fn test_validate_references_checks_connection_lanes() {
    let mut network = two_junctions();
    network
        .add_link(Link::new("ab", "a", "b", 2, 10.0).unwrap())
        .unwrap();
    network
        .add_link(Link::new("ba", "b", "a", 1, 10.0).unwrap())
        .unwrap();
    network.add_connection(Connection::new("ab", 1, "ba", 1).unwrap());
    match network.validate_references() {
        Err(ScenarioError::DanglingReference { kind, missing, .. }) => {
            assert_eq!(kind, "lane");
            assert_eq!(missing, "ba_1");
        }
        other => panic!("expected a dangling lane, got {:?}", other),
    }
}

#[test]
fn test_link_length_uses_junction_positions() {
    let mut network = two_junctions();
    network
        .add_link(Link::new("ab", "a", "b", 1, 10.0).unwrap())
        .unwrap();
    let link = network.link("ab").unwrap();
    assert_eq!(network.link_length(link), Some(100.0));
}

#[test]
fn test_shortest_path_through_grid() {
    let network = GridParams::default().generate().unwrap();
    let path = network
        .shortest_path("e0_0_EB", "e2_1_EB")
        .unwrap()
        .expect("grid should be connected");
    let ids: Vec<&str> = path.iter().map(|l| l.as_str()).collect();
    assert_eq!(ids, vec!["e0_0_EB", "e0_1_NB", "e1_1_NB", "e2_1_EB"]);
}

#[test]
fn test_shortest_path_with_adjacent_links() {
    let network = FourWayParams::default().generate().unwrap();
    let path = network.shortest_path("N2C", "C2S").unwrap().unwrap();
    let ids: Vec<&str> = path.iter().map(|l| l.as_str()).collect();
    assert_eq!(ids, vec!["N2C", "C2S"]);
}

#[test]
fn test_route_between_unreachable_links_fails() {
    let network = HighwayParams::default().generate().unwrap();
    assert_eq!(network.shortest_path("off_ramp_1", "on_ramp_1").unwrap(), None);
    let err = Route::between(&network, "r", "off_ramp_1", "on_ramp_1").unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "edges", .. }));
}

#[test]
fn test_topology_matches_network() {
    let network = GridParams::default().generate().unwrap();
    let topology = network.topology().unwrap();
    assert_eq!(topology.graph.node_count(), 9);
    assert_eq!(topology.graph.edge_count(), 24);
    assert!(network.is_strongly_connected().unwrap());
    assert_eq!(network.component_count().unwrap(), 1);
}

#[test]
fn test_vehicle_class_defaults_and_bounds() {
    let class = VehicleClass::new("car", VehicleCategory::Passenger).unwrap();
    assert_eq!(class.length(), 5.0);
    assert_eq!(class.min_gap(), 2.5);
    assert_eq!(class.max_speed(), 55.56);
    assert_eq!(class.emission_class(), Some("HBEFA3/PC_G_EU4"));

    let err = class.clone().with_driver(1.5, 1.0).unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "sigma", .. }));
    let err = class.with_dimensions(0.0, 2.5).unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "length", .. }));
}

#[test]
fn test_demand_rate_precedence() {
    assert_eq!(
        DemandRate::first_set(Some(600.0), Some(0.1), Some(5.0), Some(10)).unwrap(),
        DemandRate::VehiclesPerHour(600.0)
    );
    assert_eq!(
        DemandRate::first_set(None, Some(0.1), Some(5.0), None).unwrap(),
        DemandRate::Probability(0.1)
    );
    assert_eq!(
        DemandRate::first_set(Some(0.0), None, Some(5.0), Some(10)).unwrap(),
        DemandRate::Period(5.0)
    );
    assert_eq!(
        DemandRate::first_set(None, None, None, Some(10)).unwrap(),
        DemandRate::Number(10)
    );
    assert!(DemandRate::first_set(None, None, None, None).is_err());
    assert!(DemandRate::first_set(None, Some(1.5), None, None).is_err());
}

#[test]
fn test_flow_requires_non_empty_window() {
    let err = Flow::new(
        "f",
        "car",
        FlowPath::Route("r".into()),
        100.0,
        100.0,
        DemandRate::VehiclesPerHour(300.0),
    )
    .unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "end", .. }));
}

#[test]
fn test_demand_set_ids() {
    let mut demand = DemandSet::new();
    assert!(demand.has_class(DEFAULT_VEHICLE_CLASS));

    demand
        .add_class(VehicleClass::new(DEFAULT_VEHICLE_CLASS, VehicleCategory::Passenger).unwrap())
        .unwrap();
    assert!(demand
        .add_class(VehicleClass::new(DEFAULT_VEHICLE_CLASS, VehicleCategory::Truck).unwrap())
        .is_err());

    demand
        .add_vehicle(
            Vehicle::new(
                "v0",
                DEFAULT_VEHICLE_CLASS,
                0.0,
                VehiclePath::Links(vec!["N2C".into()]),
            )
            .unwrap(),
        )
        .unwrap();
    let clash = Flow::new(
        "v0",
        DEFAULT_VEHICLE_CLASS,
        FlowPath::OriginDestination {
            from: "N2C".into(),
            to: "C2S".into(),
        },
        0.0,
        3600.0,
        DemandRate::Number(20),
    )
    .unwrap();
    assert!(demand.add_flow(clash).is_err(), "vehicles and flows share ids");
}

#[test]
fn test_total_vehicles_per_hour() {
    let mut demand = DemandSet::new();
    let rates = [
        DemandRate::VehiclesPerHour(400.0),
        DemandRate::Period(10.0),
        DemandRate::VehiclesPerHour(200.0),
    ];
    for (i, rate) in rates.into_iter().enumerate() {
        demand
            .add_flow(
                Flow::new(
                    format!("f{i}"),
                    DEFAULT_VEHICLE_CLASS,
                    FlowPath::Route("r".into()),
                    0.0,
                    3600.0,
                    rate,
                )
                .unwrap(),
            )
            .unwrap();
    }
    assert_eq!(demand.total_vehicles_per_hour(), 600.0);
}
