//! Network template tests
//!
//! Checks ids, geometry and signal programs of every template family, and
//! that no template emits a link to a missing junction.

use traffic_scenario::scenario::{
    create_network, list_templates, Approach, ArmOverride, ControllerKind, CorridorParams,
    FourWayParams, GridParams, HighwayParams, JunctionKind, NetworkGraph, Position,
    RoundaboutParams, ScenarioError, TJunctionParams, TemplateKey, TemplateParams,
};

fn position(network: &NetworkGraph, id: &str) -> Position {
    network
        .junction(id)
        .unwrap_or_else(|| panic!("missing junction {id}"))
        .position()
}

fn assert_no_dangling(network: &NetworkGraph) {
    network
        .validate_references()
        .expect("generated network has dangling references");
}

/// Every phase is `2 × lanes × approaches` wide
fn assert_state_width(network: &NetworkGraph, expected: usize) {
    assert!(!network.programs().is_empty());
    for program in network.programs() {
        for phase in program.phases() {
            assert_eq!(
                phase.state().len(),
                expected,
                "phase of program {} has the wrong width",
                program.junction()
            );
        }
    }
}

#[test]
fn test_four_way_defaults() {
    let network = FourWayParams::default().generate().unwrap();
    assert_eq!(network.junction_count(), 5);
    assert_eq!(network.link_count(), 8);
    assert_no_dangling(&network);

    assert_eq!(position(&network, "N"), Position::new(0.0, 200.0));
    assert_eq!(position(&network, "W"), Position::new(-200.0, 0.0));
    let centre = network.junction("C").unwrap();
    assert_eq!(centre.kind(), JunctionKind::TrafficLight);
    assert_eq!(centre.controller(), Some(ControllerKind::Static));

    let link = network.link("N2C").unwrap();
    assert_eq!(link.from().as_str(), "N");
    assert_eq!(link.to().as_str(), "C");
    assert_eq!(link.lanes(), 2);
    assert!((link.speed() - 50.0 / 3.6).abs() < 1e-9);

    let program = network.program_for("C").unwrap();
    let states: Vec<String> = program.phases().iter().map(|p| p.state().to_string()).collect();
    assert_eq!(
        states,
        vec![
            "GGGGrrrrGGGGrrrr",
            "yyyyrrrryyyyrrrr",
            "rrrrGGGGrrrrGGGG",
            "rrrryyyyrrrryyyy"
        ]
    );
    assert_eq!(program.cycle_length(), 66);
}

#[test]
fn test_four_way_state_width_scales_with_lanes() {
    for lanes in 1..=4 {
        let network = FourWayParams {
            lanes_per_arm: lanes,
            ..FourWayParams::default()
        }
        .generate()
        .unwrap();
        assert_state_width(&network, 2 * lanes as usize * 4);
    }
}

#[test]
fn test_four_way_unsignalized_has_no_program() {
    let network = FourWayParams {
        signal: None,
        ..FourWayParams::default()
    }
    .generate()
    .unwrap();
    assert_eq!(network.junction("C").unwrap().kind(), JunctionKind::Priority);
    assert!(network.programs().is_empty());
}

#[test]
fn test_four_way_arm_override() {
    let network = FourWayParams {
        overrides: vec![ArmOverride {
            approach: Approach::East,
            lanes: Some(3),
            speed_limit_kmh: Some(70.0),
        }],
        ..FourWayParams::default()
    }
    .generate()
    .unwrap();
    assert_eq!(network.link("E2C").unwrap().lanes(), 3);
    assert_eq!(network.link("C2E").unwrap().lanes(), 3);
    assert_eq!(network.link("N2C").unwrap().lanes(), 2);

    // N=4, E=6, S=4, W=4 positions
    let program = network.program_for("C").unwrap();
    assert_eq!(program.state_width(), Some(18));
    assert_eq!(program.phases()[2].state().to_string(), "rrrrGGGGGGrrrrGGGG");
}

#[test]
fn test_t_junction() {
    let network = TJunctionParams::default().generate().unwrap();
    assert_eq!(network.junction_count(), 4);
    assert_eq!(network.link_count(), 6);
    assert!(network.junction("S").is_none());
    assert_no_dangling(&network);
    assert_state_width(&network, 12);

    let program = network.program_for("C").unwrap();
    assert_eq!(program.phases().len(), 4);
    assert_eq!(program.phases()[0].state().to_string(), "GGGGrrrrrrrr");
    assert_eq!(program.phases()[2].state().to_string(), "rrrrGGGGGGGG");
}

#[test]
fn test_roundabout_geometry() {
    let network = RoundaboutParams::default().generate().unwrap();
    assert_eq!(network.junction_count(), 8);
    assert_eq!(network.link_count(), 12);
    assert!(network.programs().is_empty());
    assert_no_dangling(&network);

    assert_eq!(position(&network, "R0"), Position::new(0.0, -30.0));
    assert_eq!(position(&network, "R1"), Position::new(30.0, 0.0));
    assert_eq!(position(&network, "A0"), Position::new(0.0, -230.0));

    let ring = network.link("R32R0").unwrap();
    assert_eq!(ring.lanes(), 2);
    assert_eq!(network.link("A2R2").unwrap().lanes(), 1);
    assert!(network.is_strongly_connected().unwrap());
}

#[test]
fn test_roundabout_needs_three_arms() {
    let err = RoundaboutParams {
        arm_count: 2,
        ..RoundaboutParams::default()
    }
    .generate()
    .unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "arm_count", .. }));

    for arm_count in 3..=8 {
        let network = RoundaboutParams {
            arm_count,
            ..RoundaboutParams::default()
        }
        .generate()
        .unwrap();
        assert_eq!(network.link_count(), 3 * arm_count as usize);
        assert_no_dangling(&network);
    }
}

#[test]
fn test_grid_signalizes_interior_only() {
    let network = GridParams {
        rows: 4,
        cols: 5,
        ..GridParams::default()
    }
    .generate()
    .unwrap();
    assert_eq!(network.junction_count(), 20);
    assert_eq!(network.link_count(), 62);
    assert_eq!(network.programs().len(), 6);
    assert_no_dangling(&network);
    assert_state_width(&network, 16);

    assert_eq!(network.junction("n0_2").unwrap().kind(), JunctionKind::Priority);
    assert_eq!(network.junction("n1_1").unwrap().kind(), JunctionKind::TrafficLight);
    assert!(network.program_for("n3_4").is_none());
    assert_eq!(position(&network, "n2_3"), Position::new(600.0, 400.0));

    let eastbound = network.link("e1_2_EB").unwrap();
    assert_eq!(eastbound.from().as_str(), "n1_2");
    assert_eq!(eastbound.to().as_str(), "n1_3");
    let southbound = network.link("e1_2_SB").unwrap();
    assert_eq!(southbound.from().as_str(), "n2_2");
    assert_eq!(southbound.to().as_str(), "n1_2");
}

#[test]
fn test_two_by_two_grid_has_no_signals() {
    let network = GridParams {
        rows: 2,
        cols: 2,
        ..GridParams::default()
    }
    .generate()
    .unwrap();
    assert_eq!(network.link_count(), 8);
    assert!(network.programs().is_empty());
}

#[test]
fn test_corridor_defaults() {
    let network = CorridorParams::default().generate().unwrap();
    assert_eq!(network.junction_count(), 17);
    assert_eq!(network.link_count(), 32);
    assert_eq!(network.programs().len(), 5);
    assert_no_dangling(&network);
    // 2 × (3 main lanes × 2 + 2 cross lanes × 2)
    assert_state_width(&network, 20);

    assert!(network.program_for("M0").is_none());
    assert!(network.program_for("M6").is_none());
    assert_eq!(position(&network, "N2"), Position::new(600.0, 150.0));
    assert_eq!(position(&network, "S2"), Position::new(600.0, -150.0));

    let program = network.program_for("M3").unwrap();
    assert_eq!(program.phases()[0].state().to_string(), "rrrrGGGGGGrrrrGGGGGG");
    let greens: Vec<u32> = program
        .phases()
        .iter()
        .filter(|p| p.is_green())
        .map(|p| p.duration())
        .collect();
    assert_eq!(greens, vec![40, 25]);
    assert!(network.programs().iter().all(|p| p.offset() == 0));

    let cross = network.link("cross_2_NB2").unwrap();
    assert_eq!(cross.from().as_str(), "M2");
    assert_eq!(cross.to().as_str(), "N2");
    assert_eq!(cross.lanes(), 2);
}

#[test]
fn test_corridor_green_wave() {
    let network = CorridorParams {
        progression_speed_kmh: Some(36.0),
        ..CorridorParams::default()
    }
    .generate()
    .unwrap();
    // 300 m at 10 m/s over a 71 s cycle
    let offsets: Vec<i32> = network.programs().iter().map(|p| p.offset()).collect();
    assert_eq!(offsets, vec![0, 30, 60, 19, 49]);
}

#[test]
fn test_corridor_main_green_dominates() {
    let err = CorridorParams {
        main_green: 20,
        cross_green: 30,
        ..CorridorParams::default()
    }
    .generate()
    .unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "main_green", .. }));
}

#[test]
fn test_highway_ramps() {
    let network = HighwayParams::default().generate().unwrap();
    assert_eq!(network.junction_count(), 8);
    assert_eq!(network.link_count(), 7);
    assert_no_dangling(&network);

    let main = network.link("hw_junc_1_junc_2").unwrap();
    let ramp = network.link("on_ramp_1").unwrap();
    assert!(main.priority() > ramp.priority());
    assert_eq!(main.lanes(), 3);
    assert_eq!(ramp.lanes(), 1);
    assert!(network.link("hw_start_junc_1").is_some());
    assert!(network.link("hw_junc_2_end").is_some());

    let merge = position(&network, "junc_1");
    let on_ramp = position(&network, "on_ramp_1");
    assert!((merge.x - 2000.0 / 3.0).abs() < 1e-9);
    assert!((on_ramp.x - (merge.x - 100.0)).abs() < 1e-9);
    assert_eq!(on_ramp.y, -100.0);
}

#[test]
fn test_highway_without_ramps() {
    let network = HighwayParams {
        ramps: 0,
        ..HighwayParams::default()
    }
    .generate()
    .unwrap();
    assert_eq!(network.junction_count(), 2);
    assert_eq!(network.link_count(), 1);
    assert!(network.link("hw_start_end").is_some());
}

#[test]
fn test_highway_ramps_must_be_minor_roads() {
    let err = HighwayParams {
        ramp_speed_kmh: 100.0,
        ..HighwayParams::default()
    }
    .generate()
    .unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "ramp_speed_kmh", .. }));

    let err = HighwayParams {
        lanes: 2,
        ramp_lanes: 3,
        ..HighwayParams::default()
    }
    .generate()
    .unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "ramp_lanes", .. }));

    let err = HighwayParams {
        main_priority: 1,
        ..HighwayParams::default()
    }
    .generate()
    .unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "priority", .. }));

    let same_width = HighwayParams {
        lanes: 1,
        ..HighwayParams::default()
    };
    assert!(same_width.generate().is_ok());
}

#[test]
fn test_registry() {
    let templates = list_templates();
    let keys: Vec<String> = templates.iter().map(|t| t.key.to_string()).collect();
    assert_eq!(
        keys,
        vec!["4way", "3way", "roundabout", "grid", "corridor", "highway"]
    );
    assert_eq!(templates[3].name, "3x3 Grid Network");

    let err = TemplateParams::defaults("cloverleaf").unwrap_err();
    assert_eq!(err, ScenarioError::UnknownTemplate("cloverleaf".to_string()));
    assert_eq!("grid".parse::<TemplateKey>().unwrap(), TemplateKey::Grid);
}

#[test]
fn test_every_template_generates_a_consistent_network() {
    for key in TemplateKey::ALL {
        let network = create_network(key.as_str()).unwrap();
        assert_no_dangling(&network);
        assert!(
            network.component_count().unwrap() == 1,
            "{key} network is not connected"
        );
    }
}

#[test]
fn test_templates_are_deterministic() {
    for key in TemplateKey::ALL {
        let first = create_network(key.as_str()).unwrap();
        let second = create_network(key.as_str()).unwrap();
        assert_eq!(first.junctions(), second.junctions());
        assert_eq!(first.links(), second.links());
        assert_eq!(first.programs(), second.programs());
    }
}
