//! Signal program tests
//!
//! State strings keep one width per program and follow the north, east,
//! south, west approach order.

use traffic_scenario::scenario::{
    Approach, ApproachLayout, ControllerKind, Phase, ScenarioError, SignalProgram, SignalState,
    StateString,
};

#[test]
fn test_state_string_parses_signal_characters() {
    let state: StateString = "GgyrsuOo".parse().unwrap();
    assert_eq!(state.len(), 8);
    assert_eq!(state.states()[0], SignalState::Green);
    assert_eq!(state.states()[1], SignalState::GreenMinor);
    assert_eq!(state.to_string(), "GgyrsuOo");
    assert!(state.has_green());

    let err = "GGx".parse::<StateString>().unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "state", .. }));
}

#[test]
fn test_phase_duration_must_be_positive() {
    let err = Phase::new(0, "GGrr").unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "duration", .. }));
}

#[test]
fn test_phase_bounds() {
    let phase = Phase::new(30, "GGrr")
        .unwrap()
        .with_bounds(Some(15), Some(45))
        .unwrap();
    assert_eq!(phase.min_duration(), Some(15));
    assert_eq!(phase.max_duration(), Some(45));

    let err = Phase::new(30, "GGrr")
        .unwrap()
        .with_bounds(Some(50), Some(45))
        .unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "minDur", .. }));
}

#[test]
fn test_program_rejects_phase_of_other_width() {
    let mut program = SignalProgram::new("C", ControllerKind::Static, 0).unwrap();
    program.append_phase(Phase::new(30, "GGrr").unwrap()).unwrap();
    program.append_phase(Phase::new(3, "yyrr").unwrap()).unwrap();

    match program.append_phase(Phase::new(30, "rrGGG").unwrap()) {
        Err(ScenarioError::PhaseLengthMismatch {
            program,
            expected,
            found,
        }) => {
            assert_eq!(program, "C");
            assert_eq!(expected, 4);
            assert_eq!(found, 5);
        }
        other => panic!("expected a phase length mismatch, got {:?}", other),
    }
    assert_eq!(program.phases().len(), 2);
    assert_eq!(program.cycle_length(), 33);
    assert_eq!(program.state_width(), Some(4));
}

#[test]
fn test_program_id_defaults_to_zero() {
    let program = SignalProgram::new("C", ControllerKind::Actuated, 5).unwrap();
    assert_eq!(program.program_id(), "0");
    assert_eq!(program.offset(), 5);
    assert!(program.with_program_id("").is_err());
}

#[test]
fn test_layout_orders_approaches() {
    // Insert out of order; states still come out north, east, south, west
    let layout = ApproachLayout::new()
        .with_arm(Approach::West, 1)
        .with_arm(Approach::North, 2)
        .with_arm(Approach::South, 1);
    assert_eq!(layout.width(), 8);
    assert_eq!(
        layout.approaches().collect::<Vec<_>>(),
        vec![Approach::North, Approach::South, Approach::West]
    );

    let state = layout.state(&[Approach::North], SignalState::Green);
    assert_eq!(state.to_string(), "GGGGrrrr");
    let state = layout.state(&[Approach::South, Approach::West], SignalState::Yellow);
    assert_eq!(state.to_string(), "rrrryyyy");
}

#[test]
fn test_staged_program_alternates_green_and_yellow() {
    let layout = ApproachLayout::uniform(&Approach::ALL, 1);
    let north_south: &[Approach] = &[Approach::North, Approach::South];
    let east_west: &[Approach] = &[Approach::East, Approach::West];
    let program = layout
        .staged_program("C", ControllerKind::Static, &[(north_south, 25), (east_west, 20)], 4)
        .unwrap();

    let states: Vec<String> = program.phases().iter().map(|p| p.state().to_string()).collect();
    assert_eq!(states, vec!["GGrrGGrr", "yyrryyrr", "rrGGrrGG", "rryyrryy"]);
    let durations: Vec<u32> = program.phases().iter().map(|p| p.duration()).collect();
    assert_eq!(durations, vec![25, 4, 20, 4]);
    assert_eq!(program.phases()[0].name(), Some("NS_Green"));
    assert_eq!(program.phases()[3].name(), Some("EW_Yellow"));
}
