//! Signal timing tests
//!
//! Webster cycle length and split, delay, green-wave offsets and capacity.

use traffic_scenario::scenario::timing::{
    apply_offsets, approach_capacity, approach_phases, average_delay, flow_ratio,
    green_wave_offsets, retime_program, webster, webster_for_approaches,
};
use traffic_scenario::scenario::{
    ApproachSupply, CapacityAnalysis, CycleBounds, DelayEstimate, FourWayParams, LevelOfService,
    ScenarioError,
};

const EPSILON: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_webster_cycle_and_split() {
    let timing = webster(6.0, &[0.3, 0.3], CycleBounds::default()).unwrap();
    assert_close(timing.cycle_length, 35.0);
    assert!(!timing.is_clamped());
    assert_close(timing.effective_green(), 29.0);
    assert_eq!(timing.greens.len(), 2);
    assert_close(timing.greens[0], 14.5);
    assert_close(timing.greens[1], 14.5);
}

#[test]
fn test_webster_split_follows_flow_ratios() {
    let timing = webster(10.0, &[0.1, 0.3], CycleBounds::default()).unwrap();
    // (1.5 × 10 + 5) / 0.6
    assert_close(timing.cycle_length, 20.0 / 0.6);
    assert_close(timing.greens[1], 3.0 * timing.greens[0]);
    assert_close(timing.greens.iter().sum::<f64>(), timing.effective_green());
}

#[test]
fn test_webster_from_raw_flows() {
    let timing =
        webster_for_approaches(3.0, &[(540.0, 1800.0), (540.0, 1800.0)], CycleBounds::default())
            .unwrap();
    assert_close(timing.total_lost_time, 6.0);
    assert_close(timing.cycle_length, 35.0);
    assert!(flow_ratio(100.0, 0.0).is_err());
}

#[test]
fn test_webster_clamps_near_saturation() {
    for total in [0.9, 0.95, 0.99, 0.999_999] {
        let timing = webster(12.0, &[total / 2.0, total / 2.0], CycleBounds::default()).unwrap();
        assert_close(timing.cycle_length, 180.0);
        assert!(timing.is_clamped());
        assert!(timing.unclamped_cycle > 180.0);
    }
}

#[test]
fn test_webster_clamps_short_cycles_up() {
    let timing = webster(2.0, &[0.05, 0.05], CycleBounds::default()).unwrap();
    assert_close(timing.cycle_length, 30.0);
}

#[test]
fn test_webster_oversaturated() {
    for ratios in [vec![0.5, 0.5], vec![0.6, 0.7]] {
        match webster(6.0, &ratios, CycleBounds::default()) {
            Err(ScenarioError::Oversaturated { total_ratio }) => {
                assert!(total_ratio >= 1.0);
            }
            other => panic!("expected oversaturation, got {:?}", other),
        }
    }
}

#[test]
fn test_webster_input_validation() {
    assert!(webster(6.0, &[], CycleBounds::default()).is_err());
    assert!(webster(6.0, &[-0.1, 0.3], CycleBounds::default()).is_err());
    assert!(CycleBounds::new(120.0, 60.0).is_err());

    // 40 s of lost time cannot fit a cycle capped at 35 s
    let bounds = CycleBounds::new(20.0, 35.0).unwrap();
    let err = webster(40.0, &[0.2], bounds).unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "lost_time", .. }));
}

#[test]
fn test_cycle_bounds_validation() {
    let err = CycleBounds::new(120.0, 60.0).unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "min_cycle", .. }));
    assert!(CycleBounds::new(f64::NAN, 60.0).is_err());
    assert!(CycleBounds::new(30.0, f64::NAN).is_err());
    assert!(CycleBounds::new(30.0, f64::INFINITY).is_err());
    assert!(CycleBounds::new(0.0, 60.0).is_err());

    let defaults = CycleBounds::default();
    assert_close(defaults.min(), 30.0);
    assert_close(defaults.max(), 180.0);

    // A single-value band pins the cycle
    let pinned = CycleBounds::new(60.0, 60.0).unwrap();
    let timing = webster(6.0, &[0.3, 0.3], pinned).unwrap();
    assert_close(timing.cycle_length, 60.0);
    assert!(timing.is_clamped());
}

#[test]
fn test_webster_without_demand_splits_evenly() {
    let timing = webster(6.0, &[0.0, 0.0, 0.0], CycleBounds::default()).unwrap();
    assert_close(timing.cycle_length, 30.0);
    for green in &timing.greens {
        assert_close(*green, 8.0);
    }
}

#[test]
fn test_average_delay() {
    let timing = webster(6.0, &[0.3, 0.3], CycleBounds::default()).unwrap();
    let expected = 35.0 * 0.4 * 0.4 / (2.0 * (1.0 - 0.6 * 35.0 / 29.0));
    match timing.average_delay() {
        DelayEstimate::Bounded(delay) => assert!((delay - expected).abs() < 1e-6),
        DelayEstimate::Unbounded => panic!("delay should be finite"),
    }
}

#[test]
fn test_average_delay_unbounded_near_saturation() {
    // Y·C/(C−L) = 0.8 × 60 / 40 > 1
    assert_eq!(average_delay(60.0, 0.8, 20.0), DelayEstimate::Unbounded);
    assert_eq!(average_delay(20.0, 0.5, 20.0), DelayEstimate::Unbounded);
    assert_eq!(DelayEstimate::Unbounded.seconds(), None);
}

#[test]
fn test_approach_phases_from_webster() {
    let timing = webster(6.0, &[0.3, 0.3], CycleBounds::default()).unwrap();
    let phases = approach_phases(&timing, 3).unwrap();
    let states: Vec<String> = phases.iter().map(|p| p.state().to_string()).collect();
    assert_eq!(states, vec!["Gr", "yr", "rG", "ry"]);

    assert_eq!(phases[0].duration(), 15);
    assert_eq!(phases[0].min_duration(), Some(7));
    assert_eq!(phases[0].max_duration(), Some(22));
    assert_eq!(phases[1].duration(), 3);
    assert_eq!(phases[1].min_duration(), Some(3));
    assert_eq!(phases[1].max_duration(), Some(3));
}

#[test]
fn test_retime_program() {
    let network = FourWayParams::default().generate().unwrap();
    let program = network.program_for("C").unwrap();

    let timing = webster(6.0, &[0.3, 0.3], CycleBounds::default()).unwrap();
    let retimed = retime_program(program, &timing).unwrap();
    let durations: Vec<u32> = retimed.phases().iter().map(|p| p.duration()).collect();
    assert_eq!(durations, vec![15, 3, 15, 3]);
    assert_eq!(retimed.junction(), program.junction());
    assert_eq!(retimed.state_width(), program.state_width());

    let three_way = webster(6.0, &[0.2, 0.2, 0.2], CycleBounds::default()).unwrap();
    let err = retime_program(program, &three_way).unwrap_err();
    assert!(matches!(err, ScenarioError::Validation { field: "greens", .. }));
}

#[test]
fn test_green_wave_offsets() {
    let offsets = green_wave_offsets(60.0, 10.0, &[300.0, 300.0]).unwrap();
    assert_eq!(offsets, vec![0.0, 30.0, 0.0]);

    let offsets = green_wave_offsets(90.0, 12.5, &[250.0, 500.0, 125.0]).unwrap();
    assert_eq!(offsets, vec![0.0, 20.0, 60.0, 70.0]);

    assert_eq!(green_wave_offsets(90.0, 10.0, &[]).unwrap(), vec![0.0]);
    assert!(green_wave_offsets(0.0, 10.0, &[300.0]).is_err());
    assert!(green_wave_offsets(60.0, 0.0, &[300.0]).is_err());
}

#[test]
fn test_apply_offsets() {
    let network = FourWayParams::default().generate().unwrap();
    let mut programs = network.programs().to_vec();
    apply_offsets(&mut programs, &[12.6]).unwrap();
    assert_eq!(programs[0].offset(), 13);

    // 30 + 3 + 30 + 3 s cycle; an offset that rounds up to the cycle wraps to 0
    assert_eq!(programs[0].cycle_length(), 66);
    apply_offsets(&mut programs, &[65.6]).unwrap();
    assert_eq!(programs[0].offset(), 0);
    apply_offsets(&mut programs, &[-3.0]).unwrap();
    assert_eq!(programs[0].offset(), 63);
    assert!(apply_offsets(&mut programs, &[0.0, 30.0]).is_err());
}

#[test]
fn test_approach_capacity() {
    assert_close(approach_capacity(2, 1800.0, 40.0, 90.0).unwrap(), 1600.0);
    assert!(approach_capacity(0, 1800.0, 40.0, 90.0).is_err());
    assert!(approach_capacity(2, 1800.0, 100.0, 90.0).is_err());
}

#[test]
fn test_capacity_analysis_and_los() {
    let supply = ApproachSupply {
        lanes: 2,
        green: 40.0,
    };
    let analysis = CapacityAnalysis::new(90.0, 1800.0, &[supply, supply]).unwrap();
    assert_close(analysis.total, 3200.0);

    assert_eq!(analysis.los(1000.0), LevelOfService::A);
    assert_eq!(analysis.los(2000.0), LevelOfService::B);
    assert_eq!(analysis.los(2400.0), LevelOfService::C);
    assert_eq!(analysis.los(2700.0), LevelOfService::D);
    assert_eq!(analysis.los(3200.0), LevelOfService::E);
    assert_eq!(analysis.los(3500.0), LevelOfService::F);

    let thresholds = analysis.los_thresholds();
    let expected = [1920.0, 2240.0, 2560.0, 2880.0, 3200.0];
    assert_eq!(thresholds.len(), expected.len());
    for ((los, bound), expected) in thresholds.iter().zip(expected) {
        assert!((bound - expected).abs() < 1e-6, "LOS {los} bound {bound}");
    }
}

#[test]
fn test_los_band_edges() {
    assert_eq!(LevelOfService::from_ratio(0.599), LevelOfService::A);
    assert_eq!(LevelOfService::from_ratio(0.6), LevelOfService::B);
    assert_eq!(LevelOfService::from_ratio(0.9), LevelOfService::E);
    assert_eq!(LevelOfService::from_ratio(1.0), LevelOfService::E);
    assert_eq!(LevelOfService::from_ratio(1.01), LevelOfService::F);
    assert_eq!(LevelOfService::F.to_string(), "F");
}
