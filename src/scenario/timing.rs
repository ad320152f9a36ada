//! Closed-form signal timing
//!
//! Webster's optimal cycle length and green split, green-wave offsets for a
//! coordinated corridor, and capacity / level-of-service banding. All
//! calculators work on plain numbers; [`approach_phases`] and
//! [`retime_program`] bridge the results back into signal programs.

use std::fmt;

use log::{debug, warn};

use super::error::{require_non_negative, require_positive, Result, ScenarioError};
use super::signal::{Phase, SignalProgram, SignalState, StateString};

/// Denominators below this are treated as zero by the delay estimate
const DELAY_EPSILON: f64 = 1e-9;

/// Operational band the Webster cycle length is clamped into, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleBounds {
    min: f64,
    max: f64,
}

impl Default for CycleBounds {
    fn default() -> Self {
        Self {
            min: 30.0,
            max: 180.0,
        }
    }
}

impl CycleBounds {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        require_positive("min_cycle", min)?;
        require_positive("max_cycle", max)?;
        if min > max {
            return Err(ScenarioError::invalid(
                "min_cycle",
                format!("minimum cycle {min}s exceeds maximum cycle {max}s"),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    fn clamp(&self, cycle: f64) -> f64 {
        cycle.clamp(self.min, self.max)
    }
}

/// Uniform-delay estimate of a Webster timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DelayEstimate {
    /// Average delay per vehicle in seconds
    Bounded(f64),
    /// The intersection is too close to saturation for a finite estimate
    Unbounded,
}

impl DelayEstimate {
    pub fn seconds(&self) -> Option<f64> {
        match self {
            DelayEstimate::Bounded(delay) => Some(*delay),
            DelayEstimate::Unbounded => None,
        }
    }
}

impl fmt::Display for DelayEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayEstimate::Bounded(delay) => write!(f, "{delay:.1} s"),
            DelayEstimate::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Result of Webster's method for one intersection
#[derive(Debug, Clone, PartialEq)]
pub struct WebsterTiming {
    /// Cycle length after clamping, in seconds
    pub cycle_length: f64,
    /// `(1.5·L + 5) / (1 − Y)` before clamping
    pub unclamped_cycle: f64,
    pub total_lost_time: f64,
    pub flow_ratios: Vec<f64>,
    /// Green time per approach, in the order of `flow_ratios`
    pub greens: Vec<f64>,
}

impl WebsterTiming {
    /// `Y`, the sum of the critical flow ratios
    pub fn total_ratio(&self) -> f64 {
        self.flow_ratios.iter().sum()
    }

    /// Cycle length minus total lost time
    pub fn effective_green(&self) -> f64 {
        self.cycle_length - self.total_lost_time
    }

    pub fn is_clamped(&self) -> bool {
        self.cycle_length != self.unclamped_cycle
    }

    pub fn average_delay(&self) -> DelayEstimate {
        average_delay(self.cycle_length, self.total_ratio(), self.total_lost_time)
    }
}

/// Flow ratio `y = demand / saturation` of one approach.
pub fn flow_ratio(demand: f64, saturation: f64) -> Result<f64> {
    require_non_negative("demand", demand)?;
    require_positive("saturation", saturation)?;
    Ok(demand / saturation)
}

/// Webster's optimal cycle length and proportional green split.
///
/// `total_lost_time` is the lost time of the whole cycle. Fails with
/// [`ScenarioError::Oversaturated`] when the ratios sum to 1 or more.
pub fn webster(
    total_lost_time: f64,
    flow_ratios: &[f64],
    bounds: CycleBounds,
) -> Result<WebsterTiming> {
    require_non_negative("lost_time", total_lost_time)?;
    if flow_ratios.is_empty() {
        return Err(ScenarioError::invalid(
            "flow_ratios",
            "at least one approach is required",
        ));
    }
    for ratio in flow_ratios {
        require_non_negative("flow_ratios", *ratio)?;
    }

    let total_ratio: f64 = flow_ratios.iter().sum();
    if total_ratio >= 1.0 {
        return Err(ScenarioError::Oversaturated { total_ratio });
    }

    let unclamped_cycle = (1.5 * total_lost_time + 5.0) / (1.0 - total_ratio);
    let cycle_length = bounds.clamp(unclamped_cycle);
    if cycle_length != unclamped_cycle {
        warn!(
            "Webster cycle {unclamped_cycle:.1}s clamped to {cycle_length:.1}s (Y = {total_ratio:.3})"
        );
    }

    let effective_green = cycle_length - total_lost_time;
    if effective_green <= 0.0 {
        return Err(ScenarioError::invalid(
            "lost_time",
            format!(
                "total lost time {total_lost_time}s leaves no green in a {cycle_length}s cycle"
            ),
        ));
    }

    let greens = if total_ratio == 0.0 {
        vec![effective_green / flow_ratios.len() as f64; flow_ratios.len()]
    } else {
        flow_ratios
            .iter()
            .map(|ratio| ratio / total_ratio * effective_green)
            .collect()
    };
    debug!("Webster: Y = {total_ratio:.3}, C = {cycle_length:.1}s, greens = {greens:?}");

    Ok(WebsterTiming {
        cycle_length,
        unclamped_cycle,
        total_lost_time,
        flow_ratios: flow_ratios.to_vec(),
        greens,
    })
}

/// Webster from raw `(demand, saturation)` pairs, with the lost time given
/// per phase and one phase per approach.
pub fn webster_for_approaches(
    lost_time_per_phase: f64,
    approaches: &[(f64, f64)],
    bounds: CycleBounds,
) -> Result<WebsterTiming> {
    let ratios = approaches
        .iter()
        .map(|(demand, saturation)| flow_ratio(*demand, *saturation))
        .collect::<Result<Vec<_>>>()?;
    webster(
        lost_time_per_phase * approaches.len() as f64,
        &ratios,
        bounds,
    )
}

/// Uniform-delay term `C(1−Y)² / (2(1 − Y·C/(C−L)))`.
///
/// Returns [`DelayEstimate::Unbounded`] instead of dividing by a vanishing or
/// negative denominator.
pub fn average_delay(cycle_length: f64, total_ratio: f64, total_lost_time: f64) -> DelayEstimate {
    let effective_green = cycle_length - total_lost_time;
    if effective_green <= 0.0 {
        warn!("no effective green in a {cycle_length:.1}s cycle; delay is unbounded");
        return DelayEstimate::Unbounded;
    }
    let denominator = 2.0 * (1.0 - total_ratio * cycle_length / effective_green);
    if denominator <= DELAY_EPSILON {
        warn!("Y = {total_ratio:.3} saturates a {cycle_length:.1}s cycle; delay is unbounded");
        return DelayEstimate::Unbounded;
    }
    DelayEstimate::Bounded(cycle_length * (1.0 - total_ratio).powi(2) / denominator)
}

fn whole_seconds(seconds: f64) -> u32 {
    (seconds.round() as u32).max(1)
}

/// Turns a Webster result into a green/yellow phase pair per approach.
///
/// Each state has one position per approach. Green phases carry actuated
/// bounds of half and one and a half times their green; yellow phases are
/// pinned to `yellow`.
pub fn approach_phases(timing: &WebsterTiming, yellow: u32) -> Result<Vec<Phase>> {
    let width = timing.greens.len();
    let state_for = |active: usize, color: SignalState| -> StateString {
        (0..width)
            .map(|i| if i == active { color } else { SignalState::Red })
            .collect::<Vec<_>>()
            .into()
    };

    let mut phases = Vec::with_capacity(width * 2);
    for (i, green) in timing.greens.iter().enumerate() {
        let min = whole_seconds(green * 0.5);
        let max = whole_seconds(green * 1.5).max(min);
        phases.push(
            Phase::from_states(whole_seconds(*green), state_for(i, SignalState::Green))?
                .with_bounds(Some(min), Some(max))?
                .named(format!("Approach{}_Green", i + 1)),
        );
        phases.push(
            Phase::from_states(yellow, state_for(i, SignalState::Yellow))?
                .with_bounds(Some(yellow), Some(yellow))?
                .named(format!("Approach{}_Yellow", i + 1)),
        );
    }
    Ok(phases)
}

/// Copies `program` with its green phases resized to the Webster greens.
///
/// The program must have exactly one green phase per Webster approach.
/// Phases that carried actuated bounds get them rescaled to the new green.
pub fn retime_program(program: &SignalProgram, timing: &WebsterTiming) -> Result<SignalProgram> {
    let green_count = program.phases().iter().filter(|p| p.is_green()).count();
    if green_count != timing.greens.len() {
        return Err(ScenarioError::invalid(
            "greens",
            format!(
                "program [{}] has {green_count} green phases but timing has {} approaches",
                program.junction(),
                timing.greens.len()
            ),
        ));
    }

    let mut retimed = SignalProgram::new(
        program.junction(),
        program.controller(),
        program.offset(),
    )?
    .with_program_id(program.program_id())?;
    let mut greens = timing.greens.iter();
    for phase in program.phases() {
        let phase = match phase.is_green().then(|| greens.next()).flatten() {
            Some(green) => {
                let resized = phase.clone().with_duration(whole_seconds(*green))?;
                if phase.min_duration().is_some() || phase.max_duration().is_some() {
                    let min = whole_seconds(green * 0.5);
                    resized.with_bounds(Some(min), Some(whole_seconds(green * 1.5).max(min)))?
                } else {
                    resized
                }
            }
            None => phase.clone(),
        };
        retimed.append_phase(phase)?;
    }
    debug!(
        "retimed program {}: cycle {}s -> {}s",
        program.junction(),
        program.cycle_length(),
        retimed.cycle_length()
    );
    Ok(retimed)
}

/// Green-wave offsets for consecutive signals sharing one cycle.
///
/// `distances[i]` separates signal `i` from signal `i + 1`; `speed` is in m/s.
/// Every offset is reduced modulo the cycle.
pub fn green_wave_offsets(cycle_length: f64, speed: f64, distances: &[f64]) -> Result<Vec<f64>> {
    require_positive("cycle_length", cycle_length)?;
    require_positive("speed", speed)?;
    let mut offsets = Vec::with_capacity(distances.len() + 1);
    offsets.push(0.0);
    let mut previous = 0.0;
    for distance in distances {
        require_non_negative("distances", *distance)?;
        previous = (previous + distance / speed).rem_euclid(cycle_length);
        offsets.push(previous);
    }
    Ok(offsets)
}

/// Writes one offset, rounded to whole seconds and reduced modulo the
/// program's own cycle, into each program.
pub fn apply_offsets(programs: &mut [SignalProgram], offsets: &[f64]) -> Result<()> {
    if programs.len() != offsets.len() {
        return Err(ScenarioError::invalid(
            "offsets",
            format!(
                "{} offsets given for {} signal programs",
                offsets.len(),
                programs.len()
            ),
        ));
    }
    for (program, offset) in programs.iter_mut().zip(offsets) {
        let rounded = offset.round() as i32;
        let cycle = program.cycle_length() as i32;
        let offset = if cycle > 0 {
            rounded.rem_euclid(cycle)
        } else {
            rounded
        };
        program.set_offset(offset);
    }
    Ok(())
}

/// Capacity of one approach in veh/h: `lanes × saturation × green / cycle`.
pub fn approach_capacity(
    lanes: u32,
    saturation_per_lane: f64,
    green: f64,
    cycle_length: f64,
) -> Result<f64> {
    if lanes == 0 {
        return Err(ScenarioError::invalid("lanes", "must be at least 1"));
    }
    require_positive("saturation", saturation_per_lane)?;
    require_positive("cycle_length", cycle_length)?;
    require_non_negative("green", green)?;
    if green > cycle_length {
        return Err(ScenarioError::invalid(
            "green",
            format!("green {green}s exceeds the {cycle_length}s cycle"),
        ));
    }
    Ok(f64::from(lanes) * saturation_per_lane * green / cycle_length)
}

/// Lane count and green time of one approach
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproachSupply {
    pub lanes: u32,
    pub green: f64,
}

/// Level of service, from free flow (A) to oversaturated (F)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LevelOfService {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl LevelOfService {
    /// Upper volume/capacity bound of each band below F
    pub const BANDS: [(LevelOfService, f64); 5] = [
        (LevelOfService::A, 0.6),
        (LevelOfService::B, 0.7),
        (LevelOfService::C, 0.8),
        (LevelOfService::D, 0.9),
        (LevelOfService::E, 1.0),
    ];

    pub fn from_ratio(volume_to_capacity: f64) -> Self {
        Self::BANDS
            .iter()
            .find(|(los, bound)| match los {
                LevelOfService::E => volume_to_capacity <= *bound,
                _ => volume_to_capacity < *bound,
            })
            .map(|(los, _)| *los)
            .unwrap_or(LevelOfService::F)
    }

    pub fn description(&self) -> &'static str {
        match self {
            LevelOfService::A => "free flow",
            LevelOfService::B => "reasonably free flow",
            LevelOfService::C => "stable flow",
            LevelOfService::D => "approaching unstable flow",
            LevelOfService::E => "at capacity",
            LevelOfService::F => "oversaturated",
        }
    }
}

impl fmt::Display for LevelOfService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            LevelOfService::A => "A",
            LevelOfService::B => "B",
            LevelOfService::C => "C",
            LevelOfService::D => "D",
            LevelOfService::E => "E",
            LevelOfService::F => "F",
        };
        f.write_str(letter)
    }
}

/// Capacity of a signalized intersection and its level-of-service bands
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityAnalysis {
    pub cycle_length: f64,
    /// Capacity per approach in veh/h
    pub approaches: Vec<f64>,
    pub total: f64,
}

impl CapacityAnalysis {
    pub fn new(
        cycle_length: f64,
        saturation_per_lane: f64,
        approaches: &[ApproachSupply],
    ) -> Result<Self> {
        if approaches.is_empty() {
            return Err(ScenarioError::invalid(
                "approaches",
                "at least one approach is required",
            ));
        }
        let capacities = approaches
            .iter()
            .map(|a| approach_capacity(a.lanes, saturation_per_lane, a.green, cycle_length))
            .collect::<Result<Vec<_>>>()?;
        let total = capacities.iter().sum();
        Ok(Self {
            cycle_length,
            approaches: capacities,
            total,
        })
    }

    pub fn volume_to_capacity(&self, volume: f64) -> f64 {
        if self.total > 0.0 {
            volume / self.total
        } else {
            f64::INFINITY
        }
    }

    pub fn los(&self, volume: f64) -> LevelOfService {
        LevelOfService::from_ratio(self.volume_to_capacity(volume))
    }

    /// Upper bound of bands A to E in veh/h
    pub fn los_thresholds(&self) -> Vec<(LevelOfService, f64)> {
        LevelOfService::BANDS
            .iter()
            .map(|(los, fraction)| (*los, fraction * self.total))
            .collect()
    }
}
