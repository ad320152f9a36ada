//! Signal programs
//!
//! A program is an ordered, cyclically repeated list of [`Phase`]s bound to
//! one junction. Each phase describes the lights of every controlled
//! lane-group position as one character of a state string; once the first
//! phase is appended the string width is frozen for the whole program.
//!
//! Templates build their state strings through [`ApproachLayout`], which
//! fixes the order of approaches (north, east, south, west) so every
//! generated program shares the same per-lane encoding.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::debug;

use super::error::{require_id, Result, ScenarioError};
use super::types::{ControllerKind, JunctionId};

/// Program id written when the caller does not choose one
pub const DEFAULT_PROGRAM_ID: &str = "0";

/// Light shown to one lane-group position during a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalState {
    Red,
    Yellow,
    /// Green with priority over conflicting streams
    Green,
    /// Green that must yield to conflicting streams
    GreenMinor,
    RedYellow,
    /// Right turn on red after stopping
    Stop,
    /// Signal off, blinking; vehicles must yield
    OffBlinking,
    /// Signal off, no signal
    Off,
}

impl SignalState {
    pub fn as_char(self) -> char {
        match self {
            SignalState::Red => 'r',
            SignalState::Yellow => 'y',
            SignalState::Green => 'G',
            SignalState::GreenMinor => 'g',
            SignalState::RedYellow => 'u',
            SignalState::Stop => 's',
            SignalState::OffBlinking => 'o',
            SignalState::Off => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let state = match c {
            'r' => SignalState::Red,
            'y' => SignalState::Yellow,
            'G' => SignalState::Green,
            'g' => SignalState::GreenMinor,
            'u' => SignalState::RedYellow,
            's' => SignalState::Stop,
            'o' => SignalState::OffBlinking,
            'O' => SignalState::Off,
            _ => return None,
        };
        Some(state)
    }

    pub fn is_green(self) -> bool {
        matches!(self, SignalState::Green | SignalState::GreenMinor)
    }
}

/// Fixed-width sequence of lights, one per controlled lane-group position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateString(Vec<SignalState>);

impl StateString {
    pub fn uniform(state: SignalState, width: usize) -> Self {
        Self(vec![state; width])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn states(&self) -> &[SignalState] {
        &self.0
    }

    pub fn has_green(&self) -> bool {
        self.0.iter().any(|s| s.is_green())
    }
}

impl FromStr for StateString {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(ScenarioError::invalid("state", "must be a non-empty string"));
        }
        s.chars()
            .map(|c| {
                SignalState::from_char(c).ok_or_else(|| {
                    ScenarioError::invalid("state", format!("unknown signal character [{c}]"))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl From<Vec<SignalState>> for StateString {
    fn from(states: Vec<SignalState>) -> Self {
        Self(states)
    }
}

impl fmt::Display for StateString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in &self.0 {
            write!(f, "{}", state.as_char())?;
        }
        Ok(())
    }
}

/// One fixed-duration state of a signal program
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    /// Duration in seconds, always positive
    duration: u32,
    state: StateString,
    /// Bounds used by actuated controllers
    min_duration: Option<u32>,
    max_duration: Option<u32>,
    name: Option<String>,
}

impl Phase {
    /// Creates a phase from a textual state such as `"GGrrGGrr"`.
    pub fn new(duration: u32, state: &str) -> Result<Self> {
        Self::from_states(duration, state.parse()?)
    }

    pub fn from_states(duration: u32, state: StateString) -> Result<Self> {
        if duration == 0 {
            return Err(ScenarioError::invalid(
                "duration",
                "phase duration must be a positive integer",
            ));
        }
        if state.is_empty() {
            return Err(ScenarioError::invalid("state", "must be a non-empty string"));
        }
        Ok(Self {
            duration,
            state,
            min_duration: None,
            max_duration: None,
            name: None,
        })
    }

    /// Sets the actuated-control bounds. `min` must not exceed `max` when both are given.
    pub fn with_bounds(mut self, min: Option<u32>, max: Option<u32>) -> Result<Self> {
        if min == Some(0) {
            return Err(ScenarioError::invalid("minDur", "must be positive"));
        }
        if max == Some(0) {
            return Err(ScenarioError::invalid("maxDur", "must be positive"));
        }
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ScenarioError::invalid(
                    "minDur",
                    format!("min duration {min} exceeds max duration {max}"),
                ));
            }
        }
        self.min_duration = min;
        self.max_duration = max;
        Ok(self)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the same phase with a new duration.
    pub fn with_duration(mut self, duration: u32) -> Result<Self> {
        if duration == 0 {
            return Err(ScenarioError::invalid(
                "duration",
                "phase duration must be a positive integer",
            ));
        }
        self.duration = duration;
        Ok(self)
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn state(&self) -> &StateString {
        &self.state
    }

    pub fn min_duration(&self) -> Option<u32> {
        self.min_duration
    }

    pub fn max_duration(&self) -> Option<u32> {
        self.max_duration
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_green(&self) -> bool {
        self.state.has_green()
    }
}

/// Compass approach into a junction.
///
/// The declaration order is the canonical lane-group order of every state
/// string produced by the templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Approach {
    North,
    East,
    South,
    West,
}

impl Approach {
    pub const ALL: [Approach; 4] = [
        Approach::North,
        Approach::East,
        Approach::South,
        Approach::West,
    ];

    /// Short label used in generated ids
    pub fn label(self) -> &'static str {
        match self {
            Approach::North => "N",
            Approach::East => "E",
            Approach::South => "S",
            Approach::West => "W",
        }
    }

    /// Unit direction from the junction centre towards the approach
    pub fn direction(self) -> (f64, f64) {
        match self {
            Approach::North => (0.0, 1.0),
            Approach::East => (1.0, 0.0),
            Approach::South => (0.0, -1.0),
            Approach::West => (-1.0, 0.0),
        }
    }
}

/// Lane-group widths per approach, in canonical approach order.
///
/// Each approach contributes `2 × lanes` positions: its incoming and outgoing
/// lanes are indexed as separate groups inside the arm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApproachLayout {
    groups: BTreeMap<Approach, usize>,
}

impl ApproachLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every listed approach with the same lane count.
    pub fn uniform(approaches: &[Approach], lanes: u32) -> Self {
        approaches
            .iter()
            .fold(Self::new(), |layout, approach| layout.with_arm(*approach, lanes))
    }

    pub fn with_arm(mut self, approach: Approach, lanes: u32) -> Self {
        self.groups.insert(approach, 2 * lanes as usize);
        self
    }

    /// Total number of state positions
    pub fn width(&self) -> usize {
        self.groups.values().sum()
    }

    pub fn approaches(&self) -> impl Iterator<Item = Approach> + '_ {
        self.groups.keys().copied()
    }

    /// State string showing `color` to every approach in `active`, red elsewhere.
    pub fn state(&self, active: &[Approach], color: SignalState) -> StateString {
        self.groups
            .iter()
            .flat_map(|(approach, width)| {
                let state = if active.contains(approach) {
                    color
                } else {
                    SignalState::Red
                };
                std::iter::repeat(state).take(*width)
            })
            .collect::<Vec<_>>()
            .into()
    }

    /// Builds the standard green/yellow program serving each stage in turn.
    ///
    /// Each stage is a set of approaches released together with its green time.
    pub fn staged_program(
        &self,
        junction: impl Into<JunctionId>,
        controller: ControllerKind,
        stages: &[(&[Approach], u32)],
        yellow: u32,
    ) -> Result<SignalProgram> {
        let mut program = SignalProgram::new(junction, controller, 0)?;
        for (active, green) in stages {
            let label: String = active.iter().map(|a| a.label()).collect();
            program.append_phase(
                Phase::from_states(*green, self.state(active, SignalState::Green))?
                    .named(format!("{label}_Green")),
            )?;
            program.append_phase(
                Phase::from_states(yellow, self.state(active, SignalState::Yellow))?
                    .named(format!("{label}_Yellow")),
            )?;
        }
        Ok(program)
    }
}

/// An ordered sequence of phases controlling one junction
#[derive(Debug, Clone, PartialEq)]
pub struct SignalProgram {
    junction: JunctionId,
    controller: ControllerKind,
    program_id: String,
    /// Cycle-relative offset in seconds
    offset: i32,
    phases: Vec<Phase>,
}

impl SignalProgram {
    pub fn new(
        junction: impl Into<JunctionId>,
        controller: ControllerKind,
        offset: i32,
    ) -> Result<Self> {
        let junction = junction.into();
        require_id("id", junction.as_str())?;
        Ok(Self {
            junction,
            controller,
            program_id: DEFAULT_PROGRAM_ID.to_string(),
            offset,
            phases: Vec::new(),
        })
    }

    pub fn with_program_id(mut self, program_id: impl Into<String>) -> Result<Self> {
        let program_id = program_id.into();
        require_id("programID", &program_id)?;
        self.program_id = program_id;
        Ok(self)
    }

    /// Appends a phase, enforcing the state width frozen by the first phase.
    pub fn append_phase(&mut self, phase: Phase) -> Result<()> {
        if let Some(expected) = self.state_width() {
            if phase.state().len() != expected {
                return Err(ScenarioError::PhaseLengthMismatch {
                    program: self.junction.to_string(),
                    expected,
                    found: phase.state().len(),
                });
            }
        }
        debug!(
            "program {}: phase {} ({}s, {})",
            self.junction,
            self.phases.len(),
            phase.duration(),
            phase.state()
        );
        self.phases.push(phase);
        Ok(())
    }

    pub fn with_phase(mut self, phase: Phase) -> Result<Self> {
        self.append_phase(phase)?;
        Ok(self)
    }

    /// Sum of all phase durations in seconds
    pub fn cycle_length(&self) -> u32 {
        self.phases.iter().map(|p| p.duration()).sum()
    }

    /// Width of the state strings, once a phase exists
    pub fn state_width(&self) -> Option<usize> {
        self.phases.first().map(|p| p.state().len())
    }

    pub fn set_offset(&mut self, offset: i32) {
        self.offset = offset;
    }

    pub fn junction(&self) -> &JunctionId {
        &self.junction
    }

    pub fn controller(&self) -> ControllerKind {
        self.controller
    }

    pub fn program_id(&self) -> &str {
        &self.program_id
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }
}
