//! Run configuration handed to the simulator alongside the generated files

use super::error::{require_non_negative, require_positive, Result, ScenarioError};

/// Output files requested from a simulation run. `None` disables an output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputArtifacts {
    pub tripinfo: Option<String>,
    pub fcd: Option<String>,
    pub emission: Option<String>,
    pub summary: Option<String>,
    pub queue: Option<String>,
    pub statistic: Option<String>,
}

impl OutputArtifacts {
    /// Trip info and summary outputs named after the scenario.
    pub fn for_scenario(name: &str) -> Self {
        Self {
            tripinfo: Some(format!("{name}_tripinfo.xml")),
            summary: Some(format!("{name}_summary.xml")),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub net_file: Option<String>,
    pub route_files: Vec<String>,
    pub additional_files: Vec<String>,
    /// Simulation start in s
    pub begin: f64,
    /// Simulation end in s
    pub end: f64,
    pub step_length: f64,
    pub outputs: OutputArtifacts,
    /// Seconds a blocked vehicle waits before teleporting; `-1` disables teleports
    pub time_to_teleport: i32,
    pub ignore_route_errors: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            net_file: None,
            route_files: Vec::new(),
            additional_files: Vec::new(),
            begin: 0.0,
            end: 3600.0,
            step_length: 1.0,
            outputs: OutputArtifacts::default(),
            time_to_teleport: -1,
            ignore_route_errors: true,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_window(mut self, begin: f64, end: f64, step_length: f64) -> Result<Self> {
        self.begin = begin;
        self.end = end;
        self.step_length = step_length;
        self.validate()?;
        Ok(self)
    }

    pub fn with_net_file(mut self, file: impl Into<String>) -> Self {
        self.net_file = Some(file.into());
        self
    }

    pub fn with_route_file(mut self, file: impl Into<String>) -> Self {
        self.route_files.push(file.into());
        self
    }

    pub fn with_additional_file(mut self, file: impl Into<String>) -> Self {
        self.additional_files.push(file.into());
        self
    }

    pub fn with_outputs(mut self, outputs: OutputArtifacts) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_non_negative("begin", self.begin)?;
        require_positive("step-length", self.step_length)?;
        if !self.end.is_finite() || self.end <= self.begin {
            return Err(ScenarioError::invalid(
                "end",
                format!("end {} must be after begin {}", self.end, self.begin),
            ));
        }
        if self.time_to_teleport < -1 {
            return Err(ScenarioError::invalid(
                "time-to-teleport",
                "must be -1 (disabled) or a non-negative number of seconds",
            ));
        }
        Ok(())
    }
}
