//! Element records for the simulator's input files
//!
//! Each file is a root record serialized by `yaserde`. Children are written in
//! field order and, within a field, in insertion order. Attribute values are
//! preformatted strings; `None` attributes and children are left out.

use yaserde::ser::{to_string_with_config, Config};
use yaserde::YaSerialize;
use yaserde_derive::YaSerialize;

use crate::scenario::error::{Result, ScenarioError};

/// Shortest round-trip decimal form; negative zero is written as `0`.
pub fn number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Indented document with an XML declaration.
pub(crate) fn to_document<T: YaSerialize>(record: &T) -> Result<String> {
    let config = Config {
        perform_indent: true,
        write_document_declaration: true,
        ..Default::default()
    };
    to_string_with_config(record, &config).map_err(ScenarioError::Serialization)
}

#[derive(Debug, Default, YaSerialize)]
#[yaserde(rename = "nodes")]
pub(crate) struct NodesFile {
    pub node: Vec<NodeRecord>,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct NodeRecord {
    #[yaserde(attribute)]
    pub id: String,
    #[yaserde(attribute)]
    pub x: String,
    #[yaserde(attribute)]
    pub y: String,
    #[yaserde(attribute, rename = "type")]
    pub kind: String,
    #[yaserde(attribute, rename = "tlType")]
    pub tl_type: Option<String>,
}

#[derive(Debug, Default, YaSerialize)]
#[yaserde(rename = "edges")]
pub(crate) struct EdgesFile {
    pub edge: Vec<EdgeRecord>,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct EdgeRecord {
    #[yaserde(attribute)]
    pub id: String,
    #[yaserde(attribute)]
    pub from: String,
    #[yaserde(attribute)]
    pub to: String,
    #[yaserde(attribute, rename = "numLanes")]
    pub num_lanes: String,
    #[yaserde(attribute)]
    pub speed: String,
    #[yaserde(attribute)]
    pub priority: String,
    #[yaserde(attribute, rename = "type")]
    pub kind: Option<String>,
    #[yaserde(attribute)]
    pub allow: Option<String>,
    #[yaserde(attribute)]
    pub disallow: Option<String>,
}

#[derive(Debug, Default, YaSerialize)]
#[yaserde(rename = "connections")]
pub(crate) struct ConnectionsFile {
    pub connection: Vec<ConnectionRecord>,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct ConnectionRecord {
    #[yaserde(attribute)]
    pub from: String,
    #[yaserde(attribute)]
    pub to: String,
    #[yaserde(attribute, rename = "fromLane")]
    pub from_lane: String,
    #[yaserde(attribute, rename = "toLane")]
    pub to_lane: String,
}

#[derive(Debug, Default, YaSerialize)]
#[yaserde(rename = "tlLogics")]
pub(crate) struct TlLogicsFile {
    #[yaserde(rename = "tlLogic")]
    pub tl_logic: Vec<TlLogicRecord>,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct TlLogicRecord {
    #[yaserde(attribute)]
    pub id: String,
    #[yaserde(attribute, rename = "type")]
    pub kind: String,
    #[yaserde(attribute, rename = "programID")]
    pub program_id: String,
    #[yaserde(attribute)]
    pub offset: String,
    pub phase: Vec<PhaseRecord>,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct PhaseRecord {
    #[yaserde(attribute)]
    pub duration: String,
    #[yaserde(attribute)]
    pub state: String,
    #[yaserde(attribute, rename = "minDur")]
    pub min_dur: Option<String>,
    #[yaserde(attribute, rename = "maxDur")]
    pub max_dur: Option<String>,
    #[yaserde(attribute)]
    pub name: Option<String>,
}

#[derive(Debug, Default, YaSerialize)]
#[yaserde(rename = "routes")]
pub(crate) struct RoutesFile {
    #[yaserde(rename = "vType")]
    pub v_type: Vec<VTypeRecord>,
    pub route: Vec<RouteRecord>,
    pub vehicle: Vec<VehicleRecord>,
    pub flow: Vec<FlowRecord>,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct VTypeRecord {
    #[yaserde(attribute)]
    pub id: String,
    #[yaserde(attribute)]
    pub length: String,
    #[yaserde(attribute, rename = "minGap")]
    pub min_gap: String,
    #[yaserde(attribute, rename = "maxSpeed")]
    pub max_speed: String,
    #[yaserde(attribute)]
    pub accel: String,
    #[yaserde(attribute)]
    pub decel: String,
    #[yaserde(attribute)]
    pub sigma: String,
    #[yaserde(attribute)]
    pub tau: String,
    #[yaserde(attribute, rename = "vClass")]
    pub v_class: String,
    #[yaserde(attribute, rename = "emissionClass")]
    pub emission_class: Option<String>,
    #[yaserde(attribute)]
    pub color: Option<String>,
    #[yaserde(attribute, rename = "carFollowModel")]
    pub car_follow_model: Option<String>,
}

/// A named route, or an anonymous one nested in a vehicle or flow.
#[derive(Debug, Default, YaSerialize)]
pub(crate) struct RouteRecord {
    #[yaserde(attribute)]
    pub id: Option<String>,
    #[yaserde(attribute)]
    pub edges: String,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct VehicleRecord {
    #[yaserde(attribute)]
    pub id: String,
    #[yaserde(attribute, rename = "type")]
    pub kind: String,
    #[yaserde(attribute)]
    pub depart: String,
    #[yaserde(attribute, rename = "departLane")]
    pub depart_lane: String,
    #[yaserde(attribute, rename = "departSpeed")]
    pub depart_speed: String,
    #[yaserde(attribute, rename = "route")]
    pub route_ref: Option<String>,
    #[yaserde(rename = "route")]
    pub inline_route: Option<RouteRecord>,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct FlowRecord {
    #[yaserde(attribute)]
    pub id: String,
    #[yaserde(attribute, rename = "type")]
    pub kind: String,
    #[yaserde(attribute)]
    pub begin: String,
    #[yaserde(attribute)]
    pub end: String,
    #[yaserde(attribute, rename = "route")]
    pub route_ref: Option<String>,
    #[yaserde(attribute)]
    pub from: Option<String>,
    #[yaserde(attribute)]
    pub to: Option<String>,
    #[yaserde(attribute, rename = "vehsPerHour")]
    pub vehs_per_hour: Option<String>,
    #[yaserde(attribute)]
    pub probability: Option<String>,
    #[yaserde(attribute)]
    pub period: Option<String>,
    #[yaserde(attribute)]
    pub number: Option<String>,
    #[yaserde(rename = "route")]
    pub inline_route: Option<RouteRecord>,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct Value {
    #[yaserde(attribute)]
    pub value: String,
}

impl Value {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[derive(Debug, Default, YaSerialize)]
#[yaserde(rename = "configuration")]
pub(crate) struct ConfigurationFile {
    pub input: InputSection,
    pub time: TimeSection,
    pub output: OutputSection,
    pub processing: ProcessingSection,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct InputSection {
    #[yaserde(rename = "net-file")]
    pub net_file: Option<Value>,
    #[yaserde(rename = "route-files")]
    pub route_files: Option<Value>,
    #[yaserde(rename = "additional-files")]
    pub additional_files: Option<Value>,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct TimeSection {
    pub begin: Value,
    pub end: Value,
    #[yaserde(rename = "step-length")]
    pub step_length: Value,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct OutputSection {
    #[yaserde(rename = "tripinfo-output")]
    pub tripinfo: Option<Value>,
    #[yaserde(rename = "fcd-output")]
    pub fcd: Option<Value>,
    #[yaserde(rename = "emission-output")]
    pub emission: Option<Value>,
    #[yaserde(rename = "summary-output")]
    pub summary: Option<Value>,
    #[yaserde(rename = "queue-output")]
    pub queue: Option<Value>,
    #[yaserde(rename = "statistic-output")]
    pub statistic: Option<Value>,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct ProcessingSection {
    #[yaserde(rename = "time-to-teleport")]
    pub time_to_teleport: Value,
    #[yaserde(rename = "ignore-route-errors")]
    pub ignore_route_errors: Option<Value>,
}

/// Infrastructure grouped by element kind
#[derive(Debug, Default, YaSerialize)]
#[yaserde(rename = "additional")]
pub(crate) struct AdditionalFile {
    #[yaserde(rename = "inductionLoop")]
    pub induction_loop: Vec<InductionLoopRecord>,
    #[yaserde(rename = "laneAreaDetector")]
    pub lane_area_detector: Vec<LaneAreaDetectorRecord>,
    #[yaserde(rename = "busStop")]
    pub bus_stop: Vec<StopRecord>,
    #[yaserde(rename = "parkingArea")]
    pub parking_area: Vec<StopRecord>,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct InductionLoopRecord {
    #[yaserde(attribute)]
    pub id: String,
    #[yaserde(attribute)]
    pub lane: String,
    #[yaserde(attribute)]
    pub pos: String,
    #[yaserde(attribute)]
    pub period: String,
    #[yaserde(attribute)]
    pub file: String,
}

#[derive(Debug, Default, YaSerialize)]
pub(crate) struct LaneAreaDetectorRecord {
    #[yaserde(attribute)]
    pub id: String,
    #[yaserde(attribute)]
    pub lane: String,
    #[yaserde(attribute)]
    pub pos: String,
    #[yaserde(attribute, rename = "endPos")]
    pub end_pos: Option<String>,
    #[yaserde(attribute)]
    pub period: String,
    #[yaserde(attribute)]
    pub file: String,
}

/// Bus stops and parking areas share a lane span.
#[derive(Debug, Default, YaSerialize)]
pub(crate) struct StopRecord {
    #[yaserde(attribute)]
    pub id: String,
    #[yaserde(attribute)]
    pub lane: String,
    #[yaserde(attribute, rename = "startPos")]
    pub start_pos: String,
    #[yaserde(attribute, rename = "endPos")]
    pub end_pos: String,
    #[yaserde(attribute)]
    pub name: Option<String>,
    #[yaserde(attribute, rename = "roadsideCapacity")]
    pub roadside_capacity: Option<String>,
}
