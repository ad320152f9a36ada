//! Additional infrastructure placed on lanes: detectors, bus stops and
//! parking areas

use std::fmt;

use super::error::{require_id, require_non_negative, require_positive, Result, ScenarioError};
use super::road_network::NetworkGraph;
use super::types::LinkId;

/// One lane of a link, written as `{link}_{index}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LaneRef {
    pub link: LinkId,
    pub index: u32,
}

impl LaneRef {
    pub fn new(link: impl Into<LinkId>, index: u32) -> Self {
        Self {
            link: link.into(),
            index,
        }
    }
}

impl fmt::Display for LaneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.link, self.index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Infrastructure {
    /// Point detector
    InductionLoop {
        id: String,
        lane: LaneRef,
        pos: f64,
        period: u32,
        file: String,
    },
    /// Detector covering a stretch of lane
    LaneAreaDetector {
        id: String,
        lane: LaneRef,
        pos: f64,
        end_pos: Option<f64>,
        period: u32,
        file: String,
    },
    BusStop {
        id: String,
        lane: LaneRef,
        start_pos: f64,
        end_pos: f64,
        name: Option<String>,
    },
    ParkingArea {
        id: String,
        lane: LaneRef,
        start_pos: f64,
        end_pos: f64,
        roadside_capacity: u32,
    },
}

impl Infrastructure {
    pub fn id(&self) -> &str {
        match self {
            Infrastructure::InductionLoop { id, .. }
            | Infrastructure::LaneAreaDetector { id, .. }
            | Infrastructure::BusStop { id, .. }
            | Infrastructure::ParkingArea { id, .. } => id,
        }
    }

    pub fn lane(&self) -> &LaneRef {
        match self {
            Infrastructure::InductionLoop { lane, .. }
            | Infrastructure::LaneAreaDetector { lane, .. }
            | Infrastructure::BusStop { lane, .. }
            | Infrastructure::ParkingArea { lane, .. } => lane,
        }
    }

    /// Element name in the additional file
    pub fn tag(&self) -> &'static str {
        match self {
            Infrastructure::InductionLoop { .. } => "inductionLoop",
            Infrastructure::LaneAreaDetector { .. } => "laneAreaDetector",
            Infrastructure::BusStop { .. } => "busStop",
            Infrastructure::ParkingArea { .. } => "parkingArea",
        }
    }
}

fn require_span(start: f64, end: f64) -> Result<()> {
    require_non_negative("startPos", start)?;
    if !end.is_finite() || end <= start {
        return Err(ScenarioError::invalid(
            "endPos",
            format!("end position {end} must lie after start position {start}"),
        ));
    }
    Ok(())
}

/// Insertion-ordered set of infrastructure elements with unique ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdditionalSet {
    elements: Vec<Infrastructure>,
}

impl AdditionalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_induction_loop(
        &mut self,
        id: impl Into<String>,
        lane: LaneRef,
        pos: f64,
        period: u32,
        file: impl Into<String>,
    ) -> Result<()> {
        require_non_negative("pos", pos)?;
        require_positive("period", f64::from(period))?;
        self.push(Infrastructure::InductionLoop {
            id: id.into(),
            lane,
            pos,
            period,
            file: file.into(),
        })
    }

    pub fn add_lane_area_detector(
        &mut self,
        id: impl Into<String>,
        lane: LaneRef,
        pos: f64,
        end_pos: Option<f64>,
        period: u32,
        file: impl Into<String>,
    ) -> Result<()> {
        match end_pos {
            Some(end_pos) => require_span(pos, end_pos)?,
            None => require_non_negative("pos", pos)?,
        }
        require_positive("period", f64::from(period))?;
        self.push(Infrastructure::LaneAreaDetector {
            id: id.into(),
            lane,
            pos,
            end_pos,
            period,
            file: file.into(),
        })
    }

    pub fn add_bus_stop(
        &mut self,
        id: impl Into<String>,
        lane: LaneRef,
        start_pos: f64,
        end_pos: f64,
        name: Option<String>,
    ) -> Result<()> {
        require_span(start_pos, end_pos)?;
        self.push(Infrastructure::BusStop {
            id: id.into(),
            lane,
            start_pos,
            end_pos,
            name,
        })
    }

    pub fn add_parking_area(
        &mut self,
        id: impl Into<String>,
        lane: LaneRef,
        start_pos: f64,
        end_pos: f64,
        roadside_capacity: u32,
    ) -> Result<()> {
        require_span(start_pos, end_pos)?;
        self.push(Infrastructure::ParkingArea {
            id: id.into(),
            lane,
            start_pos,
            end_pos,
            roadside_capacity,
        })
    }

    fn push(&mut self, element: Infrastructure) -> Result<()> {
        require_id("id", element.id())?;
        if self.elements.iter().any(|e| e.id() == element.id()) {
            return Err(ScenarioError::invalid(
                "id",
                format!("duplicate {} id [{}]", element.tag(), element.id()),
            ));
        }
        self.elements.push(element);
        Ok(())
    }

    pub fn elements(&self) -> &[Infrastructure] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Checks that every element sits on an existing lane of `network`.
    pub fn validate_against(&self, network: &NetworkGraph) -> Result<()> {
        for element in &self.elements {
            let lane = element.lane();
            let link = network
                .link(lane.link.as_str())
                .ok_or_else(|| ScenarioError::dangling("link", element.id(), lane.link.as_str()))?;
            if lane.index >= link.lanes() {
                return Err(ScenarioError::dangling("lane", element.id(), lane.to_string()));
            }
        }
        Ok(())
    }
}
