//! Links (directed road segments) and explicit lane connections

use super::error::{require_id, require_positive, Result, ScenarioError};
use super::types::{JunctionId, LinkId, VehicleCategory};

/// Right-of-way rank used when a caller does not set one
pub const DEFAULT_PRIORITY: i32 = 1;

/// A directed road segment carrying one direction of traffic between two junctions
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    id: LinkId,
    from: JunctionId,
    to: JunctionId,
    lanes: u32,
    /// Free-flow speed in m/s
    speed: f64,
    /// Higher wins right-of-way ties
    priority: i32,
    kind: Option<String>,
    allow: Vec<VehicleCategory>,
    disallow: Vec<VehicleCategory>,
}

impl Link {
    pub fn new(
        id: impl Into<LinkId>,
        from: impl Into<JunctionId>,
        to: impl Into<JunctionId>,
        lanes: u32,
        speed: f64,
    ) -> Result<Self> {
        let id = id.into();
        let from = from.into();
        let to = to.into();
        require_id("id", id.as_str())?;
        require_id("from", from.as_str())?;
        require_id("to", to.as_str())?;
        if from == to {
            return Err(ScenarioError::invalid(
                "to",
                format!("link [{id}] cannot connect junction [{from}] to itself"),
            ));
        }
        if lanes == 0 {
            return Err(ScenarioError::invalid(
                "numLanes",
                "must be a positive integer",
            ));
        }
        require_positive("speed", speed)?;

        Ok(Self {
            id,
            from,
            to,
            lanes,
            speed,
            priority: DEFAULT_PRIORITY,
            kind: None,
            allow: Vec::new(),
            disallow: Vec::new(),
        })
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Tags the link with a road type known to the network converter.
    pub fn with_type(mut self, kind: impl Into<String>) -> Result<Self> {
        let kind = kind.into();
        require_id("type", &kind)?;
        self.kind = Some(kind);
        Ok(self)
    }

    pub fn allowing(mut self, classes: impl IntoIterator<Item = VehicleCategory>) -> Self {
        self.allow = classes.into_iter().collect();
        self
    }

    pub fn disallowing(mut self, classes: impl IntoIterator<Item = VehicleCategory>) -> Self {
        self.disallow = classes.into_iter().collect();
        self
    }

    pub fn id(&self) -> &LinkId {
        &self.id
    }

    pub fn from(&self) -> &JunctionId {
        &self.from
    }

    pub fn to(&self) -> &JunctionId {
        &self.to
    }

    pub fn lanes(&self) -> u32 {
        self.lanes
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn allowed(&self) -> &[VehicleCategory] {
        &self.allow
    }

    pub fn disallowed(&self) -> &[VehicleCategory] {
        &self.disallow
    }
}

/// An explicit lane-to-lane turn movement.
///
/// Only needed when the default same-index connection is not wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub from_link: LinkId,
    pub from_lane: u32,
    pub to_link: LinkId,
    pub to_lane: u32,
}

impl Connection {
    pub fn new(
        from_link: impl Into<LinkId>,
        from_lane: u32,
        to_link: impl Into<LinkId>,
        to_lane: u32,
    ) -> Result<Self> {
        let from_link = from_link.into();
        let to_link = to_link.into();
        require_id("from", from_link.as_str())?;
        require_id("to", to_link.as_str())?;
        Ok(Self {
            from_link,
            from_lane,
            to_link,
            to_lane,
        })
    }
}
