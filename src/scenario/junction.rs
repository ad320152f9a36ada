//! Junctions: the nodes of a road network

use super::error::{require_finite, require_id, Result, ScenarioError};
use super::types::{ControllerKind, JunctionId, JunctionKind, Position};

/// A road intersection or network boundary point
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    id: JunctionId,
    position: Position,
    kind: JunctionKind,
    /// Only ever set when `kind` is [`JunctionKind::TrafficLight`]
    controller: Option<ControllerKind>,
}

impl Junction {
    pub fn new(id: impl Into<JunctionId>, x: f64, y: f64, kind: JunctionKind) -> Result<Self> {
        let id = id.into();
        require_id("id", id.as_str())?;
        require_finite("x", x)?;
        require_finite("y", y)?;
        Ok(Self {
            id,
            position: Position::new(x, y),
            kind,
            controller: None,
        })
    }

    /// A priority-controlled junction.
    pub fn priority(id: impl Into<JunctionId>, position: Position) -> Result<Self> {
        Self::new(id, position.x, position.y, JunctionKind::Priority)
    }

    /// A signalized junction with an optional controller subtype.
    pub fn signalized(
        id: impl Into<JunctionId>,
        position: Position,
        controller: Option<ControllerKind>,
    ) -> Result<Self> {
        let junction = Self::new(id, position.x, position.y, JunctionKind::TrafficLight)?;
        match controller {
            Some(controller) => junction.with_controller(controller),
            None => Ok(junction),
        }
    }

    /// Sets the controller subtype; only signalized junctions accept one.
    pub fn with_controller(mut self, controller: ControllerKind) -> Result<Self> {
        if self.kind != JunctionKind::TrafficLight {
            return Err(ScenarioError::invalid(
                "tlType",
                format!(
                    "junction [{}] of type {} cannot carry a signal controller",
                    self.id, self.kind
                ),
            ));
        }
        self.controller = Some(controller);
        Ok(self)
    }

    pub fn id(&self) -> &JunctionId {
        &self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> JunctionKind {
        self.kind
    }

    pub fn controller(&self) -> Option<ControllerKind> {
        self.controller
    }

    pub fn is_signalized(&self) -> bool {
        self.kind == JunctionKind::TrafficLight
    }
}
