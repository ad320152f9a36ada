//! Core types for scenario generation
//!
//! Identifiers, planar positions and the small enums shared by every entity.
//! These carry no cross-entity knowledge; referential checks live in the
//! network graph and the serializer.

use std::fmt;
use std::str::FromStr;

use super::error::ScenarioError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&$name> for $name {
            fn from(id: &$name) -> Self {
                id.clone()
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// A wrapper type for junction IDs
    JunctionId
);
string_id!(
    /// A wrapper type for link IDs
    LinkId
);
string_id!(
    /// A wrapper type for vehicle class IDs
    VehicleClassId
);
string_id!(
    /// A wrapper type for route IDs
    RouteId
);

/// Vehicle class the simulator always provides, even without a declaration.
pub const DEFAULT_VEHICLE_CLASS: &str = "DEFAULT_VEHTYPE";

/// A 2D position in meters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// The point `distance` meters from the origin along a ray at `angle_deg`
    /// (counter-clockwise from the positive x axis).
    ///
    /// Coordinates are snapped to the micrometer so that trigonometric noise
    /// (e.g. `cos(90°) = 6e-17`) does not leak into generated files.
    pub fn on_ray(angle_deg: f64, distance: f64) -> Position {
        let rad = angle_deg.to_radians();
        Position::new(snap(distance * rad.cos()), snap(distance * rad.sin()))
    }
}

fn snap(value: f64) -> f64 {
    let snapped = (value * 1e6).round() / 1e6;
    // Avoid writing "-0"
    if snapped == 0.0 {
        0.0
    } else {
        snapped
    }
}

/// How right-of-way is decided at a junction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JunctionKind {
    Priority,
    TrafficLight,
    RightBeforeLeft,
    Unregulated,
    DeadEnd,
}

impl JunctionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JunctionKind::Priority => "priority",
            JunctionKind::TrafficLight => "traffic_light",
            JunctionKind::RightBeforeLeft => "right_before_left",
            JunctionKind::Unregulated => "unregulated",
            JunctionKind::DeadEnd => "dead_end",
        }
    }
}

impl FromStr for JunctionKind {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "priority" => Ok(JunctionKind::Priority),
            "traffic_light" => Ok(JunctionKind::TrafficLight),
            "right_before_left" => Ok(JunctionKind::RightBeforeLeft),
            "unregulated" => Ok(JunctionKind::Unregulated),
            "dead_end" => Ok(JunctionKind::DeadEnd),
            other => Err(ScenarioError::invalid(
                "type",
                format!("unknown junction type [{other}]"),
            )),
        }
    }
}

impl fmt::Display for JunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signal controller flavour for signalized junctions and their programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControllerKind {
    #[default]
    Static,
    Actuated,
    DelayBased,
}

impl ControllerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerKind::Static => "static",
            ControllerKind::Actuated => "actuated",
            ControllerKind::DelayBased => "delay_based",
        }
    }
}

impl FromStr for ControllerKind {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(ControllerKind::Static),
            "actuated" => Ok(ControllerKind::Actuated),
            "delay_based" => Ok(ControllerKind::DelayBased),
            other => Err(ScenarioError::invalid(
                "controller",
                format!("unknown controller type [{other}]"),
            )),
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behavioural vehicle category, also used for link access lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VehicleCategory {
    #[default]
    Passenger,
    Taxi,
    Bus,
    Coach,
    Delivery,
    Truck,
    Trailer,
    Emergency,
    Motorcycle,
    Moped,
    Bicycle,
    Pedestrian,
    Tram,
}

impl VehicleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Passenger => "passenger",
            VehicleCategory::Taxi => "taxi",
            VehicleCategory::Bus => "bus",
            VehicleCategory::Coach => "coach",
            VehicleCategory::Delivery => "delivery",
            VehicleCategory::Truck => "truck",
            VehicleCategory::Trailer => "trailer",
            VehicleCategory::Emergency => "emergency",
            VehicleCategory::Motorcycle => "motorcycle",
            VehicleCategory::Moped => "moped",
            VehicleCategory::Bicycle => "bicycle",
            VehicleCategory::Pedestrian => "pedestrian",
            VehicleCategory::Tram => "tram",
        }
    }
}

impl FromStr for VehicleCategory {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s {
            "passenger" => VehicleCategory::Passenger,
            "taxi" => VehicleCategory::Taxi,
            "bus" => VehicleCategory::Bus,
            "coach" => VehicleCategory::Coach,
            "delivery" => VehicleCategory::Delivery,
            "truck" => VehicleCategory::Truck,
            "trailer" => VehicleCategory::Trailer,
            "emergency" => VehicleCategory::Emergency,
            "motorcycle" => VehicleCategory::Motorcycle,
            "moped" => VehicleCategory::Moped,
            "bicycle" => VehicleCategory::Bicycle,
            "pedestrian" => VehicleCategory::Pedestrian,
            "tram" => VehicleCategory::Tram,
            other => {
                return Err(ScenarioError::invalid(
                    "vClass",
                    format!("unknown vehicle category [{other}]"),
                ))
            }
        };
        Ok(category)
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert km/h to m/s.
pub fn kmh_to_ms(kmh: f64) -> f64 {
    kmh / 3.6
}

/// Convert m/s to km/h.
pub fn ms_to_kmh(ms: f64) -> f64 {
    ms * 3.6
}
