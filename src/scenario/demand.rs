//! Traffic demand: vehicle classes, routes, single vehicles and flows

use std::collections::HashSet;

use super::error::{require_id, require_non_negative, require_positive, Result, ScenarioError};
use super::road_network::NetworkGraph;
use super::types::{LinkId, RouteId, VehicleCategory, VehicleClassId, DEFAULT_VEHICLE_CLASS};

/// Emission class written when a vehicle class does not override it
pub const DEFAULT_EMISSION_CLASS: &str = "HBEFA3/PC_G_EU4";

/// Physical, performance and behavioural description of a vehicle type
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleClass {
    id: VehicleClassId,
    category: VehicleCategory,
    /// Length in m
    length: f64,
    /// Standstill gap to the leader in m
    min_gap: f64,
    /// Maximum speed in m/s
    max_speed: f64,
    /// Acceleration in m/s²
    accel: f64,
    /// Comfortable deceleration in m/s²
    decel: f64,
    /// Driver imperfection in [0, 1]
    sigma: f64,
    /// Reaction time in s
    tau: f64,
    color: Option<String>,
    emission_class: Option<String>,
    car_follow_model: Option<String>,
}

impl VehicleClass {
    /// A class with the simulator's passenger-car defaults.
    pub fn new(id: impl Into<VehicleClassId>, category: VehicleCategory) -> Result<Self> {
        let id = id.into();
        require_id("id", id.as_str())?;
        Ok(Self {
            id,
            category,
            length: 5.0,
            min_gap: 2.5,
            max_speed: 55.56,
            accel: 2.6,
            decel: 4.5,
            sigma: 0.5,
            tau: 1.0,
            color: None,
            emission_class: Some(DEFAULT_EMISSION_CLASS.to_string()),
            car_follow_model: None,
        })
    }

    pub fn with_dimensions(mut self, length: f64, min_gap: f64) -> Result<Self> {
        require_positive("length", length)?;
        require_non_negative("minGap", min_gap)?;
        self.length = length;
        self.min_gap = min_gap;
        Ok(self)
    }

    pub fn with_dynamics(mut self, max_speed: f64, accel: f64, decel: f64) -> Result<Self> {
        require_positive("maxSpeed", max_speed)?;
        require_positive("accel", accel)?;
        require_positive("decel", decel)?;
        self.max_speed = max_speed;
        self.accel = accel;
        self.decel = decel;
        Ok(self)
    }

    pub fn with_driver(mut self, sigma: f64, tau: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&sigma) {
            return Err(ScenarioError::invalid(
                "sigma",
                format!("driver imperfection must lie in [0, 1], got {sigma}"),
            ));
        }
        require_positive("tau", tau)?;
        self.sigma = sigma;
        self.tau = tau;
        Ok(self)
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Result<Self> {
        let color = color.into();
        require_id("color", &color)?;
        self.color = Some(color);
        Ok(self)
    }

    /// `None` leaves the emission class to the simulator.
    pub fn with_emission_class(mut self, emission_class: Option<String>) -> Result<Self> {
        if let Some(class) = &emission_class {
            require_id("emissionClass", class)?;
        }
        self.emission_class = emission_class;
        Ok(self)
    }

    pub fn with_car_follow_model(mut self, model: impl Into<String>) -> Result<Self> {
        let model = model.into();
        require_id("carFollowModel", &model)?;
        self.car_follow_model = Some(model);
        Ok(self)
    }

    pub fn id(&self) -> &VehicleClassId {
        &self.id
    }

    pub fn category(&self) -> VehicleCategory {
        self.category
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn min_gap(&self) -> f64 {
        self.min_gap
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn accel(&self) -> f64 {
        self.accel
    }

    pub fn decel(&self) -> f64 {
        self.decel
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn emission_class(&self) -> Option<&str> {
        self.emission_class.as_deref()
    }

    pub fn car_follow_model(&self) -> Option<&str> {
        self.car_follow_model.as_deref()
    }
}

/// A named sequence of links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub id: RouteId,
    pub links: Vec<LinkId>,
}

impl Route {
    pub fn new(id: impl Into<RouteId>, links: Vec<LinkId>) -> Result<Self> {
        let id = id.into();
        require_id("id", id.as_str())?;
        require_links("edges", &links)?;
        Ok(Self { id, links })
    }

    /// The shortest route through `network` starting on `from` and ending on `to`.
    pub fn between(
        network: &NetworkGraph,
        id: impl Into<RouteId>,
        from: &str,
        to: &str,
    ) -> Result<Self> {
        let links = network.shortest_path(from, to)?.ok_or_else(|| {
            ScenarioError::invalid("edges", format!("no path from link [{from}] to link [{to}]"))
        })?;
        Self::new(id, links)
    }
}

fn require_links(field: &'static str, links: &[LinkId]) -> Result<()> {
    if links.is_empty() {
        return Err(ScenarioError::invalid(field, "must name at least one link"));
    }
    links.iter().try_for_each(|link| require_id(field, link.as_str()))
}

/// Path of a single vehicle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehiclePath {
    Route(RouteId),
    Links(Vec<LinkId>),
}

/// A single departure
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub class: VehicleClassId,
    /// Departure time in s
    pub depart: f64,
    pub path: VehiclePath,
    pub depart_lane: String,
    pub depart_speed: String,
}

impl Vehicle {
    pub fn new(
        id: impl Into<String>,
        class: impl Into<VehicleClassId>,
        depart: f64,
        path: VehiclePath,
    ) -> Result<Self> {
        let id = id.into();
        let class = class.into();
        require_id("id", &id)?;
        require_id("type", class.as_str())?;
        require_non_negative("depart", depart)?;
        match &path {
            VehiclePath::Route(route) => require_id("route", route.as_str())?,
            VehiclePath::Links(links) => require_links("edges", links)?,
        }
        Ok(Self {
            id,
            class,
            depart,
            path,
            depart_lane: "best".to_string(),
            depart_speed: "max".to_string(),
        })
    }
}

/// Where the vehicles of a flow travel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowPath {
    Route(RouteId),
    Links(Vec<LinkId>),
    OriginDestination { from: LinkId, to: LinkId },
}

/// How many vehicles a flow inserts. Exactly one kind per flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DemandRate {
    VehiclesPerHour(f64),
    /// Insertion probability per simulation step
    Probability(f64),
    /// Seconds between insertions
    Period(f64),
    /// Absolute count over the time window
    Number(u32),
}

impl DemandRate {
    /// Picks the first positive candidate in the order vehicles-per-hour,
    /// probability, period, number.
    pub fn first_set(
        vehicles_per_hour: Option<f64>,
        probability: Option<f64>,
        period: Option<f64>,
        number: Option<u32>,
    ) -> Result<Self> {
        let rate = if let Some(v) = vehicles_per_hour.filter(|v| *v > 0.0) {
            DemandRate::VehiclesPerHour(v)
        } else if let Some(p) = probability.filter(|p| *p > 0.0) {
            DemandRate::Probability(p)
        } else if let Some(p) = period.filter(|p| *p > 0.0) {
            DemandRate::Period(p)
        } else if let Some(n) = number.filter(|n| *n > 0) {
            DemandRate::Number(n)
        } else {
            return Err(ScenarioError::invalid(
                "rate",
                "a flow needs one positive demand rate",
            ));
        };
        rate.validate()?;
        Ok(rate)
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            DemandRate::VehiclesPerHour(v) => require_positive("vehsPerHour", v),
            DemandRate::Probability(p) => {
                require_positive("probability", p)?;
                if p > 1.0 {
                    return Err(ScenarioError::invalid(
                        "probability",
                        format!("must not exceed 1, got {p}"),
                    ));
                }
                Ok(())
            }
            DemandRate::Period(p) => require_positive("period", p),
            DemandRate::Number(0) => Err(ScenarioError::invalid("number", "must be positive")),
            DemandRate::Number(_) => Ok(()),
        }
    }
}

/// Repeated vehicle generation over `[begin, end)`
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    pub id: String,
    pub class: VehicleClassId,
    pub path: FlowPath,
    pub begin: f64,
    pub end: f64,
    pub rate: DemandRate,
}

impl Flow {
    pub fn new(
        id: impl Into<String>,
        class: impl Into<VehicleClassId>,
        path: FlowPath,
        begin: f64,
        end: f64,
        rate: DemandRate,
    ) -> Result<Self> {
        let id = id.into();
        let class = class.into();
        require_id("id", &id)?;
        require_id("type", class.as_str())?;
        match &path {
            FlowPath::Route(route) => require_id("route", route.as_str())?,
            FlowPath::Links(links) => require_links("edges", links)?,
            FlowPath::OriginDestination { from, to } => {
                require_id("from", from.as_str())?;
                require_id("to", to.as_str())?;
            }
        }
        require_non_negative("begin", begin)?;
        require_non_negative("end", end)?;
        if begin >= end {
            return Err(ScenarioError::invalid(
                "end",
                format!("time window [{begin}, {end}) is empty"),
            ));
        }
        rate.validate()?;
        Ok(Self {
            id,
            class,
            path,
            begin,
            end,
            rate,
        })
    }
}

/// All demand of one scenario, in insertion order
#[derive(Debug, Clone, Default)]
pub struct DemandSet {
    classes: Vec<VehicleClass>,
    routes: Vec<Route>,
    vehicles: Vec<Vehicle>,
    flows: Vec<Flow>,
    ids: HashSet<String>,
}

impl DemandSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, class: VehicleClass) -> Result<()> {
        if self.classes.iter().any(|c| c.id() == class.id()) {
            return Err(duplicate("vehicle class", class.id().as_str()));
        }
        self.classes.push(class);
        Ok(())
    }

    pub fn add_route(&mut self, route: Route) -> Result<()> {
        if self.route(route.id.as_str()).is_some() {
            return Err(duplicate("route", route.id.as_str()));
        }
        self.routes.push(route);
        Ok(())
    }

    /// Vehicles and flows share one id namespace.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<()> {
        if !self.ids.insert(vehicle.id.clone()) {
            return Err(duplicate("vehicle", &vehicle.id));
        }
        self.vehicles.push(vehicle);
        Ok(())
    }

    pub fn add_flow(&mut self, flow: Flow) -> Result<()> {
        if !self.ids.insert(flow.id.clone()) {
            return Err(duplicate("flow", &flow.id));
        }
        self.flows.push(flow);
        Ok(())
    }

    /// Declared classes plus the simulator's built-in default class
    pub fn has_class(&self, id: &str) -> bool {
        id == DEFAULT_VEHICLE_CLASS || self.classes.iter().any(|c| c.id().as_str() == id)
    }

    pub fn route(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id.as_str() == id)
    }

    pub fn classes(&self) -> &[VehicleClass] {
        &self.classes
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    /// Sum of all flows given in vehicles per hour
    pub fn total_vehicles_per_hour(&self) -> f64 {
        self.flows
            .iter()
            .filter_map(|f| match f.rate {
                DemandRate::VehiclesPerHour(v) => Some(v),
                _ => None,
            })
            .sum()
    }
}

fn duplicate(kind: &str, id: &str) -> ScenarioError {
    ScenarioError::invalid("id", format!("duplicate {kind} id [{id}]"))
}
