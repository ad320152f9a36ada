use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use traffic_scenario::scenario::timing::{
    approach_phases, green_wave_offsets, webster_for_approaches,
};
use traffic_scenario::scenario::{
    kmh_to_ms, list_templates, ApproachSupply, CapacityAnalysis, ControllerKind, CycleBounds,
    DemandRate, DemandSet, Flow, FlowPath, NetworkGraph, OutputArtifacts, Route, RunConfig,
    Scenario, TemplateParams, VehicleCategory, VehicleClass,
};

#[derive(Parser)]
#[command(name = "traffic_scenario")]
#[command(about = "Generate traffic-simulation scenarios and signal timings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available network templates
    Templates,
    /// Generate a scenario from a network template
    Generate(GenerateArgs),
    /// Webster optimal cycle length and green split
    Webster(WebsterArgs),
    /// Green-wave offsets along a corridor
    Offsets(OffsetArgs),
    /// Capacity and level of service of a signalized intersection
    Capacity(CapacityArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Template key: 4way, 3way, roundabout, grid, corridor or highway
    template: String,

    /// Lanes per direction (main-street lanes for a corridor)
    #[arg(long)]
    lanes: Option<u32>,

    /// Approach arm length in meters
    #[arg(long)]
    arm_length: Option<f64>,

    /// Speed limit in km/h (main-street speed for a corridor)
    #[arg(long)]
    speed: Option<f64>,

    #[arg(long)]
    rows: Option<u32>,

    #[arg(long)]
    cols: Option<u32>,

    /// Number of roundabout arms
    #[arg(long)]
    arms: Option<u32>,

    /// Number of corridor intersections
    #[arg(long)]
    intersections: Option<u32>,

    /// Number of highway ramp pairs
    #[arg(long)]
    ramps: Option<u32>,

    /// Signal controller: static, actuated or delay_based
    #[arg(long)]
    signal_type: Option<String>,

    /// Leave every junction priority-controlled
    #[arg(long)]
    unsignalized: bool,

    /// Corridor green-wave speed in km/h
    #[arg(long)]
    progression_speed: Option<f64>,

    /// Flow between two links as FROM:TO:VEHICLES_PER_HOUR (repeatable)
    #[arg(long = "flow")]
    flows: Vec<String>,

    /// Output directory
    #[arg(long, default_value = "output")]
    out: PathBuf,

    /// Scenario name used for file names (defaults to the template key)
    #[arg(long)]
    name: Option<String>,

    /// Simulation end time in seconds
    #[arg(long, default_value = "3600")]
    end: f64,

    /// Simulation step length in seconds
    #[arg(long, default_value = "1.0")]
    step_length: f64,

    /// Also bundle the files into <OUT>/<NAME>.zip
    #[arg(long)]
    zip: bool,
}

#[derive(Args)]
struct WebsterArgs {
    /// Demand per approach in veh/h, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    flows: Vec<f64>,

    /// Saturation flow per approach in veh/h
    #[arg(long, default_value = "1800")]
    saturation: f64,

    /// Lost time per phase in seconds
    #[arg(long, default_value = "3")]
    lost_time: f64,

    #[arg(long, default_value = "3")]
    yellow: u32,

    #[arg(long, default_value = "30")]
    min_cycle: f64,

    #[arg(long, default_value = "180")]
    max_cycle: f64,
}

#[derive(Args)]
struct OffsetArgs {
    /// Common cycle length in seconds
    #[arg(long, default_value = "90")]
    cycle: f64,

    /// Progression speed in km/h
    #[arg(long, default_value = "50")]
    speed: f64,

    /// Distances between consecutive signals in meters, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    distances: Vec<f64>,
}

#[derive(Args)]
struct CapacityArgs {
    #[arg(long, default_value = "90")]
    cycle: f64,

    /// Saturation flow per lane in veh/h
    #[arg(long, default_value = "1800")]
    saturation: f64,

    /// Approach as LANES:GREEN_SECONDS (repeatable)
    #[arg(long = "approach", required = true)]
    approaches: Vec<String>,

    /// Observed or design volume in veh/h
    #[arg(long)]
    volume: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,traffic_scenario=info"),
    )
    .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Templates => run_templates(),
        Command::Generate(args) => run_generate(args),
        Command::Webster(args) => run_webster(args),
        Command::Offsets(args) => run_offsets(args),
        Command::Capacity(args) => run_capacity(args),
    }
}

fn run_templates() -> Result<()> {
    for template in list_templates() {
        info!(
            "{}: {} - {}",
            template.key, template.name, template.description
        );
    }
    Ok(())
}

fn apply_overrides(params: &mut TemplateParams, args: &GenerateArgs) -> Result<()> {
    let signal = if args.unsignalized {
        None
    } else {
        match &args.signal_type {
            Some(kind) => Some(kind.parse::<ControllerKind>()?),
            None => Some(ControllerKind::Static),
        }
    };

    match params {
        TemplateParams::FourWay(p) => {
            p.lanes_per_arm = args.lanes.unwrap_or(p.lanes_per_arm);
            p.arm_length = args.arm_length.unwrap_or(p.arm_length);
            p.speed_limit_kmh = args.speed.unwrap_or(p.speed_limit_kmh);
            p.signal = signal;
        }
        TemplateParams::TJunction(p) => {
            p.lanes_per_arm = args.lanes.unwrap_or(p.lanes_per_arm);
            p.arm_length = args.arm_length.unwrap_or(p.arm_length);
            p.speed_limit_kmh = args.speed.unwrap_or(p.speed_limit_kmh);
            p.signal = signal;
        }
        TemplateParams::Roundabout(p) => {
            p.arm_lanes = args.lanes.unwrap_or(p.arm_lanes);
            p.arm_length = args.arm_length.unwrap_or(p.arm_length);
            p.speed_limit_kmh = args.speed.unwrap_or(p.speed_limit_kmh);
            p.arm_count = args.arms.unwrap_or(p.arm_count);
        }
        TemplateParams::Grid(p) => {
            p.lanes = args.lanes.unwrap_or(p.lanes);
            p.speed_limit_kmh = args.speed.unwrap_or(p.speed_limit_kmh);
            p.rows = args.rows.unwrap_or(p.rows);
            p.cols = args.cols.unwrap_or(p.cols);
            p.signal = signal;
        }
        TemplateParams::Corridor(p) => {
            p.main_lanes = args.lanes.unwrap_or(p.main_lanes);
            p.cross_arm_length = args.arm_length.unwrap_or(p.cross_arm_length);
            p.main_speed_kmh = args.speed.unwrap_or(p.main_speed_kmh);
            p.intersections = args.intersections.unwrap_or(p.intersections);
            p.progression_speed_kmh = args.progression_speed;
            p.signal = signal;
        }
        TemplateParams::Highway(p) => {
            p.lanes = args.lanes.unwrap_or(p.lanes);
            p.speed_limit_kmh = args.speed.unwrap_or(p.speed_limit_kmh);
            p.ramps = args.ramps.unwrap_or(p.ramps);
        }
    }
    Ok(())
}

/// Builds demand from `FROM:TO:VPH` arguments, routing each pair over the network.
fn build_demand(network: &NetworkGraph, flow_args: &[String], end: f64) -> Result<DemandSet> {
    let mut demand = DemandSet::new();
    demand.add_class(VehicleClass::new("car", VehicleCategory::Passenger)?)?;
    for (i, arg) in flow_args.iter().enumerate() {
        let parts: Vec<&str> = arg.split(':').collect();
        let [from, to, rate] = parts.as_slice() else {
            bail!("flow [{arg}] must look like FROM:TO:VEHICLES_PER_HOUR");
        };
        let vehicles_per_hour: f64 = rate
            .parse()
            .with_context(|| format!("flow [{arg}] has a non-numeric rate"))?;
        let route = Route::between(network, format!("route_{i}"), from, to)?;
        let route_id = route.id.clone();
        demand.add_route(route)?;
        demand.add_flow(Flow::new(
            format!("flow_{i}"),
            "car",
            FlowPath::Route(route_id),
            0.0,
            end,
            DemandRate::VehiclesPerHour(vehicles_per_hour),
        )?)?;
    }
    Ok(demand)
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let mut params = TemplateParams::defaults(&args.template)?;
    apply_overrides(&mut params, &args)?;
    let info = params.info();
    info!("Generating {} ({})", info.name, info.key);

    let network = params.generate()?;
    info!("Total junctions: {}", network.junction_count());
    info!("Total links: {}", network.link_count());
    info!("Signal programs: {}", network.programs().len());
    info!(
        "Strongly connected: {}",
        network.is_strongly_connected()?
    );

    let name = args.name.clone().unwrap_or_else(|| info.key.to_string());
    let run_config = RunConfig::new()
        .with_time_window(0.0, args.end, args.step_length)?
        .with_outputs(OutputArtifacts::for_scenario(&name));
    let mut scenario = Scenario::new(&name, network)?.with_run_config(run_config);
    if !args.flows.is_empty() {
        let demand = build_demand(scenario.network(), &args.flows, args.end)?;
        info!(
            "Demand: {} flows, {:.0} veh/h",
            demand.flows().len(),
            demand.total_vehicles_per_hour()
        );
        scenario = scenario.with_demand(demand);
    }

    let files = scenario.render()?;
    let written = files.write_to_dir(&args.out)?;
    for path in written {
        info!("  {}", path.display());
    }
    if args.zip {
        files.write_archive(&args.out.join(format!("{name}.zip")))?;
    }
    info!("SCENARIO COMPLETE: {name}");
    Ok(())
}

fn run_webster(args: WebsterArgs) -> Result<()> {
    let bounds = CycleBounds::new(args.min_cycle, args.max_cycle)?;
    let approaches: Vec<(f64, f64)> = args
        .flows
        .iter()
        .map(|flow| (*flow, args.saturation))
        .collect();
    let timing = webster_for_approaches(args.lost_time, &approaches, bounds)?;

    info!("Cycle length: {:.1} s", timing.cycle_length);
    info!("Total lost time: {:.1} s", timing.total_lost_time);
    for (i, (green, ratio)) in timing.greens.iter().zip(&timing.flow_ratios).enumerate() {
        info!(
            "Approach {}: green {:.1} s, flow ratio {:.2}",
            i + 1,
            green,
            ratio
        );
    }
    info!("Estimated average delay: {}", timing.average_delay());
    for phase in approach_phases(&timing, args.yellow)? {
        info!("  phase {} s {}", phase.duration(), phase.state());
    }
    Ok(())
}

fn run_offsets(args: OffsetArgs) -> Result<()> {
    let offsets = green_wave_offsets(args.cycle, kmh_to_ms(args.speed), &args.distances)?;
    for (i, offset) in offsets.iter().enumerate() {
        info!("Signal {}: offset {:.1} s", i + 1, offset);
    }
    Ok(())
}

fn parse_approach(arg: &str) -> Result<ApproachSupply> {
    let (lanes, green) = arg
        .split_once(':')
        .with_context(|| format!("approach [{arg}] must look like LANES:GREEN"))?;
    Ok(ApproachSupply {
        lanes: lanes
            .parse()
            .with_context(|| format!("approach [{arg}] has a non-numeric lane count"))?,
        green: green
            .parse()
            .with_context(|| format!("approach [{arg}] has a non-numeric green time"))?,
    })
}

fn run_capacity(args: CapacityArgs) -> Result<()> {
    let approaches = args
        .approaches
        .iter()
        .map(|arg| parse_approach(arg))
        .collect::<Result<Vec<_>>>()?;
    let analysis = CapacityAnalysis::new(args.cycle, args.saturation, &approaches)?;

    for (i, capacity) in analysis.approaches.iter().enumerate() {
        info!("Approach {} capacity: {:.0} veh/h", i + 1, capacity);
    }
    info!("Total capacity: {:.0} veh/h", analysis.total);
    for (los, bound) in analysis.los_thresholds() {
        info!("  LOS {los}: up to {bound:.0} veh/h");
    }
    if let Some(volume) = args.volume {
        let los = analysis.los(volume);
        info!(
            "Level of service at {volume:.0} veh/h: {los} ({})",
            los.description()
        );
    }
    Ok(())
}
