use clap::Parser;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use elevator_sim::simulation::{CarId, Direction, Phase, SimBuilding, SimConfig, SimEvent};

#[derive(Parser)]
#[command(name = "elevator_sim")]
#[command(about = "Elevator dispatch simulation with random call traffic")]
struct Cli {
    /// Number of floors in the building
    #[arg(long, default_value = "10")]
    floors: usize,

    /// Number of elevator cars
    #[arg(long, default_value = "2")]
    cars: usize,

    /// Number of ticks to generate traffic for
    #[arg(long, default_value = "300")]
    ticks: u64,

    /// Ticks a car spends traveling between adjacent floors
    #[arg(long, default_value = "1")]
    ticks_per_floor: u32,

    /// Ticks the doors stay open after serving a floor
    #[arg(long, default_value = "2")]
    door_hold_ticks: u32,

    /// Probability of a new hall call per tick
    #[arg(long, default_value = "0.2")]
    call_rate: f64,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Print a summary and shaft map every N ticks (0 disables)
    #[arg(long, default_value = "50")]
    summary_every: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    run_headless(cli)
}

/// Run the simulation headless with randomly generated call traffic
fn run_headless(cli: Cli) -> anyhow::Result<()> {
    let config = SimConfig {
        total_floors: cli.floors,
        car_count: cli.cars,
        ticks_per_floor: cli.ticks_per_floor,
        door_hold_ticks: cli.door_hold_ticks,
    };
    let mut building = SimBuilding::new(config)?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!("Running elevator simulation in headless mode...");
    println!(
        "Floors: {}, Cars: {}, Ticks: {}, Call rate: {}",
        cli.floors, cli.cars, cli.ticks, cli.call_rate
    );
    println!();

    for tick in 1..=cli.ticks {
        if rng.random_bool(cli.call_rate) {
            let (floor, direction) = random_call(&mut rng, cli.floors);
            building.request_pickup(floor, direction)?;
        }

        building.tick();
        process_events(&mut building, &mut rng, cli.floors)?;

        if cli.summary_every > 0 && tick % cli.summary_every == 0 {
            println!("--- After tick {} ---", tick);
            building.print_summary();
            building.draw_shaft();
        }
    }

    // Let in-flight requests finish before reporting
    let mut extra = 0u64;
    while !building.is_quiescent() && extra < 10_000 {
        building.tick();
        process_events(&mut building, &mut rng, cli.floors)?;
        extra += 1;
    }

    println!("=== Final State ===");
    building.print_summary();
    building.draw_shaft();

    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks elapsed: {}", building.now());
    info!("Hall calls received: {}", building.stats.calls_received);
    info!("Hall calls served: {}", building.stats.calls_served);
    info!("Cab requests: {}", building.stats.cab_requests);
    info!("Floors traveled: {}", building.stats.floors_traveled);

    Ok(())
}

/// Pick a random floor and a direction that makes sense there
fn random_call(rng: &mut StdRng, total_floors: usize) -> (usize, Direction) {
    let floor = rng.random_range(0..total_floors);
    let direction = if floor == 0 {
        Direction::Up
    } else if floor == total_floors - 1 {
        Direction::Down
    } else if rng.random_bool(0.5) {
        Direction::Up
    } else {
        Direction::Down
    };
    (floor, direction)
}

/// Drain events; whenever a car opens its doors, a boarding rider may press
/// an in-car button for some other floor
fn process_events(
    building: &mut SimBuilding,
    rng: &mut StdRng,
    total_floors: usize,
) -> anyhow::Result<()> {
    let mut boardings: Vec<(CarId, usize)> = Vec::new();

    for event in building.drain_events() {
        debug!("{:?}", event);
        if let SimEvent::PhaseChanged {
            car,
            phase: Phase::DoorsOpen,
            ..
        } = event
        {
            if rng.random_bool(0.7) {
                let here = building
                    .car(car)
                    .map(|c| c.current_floor)
                    .unwrap_or_default();
                let mut destination = rng.random_range(0..total_floors);
                if destination == here {
                    destination = (destination + 1) % total_floors;
                }
                boardings.push((car, destination));
            }
        }
    }

    for (car, destination) in boardings {
        building.request_from_car(car, destination)?;
    }
    Ok(())
}
