use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use junction_scheduler::simulation::{
    poll_traffic_dir, ArrivalGenerator, CycleReport, LaneId, PriorityRule, Scheduler,
    SchedulerConfig, Timestamp,
};

#[derive(Parser)]
#[command(name = "junction_scheduler")]
#[command(about = "Lane priority scheduler for a four-way junction")]
struct Cli {
    /// Number of scheduling cycles to run
    #[arg(long, default_value = "100")]
    ticks: u32,

    /// Time per cycle in milliseconds
    #[arg(long, default_value = "2000")]
    cycle_ms: u64,

    /// Seed for reproducible synthetic arrivals
    #[arg(long)]
    seed: Option<u64>,

    /// Synthetic arrivals generated before each cycle
    #[arg(long, default_value = "3")]
    arrivals_per_tick: usize,

    /// Lane that follows the surge rule (A, B, C, D or AL2..DL2)
    #[arg(long, default_value = "A")]
    designated: LaneId,

    /// Priority rule for the designated lane
    #[arg(long, value_enum, default_value_t = PriorityRule::Hysteresis)]
    priority_rule: PriorityRule,

    /// Read arrivals from lane files in this directory instead of generating them
    #[arg(long)]
    traffic_dir: Option<PathBuf>,

    /// Leave lane files intact after reading them
    #[arg(long)]
    keep_files: bool,

    /// Log queue lengths and priorities every N cycles (0 disables)
    #[arg(long, default_value = "10")]
    summary_every: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,junction_scheduler=info"),
    )
    .init();

    let cli = Cli::parse();

    if u64::from(cli.ticks).checked_mul(cli.cycle_ms).is_none() {
        bail!(
            "--ticks {} x --cycle-ms {} overflows the millisecond clock",
            cli.ticks,
            cli.cycle_ms
        );
    }

    let config = SchedulerConfig::default()
        .with_designated_lane(cli.designated)
        .with_priority_rule(cli.priority_rule);
    let scheduler = Scheduler::new(config);

    match cli.traffic_dir.clone() {
        Some(dir) => run_from_files(scheduler, &cli, dir),
        None => run_headless(scheduler, &cli),
    }
}

/// Drive the scheduler with synthetic arrivals on a simulated clock
fn run_headless(mut scheduler: Scheduler, cli: &Cli) -> Result<()> {
    info!("Running junction scheduler in headless mode...");
    info!(
        "Cycles: {}, cycle time: {}ms, arrivals per cycle: {}",
        cli.ticks, cli.cycle_ms, cli.arrivals_per_tick
    );

    let mut generator = match cli.seed {
        Some(seed) => ArrivalGenerator::new_with_seed(seed),
        None => ArrivalGenerator::new(),
    };

    for tick in 1..=cli.ticks {
        let now: Timestamp = u64::from(tick)
            .checked_mul(cli.cycle_ms)
            .context("Simulated clock overflowed")?;
        scheduler.ingest_all(generator.batch(cli.arrivals_per_tick, now));

        let report = scheduler
            .run_cycle(now)
            .with_context(|| format!("Scheduler invariant broken in cycle {}", tick))?;
        maybe_log_state(cli, &report);
    }

    scheduler.stats().log_summary();
    Ok(())
}

/// Drive the scheduler from lane files on the wall clock
fn run_from_files(mut scheduler: Scheduler, cli: &Cli, dir: PathBuf) -> Result<()> {
    info!("Polling lane files in {}", dir.display());

    for tick in 1..=cli.ticks {
        let arrivals = poll_traffic_dir(&dir, !cli.keep_files)?;
        let accepted = scheduler.ingest_all(arrivals);
        if accepted > 0 {
            info!("Ingested {} arrivals", accepted);
        }

        let report = scheduler
            .run_cycle(wall_clock_ms()?)
            .with_context(|| format!("Scheduler invariant broken in cycle {}", tick))?;
        maybe_log_state(cli, &report);

        if tick < cli.ticks {
            std::thread::sleep(Duration::from_millis(cli.cycle_ms));
        }
    }

    scheduler.stats().log_summary();
    Ok(())
}

fn maybe_log_state(cli: &Cli, report: &CycleReport) {
    if cli.summary_every == 0 || report.cycle % u64::from(cli.summary_every) != 0 {
        return;
    }
    info!("--- After cycle {} ---", report.cycle);
    for lane in LaneId::ALL {
        info!(
            "  {}: waiting={}, priority={}",
            lane,
            report.remaining_counts.get(&lane).copied().unwrap_or(0),
            report.priorities.get(&lane).copied().unwrap_or(0)
        );
    }
}

fn wall_clock_ms() -> Result<Timestamp> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is before the Unix epoch")?;
    Timestamp::try_from(elapsed.as_millis())
        .context("Wall clock does not fit in u64 milliseconds")
}
