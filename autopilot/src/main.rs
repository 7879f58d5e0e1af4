use anyhow::Result;
use autopilot::benchmark::{run_benchmark, BenchmarkConfig};
use autopilot::runner::run_scenario;
use autopilot::snapshot::load_snapshot;
use autopilot::util::{generate_seeds, load_config, parse_seed, seed_to_hex, write_json};
use clap::{Args, Parser, Subcommand};
use fleet_core::Agent;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fleet-autopilot")]
#[command(about = "Fleet agent: plan a turn from a snapshot, or play and benchmark seeded maps")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Config file path (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use a named preset instead of a config file
    #[arg(long)]
    preset: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan one turn for a snapshot and print the commands as JSON
    Turn {
        #[arg(long)]
        snapshot: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Play a generated map for a number of turns
    Run {
        /// Map seed (hex, e.g. 0xDEADBEEF, or decimal)
        #[arg(long)]
        seed: String,

        #[arg(long, default_value = "100")]
        turns: u32,

        #[arg(long, default_value = "2")]
        players: usize,

        #[command(flatten)]
        config: ConfigArgs,

        /// Write the full run artifact (per-turn commands, final state)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Benchmark across multiple seeds
    Bench {
        /// Number of seeds
        #[arg(long, default_value = "8")]
        seed_count: usize,

        /// Starting seed
        #[arg(long, default_value = "0xDEADBEEF")]
        base_seed: String,

        #[arg(long, default_value = "100")]
        turns: u32,

        #[arg(long, default_value = "2")]
        players: usize,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output directory
        #[arg(long, default_value = "bench-output")]
        out_dir: PathBuf,

        /// Parallel jobs (default: all cores)
        #[arg(long)]
        jobs: Option<usize>,
    },

    /// Print the effective config as JSON
    ShowConfig {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

impl ConfigArgs {
    fn load(&self) -> Result<fleet_core::AgentConfig> {
        load_config(self.config.as_deref(), self.preset.as_deref())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Turn { snapshot, config } => {
            let cfg = config.load()?;
            let world = load_snapshot(&snapshot)?.to_world()?;
            let mut agent = Agent::new(cfg);
            let report = agent.play_turn(world);
            println!("{}", serde_json::to_string_pretty(&report.commands)?);
        }

        Command::Run {
            seed,
            turns,
            players,
            config,
            output,
        } => {
            let cfg = config.load()?;
            let seed = parse_seed(&seed)?;
            let artifact = run_scenario(&cfg, seed, players, turns)?;
            let metrics = &artifact.metrics;

            println!("config={}", metrics.config_id);
            println!("seed={}", seed_to_hex(seed));
            println!("players={}", metrics.players);
            println!("turns={}", metrics.turns);
            println!("commands={}", metrics.commands);
            println!("docks={}", metrics.docks);
            println!("stalled_units={}", metrics.stalled_units);
            println!("collisions={}", metrics.collisions);
            println!("planets_owned={}", metrics.planets_owned);
            println!("command_digest={:#010x}", metrics.command_digest);

            if let Some(path) = output {
                write_json(&path, &artifact)?;
                println!("output={}", path.display());
            }
        }

        Command::Bench {
            seed_count,
            base_seed,
            turns,
            players,
            config,
            out_dir,
            jobs,
        } => {
            let cfg = config.load()?;
            let base = parse_seed(&base_seed)?;
            let seeds = generate_seeds(base, seed_count);

            eprintln!(
                "Benchmarking {} with {} seeds, players={} turns={}",
                cfg.id, seed_count, players, turns
            );

            let report = run_benchmark(BenchmarkConfig {
                agent_config: cfg,
                seeds,
                players,
                turns,
                out_dir: out_dir.clone(),
                jobs,
            })?;

            eprintln!(
                "avg_planets={:.2} max_planets={} avg_docked={:.1} collisions={} rejected={}",
                report.avg_planets_owned,
                report.max_planets_owned,
                report.avg_docked_ships,
                report.total_collisions,
                report.total_rejected,
            );
            eprintln!("report saved to {}/summary.json", out_dir.display());
        }

        Command::ShowConfig { config } => {
            let cfg = config.load()?;
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
    }

    Ok(())
}
