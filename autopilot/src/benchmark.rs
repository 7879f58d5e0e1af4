use crate::runner::{run_scenario, RunMetrics};
use crate::util::{seed_to_hex, write_json};
use anyhow::{anyhow, Context, Result};
use fleet_core::AgentConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub agent_config: AgentConfig,
    pub seeds: Vec<u32>,
    pub players: usize,
    pub turns: u32,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub seed: u32,
    pub seed_hex: String,
    pub commands: u32,
    pub docks: u32,
    pub rejected: u32,
    pub unplaced_units: u32,
    pub stalled_units: u32,
    pub collisions: u32,
    pub planets_owned: usize,
    pub docked_ships: usize,
    pub command_digest: u32,
}

impl From<&RunMetrics> for RunRecord {
    fn from(metrics: &RunMetrics) -> Self {
        Self {
            seed: metrics.seed,
            seed_hex: seed_to_hex(metrics.seed),
            commands: metrics.commands,
            docks: metrics.docks,
            rejected: metrics.rejected,
            unplaced_units: metrics.unplaced_units,
            stalled_units: metrics.stalled_units,
            collisions: metrics.collisions,
            planets_owned: metrics.planets_owned,
            docked_ships: metrics.docked_ships,
            command_digest: metrics.command_digest,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub config_id: String,
    pub players: usize,
    pub turns: u32,
    pub jobs: Option<usize>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub avg_planets_owned: f64,
    pub max_planets_owned: usize,
    pub avg_docked_ships: f64,
    pub avg_stalled_units: f64,
    pub total_collisions: u32,
    pub total_rejected: u32,
    pub runs: Vec<RunRecord>,
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
        }
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let run_one = |seed: &u32| -> Result<RunMetrics> {
        let artifact = run_scenario(&config.agent_config, *seed, config.players, config.turns)
            .with_context(|| format!("benchmark run failed for seed={seed:#x}"))?;
        Ok(artifact.metrics)
    };

    let run_results: Vec<Result<RunMetrics>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| config.seeds.par_iter().map(run_one).collect())
    } else {
        config.seeds.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(run_results.len());
    for result in run_results {
        runs.push(result?);
    }

    let run_count = runs.len();
    let sum_planets: usize = runs.iter().map(|m| m.planets_owned).sum();
    let sum_docked: usize = runs.iter().map(|m| m.docked_ships).sum();
    let sum_stalled: u64 = runs.iter().map(|m| m.stalled_units as u64).sum();

    let mut records: Vec<RunRecord> = runs.iter().map(RunRecord::from).collect();
    records.sort_by(|a, b| {
        b.planets_owned
            .cmp(&a.planets_owned)
            .then_with(|| a.collisions.cmp(&b.collisions))
            .then_with(|| a.seed.cmp(&b.seed))
    });

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default(),
        config_id: config.agent_config.id.clone(),
        players: config.players,
        turns: config.turns,
        jobs: config.jobs,
        seeds: config.seeds.clone(),
        run_count,
        avg_planets_owned: sum_planets as f64 / run_count as f64,
        max_planets_owned: runs.iter().map(|m| m.planets_owned).max().unwrap_or_default(),
        avg_docked_ships: sum_docked as f64 / run_count as f64,
        avg_stalled_units: sum_stalled as f64 / run_count as f64,
        total_collisions: runs.iter().map(|m| m.collisions).sum(),
        total_rejected: runs.iter().map(|m| m.rejected).sum(),
        runs: records,
    };

    write_json(&config.out_dir.join("summary.json"), &report)?;
    Ok(report)
}
