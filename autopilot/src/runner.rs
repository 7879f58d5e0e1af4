use crate::scenario;
use crate::sim::{apply_commands, StepOutcome};
use crate::snapshot::SnapshotFile;
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use fleet_core::{Agent, AgentConfig, Command, CommandKind};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub config_id: String,
    pub seed: u32,
    pub players: usize,
    pub turns: u32,
    pub commands: u32,
    pub thrusts: u32,
    pub docks: u32,
    pub rejected: u32,
    pub unplaced_units: u32,
    pub stalled_units: u32,
    pub collisions: u32,
    pub planets_owned: usize,
    pub docked_ships: usize,
    /// FNV-1a over every command issued, in order.
    pub command_digest: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct TurnLog {
    pub turn: u32,
    pub commands: Vec<Command>,
    pub outcome: StepOutcome,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    pub turns: Vec<TurnLog>,
    pub final_state: SnapshotFile,
}

const FNV_OFFSET: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

fn fnv1a(mut hash: u32, bytes: &[u8]) -> u32 {
    for byte in bytes {
        hash ^= *byte as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn digest_command(hash: u32, command: &Command) -> u32 {
    let hash = fnv1a(hash, &command.ship.to_le_bytes());
    match command.kind {
        CommandKind::Thrust { bearing, magnitude } => {
            let hash = fnv1a(hash, &[b't']);
            let hash = fnv1a(hash, &bearing.to_le_bytes());
            fnv1a(hash, &magnitude.to_le_bytes())
        }
        CommandKind::Dock { planet } => {
            let hash = fnv1a(hash, &[b'd']);
            fnv1a(hash, &planet.to_le_bytes())
        }
    }
}

/// Plays `turns` turns of a generated map as player 0.
pub fn run_scenario(cfg: &AgentConfig, seed: u32, players: usize, turns: u32) -> Result<RunArtifact> {
    if turns == 0 {
        return Err(anyhow!("turns must be > 0"));
    }

    let mut state = scenario::generate(seed, players)?;
    let mut agent = Agent::new(cfg.clone());
    let player = state.player_id;

    let mut metrics = RunMetrics {
        config_id: cfg.id.clone(),
        seed,
        players,
        turns,
        commands: 0,
        thrusts: 0,
        docks: 0,
        rejected: 0,
        unplaced_units: 0,
        stalled_units: 0,
        collisions: 0,
        planets_owned: 0,
        docked_ships: 0,
        command_digest: FNV_OFFSET,
    };
    let mut logs = Vec::with_capacity(turns as usize);

    for _ in 0..turns {
        let turn = state.turn;
        let world = state
            .to_world()
            .with_context(|| format!("seed={seed:#x} turn={turn}"))?;
        let report = agent.play_turn(world);
        let outcome = apply_commands(&mut state, player, &report.commands);

        for command in &report.commands {
            metrics.command_digest = digest_command(metrics.command_digest, command);
        }
        metrics.commands += report.commands.len() as u32;
        metrics.unplaced_units += report.unplaced.len() as u32;
        metrics.stalled_units += report.stalled.len() as u32;
        metrics.thrusts += outcome.thrusts;
        metrics.docks += outcome.docks;
        metrics.rejected += outcome.rejected;
        metrics.collisions += outcome.collisions.len() as u32;

        logs.push(TurnLog {
            turn,
            commands: report.commands,
            outcome,
        });
    }

    metrics.planets_owned = state.planets_owned_by(player);
    metrics.docked_ships = state
        .ships
        .iter()
        .filter(|ship| ship.owner == player && ship.docked_planet.is_some())
        .count();
    tracing::info!(
        seed = %seed_to_hex(seed),
        planets = metrics.planets_owned,
        docks = metrics.docks,
        collisions = metrics.collisions,
        "run finished"
    );

    Ok(RunArtifact {
        metrics,
        turns: logs,
        final_state: state,
    })
}
