//! JSON form of a world snapshot, as fed to `fleet-autopilot turn` and as
//! carried between simulated turns.

use anyhow::{Context, Result};
use fleet_core::constants::{MAX_SHIP_HEALTH, NO_OWNER};
use fleet_core::{DockingStatus, Planet, PlanetId, PlayerId, Position, Ship, ShipId, TurnParams, World};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn unowned() -> PlayerId {
    NO_OWNER
}

fn full_health() -> i32 {
    MAX_SHIP_HEALTH
}

fn planet_health() -> i32 {
    2_000
}

fn undocked() -> DockingStatus {
    DockingStatus::Undocked
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanetRecord {
    pub id: PlanetId,
    #[serde(default = "unowned")]
    pub owner: PlayerId,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    #[serde(default = "planet_health")]
    pub health: i32,
    pub docking_spots: u32,
    #[serde(default)]
    pub current_production: i32,
    #[serde(default)]
    pub remaining_production: i32,
    #[serde(default)]
    pub docked_ships: Vec<ShipId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipRecord {
    pub id: ShipId,
    pub owner: PlayerId,
    pub x: f64,
    pub y: f64,
    #[serde(default = "full_health")]
    pub health: i32,
    #[serde(default = "undocked")]
    pub docking_status: DockingStatus,
    #[serde(default)]
    pub docked_planet: Option<PlanetId>,
    #[serde(default)]
    pub docking_progress: u32,
    #[serde(default)]
    pub weapon_cooldown: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub player_id: PlayerId,
    pub player_count: usize,
    pub turn: u32,
    pub width: f64,
    pub height: f64,
    pub planets: Vec<PlanetRecord>,
    pub ships: Vec<ShipRecord>,
}

impl SnapshotFile {
    pub fn params(&self) -> TurnParams {
        TurnParams {
            player_id: self.player_id,
            player_count: self.player_count,
            turn: self.turn,
            width: self.width,
            height: self.height,
        }
    }

    /// Validated world for the agent. Fails on any inconsistency.
    pub fn to_world(&self) -> Result<World> {
        let planets = self
            .planets
            .iter()
            .map(|record| Planet {
                id: record.id,
                owner: record.owner,
                position: Position::new(record.x, record.y),
                health: record.health,
                radius: record.radius,
                docking_spots: record.docking_spots,
                current_production: record.current_production,
                remaining_production: record.remaining_production,
                docked_ships: record.docked_ships.clone(),
                nearby_enemies: Vec::new(),
            })
            .collect();
        let ships = self
            .ships
            .iter()
            .map(|record| Ship {
                id: record.id,
                owner: record.owner,
                position: Position::new(record.x, record.y),
                health: record.health,
                docking_status: record.docking_status,
                docked_planet: record.docked_planet,
                docking_progress: record.docking_progress,
                weapon_cooldown: record.weapon_cooldown,
            })
            .collect();
        World::new(self.params(), planets, ships)
            .with_context(|| format!("malformed snapshot for turn {}", self.turn))
    }

    pub fn planet_mut(&mut self, id: PlanetId) -> Option<&mut PlanetRecord> {
        self.planets.iter_mut().find(|planet| planet.id == id)
    }

    pub fn ship_mut(&mut self, id: ShipId) -> Option<&mut ShipRecord> {
        self.ships.iter_mut().find(|ship| ship.id == id)
    }

    pub fn planets_owned_by(&self, player: PlayerId) -> usize {
        self.planets
            .iter()
            .filter(|planet| planet.owner == player)
            .count()
    }
}

pub fn load_snapshot(path: &Path) -> Result<SnapshotFile> {
    let data = fs::read(path).with_context(|| format!("failed reading snapshot {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("failed parsing snapshot {}", path.display()))
}
