//! Minimal kinematic turn step for offline runs.
//!
//! Only what the agent needs to see its own decisions play out: thrusts
//! move ships, docks claim planets. There is no combat, production or
//! undocking, and opponents stay idle. Collisions are reported, not
//! resolved.

use crate::snapshot::SnapshotFile;
use fleet_core::constants::{DOCK_RADIUS, NO_OWNER, SHIP_RADIUS};
use fleet_core::{Command, CommandKind, DockingStatus, PlanetId, PlayerId, Position, ShipId, Thrust};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Collision {
    Ships { a: ShipId, b: ShipId },
    Planet { ship: ShipId, planet: PlanetId },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StepOutcome {
    pub thrusts: u32,
    pub docks: u32,
    /// Commands for ships that are not `player`'s, not undocked, or could
    /// not legally dock.
    pub rejected: u32,
    pub collisions: Vec<Collision>,
}

/// Applies `player`'s commands to `state` and advances the turn counter.
pub fn apply_commands(state: &mut SnapshotFile, player: PlayerId, commands: &[Command]) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    for command in commands {
        let Some(ship) = state.ships.iter().find(|ship| ship.id == command.ship) else {
            outcome.rejected += 1;
            continue;
        };
        if ship.owner != player || ship.docking_status != DockingStatus::Undocked {
            outcome.rejected += 1;
            continue;
        }
        let from = Position::new(ship.x, ship.y);

        match command.kind {
            CommandKind::Thrust { bearing, magnitude } => {
                let to = Thrust { bearing, magnitude }.destination(from);
                if let Some(ship) = state.ship_mut(command.ship) {
                    ship.x = to.x;
                    ship.y = to.y;
                }
                outcome.thrusts += 1;
            }
            CommandKind::Dock { planet } => {
                if dock(state, player, command.ship, from, planet) {
                    outcome.docks += 1;
                } else {
                    outcome.rejected += 1;
                }
            }
        }
    }

    outcome.collisions = collisions(state, player);
    state.turn += 1;
    if outcome.rejected > 0 {
        tracing::warn!(turn = state.turn, rejected = outcome.rejected, "sim rejected commands");
    }
    outcome
}

fn dock(state: &mut SnapshotFile, player: PlayerId, ship_id: ShipId, from: Position, planet_id: PlanetId) -> bool {
    let Some(planet) = state.planet_mut(planet_id) else {
        return false;
    };
    let reach = SHIP_RADIUS + DOCK_RADIUS + planet.radius;
    let claimable = planet.owner == NO_OWNER || planet.owner == player;
    let has_room = (planet.docked_ships.len() as u32) < planet.docking_spots;
    if !claimable || !has_room || from.distance_to(Position::new(planet.x, planet.y)) > reach {
        return false;
    }
    planet.owner = player;
    planet.docked_ships.push(ship_id);

    if let Some(ship) = state.ship_mut(ship_id) {
        ship.docking_status = DockingStatus::Docked;
        ship.docked_planet = Some(planet_id);
    }
    true
}

fn collisions(state: &SnapshotFile, player: PlayerId) -> Vec<Collision> {
    let own: Vec<_> = state
        .ships
        .iter()
        .filter(|ship| ship.owner == player)
        .collect();
    let mut found = Vec::new();

    for (i, a) in own.iter().enumerate() {
        let at = Position::new(a.x, a.y);
        for b in &own[i + 1..] {
            if at.distance_to(Position::new(b.x, b.y)) < 2.0 * SHIP_RADIUS {
                found.push(Collision::Ships { a: a.id, b: b.id });
            }
        }
        if a.docking_status != DockingStatus::Undocked {
            continue;
        }
        for planet in &state.planets {
            if at.distance_to(Position::new(planet.x, planet.y)) < planet.radius + SHIP_RADIUS {
                found.push(Collision::Planet {
                    ship: a.id,
                    planet: planet.id,
                });
            }
        }
    }
    found
}
