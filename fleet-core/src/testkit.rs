//! Snapshot builders shared by the unit tests.

use crate::geometry::Position;
use crate::world::{DockingStatus, Planet, PlanetId, PlayerId, Ship, ShipId, TurnParams, World};

pub(crate) fn params(player_count: usize, turn: u32) -> TurnParams {
    TurnParams {
        player_id: 0,
        player_count,
        turn,
        width: 240.0,
        height: 160.0,
    }
}

pub(crate) fn planet(id: PlanetId, owner: PlayerId, x: f64, y: f64, radius: f64, spots: u32) -> Planet {
    Planet {
        id,
        owner,
        position: Position::new(x, y),
        health: 2000,
        radius,
        docking_spots: spots,
        current_production: 0,
        remaining_production: 1000,
        docked_ships: Vec::new(),
        nearby_enemies: Vec::new(),
    }
}

pub(crate) fn docked(mut planet: Planet, ships: &[ShipId]) -> Planet {
    planet.docked_ships = ships.to_vec();
    planet
}

pub(crate) fn ship(id: ShipId, owner: PlayerId, x: f64, y: f64) -> Ship {
    Ship {
        id,
        owner,
        position: Position::new(x, y),
        health: 255,
        docking_status: DockingStatus::Undocked,
        docked_planet: None,
        docking_progress: 0,
        weapon_cooldown: 0,
    }
}

pub(crate) fn docked_ship(id: ShipId, owner: PlayerId, x: f64, y: f64, planet: PlanetId) -> Ship {
    Ship {
        docking_status: DockingStatus::Docked,
        docked_planet: Some(planet),
        ..ship(id, owner, x, y)
    }
}

pub(crate) fn world_with(params: TurnParams, planets: Vec<Planet>, ships: Vec<Ship>) -> World {
    World::new(params, planets, ships).expect("test snapshot must be valid")
}

pub(crate) fn world(planets: Vec<Planet>, ships: Vec<Ship>) -> World {
    world_with(params(2, 1), planets, ships)
}
