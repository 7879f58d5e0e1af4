//! Seeded map generation for offline runs.
//!
//! Maps are symmetric so no seat starts ahead: two-player maps mirror
//! through the center, three- and four-player maps mirror across both
//! axes. Each player starts with three undocked ships.

use crate::rng::SeededRng;
use crate::snapshot::{PlanetRecord, ShipRecord, SnapshotFile};
use anyhow::{anyhow, Result};
use fleet_core::constants::{MAX_PLAYERS, MAX_SHIP_HEALTH, MIN_PLAYERS, NO_OWNER};
use fleet_core::{DockingStatus, PlayerId, Position};

pub const MAP_WIDTH: f64 = 240.0;
pub const MAP_HEIGHT: f64 = 160.0;
pub const STARTING_SHIPS: u32 = 3;

const PLANET_GROUPS: u32 = 6;
const PLACEMENT_ATTEMPTS: u32 = 64;
const PLANET_GAP: f64 = 4.0;
const SPAWN_CLEARANCE: f64 = 12.0;
const EDGE_MARGIN: f64 = 10.0;

fn spawn_points(players: usize) -> Vec<Position> {
    let (w, h) = (MAP_WIDTH, MAP_HEIGHT);
    match players {
        2 => vec![
            Position::new(w * 0.2, h * 0.5),
            Position::new(w * 0.8, h * 0.5),
        ],
        _ => [
            Position::new(w * 0.2, h * 0.2),
            Position::new(w * 0.8, h * 0.8),
            Position::new(w * 0.8, h * 0.2),
            Position::new(w * 0.2, h * 0.8),
        ]
        .into_iter()
        .take(players)
        .collect(),
    }
}

fn mirrored(point: Position, players: usize) -> Vec<Position> {
    let (w, h) = (MAP_WIDTH, MAP_HEIGHT);
    if players == 2 {
        vec![point, Position::new(w - point.x, h - point.y)]
    } else {
        vec![
            point,
            Position::new(w - point.x, point.y),
            Position::new(point.x, h - point.y),
            Position::new(w - point.x, h - point.y),
        ]
    }
}

struct Layout {
    planets: Vec<PlanetRecord>,
    spawns: Vec<Position>,
}

impl Layout {
    fn fits(&self, center: Position, radius: f64) -> bool {
        let inside = center.x - radius >= EDGE_MARGIN
            && center.y - radius >= EDGE_MARGIN
            && center.x + radius <= MAP_WIDTH - EDGE_MARGIN
            && center.y + radius <= MAP_HEIGHT - EDGE_MARGIN;
        inside
            && self.spawns.iter().all(|spawn| spawn.distance_to(center) > radius + SPAWN_CLEARANCE)
            && self.planets.iter().all(|planet| {
                Position::new(planet.x, planet.y).distance_to(center) > planet.radius + radius + PLANET_GAP
            })
    }

    fn add(&mut self, center: Position, radius: f64, docking_spots: u32) {
        let id = self.planets.len() as u32;
        self.planets.push(PlanetRecord {
            id,
            owner: NO_OWNER,
            x: center.x,
            y: center.y,
            radius,
            health: (radius * 255.0).round() as i32,
            docking_spots,
            current_production: 0,
            remaining_production: (radius * 100.0).round() as i32,
            docked_ships: Vec::new(),
        });
    }
}

/// Builds the turn-0 snapshot for `players` seats, seen by player 0.
pub fn generate(seed: u32, players: usize) -> Result<SnapshotFile> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
        return Err(anyhow!(
            "scenario needs {MIN_PLAYERS}..={MAX_PLAYERS} players, got {players}"
        ));
    }

    let mut rng = SeededRng::new(seed);
    let mut layout = Layout {
        planets: Vec::new(),
        spawns: spawn_points(players),
    };

    let center = Position::new(MAP_WIDTH / 2.0, MAP_HEIGHT / 2.0);
    let center_radius = rng.next_between(5.0, 9.0);
    layout.add(center, center_radius, 2 + rng.next_int(5));

    for _ in 0..PLANET_GROUPS {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let radius = rng.next_between(3.0, 8.0);
            let anchor = Position::new(
                rng.next_between(EDGE_MARGIN, MAP_WIDTH / 2.0),
                rng.next_between(EDGE_MARGIN, MAP_HEIGHT - EDGE_MARGIN),
            );
            let copies = mirrored(anchor, players);
            let all_fit = copies.iter().enumerate().all(|(index, copy)| {
                layout.fits(*copy, radius)
                    && copies[..index]
                        .iter()
                        .all(|other| other.distance_to(*copy) > 2.0 * radius + PLANET_GAP)
            });
            if all_fit {
                let docking_spots = 2 + rng.next_int(4);
                for copy in copies {
                    layout.add(copy, radius, docking_spots);
                }
                break;
            }
        }
    }

    let mut ships = Vec::new();
    for (player, spawn) in layout.spawns.iter().enumerate() {
        for index in 0..STARTING_SHIPS {
            ships.push(ShipRecord {
                id: player as u32 * STARTING_SHIPS + index,
                owner: player as PlayerId,
                x: spawn.x,
                y: spawn.y + (index as f64 - 1.0) * 2.0,
                health: MAX_SHIP_HEALTH,
                docking_status: DockingStatus::Undocked,
                docked_planet: None,
                docking_progress: 0,
                weapon_cooldown: 0,
            });
        }
    }

    Ok(SnapshotFile {
        player_id: 0,
        player_count: players,
        turn: 0,
        width: MAP_WIDTH,
        height: MAP_HEIGHT,
        planets: layout.planets,
        ships,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_map() {
        let a = generate(0xDEAD_BEEF, 2).expect("scenario");
        let b = generate(0xDEAD_BEEF, 2).expect("scenario");
        assert_eq!(a, b);
        assert_ne!(a, generate(0xC0FF_EE11, 2).expect("scenario"));
    }

    #[test]
    fn every_seat_gets_three_ships() {
        for players in 2..=4 {
            let map = generate(7, players).expect("scenario");
            for player in 0..players as PlayerId {
                let count = map.ships.iter().filter(|ship| ship.owner == player).count();
                assert_eq!(count, STARTING_SHIPS as usize, "players={players}");
            }
            map.to_world().expect("generated maps validate");
        }
    }

    #[test]
    fn planets_do_not_overlap() {
        let map = generate(0x1234_5678, 4).expect("scenario");
        assert!(map.planets.len() > 1);
        for (i, a) in map.planets.iter().enumerate() {
            for b in &map.planets[i + 1..] {
                let gap = Position::new(a.x, a.y).distance_to(Position::new(b.x, b.y));
                assert!(gap > a.radius + b.radius, "planets {} and {} overlap", a.id, b.id);
            }
        }
    }

    #[test]
    fn player_count_is_checked() {
        assert!(generate(1, 1).is_err());
        assert!(generate(1, 5).is_err());
    }
}
