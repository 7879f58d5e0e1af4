//! Per-turn world snapshot and the queries the agent runs against it.
//!
//! A [`World`] is rebuilt from scratch every turn. Nothing outside this
//! module may hold a reference into last turn's snapshot; persistent state
//! refers to planets and ships by id only.

use crate::constants::{DOCK_RADIUS, MAX_PLAYERS, MIN_PLAYERS, NO_OWNER, SHIP_RADIUS};
use crate::error::SnapshotError;
use crate::geometry::{segment_circle_intersect, Circle, Position};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub type PlanetId = u32;
pub type ShipId = u32;
pub type PlayerId = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityId {
    Planet(PlanetId),
    Ship(ShipId),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planet(id) => write!(f, "planet {id}"),
            Self::Ship(id) => write!(f, "ship {id}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockingStatus {
    Undocked,
    Docking,
    Docked,
    Undocking,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Planet {
    pub id: PlanetId,
    pub owner: PlayerId,
    pub position: Position,
    pub health: i32,
    pub radius: f64,
    pub docking_spots: u32,
    pub current_production: i32,
    pub remaining_production: i32,
    pub docked_ships: Vec<ShipId>,
    /// Enemy ships within `radius + nearby_enemy_radius`, ascending id.
    /// Empty until [`World::scan_nearby_enemies`] runs for the turn.
    pub nearby_enemies: Vec<ShipId>,
}

impl Planet {
    pub fn is_owned(&self) -> bool {
        self.owner != NO_OWNER
    }

    pub fn is_full(&self) -> bool {
        self.docked_ships.len() as u32 >= self.docking_spots
    }

    pub fn free_spots(&self) -> u32 {
        self.docking_spots.saturating_sub(self.docked_ships.len() as u32)
    }

    pub fn docked_ratio(&self) -> f64 {
        if self.docking_spots == 0 {
            return 1.0;
        }
        self.docked_ships.len() as f64 / self.docking_spots as f64
    }

    pub fn free_ratio(&self) -> f64 {
        1.0 - self.docked_ratio()
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub id: ShipId,
    pub owner: PlayerId,
    pub position: Position,
    pub health: i32,
    pub docking_status: DockingStatus,
    pub docked_planet: Option<PlanetId>,
    pub docking_progress: u32,
    pub weapon_cooldown: u32,
}

impl Ship {
    pub fn circle(&self) -> Circle {
        Circle::new(self.position, SHIP_RADIUS)
    }

    pub fn is_undocked(&self) -> bool {
        self.docking_status == DockingStatus::Undocked
    }

    /// Within `distance` of the planet's surface, measured edge to edge.
    pub fn within_distance(&self, planet: &Planet, distance: f64) -> bool {
        self.position.distance_to(planet.position) <= SHIP_RADIUS + distance + planet.radius
    }

    pub fn can_dock(&self, planet: &Planet) -> bool {
        self.within_distance(planet, DOCK_RADIUS)
    }
}

/// Turn-level facts that are not entities.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnParams {
    pub player_id: PlayerId,
    pub player_count: usize,
    pub turn: u32,
    pub width: f64,
    pub height: f64,
}

/// Which entity kinds block a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleFilter {
    /// Planets and every ship.
    All,
    /// Planets and own ships only; enemy ships are ignored (ramming).
    PlanetsAndOwnShips,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetTally {
    pub total: usize,
    /// Unowned planets, free for anyone to settle.
    pub free: usize,
    pub own: usize,
    pub enemy: usize,
}

#[derive(Clone, Debug)]
pub struct World {
    params: TurnParams,
    planets: BTreeMap<PlanetId, Planet>,
    ships: BTreeMap<ShipId, Ship>,
}

impl World {
    /// Builds and validates a snapshot. Any inconsistency is fatal for the
    /// turn: the caller must not try to play on a world it cannot trust.
    pub fn new(params: TurnParams, planets: Vec<Planet>, ships: Vec<Ship>) -> Result<Self, SnapshotError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&params.player_count) {
            return Err(SnapshotError::InvalidPlayerCount {
                count: params.player_count,
            });
        }
        let player_range = 0..params.player_count as PlayerId;
        if !player_range.contains(&params.player_id) {
            return Err(SnapshotError::PlayerOutOfRange {
                player_id: params.player_id,
                player_count: params.player_count,
            });
        }

        let mut ship_map = BTreeMap::new();
        for ship in ships {
            let entity = EntityId::Ship(ship.id);
            if !player_range.contains(&ship.owner) {
                return Err(SnapshotError::OwnerOutOfRange {
                    entity,
                    owner: ship.owner,
                });
            }
            if !ship.position.is_finite() {
                return Err(SnapshotError::NonFiniteGeometry { entity });
            }
            let id = ship.id;
            if ship_map.insert(id, ship).is_some() {
                return Err(SnapshotError::DuplicateShip { id });
            }
        }

        let mut planet_map = BTreeMap::new();
        for mut planet in planets {
            let entity = EntityId::Planet(planet.id);
            if planet.owner != NO_OWNER && !player_range.contains(&planet.owner) {
                return Err(SnapshotError::OwnerOutOfRange {
                    entity,
                    owner: planet.owner,
                });
            }
            if !planet.position.is_finite() || !planet.radius.is_finite() || planet.radius < 0.0 {
                return Err(SnapshotError::NonFiniteGeometry { entity });
            }
            if planet.docked_ships.len() > planet.docking_spots as usize {
                return Err(SnapshotError::InvalidDockingSpots {
                    planet: planet.id,
                    spots: planet.docking_spots,
                    docked: planet.docked_ships.len(),
                });
            }
            for ship_id in &planet.docked_ships {
                let ship = ship_map
                    .get(ship_id)
                    .ok_or(SnapshotError::UnknownDockedShip {
                        planet: planet.id,
                        ship: *ship_id,
                    })?;
                if ship.owner != planet.owner {
                    return Err(SnapshotError::DockedShipNotOwner {
                        planet: planet.id,
                        ship: ship.id,
                        ship_owner: ship.owner,
                        planet_owner: planet.owner,
                    });
                }
            }
            planet.nearby_enemies.clear();
            let id = planet.id;
            if planet_map.insert(id, planet).is_some() {
                return Err(SnapshotError::DuplicatePlanet { id });
            }
        }

        Ok(Self {
            params,
            planets: planet_map,
            ships: ship_map,
        })
    }

    pub fn params(&self) -> &TurnParams {
        &self.params
    }

    pub fn player_id(&self) -> PlayerId {
        self.params.player_id
    }

    pub fn player_count(&self) -> usize {
        self.params.player_count
    }

    pub fn turn(&self) -> u32 {
        self.params.turn
    }

    pub fn is_own(&self, owner: PlayerId) -> bool {
        owner == self.params.player_id
    }

    pub fn is_enemy(&self, owner: PlayerId) -> bool {
        owner != NO_OWNER && owner != self.params.player_id
    }

    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(&id)
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(&id)
    }

    /// All planets, ascending id.
    pub fn planets(&self) -> impl Iterator<Item = &Planet> + '_ {
        self.planets.values()
    }

    /// All ships, ascending id.
    pub fn ships(&self) -> impl Iterator<Item = &Ship> + '_ {
        self.ships.values()
    }

    pub fn ships_of(&self, owner: PlayerId) -> impl Iterator<Item = &Ship> + '_ {
        self.ships.values().filter(move |ship| ship.owner == owner)
    }

    pub fn own_ships(&self) -> impl Iterator<Item = &Ship> + '_ {
        self.ships_of(self.params.player_id)
    }

    pub fn enemy_ships(&self) -> impl Iterator<Item = &Ship> + '_ {
        let me = self.params.player_id;
        self.ships.values().filter(move |ship| ship.owner != me)
    }

    pub fn own_ship_count(&self) -> usize {
        self.own_ships().count()
    }

    pub fn enemy_ship_count(&self) -> usize {
        self.enemy_ships().count()
    }

    pub fn planet_tally(&self) -> PlanetTally {
        let mut tally = PlanetTally {
            total: self.planets.len(),
            ..PlanetTally::default()
        };
        for planet in self.planets.values() {
            if !planet.is_owned() {
                tally.free += 1;
            } else if self.is_own(planet.owner) {
                tally.own += 1;
            } else {
                tally.enemy += 1;
            }
        }
        tally
    }

    /// Nearest enemy ship to `point`; with `docked_only`, ships that are not
    /// undocked (docking, docked or undocking). Ties keep the lower id.
    pub fn nearest_enemy_to(&self, point: Position, docked_only: bool) -> Option<&Ship> {
        let mut best: Option<(&Ship, f64)> = None;
        for ship in self.enemy_ships() {
            if docked_only && ship.is_undocked() {
                continue;
            }
            let distance = ship.position.distance_to(point);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((ship, distance));
            }
        }
        best.map(|(ship, _)| ship)
    }

    /// Rebuilds every planet's nearby-enemy list from a radius scan over
    /// the enemy fleet.
    pub fn scan_nearby_enemies(&mut self, extra_radius: f64) {
        let me = self.params.player_id;
        let ships = &self.ships;
        for planet in self.planets.values_mut() {
            let reach = planet.radius + extra_radius;
            planet.nearby_enemies = ships
                .values()
                .filter(|ship| ship.owner != me)
                .filter(|ship| ship.position.distance_to(planet.position) <= reach)
                .map(|ship| ship.id)
                .collect();
        }
    }

    /// Entities whose padded circle the segment `start..end` crosses.
    /// Entities in `ignore` never count.
    pub fn objects_between(
        &self,
        start: Position,
        end: Position,
        filter: ObstacleFilter,
        ignore: &BTreeSet<EntityId>,
        fudge: f64,
    ) -> Vec<EntityId> {
        let mut found = Vec::new();
        for planet in self.planets.values() {
            let id = EntityId::Planet(planet.id);
            if !ignore.contains(&id) && segment_circle_intersect(start, end, &planet.circle(), fudge) {
                found.push(id);
            }
        }
        for ship in self.ships.values() {
            if filter == ObstacleFilter::PlanetsAndOwnShips && !self.is_own(ship.owner) {
                continue;
            }
            let id = EntityId::Ship(ship.id);
            if !ignore.contains(&id) && segment_circle_intersect(start, end, &ship.circle(), fudge) {
                found.push(id);
            }
        }
        found
    }
}
