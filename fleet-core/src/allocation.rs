//! Turn-level objective bookkeeping and greedy unit matching.

use crate::config::AgentConfig;
use crate::geometry::{centroid, Position};
use crate::objective::{Intel, Objective, ObjectiveBook, ObjectiveKey, ObjectiveKind};
use crate::world::{ShipId, TurnParams, World};

/// Planets needed before the kingdom center follows planets, not ships.
const PLANET_CENTER_THRESHOLD: usize = 3;

/// Units matched or moved this turn, and idle units that found nothing
/// worth doing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Allocation {
    pub assigned: Vec<(ShipId, ObjectiveKey)>,
    pub unplaced: Vec<ShipId>,
}

/// Owns the objective book across turns.
#[derive(Clone, Debug)]
pub struct Commander {
    cfg: AgentConfig,
    book: ObjectiveBook,
    kingdom_center: Position,
    rally_point: Option<Position>,
}

impl Commander {
    pub fn new(mut cfg: AgentConfig) -> Self {
        cfg.clamp();
        Self {
            cfg,
            book: ObjectiveBook::new(),
            kingdom_center: Position::ORIGIN,
            rally_point: None,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.cfg
    }

    pub fn book(&self) -> &ObjectiveBook {
        &self.book
    }

    pub fn kingdom_center(&self) -> Position {
        self.kingdom_center
    }

    /// Fixed the first turn the commander sees.
    pub fn rally_point(&self) -> Option<Position> {
        self.rally_point
    }

    pub fn objective_of(&self, ship: ShipId) -> Option<&Objective> {
        self.book
            .objective_of(ship)
            .and_then(|key| self.book.get(key))
    }

    /// Brings every objective up to date with `world`: scans planet
    /// threats, registers objectives for new planets, releases units that
    /// are gone or no longer free to move, then rescores.
    pub fn refresh(&mut self, world: &mut World) {
        world.scan_nearby_enemies(self.cfg.nearby_enemy_radius);
        self.kingdom_center = kingdom_center(world);
        let center = self.kingdom_center;
        let rally_point = *self
            .rally_point
            .get_or_insert_with(|| nearest_corner(world.params(), center));

        for planet in world.planets() {
            self.book.insert(ObjectiveKind::SettlePlanet { planet: planet.id });
            self.book.insert(ObjectiveKind::AttackPlanet { planet: planet.id });
        }
        self.book.insert(ObjectiveKind::EarlyAttack { target: None });
        self.book.insert(ObjectiveKind::DefensiveRally { point: rally_point });

        let world_ref: &World = world;
        let gone = self.book.release_where(|id| {
            world_ref
                .ship(id)
                .map_or(false, |ship| world_ref.is_own(ship.owner) && ship.is_undocked())
        });
        if !gone.is_empty() {
            tracing::debug!(ships = ?gone, "released units that cannot move");
        }

        let intel = Intel::new(world_ref, &self.cfg, center);
        let trimmed = self.book.update_all(&intel);
        if !trimmed.is_empty() {
            tracing::debug!(ships = ?trimmed, "released units over capacity");
        }

        if tracing::enabled!(tracing::Level::DEBUG) {
            for (rank, objective) in self.ranking().iter().take(self.cfg.ranking_log_len).enumerate() {
                tracing::debug!(rank, "{objective}");
            }
        }
    }

    /// Matches every undocked unit, in ascending id order, to the available
    /// objective with the best score net of distance penalty. The first
    /// maximum in key order wins ties. A unit that already holds an
    /// objective moves only when another one beats it strictly, which is how
    /// a sentinel objective pulls units off ordinary work.
    pub fn allocate(&mut self, world: &World) -> Allocation {
        let mut open: Vec<ObjectiveKey> = self
            .book
            .iter()
            .filter(|objective| objective.is_available())
            .map(Objective::key)
            .collect();
        let mut allocation = Allocation::default();

        for ship in world.own_ships().filter(|ship| ship.is_undocked()) {
            let current = self.book.objective_of(ship.id);
            let held = current
                .and_then(|key| self.book.get(key))
                .map(|objective| objective.score() - objective.distance_penalty(ship, world));

            let mut best: Option<(ObjectiveKey, f64)> = None;
            for key in &open {
                if current == Some(*key) {
                    continue;
                }
                let Some(objective) = self.book.get(*key) else {
                    continue;
                };
                let value = objective.score() - objective.distance_penalty(ship, world);
                if best.map_or(true, |(_, top)| value > top) {
                    best = Some((*key, value));
                }
            }

            let Some((key, value)) = best else {
                if current.is_none() {
                    tracing::warn!(ship = ship.id, "no viable objective");
                    allocation.unplaced.push(ship.id);
                }
                continue;
            };
            if held.map_or(false, |held| value <= held) {
                continue;
            }
            if !self.book.assign(ship.id, key) {
                tracing::warn!(ship = ship.id, ?key, "objective refused assignment");
                if current.is_none() {
                    allocation.unplaced.push(ship.id);
                }
                continue;
            }
            allocation.assigned.push((ship.id, key));
            if !self.book.get(key).map_or(false, Objective::is_free) {
                open.retain(|open_key| *open_key != key);
            }
            if let Some(left) = current {
                tracing::debug!(ship = ship.id, from = ?left, to = ?key, "unit reassigned");
                let reopened = self.book.get(left).map_or(false, Objective::is_available);
                if reopened && !open.contains(&left) {
                    let at = open.partition_point(|open_key| *open_key < left);
                    open.insert(at, left);
                }
            }
        }

        allocation
    }

    /// Objectives by descending score.
    pub fn ranking(&self) -> Vec<&Objective> {
        self.book.ranking()
    }
}

/// Centroid of own planets once there are enough of them, otherwise of own
/// ships, otherwise the origin.
pub fn kingdom_center(world: &World) -> Position {
    let planets: Vec<Position> = world
        .planets()
        .filter(|planet| world.is_own(planet.owner))
        .map(|planet| planet.position)
        .collect();
    if planets.len() >= PLANET_CENTER_THRESHOLD {
        if let Some(center) = centroid(planets) {
            return center;
        }
    }
    centroid(world.own_ships().map(|ship| ship.position)).unwrap_or(Position::ORIGIN)
}

/// Map corner closest to `point`; earlier corners win ties.
pub fn nearest_corner(params: &TurnParams, point: Position) -> Position {
    let corners = [
        Position::new(0.0, 0.0),
        Position::new(params.width, 0.0),
        Position::new(0.0, params.height),
        Position::new(params.width, params.height),
    ];
    let mut best = corners[0];
    for corner in &corners[1..] {
        if corner.distance_to(point) < best.distance_to(point) {
            best = *corner;
        }
    }
    best
}
