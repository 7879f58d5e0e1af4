//! Scored, capacity-bounded goals that persist across turns.
//!
//! An [`Objective`] is a shared record (score, capacity, roster, validity)
//! plus an [`ObjectiveKind`] payload. Planet-bound payloads hold only a
//! planet id and re-resolve it against the fresh snapshot every turn.
//!
//! The roster and each unit's back-reference are kept in one place, the
//! [`ObjectiveBook`]; nothing else mutates either side.

use crate::config::AgentConfig;
use crate::geometry::Position;
use crate::world::{PlanetId, PlanetTally, Ship, ShipId, World};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identity of an objective across turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectiveKey {
    Settle(PlanetId),
    Attack(PlanetId),
    EarlyAttack,
    Rally,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObjectiveKind {
    SettlePlanet { planet: PlanetId },
    AttackPlanet { planet: PlanetId },
    /// Target is re-chosen every turn; `None` while the rush is off.
    EarlyAttack { target: Option<ShipId> },
    DefensiveRally { point: Position },
}

impl ObjectiveKind {
    pub fn key(&self) -> ObjectiveKey {
        match self {
            Self::SettlePlanet { planet } => ObjectiveKey::Settle(*planet),
            Self::AttackPlanet { planet } => ObjectiveKey::Attack(*planet),
            Self::EarlyAttack { .. } => ObjectiveKey::EarlyAttack,
            Self::DefensiveRally { .. } => ObjectiveKey::Rally,
        }
    }
}

/// Everything scoring needs about the current turn.
#[derive(Clone, Copy)]
pub struct Intel<'a> {
    pub world: &'a World,
    pub cfg: &'a AgentConfig,
    pub kingdom_center: Position,
    pub tally: PlanetTally,
    pub own_ships: usize,
    pub enemy_ships: usize,
}

impl<'a> Intel<'a> {
    pub fn new(world: &'a World, cfg: &'a AgentConfig, kingdom_center: Position) -> Self {
        Self {
            world,
            cfg,
            kingdom_center,
            tally: world.planet_tally(),
            own_ships: world.own_ship_count(),
            enemy_ships: world.enemy_ship_count(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Objective {
    kind: ObjectiveKind,
    score: f64,
    capacity: u32,
    assigned: Vec<ShipId>,
    valid: bool,
}

impl Objective {
    pub fn new(kind: ObjectiveKind) -> Self {
        Self {
            kind,
            score: 0.0,
            capacity: 0,
            assigned: Vec::new(),
            valid: false,
        }
    }

    pub fn kind(&self) -> &ObjectiveKind {
        &self.kind
    }

    pub fn key(&self) -> ObjectiveKey {
        self.kind.key()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn assigned(&self) -> &[ShipId] {
        &self.assigned
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_free(&self) -> bool {
        (self.assigned.len() as u32) < self.capacity
    }

    pub fn is_available(&self) -> bool {
        self.valid && self.score > 0.0 && self.is_free()
    }

    /// Re-resolves the payload and recomputes score and capacity. Does not
    /// touch the roster; [`ObjectiveBook::update_all`] trims it afterwards.
    fn refresh(&mut self, intel: &Intel<'_>) {
        let outcome = match &mut self.kind {
            ObjectiveKind::SettlePlanet { planet } => settle_planet(*planet, intel),
            ObjectiveKind::AttackPlanet { planet } => attack_planet(*planet, intel),
            ObjectiveKind::EarlyAttack { target } => {
                *target = early_attack_target(intel);
                target.map(|_| (intel.cfg.sentinel_score, intel.cfg.early_attack.capacity))
            }
            ObjectiveKind::DefensiveRally { .. } => {
                rally_needed(intel).then_some((intel.cfg.sentinel_score, intel.cfg.rally.capacity))
            }
        };

        match outcome {
            Some((score, capacity)) => {
                self.valid = true;
                self.score = score;
                self.capacity = capacity;
            }
            None => {
                self.valid = false;
                self.score = 0.0;
                self.capacity = 0;
            }
        }
    }

    /// Cost of sending `ship` here, subtracted from the score when matching.
    pub fn distance_penalty(&self, ship: &Ship, world: &World) -> f64 {
        match &self.kind {
            ObjectiveKind::SettlePlanet { planet } | ObjectiveKind::AttackPlanet { planet } => world
                .planet(*planet)
                .map(|planet| (planet.position.distance_to(ship.position) / 5.0).powi(2))
                .unwrap_or(0.0),
            ObjectiveKind::EarlyAttack { .. } => 0.0,
            ObjectiveKind::DefensiveRally { point } => {
                let distance = ship.position.distance_to(*point);
                distance * distance
            }
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ObjectiveKind::SettlePlanet { planet } => write!(f, "Settle({planet})")?,
            ObjectiveKind::AttackPlanet { planet } => write!(f, "Attack({planet})")?,
            ObjectiveKind::EarlyAttack { target: Some(ship) } => write!(f, "EarlyAttack(ship {ship})")?,
            ObjectiveKind::EarlyAttack { target: None } => write!(f, "EarlyAttack(-)")?,
            ObjectiveKind::DefensiveRally { point } => {
                write!(f, "Rally({:.1}, {:.1})", point.x, point.y)?
            }
        }
        write!(
            f,
            " [$={:.1}, {}/{}]",
            self.score,
            self.assigned.len(),
            self.capacity
        )
    }
}

/// Score and capacity for growing or defending a planet. `None` when the
/// planet no longer resolves.
pub fn settle_planet(id: PlanetId, intel: &Intel<'_>) -> Option<(f64, u32)> {
    let planet = intel.world.planet(id)?;
    let nearby = planet.nearby_enemies.len();
    let own = intel.world.is_own(planet.owner);
    if own && planet.is_full() && nearby == 0 {
        return Some((0.0, 0));
    }

    // Higher threshold means less early boosting.
    let threshold = if intel.world.player_count() < 3 { 0.5 } else { 0.7 };
    let free_share = intel.tally.free as f64 / intel.tally.total.max(1) as f64;
    let settle_boost = if free_share > threshold { 400.0 } else { 0.0 };
    let distance_score = (700.0 / intel.kingdom_center.distance_to(planet.position)).min(100.0);
    let defense_multiplier = 6.0 / intel.own_ships.max(1) as f64 + 1.0;
    let nearby_sqrt = (nearby as f64).sqrt();

    let (base, capacity) = if own {
        (
            planet.free_ratio() * 150.0 + nearby_sqrt * 350.0 * defense_multiplier,
            planet.free_spots() + nearby as u32 * 2,
        )
    } else if planet.is_owned() {
        (80.0, planet.docking_spots + nearby as u32)
    } else {
        (100.0, planet.docking_spots + nearby as u32)
    };

    Some((settle_boost + distance_score + base, capacity))
}

/// Score and capacity for breaking an enemy hold. `None` when the planet
/// no longer resolves or is not enemy-owned.
pub fn attack_planet(id: PlanetId, intel: &Intel<'_>) -> Option<(f64, u32)> {
    let planet = intel.world.planet(id)?;
    if !planet.is_owned() || intel.world.is_own(planet.owner) {
        return None;
    }

    let nearby = planet.nearby_enemies.len();
    let docked = planet.docked_ships.len();
    let aggressive = intel.tally.free == 0;

    let attack_boost = if aggressive { 500.0 } else { 0.0 };
    let distance_score = (100.0 / intel.kingdom_center.distance_to(planet.position)).min(30.0);
    let occupy_score = if docked + nearby > 0 {
        (1.0 - planet.docked_ratio()) * 80.0
    } else {
        0.0
    };
    // Chasing scattered ships only pays once everything is claimed.
    let enemy_score = if aggressive {
        (nearby as f64).sqrt() * 100.0
    } else {
        (nearby as f64).sqrt() * -10.0
    };
    let enemy_strength = if intel.world.player_count() == 2 {
        0.0
    } else {
        let owner_ships = intel.world.ships_of(planet.owner).count();
        40.0 * ((owner_ships as f64).sqrt() - 1.0)
    };

    let capacity = if intel.own_ships < 2 * intel.tally.free * 4 {
        let multiplier = if aggressive { 4 } else { 2 };
        ((docked + nearby) * multiplier) as u32
    } else {
        (intel.own_ships / intel.tally.enemy.max(1) + nearby) as u32
    };

    Some((
        attack_boost + distance_score + occupy_score + enemy_score + enemy_strength,
        capacity,
    ))
}

/// The opening rush target, if a rush is on this turn.
pub fn early_attack_target(intel: &Intel<'_>) -> Option<ShipId> {
    let rush = &intel.cfg.early_attack;
    if intel.own_ships != rush.fleet_size {
        return None;
    }

    let players = intel.world.player_count();
    let enemy_limit = rush.enemy_limit.get(players)?;
    if intel.enemy_ships > enemy_limit {
        return None;
    }

    let target = intel
        .world
        .nearest_enemy_to(intel.kingdom_center, true)
        .or_else(|| intel.world.nearest_enemy_to(intel.kingdom_center, false))?;

    // Reach shrinks as the window for a rush closes.
    let max_turn = rush.max_turn.get(players)?;
    let turns_left = max_turn as f64 - intel.world.turn() as f64;
    let max_distance = rush.min_reach.max(turns_left * rush.average_speed);
    let distance = target.position.distance_to(intel.kingdom_center);
    tracing::debug!(target = target.id, distance, max_distance, "early attack reach");
    if distance > max_distance {
        return None;
    }

    Some(target.id)
}

pub fn rally_needed(intel: &Intel<'_>) -> bool {
    let rally = &intel.cfg.rally;
    let turn = intel.world.turn();
    (turn > rally.early_turn && intel.own_ships <= rally.early_fleet)
        || (turn > rally.late_turn && intel.own_ships <= rally.late_fleet)
}

/// All persistent objectives plus the unit-to-objective relation.
#[derive(Clone, Debug, Default)]
pub struct ObjectiveBook {
    objectives: BTreeMap<ObjectiveKey, Objective>,
    units: BTreeMap<ShipId, ObjectiveKey>,
}

impl ObjectiveBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ObjectiveKind) {
        self.objectives
            .entry(kind.key())
            .or_insert_with(|| Objective::new(kind));
    }

    pub fn contains(&self, key: ObjectiveKey) -> bool {
        self.objectives.contains_key(&key)
    }

    pub fn get(&self, key: ObjectiveKey) -> Option<&Objective> {
        self.objectives.get(&key)
    }

    /// Objectives in key order, which is also the tie-break order.
    pub fn iter(&self) -> impl Iterator<Item = &Objective> + '_ {
        self.objectives.values()
    }

    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    pub fn objective_of(&self, ship: ShipId) -> Option<ObjectiveKey> {
        self.units.get(&ship).copied()
    }

    /// Links `ship` to `key` on both sides. A ship already assigned
    /// elsewhere is released first. Fails without side effects when the
    /// objective is unknown or has no free capacity.
    pub fn assign(&mut self, ship: ShipId, key: ObjectiveKey) -> bool {
        if self.units.get(&ship) == Some(&key) {
            return true;
        }
        let free = self.objectives.get(&key).map_or(false, Objective::is_free);
        if !free {
            return false;
        }
        self.unassign(ship);
        if let Some(objective) = self.objectives.get_mut(&key) {
            objective.assigned.push(ship);
            self.units.insert(ship, key);
        }
        true
    }

    /// Unlinks `ship` on both sides. Returns the objective it left.
    pub fn unassign(&mut self, ship: ShipId) -> Option<ObjectiveKey> {
        let key = self.units.remove(&ship)?;
        if let Some(objective) = self.objectives.get_mut(&key) {
            objective.assigned.retain(|id| *id != ship);
        }
        Some(key)
    }

    /// Releases every assigned unit `keep` rejects.
    pub fn release_where<F>(&mut self, mut keep: F) -> Vec<ShipId>
    where
        F: FnMut(ShipId) -> bool,
    {
        let released: Vec<ShipId> = self
            .units
            .keys()
            .copied()
            .filter(|ship| !keep(*ship))
            .collect();
        for ship in &released {
            self.unassign(*ship);
        }
        released
    }

    /// Refreshes every objective, then trims rosters so no objective holds
    /// more units than its new capacity. The most recent assignments go
    /// first. An objective that is invalid or no longer scores above zero
    /// loses its whole roster.
    pub fn update_all(&mut self, intel: &Intel<'_>) -> Vec<ShipId> {
        let mut released = Vec::new();
        for objective in self.objectives.values_mut() {
            objective.refresh(intel);
            if !objective.valid || objective.score <= 0.0 {
                released.extend(objective.assigned.drain(..).rev());
                continue;
            }
            while objective.assigned.len() as u32 > objective.capacity {
                if let Some(ship) = objective.assigned.pop() {
                    released.push(ship);
                }
            }
        }
        for ship in &released {
            self.units.remove(ship);
        }
        released
    }

    /// Objectives by descending score, key order breaking ties.
    pub fn ranking(&self) -> Vec<&Objective> {
        let mut ranked: Vec<&Objective> = self.objectives.values().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}

#[cfg(test)]
mod tests;
