//! Turns each unit's objective into at most one command.
//!
//! Units are planned in ascending id order against a shared
//! [`FutureShips`] log, so a later unit steers around the paths of the
//! units planned before it.

use crate::config::AgentConfig;
use crate::constants::DOCK_RADIUS;
use crate::geometry::Circle;
use crate::navigation::{FutureShips, Navigator, Thrust};
use crate::objective::{ObjectiveBook, ObjectiveKind};
use crate::world::{Planet, PlanetId, Ship, ShipId, World};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandKind {
    Dock { planet: PlanetId },
    Thrust { bearing: u32, magnitude: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub ship: ShipId,
    #[serde(flatten)]
    pub kind: CommandKind,
}

impl From<Thrust> for CommandKind {
    fn from(thrust: Thrust) -> Self {
        Self::Thrust {
            bearing: thrust.bearing,
            magnitude: thrust.magnitude,
        }
    }
}

/// Commands for one turn plus the assigned units that could not move.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Orders {
    pub commands: Vec<Command>,
    pub stalled: Vec<ShipId>,
}

/// What a single unit should do this turn, `None` when no safe move exists.
pub fn direct(
    nav: &Navigator<'_>,
    world: &World,
    cfg: &AgentConfig,
    ship: &Ship,
    objective: &ObjectiveKind,
) -> Option<CommandKind> {
    let (cruise_speed, angular_step) = cfg.speed_profile(world.own_ship_count());
    match objective {
        ObjectiveKind::SettlePlanet { planet } => {
            let planet = world.planet(*planet)?;
            settle(nav, world, cfg, ship, planet, cruise_speed, angular_step)
        }
        ObjectiveKind::AttackPlanet { planet } => {
            let planet = world.planet(*planet)?;
            attack(nav, world, cfg, ship, planet, cruise_speed, angular_step)
        }
        ObjectiveKind::EarlyAttack { target } => {
            let enemy = world.ship((*target)?)?;
            nav.engage(ship, enemy, cfg.max_speed).map(CommandKind::from)
        }
        ObjectiveKind::DefensiveRally { point } => nav
            .approach(ship, Circle::new(*point, 0.0), cruise_speed, angular_step)
            .map(CommandKind::from),
    }
}

fn settle(
    nav: &Navigator<'_>,
    world: &World,
    cfg: &AgentConfig,
    ship: &Ship,
    planet: &Planet,
    cruise_speed: u32,
    angular_step: u32,
) -> Option<CommandKind> {
    // Someone else's planet: knock out the docked defenders first, then
    // whoever is guarding it.
    if planet.is_owned() && !world.is_own(planet.owner) {
        let defender = nearest(world, ship, &planet.docked_ships)
            .or_else(|| nearest(world, ship, &planet.nearby_enemies));
        if let Some(defender) = defender {
            return nav.engage(ship, defender, cfg.max_speed).map(CommandKind::from);
        }
    }

    if ship.can_dock(planet) {
        if let Some(raider) = nearest(world, ship, &planet.nearby_enemies) {
            return nav.engage(ship, raider, cfg.max_speed).map(CommandKind::from);
        }
        if !planet.is_owned() || world.is_own(planet.owner) {
            if !planet.is_full() {
                return Some(CommandKind::Dock { planet: planet.id });
            }
            return None;
        }
    }

    nav.approach(ship, planet.circle(), cruise_speed, angular_step)
        .map(CommandKind::from)
}

fn attack(
    nav: &Navigator<'_>,
    world: &World,
    cfg: &AgentConfig,
    ship: &Ship,
    planet: &Planet,
    cruise_speed: u32,
    angular_step: u32,
) -> Option<CommandKind> {
    if ship.within_distance(planet, DOCK_RADIUS + cfg.attack_engage_radius) {
        if let Some(defender) = nearest(world, ship, &planet.docked_ships) {
            return nav.engage(ship, defender, cfg.max_speed).map(CommandKind::from);
        }
        if let Some(enemy) = nearest(world, ship, &planet.nearby_enemies) {
            let thrust = if enemy.health as f64 > cfg.ram_health_ratio * ship.health as f64 {
                nav.ram(ship, enemy, cfg.max_speed)
            } else {
                nav.engage(ship, enemy, cfg.max_speed)
            };
            return thrust.map(CommandKind::from);
        }
    }

    nav.approach(ship, planet.circle(), cruise_speed, angular_step)
        .map(CommandKind::from)
}

/// Closest ship among `ids` that still exists and is not ours. Lower ids
/// win ties.
fn nearest<'w>(world: &'w World, from: &Ship, ids: &[ShipId]) -> Option<&'w Ship> {
    let mut best: Option<(&Ship, f64)> = None;
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    for id in sorted {
        let Some(candidate) = world.ship(id) else {
            continue;
        };
        if !world.is_enemy(candidate.owner) {
            continue;
        }
        let distance = candidate.position.distance_to(from.position);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(ship, _)| ship)
}

/// Plans every assigned undocked unit in ascending id order. Each thrust is
/// logged into the shared future before the next unit is planned.
pub fn plan_turn(world: &World, book: &ObjectiveBook, cfg: &AgentConfig) -> Orders {
    let mut future = FutureShips::new();
    let mut orders = Orders::default();

    for ship in world.own_ships().filter(|ship| ship.is_undocked()) {
        let Some(objective) = book.objective_of(ship.id).and_then(|key| book.get(key)) else {
            continue;
        };

        let kind = {
            let nav = Navigator::new(world, &future, cfg);
            direct(&nav, world, cfg, ship, objective.kind())
        };

        match kind {
            Some(CommandKind::Thrust { bearing, magnitude }) => {
                if magnitude == 0 {
                    continue;
                }
                future.record(ship, Thrust { bearing, magnitude });
                orders.commands.push(Command {
                    ship: ship.id,
                    kind: CommandKind::Thrust { bearing, magnitude },
                });
            }
            Some(dock @ CommandKind::Dock { .. }) => {
                orders.commands.push(Command { ship: ship.id, kind: dock });
            }
            None => {
                tracing::warn!(ship = ship.id, objective = %objective, "unit stays put");
                orders.stalled.push(ship.id);
            }
        }
    }

    orders
}
