//! Collision-avoiding navigation.
//!
//! Every entry point reduces to [`Navigator::navigate_towards`]: aim at a
//! point, and while the straight segment crosses a padded obstacle, rotate
//! the aim by one angular step and try again at the same range. Positive
//! rotations are exhausted before negative ones. Bearings are whole degrees
//! throughout the search, so the segment that was tested is exactly the
//! segment the emitted command flies.

use crate::config::AgentConfig;
use crate::constants::SHIP_RADIUS;
use crate::geometry::{deg_to_rad, normalize_deg, rad_to_deg_clipped, segment_circle_intersect, Circle, Position};
use crate::world::{EntityId, ObstacleFilter, Ship, ShipId, World};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single discrete move: whole-degree bearing in `[0, 360)` and an integer
/// magnitude no larger than the speed cap it was planned with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thrust {
    pub bearing: u32,
    pub magnitude: u32,
}

impl Thrust {
    pub const STILL: Thrust = Thrust {
        bearing: 0,
        magnitude: 0,
    };

    pub fn destination(&self, from: Position) -> Position {
        from.offset(deg_to_rad(self.bearing as f64), self.magnitude as f64)
    }
}

/// Where already-planned ships will be this turn, sampled once per unit of
/// thrust along their path. Append-only, in planning order, and discarded
/// at turn end.
#[derive(Clone, Debug, Default)]
pub struct FutureShips {
    samples: Vec<(ShipId, Position)>,
}

impl FutureShips {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, ship: &Ship, thrust: Thrust) {
        let bearing = deg_to_rad(thrust.bearing as f64);
        for step in 1..=thrust.magnitude {
            self.samples
                .push((ship.id, ship.position.offset(bearing, step as f64)));
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn blocks(&self, start: Position, end: Position, fudge: f64, mover: ShipId) -> bool {
        self.samples.iter().any(|(owner, position)| {
            *owner != mover
                && segment_circle_intersect(start, end, &Circle::new(*position, SHIP_RADIUS), fudge)
        })
    }
}

pub struct Navigator<'a> {
    world: &'a World,
    future: &'a FutureShips,
    cfg: &'a AgentConfig,
}

impl<'a> Navigator<'a> {
    pub fn new(world: &'a World, future: &'a FutureShips, cfg: &'a AgentConfig) -> Self {
        Self { world, future, cfg }
    }

    /// Head for the standoff point on `target`'s boundary nearest the mover.
    /// `target` may be a planet or a synthetic stationary point.
    pub fn approach(&self, mover: &Ship, target: Circle, max_speed: u32, angular_step: u32) -> Option<Thrust> {
        let point = target.closest_point(mover.position, self.cfg.approach_margin);
        self.navigate_towards(mover, point, max_speed, ObstacleFilter::All, angular_step)
    }

    /// Close to just outside `enemy`'s boundary on the near side.
    pub fn engage(&self, mover: &Ship, enemy: &Ship, max_speed: u32) -> Option<Thrust> {
        let point = enemy
            .circle()
            .closest_point(mover.position, self.cfg.engage_standoff);
        self.navigate_towards(mover, point, max_speed, ObstacleFilter::All, 1)
    }

    /// Fly straight into `enemy`. Enemy ships do not block a ram; planets
    /// and own ships (current or already planned) still do.
    pub fn ram(&self, mover: &Ship, enemy: &Ship, max_speed: u32) -> Option<Thrust> {
        self.navigate_towards(
            mover,
            enemy.position,
            max_speed,
            ObstacleFilter::PlanetsAndOwnShips,
            1,
        )
    }

    pub fn navigate_towards(
        &self,
        mover: &Ship,
        target: Position,
        max_speed: u32,
        filter: ObstacleFilter,
        angular_step: u32,
    ) -> Option<Thrust> {
        let distance = mover.position.distance_to(target);
        if distance == 0.0 {
            return Some(Thrust::STILL);
        }

        let angular_step = angular_step.max(1);
        let budget = (self.cfg.max_corrections / angular_step).max(1);
        let straight = rad_to_deg_clipped(mover.position.bearing_to(target)) as i64;
        let ignore: BTreeSet<EntityId> = [EntityId::Ship(mover.id)].into_iter().collect();

        for sign in [1i64, -1] {
            // The undeflected bearing is only tried on the positive sweep.
            let first = if sign > 0 { 0 } else { 1 };
            for correction in first..budget {
                let bearing = normalize_deg(straight + sign * (correction * angular_step) as i64);
                let end = mover
                    .position
                    .offset(deg_to_rad(bearing as f64), distance);
                if self.path_clear(mover, end, filter, &ignore) {
                    // Never round up: overshooting can land inside an obstacle.
                    let magnitude = if distance < max_speed as f64 {
                        distance.floor() as u32
                    } else {
                        max_speed
                    };
                    return Some(Thrust { bearing, magnitude });
                }
            }
        }

        tracing::warn!(
            ship = mover.id,
            target_x = target.x,
            target_y = target.y,
            budget,
            "no safe navigation path"
        );
        None
    }

    /// The obstacle test the search runs, exposed so a produced command can
    /// be checked against exactly the same rules.
    pub fn path_clear(&self, mover: &Ship, end: Position, filter: ObstacleFilter, ignore: &BTreeSet<EntityId>) -> bool {
        let fudge = self.cfg.forecast_fudge;
        self.world
            .objects_between(mover.position, end, filter, ignore, fudge)
            .is_empty()
            && !self.future.blocks(mover.position, end, fudge, mover.id)
    }
}
