//! One call per turn: refresh objectives, match idle units, plan moves.

use crate::allocation::Commander;
use crate::config::AgentConfig;
use crate::director::{plan_turn, Command};
use crate::world::{ShipId, World};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TurnReport {
    pub turn: u32,
    pub commands: Vec<Command>,
    /// Units matched to a new objective this turn.
    pub newly_assigned: usize,
    /// Idle units with no viable objective.
    pub unplaced: Vec<ShipId>,
    /// Assigned units with no safe move.
    pub stalled: Vec<ShipId>,
}

#[derive(Clone, Debug)]
pub struct Agent {
    commander: Commander,
}

impl Agent {
    pub fn new(cfg: AgentConfig) -> Self {
        Self {
            commander: Commander::new(cfg),
        }
    }

    pub fn commander(&self) -> &Commander {
        &self.commander
    }

    pub fn play_turn(&mut self, mut world: World) -> TurnReport {
        self.commander.refresh(&mut world);
        let allocation = self.commander.allocate(&world);
        let orders = plan_turn(&world, self.commander.book(), self.commander.config());

        let report = TurnReport {
            turn: world.turn(),
            commands: orders.commands,
            newly_assigned: allocation.assigned.len(),
            unplaced: allocation.unplaced,
            stalled: orders.stalled,
        };
        tracing::info!(
            turn = report.turn,
            own_ships = world.own_ship_count(),
            commands = report.commands.len(),
            newly_assigned = report.newly_assigned,
            unplaced = report.unplaced.len(),
            stalled = report.stalled.len(),
            "turn planned"
        );
        report
    }
}
