//! Decision core for a turn-based fleet agent.
//!
//! Each turn the caller builds a [`World`] snapshot and hands it to
//! [`Agent::play_turn`], which returns at most one [`Command`] per own
//! unit. Objectives and unit assignments persist inside the agent between
//! turns; everything else is rebuilt from the snapshot.

pub mod agent;
pub mod allocation;
pub mod config;
pub mod constants;
pub mod director;
pub mod error;
pub mod geometry;
pub mod navigation;
pub mod objective;
pub mod world;

#[cfg(test)]
mod testkit;

pub use agent::{Agent, TurnReport};
pub use allocation::{Allocation, Commander};
pub use config::AgentConfig;
pub use director::{Command, CommandKind, Orders};
pub use error::SnapshotError;
pub use geometry::{Circle, Position};
pub use navigation::{FutureShips, Navigator, Thrust};
pub use objective::{Objective, ObjectiveBook, ObjectiveKey, ObjectiveKind};
pub use world::{
    DockingStatus, EntityId, ObstacleFilter, Planet, PlanetId, PlayerId, Ship, ShipId, TurnParams, World,
};
