//! Game constants for the fleet arena.
//!
//! These are the rule-level values of the game itself. Everything the agent
//! is free to tune lives in [`crate::config::AgentConfig`] instead.

// Movement
pub const MAX_SPEED: u32 = 7;
pub const SHIP_RADIUS: f64 = 0.5;

// Docking: distance from the planet surface at which a ship may dock
pub const DOCK_RADIUS: f64 = 4.0;

// Combat
pub const MAX_SHIP_HEALTH: i32 = 255;

// Navigation search
pub const MAX_NAVIGATION_CORRECTIONS: u32 = 90;
pub const FORECAST_FUDGE_FACTOR: f64 = SHIP_RADIUS + 0.1;

// Players
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Owner id of a neutral (unclaimed) planet.
pub const NO_OWNER: i32 = -1;
