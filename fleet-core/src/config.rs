use crate::constants::{FORECAST_FUDGE_FACTOR, MAX_NAVIGATION_CORRECTIONS, MAX_SPEED};
use serde::{Deserialize, Serialize};

/// One value per supported player count.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerTable<T> {
    pub two: T,
    pub three: T,
    pub four: T,
}

impl<T: Copy> PlayerTable<T> {
    pub fn get(&self, player_count: usize) -> Option<T> {
        match player_count {
            2 => Some(self.two),
            3 => Some(self.three),
            4 => Some(self.four),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarlyAttackConfig {
    /// Own fleet size at which the opening rush is considered.
    pub fleet_size: usize,
    pub max_turn: PlayerTable<u32>,
    pub enemy_limit: PlayerTable<usize>,
    pub average_speed: f64,
    pub min_reach: f64,
    pub capacity: u32,
}

impl Default for EarlyAttackConfig {
    fn default() -> Self {
        Self {
            fleet_size: 3,
            max_turn: PlayerTable {
                two: 26,
                three: 20,
                four: 18,
            },
            enemy_limit: PlayerTable {
                two: 6,
                three: 10,
                four: 12,
            },
            average_speed: 5.0,
            min_reach: 15.0,
            capacity: 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RallyConfig {
    pub early_turn: u32,
    pub early_fleet: usize,
    pub late_turn: u32,
    pub late_fleet: usize,
    pub capacity: u32,
}

impl Default for RallyConfig {
    fn default() -> Self {
        Self {
            early_turn: 50,
            early_fleet: 5,
            late_turn: 100,
            late_fleet: 8,
            capacity: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub id: String,
    pub description: String,

    // Navigation
    pub max_speed: u32,
    pub forecast_fudge: f64,
    pub max_corrections: u32,
    pub approach_margin: f64,
    pub engage_standoff: f64,

    // Speed profile: small fleets search coarse and fast, big fleets fine and slower
    pub fast_navigation_fleet_limit: usize,
    pub fast_angular_step: u32,
    pub crowded_angular_step: u32,
    pub crowded_speed_ratio: f64,

    // Engagement
    pub nearby_enemy_radius: f64,
    pub attack_engage_radius: f64,
    pub ram_health_ratio: f64,

    // Objectives
    pub sentinel_score: f64,
    pub early_attack: EarlyAttackConfig,
    pub rally: RallyConfig,

    // Diagnostics
    pub ranking_log_len: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            description: "Balanced settle/attack profile.".to_string(),
            max_speed: MAX_SPEED,
            forecast_fudge: FORECAST_FUDGE_FACTOR,
            max_corrections: MAX_NAVIGATION_CORRECTIONS,
            approach_margin: 3.0,
            engage_standoff: 1.0,
            fast_navigation_fleet_limit: 50,
            fast_angular_step: 5,
            crowded_angular_step: 2,
            crowded_speed_ratio: 0.8,
            nearby_enemy_radius: 12.0,
            attack_engage_radius: 10.0,
            ram_health_ratio: 2.0,
            sentinel_score: 100_000_000.0,
            early_attack: EarlyAttackConfig::default(),
            rally: RallyConfig::default(),
            ranking_log_len: 10,
        }
    }
}

impl AgentConfig {
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "cautious" => Some(Self {
                id: "cautious".to_string(),
                description: "Wide safety margins, fine angular search, no ramming.".to_string(),
                forecast_fudge: 0.9,
                fast_angular_step: 2,
                crowded_angular_step: 1,
                crowded_speed_ratio: 0.7,
                ram_health_ratio: 1_000.0,
                ..Self::default()
            }),
            "blitz" => Some(Self {
                id: "blitz".to_string(),
                description: "Tight margins and an eager opening rush.".to_string(),
                forecast_fudge: 0.55,
                approach_margin: 2.0,
                attack_engage_radius: 14.0,
                ram_health_ratio: 1.5,
                early_attack: EarlyAttackConfig {
                    average_speed: 6.0,
                    min_reach: 25.0,
                    ..EarlyAttackConfig::default()
                },
                ..Self::default()
            }),
            _ => None,
        }
    }

    pub fn preset_names() -> &'static [&'static str] {
        &["default", "cautious", "blitz"]
    }

    pub fn clamp(&mut self) {
        self.max_speed = self.max_speed.clamp(1, MAX_SPEED);
        self.forecast_fudge = self.forecast_fudge.clamp(0.0, 5.0);
        self.max_corrections = self.max_corrections.clamp(1, 360);
        self.approach_margin = self.approach_margin.clamp(0.5, 10.0);
        self.engage_standoff = self.engage_standoff.clamp(0.0, 5.0);
        self.fast_angular_step = self.fast_angular_step.clamp(1, 30);
        self.crowded_angular_step = self.crowded_angular_step.clamp(1, 30);
        self.crowded_speed_ratio = self.crowded_speed_ratio.clamp(0.1, 1.0);
        self.nearby_enemy_radius = self.nearby_enemy_radius.clamp(0.0, 50.0);
        self.attack_engage_radius = self.attack_engage_radius.clamp(0.0, 50.0);
        if self.ram_health_ratio.is_nan() {
            self.ram_health_ratio = Self::default().ram_health_ratio;
        }
        self.ram_health_ratio = self.ram_health_ratio.max(1.0);
        self.early_attack.average_speed = self.early_attack.average_speed.clamp(1.0, MAX_SPEED as f64);
        self.early_attack.capacity = self.early_attack.capacity.max(1);
        self.rally.capacity = self.rally.capacity.max(1);
    }

    /// Speed cap and angular step multiplier for `approach`, by own fleet size.
    pub fn speed_profile(&self, own_fleet: usize) -> (u32, u32) {
        if own_fleet < self.fast_navigation_fleet_limit {
            (self.max_speed, self.fast_angular_step)
        } else {
            let speed = (self.crowded_speed_ratio * self.max_speed as f64).round() as u32;
            (speed.max(1), self.crowded_angular_step)
        }
    }
}
