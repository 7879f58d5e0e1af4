use crate::world::EntityId;
use core::fmt;

/// A world snapshot that cannot be trusted. The agent must not guess its
/// way past any of these; the turn loop treats them as fatal.
#[derive(Clone, Debug, PartialEq)]
pub enum SnapshotError {
    InvalidPlayerCount { count: usize },
    PlayerOutOfRange { player_id: i32, player_count: usize },
    OwnerOutOfRange { entity: EntityId, owner: i32 },
    DuplicatePlanet { id: u32 },
    DuplicateShip { id: u32 },
    UnknownDockedShip { planet: u32, ship: u32 },
    DockedShipNotOwner { planet: u32, ship: u32, ship_owner: i32, planet_owner: i32 },
    InvalidDockingSpots { planet: u32, spots: u32, docked: usize },
    NonFiniteGeometry { entity: EntityId },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPlayerCount { count } => {
                write!(f, "invalid player count: {count} (allowed 2..=4)")
            }
            Self::PlayerOutOfRange {
                player_id,
                player_count,
            } => write!(
                f,
                "own player id {player_id} out of range for {player_count} players"
            ),
            Self::OwnerOutOfRange { entity, owner } => {
                write!(f, "{entity} has out-of-range owner {owner}")
            }
            Self::DuplicatePlanet { id } => write!(f, "duplicate planet id {id}"),
            Self::DuplicateShip { id } => write!(f, "duplicate ship id {id}"),
            Self::UnknownDockedShip { planet, ship } => {
                write!(f, "planet {planet} lists unknown docked ship {ship}")
            }
            Self::DockedShipNotOwner {
                planet,
                ship,
                ship_owner,
                planet_owner,
            } => write!(
                f,
                "ship {ship} (owner {ship_owner}) docked at planet {planet} owned by {planet_owner}"
            ),
            Self::InvalidDockingSpots {
                planet,
                spots,
                docked,
            } => write!(
                f,
                "planet {planet} has {docked} docked ships but only {spots} spots"
            ),
            Self::NonFiniteGeometry { entity } => {
                write!(f, "{entity} has non-finite position or radius")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}
