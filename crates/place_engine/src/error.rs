//! Error types for programmer misuse of the engine
//!
//! Degenerate input (unknown shapes, zero-length moves) is normalised rather
//! than reported, and "nothing found" is an `Option`. Only calls that cannot
//! be answered at all produce a [`PlaceError`].

use crate::config::ConfigError;
use crate::world::{EntityKey, RoomKey, TilemapKey};
use thiserror::Error;

/// Engine errors
#[derive(Error, Debug)]
pub enum PlaceError {
    /// The entity was destroyed and excised, or its room was removed
    #[error("Entity {0:?} is not alive")]
    StaleEntity(EntityKey),

    /// The room was removed or never existed
    #[error("Room {0:?} does not exist")]
    UnknownRoom(RoomKey),

    /// The tilemap was removed together with its room
    #[error("Tilemap {0:?} does not exist")]
    UnknownTilemap(TilemapKey),

    /// Collisions were already enabled for this tilemap
    #[error("Collisions are already enabled for tilemap {0:?}")]
    TilemapCollisionsAlreadyEnabled(TilemapKey),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias used across the engine
pub type Result<T> = std::result::Result<T, PlaceError>;
