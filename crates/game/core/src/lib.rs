//! Deterministic rules for a turn-based grid tactics battle.
//!
//! `tactics-core` owns the battle rules (terrain-weighted movement, weapon
//! combat, team rotation) and exposes them as pure, synchronous APIs. The
//! caller owns the [`GameState`] and a [`Session`]; all input flows through a
//! short-lived [`engine::GameEngine`], which answers with [`EngineEvent`]s for
//! the presentation layer.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod pathfinding;
pub mod state;

pub use combat::{
    AttackOutcome, BattleReport, CombatError, CombatForecast, StrikeCounts, forecast,
    number_of_attacks, resolve_exchange,
};
pub use config::GameConfig;
pub use engine::{
    ActionChoice, ActionMenu, EngineError, EngineEvent, GameEngine, SelectionState, Session,
};
pub use env::{
    GameEnv, MapDimensions, PcgRng, RngOracle, Terrain, TerrainKind, UnitClass, UnitClasses,
};
pub use error::{ErrorSeverity, GameError};
pub use pathfinding::{NavigationOracle, Pathfinder};
pub use state::{
    Alliance, CoreStats, GameState, Grid, GridError, Inventory, InventoryError, Position,
    RangeBand, StateError, Team, TeamId, Unit, UnitId, Weapon, WeaponWear,
};
