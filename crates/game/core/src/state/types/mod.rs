pub mod common;
pub mod equipment;
pub mod grid;
pub mod team;
pub mod turn;
pub mod unit;

// Re-export common types
pub use common::{CardinalDirection, Position, ResourceMeter, TeamId, UnitId};

// Re-export weapon and inventory types
pub use equipment::{Inventory, InventoryError, RangeBand, Weapon, WeaponWear};

// Re-export grid types
pub use grid::{Grid, Neighbors};

// Re-export team and turn state
pub use team::{Alliance, Team};
pub use turn::TurnState;

// Re-export unit types
pub use unit::{CoreStats, Unit};
