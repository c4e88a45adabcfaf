use crate::config::GameConfig;
use crate::env::UnitClass;

use super::{Inventory, Position, RangeBand, ResourceMeter, TeamId, UnitId, Weapon};

/// Primary combat statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreStats {
    pub strength: i32,
    pub skill: i32,
    pub speed: i32,
    pub luck: i32,
    pub defense: i32,
    pub resistance: i32,
}

impl CoreStats {
    pub const fn new(
        strength: i32,
        skill: i32,
        speed: i32,
        luck: i32,
        defense: i32,
        resistance: i32,
    ) -> Self {
        Self {
            strength,
            skill,
            speed,
            luck,
            defense,
            resistance,
        }
    }
}

/// A unit on the battlefield.
///
/// # Invariants
///
/// - `position` matches the single grid cell holding `id`; only
///   [`GameState::move_unit`](crate::state::GameState::move_unit) changes it
/// - `experience < GameConfig::EXPERIENCE_PER_LEVEL`
/// - a unit with empty health is removed from the grid and its team
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub class: UnitClass,
    pub team: TeamId,
    pub position: Position,

    pub health: ResourceMeter,
    pub level: u32,
    pub experience: u32,
    pub stats: CoreStats,
    /// Movement allowance, in terrain-cost units.
    pub movement: f32,
    pub inventory: Inventory,

    /// Set once the unit has acted this turn; cleared when its team's turn starts.
    pub played: bool,
}

impl Unit {
    pub const DEFAULT_MOVEMENT: f32 = 5.0;

    pub fn new(
        id: UnitId,
        name: impl Into<String>,
        team: TeamId,
        stats: CoreStats,
        health_max: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            class: UnitClass::default(),
            team,
            position: Position::ORIGIN,
            health: ResourceMeter::full(health_max),
            level: 1,
            experience: 0,
            stats,
            movement: Self::DEFAULT_MOVEMENT,
            inventory: Inventory::empty(),
            played: false,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_class(mut self, class: UnitClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_movement(mut self, movement: f32) -> Self {
        self.movement = movement.max(0.0);
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.inventory = Inventory::armed(weapon);
        self
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.health.is_empty()
    }

    /// Active weapon, if it has uses left.
    pub fn usable_weapon(&self) -> Option<&Weapon> {
        self.inventory.usable()
    }

    /// Distances this unit can strike at right now.
    pub fn range_band(&self) -> RangeBand {
        self.usable_weapon()
            .map(|weapon| weapon.range)
            .unwrap_or(RangeBand::UNARMED)
    }

    pub fn can_strike_at(&self, distance: u32) -> bool {
        self.range_band().contains(distance)
    }

    /// Adds experience, wrapping at [`GameConfig::EXPERIENCE_PER_LEVEL`].
    ///
    /// Returns the new level when the gain crossed a level boundary.
    pub fn gain_experience(&mut self, points: u32) -> Option<u32> {
        let total = self.experience + points.min(GameConfig::MAX_EXPERIENCE_GAIN);
        let levels = total / GameConfig::EXPERIENCE_PER_LEVEL;
        self.experience = total % GameConfig::EXPERIENCE_PER_LEVEL;
        if levels == 0 {
            return None;
        }
        self.level += levels;
        Some(self.level)
    }
}
