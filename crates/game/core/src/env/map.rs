use bitflags::bitflags;

use crate::state::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as i64) < self.width as i64
            && (position.y as i64) < self.height as i64
    }

    /// Number of cells covered by the map.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major index of an in-bounds position.
    pub fn index_of(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        Some(position.y as usize * self.width as usize + position.x as usize)
    }

    /// Inverse of [`MapDimensions::index_of`].
    pub fn position_of(&self, index: usize) -> Option<Position> {
        if index >= self.area() {
            return None;
        }
        let width = self.width as usize;
        Some(Position::new((index % width) as i32, (index / width) as i32))
    }
}

/// Movement class of a unit. Terrain admits or rejects units by class.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UnitClass {
    /// Infantry and other walkers
    #[default]
    Foot,
    /// Horseback units
    Mounted,
    /// Heavy plate, slow on rough ground
    Armored,
    /// Pegasus and wyvern riders
    Flying,
}

impl UnitClass {
    /// Single-bit set containing only this class.
    pub const fn flag(self) -> UnitClasses {
        match self {
            UnitClass::Foot => UnitClasses::FOOT,
            UnitClass::Mounted => UnitClasses::MOUNTED,
            UnitClass::Armored => UnitClasses::ARMORED,
            UnitClass::Flying => UnitClasses::FLYING,
        }
    }
}

bitflags! {
    /// Set of unit classes allowed to enter a tile.
    ///
    /// `all()` is the "any" value and `empty()` the "none" value.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitClasses: u8 {
        const FOOT    = 1 << 0;
        const MOUNTED = 1 << 1;
        const ARMORED = 1 << 2;
        const FLYING  = 1 << 3;
    }
}

impl UnitClasses {
    pub const ANY: Self = Self::all();
    pub const NONE: Self = Self::empty();

    pub fn admits(self, class: UnitClass) -> bool {
        self.contains(class.flag())
    }
}

impl Default for UnitClasses {
    fn default() -> Self {
        Self::ANY
    }
}

/// Canonical terrain classes for map tiles.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TerrainKind {
    #[default]
    Plain,
    Forest,
    Hill,
    Mountain,
    River,
    Sea,
    Fort,
    Wall,
}

/// Immutable per-cell terrain record.
///
/// Movement cost is the price of *entering* the tile; the search charges it on
/// every edge leading into the cell.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Terrain {
    kind: TerrainKind,
    movement_cost: f32,
    defense_bonus: i32,
    avoid_bonus: i32,
    allowed: UnitClasses,
}

impl Terrain {
    pub const DEFAULT_MOVEMENT_COST: f32 = 1.0;

    /// Creates terrain of the given kind with default cost, no bonuses, open to
    /// every class.
    pub const fn new(kind: TerrainKind) -> Self {
        Self {
            kind,
            movement_cost: Self::DEFAULT_MOVEMENT_COST,
            defense_bonus: 0,
            avoid_bonus: 0,
            allowed: UnitClasses::ANY,
        }
    }

    pub const fn plain() -> Self {
        Self::new(TerrainKind::Plain)
    }

    pub const fn wall() -> Self {
        Self::new(TerrainKind::Wall).with_allowed(UnitClasses::NONE)
    }

    /// Non-positive or non-finite costs fall back to the default cost.
    pub fn with_movement_cost(mut self, cost: f32) -> Self {
        self.movement_cost = if cost.is_finite() && cost > 0.0 {
            cost
        } else {
            Self::DEFAULT_MOVEMENT_COST
        };
        self
    }

    pub const fn with_bonuses(mut self, defense: i32, avoid: i32) -> Self {
        self.defense_bonus = defense;
        self.avoid_bonus = avoid;
        self
    }

    pub const fn with_allowed(mut self, allowed: UnitClasses) -> Self {
        self.allowed = allowed;
        self
    }

    pub fn kind(&self) -> TerrainKind {
        self.kind
    }

    pub fn movement_cost(&self) -> f32 {
        self.movement_cost
    }

    pub fn defense_bonus(&self) -> i32 {
        self.defense_bonus
    }

    pub fn avoid_bonus(&self) -> i32 {
        self.avoid_bonus
    }

    pub fn allowed(&self) -> UnitClasses {
        self.allowed
    }

    pub fn admits(&self, class: UnitClass) -> bool {
        self.allowed.admits(class)
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Self::plain()
    }
}
