//! Weapons and the per-unit weapon inventory.
//!
//! A unit carries up to [`GameConfig::MAX_INVENTORY_SLOTS`] weapons and keeps
//! at most one of them active. Combat reads the active weapon only; a broken
//! weapon stays in its slot (and stays active) but no longer counts as usable.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

/// Inclusive band of distances a weapon can strike at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeBand {
    pub min: u32,
    pub max: u32,
}

impl RangeBand {
    /// Band used when a unit fights without a usable weapon.
    pub const UNARMED: Self = Self { min: 1, max: 1 };

    /// Bounds are reordered if given reversed.
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn contains(&self, distance: u32) -> bool {
        (self.min..=self.max).contains(&distance)
    }
}

impl Default for RangeBand {
    fn default() -> Self {
        Self::UNARMED
    }
}

/// Condition of a weapon after a use was spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponWear {
    Worn { remaining: u32 },
    Broken,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weapon {
    pub name: String,
    pub might: i32,
    pub hit: i32,
    pub crit: i32,
    pub weight: i32,
    pub range: RangeBand,
    pub uses: u32,
}

impl Weapon {
    pub fn new(name: impl Into<String>, might: i32, hit: i32, crit: i32, uses: u32) -> Self {
        Self {
            name: name.into(),
            might,
            hit,
            crit,
            weight: 0,
            range: RangeBand::UNARMED,
            uses,
        }
    }

    pub fn with_range(mut self, min: u32, max: u32) -> Self {
        self.range = RangeBand::new(min, max);
        self
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn is_broken(&self) -> bool {
        self.uses == 0
    }

    /// Spends one use. Calling this on a broken weapon keeps it broken.
    pub fn consume_use(&mut self) -> WeaponWear {
        self.uses = self.uses.saturating_sub(1);
        if self.uses == 0 {
            WeaponWear::Broken
        } else {
            WeaponWear::Worn {
                remaining: self.uses,
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryError {
    #[error("inventory is full ({capacity} slots)")]
    Full { capacity: usize },

    #[error("inventory slot {slot} is empty")]
    EmptySlot { slot: usize },

    #[error("weapon in slot {slot} is broken")]
    Broken { slot: usize },
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            InventoryError::Full { .. } | InventoryError::Broken { .. } => {
                ErrorSeverity::Recoverable
            }
            InventoryError::EmptySlot { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            InventoryError::Full { .. } => "INVENTORY_FULL",
            InventoryError::EmptySlot { .. } => "INVENTORY_EMPTY_SLOT",
            InventoryError::Broken { .. } => "INVENTORY_BROKEN",
        }
    }
}

type WeaponSlots = ArrayVec<Weapon, { GameConfig::MAX_INVENTORY_SLOTS }>;

/// Weapon inventory with at most one active slot.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    weapons: WeaponSlots,
    active: Option<usize>,
}

impl Inventory {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Inventory holding a single weapon, already equipped.
    pub fn armed(weapon: Weapon) -> Self {
        let mut weapons = WeaponSlots::new();
        weapons.push(weapon);
        Self {
            weapons,
            active: Some(0),
        }
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    pub fn weapons(&self) -> impl Iterator<Item = &Weapon> {
        self.weapons.iter()
    }

    /// Stores a weapon and returns its slot. The first weapon stored into an
    /// inventory without an active weapon becomes active.
    pub fn push(&mut self, weapon: Weapon) -> Result<usize, InventoryError> {
        self.weapons
            .try_push(weapon)
            .map_err(|_| InventoryError::Full {
                capacity: GameConfig::MAX_INVENTORY_SLOTS,
            })?;
        let slot = self.weapons.len() - 1;
        if self.active.is_none() {
            self.active = Some(slot);
        }
        Ok(slot)
    }

    /// Makes `slot` the active weapon. Broken weapons cannot be equipped.
    pub fn equip(&mut self, slot: usize) -> Result<(), InventoryError> {
        let weapon = self
            .weapons
            .get(slot)
            .ok_or(InventoryError::EmptySlot { slot })?;
        if weapon.is_broken() {
            return Err(InventoryError::Broken { slot });
        }
        self.active = Some(slot);
        Ok(())
    }

    pub fn active_slot(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&Weapon> {
        self.active.and_then(|slot| self.weapons.get(slot))
    }

    pub fn active_mut(&mut self) -> Option<&mut Weapon> {
        self.active.and_then(|slot| self.weapons.get_mut(slot))
    }

    /// Active weapon, provided it still has uses left.
    pub fn usable(&self) -> Option<&Weapon> {
        self.active().filter(|weapon| !weapon.is_broken())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sword() -> Weapon {
        Weapon::new("Iron Sword", 5, 90, 0, 2)
    }

    #[test]
    fn first_weapon_becomes_active() {
        let mut inventory = Inventory::empty();
        inventory.push(sword()).unwrap();
        inventory
            .push(Weapon::new("Bow", 4, 80, 0, 10).with_range(2, 2))
            .unwrap();
        assert_eq!(inventory.active_slot(), Some(0));
        inventory.equip(1).unwrap();
        assert_eq!(inventory.active().unwrap().name, "Bow");
    }

    #[test]
    fn push_rejects_overflow() {
        let mut inventory = Inventory::empty();
        for _ in 0..GameConfig::MAX_INVENTORY_SLOTS {
            inventory.push(sword()).unwrap();
        }
        assert!(matches!(
            inventory.push(sword()),
            Err(InventoryError::Full { .. })
        ));
    }

    #[test]
    fn broken_weapon_stays_equipped_but_unusable() {
        let mut inventory = Inventory::armed(sword());
        let weapon = inventory.active_mut().unwrap();
        assert_eq!(weapon.consume_use(), WeaponWear::Worn { remaining: 1 });
        assert_eq!(weapon.consume_use(), WeaponWear::Broken);
        assert_eq!(inventory.active_slot(), Some(0));
        assert!(inventory.usable().is_none());
        assert!(matches!(
            inventory.equip(0),
            Err(InventoryError::Broken { slot: 0 })
        ));
    }

    #[test]
    fn reversed_band_is_normalized() {
        let band = RangeBand::new(3, 1);
        assert_eq!(band, RangeBand { min: 1, max: 3 });
        assert!(band.contains(2));
        assert!(!band.contains(4));
    }
}
