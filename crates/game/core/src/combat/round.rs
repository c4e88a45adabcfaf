//! Resolution of a single strike.
//!
//! Everything here is a pure function of the two units and the two rolls; the
//! exchange applies the result to the state.

use crate::state::{Unit, UnitId, WeaponWear};

/// Outcome of one strike, in priority order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackOutcome {
    /// Hit roll failed.
    Miss,
    /// Landed, but the defense soaked all damage.
    Null,
    /// Landed for multiplied damage.
    Critical,
    /// Landed for regular damage.
    Hit,
}

impl AttackOutcome {
    /// Whether the defender loses health and the weapon loses a use.
    pub fn lands(self) -> bool {
        matches!(self, AttackOutcome::Critical | AttackOutcome::Hit)
    }
}

/// Raw strike numbers before rolling.
///
/// With a usable weapon:
///
/// ```text
/// hit    = skill * 2 + weapon.hit + luck / 2
/// damage = strength + weapon.might - defender.defense
/// crit   = skill / 2 + weapon.crit - defender.luck
/// ```
///
/// Unarmed (no active weapon, or a broken one) drops the weapon terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrikeProfile {
    pub hit: i32,
    pub damage: i32,
    pub crit: i32,
    pub armed: bool,
}

impl StrikeProfile {
    pub fn between(attacker: &Unit, defender: &Unit) -> Self {
        let stats = &attacker.stats;
        let base_hit = stats.skill * 2 + stats.luck / 2;
        let base_crit = stats.skill / 2 - defender.stats.luck;
        let base_damage = stats.strength - defender.stats.defense;

        match attacker.usable_weapon() {
            Some(weapon) => Self {
                hit: base_hit + weapon.hit,
                damage: base_damage + weapon.might,
                crit: base_crit + weapon.crit,
                armed: true,
            },
            None => Self {
                hit: base_hit,
                damage: base_damage,
                crit: base_crit,
                armed: false,
            },
        }
    }
}

/// The two independent percentile draws of a strike, each in `0..100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatRolls {
    pub hit: u32,
    pub crit: u32,
}

impl CombatRolls {
    pub const fn new(hit: u32, crit: u32) -> Self {
        Self { hit, crit }
    }
}

/// A strike decided but not yet applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    pub outcome: AttackOutcome,
    /// Health the defender should lose (already multiplied on a critical).
    pub damage: u32,
    /// Whether the attacker's active weapon loses a use.
    pub wears_weapon: bool,
}

/// Decides one strike.
pub fn resolve_strike(
    attacker: &Unit,
    defender: &Unit,
    rolls: CombatRolls,
    crit_multiplier: u32,
) -> Strike {
    let profile = StrikeProfile::between(attacker, defender);
    let hit = (rolls.hit as i64) < profile.hit as i64;
    let critical = (rolls.crit as i64) < profile.crit as i64;

    let outcome = if !hit {
        AttackOutcome::Miss
    } else if profile.damage <= 0 {
        AttackOutcome::Null
    } else if critical {
        AttackOutcome::Critical
    } else {
        AttackOutcome::Hit
    };

    let damage = match outcome {
        AttackOutcome::Miss | AttackOutcome::Null => 0,
        AttackOutcome::Critical => (profile.damage as u32).saturating_mul(crit_multiplier),
        AttackOutcome::Hit => profile.damage as u32,
    };

    Strike {
        outcome,
        damage,
        wears_weapon: outcome.lands() && profile.armed,
    }
}

/// One applied strike, as reported to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundReport {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub outcome: AttackOutcome,
    /// Health the strike actually removed.
    pub damage: u32,
    /// Defender health after the strike.
    pub defender_health: u32,
    /// Weapon condition after the strike, when a use was spent.
    pub weapon: Option<WeaponWear>,
}
