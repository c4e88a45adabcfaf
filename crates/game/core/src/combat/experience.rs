//! Experience awarded to the winning side of an exchange.

use crate::config::GameConfig;
use crate::state::{Unit, UnitId};

/// Experience granted after an exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperienceAward {
    pub unit: UnitId,
    pub points: u32,
    /// Level reached when the award crossed a level boundary.
    pub new_level: Option<u32>,
}

/// Level gap used to scale damage into experience.
///
/// Never zero, so equal levels scale by one.
pub fn level_diff(winner: &Unit, victim: &Unit) -> u32 {
    winner.level.abs_diff(victim.level).max(1)
}

/// Largest bonus roll the winner's luck allows.
pub fn bonus_ceiling(winner: &Unit) -> u32 {
    (winner.stats.luck / 2).max(0) as u32
}

/// Points earned by `winner` against `victim`.
///
/// `bonus` is the luck roll, already drawn from `0..=bonus_ceiling(winner)`;
/// it only counts when damage was dealt.
pub fn experience_points(
    winner: &Unit,
    victim: &Unit,
    damage_dealt: u32,
    victim_died: bool,
    bonus: u32,
) -> u32 {
    let mut points = 1u32;

    if damage_dealt > 0 {
        let diff = level_diff(winner, victim);
        let scaled = if victim.level < winner.level {
            damage_dealt / diff
        } else {
            damage_dealt.saturating_mul(diff)
        };
        points = points.saturating_add(scaled).saturating_add(bonus);
    }

    if victim_died {
        points = points.saturating_add(damage_dealt / 2);
    }

    points.min(GameConfig::MAX_EXPERIENCE_GAIN)
}
