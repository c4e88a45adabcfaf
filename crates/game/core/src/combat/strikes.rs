//! Strike counts for an exchange.

use crate::state::Unit;

/// How many times each side strikes in one exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrikeCounts {
    pub attacker: u32,
    pub defender: u32,
}

impl StrikeCounts {
    pub const fn new(attacker: u32, defender: u32) -> Self {
        Self { attacker, defender }
    }

    pub fn total(&self) -> u32 {
        self.attacker + self.defender
    }
}

/// Strikes per side at the given distance.
///
/// Each side strikes once; a strictly faster side strikes twice. A side whose
/// usable weapon band (unarmed: `[1, 1]`) does not cover `distance` does not
/// strike at all, however fast it is.
pub fn number_of_attacks(attacker: &Unit, defender: &Unit, distance: u32) -> StrikeCounts {
    let mut counts = StrikeCounts::new(1, 1);

    if attacker.stats.speed > defender.stats.speed {
        counts.attacker += 1;
    } else if defender.stats.speed > attacker.stats.speed {
        counts.defender += 1;
    }

    if !attacker.can_strike_at(distance) {
        counts.attacker = 0;
    }
    if !defender.can_strike_at(distance) {
        counts.defender = 0;
    }

    counts
}
