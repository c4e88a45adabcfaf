//! Expected numbers for a prospective exchange.

use crate::state::{Unit, UnitId};

use super::round::StrikeProfile;
use super::strikes::number_of_attacks;

/// What one side would do in the exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideForecast {
    pub unit: UnitId,
    /// Chance to hit, in percent.
    pub hit_chance: u32,
    /// Damage per regular hit; zero when the defense soaks everything.
    pub damage: u32,
    /// Chance to crit on a hit, in percent.
    pub crit_chance: u32,
    pub strikes: u32,
}

impl SideForecast {
    fn new(striker: &Unit, target: &Unit, strikes: u32) -> Self {
        let profile = StrikeProfile::between(striker, target);
        Self {
            unit: striker.id,
            hit_chance: profile.hit.clamp(0, 100) as u32,
            damage: profile.damage.max(0) as u32,
            crit_chance: profile.crit.clamp(0, 100) as u32,
            strikes,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatForecast {
    pub attacker: SideForecast,
    pub defender: SideForecast,
}

/// Forecast for `attacker` engaging `defender` from `distance`.
pub fn forecast(attacker: &Unit, defender: &Unit, distance: u32) -> CombatForecast {
    let counts = number_of_attacks(attacker, defender, distance);
    CombatForecast {
        attacker: SideForecast::new(attacker, defender, counts.attacker),
        defender: SideForecast::new(defender, attacker, counts.defender),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CoreStats, TeamId, Weapon};

    #[test]
    fn chances_are_clamped_to_percentages() {
        let ace = Unit::new(UnitId(1), "ace", TeamId(0), CoreStats::new(9, 40, 9, 10, 5, 0), 20)
            .with_weapon(Weapon::new("Blade", 5, 90, 30, 10));
        let dummy = Unit::new(UnitId(2), "dummy", TeamId(1), CoreStats::new(1, 0, 0, 90, 20, 0), 20);

        let preview = forecast(&ace, &dummy, 1);
        assert_eq!(preview.attacker.hit_chance, 100);
        assert_eq!(preview.attacker.crit_chance, 0);
        assert_eq!(preview.attacker.strikes, 2);
        assert_eq!(preview.defender.damage, 0);
        assert_eq!(preview.defender.strikes, 1);
    }
}
