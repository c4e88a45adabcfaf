//! Combat resolution.
//!
//! Strike numbers and outcomes are pure functions of the two units and the
//! rolls ([`number_of_attacks`], [`resolve_strike`], [`forecast`]).
//! [`resolve_exchange`] sequences the strikes against a [`GameState`], draws
//! rolls from the RNG oracle, awards experience and removes the dead.
//!
//! [`GameState`]: crate::state::GameState

mod error;
mod exchange;
mod experience;
mod forecast;
mod round;
mod strikes;

pub use error::CombatError;
pub use exchange::{BattleReport, Casualty, resolve_exchange};
pub use experience::{ExperienceAward, bonus_ceiling, experience_points, level_diff};
pub use forecast::{CombatForecast, SideForecast, forecast};
pub use round::{AttackOutcome, CombatRolls, RoundReport, Strike, StrikeProfile, resolve_strike};
pub use strikes::{StrikeCounts, number_of_attacks};
