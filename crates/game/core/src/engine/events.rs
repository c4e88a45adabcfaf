use std::collections::BTreeSet;

use crate::combat::BattleReport;
use crate::state::{Position, TeamId, UnitId};

use super::ActionMenu;

/// Something the presentation layer should show, in the order it happened.
///
/// Every engine call returns the events it produced; the engine never calls
/// back into the host.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineEvent {
    /// Highlight the cells a selected unit can move to and threaten.
    AreaHighlighted {
        origin: Position,
        unit: Option<UnitId>,
        move_area: BTreeSet<Position>,
        attack_area: BTreeSet<Position>,
    },
    UnitMoved {
        unit: UnitId,
        from: Position,
        to: Position,
    },
    /// A cancelled action put the unit back where it started.
    MoveUndone {
        unit: UnitId,
        from: Position,
        to: Position,
    },
    MenuRequested {
        unit: UnitId,
        menu: ActionMenu,
    },
    /// Attack was chosen without a target; pick one of these.
    TargetsRequested {
        unit: UnitId,
        targets: Vec<UnitId>,
    },
    InventoryRequested {
        unit: UnitId,
    },
    WeaponEquipped {
        unit: UnitId,
        slot: usize,
    },
    CombatResolved(BattleReport),
    WeaponBroke {
        unit: UnitId,
    },
    LevelUp {
        unit: UnitId,
        level: u32,
    },
    UnitWaited {
        unit: UnitId,
    },
    UnitDeployed {
        unit: UnitId,
        team: TeamId,
        position: Position,
    },
    UnitDefeated {
        unit: UnitId,
        team: TeamId,
    },
    /// The team's boss fell and the rest of the team left the field.
    TeamRouted {
        team: TeamId,
    },
    TeamDefeated {
        team: TeamId,
    },
    Victory {
        team: TeamId,
    },
    TurnEnded {
        team: TeamId,
    },
    TurnStarted {
        team: TeamId,
        round: u32,
    },
    /// The selection went back to idle; clear highlights and menus.
    SelectionReset,
}
