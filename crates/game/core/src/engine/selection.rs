//! Coordinate-driven selection state machine.
//!
//! ```text
//! Idle --select--> UnitSelected --select same cell--> AwaitingAction
//!                       |  \--select enemy in reach--> (approach) AwaitingAction
//!                       \--select move-area cell----> (move) AwaitingAction
//! AwaitingAction --Attack, no target--> TargetSelection --select enemy--> combat
//! AwaitingAction --Attack / Wait--> Idle
//! any --cancel--> Idle (moves undone)
//! ```

use std::collections::BTreeSet;

use arrayvec::ArrayVec;
use ordered_float::OrderedFloat;

use crate::env::MapDimensions;
use crate::state::{Position, RangeBand, UnitId};

use super::{EngineError, EngineEvent, GameEngine};

/// Entries of the action menu.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionChoice {
    Attack,
    Items,
    Wait,
    Cancel,
}

/// The options offered to a unit, in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionMenu {
    options: ArrayVec<ActionChoice, 4>,
}

impl ActionMenu {
    /// Attack only with an enemy in reach, Items only with something carried.
    pub fn new(can_attack: bool, carries_weapons: bool) -> Self {
        let mut options = ArrayVec::new();
        if can_attack {
            options.push(ActionChoice::Attack);
        }
        if carries_weapons {
            options.push(ActionChoice::Items);
        }
        options.push(ActionChoice::Wait);
        options.push(ActionChoice::Cancel);
        Self { options }
    }

    pub fn options(&self) -> &[ActionChoice] {
        &self.options
    }

    pub fn offers(&self, choice: ActionChoice) -> bool {
        self.options.contains(&choice)
    }
}

/// Where the selection flow stands between inputs.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionState {
    #[default]
    Idle,
    /// A cell was picked. Both areas are empty when the cell is empty or its
    /// unit has already played.
    UnitSelected {
        origin: Position,
        unit: Option<UnitId>,
        move_area: BTreeSet<Position>,
        attack_area: BTreeSet<Position>,
    },
    /// The menu is open for `unit`, standing on `current` after leaving
    /// `origin`.
    AwaitingAction {
        unit: UnitId,
        origin: Position,
        current: Position,
        target: Option<UnitId>,
        menu: ActionMenu,
    },
    /// Attack was chosen without a target.
    TargetSelection {
        unit: UnitId,
        origin: Position,
        current: Position,
    },
}

impl SelectionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SelectionState::Idle)
    }

    /// Unit that has the menu open or is choosing a target.
    pub fn acting_unit(&self) -> Option<UnitId> {
        match self {
            SelectionState::AwaitingAction { unit, .. }
            | SelectionState::TargetSelection { unit, .. } => Some(*unit),
            _ => None,
        }
    }

    pub fn move_area(&self) -> Option<&BTreeSet<Position>> {
        match self {
            SelectionState::UnitSelected { move_area, .. } => Some(move_area),
            _ => None,
        }
    }

    pub fn attack_area(&self) -> Option<&BTreeSet<Position>> {
        match self {
            SelectionState::UnitSelected { attack_area, .. } => Some(attack_area),
            _ => None,
        }
    }

    /// Cells where a move started and currently stands, if one is in progress.
    fn pending_move(&self) -> Option<(UnitId, Position, Position)> {
        match self {
            SelectionState::AwaitingAction {
                unit,
                origin,
                current,
                ..
            }
            | SelectionState::TargetSelection {
                unit,
                origin,
                current,
            } => Some((*unit, *origin, *current)),
            _ => None,
        }
    }
}

/// Cells within `band` of some cell of `move_area`, minus `reachable`.
fn threatened_cells(
    dimensions: MapDimensions,
    move_area: &BTreeSet<Position>,
    reachable: &BTreeSet<Position>,
    band: RangeBand,
) -> BTreeSet<Position> {
    // No cell is farther apart than width + height.
    let extent = dimensions.width.saturating_add(dimensions.height);
    let reach = i32::try_from(band.max.min(extent)).unwrap_or(i32::MAX);
    let mut cells = BTreeSet::new();
    for from in move_area {
        for dx in -reach..=reach {
            let span = reach - dx.abs();
            for dy in -span..=span {
                let cell = Position::new(from.x + dx, from.y + dy);
                if dimensions.contains(cell)
                    && band.contains(from.manhattan_distance(cell))
                    && !reachable.contains(&cell)
                {
                    cells.insert(cell);
                }
            }
        }
    }
    cells
}

impl GameEngine<'_> {
    /// Feeds a clicked coordinate into the selection flow.
    ///
    /// An out-of-bounds coordinate cancels the current selection (undoing any
    /// pending move). The returned grid error is informational: by the time
    /// it is seen the selection is already back in Idle and needs no cleanup.
    pub fn select(&mut self, cell: Position) -> Result<Vec<EngineEvent>, EngineError> {
        self.ensure_running()?;
        let mut events = Vec::new();

        if let Err(error) = self.state.grid.unit_at(cell) {
            self.reset(&mut events)?;
            return Err(error.into());
        }

        match self.session.selection {
            SelectionState::Idle => self.highlight(cell, &mut events),
            SelectionState::UnitSelected { .. } => self.select_from_unit(cell, &mut events)?,
            SelectionState::AwaitingAction { .. } => {
                self.reset(&mut events)?;
                self.highlight(cell, &mut events);
            }
            SelectionState::TargetSelection {
                unit,
                origin,
                current,
            } => {
                let target = self
                    .state
                    .unit_at(cell)
                    .map(|occupant| occupant.id)
                    .filter(|&target| self.state.enemies_in_range(unit, current).contains(&target));
                match target {
                    Some(target) => self.engage(unit, target, &mut events)?,
                    None => self.open_menu(unit, origin, current, None, &mut events),
                }
            }
        }

        Ok(events)
    }

    /// Rules for a selection while a cell is already selected.
    fn select_from_unit(
        &mut self,
        cell: Position,
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), EngineError> {
        let SelectionState::UnitSelected {
            origin,
            unit: Some(unit),
            move_area,
            ..
        } = std::mem::take(&mut self.session.selection)
        else {
            events.push(EngineEvent::SelectionReset);
            self.highlight(cell, events);
            return Ok(());
        };
        let actionable = self.can_act(unit);

        if cell == origin && actionable {
            self.open_menu(unit, origin, origin, None, events);
            return Ok(());
        }

        if let Some(occupant) = self.state.unit_at(cell).map(|other| other.id) {
            if occupant != unit {
                let destination = if actionable {
                    self.approach(unit, origin, occupant, &move_area)
                } else {
                    None
                };
                match destination {
                    Some(destination) => {
                        self.relocate(unit, origin, destination, events)?;
                        self.open_menu(unit, origin, destination, Some(occupant), events);
                    }
                    None => self.highlight(cell, events),
                }
                return Ok(());
            }
        }

        if actionable && move_area.contains(&cell) {
            self.relocate(unit, origin, cell, events)?;
            self.open_menu(unit, origin, cell, None, events);
            return Ok(());
        }

        events.push(EngineEvent::SelectionReset);
        self.highlight(cell, events);
        Ok(())
    }

    /// Fresh selection of `cell`: computes and highlights its unit's areas.
    fn highlight(&mut self, cell: Position, events: &mut Vec<EngineEvent>) {
        let occupant = self
            .state
            .unit_at(cell)
            .map(|unit| (unit.id, unit.played, unit.movement, unit.range_band()));

        let (unit, move_area, attack_area) = match occupant {
            Some((id, false, movement, band)) => {
                let reachable = self
                    .session
                    .pathfinder
                    .area(&*self.state, cell, movement, true);
                let move_area: BTreeSet<Position> = reachable
                    .iter()
                    .copied()
                    .filter(|&candidate| {
                        self.state
                            .grid
                            .unit_at(candidate)
                            .ok()
                            .flatten()
                            .is_none_or(|other| other == id)
                    })
                    .collect();
                let attack_area =
                    threatened_cells(self.state.grid.dimensions(), &move_area, &reachable, band);
                (Some(id), move_area, attack_area)
            }
            Some((id, true, ..)) => (Some(id), BTreeSet::new(), BTreeSet::new()),
            None => (None, BTreeSet::new(), BTreeSet::new()),
        };

        tracing::debug!(
            origin = %cell,
            moves = move_area.len(),
            threats = attack_area.len(),
            "cell selected"
        );
        events.push(EngineEvent::AreaHighlighted {
            origin: cell,
            unit,
            move_area: move_area.clone(),
            attack_area: attack_area.clone(),
        });
        self.session.selection = SelectionState::UnitSelected {
            origin: cell,
            unit,
            move_area,
            attack_area,
        };
    }

    /// Cell from which `unit` can strike `target`, if attacking is legal.
    ///
    /// Prefers the first in-reach cell along the shortest path towards the
    /// target (the origin included), then the cheapest in-reach cell of the
    /// move area.
    fn approach(
        &mut self,
        unit: UnitId,
        origin: Position,
        target: UnitId,
        move_area: &BTreeSet<Position>,
    ) -> Option<Position> {
        if !self.state.are_enemies(unit, target) {
            return None;
        }
        let (movement, band) = self
            .state
            .unit(unit)
            .map(|unit| (unit.movement, unit.range_band()))?;
        let goal = self.state.unit(target)?.position;
        let in_reach =
            |cell: &Position| move_area.contains(cell) && band.contains(cell.manhattan_distance(goal));

        if !move_area.iter().any(in_reach) {
            return None;
        }

        let path = self
            .session
            .pathfinder
            .shortest_path(&*self.state, origin, goal, movement, true);
        if let Some(cell) = std::iter::once(origin).chain(path).find(|cell| in_reach(cell)) {
            return Some(cell);
        }

        let state = &*self.state;
        let pathfinder = &mut self.session.pathfinder;
        move_area
            .iter()
            .copied()
            .filter(|cell| in_reach(cell))
            .min_by_key(|&cell| {
                let cost = pathfinder
                    .distance(state, origin, cell, true)
                    .unwrap_or(f32::INFINITY);
                (OrderedFloat(cost), cell)
            })
    }

    fn open_menu(
        &mut self,
        unit: UnitId,
        origin: Position,
        current: Position,
        target: Option<UnitId>,
        events: &mut Vec<EngineEvent>,
    ) {
        let in_reach = self.state.enemies_in_range(unit, current);
        let carries = self
            .state
            .unit(unit)
            .is_some_and(|unit| !unit.inventory.is_empty());
        let menu = ActionMenu::new(!in_reach.is_empty(), carries);
        let target = target.filter(|target| in_reach.contains(target));

        tracing::debug!(%unit, at = %current, options = ?menu.options(), "menu opened");
        events.push(EngineEvent::MenuRequested {
            unit,
            menu: menu.clone(),
        });
        self.session.selection = SelectionState::AwaitingAction {
            unit,
            origin,
            current,
            target,
            menu,
        };
    }

    /// Answers the open action menu.
    pub fn choose(&mut self, choice: ActionChoice) -> Result<Vec<EngineEvent>, EngineError> {
        self.ensure_running()?;
        let SelectionState::AwaitingAction {
            unit,
            origin,
            current,
            target,
            ref menu,
        } = self.session.selection
        else {
            return Err(EngineError::MenuNotOpen);
        };
        if !menu.offers(choice) {
            tracing::warn!(%unit, %choice, "choice not offered");
            return Err(EngineError::ChoiceUnavailable { choice });
        }

        let mut events = Vec::new();
        match choice {
            ActionChoice::Attack => match target {
                Some(target) => self.engage(unit, target, &mut events)?,
                None => {
                    let targets = self.state.enemies_in_range(unit, current);
                    self.session.selection = SelectionState::TargetSelection {
                        unit,
                        origin,
                        current,
                    };
                    events.push(EngineEvent::TargetsRequested { unit, targets });
                }
            },
            ActionChoice::Items => events.push(EngineEvent::InventoryRequested { unit }),
            ActionChoice::Wait => {
                if let Some(record) = self.state.unit_mut(unit) {
                    record.played = true;
                }
                tracing::debug!(%unit, "unit waits");
                self.session.selection = SelectionState::Idle;
                events.push(EngineEvent::UnitWaited { unit });
                events.push(EngineEvent::SelectionReset);
                self.rotate_if_exhausted(&mut events);
            }
            ActionChoice::Cancel => self.reset(&mut events)?,
        }
        Ok(events)
    }

    /// Makes `slot` the active weapon of the unit whose menu is open, then
    /// re-surfaces the menu.
    pub fn equip(&mut self, slot: usize) -> Result<Vec<EngineEvent>, EngineError> {
        self.ensure_running()?;
        let SelectionState::AwaitingAction {
            unit,
            origin,
            current,
            target,
            ..
        } = self.session.selection
        else {
            return Err(EngineError::MenuNotOpen);
        };

        let record = self
            .state
            .unit_mut(unit)
            .ok_or(EngineError::NoActiveSelection)?;
        record.inventory.equip(slot).inspect_err(|error| {
            tracing::warn!(%unit, slot, %error, "equip rejected");
        })?;

        let mut events = vec![EngineEvent::WeaponEquipped { unit, slot }];
        self.open_menu(unit, origin, current, target, &mut events);
        Ok(events)
    }

    /// Undoes any pending move and returns to idle.
    pub fn cancel(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        self.ensure_running()?;
        let mut events = Vec::new();
        self.reset(&mut events)?;
        Ok(events)
    }

    /// Shared by cancel, out-of-bounds selection and end of turn.
    pub(super) fn reset(&mut self, events: &mut Vec<EngineEvent>) -> Result<(), EngineError> {
        if let Some((unit, origin, current)) = self.session.selection.pending_move() {
            if current != origin {
                self.state.move_unit(current, origin)?;
                self.session.pathfinder.invalidate();
                tracing::debug!(%unit, from = %current, to = %origin, "move undone");
                events.push(EngineEvent::MoveUndone {
                    unit,
                    from: current,
                    to: origin,
                });
            }
        }
        if !self.session.selection.is_idle() {
            self.session.selection = SelectionState::Idle;
            events.push(EngineEvent::SelectionReset);
        }
        Ok(())
    }
}
