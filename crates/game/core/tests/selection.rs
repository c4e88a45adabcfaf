mod common;

use common::{BLUE, Fixture, RED, ScriptedRng, battle, bow, menu_of, plain_grid, soldier, sword};
use tactics_core::{
    ActionChoice, EngineError, EngineEvent, GridError, Inventory, Position, SelectionState,
    StateError, UnitId,
};

const HERO: UnitId = UnitId(1);
const RAIDER: UnitId = UnitId(2);
const SQUIRE: UnitId = UnitId(3);

/// Hero at the origin with a sword, a raider three cells east, a squire in
/// the far corner so Blue's turn does not end after one action.
fn skirmish() -> Fixture {
    let mut state = battle(plain_grid(6, 6));
    state
        .deploy(soldier(1, BLUE, 0, 0).with_weapon(sword()))
        .unwrap();
    state.deploy(soldier(2, RED, 3, 0)).unwrap();
    state.deploy(soldier(3, BLUE, 5, 5)).unwrap();
    Fixture::new(state, ScriptedRng::always_hit())
}

#[test]
fn selecting_a_unit_highlights_its_areas() {
    let mut table = skirmish();
    let events = table.engine().select(Position::ORIGIN).unwrap();

    let [EngineEvent::AreaHighlighted {
        unit,
        move_area,
        attack_area,
        ..
    }] = events.as_slice()
    else {
        panic!("unexpected events: {events:?}");
    };
    assert_eq!(*unit, Some(HERO));
    assert_eq!(move_area.len(), 6);
    assert_eq!(attack_area.len(), 4);
    assert!(attack_area.contains(&Position::new(3, 0)));
    assert!(attack_area.is_disjoint(move_area));
    assert!(matches!(
        table.session.selection(),
        SelectionState::UnitSelected { .. }
    ));
}

#[test]
fn move_area_excludes_cells_held_by_allies() {
    let mut state = battle(plain_grid(4, 1));
    state.deploy(soldier(1, BLUE, 0, 0)).unwrap();
    state.deploy(soldier(3, BLUE, 1, 0)).unwrap();
    state.deploy(soldier(2, RED, 3, 0)).unwrap();
    let mut table = Fixture::new(state, ScriptedRng::always_hit());

    table.engine().select(Position::ORIGIN).unwrap();
    let move_area = table.session.selection().move_area().unwrap();
    assert!(!move_area.contains(&Position::new(1, 0)));
    assert!(move_area.contains(&Position::new(2, 0)));
}

#[test]
fn selecting_the_same_unit_twice_opens_the_menu() {
    let mut table = skirmish();
    table.engine().select(Position::ORIGIN).unwrap();
    let events = table.engine().select(Position::ORIGIN).unwrap();

    assert_eq!(
        menu_of(&events),
        Some(vec![
            ActionChoice::Items,
            ActionChoice::Wait,
            ActionChoice::Cancel
        ])
    );
    assert_eq!(table.session.selection().acting_unit(), Some(HERO));
}

#[test]
fn moving_next_to_an_enemy_offers_attack_and_cancel_undoes_it() {
    let mut table = skirmish();
    table.engine().select(Position::ORIGIN).unwrap();
    let events = table.engine().select(Position::new(2, 0)).unwrap();

    assert!(events.iter().any(|event| matches!(
        event,
        EngineEvent::UnitMoved { unit: HERO, to, .. } if *to == Position::new(2, 0)
    )));
    assert_eq!(menu_of(&events).unwrap()[0], ActionChoice::Attack);
    assert_eq!(table.position_of(HERO), Some(Position::new(2, 0)));

    let events = table.engine().choose(ActionChoice::Cancel).unwrap();
    assert!(matches!(events[0], EngineEvent::MoveUndone { unit: HERO, .. }));
    assert!(matches!(events[1], EngineEvent::SelectionReset));
    assert_eq!(table.position_of(HERO), Some(Position::ORIGIN));
    assert!(table.session.selection().is_idle());
    table.state.validate_occupancy().unwrap();
}

#[test]
fn selecting_an_enemy_approaches_and_queues_it_as_target() {
    let mut table = skirmish();
    table.engine().select(Position::ORIGIN).unwrap();
    let events = table.engine().select(Position::new(3, 0)).unwrap();

    assert_eq!(table.position_of(HERO), Some(Position::new(2, 0)));
    assert!(menu_of(&events).unwrap().contains(&ActionChoice::Attack));
    assert!(matches!(
        table.session.selection(),
        SelectionState::AwaitingAction {
            target: Some(RAIDER),
            ..
        }
    ));

    let events = table.engine().choose(ActionChoice::Attack).unwrap();
    let report = events
        .iter()
        .find_map(|event| match event {
            EngineEvent::CombatResolved(report) => Some(report),
            _ => None,
        })
        .unwrap();
    assert_eq!(report.attacker, HERO);
    assert_eq!(report.defender, RAIDER);
    assert_eq!(report.distance, 1);
    assert!(table.state.unit(HERO).unwrap().played);
    assert!(table.session.selection().is_idle());
}

#[test]
fn enemy_out_of_reach_just_gets_highlighted() {
    let mut state = battle(plain_grid(8, 1));
    state.deploy(soldier(1, BLUE, 0, 0)).unwrap();
    state.deploy(soldier(2, RED, 7, 0)).unwrap();
    let mut table = Fixture::new(state, ScriptedRng::always_hit());

    table.engine().select(Position::ORIGIN).unwrap();
    let events = table.engine().select(Position::new(7, 0)).unwrap();
    assert!(matches!(
        events.as_slice(),
        [EngineEvent::AreaHighlighted {
            unit: Some(RAIDER),
            ..
        }]
    ));
    assert_eq!(table.position_of(HERO), Some(Position::ORIGIN));
}

#[test]
fn attack_without_target_waits_for_one() {
    let mut table = skirmish();
    table.engine().select(Position::ORIGIN).unwrap();
    table.engine().select(Position::new(2, 0)).unwrap();

    let events = table.engine().choose(ActionChoice::Attack).unwrap();
    assert_eq!(
        events,
        vec![EngineEvent::TargetsRequested {
            unit: HERO,
            targets: vec![RAIDER]
        }]
    );

    // An empty cell goes back to the menu without undoing the move.
    let events = table.engine().select(Position::new(4, 4)).unwrap();
    assert!(menu_of(&events).is_some());
    assert_eq!(table.position_of(HERO), Some(Position::new(2, 0)));

    table.engine().choose(ActionChoice::Attack).unwrap();
    let events = table.engine().select(Position::new(3, 0)).unwrap();
    assert!(events
        .iter()
        .any(|event| matches!(event, EngineEvent::CombatResolved(_))));
}

#[test]
fn equipping_a_bow_reaches_a_distant_enemy() {
    let mut state = battle(plain_grid(6, 6));
    let mut inventory = Inventory::armed(sword());
    inventory.push(bow()).unwrap();
    state
        .deploy(soldier(1, BLUE, 0, 0).with_inventory(inventory))
        .unwrap();
    state.deploy(soldier(2, RED, 2, 0)).unwrap();
    let mut table = Fixture::new(state, ScriptedRng::always_hit());

    table.engine().select(Position::ORIGIN).unwrap();
    let events = table.engine().select(Position::ORIGIN).unwrap();
    assert!(!menu_of(&events).unwrap().contains(&ActionChoice::Attack));

    let events = table.engine().choose(ActionChoice::Items).unwrap();
    assert_eq!(events, vec![EngineEvent::InventoryRequested { unit: HERO }]);

    let events = table.engine().equip(1).unwrap();
    assert_eq!(events[0], EngineEvent::WeaponEquipped { unit: HERO, slot: 1 });
    assert!(menu_of(&events).unwrap().contains(&ActionChoice::Attack));
    assert_eq!(
        table.state.unit(HERO).unwrap().inventory.active_slot(),
        Some(1)
    );
}

#[test]
fn menu_calls_need_an_open_menu() {
    let mut table = skirmish();
    assert_eq!(
        table.engine().choose(ActionChoice::Wait),
        Err(EngineError::MenuNotOpen)
    );
    assert_eq!(table.engine().equip(0), Err(EngineError::MenuNotOpen));
    assert!(matches!(
        table.engine().preview(RAIDER),
        Err(EngineError::NoActiveSelection)
    ));
}

#[test]
fn choices_missing_from_the_menu_are_rejected() {
    let mut table = skirmish();
    table.engine().select(Position::ORIGIN).unwrap();
    table.engine().select(Position::ORIGIN).unwrap();
    assert_eq!(
        table.engine().choose(ActionChoice::Attack),
        Err(EngineError::ChoiceUnavailable {
            choice: ActionChoice::Attack
        })
    );
}

#[test]
fn out_of_bounds_selection_resets_and_undoes() {
    let mut table = skirmish();
    table.engine().select(Position::ORIGIN).unwrap();
    table.engine().select(Position::new(1, 1)).unwrap();

    let error = table.engine().select(Position::new(-1, 0)).unwrap_err();
    assert!(matches!(
        error,
        EngineError::Grid(GridError::OutOfBounds { .. })
    ));
    assert!(table.session.selection().is_idle());
    assert_eq!(table.position_of(HERO), Some(Position::ORIGIN));
}

#[test]
fn played_units_show_no_areas() {
    let mut table = skirmish();
    table.engine().select(Position::ORIGIN).unwrap();
    table.engine().select(Position::ORIGIN).unwrap();
    table.engine().choose(ActionChoice::Wait).unwrap();

    let events = table.engine().select(Position::ORIGIN).unwrap();
    assert!(matches!(
        &events[..],
        [EngineEvent::AreaHighlighted { move_area, attack_area, .. }]
            if move_area.is_empty() && attack_area.is_empty()
    ));

    // A second click is not a menu request for a played unit.
    let events = table.engine().select(Position::ORIGIN).unwrap();
    assert!(menu_of(&events).is_none());
}

#[test]
fn enemy_units_can_be_inspected_but_not_moved() {
    let mut table = skirmish();
    table.engine().select(Position::new(3, 0)).unwrap();
    let events = table.engine().select(Position::new(4, 0)).unwrap();

    assert!(!events
        .iter()
        .any(|event| matches!(event, EngineEvent::UnitMoved { .. })));
    assert_eq!(table.position_of(RAIDER), Some(Position::new(3, 0)));
}

#[test]
fn clicking_an_ally_switches_the_selection() {
    let mut table = skirmish();
    table.engine().select(Position::ORIGIN).unwrap();
    let events = table.engine().select(Position::new(5, 5)).unwrap();
    assert!(matches!(
        events.as_slice(),
        [EngineEvent::AreaHighlighted {
            unit: Some(SQUIRE),
            ..
        }]
    ));
}

#[test]
fn preview_reports_the_coming_exchange() {
    let mut table = skirmish();
    table.engine().select(Position::ORIGIN).unwrap();
    table.engine().select(Position::new(2, 0)).unwrap();

    let preview = table.engine().preview(RAIDER).unwrap();
    assert_eq!(preview.attacker.unit, HERO);
    assert_eq!(preview.attacker.hit_chance, 100);
    assert_eq!(preview.attacker.damage, 9);
    assert_eq!(preview.defender.strikes, 1);

    assert_eq!(
        table.engine().preview(UnitId(42)).unwrap_err(),
        EngineError::State(StateError::UnitNotFound { unit: UnitId(42) })
    );
}
