#![cfg(feature = "serde")]

mod common;

use common::{BLUE, Fixture, RED, ScriptedRng, battle, plain_grid, soldier, sword};
use tactics_core::{EngineEvent, GameState, Grid, Position, UnitId};

#[test]
fn mid_battle_state_survives_a_json_snapshot() {
    let mut state = battle(plain_grid(4, 4));
    state
        .deploy(soldier(1, BLUE, 0, 0).with_weapon(sword()))
        .unwrap();
    state.deploy(soldier(2, RED, 1, 0)).unwrap();
    let mut table = Fixture::new(state, ScriptedRng::always_hit());
    let events = table.engine().attack(UnitId(1), UnitId(2)).unwrap();

    let json = serde_json::to_string(&table.state).unwrap();
    let restored: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, table.state);
    restored.validate_occupancy().unwrap();

    let encoded = serde_json::to_value(&events).unwrap();
    let decoded: Vec<EngineEvent> = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, events);
    assert_eq!(restored.unit_at(Position::ORIGIN).map(|unit| unit.id.0), Some(1));
    assert_eq!(
        restored.turn.team(BLUE).and_then(|team| team.music.as_deref()),
        Some("march")
    );
}

#[test]
fn snapshot_with_a_short_layer_is_rejected() {
    let grid = plain_grid(3, 2);
    assert_eq!(
        serde_json::from_value::<Grid>(serde_json::to_value(&grid).unwrap()).unwrap(),
        grid
    );

    let mut short_terrain = serde_json::to_value(&grid).unwrap();
    short_terrain["terrain"].as_array_mut().unwrap().pop();
    assert!(serde_json::from_value::<Grid>(short_terrain).is_err());

    let mut short_occupancy = serde_json::to_value(&grid).unwrap();
    short_occupancy["occupancy"].as_array_mut().unwrap().pop();
    assert!(serde_json::from_value::<Grid>(short_occupancy).is_err());
}
