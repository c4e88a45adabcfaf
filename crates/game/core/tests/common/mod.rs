//! Shared fixtures for the scenario tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use tactics_core::{
    CoreStats, EngineEvent, GameConfig, GameEngine, GameEnv, GameState, Grid, MapDimensions,
    Position, RngOracle, Session, Team, TeamId, Terrain, Unit, UnitId, Weapon,
};

pub const BLUE: TeamId = TeamId(0);
pub const RED: TeamId = TeamId(1);

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds a grid cell by cell.
pub fn grid_with(width: u32, height: u32, terrain: impl Fn(Position) -> Terrain) -> Grid {
    let dimensions = MapDimensions::new(width, height);
    let layout = (0..dimensions.area())
        .filter_map(|index| dimensions.position_of(index))
        .map(terrain)
        .collect();
    Grid::new(dimensions, layout).expect("layout covers the grid")
}

pub fn plain_grid(width: u32, height: u32) -> Grid {
    Grid::uniform(MapDimensions::new(width, height), Terrain::plain())
}

/// Blue against Red, Blue acting first.
pub fn two_teams() -> Vec<Team> {
    vec![
        Team::new(BLUE, "Blue", 0)
            .with_color("blue")
            .with_music("march"),
        Team::new(RED, "Red", 4).with_color("red"),
    ]
}

pub fn battle(grid: Grid) -> GameState {
    GameState::new(grid, two_teams()).with_seed(7)
}

/// Average soldier with no luck, so experience bonus rolls never draw.
pub fn soldier(id: u32, team: TeamId, x: i32, y: i32) -> Unit {
    Unit::new(
        UnitId(id),
        format!("soldier-{id}"),
        team,
        CoreStats::new(6, 6, 5, 0, 2, 0),
        20,
    )
    .at(Position::new(x, y))
    .with_movement(2.0)
}

pub fn sword() -> Weapon {
    Weapon::new("Iron Sword", 5, 90, 0, 30)
}

pub fn bow() -> Weapon {
    Weapon::new("Iron Bow", 6, 85, 0, 30).with_range(2, 2)
}

/// Replays a fixed list of draws, then keeps returning `fallback`.
#[derive(Debug)]
pub struct ScriptedRng {
    draws: Mutex<VecDeque<u32>>,
    fallback: u32,
}

impl ScriptedRng {
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: Mutex::new(draws.into_iter().collect()),
            fallback: 99,
        }
    }

    /// Every hit roll lands, no crit roll succeeds.
    pub fn always_hit() -> Self {
        Self::cycle(&[0, 99], 64)
    }

    /// Every hit roll fails.
    pub fn always_miss() -> Self {
        Self::new([])
    }

    fn cycle(pattern: &[u32], repeats: usize) -> Self {
        Self::new(pattern.iter().copied().cycle().take(pattern.len() * repeats))
    }

    pub fn remaining(&self) -> usize {
        self.draws.lock().map(|draws| draws.len()).unwrap_or(0)
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.draws
            .lock()
            .ok()
            .and_then(|mut draws| draws.pop_front())
            .unwrap_or(self.fallback)
    }
}

/// Everything a host keeps between inputs.
pub struct Fixture {
    pub state: GameState,
    pub session: Session,
    pub config: GameConfig,
    pub rng: ScriptedRng,
}

impl Fixture {
    pub fn new(state: GameState, rng: ScriptedRng) -> Self {
        init_tracing();
        Self {
            state,
            session: Session::new(),
            config: GameConfig::default(),
            rng,
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn engine(&mut self) -> GameEngine<'_> {
        GameEngine::new(
            &mut self.state,
            &mut self.session,
            GameEnv::new(&self.config, &self.rng),
        )
    }

    pub fn position_of(&self, unit: UnitId) -> Option<Position> {
        self.state.unit(unit).map(|unit| unit.position)
    }
}

pub fn menu_of(events: &[EngineEvent]) -> Option<Vec<tactics_core::ActionChoice>> {
    events.iter().rev().find_map(|event| match event {
        EngineEvent::MenuRequested { menu, .. } => Some(menu.options().to_vec()),
        _ => None,
    })
}
