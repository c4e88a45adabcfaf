//! Movement areas and shortest paths over the weighted obstacle grid.
//!
//! [`Pathfinder`] answers area and path queries from a [`NavigationOracle`]
//! (implemented by [`GameState`]) and memoizes the last search. The cache is
//! keyed on the query inputs only, so callers must call
//! [`Pathfinder::invalidate`] after any occupancy change; the engine does this
//! after every move, undo and death.

mod cache;
mod search;

use std::collections::BTreeSet;

use ordered_float::OrderedFloat;

pub use cache::{PathKey, SearchCache, SearchKey};
pub use search::{DistanceField, Link};

use crate::env::MapDimensions;
use crate::state::{GameState, Neighbors, Position, UnitId};

/// Read-only view of the grid the search runs on.
pub trait NavigationOracle {
    fn dimensions(&self) -> MapDimensions;

    fn neighbors(&self, position: Position) -> Neighbors;

    /// Cost of stepping onto `position`; `None` outside the map.
    fn entry_cost(&self, position: Position) -> Option<f32>;

    fn occupant(&self, position: Position) -> Option<UnitId>;

    /// Whether `position` blocks `asking` (enemy or disallowed terrain).
    fn blocks(&self, position: Position, asking: Option<UnitId>) -> bool;
}

impl NavigationOracle for GameState {
    fn dimensions(&self) -> MapDimensions {
        self.grid.dimensions()
    }

    fn neighbors(&self, position: Position) -> Neighbors {
        self.grid.neighbors(position)
    }

    fn entry_cost(&self, position: Position) -> Option<f32> {
        self.grid
            .terrain_at(position)
            .ok()
            .map(|terrain| terrain.movement_cost())
    }

    fn occupant(&self, position: Position) -> Option<UnitId> {
        self.grid.unit_at(position).ok().flatten()
    }

    fn blocks(&self, position: Position, asking: Option<UnitId>) -> bool {
        self.is_obstacle(position, asking).unwrap_or(true)
    }
}

/// Cached area and path queries.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    cache: SearchCache,
    searches: u64,
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of full searches run so far; cache hits do not count.
    pub fn searches_performed(&self) -> u64 {
        self.searches
    }

    /// Forgets cached results.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    fn field<N>(&mut self, nav: &N, key: SearchKey) -> &DistanceField
    where
        N: NavigationOracle + ?Sized,
    {
        let searches = &mut self.searches;
        self.cache.field_or_compute(key, || {
            *searches += 1;
            tracing::debug!(
                source = %key.source,
                obstacles = key.obstacles_enabled,
                "running distance search"
            );
            DistanceField::compute(nav, key)
        })
    }

    /// Cells reachable from `source` within `max_distance`, source included.
    pub fn area<N>(
        &mut self,
        nav: &N,
        source: Position,
        max_distance: f32,
        obstacles_enabled: bool,
    ) -> BTreeSet<Position>
    where
        N: NavigationOracle + ?Sized,
    {
        self.field(nav, SearchKey::new(source, obstacles_enabled))
            .within(max_distance)
            .collect()
    }

    /// Finite walking cost between two cells.
    pub fn distance<N>(
        &mut self,
        nav: &N,
        source: Position,
        target: Position,
        obstacles_enabled: bool,
    ) -> Option<f32>
    where
        N: NavigationOracle + ?Sized,
    {
        self.field(nav, SearchKey::new(source, obstacles_enabled))
            .distance(target)
    }

    /// Walkable route from `source` (excluded) towards `target`.
    ///
    /// Cells beyond `max_distance` are dropped, then trailing cells that are
    /// occupied or block the unit at `source` are trimmed, so the last cell is
    /// always somewhere the unit could stop. Empty when `source == target` or
    /// when nothing links the two.
    pub fn shortest_path<N>(
        &mut self,
        nav: &N,
        source: Position,
        target: Position,
        max_distance: f32,
        obstacles_enabled: bool,
    ) -> Vec<Position>
    where
        N: NavigationOracle + ?Sized,
    {
        if source == target {
            return Vec::new();
        }

        let search = SearchKey::new(source, obstacles_enabled);
        let key = PathKey {
            search,
            target,
            max_distance: OrderedFloat(max_distance),
        };
        // Touch the field first: a field miss also drops the cached path.
        self.field(nav, search);
        if let Some(path) = self.cache.path(&key) {
            return path.to_vec();
        }

        let field = self.field(nav, search);
        let asking = field.asking();
        let mut path: Vec<Position> = field
            .trace(target)
            .unwrap_or_default()
            .into_iter()
            .filter(|&step| field.raw_distance(step) <= max_distance + search::COST_EPSILON)
            .collect();

        while let Some(&last) = path.last() {
            if nav.occupant(last).is_some() || nav.blocks(last, asking) {
                path.pop();
            } else {
                break;
            }
        }

        self.cache.store_path(key, path.clone());
        path
    }
}
