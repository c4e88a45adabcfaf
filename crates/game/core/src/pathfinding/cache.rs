//! Single-slot memo for the last search and the last path query.

use ordered_float::OrderedFloat;

use crate::state::Position;

use super::search::DistanceField;

/// Inputs that determine a distance field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchKey {
    pub source: Position,
    pub obstacles_enabled: bool,
}

impl SearchKey {
    pub fn new(source: Position, obstacles_enabled: bool) -> Self {
        Self {
            source,
            obstacles_enabled,
        }
    }
}

/// Inputs that determine a trimmed shortest path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathKey {
    pub search: SearchKey,
    pub target: Position,
    pub max_distance: OrderedFloat<f32>,
}

/// Holds at most one distance field and one path.
///
/// A path is only valid for the field it was traced from, so replacing the
/// field drops the path too.
#[derive(Clone, Debug, Default)]
pub struct SearchCache {
    field: Option<DistanceField>,
    path: Option<(PathKey, Vec<Position>)>,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holds(&self, key: SearchKey) -> bool {
        self.field.as_ref().is_some_and(|field| field.key() == key)
    }

    /// Cached field for `key`, computing and storing it on a miss.
    pub fn field_or_compute(
        &mut self,
        key: SearchKey,
        compute: impl FnOnce() -> DistanceField,
    ) -> &DistanceField {
        if !self.holds(key) {
            self.field = None;
            self.path = None;
        }
        self.field.get_or_insert_with(compute)
    }

    pub fn path(&self, key: &PathKey) -> Option<&[Position]> {
        match &self.path {
            Some((cached, path)) if cached == key => Some(path),
            _ => None,
        }
    }

    pub fn store_path(&mut self, key: PathKey, path: Vec<Position>) {
        self.path = Some((key, path));
    }

    /// Drops everything. Call after any occupancy change.
    pub fn invalidate(&mut self) {
        self.field = None;
        self.path = None;
    }
}
