//! Single-source Dijkstra over the terrain-weighted grid.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::env::MapDimensions;
use crate::state::{Position, UnitId};

use super::NavigationOracle;
use super::cache::SearchKey;

/// Tolerance used when comparing accumulated real-valued costs to a budget.
pub(crate) const COST_EPSILON: f32 = 1e-4;

type Candidate = Reverse<(OrderedFloat<f32>, Position)>;

/// How the search reached a cell.
///
/// `Primary` is an ordinary walkable predecessor. `Obstructed` collects every
/// neighbour that tried to enter an obstacle cell, cheapest first; it lets a
/// caller draw a path into an enemy or blocked tile that cannot be walked.
/// An obstructed candidate never replaces a primary predecessor.
#[derive(Clone, Debug, Default)]
pub enum Link {
    #[default]
    Unreached,
    Primary(Position),
    Obstructed(BinaryHeap<Candidate>),
}

impl Link {
    /// Predecessor used for path reconstruction.
    pub fn predecessor(&self) -> Option<Position> {
        match self {
            Link::Unreached => None,
            Link::Primary(previous) => Some(*previous),
            Link::Obstructed(candidates) => {
                candidates.peek().map(|Reverse((_, previous))| *previous)
            }
        }
    }

    pub fn is_obstructed(&self) -> bool {
        matches!(self, Link::Obstructed(_))
    }

    fn offer_obstructed(&mut self, cost: f32, previous: Position) {
        match self {
            Link::Primary(_) => {}
            Link::Obstructed(candidates) => candidates.push(Reverse((OrderedFloat(cost), previous))),
            Link::Unreached => {
                let mut candidates = BinaryHeap::new();
                candidates.push(Reverse((OrderedFloat(cost), previous)));
                *self = Link::Obstructed(candidates);
            }
        }
    }
}

/// Distances and links from one source, for one obstacle setting.
#[derive(Clone, Debug)]
pub struct DistanceField {
    key: SearchKey,
    asking: Option<UnitId>,
    dimensions: MapDimensions,
    distances: Vec<f32>,
    links: Vec<Link>,
}

impl DistanceField {
    /// Runs the search.
    ///
    /// Entering a cell costs that cell's terrain movement cost. With obstacles
    /// enabled, cells that block the unit standing on the source keep an
    /// infinite distance and only gain obstructed links.
    pub fn compute<N>(nav: &N, key: SearchKey) -> Self
    where
        N: NavigationOracle + ?Sized,
    {
        let dimensions = nav.dimensions();
        let area = dimensions.area();
        let asking = nav.occupant(key.source);
        let mut field = Self {
            key,
            asking,
            dimensions,
            distances: vec![f32::INFINITY; area],
            links: vec![Link::Unreached; area],
        };

        let Some(source_index) = dimensions.index_of(key.source) else {
            return field;
        };
        field.distances[source_index] = 0.0;

        let mut open: BinaryHeap<Candidate> = BinaryHeap::new();
        open.push(Reverse((OrderedFloat(0.0), key.source)));

        while let Some(Reverse((OrderedFloat(cost), current))) = open.pop() {
            let Some(current_index) = dimensions.index_of(current) else {
                continue;
            };
            if cost > field.distances[current_index] {
                continue;
            }

            for neighbor in nav.neighbors(current) {
                if neighbor == key.source {
                    continue;
                }
                let Some(neighbor_index) = dimensions.index_of(neighbor) else {
                    continue;
                };
                let Some(step) = nav.entry_cost(neighbor) else {
                    continue;
                };
                let tentative = cost + step;

                if key.obstacles_enabled && nav.blocks(neighbor, asking) {
                    field.links[neighbor_index].offer_obstructed(tentative, current);
                    continue;
                }

                if tentative < field.distances[neighbor_index] {
                    field.distances[neighbor_index] = tentative;
                    field.links[neighbor_index] = Link::Primary(current);
                    open.push(Reverse((OrderedFloat(tentative), neighbor)));
                }
            }
        }

        field
    }

    pub fn key(&self) -> SearchKey {
        self.key
    }

    pub fn source(&self) -> Position {
        self.key.source
    }

    /// Unit standing on the source when the search ran.
    pub fn asking(&self) -> Option<UnitId> {
        self.asking
    }

    /// Finite walking cost to `position`, if any.
    pub fn distance(&self, position: Position) -> Option<f32> {
        let index = self.dimensions.index_of(position)?;
        let distance = self.distances[index];
        distance.is_finite().then_some(distance)
    }

    /// Raw distance; infinity for unreachable or obstacle cells.
    pub(crate) fn raw_distance(&self, position: Position) -> f32 {
        self.dimensions
            .index_of(position)
            .map(|index| self.distances[index])
            .unwrap_or(f32::INFINITY)
    }

    pub fn link(&self, position: Position) -> Option<&Link> {
        self.dimensions
            .index_of(position)
            .map(|index| &self.links[index])
    }

    /// Cells whose finite distance fits the budget, source included.
    pub fn within(&self, max_distance: f32) -> impl Iterator<Item = Position> + '_ {
        self.distances
            .iter()
            .enumerate()
            .filter(move |(_, distance)| {
                distance.is_finite() && **distance <= max_distance + COST_EPSILON
            })
            .filter_map(|(index, _)| self.dimensions.position_of(index))
    }

    /// Walks links back from `target` to the source.
    ///
    /// Returns the cells from (excluding) the source to `target` in walking
    /// order, or `None` when no chain of links connects them.
    pub fn trace(&self, target: Position) -> Option<Vec<Position>> {
        let mut steps = Vec::new();
        let mut current = target;
        while current != self.key.source {
            // A chain longer than the grid means the links loop.
            if steps.len() > self.distances.len() {
                return None;
            }
            steps.push(current);
            current = self.link(current)?.predecessor()?;
        }
        steps.reverse();
        Some(steps)
    }
}
