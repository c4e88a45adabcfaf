use arrayvec::ArrayVec;

use crate::env::{MapDimensions, Terrain};
use crate::state::GridError;

use super::{CardinalDirection, Position, UnitId};

/// Up to four in-bounds neighbours of a cell.
pub type Neighbors = ArrayVec<Position, 4>;

/// Terrain layer plus single-occupant layer over a bounded 4-connected grid.
///
/// Terrain is fixed at construction; only occupancy changes during play.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "GridLayers"))]
pub struct Grid {
    dimensions: MapDimensions,
    terrain: Vec<Terrain>,
    occupancy: Vec<Option<UnitId>>,
}

/// Unchecked wire form of a [`Grid`]; layer sizes are validated on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct GridLayers {
    dimensions: MapDimensions,
    terrain: Vec<Terrain>,
    occupancy: Vec<Option<UnitId>>,
}

#[cfg(feature = "serde")]
impl TryFrom<GridLayers> for Grid {
    type Error = GridError;

    fn try_from(layers: GridLayers) -> Result<Self, Self::Error> {
        let mut grid = Grid::new(layers.dimensions, layers.terrain)?;
        if layers.occupancy.len() != grid.occupancy.len() {
            return Err(GridError::TerrainMismatch {
                expected: grid.occupancy.len(),
                actual: layers.occupancy.len(),
            });
        }
        grid.occupancy = layers.occupancy;
        Ok(grid)
    }
}

impl Grid {
    /// Builds a grid from a row-major terrain layout.
    pub fn new(dimensions: MapDimensions, terrain: Vec<Terrain>) -> Result<Self, GridError> {
        let expected = dimensions.area();
        if terrain.len() != expected {
            return Err(GridError::TerrainMismatch {
                expected,
                actual: terrain.len(),
            });
        }
        Ok(Self {
            dimensions,
            terrain,
            occupancy: vec![None; expected],
        })
    }

    /// Grid with the same terrain on every cell.
    pub fn uniform(dimensions: MapDimensions, terrain: Terrain) -> Self {
        let area = dimensions.area();
        Self {
            dimensions,
            terrain: vec![terrain; area],
            occupancy: vec![None; area],
        }
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    fn index(&self, position: Position) -> Result<usize, GridError> {
        self.dimensions
            .index_of(position)
            .ok_or(GridError::OutOfBounds {
                position,
                width: self.dimensions.width,
                height: self.dimensions.height,
            })
    }

    pub fn terrain_at(&self, position: Position) -> Result<&Terrain, GridError> {
        let index = self.index(position)?;
        Ok(&self.terrain[index])
    }

    pub fn unit_at(&self, position: Position) -> Result<Option<UnitId>, GridError> {
        let index = self.index(position)?;
        Ok(self.occupancy[index])
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        matches!(self.unit_at(position), Ok(Some(_)))
    }

    /// In-bounds 4-connected neighbours, in north/south/east/west order.
    pub fn neighbors(&self, position: Position) -> Neighbors {
        CardinalDirection::ALL
            .iter()
            .map(|&direction| position.step(direction))
            .filter(|&candidate| self.contains(candidate))
            .collect()
    }

    /// Puts a unit on an empty cell.
    pub fn place(&mut self, position: Position, unit: UnitId) -> Result<(), GridError> {
        let index = self.index(position)?;
        if let Some(occupant) = self.occupancy[index] {
            return Err(GridError::Occupied { position, occupant });
        }
        self.occupancy[index] = Some(unit);
        Ok(())
    }

    /// Clears a cell, returning whoever stood there.
    pub fn vacate(&mut self, position: Position) -> Result<Option<UnitId>, GridError> {
        let index = self.index(position)?;
        Ok(self.occupancy[index].take())
    }

    /// Moves the occupant of `from` onto `to`.
    ///
    /// Rejected before any mutation when `to` is taken; `from == to` is a no-op.
    pub fn move_unit(&mut self, from: Position, to: Position) -> Result<UnitId, GridError> {
        let from_index = self.index(from)?;
        let to_index = self.index(to)?;
        let unit = self.occupancy[from_index].ok_or(GridError::Vacant { position: from })?;
        if from_index == to_index {
            return Ok(unit);
        }
        if let Some(occupant) = self.occupancy[to_index] {
            return Err(GridError::Occupied {
                position: to,
                occupant,
            });
        }
        self.occupancy[from_index] = None;
        self.occupancy[to_index] = Some(unit);
        Ok(unit)
    }

    /// Every occupied cell with its occupant, in row-major order.
    pub fn occupants(&self) -> impl Iterator<Item = (Position, UnitId)> + '_ {
        self.occupancy
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let unit = (*slot)?;
                let position = self.dimensions.position_of(index)?;
                Some((position, unit))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::uniform(MapDimensions::new(3, 3), Terrain::plain())
    }

    #[test]
    fn corner_has_two_neighbors() {
        let grid = grid();
        let corner = grid.neighbors(Position::ORIGIN);
        assert_eq!(
            corner.as_slice(),
            &[Position::new(0, 1), Position::new(1, 0)]
        );
        assert_eq!(grid.neighbors(Position::new(1, 1)).len(), 4);
    }

    #[test]
    fn move_onto_occupied_cell_is_rejected_without_mutation() {
        let mut grid = grid();
        grid.place(Position::new(0, 0), UnitId(1)).unwrap();
        grid.place(Position::new(1, 0), UnitId(2)).unwrap();

        let result = grid.move_unit(Position::new(0, 0), Position::new(1, 0));
        assert_eq!(
            result,
            Err(GridError::Occupied {
                position: Position::new(1, 0),
                occupant: UnitId(2)
            })
        );
        assert_eq!(grid.unit_at(Position::new(0, 0)), Ok(Some(UnitId(1))));
        assert_eq!(grid.unit_at(Position::new(1, 0)), Ok(Some(UnitId(2))));
    }

    #[test]
    fn move_in_place_is_a_noop() {
        let mut grid = grid();
        grid.place(Position::new(2, 2), UnitId(7)).unwrap();
        assert_eq!(
            grid.move_unit(Position::new(2, 2), Position::new(2, 2)),
            Ok(UnitId(7))
        );
        assert_eq!(grid.unit_at(Position::new(2, 2)), Ok(Some(UnitId(7))));
    }

    #[test]
    fn move_from_empty_cell_fails() {
        let mut grid = grid();
        assert!(matches!(
            grid.move_unit(Position::new(0, 0), Position::new(0, 1)),
            Err(GridError::Vacant { .. })
        ));
    }

    #[test]
    fn out_of_bounds_queries_fail() {
        let grid = grid();
        assert!(matches!(
            grid.terrain_at(Position::new(3, 0)),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(!grid.is_occupied(Position::new(-1, 0)));
    }

    #[test]
    fn terrain_layout_must_match_dimensions() {
        let result = Grid::new(MapDimensions::new(2, 2), vec![Terrain::plain(); 3]);
        assert_eq!(
            result,
            Err(GridError::TerrainMismatch {
                expected: 4,
                actual: 3
            })
        );
    }
}
